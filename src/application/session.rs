//! Interactive view session: visibility state, selection and current layout.
//!
//! Every user event is handled to completion before the next one. A toggle
//! recomputes the layout of the whole tree, hands it to the surface and asks
//! the surface to reframe.

use tracing::{debug, instrument, warn};

use crate::application::ApplicationResult;
use crate::domain::{
    compute_layout, Layout, LayoutSpec, PositionedNode, Selection, TreeArena, VisibilitySet,
};
use crate::infrastructure::traits::{FitRequest, RenderSurface};

/// Default camera margin, as a fraction of the content size.
pub const DEFAULT_FIT_PADDING: f64 = 0.3;

/// Result of a click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The id is not part of the current layout; nothing changed.
    Ignored,
    /// Node selected and expanded.
    Expanded,
    /// Node selected and collapsed.
    Collapsed,
}

/// State owned by one interactive view.
pub struct TreeSession<S: RenderSurface> {
    tree: TreeArena,
    spec: LayoutSpec,
    fit_padding: f64,
    visibility: VisibilitySet,
    selection: Selection,
    layout: Layout,
    generation: u64,
    surface: S,
}

impl<S: RenderSurface> TreeSession<S> {
    /// Start a session with the initial visibility from `spec.initial_expand_depth`.
    ///
    /// Computes and presents the first layout.
    pub fn new(tree: TreeArena, spec: LayoutSpec, surface: S) -> ApplicationResult<Self> {
        let visibility = VisibilitySet::initial(&tree, spec.initial_expand_depth);
        Self::with_visibility(tree, spec, visibility, surface)
    }

    /// Start a session with an explicit visibility set.
    pub fn with_visibility(
        tree: TreeArena,
        spec: LayoutSpec,
        visibility: VisibilitySet,
        surface: S,
    ) -> ApplicationResult<Self> {
        let layout = compute_layout(&tree, &visibility, &spec)?;
        let mut session = Self {
            tree,
            spec,
            fit_padding: DEFAULT_FIT_PADDING,
            visibility,
            selection: Selection::new(),
            layout,
            generation: 0,
            surface,
        };
        session.publish();
        Ok(session)
    }

    /// Change the camera margin and reframe the current layout.
    pub fn set_fit_padding(&mut self, padding: f64) {
        self.fit_padding = padding;
        self.refit();
    }

    /// Ask the surface to frame the current layout again, e.g. after a resize.
    pub fn refit(&mut self) {
        if let Some(bounds) = self.layout.bounds() {
            self.surface.request_fit(FitRequest {
                bounds,
                padding: self.fit_padding,
                generation: self.generation,
            });
        }
    }

    /// Handle a click on a displayed node.
    ///
    /// Toggles the node, then selects it as it was positioned before the
    /// toggle. Clicks on ids that are not in the current layout (stale or
    /// unknown) are ignored. A failed toggle leaves the selection untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn click(&mut self, id: &str) -> ApplicationResult<ClickOutcome> {
        let Some(node) = self.layout.node(id).cloned() else {
            warn!("ignoring click on node not in current layout: {}", id);
            return Ok(ClickOutcome::Ignored);
        };
        let outcome = match self.toggle(id)? {
            Some(true) => ClickOutcome::Expanded,
            Some(false) => ClickOutcome::Collapsed,
            None => return Ok(ClickOutcome::Ignored),
        };
        self.selection.select(node);
        Ok(outcome)
    }

    /// Flip the expanded state of `id` and recompute.
    ///
    /// Returns the new state, or `None` for an id not in the tree (no-op).
    /// If recomputation fails the flip is undone and the previous layout kept.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, id: &str) -> ApplicationResult<Option<bool>> {
        if !self.tree.contains(id) {
            debug!("toggle on unknown node ignored: {}", id);
            return Ok(None);
        }
        let expanded = self.visibility.toggle(id);
        if let Err(e) = self.recompute() {
            warn!("layout failed after toggling {}, keeping previous layout: {}", id, e);
            self.visibility.toggle(id);
            return Err(e);
        }
        Ok(Some(expanded))
    }

    /// Select a visible node without toggling it. Returns false if not visible.
    pub fn select(&mut self, id: &str) -> bool {
        match self.layout.node(id) {
            Some(node) => {
                self.selection.select(node.clone());
                true
            }
            None => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.selection.dismiss();
    }

    pub fn selected(&self) -> Option<&PositionedNode> {
        self.selection.get()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn visibility(&self) -> &VisibilitySet {
        &self.visibility
    }

    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    /// Number of layouts published so far (the initial one included).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn recompute(&mut self) -> ApplicationResult<()> {
        let layout = compute_layout(&self.tree, &self.visibility, &self.spec)?;
        self.layout = layout;
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        self.generation += 1;
        debug!(
            "publishing layout generation {} ({} nodes)",
            self.generation,
            self.layout.nodes.len()
        );
        self.surface.present(&self.layout);
        self.refit();
    }
}
