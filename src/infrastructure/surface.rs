//! Headless rendering surface with a fit-to-content camera.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Bounds, Layout};
use crate::infrastructure::traits::{FitRequest, RenderSurface};

/// Viewport and zoom limits for camera fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub fit_padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            fit_padding: 0.3,
            min_zoom: 0.5,
            max_zoom: 2.0,
        }
    }
}

impl ViewSettings {
    /// Reject non-finite values, empty viewports, negative padding and
    /// zoom limits that do not form a positive range.
    pub fn validate(&self) -> ApplicationResult<()> {
        let invalid = |field: &str, value: f64| ApplicationError::Config {
            message: format!("invalid view setting: {field} = {value}"),
        };
        let fields = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("fit_padding", self.fit_padding),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid(field, value));
            }
        }
        if self.viewport_width <= 0.0 {
            return Err(invalid("viewport_width", self.viewport_width));
        }
        if self.viewport_height <= 0.0 {
            return Err(invalid("viewport_height", self.viewport_height));
        }
        if self.fit_padding < 0.0 {
            return Err(invalid("fit_padding", self.fit_padding));
        }
        if self.min_zoom <= 0.0 {
            return Err(invalid("min_zoom", self.min_zoom));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ApplicationError::Config {
                message: format!(
                    "invalid view setting: min_zoom {} exceeds max_zoom {}",
                    self.min_zoom, self.max_zoom
                ),
            });
        }
        Ok(())
    }
}

/// Pan/zoom transform: screen = diagram * zoom + offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Camera {
    /// Camera that shows all of `bounds` centered in the viewport.
    ///
    /// The content is inflated by `padding` on each axis before fitting, and
    /// the zoom is clamped to `[min_zoom, max_zoom]`; `max_zoom` wins if the
    /// limits are inverted.
    pub fn fit(bounds: &Bounds, padding: f64, view: &ViewSettings) -> Self {
        let padded_w = bounds.width() * (1.0 + padding);
        let padded_h = bounds.height() * (1.0 + padding);
        let zoom_x = if padded_w > 0.0 {
            view.viewport_width / padded_w
        } else {
            view.max_zoom
        };
        let zoom_y = if padded_h > 0.0 {
            view.viewport_height / padded_h
        } else {
            view.max_zoom
        };
        let zoom = zoom_x.min(zoom_y).max(view.min_zoom).min(view.max_zoom);
        let (cx, cy) = bounds.center();
        Self {
            zoom,
            offset_x: view.viewport_width / 2.0 - cx * zoom,
            offset_y: view.viewport_height / 2.0 - cy * zoom,
        }
    }

    /// Map a diagram point to screen coordinates.
    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.offset_x, y * self.zoom + self.offset_y)
    }
}

/// Surface used by the command line front end and tests.
///
/// Keeps the last presented layout; fit requests wait until [`paint`](Self::paint).
#[derive(Debug, Clone, Default)]
pub struct TerminalSurface {
    view: ViewSettings,
    layout: Layout,
    camera: Camera,
    pending_fit: Option<FitRequest>,
    frames: u64,
}

impl TerminalSurface {
    pub fn new(view: ViewSettings) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Render one frame: apply the pending fit, if any.
    ///
    /// Returns true if the camera changed.
    pub fn paint(&mut self) -> bool {
        self.frames += 1;
        let Some(request) = self.pending_fit.take() else {
            return false;
        };
        let camera = Camera::fit(&request.bounds, request.padding, &self.view);
        debug!(
            "frame {}: fit generation {} -> zoom {:.3}",
            self.frames, request.generation, camera.zoom
        );
        let changed = camera != self.camera;
        self.camera = camera;
        changed
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pending_fit(&self) -> Option<&FitRequest> {
        self.pending_fit.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSurface for TerminalSurface {
    fn present(&mut self, layout: &Layout) {
        trace!("present: {} nodes", layout.nodes.len());
        self.layout = layout.clone();
    }

    fn request_fit(&mut self, request: FitRequest) {
        match self.pending_fit {
            Some(pending) if pending.generation > request.generation => {
                trace!("dropping superseded fit request {}", request.generation);
            }
            _ => self.pending_fit = Some(request),
        }
    }
}
