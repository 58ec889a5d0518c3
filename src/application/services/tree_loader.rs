//! Tree file loading service
//!
//! Reads a tree from JSON or TOML, in nested form (root object with
//! `children`) or flat form (records with `parent`), and validates it into a
//! [`TreeArena`].

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{NodeRecord, TreeArena, TreeBuilder, TreeNode, DEFAULT_MAX_DEPTH};
use crate::infrastructure::traits::FileSystem;

/// Supported input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Toml,
}

impl TreeFormat {
    /// Pick the format from the file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => TreeFormat::Toml,
            _ => TreeFormat::Json,
        }
    }
}

/// Parsed but not yet validated tree document.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeDocument {
    Nested(TreeNode),
    Flat(Vec<NodeRecord>),
}

#[derive(Deserialize)]
struct FlatDocument {
    nodes: Vec<NodeRecord>,
}

impl TreeDocument {
    /// Parse `content`. `origin` only labels error messages.
    pub fn parse(content: &str, format: TreeFormat, origin: &Path) -> ApplicationResult<Self> {
        Self::parse_with_max_depth(content, format, origin, DEFAULT_MAX_DEPTH)
    }

    /// Parse `content`, accepting JSON nesting deep enough for trees of
    /// `max_depth` levels. serde_json's own recursion limit (128) is lifted,
    /// so the bound here is the only one.
    pub fn parse_with_max_depth(
        content: &str,
        format: TreeFormat,
        origin: &Path,
        max_depth: usize,
    ) -> ApplicationResult<Self> {
        let parse_err = |message: String| ApplicationError::Parse {
            path: origin.to_path_buf(),
            message,
        };
        match format {
            TreeFormat::Json => {
                let nesting = json_nesting(content);
                let limit = json_nesting_limit(max_depth);
                if nesting > limit {
                    return Err(parse_err(format!(
                        "nesting depth {nesting} exceeds {limit} (max_depth {max_depth})"
                    )));
                }
                let value = read_json(content).map_err(|e| parse_err(e.to_string()))?;
                let document = if value.is_array() {
                    serde_json::from_value(value).map(TreeDocument::Flat)
                } else if is_flat_json(&value) {
                    serde_json::from_value::<FlatDocument>(value)
                        .map(|doc| TreeDocument::Flat(doc.nodes))
                } else {
                    serde_json::from_value(value).map(TreeDocument::Nested)
                };
                document.map_err(|e| parse_err(e.to_string()))
            }
            TreeFormat::Toml => {
                let value: toml::Value =
                    toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
                let flat = value
                    .as_table()
                    .is_some_and(|t| t.contains_key("nodes") && !t.contains_key("id"));
                let document = if flat {
                    value
                        .try_into::<FlatDocument>()
                        .map(|doc| TreeDocument::Flat(doc.nodes))
                } else {
                    value.try_into::<TreeNode>().map(TreeDocument::Nested)
                };
                document.map_err(|e| parse_err(e.to_string()))
            }
        }
    }
}

/// Bracket nesting allowed for a tree of `max_depth` levels.
///
/// A nested document spends two levels per tree level (node object and
/// `children` array). The extra headroom lets trees somewhat deeper than
/// `max_depth` reach the builder, which names the offending node.
fn json_nesting_limit(max_depth: usize) -> usize {
    max_depth.saturating_add(1).saturating_mul(4).saturating_add(8)
}

/// Deepest `{`/`[` nesting in a JSON text, ignoring brackets inside strings.
fn json_nesting(content: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for byte in content.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn read_json(content: &str) -> serde_json::Result<serde_json::Value> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let value = serde_json::Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

fn is_flat_json(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key("nodes") && !o.contains_key("id"))
}

/// Service for loading validated trees from files.
pub struct TreeLoader {
    fs: Arc<dyn FileSystem>,
    max_depth: usize,
}

impl TreeLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Read, parse and validate the tree file at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<TreeArena> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("tree file not found: {}", path.display()),
                source: Box::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree file", path)?;
        let document = TreeDocument::parse_with_max_depth(
            &content,
            TreeFormat::from_path(path),
            path,
            self.max_depth,
        )?;
        let tree = self.build(&document)?;
        debug!(
            "loaded {}: {} nodes, depth {}",
            path.display(),
            tree.len(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Validate an already parsed document.
    pub fn build(&self, document: &TreeDocument) -> ApplicationResult<TreeArena> {
        let mut builder = TreeBuilder::new().with_max_depth(self.max_depth);
        let tree = match document {
            TreeDocument::Nested(root) => builder.build_from_tree(root)?,
            TreeDocument::Flat(records) => builder.build_from_records(records)?,
        };
        Ok(tree)
    }
}
