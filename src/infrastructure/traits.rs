//! I/O boundary traits for testability
//!
//! These traits abstract the outside world (files, rendering surface),
//! allowing services and the session to be tested with mock implementations.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::{Bounds, Layout};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Request to frame all visible content.
///
/// `generation` increases with every layout; a surface that receives a newer
/// request drops any older one it has not applied yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest {
    pub bounds: Bounds,
    /// Fraction of the content size added as margin on each axis
    pub padding: f64,
    pub generation: u64,
}

/// Drawing surface fed by the layout session.
///
/// Owns camera state. Click events flow the other way: the surface forwards
/// them to [`TreeSession::click`](crate::application::TreeSession::click).
pub trait RenderSurface {
    /// Replace the displayed diagram with `layout`.
    fn present(&mut self, layout: &Layout);

    /// Fit the camera to `request.bounds` on the next paint.
    ///
    /// Fire-and-forget: must not block, and must not apply before the
    /// layout passed to the preceding `present` call is on screen.
    fn request_fit(&mut self, request: FitRequest);
}
