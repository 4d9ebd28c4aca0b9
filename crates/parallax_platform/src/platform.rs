//! The capability interface consumed by the animation engine
//!
//! Everything the engine needs from the outside world goes through
//! [`Platform`]: resolving selectors to targets, writing styles, toggling
//! visibility, reading viewport geometry and scroll offset, sizing the
//! document, and arming the timer / frame primitives. Events flow back the
//! other way as [`PlatformEvent`]s handed to the scene by the host loop.

use std::fmt::Debug;
use std::time::Duration;

use crate::style::StylePatch;

/// Viewport dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Signals delivered by the host to a subscribed scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The viewport was resized
    Resize,
    /// The recurring timer fired
    Timer,
    /// A previously requested render frame is due
    Frame,
}

/// Host services required by a scroll scene.
///
/// Implementations are expected to be single-threaded; the engine calls
/// every method from the one context that also delivers [`PlatformEvent`]s.
pub trait Platform {
    /// Opaque handle to a renderable target
    type Target: Copy + Eq + Debug;

    /// Resolve `selector` to a unique target, searching within `scope` when given
    fn resolve(&mut self, selector: &str, scope: Option<Self::Target>) -> Option<Self::Target>;

    /// Apply a style patch as one atomic write
    fn apply_style(&mut self, target: Self::Target, patch: &StylePatch);

    /// Show or hide a target
    fn set_visible(&mut self, target: Self::Target, visible: bool);

    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Current vertical scroll offset
    fn scroll_offset(&self) -> f64;

    /// Scroll the document to an absolute offset
    fn scroll_to(&mut self, offset: f64);

    /// Set the total scrollable height of the document
    fn set_document_extent(&mut self, extent: f64);

    /// Start delivering [`PlatformEvent::Resize`]
    fn subscribe_resize(&mut self);

    /// Start delivering [`PlatformEvent::Timer`] every `period`
    fn start_timer(&mut self, period: Duration);

    /// Schedule exactly one [`PlatformEvent::Frame`] before the next paint
    fn request_frame(&mut self);
}
