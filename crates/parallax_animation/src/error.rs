//! Scene construction errors

use thiserror::Error;

/// Errors raised while building or laying out a scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A selector matched nothing
    #[error("No element selected with selector {selector:?}{}", scope_suffix(.scope))]
    UnresolvedTarget {
        selector: String,
        /// Selector of the keyframe the lookup was scoped to, if any
        scope: Option<String>,
    },

    /// A keyframe duration is negative or not finite
    #[error("Invalid duration {duration} for keyframe {selector:?}")]
    InvalidDuration { selector: String, duration: f64 },

    /// An element window lies outside 0..=1 or ends before it starts
    #[error("Invalid time window [{start}, {end}] for element {selector:?}")]
    InvalidWindow {
        selector: String,
        start: f64,
        end: f64,
    },

    /// A scene needs at least one keyframe
    #[error("Scene has no keyframes")]
    Empty,
}

fn scope_suffix(scope: &Option<String>) -> String {
    match scope {
        Some(s) => format!(" in keyframe {s:?}"),
        None => String::new(),
    }
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
