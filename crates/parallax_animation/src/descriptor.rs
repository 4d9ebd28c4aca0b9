//! Scene descriptors - the authored input format
//!
//! Descriptors are plain data. They deserialize from JSON with the camelCase
//! field names used by page authors, or can be built in code:
//!
//! ```rust
//! use parallax_animation::descriptor::{ElementDescriptor, KeyframeDescriptor};
//!
//! let intro = KeyframeDescriptor::new("#intro")
//!     .with_animation(ElementDescriptor::new(".name").with_translate_y(-150.0).with_opacity(0.0))
//!     .with_animation(ElementDescriptor::new(".byline").with_opacity(0.0));
//! ```

use serde::Deserialize;

use crate::error::{Result, SceneError};
use crate::units::Length;

/// Default opacity before an element's window opens
pub const DEFAULT_INITIAL_OPACITY: f64 = 1.0;
/// Default scale before an element's window opens
pub const DEFAULT_INITIAL_SCALE: f64 = 1.0;
/// Default rotation (degrees) before an element's window opens
pub const DEFAULT_INITIAL_ROTATION: f64 = 0.0;

/// One page section of the scene
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeDescriptor {
    pub selector: String,
    /// Length of the section in viewport heights
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub animations: Vec<ElementDescriptor>,
}

fn default_duration() -> f64 {
    1.0
}

impl KeyframeDescriptor {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            duration: default_duration(),
            animations: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_animation(mut self, animation: ElementDescriptor) -> Self {
        self.animations.push(animation);
        self
    }

    /// Reject negative or non-finite durations, then check every animation
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(SceneError::InvalidDuration {
                selector: self.selector.clone(),
                duration: self.duration,
            });
        }
        self.animations.iter().try_for_each(ElementDescriptor::validate)
    }
}

/// One animated element inside a keyframe
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub selector: String,
    /// Window start as a fraction of the keyframe (default 0)
    #[serde(default)]
    pub start_time: Option<f64>,
    /// Window end as a fraction of the keyframe (default 1)
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub translate_x: Option<Length>,
    #[serde(default)]
    pub translate_y: Option<Length>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub rotate: Option<f64>,
    #[serde(default)]
    pub initial_opacity: Option<f64>,
    #[serde(default)]
    pub initial_scale: Option<f64>,
    #[serde(default)]
    pub initial_rotation: Option<f64>,
}

impl ElementDescriptor {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Default::default()
        }
    }

    /// Builder: set the window as fractions of the keyframe
    pub fn with_window(mut self, start: f64, end: f64) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_start_time(mut self, start: f64) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn with_end_time(mut self, end: f64) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_translate_x(mut self, x: impl Into<Length>) -> Self {
        self.translate_x = Some(x.into());
        self
    }

    pub fn with_translate_y(mut self, y: impl Into<Length>) -> Self {
        self.translate_y = Some(y.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn with_initial_opacity(mut self, opacity: f64) -> Self {
        self.initial_opacity = Some(opacity);
        self
    }

    pub fn with_initial_scale(mut self, scale: f64) -> Self {
        self.initial_scale = Some(scale);
        self
    }

    pub fn with_initial_rotation(mut self, degrees: f64) -> Self {
        self.initial_rotation = Some(degrees);
        self
    }

    /// Window start fraction with its default applied
    pub fn start_fraction(&self) -> f64 {
        self.start_time.unwrap_or(0.0)
    }

    /// Window end fraction with its default applied
    pub fn end_fraction(&self) -> f64 {
        self.end_time.unwrap_or(1.0)
    }

    /// Both window fractions must lie in 0..=1 and be ordered
    pub fn validate(&self) -> Result<()> {
        let (start, end) = (self.start_fraction(), self.end_fraction());
        let in_range = |f: f64| (0.0..=1.0).contains(&f);
        if !in_range(start) || !in_range(end) || start > end {
            return Err(SceneError::InvalidWindow {
                selector: self.selector.clone(),
                start,
                end,
            });
        }
        Ok(())
    }
}
