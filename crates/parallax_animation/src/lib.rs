//! Parallax Animation Engine
//!
//! Scroll-driven keyframe animation for page sections.
//!
//! # Features
//!
//! - **Scenes**: an ordered run of keyframes laid end to end along the scroll axis
//! - **Windowed easing**: each element animates inside its own slice of the keyframe
//! - **Direction-aware skipping**: elements outside their window in the direction
//!   of travel are not recomputed
//! - **Injected platform**: selectors, styles, geometry and timers all go through
//!   [`parallax_platform::Platform`]

pub mod descriptor;
pub mod easing;
pub mod element;
pub mod error;
pub mod keyframe;
pub mod scene;
pub mod scheduler;
pub mod units;

pub use descriptor::{ElementDescriptor, KeyframeDescriptor};
pub use easing::{sine_in_out, EasingFn};
pub use element::Element;
pub use error::{Result, SceneError};
pub use keyframe::Keyframe;
pub use parallax_platform::{Platform, PlatformEvent, StylePatch, Viewport};
pub use scene::{Scene, SceneBuilder, Transition};
pub use scheduler::{FrameGate, DEFAULT_TICK_PERIOD};
pub use units::{to_pixels, Length};
