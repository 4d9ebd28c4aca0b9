//! Parallax Platform Abstraction
//!
//! The narrow capability interface a scroll scene runs against:
//!
//! - **Element resolution**: selector (plus optional scope) to a target handle
//! - **Styling**: atomic [`StylePatch`] writes and visibility toggles
//! - **Geometry**: viewport size, scroll offset, document extent
//! - **Scheduling**: resize subscription, a recurring timer and a
//!   next-frame primitive, surfaced back to the scene as [`PlatformEvent`]s
//!
//! The `headless` feature (on by default) adds [`headless::HeadlessPlatform`],
//! an in-memory implementation used by tests and the `parallax` CLI.

pub mod error;
#[cfg(feature = "headless")]
pub mod headless;
pub mod platform;
pub mod style;

pub use error::{PlatformError, Result};
pub use platform::{Platform, PlatformEvent, Viewport};
pub use style::{StylePatch, Transform, TransformPart};
