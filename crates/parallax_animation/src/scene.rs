//! Scroll scenes
//!
//! A [`Scene`] maps the document scroll offset onto an ordered sequence of
//! keyframes. Keyframe `i` covers the scroll range
//! `[offset(i), offset(i) + duration(i))` where `offset(i)` is the sum of the
//! durations before it; the document is made one viewport taller than the sum
//! of all durations.
//!
//! Every tick reads the scroll offset, decides whether the active keyframe
//! must be left (forwards or backwards), and updates the active keyframe at
//! its local time.
//!
//! # Example
//!
//! ```rust
//! use parallax_animation::descriptor::{ElementDescriptor, KeyframeDescriptor};
//! use parallax_animation::{PlatformEvent, Scene};
//! use parallax_platform::headless::HeadlessPlatform;
//! use parallax_platform::Viewport;
//!
//! let mut stage = HeadlessPlatform::new(Viewport::new(1280.0, 800.0));
//! let intro = stage.insert(None, "section", Some("intro"), &[]).unwrap();
//! stage.insert(Some(intro), "h1", None, &["name"]).unwrap();
//!
//! let mut scene = Scene::new(
//!     vec![KeyframeDescriptor::new("#intro")
//!         .with_animation(ElementDescriptor::new(".name").with_opacity(0.0))],
//!     stage,
//! )
//! .unwrap();
//!
//! scene.platform_mut().set_scroll(400.0);
//! scene.handle_event(PlatformEvent::Timer);
//! scene.handle_event(PlatformEvent::Frame);
//! assert_eq!(scene.active_index(), 0);
//! ```

use std::time::Duration;

use parallax_platform::{Platform, PlatformEvent, Viewport};
use tracing::{debug, info};

use crate::descriptor::KeyframeDescriptor;
use crate::easing::{EasingFn, DEFAULT_EASING};
use crate::error::{Result, SceneError};
use crate::keyframe::Keyframe;
use crate::scheduler::{FrameGate, DEFAULT_TICK_PERIOD};

/// What a tick did at the keyframe boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Still inside the active keyframe
    Stay,
    /// Scrolled past the end of keyframe `from`
    Advance { from: usize, to: usize },
    /// Scrolled before the start of keyframe `from`
    Retreat { from: usize, to: usize },
}

/// Builder for [`Scene`]
pub struct SceneBuilder {
    descriptors: Vec<KeyframeDescriptor>,
    easing: EasingFn,
    tick_period: Duration,
}

impl SceneBuilder {
    pub fn new(descriptors: Vec<KeyframeDescriptor>) -> Self {
        Self {
            descriptors,
            easing: DEFAULT_EASING,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    /// Use another easing curve for every element
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Period of the recurring tick timer
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Resolve every target, subscribe to resizes and run the first layout.
    ///
    /// Fails on the first invalid descriptor or unresolved selector.
    pub fn build<P: Platform>(self, mut platform: P) -> Result<Scene<P>> {
        if self.descriptors.is_empty() {
            return Err(SceneError::Empty);
        }

        let keyframes = self
            .descriptors
            .iter()
            .map(|desc| Keyframe::new(&mut platform, desc, self.easing))
            .collect::<Result<Vec<_>>>()?;

        platform.subscribe_resize();

        let mut scene = Scene {
            viewport: platform.viewport(),
            platform,
            keyframes,
            active_index: 0,
            active_start_offset: 0.0,
            scroll_pos: 0.0,
            previous_scroll_pos: 0.0,
            total_extent: 0.0,
            frames: FrameGate::new(),
            tick_period: self.tick_period,
            timer_started: false,
        };
        scene.layout();

        info!(
            keyframes = scene.keyframes.len(),
            total_extent = scene.total_extent,
            "scene constructed"
        );
        Ok(scene)
    }
}

/// A scroll-driven timeline of keyframes
pub struct Scene<P: Platform> {
    platform: P,
    keyframes: Vec<Keyframe<P::Target>>,
    active_index: usize,
    /// Scroll offset at which the active keyframe begins
    active_start_offset: f64,
    scroll_pos: f64,
    previous_scroll_pos: f64,
    total_extent: f64,
    viewport: Viewport,
    frames: FrameGate,
    tick_period: Duration,
    timer_started: bool,
}

impl<P: Platform> Scene<P> {
    /// Build a scene with the default easing and tick period
    pub fn new(descriptors: Vec<KeyframeDescriptor>, platform: P) -> Result<Self> {
        SceneBuilder::new(descriptors).build(platform)
    }

    pub fn builder(descriptors: Vec<KeyframeDescriptor>) -> SceneBuilder {
        SceneBuilder::new(descriptors)
    }

    /// Dispatch a platform event
    ///
    /// Returns the boundary transition when the event ran a tick.
    pub fn handle_event(&mut self, event: PlatformEvent) -> Option<Transition> {
        match event {
            PlatformEvent::Resize => {
                self.layout();
                None
            }
            PlatformEvent::Timer => {
                self.frames.on_timer(&mut self.platform);
                None
            }
            PlatformEvent::Frame => {
                self.frames.on_frame();
                Some(self.tick())
            }
        }
    }

    /// Recompute all geometry for the current viewport and reset to the top.
    ///
    /// Keyframe 0 becomes active and visible at local time 0; every other
    /// keyframe is hidden. The tick timer is started on the first call.
    pub fn layout(&mut self) {
        let viewport = self.platform.viewport();
        self.viewport = viewport;

        let mut total_extent = viewport.height;
        for keyframe in &mut self.keyframes {
            keyframe.layout(viewport.height, viewport.width);
            total_extent += keyframe.duration_px();
        }
        self.total_extent = total_extent;
        self.platform.set_document_extent(total_extent);

        self.platform.scroll_to(0.0);
        self.scroll_pos = 0.0;
        self.previous_scroll_pos = 0.0;
        self.active_index = 0;
        self.active_start_offset = 0.0;

        for keyframe in &self.keyframes[1..] {
            keyframe.hide(&mut self.platform);
        }
        let first = &self.keyframes[0];
        first.update(&mut self.platform, 0.0, true, true);
        first.show(&mut self.platform);

        if !self.timer_started {
            self.platform.start_timer(self.tick_period);
            self.timer_started = true;
        }

        debug!(
            width = viewport.width,
            height = viewport.height,
            total_extent,
            "scene layout"
        );
    }

    /// Sample the scroll offset and advance the timeline.
    pub fn tick(&mut self) -> Transition {
        self.previous_scroll_pos = self.scroll_pos;
        self.scroll_pos = self.platform.scroll_offset();
        let is_scrolling_down = self.scroll_pos >= self.previous_scroll_pos;

        let last = self.keyframes.len() - 1;
        let from = self.active_index;
        let current = &self.keyframes[from];

        let transition = if self.scroll_pos > self.active_start_offset + current.duration_px() {
            // Leave the active keyframe at its finishing position
            current.update(
                &mut self.platform,
                current.duration_px(),
                is_scrolling_down,
                true,
            );
            current.hide(&mut self.platform);

            let to = (from + 1).min(last);
            if to != from {
                self.active_start_offset += current.duration_px();
            }
            self.active_index = to;

            let next = &self.keyframes[to];
            next.update(&mut self.platform, 0.0, true, true);
            next.show(&mut self.platform);
            Transition::Advance { from, to }
        } else if self.scroll_pos < self.active_start_offset {
            // Leave the active keyframe at its starting position
            current.update(&mut self.platform, 0.0, true, true);
            current.hide(&mut self.platform);

            let to = from.saturating_sub(1);
            let next = &self.keyframes[to];
            if to != from {
                self.active_start_offset -= next.duration_px();
            }
            self.active_index = to;

            // Same write order as entering from the top
            next.update(&mut self.platform, 0.0, true, true);
            next.show(&mut self.platform);
            Transition::Retreat { from, to }
        } else {
            Transition::Stay
        };

        if transition != Transition::Stay {
            debug!(
                ?transition,
                scroll = self.scroll_pos,
                start_offset = self.active_start_offset,
                "keyframe transition"
            );
        }

        // A keyframe entered from below is replayed as a downward pass, so
        // elements whose window already closed are written in the same order
        // as when it is entered from the top.
        let pass_down = is_scrolling_down || matches!(transition, Transition::Retreat { .. });
        let local_time = self.scroll_pos - self.active_start_offset;
        self.keyframes[self.active_index].update(
            &mut self.platform,
            local_time,
            pass_down,
            false,
        );

        transition
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn keyframes(&self) -> &[Keyframe<P::Target>] {
        &self.keyframes
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_start_offset(&self) -> f64 {
        self.active_start_offset
    }

    /// Scroll offset read by the last tick
    pub fn scroll_pos(&self) -> f64 {
        self.scroll_pos
    }

    /// Viewport height plus the pixel duration of every keyframe
    pub fn total_extent(&self) -> f64 {
        self.total_extent
    }

    /// Viewport used by the last layout
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Scroll offset at which each keyframe begins
    pub fn keyframe_offsets(&self) -> Vec<f64> {
        self.keyframes
            .iter()
            .scan(0.0, |offset, kf| {
                let start = *offset;
                *offset += kf.duration_px();
                Some(start)
            })
            .collect()
    }

    pub fn frame_gate(&self) -> &FrameGate {
        &self.frames
    }
}
