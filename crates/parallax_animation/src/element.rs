//! Animated elements
//!
//! An [`Element`] owns one target inside a keyframe and the window of local
//! scroll time during which it animates. Outside the window its properties
//! are clamped: the initial value before, the authored value after.

use parallax_platform::{Platform, StylePatch, Transform, TransformPart};

use crate::descriptor::{
    ElementDescriptor, DEFAULT_INITIAL_OPACITY, DEFAULT_INITIAL_ROTATION, DEFAULT_INITIAL_SCALE,
};
use crate::easing::{round2, EasingFn};
use crate::units::{to_pixels, Length};

/// One animated target with its resolved time window
#[derive(Clone, Debug)]
pub struct Element<T> {
    target: T,
    selector: String,

    // Authored values; a property is animated iff its target is present
    start_fraction: f64,
    end_fraction: f64,
    translate_x: Option<Length>,
    translate_y: Option<Length>,
    opacity: Option<f64>,
    scale: Option<f64>,
    rotate: Option<f64>,
    initial_opacity: f64,
    initial_scale: f64,
    initial_rotation: f64,

    // Resolved on layout, in pixels of local scroll time
    start_time: f64,
    end_time: f64,
    duration: f64,
    translate_x_px: f64,
    translate_y_px: f64,

    easing: EasingFn,
}

impl<T: Copy> Element<T> {
    pub(crate) fn new(target: T, desc: &ElementDescriptor, easing: EasingFn) -> Self {
        Self {
            target,
            selector: desc.selector.clone(),
            start_fraction: desc.start_fraction(),
            end_fraction: desc.end_fraction(),
            translate_x: desc.translate_x,
            translate_y: desc.translate_y,
            opacity: desc.opacity,
            scale: desc.scale,
            rotate: desc.rotate,
            initial_opacity: desc.initial_opacity.unwrap_or(DEFAULT_INITIAL_OPACITY),
            initial_scale: desc.initial_scale.unwrap_or(DEFAULT_INITIAL_SCALE),
            initial_rotation: desc.initial_rotation.unwrap_or(DEFAULT_INITIAL_ROTATION),
            start_time: 0.0,
            end_time: 0.0,
            duration: 0.0,
            translate_x_px: 0.0,
            translate_y_px: 0.0,
            easing,
        }
    }

    /// Resolve pixel deltas and the time window for the current viewport
    pub fn layout(&mut self, viewport_height: f64, viewport_width: f64, keyframe_duration_px: f64) {
        self.translate_x_px = to_pixels(self.translate_x, viewport_width);
        self.translate_y_px = to_pixels(self.translate_y, viewport_height);

        self.start_time = self.start_fraction * keyframe_duration_px;
        self.end_time = self.end_fraction * keyframe_duration_px;
        self.duration = self.end_time - self.start_time;
    }

    /// Write the style for local `time` unless it can be skipped.
    ///
    /// Without `force`, an element whose window has not been reached yet in
    /// the direction of travel keeps whatever was last written. Returns
    /// whether a style write happened.
    pub fn update<P>(
        &self,
        platform: &mut P,
        time: f64,
        total_duration: f64,
        is_scrolling_down: bool,
        force: bool,
    ) -> bool
    where
        P: Platform<Target = T>,
    {
        debug_assert!(self.end_time <= total_duration + f64::EPSILON * total_duration.abs());

        if !force && self.can_skip(time, is_scrolling_down) {
            return false;
        }

        let patch = self.style_at(time);
        if patch.is_empty() {
            return false;
        }
        platform.apply_style(self.target, &patch);
        true
    }

    fn can_skip(&self, time: f64, is_scrolling_down: bool) -> bool {
        (time < self.start_time && is_scrolling_down) || (time > self.end_time && !is_scrolling_down)
    }

    /// Compute the full style patch for local `time`
    pub fn style_at(&self, time: f64) -> StylePatch {
        let mut transform = Transform::new();
        if self.is_translate() {
            transform.push(TransformPart::Translate {
                x: self.calc_prop_value(self.translate_x_px, time, 0.0, true),
                y: self.calc_prop_value(self.translate_y_px, time, 0.0, true),
            });
        }
        if let Some(scale) = self.scale {
            transform.push(TransformPart::Scale(self.calc_prop_value(
                scale,
                time,
                self.initial_scale,
                false,
            )));
        }
        if let Some(rotate) = self.rotate {
            transform.push(TransformPart::Rotate(self.calc_prop_value(
                rotate,
                time,
                self.initial_rotation,
                false,
            )));
        }

        StylePatch {
            transform: (!transform.is_empty()).then_some(transform),
            opacity: self
                .opacity
                .map(|opacity| self.calc_prop_value(opacity, time, self.initial_opacity, false)),
        }
    }

    /// Windowed interpolation of a single property.
    ///
    /// `default_value` before the window, `target` from the window end on,
    /// eased in between. Only the eased part is rounded.
    pub fn calc_prop_value(&self, target: f64, time: f64, default_value: f64, round: bool) -> f64 {
        if time < self.start_time {
            return default_value;
        }
        // Also covers zero-length windows, where easing would divide by zero
        if time >= self.end_time {
            return target;
        }

        let value = (self.easing)(
            time - self.start_time,
            default_value,
            target - default_value,
            self.duration,
        );
        if round {
            round2(value)
        } else {
            value
        }
    }

    pub fn is_translate(&self) -> bool {
        self.translate_x.is_some() || self.translate_y.is_some()
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Resolved translation deltas `(x, y)` in pixels
    pub fn translate_px(&self) -> (f64, f64) {
        (self.translate_x_px, self.translate_y_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::DEFAULT_EASING;
    use parallax_platform::headless::HeadlessPlatform;
    use parallax_platform::Viewport;

    fn element(desc: ElementDescriptor) -> Element<u32> {
        let mut el = Element::new(7, &desc, DEFAULT_EASING);
        el.layout(800.0, 1000.0, 800.0);
        el
    }

    #[test]
    fn test_layout_resolves_window_and_deltas() {
        let el = element(
            ElementDescriptor::new(".name")
                .with_window(0.25, 0.75)
                .with_translate_x(Length::Percent(10.0))
                .with_translate_y(-150.0),
        );
        assert_eq!(el.start_time(), 200.0);
        assert_eq!(el.end_time(), 600.0);
        assert_eq!(el.duration(), 400.0);
        assert_eq!(el.translate_px(), (100.0, -150.0));
    }

    #[test]
    fn test_default_window_is_whole_keyframe() {
        let el = element(ElementDescriptor::new(".byline").with_opacity(0.0));
        assert_eq!(el.start_time(), 0.0);
        assert_eq!(el.end_time(), 800.0);
    }

    #[test]
    fn test_calc_prop_value_window_edges() {
        let el = element(ElementDescriptor::new("x").with_window(0.25, 0.75));
        assert_eq!(el.calc_prop_value(0.1, 100.0, 0.3, false), 0.3);
        assert_eq!(el.calc_prop_value(0.1, 200.0, 0.3, false), 0.3);
        assert_eq!(el.calc_prop_value(0.1, 600.0, 0.3, false), 0.1);
        assert_eq!(el.calc_prop_value(0.1, 700.0, 0.3, false), 0.1);

        let mid = el.calc_prop_value(1.0, 400.0, 0.0, false);
        assert!((mid - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_calc_prop_value_monotonic_both_directions() {
        let el = element(ElementDescriptor::new("x"));
        let mut up = el.calc_prop_value(2.0, 0.0, 1.0, false);
        let mut down = el.calc_prop_value(0.0, 0.0, 1.0, false);
        for t in (0..=800).step_by(8) {
            let u = el.calc_prop_value(2.0, t as f64, 1.0, false);
            let d = el.calc_prop_value(0.0, t as f64, 1.0, false);
            assert!(u >= up);
            assert!(d <= down);
            up = u;
            down = d;
        }
    }

    #[test]
    fn test_translation_is_rounded_but_scale_is_not() {
        let el = element(
            ElementDescriptor::new("x")
                .with_translate_y(-151.0)
                .with_scale(2.0),
        );
        let patch = el.style_at(123.0);
        let transform = patch.transform.unwrap();
        let (_, y) = transform.translate().unwrap();
        assert_eq!(y, round2(y));
        assert_ne!(y, -151.0);

        let expected = sine_scale(123.0);
        assert_eq!(transform.scale(), Some(expected));

        fn sine_scale(t: f64) -> f64 {
            crate::easing::sine_in_out(t, 1.0, 1.0, 800.0)
        }
    }

    #[test]
    fn test_style_at_order_and_initials() {
        let el = element(
            ElementDescriptor::new("x")
                .with_rotate(90.0)
                .with_scale(3.0)
                .with_translate_x(50.0)
                .with_opacity(0.0)
                .with_initial_opacity(0.5)
                .with_initial_scale(2.0)
                .with_initial_rotation(10.0),
        );
        let start = el.style_at(0.0);
        assert_eq!(
            start.transform_css().as_deref(),
            Some("translate3d(0px, 0px, 0) scale(2) rotate(10deg)")
        );
        assert_eq!(start.opacity, Some(0.5));

        let end = el.style_at(800.0);
        assert_eq!(
            end.transform_css().as_deref(),
            Some("translate3d(50px, 0px, 0) scale(3) rotate(90deg)")
        );
        assert_eq!(end.opacity, Some(0.0));
    }

    #[test]
    fn test_opacity_only_has_no_transform() {
        let el = element(ElementDescriptor::new("x").with_opacity(0.0));
        let patch = el.style_at(400.0);
        assert!(patch.transform.is_none());
        assert!(patch.opacity.is_some());
    }

    #[test]
    fn test_zero_length_window_jumps() {
        let el = element(ElementDescriptor::new("x").with_window(0.5, 0.5));
        assert_eq!(el.calc_prop_value(1.0, 399.0, 0.0, false), 0.0);
        assert_eq!(el.calc_prop_value(1.0, 400.0, 0.0, false), 1.0);
    }

    #[test]
    fn test_update_skip_rule() {
        let mut platform = HeadlessPlatform::new(Viewport::new(1000.0, 800.0));
        let node = platform.insert(None, "p", None, &[]).unwrap();
        let desc = ElementDescriptor::new("p")
            .with_window(0.5, 0.75)
            .with_opacity(0.0);
        let mut el = Element::new(node, &desc, DEFAULT_EASING);
        el.layout(800.0, 1000.0, 800.0);

        // Before the window going forward: skipped
        assert!(!el.update(&mut platform, 100.0, 800.0, true, false));
        // Before the window going backward: written
        assert!(el.update(&mut platform, 100.0, 800.0, false, false));
        // After the window going backward: skipped
        assert!(!el.update(&mut platform, 700.0, 800.0, false, false));
        // After the window going forward: written
        assert!(el.update(&mut platform, 700.0, 800.0, true, false));
        // Forced always writes
        assert!(el.update(&mut platform, 100.0, 800.0, true, true));

        assert_eq!(platform.writes().len(), 3);
        assert_eq!(platform.node(node).unwrap().opacity, Some(1.0));
    }

    #[test]
    fn test_update_without_properties_writes_nothing() {
        let mut platform = HeadlessPlatform::new(Viewport::new(1000.0, 800.0));
        let node = platform.insert(None, "p", None, &[]).unwrap();
        let el = Element::new(node, &ElementDescriptor::new("p"), DEFAULT_EASING);
        assert!(!el.update(&mut platform, 0.0, 0.0, true, true));
        assert!(platform.writes().is_empty());
    }
}
