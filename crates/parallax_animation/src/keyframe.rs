//! Keyframes - one page section of a scroll scene
//!
//! A keyframe owns the elements animated while its section is on screen and
//! visits them in one of two orders: ascending window start when scrolling
//! down, descending when scrolling up. Both orders are stable, so elements
//! that open at the same time are visited in authoring order.

use parallax_platform::Platform;

use crate::descriptor::KeyframeDescriptor;
use crate::easing::EasingFn;
use crate::element::Element;
use crate::error::{Result, SceneError};

/// One section of the scene and its animated elements
#[derive(Clone, Debug)]
pub struct Keyframe<T> {
    section: T,
    selector: String,
    /// Authored length in viewport heights
    duration_fraction: f64,
    /// Resolved length in scroll pixels
    duration_px: f64,
    elements: Vec<Element<T>>,
    /// Element indices by ascending start time
    forward: Vec<usize>,
    /// Element indices by descending start time
    backward: Vec<usize>,
}

impl<T: Copy> Keyframe<T> {
    /// Resolve the section and every element target.
    ///
    /// Element selectors starting with `#` are looked up globally, all others
    /// inside the section.
    pub fn new<P>(platform: &mut P, desc: &KeyframeDescriptor, easing: EasingFn) -> Result<Self>
    where
        P: Platform<Target = T>,
    {
        desc.validate()?;

        let section =
            platform
                .resolve(&desc.selector, None)
                .ok_or_else(|| SceneError::UnresolvedTarget {
                    selector: desc.selector.clone(),
                    scope: None,
                })?;

        let elements = desc
            .animations
            .iter()
            .map(|anim| {
                let scope = if anim.selector.starts_with('#') {
                    None
                } else {
                    Some(section)
                };
                platform
                    .resolve(&anim.selector, scope)
                    .map(|target| Element::new(target, anim, easing))
                    .ok_or_else(|| SceneError::UnresolvedTarget {
                        selector: anim.selector.clone(),
                        scope: Some(desc.selector.clone()),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let order: Vec<usize> = (0..elements.len()).collect();
        Ok(Self {
            section,
            selector: desc.selector.clone(),
            duration_fraction: desc.duration,
            duration_px: 0.0,
            elements,
            forward: order.clone(),
            backward: order,
        })
    }

    /// Resolve pixel duration, lay out every element, rebuild both orders
    pub fn layout(&mut self, viewport_height: f64, viewport_width: f64) {
        self.duration_px = self.duration_fraction * viewport_height;
        for element in &mut self.elements {
            element.layout(viewport_height, viewport_width, self.duration_px);
        }

        let elements = &self.elements;
        // sort_by is stable; ties keep authoring order in both directions
        self.forward = (0..elements.len()).collect();
        self.forward
            .sort_by(|&a, &b| elements[a].start_time().total_cmp(&elements[b].start_time()));
        self.backward = (0..elements.len()).collect();
        self.backward
            .sort_by(|&a, &b| elements[b].start_time().total_cmp(&elements[a].start_time()));
    }

    /// Update every element at local `time`, in the order matching the direction
    pub fn update<P>(&self, platform: &mut P, time: f64, is_scrolling_down: bool, force: bool)
    where
        P: Platform<Target = T>,
    {
        let order = if is_scrolling_down {
            &self.forward
        } else {
            &self.backward
        };
        let mut written = 0usize;
        for &i in order {
            if self.elements[i].update(platform, time, self.duration_px, is_scrolling_down, force) {
                written += 1;
            }
        }
        tracing::trace!(
            keyframe = %self.selector,
            time,
            is_scrolling_down,
            force,
            written,
            skipped = order.len() - written,
            "keyframe update"
        );
    }

    pub fn show<P: Platform<Target = T>>(&self, platform: &mut P) {
        platform.set_visible(self.section, true);
    }

    pub fn hide<P: Platform<Target = T>>(&self, platform: &mut P) {
        platform.set_visible(self.section, false);
    }

    pub fn section(&self) -> T {
        self.section
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn duration_px(&self) -> f64 {
        self.duration_px
    }

    pub fn elements(&self) -> &[Element<T>] {
        &self.elements
    }

    /// Element indices visited when scrolling down
    pub fn forward_order(&self) -> &[usize] {
        &self.forward
    }

    /// Element indices visited when scrolling up
    pub fn backward_order(&self) -> &[usize] {
        &self.backward
    }
}
