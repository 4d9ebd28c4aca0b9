//! Style patches written to animated targets
//!
//! A [`StylePatch`] is the unit of output of the animation engine: one atomic
//! write carrying an optional transform and an optional opacity. Fields that
//! are `None` are left untouched on the target.

use std::fmt;

use smallvec::SmallVec;

/// One function in a transform list
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformPart {
    /// `translate3d(x px, y px, 0)`
    Translate { x: f64, y: f64 },
    /// `scale(s)`
    Scale(f64),
    /// `rotate(deg)`
    Rotate(f64),
}

impl fmt::Display for TransformPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformPart::Translate { x, y } => write!(f, "translate3d({x}px, {y}px, 0)"),
            TransformPart::Scale(s) => write!(f, "scale({s})"),
            TransformPart::Rotate(deg) => write!(f, "rotate({deg}deg)"),
        }
    }
}

/// Ordered transform list. Never holds more than translate, scale and rotate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform(SmallVec<[TransformPart; 3]>);

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, part: TransformPart) {
        self.0.push(part);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the translation part, if any
    pub fn translate(&self) -> Option<(f64, f64)> {
        self.0.iter().find_map(|p| match p {
            TransformPart::Translate { x, y } => Some((*x, *y)),
            _ => None,
        })
    }

    /// Look up the scale part, if any
    pub fn scale(&self) -> Option<f64> {
        self.0.iter().find_map(|p| match p {
            TransformPart::Scale(s) => Some(*s),
            _ => None,
        })
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// A single atomic style write
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StylePatch {
    pub transform: Option<Transform>,
    pub opacity: Option<f64>,
}

impl StylePatch {
    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.transform.is_none() && self.opacity.is_none()
    }

    /// The transform rendered as a CSS-style string
    pub fn transform_css(&self) -> Option<String> {
        self.transform.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_renders_in_push_order() {
        let mut t = Transform::new();
        t.push(TransformPart::Translate { x: 0.0, y: -150.0 });
        t.push(TransformPart::Scale(1.5));
        t.push(TransformPart::Rotate(45.0));
        assert_eq!(
            t.to_string(),
            "translate3d(0px, -150px, 0) scale(1.5) rotate(45deg)"
        );
    }

    #[test]
    fn test_single_part_has_no_leading_space() {
        let mut t = Transform::new();
        t.push(TransformPart::Scale(2.0));
        assert_eq!(t.to_string(), "scale(2)");
        assert_eq!(t.scale(), Some(2.0));
        assert_eq!(t.translate(), None);
    }

    #[test]
    fn test_empty_patch() {
        let patch = StylePatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.transform_css(), None);
    }
}
