//! Percent-or-pixel lengths
//!
//! Translations can be authored either as plain pixel numbers (`-150`) or as
//! a percentage of the viewport (`"50%"`). They are resolved to pixels on
//! every layout pass.

use std::fmt;

use nom::{
    character::complete::{char, multispace0},
    combinator::all_consuming,
    number::complete::double,
    sequence::{delimited, terminated},
    IResult,
};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// A length in pixels or as a percentage of a reference extent
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against `reference` (viewport width or height)
    pub fn to_pixels(self, reference: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => pct / 100.0 * reference,
        }
    }

    /// Parse `"<number>%"`, surrounding whitespace allowed
    pub fn parse_percent(input: &str) -> Option<Length> {
        all_consuming(percent)(input)
            .ok()
            .map(|(_, pct)| Length::Percent(pct))
    }
}

fn percent(input: &str) -> IResult<&str, f64> {
    delimited(multispace0, terminated(double, char('%')), multispace0)(input)
}

/// Resolve an optional authored length; absent means 0
pub fn to_pixels(value: Option<Length>, reference: f64) -> f64 {
    value.map_or(0.0, |v| v.to_pixels(reference))
}

impl From<f64> for Length {
    fn from(px: f64) -> Self {
        Length::Px(px)
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LengthVisitor;

        impl<'de> Visitor<'de> for LengthVisitor {
            type Value = Length;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a pixel number or a percentage string like \"50%\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Length, E> {
                Ok(Length::Px(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Length, E> {
                Ok(Length::Px(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Length, E> {
                Ok(Length::Px(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Length, E> {
                Length::parse_percent(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(LengthVisitor)
    }
}
