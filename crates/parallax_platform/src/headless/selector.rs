//! Minimal selector grammar for the headless stage
//!
//! Supports descendant chains of compound selectors: `section#intro .name`,
//! `.intro-explain i`, `div.card.active`. Child combinators, attribute
//! selectors and pseudo-classes are not part of the grammar.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::error::{PlatformError, Result};

/// A single `#id` or `.class` part of a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorPart {
    Id(String),
    Class(String),
}

/// `tag#id.class` with every piece optional, but at least one present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub parts: Vec<SelectorPart>,
}

impl CompoundSelector {
    /// Check a node's tag, id and classes against this compound
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(t) = &self.tag {
            if !t.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.parts.iter().all(|part| match part {
            SelectorPart::Id(want) => id == Some(want.as_str()),
            SelectorPart::Class(want) => classes.iter().any(|c| c == want),
        })
    }
}

/// Compound selectors joined by descendant combinators, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub segments: Vec<CompoundSelector>,
}

impl Selector {
    /// Parse a selector string
    pub fn parse(input: &str) -> Result<Self> {
        match all_consuming(delimited(multispace0, complex_selector, multispace0))(input) {
            Ok((_, segments)) => Ok(Selector { segments }),
            Err(e) => Err(PlatformError::InvalidSelector {
                selector: input.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// The rightmost compound, i.e. the one the matched node itself must satisfy
    pub fn target(&self) -> &CompoundSelector {
        // segments is non-empty by construction
        &self.segments[self.segments.len() - 1]
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn selector_part(input: &str) -> IResult<&str, SelectorPart> {
    nom::branch::alt((
        map(preceded(char('#'), identifier), |id: &str| {
            SelectorPart::Id(id.to_string())
        }),
        map(preceded(char('.'), identifier), |class: &str| {
            SelectorPart::Class(class.to_string())
        }),
    ))(input)
}

fn compound_selector(input: &str) -> IResult<&str, CompoundSelector> {
    let (rest, (tag, parts)) = pair(opt(identifier), many0(selector_part))(input)?;
    if tag.is_none() && parts.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((
        rest,
        CompoundSelector {
            tag: tag.map(str::to_string),
            parts,
        },
    ))
}

fn complex_selector(input: &str) -> IResult<&str, Vec<CompoundSelector>> {
    separated_list1(multispace1, compound_selector)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let sel = Selector::parse("#intro").unwrap();
        assert_eq!(sel.segments.len(), 1);
        assert_eq!(sel.target().tag, None);
        assert_eq!(sel.target().parts, vec![SelectorPart::Id("intro".into())]);
    }

    #[test]
    fn test_parse_descendant_chain() {
        let sel = Selector::parse("  .intro-explain i ").unwrap();
        assert_eq!(sel.segments.len(), 2);
        assert_eq!(
            sel.segments[0].parts,
            vec![SelectorPart::Class("intro-explain".into())]
        );
        assert_eq!(sel.target().tag.as_deref(), Some("i"));
    }

    #[test]
    fn test_parse_compound() {
        let sel = Selector::parse("div#card.active.wide").unwrap();
        let target = sel.target();
        assert_eq!(target.tag.as_deref(), Some("div"));
        assert_eq!(target.parts.len(), 3);
        assert!(target.matches(
            "DIV",
            Some("card"),
            &["wide".to_string(), "active".to_string()]
        ));
        assert!(!target.matches("div", Some("card"), &["active".to_string()]));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(matches!(
            Selector::parse(".a:hover"),
            Err(PlatformError::InvalidSelector { .. })
        ));
    }
}
