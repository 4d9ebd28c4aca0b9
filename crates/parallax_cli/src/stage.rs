//! Stage synthesis
//!
//! When no `[[node]]` list is given, a minimal document is derived from the
//! scene itself: one `section` per keyframe and one node per element
//! selector, nested the way the selectors require.

use anyhow::{anyhow, Result};
use parallax_animation::KeyframeDescriptor;
use parallax_platform::headless::{HeadlessPlatform, NodeId, Selector, SelectorPart};
use parallax_platform::Viewport;

/// Build a stage on which every selector of `scene` resolves
pub fn synthesize(viewport: Viewport, scene: &[KeyframeDescriptor]) -> Result<HeadlessPlatform> {
    let mut platform = HeadlessPlatform::new(viewport);
    for keyframe in scene {
        let section = ensure(&mut platform, &keyframe.selector, None, "section")?;
        for anim in &keyframe.animations {
            let scope = if anim.selector.starts_with('#') {
                None
            } else {
                Some(section)
            };
            ensure(&mut platform, &anim.selector, scope, "div")?;
        }
    }
    Ok(platform)
}

/// Resolve `selector`, inserting a matching chain of nodes if nothing matches
fn ensure(
    platform: &mut HeadlessPlatform,
    selector: &str,
    scope: Option<NodeId>,
    default_tag: &str,
) -> Result<NodeId> {
    if let Some(node) = platform.query(selector, scope)? {
        return Ok(node);
    }

    let parsed = Selector::parse(selector)?;
    let mut parent = scope;
    for compound in &parsed.segments {
        let mut id = None;
        let mut classes = Vec::new();
        for part in &compound.parts {
            match part {
                SelectorPart::Id(value) => id = Some(value.as_str()),
                SelectorPart::Class(value) => classes.push(value.as_str()),
            }
        }

        // An id already on stage anchors the rest of the chain
        if let Some(existing) = id.and_then(|id| platform.node_by_id(id)) {
            parent = Some(existing);
            continue;
        }

        let tag = compound.tag.as_deref().unwrap_or(default_tag);
        parent = Some(platform.insert(parent, tag, id, &classes)?);
    }

    let node = parent.ok_or_else(|| anyhow!("selector {selector:?} is empty"))?;
    tracing::debug!(selector, node = %platform.describe(node), "synthesized node");
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_animation::ElementDescriptor;

    #[test]
    fn test_every_selector_resolves() {
        let scene = vec![
            KeyframeDescriptor::new("#intro")
                .with_animation(ElementDescriptor::new(".name").with_opacity(0.0))
                .with_animation(ElementDescriptor::new(".intro-explain i").with_opacity(0.0))
                .with_animation(ElementDescriptor::new("#bg-fields").with_opacity(1.0)),
            KeyframeDescriptor::new("#lesson1")
                .with_animation(ElementDescriptor::new(".name").with_opacity(1.0)),
        ];
        let p = synthesize(Viewport::new(800.0, 600.0), &scene).unwrap();

        let intro = p.node_by_id("intro").unwrap();
        let lesson = p.node_by_id("lesson1").unwrap();
        assert_eq!(p.describe(intro), "section#intro");

        let icon = p.query(".intro-explain i", Some(intro)).unwrap().unwrap();
        assert_eq!(p.describe(icon), "i");

        // Same class under two sections gives two distinct nodes
        let a = p.query(".name", Some(intro)).unwrap().unwrap();
        let b = p.query(".name", Some(lesson)).unwrap().unwrap();
        assert_ne!(a, b);

        let bg = p.node_by_id("bg-fields").unwrap();
        assert_eq!(p.node(bg).unwrap().parent, None);
    }

    #[test]
    fn test_existing_id_is_reused() {
        let scene = vec![
            KeyframeDescriptor::new("#intro"),
            KeyframeDescriptor::new("#intro .late")
                .with_animation(ElementDescriptor::new("span").with_opacity(0.0)),
        ];
        let p = synthesize(Viewport::new(800.0, 600.0), &scene).unwrap();
        let intro = p.node_by_id("intro").unwrap();
        let late = p.query(".late", Some(intro)).unwrap().unwrap();
        assert!(p.query("span", Some(late)).unwrap().is_some());
    }

    #[test]
    fn test_invalid_selector_fails() {
        let scene = vec![KeyframeDescriptor::new("#intro > p")];
        assert!(synthesize(Viewport::new(800.0, 600.0), &scene).is_err());
    }
}
