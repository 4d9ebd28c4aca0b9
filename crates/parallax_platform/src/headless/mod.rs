//! In-memory platform for tests and offline simulation
//!
//! [`HeadlessPlatform`] keeps a flat node tree, a scroll offset, a viewport and
//! a log of every style write. Nothing is rendered; hosts drive it by calling
//! [`HeadlessPlatform::set_scroll`] / [`HeadlessPlatform::resize`] and then
//! handing the matching [`PlatformEvent`](crate::PlatformEvent)s to the scene.

mod selector;

pub use selector::{CompoundSelector, Selector, SelectorPart};

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{PlatformError, Result};
use crate::platform::{Platform, Viewport};
use crate::style::StylePatch;

new_key_type! {
    /// Handle to a node in the headless stage
    pub struct NodeId;
}

/// A node in the headless stage
#[derive(Clone, Debug)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: SmallVec<[String; 4]>,
    pub parent: Option<NodeId>,
    pub visible: bool,
    /// Last transform written, as a CSS-style string
    pub transform: Option<String>,
    /// Last opacity written
    pub opacity: Option<f64>,
}

/// Declarative node description, as found in stage files
#[derive(Clone, Debug, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Id of the parent node; it must be declared earlier
    #[serde(default)]
    pub parent: Option<String>,
}

/// One recorded `apply_style` call
#[derive(Clone, Debug, PartialEq)]
pub struct StyleWrite {
    pub target: NodeId,
    pub patch: StylePatch,
}

/// Deterministic [`Platform`] implementation backed by plain data
#[derive(Debug)]
pub struct HeadlessPlatform {
    nodes: SlotMap<NodeId, Node>,
    /// Document order
    order: Vec<NodeId>,
    ids: FxHashMap<String, NodeId>,
    viewport: Viewport,
    scroll: f64,
    extent: Option<f64>,
    writes: Vec<StyleWrite>,
    resize_subscribed: bool,
    timer_period: Option<Duration>,
    timer_starts: u32,
    frame_requests: u32,
}

impl HeadlessPlatform {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            order: Vec::new(),
            ids: FxHashMap::default(),
            viewport,
            scroll: 0.0,
            extent: None,
            writes: Vec::new(),
            resize_subscribed: false,
            timer_period: None,
            timer_starts: 0,
            frame_requests: 0,
        }
    }

    /// Build a stage from node specs, resolving `parent` ids as it goes
    pub fn from_specs(viewport: Viewport, specs: &[NodeSpec]) -> Result<Self> {
        let mut platform = Self::new(viewport);
        for spec in specs {
            let parent = match &spec.parent {
                Some(pid) => Some(
                    platform
                        .node_by_id(pid)
                        .ok_or_else(|| PlatformError::UnknownParent(pid.clone()))?,
                ),
                None => None,
            };
            let classes: Vec<&str> = spec.classes.iter().map(String::as_str).collect();
            platform.insert(parent, &spec.tag, spec.id.as_deref(), &classes)?;
        }
        Ok(platform)
    }

    /// Append a node under `parent` (or at the root)
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> Result<NodeId> {
        if let Some(id) = id {
            if self.ids.contains_key(id) {
                return Err(PlatformError::DuplicateId(id.to_string()));
            }
        }
        let node = self.nodes.insert(Node {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent,
            visible: true,
            transform: None,
            opacity: None,
        });
        if let Some(id) = id {
            self.ids.insert(id.to_string(), node);
        }
        self.order.push(node);
        Ok(node)
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// First node in document order matching `selector`, restricted to
    /// strict descendants of `scope` when given
    pub fn query(&self, selector: &str, scope: Option<NodeId>) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .order
            .iter()
            .copied()
            .filter(|&n| scope.map_or(true, |s| self.is_descendant(n, s)))
            .find(|&n| self.matches(n, &selector)))
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cur = self.nodes[node].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes[p].parent;
        }
        false
    }

    fn matches_compound(&self, node: NodeId, compound: &CompoundSelector) -> bool {
        let n = &self.nodes[node];
        compound.matches(&n.tag, n.id.as_deref(), &n.classes)
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let (target, ancestors) = match selector.segments.split_last() {
            Some(split) => split,
            None => return false,
        };
        if !self.matches_compound(node, target) {
            return false;
        }
        // Descendant-only chains can be matched greedily, nearest ancestor first.
        let mut cur = self.nodes[node].parent;
        for compound in ancestors.iter().rev() {
            loop {
                match cur {
                    Some(p) if self.matches_compound(p, compound) => {
                        cur = self.nodes[p].parent;
                        break;
                    }
                    Some(p) => cur = self.nodes[p].parent,
                    None => return false,
                }
            }
        }
        true
    }

    /// Human-readable label for a node, e.g. `section#intro` or `p.name`
    pub fn describe(&self, node: NodeId) -> String {
        let Some(n) = self.nodes.get(node) else {
            return "<detached>".to_string();
        };
        let mut label = n.tag.clone();
        if let Some(id) = &n.id {
            label.push('#');
            label.push_str(id);
        }
        for class in &n.classes {
            label.push('.');
            label.push_str(class);
        }
        label
    }

    /// Simulate a user scroll. Clamped to the scrollable range once a
    /// document extent has been set.
    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = match self.extent {
            Some(extent) => offset.clamp(0.0, (extent - self.viewport.height).max(0.0)),
            None => offset.max(0.0),
        };
    }

    /// Simulate a viewport resize. The host still has to deliver the event.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.nodes.get(node).map_or(false, |n| n.visible)
    }

    pub fn writes(&self) -> &[StyleWrite] {
        &self.writes
    }

    /// Drain the write log
    pub fn take_writes(&mut self) -> Vec<StyleWrite> {
        std::mem::take(&mut self.writes)
    }

    /// Writes addressed to `node`, oldest first
    pub fn writes_to(&self, node: NodeId) -> impl Iterator<Item = &StylePatch> {
        self.writes
            .iter()
            .filter(move |w| w.target == node)
            .map(|w| &w.patch)
    }

    pub fn document_extent(&self) -> Option<f64> {
        self.extent
    }

    pub fn resize_subscribed(&self) -> bool {
        self.resize_subscribed
    }

    pub fn timer_period(&self) -> Option<Duration> {
        self.timer_period
    }

    /// How many times a timer was started
    pub fn timer_starts(&self) -> u32 {
        self.timer_starts
    }

    /// How many frames were requested so far
    pub fn frame_requests(&self) -> u32 {
        self.frame_requests
    }
}

impl Platform for HeadlessPlatform {
    type Target = NodeId;

    fn resolve(&mut self, selector: &str, scope: Option<NodeId>) -> Option<NodeId> {
        match self.query(selector, scope) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }

    fn apply_style(&mut self, target: NodeId, patch: &StylePatch) {
        if let Some(node) = self.nodes.get_mut(target) {
            if let Some(transform) = &patch.transform {
                node.transform = Some(transform.to_string());
            }
            if let Some(opacity) = patch.opacity {
                node.opacity = Some(opacity);
            }
        }
        self.writes.push(StyleWrite {
            target,
            patch: patch.clone(),
        });
    }

    fn set_visible(&mut self, target: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(target) {
            node.visible = visible;
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn scroll_to(&mut self, offset: f64) {
        self.set_scroll(offset);
    }

    fn set_document_extent(&mut self, extent: f64) {
        self.extent = Some(extent);
        // Re-clamp the current offset against the new range
        self.set_scroll(self.scroll);
    }

    fn subscribe_resize(&mut self) {
        self.resize_subscribed = true;
    }

    fn start_timer(&mut self, period: Duration) {
        self.timer_period = Some(period);
        self.timer_starts += 1;
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Transform, TransformPart};

    fn stage() -> (HeadlessPlatform, NodeId, NodeId) {
        let mut p = HeadlessPlatform::new(Viewport::new(800.0, 600.0));
        let intro = p.insert(None, "section", Some("intro"), &[]).unwrap();
        let explain = p
            .insert(Some(intro), "div", None, &["intro-explain"])
            .unwrap();
        p.insert(Some(explain), "i", None, &[]).unwrap();
        let lesson = p.insert(None, "section", Some("lesson1"), &[]).unwrap();
        p.insert(Some(lesson), "h1", None, &["name"]).unwrap();
        (p, intro, lesson)
    }

    #[test]
    fn test_query_by_id_and_descendant() {
        let (p, intro, _) = stage();
        assert_eq!(p.query("#intro", None).unwrap(), Some(intro));

        let i = p.query(".intro-explain i", None).unwrap().unwrap();
        assert_eq!(p.node(i).unwrap().tag, "i");
        assert_eq!(p.query("#lesson1 i", None).unwrap(), None);
    }

    #[test]
    fn test_query_respects_scope() {
        let (p, intro, lesson) = stage();
        assert!(p.query(".name", Some(lesson)).unwrap().is_some());
        assert_eq!(p.query(".name", Some(intro)).unwrap(), None);
        // The scope itself is not a candidate
        assert_eq!(p.query("#intro", Some(intro)).unwrap(), None);
    }

    #[test]
    fn test_resolve_invalid_selector_is_none() {
        let (mut p, _, _) = stage();
        assert_eq!(p.resolve("div > p", None), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (mut p, _, _) = stage();
        assert_eq!(
            p.insert(None, "div", Some("intro"), &[]),
            Err(PlatformError::DuplicateId("intro".into()))
        );
    }

    #[test]
    fn test_from_specs_unknown_parent() {
        let specs = vec![NodeSpec {
            tag: "p".into(),
            id: None,
            classes: vec![],
            parent: Some("missing".into()),
        }];
        let err = HeadlessPlatform::from_specs(Viewport::new(1.0, 1.0), &specs).unwrap_err();
        assert_eq!(err, PlatformError::UnknownParent("missing".into()));
    }

    #[test]
    fn test_apply_style_merges_fields() {
        let (mut p, intro, _) = stage();
        let mut transform = Transform::new();
        transform.push(TransformPart::Scale(2.0));
        p.apply_style(
            intro,
            &StylePatch {
                transform: Some(transform),
                opacity: Some(0.5),
            },
        );
        p.apply_style(
            intro,
            &StylePatch {
                transform: None,
                opacity: Some(1.0),
            },
        );

        let node = p.node(intro).unwrap();
        assert_eq!(node.transform.as_deref(), Some("scale(2)"));
        assert_eq!(node.opacity, Some(1.0));
        assert_eq!(p.writes_to(intro).count(), 2);
    }

    #[test]
    fn test_scroll_clamped_to_extent() {
        let (mut p, _, _) = stage();
        p.set_document_extent(1000.0);
        p.set_scroll(5000.0);
        assert_eq!(p.scroll_offset(), 400.0);
        p.set_scroll(-3.0);
        assert_eq!(p.scroll_offset(), 0.0);
    }

    #[test]
    fn test_describe() {
        let (p, intro, _) = stage();
        assert_eq!(p.describe(intro), "section#intro");
        let i = p.query("div", None).unwrap().unwrap();
        assert_eq!(p.describe(i), "div.intro-explain");
    }
}
