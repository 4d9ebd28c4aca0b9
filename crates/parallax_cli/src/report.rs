//! `check` and `simulate` output

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};
use parallax_animation::{PlatformEvent, Scene};
use parallax_platform::headless::{HeadlessPlatform, NodeId};
use serde::Serialize;

/// One style write observed during a simulation, printed as a JSON line
#[derive(Debug, Serialize)]
pub struct WriteRecord<'a> {
    pub scroll: f64,
    pub keyframe: &'a str,
    pub selector: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Print keyframe offsets, element windows and the document extent
pub fn print_layout(scene: &Scene<HeadlessPlatform>, out: &mut impl Write) -> Result<()> {
    let viewport = scene.viewport();
    writeln!(out, "viewport {}x{}", viewport.width, viewport.height)?;

    for (i, (keyframe, offset)) in scene
        .keyframes()
        .iter()
        .zip(scene.keyframe_offsets())
        .enumerate()
    {
        writeln!(
            out,
            "keyframe {i} {}: offset {offset}px, duration {}px",
            keyframe.selector(),
            keyframe.duration_px()
        )?;
        for element in keyframe.elements() {
            writeln!(
                out,
                "  {} -> {}: window [{}, {}]px",
                element.selector(),
                scene.platform().describe(element.target()),
                element.start_time(),
                element.end_time()
            )?;
        }
    }
    writeln!(out, "total extent {}px", scene.total_extent())?;
    Ok(())
}

/// Scroll positions visited by a simulation
pub fn scroll_path(to: f64, step: f64, back: bool) -> Vec<f64> {
    let mut path = Vec::new();
    let mut pos = 0.0;
    while pos < to {
        pos = (pos + step).min(to);
        path.push(pos);
    }
    if back {
        while pos > 0.0 {
            pos = (pos - step).max(0.0);
            path.push(pos);
        }
    }
    path
}

/// Replay `path` against the scene, printing every style write
pub fn simulate(
    scene: &mut Scene<HeadlessPlatform>,
    path: &[f64],
    out: &mut impl Write,
) -> Result<usize> {
    // First element per target wins when several animate the same node
    let mut owners: HashMap<NodeId, (String, String)> = HashMap::new();
    for keyframe in scene.keyframes() {
        for element in keyframe.elements() {
            owners
                .entry(element.target())
                .or_insert_with(|| (keyframe.selector().to_string(), element.selector().to_string()));
        }
    }

    scene.platform_mut().take_writes();
    let mut written = 0;
    for &pos in path {
        scene.platform_mut().set_scroll(pos);
        scene.handle_event(PlatformEvent::Timer);
        scene.handle_event(PlatformEvent::Frame);

        let scroll = scene.scroll_pos();
        for write in scene.platform_mut().take_writes() {
            let Some((keyframe, selector)) = owners.get(&write.target) else {
                continue;
            };
            let record = WriteRecord {
                scroll,
                keyframe,
                selector,
                transform: write.patch.transform_css(),
                opacity: write.patch.opacity,
            };
            serde_json::to_writer(&mut *out, &record).context("Failed to encode write")?;
            writeln!(out)?;
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_animation::{ElementDescriptor, KeyframeDescriptor};
    use parallax_platform::Viewport;

    fn scene() -> Scene<HeadlessPlatform> {
        let descs = vec![
            KeyframeDescriptor::new("#intro")
                .with_animation(ElementDescriptor::new(".name").with_opacity(0.0)),
            KeyframeDescriptor::new("#outro").with_duration(0.5),
        ];
        let stage = crate::stage::synthesize(Viewport::new(400.0, 200.0), &descs).unwrap();
        Scene::new(descs, stage).unwrap()
    }

    #[test]
    fn test_scroll_path() {
        assert_eq!(scroll_path(25.0, 10.0, false), vec![10.0, 20.0, 25.0]);
        assert_eq!(
            scroll_path(20.0, 10.0, true),
            vec![10.0, 20.0, 10.0, 0.0]
        );
        assert!(scroll_path(0.0, 10.0, true).is_empty());
    }

    #[test]
    fn test_print_layout() {
        let mut out = Vec::new();
        print_layout(&scene(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "viewport 400x200\n\
             keyframe 0 #intro: offset 0px, duration 200px\n  \
             .name -> div.name: window [0, 200]px\n\
             keyframe 1 #outro: offset 200px, duration 100px\n\
             total extent 500px\n"
        );
    }

    #[test]
    fn test_simulate_prints_json_lines() {
        let mut scene = scene();
        let mut out = Vec::new();
        let written = simulate(&mut scene, &scroll_path(200.0, 100.0, false), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(written, lines.len());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["keyframe"], "#intro");
        assert_eq!(lines[0]["selector"], ".name");
        assert_eq!(lines[1]["scroll"], 200.0);
        assert_eq!(lines[1]["opacity"], 0.0);
        assert!(lines[0].get("transform").is_none());
    }
}
