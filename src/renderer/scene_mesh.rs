//! Scene -> triangle list
//!
//! Layout nodes are drawn in order. A few named nodes get extra decoration:
//! the gauge gets its temperature zones, the knob a grip mark, and the core
//! glows with the temperature and the active event.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::scene::{KNOB_NODE, NodeShape, SceneLayout, SpriteNode};
use crate::sim::score::{CRITICAL_HIGH, CRITICAL_LOW, SAFE_MAX, SAFE_MIN};
use crate::sim::{EventMode, ReactorState, needle_target};

pub const GAUGE_NODE: &str = "gauge";
pub const CORE_NODE: &str = "core";

const CIRCLE_SEGMENTS: u32 = 48;
const HOT: [f32; 4] = [1.0, 0.3, 0.1, 1.0];

fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

/// Polar angle on the gauge dial for a temperature (needle 0 points up)
fn gauge_theta(temperature: f32) -> f32 {
    needle_target(temperature) + std::f32::consts::FRAC_PI_2
}

fn node_vertices(node: &SpriteNode, color: [f32; 4]) -> Vec<Vertex> {
    match node.shape {
        NodeShape::Circle => {
            shapes::circle(node.position, node.size.x / 2.0, color, CIRCLE_SEGMENTS)
        }
        NodeShape::Rect => {
            shapes::rect(node.position, node.size, node.anchor, node.z_rotation, color)
        }
    }
}

fn gauge_zones(center: Vec2, radius: f32) -> Vec<Vertex> {
    let zones = [
        (0.0, CRITICAL_LOW, colors::GAUGE_CRITICAL),
        (CRITICAL_LOW, SAFE_MIN, colors::GAUGE_WARNING),
        (SAFE_MIN, SAFE_MAX, colors::GAUGE_SAFE),
        (SAFE_MAX, CRITICAL_HIGH, colors::GAUGE_WARNING),
        (CRITICAL_HIGH, 1.0, colors::GAUGE_CRITICAL),
    ];

    let mut vertices = shapes::circle(center, radius * 0.95, colors::GAUGE_FACE, CIRCLE_SEGMENTS);
    for (from, to, color) in zones {
        vertices.extend(shapes::arc_band(
            center,
            radius * 0.78,
            radius * 0.92,
            gauge_theta(from),
            gauge_theta(to),
            color,
            12,
        ));
    }
    vertices
}

fn core_color(base: [f32; 4], state: &ReactorState) -> [f32; 4] {
    let heated = lerp_color(base, HOT, state.temperature);
    let glow = match state.mode.mode {
        EventMode::Normal => return heated,
        EventMode::Surge => colors::SURGE_GLOW,
        EventMode::CoolantLeak => colors::LEAK_GLOW,
    };
    let pulse = 0.5 * (1.0 + (state.time_secs() * 8.0).sin());
    lerp_color(heated, glow, pulse * 0.4)
}

/// Build the frame's vertices in scene coordinates
pub fn build_scene(layout: &SceneLayout, state: &ReactorState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for node in &layout.nodes {
        match node.name.as_str() {
            GAUGE_NODE => {
                vertices.extend(node_vertices(node, node.color));
                vertices.extend(gauge_zones(node.position, node.size.x / 2.0));
            }
            CORE_NODE => vertices.extend(node_vertices(node, core_color(node.color, state))),
            KNOB_NODE => {
                let radius = node.size.x / 2.0;
                vertices.extend(node_vertices(node, node.color));
                vertices.extend(shapes::ring(
                    node.position,
                    radius * 0.92,
                    radius,
                    colors::KNOB_MARK,
                    CIRCLE_SEGMENTS,
                ));
                // Grip mark near the rim, turning with the knob
                let mark_pos = node.position
                    + Vec2::from_angle(node.z_rotation + std::f32::consts::FRAC_PI_2) * radius * 0.7;
                vertices.extend(shapes::rect(
                    mark_pos,
                    Vec2::new(radius * 0.12, radius * 0.4),
                    Vec2::splat(0.5),
                    node.z_rotation,
                    colors::KNOB_MARK,
                ));
            }
            _ => vertices.extend(node_vertices(node, node.color)),
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNodes;

    #[test]
    fn test_gauge_theta_symmetry() {
        let up = std::f32::consts::FRAC_PI_2;
        assert!((gauge_theta(0.5) - up).abs() < 1e-6);
        assert!((gauge_theta(0.0) - up + gauge_theta(1.0) - up).abs() < 1e-5);
    }

    #[test]
    fn test_build_bundled_scene() {
        let mut layout = SceneLayout::bundled().unwrap();
        let nodes = SceneNodes::resolve(&layout).unwrap();
        let state = ReactorState::new(1, nodes.knob_center(&layout));
        nodes.apply(&mut layout, &state);

        let vertices = build_scene(&layout, &state);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);
        assert!(vertices.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_core_heats_up() {
        let mut state = ReactorState::new(1, Vec2::ZERO);
        let base = [0.1, 0.45, 0.9, 1.0];
        state.temperature = 0.0;
        assert_eq!(core_color(base, &state), base);
        state.temperature = 1.0;
        let hot = core_color(base, &state);
        assert!(hot.iter().zip(HOT).all(|(a, b)| (a - b).abs() < 1e-6));
    }
}
