//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    arc_band(center, inner_radius, outer_radius, 0.0, 2.0 * PI, color, segments)
}

/// Generate vertices for a thick arc between two polar angles
/// (radians, CCW from +x)
pub fn arc_band(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    theta_start: f32,
    theta_end: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let span = theta_end - theta_start;
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = theta_start + span * (i as f32 / segments as f32);
        let theta2 = theta_start + span * ((i + 1) as f32 / segments as f32);

        let inner1 = center + Vec2::from_angle(theta1) * inner_radius;
        let outer1 = center + Vec2::from_angle(theta1) * outer_radius;
        let inner2 = center + Vec2::from_angle(theta2) * inner_radius;
        let outer2 = center + Vec2::from_angle(theta2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for a rectangle rotated around its anchor point.
/// `anchor` is in unit coordinates of the rectangle ((0.5, 0.5) = center).
pub fn rect(position: Vec2, size: Vec2, anchor: Vec2, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let min = -anchor * size;
    let max = (Vec2::ONE - anchor) * size;
    let rot = Vec2::from_angle(rotation);
    let corner = |x: f32, y: f32| {
        let p = position + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, color)
    };

    let bl = corner(min.x, min.y);
    let br = corner(max.x, min.y);
    let tr = corner(max.x, max.y);
    let tl = corner(min.x, max.y);

    vec![bl, br, tr, bl, tr, tl]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_vertex_counts() {
        assert_eq!(circle(Vec2::ZERO, 10.0, WHITE, 16).len(), 48);
        assert_eq!(ring(Vec2::ZERO, 5.0, 10.0, WHITE, 16).len(), 96);
        assert_eq!(rect(Vec2::ZERO, Vec2::ONE, Vec2::splat(0.5), 0.0, WHITE).len(), 6);
    }

    #[test]
    fn test_rect_rotation() {
        // A tall bar rotated a quarter turn CCW lies flat
        let verts = rect(Vec2::ZERO, Vec2::new(2.0, 10.0), Vec2::splat(0.5), PI / 2.0, WHITE);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = verts.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_x - 5.0).abs() < 1e-4);
        assert!((max_y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_bottom_anchor_pivots_at_base() {
        // Needle-style sprite: rotating a quarter turn CCW swings it to -x
        let verts = rect(Vec2::ZERO, Vec2::new(2.0, 10.0), Vec2::new(0.5, 0.0), PI / 2.0, WHITE);
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((min_x + 10.0).abs() < 1e-4);
        assert!(max_x.abs() < 1e-4);
    }

    #[test]
    fn test_arc_band_stays_in_radius() {
        let center = Vec2::new(3.0, -4.0);
        for v in arc_band(center, 20.0, 30.0, 0.2, 1.4, WHITE, 8) {
            let d = Vec2::from(v.position).distance(center);
            assert!((19.99..=30.01).contains(&d));
        }
    }
}
