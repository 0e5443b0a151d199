//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in playfield pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(min, size, color, color)
}

/// Axis-aligned rectangle fading from `top` to `bottom`
pub fn gradient_rect(min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Rectangle of `length` x `thickness` starting at `origin`, rotated by `angle`
/// around it (the long axis points along the angle)
pub fn rotated_rect(
    origin: Vec2,
    angle: f32,
    offset: Vec2,
    size: Vec2,
    color: [f32; 4],
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let corners = [
        offset,
        offset + Vec2::new(size.x, 0.0),
        offset + Vec2::new(0.0, size.y),
        offset + size,
    ]
    .map(|c| origin + rot.rotate(c));

    vec![
        Vertex::new(corners[0].x, corners[0].y, color),
        Vertex::new(corners[1].x, corners[1].y, color),
        Vertex::new(corners[2].x, corners[2].y, color),
        Vertex::new(corners[2].x, corners[2].y, color),
        Vertex::new(corners[1].x, corners[1].y, color),
        Vertex::new(corners[3].x, corners[3].y, color),
    ]
}

/// Thick line segment
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

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

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), WHITE);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_gradient_rect_colors_by_row() {
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        let v = gradient_rect(Vec2::ZERO, Vec2::new(10.0, 10.0), top, bottom);
        for vertex in &v {
            let expected = if vertex.position[1] == 0.0 { top } else { bottom };
            assert_eq!(vertex.color, expected);
        }
    }

    #[test]
    fn test_line_width() {
        let v = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, WHITE);
        assert_eq!(v.len(), 6);
        assert!(v.iter().all(|v| (v.position[1].abs() - 2.0).abs() < 1e-5));
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let v = rotated_rect(
            Vec2::ZERO,
            PI / 2.0,
            Vec2::ZERO,
            Vec2::new(10.0, 2.0),
            WHITE,
        );
        // Long axis now points down the y axis
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_vertex_count() {
        assert_eq!(ring(Vec2::ZERO, 5.0, 6.0, WHITE, 16).len(), 96);
    }
}
