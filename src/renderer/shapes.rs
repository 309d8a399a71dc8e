//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in canvas space.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::Color;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta1) * radius, color));
        vertices.push(Vertex::at(center + Vec2::from_angle(theta2) * radius, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);
        quad(
            &mut vertices,
            [
                center + d1 * inner_radius,
                center + d1 * outer_radius,
                center + d2 * outer_radius,
                center + d2 * inner_radius,
            ],
            color,
        );
    }

    vertices
}

/// Thick line segment as a quad
pub fn line(a: Vec2, b: Vec2, width: f32, color: Color) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, [a + perp, b + perp, b - perp, a - perp], color);
    vertices
}

/// Corners of a regular polygon. The first corner points along `rotation`.
pub fn polygon_points(center: Vec2, radius: f32, sides: u32, rotation: f32) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let theta = rotation + (i as f32 / sides as f32) * 2.0 * PI;
            center + Vec2::from_angle(theta) * radius
        })
        .collect()
}

/// Closed outline through `points`
pub fn outline(points: &[Vec2], width: f32, color: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.extend(line(a, b, width, color));
    }
    vertices
}

/// Filled convex polygon as a fan around its first point
pub fn fan(points: &[Vec2], color: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len().saturating_sub(2) * 3);
    for pair in points.windows(2).skip(1) {
        vertices.push(Vertex::at(points[0], color));
        vertices.push(Vertex::at(pair[0], color));
        vertices.push(Vertex::at(pair[1], color));
    }
    vertices
}

/// Dasher body: triangle pointing up (screen space), outlined
pub fn triangle_outline(center: Vec2, radius: f32, width: f32, color: Color) -> Vec<Vertex> {
    outline(&polygon_points(center, radius, 3, -FRAC_PI_2), width, color)
}

/// Tank body: axis-aligned square with half-extent `radius`, outlined
pub fn square_outline(center: Vec2, radius: f32, width: f32, color: Color) -> Vec<Vertex> {
    let corners = [
        center + Vec2::new(-radius, -radius),
        center + Vec2::new(radius, -radius),
        center + Vec2::new(radius, radius),
        center + Vec2::new(-radius, radius),
    ];
    outline(&corners, width, color)
}

/// Four-point arrow ship, nose toward `heading`.
///
/// In local space the nose is at (0, -r) and the tail notch at (0, r/2), so
/// the ship is rotated by heading + pi/2.
pub fn ship_points(center: Vec2, radius: f32, heading: f32) -> [Vec2; 4] {
    let rot = Vec2::from_angle(heading + FRAC_PI_2);
    let local = [
        Vec2::new(0.0, -radius),
        Vec2::new(radius, radius),
        Vec2::new(0.0, radius / 2.0),
        Vec2::new(-radius, radius),
    ];
    local.map(|p| center + rot.rotate(p))
}

/// Filled ship with an outline
pub fn ship(center: Vec2, radius: f32, heading: f32, fill: Color, edge: Color) -> Vec<Vertex> {
    let [nose, right, notch, left] = ship_points(center, radius, heading);
    // Concave, so two triangles sharing the nose-notch spine
    let mut vertices = vec![
        Vertex::at(nose, fill),
        Vertex::at(right, fill),
        Vertex::at(notch, fill),
        Vertex::at(nose, fill),
        Vertex::at(notch, fill),
        Vertex::at(left, fill),
    ];
    vertices.extend(outline(&[nose, right, notch, left], 2.0, edge));
    vertices
}

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: Color) {
    let [a, b, c, d] = corners;
    out.push(Vertex::at(a, color));
    out.push(Vertex::at(b, color));
    out.push(Vertex::at(c, color));
    out.push(Vertex::at(a, color));
    out.push(Vertex::at(c, color));
    out.push(Vertex::at(d, color));
}
