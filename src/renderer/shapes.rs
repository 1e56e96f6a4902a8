//! Shape generation for 2D primitives
//!
//! Everything becomes a colored triangle list in playfield coordinates.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::scene::{Color, Drawable, Stroke};
use super::vertex::Vertex;

/// Triangles per full circle
const CIRCLE_SEGMENTS: u32 = 48;
/// Arc steps per rounded corner
const CORNER_SEGMENTS: u32 = 6;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(center: Vec2, size: Vec2, color: Color) -> Vec<Vertex> {
    let half = size / 2.0;
    let (l, r) = (center.x - half.x, center.x + half.x);
    let (t, b) = (center.y - half.y, center.y + half.y);
    vec![
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
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
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

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

/// Outline of a rounded rectangle, clockwise on screen, starting top-right
pub fn rounded_rect_points(center: Vec2, size: Vec2, radius: f32, corner_segments: u32) -> Vec<Vec2> {
    let half = size / 2.0;
    let radius = radius.clamp(0.0, half.x.min(half.y));
    let inner = half - Vec2::splat(radius);
    // Corner centers with the angle each corner arc starts at (y down)
    let corners = [
        (Vec2::new(inner.x, -inner.y), -FRAC_PI_2),
        (Vec2::new(inner.x, inner.y), 0.0),
        (Vec2::new(-inner.x, inner.y), FRAC_PI_2),
        (Vec2::new(-inner.x, -inner.y), PI),
    ];

    let steps = corner_segments.max(1);
    let mut points = Vec::with_capacity((4 * (steps + 1)) as usize);
    for (offset, start) in corners {
        for i in 0..=steps {
            let theta = start + (i as f32 / steps as f32) * FRAC_PI_2;
            points.push(center + offset + Vec2::new(theta.cos(), theta.sin()) * radius);
        }
    }
    points
}

/// Fill a convex polygon as a fan around its centroid
pub fn convex_fill(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(centroid.x, centroid.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}

/// Stroke a closed path with quads centered on each edge
///
/// Edges are extended by half the width so corners are covered.
pub fn outline(points: &[Vec2], stroke: Stroke) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let half = stroke.width / 2.0;
    let color = stroke.color;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let dir = (b - a).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let perp = Vec2::new(-dir.y, dir.x) * half;
        let a = a - dir * half;
        let b = b + dir * half;

        let (a1, a2, b1, b2) = (a + perp, a - perp, b + perp, b - perp);
        vertices.push(Vertex::new(a1.x, a1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b1.x, b1.y, color));

        vertices.push(Vertex::new(b1.x, b1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b2.x, b2.y, color));
    }
    vertices
}

/// Tessellate one drawable; text yields nothing (it lives in the DOM)
pub fn tessellate(drawable: &Drawable) -> Vec<Vertex> {
    match drawable {
        Drawable::Rect {
            center,
            size,
            fill,
            stroke,
        } => {
            let mut vertices = rect(*center, *size, *fill);
            if let Some(stroke) = stroke {
                let half = *size / 2.0;
                let corners = [
                    *center + Vec2::new(-half.x, -half.y),
                    *center + Vec2::new(half.x, -half.y),
                    *center + Vec2::new(half.x, half.y),
                    *center + Vec2::new(-half.x, half.y),
                ];
                vertices.extend(outline(&corners, *stroke));
            }
            vertices
        }
        Drawable::RoundedRect {
            center,
            size,
            radius,
            fill,
            stroke,
        } => {
            let points = rounded_rect_points(*center, *size, *radius, CORNER_SEGMENTS);
            let mut vertices = convex_fill(&points, *fill);
            if let Some(stroke) = stroke {
                vertices.extend(outline(&points, *stroke));
            }
            vertices
        }
        Drawable::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let mut vertices = circle(*center, *radius, *fill, CIRCLE_SEGMENTS);
            if let Some(stroke) = stroke {
                let half = stroke.width / 2.0;
                vertices.extend(ring(
                    *center,
                    (*radius - half).max(0.0),
                    *radius + half,
                    stroke.color,
                    CIRCLE_SEGMENTS,
                ));
            }
            vertices
        }
        Drawable::Text(_) => Vec::new(),
    }
}
