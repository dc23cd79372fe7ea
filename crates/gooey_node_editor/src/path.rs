// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection path geometry shared by drawing and hit-testing.

use crate::config::{ConnectionStyle, EditorConfig};
use egui::Pos2;

/// Polyline approximating the connection from `from` to `to`.
///
/// Straight connections are a single segment. Bezier connections use
/// horizontal tangents with a control distance of `curve_strength + |dx| / 10`.
pub fn connection_points(config: &EditorConfig, from: Pos2, to: Pos2) -> Vec<Pos2> {
    match config.connection_style {
        ConnectionStyle::Straight => vec![from, to],
        ConnectionStyle::Bezier => {
            let strength = config.curve_strength + (to.x - from.x).abs() / 10.0;
            let ctrl1 = Pos2::new(from.x + strength, from.y);
            let ctrl2 = Pos2::new(to.x - strength, to.y);
            bezier_points(from, ctrl1, ctrl2, to, config.bezier_segments.max(1))
        }
    }
}

/// Generate points along a cubic bezier curve
pub fn bezier_points(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, segments: usize) -> Vec<Pos2> {
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x;
        let y = mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y;

        points.push(Pos2::new(x, y));
    }
    points
}

/// Squared distance from a point to a line segment
fn distance_to_segment_sq(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.length_sq();
    if ab_len_sq < f32::EPSILON {
        return ap.length_sq();
    }

    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);
    (point - (a + t * ab)).length_sq()
}

/// Minimum distance from a point to a polyline
pub fn distance_to_polyline(point: Pos2, points: &[Pos2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => only.distance(point),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment_sq(point, w[0], w[1]))
            .fold(f32::INFINITY, f32::min)
            .sqrt(),
    }
}
