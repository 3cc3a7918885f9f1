//! Curved edge routing between node boxes.
//!
//! All coordinates are canvas percent, the same space as node positions.
//! Bends come from a hash of the edge id, so a given edge always takes the
//! same shape no matter how often it is rebuilt.

use std::fmt::Write as _;

use eframe::egui::{Pos2, Vec2, vec2};

use crate::util::stable_quad;

/// Clipped endpoints closer than this get a loop instead of a bow.
pub const CLOSE_PAIR_DISTANCE: f32 = 2.0;
const DEGENERATE_INSET: f32 = 1.2;
const MIN_CENTER_DISTANCE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBox {
    pub center: Pos2,
    pub half: Vec2,
}

impl NodeBox {
    pub fn new(center: Pos2, half: Vec2) -> Self {
        Self { center, half }
    }

    fn has_area(&self) -> bool {
        self.half.x.is_finite() && self.half.y.is_finite() && self.half.x > 0.0 && self.half.y > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveShape {
    Straight,
    Loop,
    Bow,
}

/// Whether an edge is drawn beneath the opaque node boxes or on top of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeLayer {
    Occluded,
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
    pub start: Pos2,
    pub control_a: Pos2,
    pub control_b: Pos2,
    pub end: Pos2,
    pub shape: CurveShape,
    /// +1 or -1: the side of the travel direction the curve bulges to.
    pub bend_sign: f32,
}

impl EdgeCurve {
    pub fn build(edge_id: &str, from: NodeBox, to: NodeBox) -> Self {
        let delta = to.center - from.center;
        let distance = delta.length();
        if !distance.is_finite() || distance < MIN_CENTER_DISTANCE {
            return Self::straight(from.center, to.center);
        }

        let direction = delta / distance;
        let normal = vec2(-direction.y, direction.x);
        let [bend, reach, lead, trail] = stable_quad(edge_id);
        let bend_sign = if bend < 0.5 { -1.0 } else { 1.0 };

        let start = from.center + direction * clip_distance(from, direction);
        let end = to.center - direction * clip_distance(to, direction);
        let clipped = end - start;

        let curve = if clipped.dot(direction) < CLOSE_PAIR_DISTANCE {
            let side = normal * bend_sign;
            let average_half = average_half_extent(from, to);
            let loop_reach = (average_half * (1.8 + reach * 1.4) + distance * 0.5) * (1.0 + trail * 0.15);
            let spread = average_half * (0.9 + lead * 0.8) + distance * 0.5;
            let apex = from.center + delta * 0.5 + side * loop_reach;

            Self {
                start: from.center + side * clip_distance(from, side),
                control_a: apex - direction * spread,
                control_b: apex + direction * spread,
                end: to.center + side * clip_distance(to, side),
                shape: CurveShape::Loop,
                bend_sign,
            }
        } else {
            let length = clipped.length();
            let magnitude = (length * (0.08 + reach * 0.14)).min(length * 0.25) * bend_sign;

            Self {
                start,
                control_a: start + clipped * (0.26 + lead * 0.08) + normal * magnitude,
                control_b: start
                    + clipped * (0.74 - trail * 0.08)
                    + normal * (magnitude * (0.65 + trail * 0.35)),
                end,
                shape: CurveShape::Bow,
                bend_sign,
            }
        };

        if curve.is_finite() {
            curve
        } else {
            Self::straight(from.center, to.center)
        }
    }

    fn straight(start: Pos2, end: Pos2) -> Self {
        let start = finite_or_origin(start);
        let end = finite_or_origin(end);
        Self {
            start,
            control_a: start.lerp(end, 1.0 / 3.0),
            control_b: start.lerp(end, 2.0 / 3.0),
            end,
            shape: CurveShape::Straight,
            bend_sign: 1.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.points().iter().all(|point| point.x.is_finite() && point.y.is_finite())
    }

    pub fn points(&self) -> [Pos2; 4] {
        [self.start, self.control_a, self.control_b, self.end]
    }

    pub fn chord_length(&self) -> f32 {
        (self.end - self.start).length()
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        (self.start.to_vec2() * (u * u * u)
            + self.control_a.to_vec2() * (3.0 * u * u * t)
            + self.control_b.to_vec2() * (3.0 * u * t * t)
            + self.end.to_vec2() * (t * t * t))
            .to_pos2()
    }

    /// Unit normal at `t`, pointing to the bend side of the travel direction.
    pub fn normal_at(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let tangent = (self.control_a - self.start) * (3.0 * u * u)
            + (self.control_b - self.control_a) * (6.0 * u * t)
            + (self.end - self.control_b) * (3.0 * t * t);
        let tangent = if tangent.length_sq() > f32::EPSILON {
            tangent
        } else {
            self.end - self.start
        };
        if tangent.length_sq() <= f32::EPSILON {
            return vec2(0.0, -1.0);
        }

        let tangent = tangent.normalized();
        vec2(-tangent.y, tangent.x) * self.bend_sign
    }

    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|step| self.point_at(step as f32 / segments as f32))
            .collect()
    }

    pub fn map_points(&self, transform: impl Fn(Pos2) -> Pos2) -> Self {
        Self {
            start: transform(self.start),
            control_a: transform(self.control_a),
            control_b: transform(self.control_b),
            end: transform(self.end),
            ..*self
        }
    }

    /// SVG-style path string, e.g. `M 10.00 20.00 C ...`.
    pub fn path_data(&self) -> String {
        let mut data = String::with_capacity(64);
        let _ = write!(
            data,
            "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            self.start.x,
            self.start.y,
            self.control_a.x,
            self.control_a.y,
            self.control_b.x,
            self.control_b.y,
            self.end.x,
            self.end.y
        );
        data
    }
}

/// Edges between boxes closer than their combined size are drawn over the
/// nodes so the short loop stays visible.
pub fn edge_layer(from: NodeBox, to: NodeBox) -> EdgeLayer {
    let reach = (from.half + to.half).length();
    let distance = (to.center - from.center).length();
    if distance.is_finite() && reach.is_finite() && distance < reach {
        EdgeLayer::Overlay
    } else {
        EdgeLayer::Occluded
    }
}

fn clip_distance(node: NodeBox, direction: Vec2) -> f32 {
    if !node.has_area() {
        return DEGENERATE_INSET;
    }

    let along_x = if direction.x.abs() > f32::EPSILON {
        node.half.x / direction.x.abs()
    } else {
        f32::INFINITY
    };
    let along_y = if direction.y.abs() > f32::EPSILON {
        node.half.y / direction.y.abs()
    } else {
        f32::INFINITY
    };

    let distance = along_x.min(along_y);
    if distance.is_finite() {
        distance
    } else {
        DEGENERATE_INSET
    }
}

fn average_half_extent(from: NodeBox, to: NodeBox) -> f32 {
    let mut total = 0.0;
    let mut count = 0.0;
    for node in [from, to] {
        if node.has_area() {
            total += node.half.x + node.half.y;
            count += 2.0;
        }
    }

    if count > 0.0 {
        total / count
    } else {
        DEGENERATE_INSET * 2.0
    }
}

fn finite_or_origin(point: Pos2) -> Pos2 {
    Pos2::new(
        if point.x.is_finite() { point.x } else { 0.0 },
        if point.y.is_finite() { point.y } else { 0.0 },
    )
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn node(x: f32, y: f32) -> NodeBox {
        NodeBox::new(pos2(x, y), vec2(4.0, 2.0))
    }

    #[test]
    fn same_id_gives_identical_path() {
        let a = EdgeCurve::build("xuan->qingming", node(50.0, 50.0), node(22.0, 22.0));
        let b = EdgeCurve::build("xuan->qingming", node(50.0, 50.0), node(22.0, 22.0));
        assert_eq!(a.path_data(), b.path_data());
        assert_eq!(a.shape, CurveShape::Bow);
    }

    #[test]
    fn endpoints_sit_on_box_borders() {
        let curve = EdgeCurve::build("a->b", node(10.0, 50.0), node(60.0, 50.0));
        assert!((curve.start.x - 14.0).abs() < 1e-4);
        assert!((curve.end.x - 56.0).abs() < 1e-4);
        assert!((curve.start.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn bow_stays_within_quarter_length() {
        let curve = EdgeCurve::build("a->b", node(10.0, 50.0), node(60.0, 50.0));
        let limit = curve.chord_length() * 0.25 + 1e-3;
        assert!((curve.control_a.y - 50.0).abs() <= limit);
        assert!((curve.control_b.y - 50.0).abs() <= limit);
    }

    #[test]
    fn zero_distance_falls_back_to_straight() {
        let curve = EdgeCurve::build("a->a", node(30.0, 30.0), node(30.0, 30.0));
        assert_eq!(curve.shape, CurveShape::Straight);
        assert!(!curve.path_data().contains("NaN"));
    }

    #[test]
    fn near_touching_nodes_get_a_visible_loop() {
        let curve = EdgeCurve::build("a->b", node(50.0, 50.0), node(52.0, 53.0));
        assert_eq!(curve.shape, CurveShape::Loop);
        let apex = curve.point_at(0.5);
        let mid = pos2(51.0, 51.5);
        assert!((apex - mid).length() > 2.0);
        assert_eq!(
            edge_layer(node(50.0, 50.0), node(52.0, 53.0)),
            EdgeLayer::Overlay
        );
    }

    #[test]
    fn degenerate_boxes_use_fixed_inset() {
        let from = NodeBox::new(pos2(10.0, 10.0), vec2(f32::NAN, 0.0));
        let to = NodeBox::new(pos2(40.0, 10.0), vec2(0.0, 0.0));
        let curve = EdgeCurve::build("x->y", from, to);
        assert!((curve.start.x - 11.2).abs() < 1e-4);
        assert!((curve.end.x - 38.8).abs() < 1e-4);
        assert!(curve.is_finite());
    }

    #[test]
    fn normal_points_to_bend_side() {
        let curve = EdgeCurve::build("a->b", node(10.0, 50.0), node(60.0, 50.0));
        let mid = curve.point_at(0.5);
        let bulge = mid.y - 50.0;
        let normal = curve.normal_at(0.5);
        assert!(bulge * normal.y > 0.0);
    }

    #[test]
    fn far_apart_nodes_are_occluded() {
        assert_eq!(
            edge_layer(node(10.0, 10.0), node(80.0, 80.0)),
            EdgeLayer::Occluded
        );
    }
}
