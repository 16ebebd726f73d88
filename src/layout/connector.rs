use egui::{pos2, Pos2};
use std::f32::consts::PI;

/// Curve drawn between a parent and a child node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Connector {
    /// Cubic curve that leaves the parent flat and arrives steep.
    Organic { from: Pos2, to: Pos2 },
    /// Cubic curve with both control points on the vertical midpoint.
    Diagonal { from: Pos2, to: Pos2 },
    /// Clockwise half circle whose diameter is the parent-child chord.
    Arc { from: Pos2, to: Pos2 },
}

impl Connector {
    pub fn endpoints(&self) -> (Pos2, Pos2) {
        match *self {
            Self::Organic { from, to } | Self::Diagonal { from, to } | Self::Arc { from, to } => {
                (from, to)
            }
        }
    }

    /// Bezier control points, `None` for arcs.
    pub fn controls(&self) -> Option<[Pos2; 2]> {
        match *self {
            Self::Organic { from, to } => {
                let d = to - from;
                Some([
                    pos2(from.x + d.x * 0.2, from.y + d.y * 0.1),
                    pos2(from.x + d.x * 0.8, from.y + d.y * 0.9),
                ])
            }
            Self::Diagonal { from, to } => {
                let mid_y = (from.y + to.y) / 2.0;
                Some([pos2(from.x, mid_y), pos2(to.x, mid_y)])
            }
            Self::Arc { .. } => None,
        }
    }

    pub fn arc_radius(&self) -> Option<f32> {
        match *self {
            Self::Arc { from, to } => Some((to - from).length() * 0.5),
            _ => None,
        }
    }

    /// Polyline approximation with `segments + 1` points, first point at the
    /// parent and last at the child.
    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        let (from, to) = self.endpoints();
        let radius = self.arc_radius().unwrap_or_default();
        (0..=segments)
            .map(|step| {
                let t = step as f32 / segments as f32;
                match self.controls() {
                    Some([c1, c2]) => cubic_point(from, c1, c2, to, t),
                    None => arc_point(from, to, radius, t),
                }
            })
            .collect()
    }
}

fn cubic_point(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    pos2(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

// Screen space has y pointing down, so a growing angle turns clockwise.
fn arc_point(from: Pos2, to: Pos2, radius: f32, t: f32) -> Pos2 {
    let center = pos2((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    if radius <= f32::EPSILON {
        return from;
    }
    let start = (from.y - center.y).atan2(from.x - center.x);
    let angle = start + PI * t;
    pos2(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn organic_controls_follow_fixed_ratios() {
        let connector = Connector::Organic {
            from: pos2(0.0, 0.0),
            to: pos2(100.0, 200.0),
        };
        let [c1, c2] = connector.controls().expect("organic is a cubic");
        assert_abs_diff_eq!(c1.x, 20.0);
        assert_abs_diff_eq!(c1.y, 20.0);
        assert_abs_diff_eq!(c2.x, 80.0);
        assert_abs_diff_eq!(c2.y, 180.0);
    }

    #[test]
    fn diagonal_controls_share_the_vertical_midpoint() {
        let connector = Connector::Diagonal {
            from: pos2(10.0, 0.0),
            to: pos2(-30.0, 180.0),
        };
        let [c1, c2] = connector.controls().expect("diagonal is a cubic");
        assert_eq!(c1, pos2(10.0, 90.0));
        assert_eq!(c2, pos2(-30.0, 90.0));
    }

    #[test]
    fn samples_start_and_end_on_the_endpoints() {
        let from = pos2(-40.0, 15.0);
        let to = pos2(60.0, -85.0);
        for connector in [
            Connector::Organic { from, to },
            Connector::Diagonal { from, to },
            Connector::Arc { from, to },
        ] {
            let points = connector.sample(16);
            assert_eq!(points.len(), 17);
            assert_abs_diff_eq!(points[0].x, from.x, epsilon = 1e-3);
            assert_abs_diff_eq!(points[0].y, from.y, epsilon = 1e-3);
            assert_abs_diff_eq!(points[16].x, to.x, epsilon = 1e-3);
            assert_abs_diff_eq!(points[16].y, to.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn arc_is_a_clockwise_half_circle() {
        let connector = Connector::Arc {
            from: pos2(0.0, 0.0),
            to: pos2(100.0, 0.0),
        };
        assert_abs_diff_eq!(connector.arc_radius().unwrap_or_default(), 50.0);
        let points = connector.sample(2);
        // Halfway round, clockwise from the left end, sits above the chord.
        assert_abs_diff_eq!(points[1].x, 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(points[1].y, -50.0, epsilon = 1e-3);
    }
}
