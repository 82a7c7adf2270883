//! Easing curve evaluation and interpolation.
//!
//! Curves are CSS-style cubic beziers anchored at `(0, 0)` and `(1, 1)`.

use crate::config::BezierCurve;
use crate::modules::compositor::geometry::gezero;
use crate::modules::compositor::state::Rect;

// ============================================================================
// Interpolation
// ============================================================================

/// Linear interpolation between two values.
#[inline]
#[must_use]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 { (end - start).mul_add(t, start) }

/// Interpolates an integer coordinate. A factor of exactly 1 lands on `end`.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn lerp_i32(start: i32, end: i32, t: f64) -> i32 {
    lerp(f64::from(start), f64::from(end), t).round() as i32
}

/// Interpolates every edge of a rectangle.
///
/// Size never goes negative, even when an overshooting curve pushes a
/// shrinking box past its target.
#[must_use]
pub fn interpolate_rect(from: Rect, to: Rect, factor: f64) -> Rect {
    Rect::new(
        lerp_i32(from.x, to.x, factor),
        lerp_i32(from.y, to.y, factor),
        gezero(lerp_i32(from.width, to.width, factor)),
        gezero(lerp_i32(from.height, to.height, factor)),
    )
}

// ============================================================================
// Cubic Bezier
// ============================================================================

/// Evaluates the curve at `progress`.
///
/// Returns exactly 0 at or below 0 and exactly 1 at or above 1. In between the
/// value may overshoot `[0, 1]` for curves whose y control points do.
#[must_use]
pub fn evaluate(curve: BezierCurve, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let [x1, y1, x2, y2] = curve.0;
    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

/// One component of the curve at parameter `t`.
fn bezier_component(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Finds the curve parameter whose x equals `target_x`.
///
/// Newton-Raphson first; bisection when the slope flattens out.
fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut t = target_x;
    for _ in 0..8 {
        let x = bezier_component(x1, x2, t) - target_x;
        if x.abs() < EPSILON {
            return t;
        }

        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t = (t - x / dx).clamp(0.0, 1.0);
    }

    let (mut low, mut high) = (0.0, 1.0);
    t = target_x;
    for _ in 0..40 {
        let x = bezier_component(x1, x2, t);
        if (x - target_x).abs() < EPSILON {
            break;
        }
        if x < target_x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }

    t
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool { (a - b).abs() < 1e-4 }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < f64::EPSILON);
        assert!((lerp(50.0, 150.0, 0.25) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lerp_i32_exact_at_end() {
        assert_eq!(lerp_i32(-800, 100, 1.0), 100);
        assert_eq!(lerp_i32(-800, 100, 0.0), -800);
        assert_eq!(lerp_i32(0, 10, 0.5), 5);
    }

    #[test]
    fn test_interpolate_rect_overshoot_keeps_size_non_negative() {
        let from = Rect::new(0, 0, 1900, 1060);
        let to = Rect::new(100, 100, 100, 100);

        let shrunk = interpolate_rect(from, to, 1.1);
        assert_eq!(shrunk.x, 110);
        assert_eq!(shrunk.width, 0);
        assert_eq!(shrunk.height, 0);

        assert!(evaluate(BezierCurve([0.34, 1.56, 0.64, 1.0]), 0.7) > 1.0);
    }

    #[test]
    fn test_evaluate_boundaries() {
        let curve = BezierCurve::default();
        assert!(evaluate(curve, 0.0).abs() < f64::EPSILON);
        assert!((evaluate(curve, 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((evaluate(curve, 1.5) - 1.0).abs() < f64::EPSILON);
        assert!(evaluate(curve, -0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_linear_curve_is_identity() {
        for progress in [0.1, 0.25, 0.5, 0.9] {
            assert!(approx_eq(evaluate(BezierCurve::LINEAR, progress), progress));
        }
    }

    #[test]
    fn test_default_curve_eases_out() {
        let curve = BezierCurve::default();
        let early = evaluate(curve, 0.04);
        assert!(early > 0.04);
        assert!(early < 1.0);
        assert!(evaluate(curve, 0.5) > 0.5);
        assert!(evaluate(curve, 0.96) < 1.0);
    }

    #[test]
    fn test_ease_in_out_symmetry() {
        let curve = BezierCurve([0.42, 0.0, 0.58, 1.0]);
        assert!(approx_eq(evaluate(curve, 0.5), 0.5));
        assert!(approx_eq(evaluate(curve, 0.25) + evaluate(curve, 0.75), 1.0));
    }

    #[test]
    fn test_interpolate_rect() {
        let from = Rect::new(-800, 100, 800, 600);
        let to = Rect::new(100, 100, 800, 600);
        assert_eq!(interpolate_rect(from, to, 0.5), Rect::new(-350, 100, 800, 600));
        assert_eq!(interpolate_rect(from, to, 1.0), to);
    }
}
