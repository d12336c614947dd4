//! 闭式几何算法
//!
//! - 三点外接圆
//! - 三点圆弧的方向判定与细分
//! - Catmull-Rom 样条插值
//! - 圆/椭圆/正多边形的等角细分
//!
//! 这里的函数都是纯函数，不依赖实体管理器，方便单独测试。

use crate::math::{normalize_angle, Point2, Vector2, EPSILON, TAU};
use serde::{Deserialize, Serialize};

/// 三点共线判定阈值
pub const COLINEAR_EPSILON: f64 = 1e-10;

/// 圆弧最终细分段数
pub const ARC_SEGMENTS: usize = 50;

/// 圆/椭圆默认细分段数
pub const CIRCLE_SEGMENTS: usize = 64;

/// 样条每段的细分数
pub const SPLINE_SUBDIVISIONS: usize = 20;

/// 角度比较容差，吸收 atan2 的舍入误差
const ANGLE_EPSILON: f64 = 1e-9;

/// 计算三点外接圆，返回 (圆心, 半径)
///
/// 三点共线时返回 `None`，调用方应退化为两点直线段。
pub fn circumcircle(p1: Point2, p2: Point2, p3: Point2) -> Option<(Point2, f64)> {
    let (x1, y1) = (p1.x, p1.y);
    let (x2, y2) = (p2.x, p2.y);
    let (x3, y3) = (p3.x, p3.y);

    let a = x1 * (y2 - y3) - y1 * (x2 - x3) + x2 * y3 - x3 * y2;
    if a.abs() < COLINEAR_EPSILON {
        return None;
    }

    let s1 = x1 * x1 + y1 * y1;
    let s2 = x2 * x2 + y2 * y2;
    let s3 = x3 * x3 + y3 * y3;

    let b = (s1 * (y2 - y3) + s2 * (y3 - y1) + s3 * (y1 - y2)) / (2.0 * a);
    let c = (s1 * (x3 - x2) + s2 * (x1 - x3) + s3 * (x2 - x1)) / (2.0 * a);

    let center = Point2::new(b, c);
    let radius = (p1 - center).norm();
    Some((center, radius))
}

/// 由三点确定的圆弧参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularArc {
    pub center: Point2,
    pub radius: f64,
    /// 起点角度，[0, 2π)
    pub start_angle: f64,
    /// 经过点角度，[0, 2π)
    pub mid_angle: f64,
    /// 终点角度，[0, 2π)
    pub end_angle: f64,
    pub clockwise: bool,
}

impl CircularArc {
    /// 带符号的扫掠角：顺时针为负，逆时针为正
    pub fn sweep(&self) -> f64 {
        let mut sweep = self.end_angle - self.start_angle;
        if self.clockwise && sweep > 0.0 {
            sweep -= TAU;
        } else if !self.clockwise && sweep < 0.0 {
            sweep += TAU;
        }
        sweep
    }

    /// 弧长
    pub fn length(&self) -> f64 {
        self.sweep().abs() * self.radius
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// 从起点到终点等分细分，返回 `segments + 1` 个点
    pub fn tessellate(&self, segments: usize) -> Vec<Point2> {
        let segments = segments.max(1);
        let sweep = self.sweep();
        (0..=segments)
            .map(|i| {
                let angle = self.start_angle + sweep * (i as f64 / segments as f64);
                self.point_at_angle(angle)
            })
            .collect()
    }
}

/// 三点圆弧的拟合结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArcFit {
    Circular(CircularArc),
    /// 三点共线，退化为起点到终点的直线段
    Straight { start: Point2, end: Point2 },
}

impl ArcFit {
    pub fn is_straight(&self) -> bool {
        matches!(self, ArcFit::Straight { .. })
    }

    pub fn circular(&self) -> Option<&CircularArc> {
        match self {
            ArcFit::Circular(arc) => Some(arc),
            ArcFit::Straight { .. } => None,
        }
    }

    pub fn tessellate(&self, segments: usize) -> Vec<Point2> {
        match self {
            ArcFit::Circular(arc) => arc.tessellate(segments),
            ArcFit::Straight { start, end } => vec![*start, *end],
        }
    }
}

/// 用起点、经过点、终点拟合圆弧并判定方向
pub fn fit_arc(start: Point2, mid: Point2, end: Point2) -> ArcFit {
    let Some((center, radius)) = circumcircle(start, mid, end) else {
        tracing::trace!("colinear arc points, falling back to a straight segment");
        return ArcFit::Straight { start, end };
    };

    let angle_of = |p: Point2| normalize_angle((p.y - center.y).atan2(p.x - center.x));
    let start_angle = angle_of(start);
    let mid_angle = angle_of(mid);
    let end_angle = angle_of(end);

    let delta1 = normalize_angle(mid_angle - start_angle);
    let delta2 = normalize_angle(end_angle - mid_angle);
    let total = normalize_angle(end_angle - start_angle);

    // 逆时针走一圈经过 mid 时 delta1 + delta2 == total；
    // 否则正向路径必须绕过一整圈，真实方向是顺时针
    let clockwise = delta1 + delta2 > total + ANGLE_EPSILON;

    ArcFit::Circular(CircularArc {
        center,
        radius,
        start_angle,
        mid_angle,
        end_angle,
        clockwise,
    })
}

/// Catmull-Rom 单段求值，t ∈ [0, 1] 在 p1 与 p2 之间插值
pub fn catmull_rom_point(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let eval = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point2::new(eval(p0.x, p1.x, p2.x, p3.x), eval(p0.y, p1.y, p2.y, p3.y))
}

/// 整条 Catmull-Rom 曲线的细分
///
/// 端点处的邻居用首/尾控制点补齐。少于两个控制点时原样返回（不细分）。
pub fn catmull_rom(points: &[Point2], subdivisions: usize) -> Vec<Point2> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    let subdivisions = subdivisions.max(1);
    let at = |i: isize| points[i.clamp(0, n as isize - 1) as usize];

    let mut curve = Vec::with_capacity((n - 1) * subdivisions + 1);
    for i in 0..(n - 1) as isize {
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        for step in 0..subdivisions {
            let t = step as f64 / subdivisions as f64;
            curve.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }
    curve.push(points[n - 1]);
    curve
}

/// 等角细分：`segments` 个点，从角度 0 开始
pub fn regular_tessellation(center: Point2, radius_x: f64, radius_y: f64, segments: usize) -> Vec<Point2> {
    if segments == 0 {
        return Vec::new();
    }
    let step = TAU / segments as f64;
    (0..segments)
        .map(|i| {
            let theta = step * i as f64;
            Point2::new(center.x + radius_x * theta.cos(), center.y + radius_y * theta.sin())
        })
        .collect()
}

/// 点到过 a、b 的无限长直线的垂直距离
///
/// a、b 重合时退化为点到点距离。
pub fn distance_to_infinite_line(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dir = b - a;
    let len = dir.norm();
    if len < EPSILON {
        return (point - a).norm();
    }
    let w = point - a;
    (dir.x * w.y - dir.y * w.x).abs() / len
}

/// 点到线段的距离
pub fn distance_to_segment(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    let v = b - a;
    let w = point - a;

    let c1 = w.dot(&v);
    if c1 <= 0.0 {
        return (point - a).norm();
    }

    let c2 = v.dot(&v);
    if c2 <= c1 {
        return (point - b).norm();
    }

    let pb = a + v * (c1 / c2);
    (point - pb).norm()
}

/// 点到折线（按顺序连接各点）的最短距离
pub fn distance_to_path(point: &Point2, path: &[Point2], closed: bool) -> f64 {
    match path {
        [] => f64::MAX,
        [only] => (point - only).norm(),
        _ => {
            let open = path
                .windows(2)
                .map(|w| distance_to_segment(point, &w[0], &w[1]))
                .fold(f64::MAX, f64::min);
            if closed {
                let last = path[path.len() - 1];
                open.min(distance_to_segment(point, &last, &path[0]))
            } else {
                open
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point2, b: Point2, eps: f64) -> bool {
        (a - b).norm() < eps
    }

    #[test]
    fn test_circumcircle_equidistant() {
        let samples = [
            (Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(-1.0, 0.0)),
            (Point2::new(3.0, -2.0), Point2::new(7.5, 4.0), Point2::new(-1.25, 6.0)),
            (Point2::new(100.0, 100.0), Point2::new(100.1, 100.3), Point2::new(99.7, 100.2)),
        ];
        for (p1, p2, p3) in samples {
            let (center, radius) = circumcircle(p1, p2, p3).expect("non-colinear");
            for p in [p1, p2, p3] {
                assert!(((p - center).norm() - radius).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_circumcircle_colinear() {
        assert!(circumcircle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)).is_none());
        assert!(circumcircle(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), Point2::new(5.0, 1.0)).is_none());
    }

    #[test]
    fn test_fit_arc_colinear_degrades() {
        let start = Point2::new(0.0, 0.0);
        let end = Point2::new(4.0, 0.0);
        let fit = fit_arc(start, Point2::new(2.0, 0.0), end);
        assert_eq!(fit, ArcFit::Straight { start, end });
        assert_eq!(fit.tessellate(ARC_SEGMENTS), vec![start, end]);
    }

    #[test]
    fn test_fit_arc_counter_clockwise() {
        let fit = fit_arc(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(-1.0, 0.0));
        let arc = fit.circular().expect("circular");
        assert!(!arc.clockwise);
        assert!(close(arc.center, Point2::origin(), 1e-12));
        assert!((arc.radius - 1.0).abs() < 1e-12);
        assert!((arc.sweep() - std::f64::consts::PI).abs() < 1e-9);

        // 细分点经过上半圆
        let pts = arc.tessellate(ARC_SEGMENTS);
        assert_eq!(pts.len(), ARC_SEGMENTS + 1);
        assert!(close(pts[ARC_SEGMENTS / 2], Point2::new(0.0, 1.0), 1e-9));
    }

    #[test]
    fn test_fit_arc_clockwise() {
        let fit = fit_arc(Point2::new(1.0, 0.0), Point2::new(0.0, -1.0), Point2::new(-1.0, 0.0));
        let arc = fit.circular().expect("circular");
        assert!(arc.clockwise);
        assert!((arc.sweep() + std::f64::consts::PI).abs() < 1e-9);

        let pts = arc.tessellate(ARC_SEGMENTS);
        assert!(close(pts[0], Point2::new(1.0, 0.0), 1e-9));
        assert!(close(pts[ARC_SEGMENTS / 2], Point2::new(0.0, -1.0), 1e-9));
        assert!(close(pts[ARC_SEGMENTS], Point2::new(-1.0, 0.0), 1e-9));
    }

    #[test]
    fn test_fit_arc_wraps_past_zero() {
        // 起点在第四象限，逆时针经过 0° 到第一象限
        let fit = fit_arc(Point2::new(0.0, -1.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0));
        let arc = fit.circular().expect("circular");
        assert!(!arc.clockwise);
        assert!((arc.sweep() - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_catmull_rom_passes_through_controls() {
        let controls = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 1.0),
            Point2::new(4.0, 4.0),
        ];
        let curve = catmull_rom(&controls, SPLINE_SUBDIVISIONS);
        assert_eq!(curve.len(), 3 * SPLINE_SUBDIVISIONS + 1);
        for (i, c) in controls.iter().enumerate() {
            assert!(close(curve[i * SPLINE_SUBDIVISIONS], *c, 1e-12));
        }
    }

    #[test]
    fn test_catmull_rom_two_points_stays_on_segment() {
        // 两个控制点时 P0=P1、P3=P2：曲线落在线段上且单调前进，
        // 但参数化并非匀速（t=0.25 不在四分之一处）
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(5.0, 3.0);
        let curve = catmull_rom(&[a, b], SPLINE_SUBDIVISIONS);
        assert!(close(curve[0], a, 1e-12));
        assert!(close(*curve.last().unwrap(), b, 1e-12));

        let mut last_progress = -1.0;
        for p in &curve {
            assert!(distance_to_infinite_line(p, &a, &b) < 1e-9);
            let progress = (p - a).dot(&(b - a)) / (b - a).norm_squared();
            assert!(progress >= last_progress);
            assert!((0.0..=1.0 + 1e-12).contains(&progress));
            last_progress = progress;
        }

        let midpoint = catmull_rom_point(a, a, b, b, 0.5);
        assert!(close(midpoint, Point2::new(3.0, 2.0), 1e-12));
        let quarter = catmull_rom_point(a, a, b, b, 0.25);
        let quarter_progress = (quarter - a).dot(&(b - a)) / (b - a).norm_squared();
        assert!((quarter_progress - 0.2031250).abs() < 1e-9);
    }

    #[test]
    fn test_catmull_rom_short_inputs() {
        assert!(catmull_rom(&[], SPLINE_SUBDIVISIONS).is_empty());
        let single = [Point2::new(2.0, 2.0)];
        assert_eq!(catmull_rom(&single, SPLINE_SUBDIVISIONS), single.to_vec());
    }

    #[test]
    fn test_regular_hexagon() {
        let pts = regular_tessellation(Point2::origin(), 1.0, 1.0, 6);
        let h = 3f64.sqrt() / 2.0;
        let expected = [
            Point2::new(1.0, 0.0),
            Point2::new(0.5, h),
            Point2::new(-0.5, h),
            Point2::new(-1.0, 0.0),
            Point2::new(-0.5, -h),
            Point2::new(0.5, -h),
        ];
        assert_eq!(pts.len(), 6);
        for (p, e) in pts.iter().zip(expected) {
            assert!(close(*p, e, 1e-12));
        }
    }

    #[test]
    fn test_distance_helpers() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        // 无限长直线不考虑端点
        assert!((distance_to_infinite_line(&Point2::new(20.0, 3.0), &a, &b) - 3.0).abs() < EPSILON);
        // 线段距离考虑端点
        assert!((distance_to_segment(&Point2::new(13.0, 4.0), &a, &b) - 5.0).abs() < EPSILON);
        // 退化直线
        assert!((distance_to_infinite_line(&Point2::new(3.0, 4.0), &a, &a) - 5.0).abs() < EPSILON);
    }
}
