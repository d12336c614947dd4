//! 数学基础类型
//!
//! 基于 nalgebra 的二维点/向量别名，以及轴对齐包围盒。

use serde::{Deserialize, Serialize};

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

/// 通用浮点容差
pub const EPSILON: f64 = 1e-10;

/// 完整圆周
pub const TAU: f64 = std::f64::consts::TAU;

/// 将角度归一化到 [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid 在极小负数上可能返回 TAU 本身
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// 二维轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// 空包围盒（min > max）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// 合并另一个包围盒
    pub fn union(&self, other: &BoundingBox2) -> BoundingBox2 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BoundingBox2::new(
            Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    /// 向四周扩展 margin
    pub fn inflate(&self, margin: f64) -> BoundingBox2 {
        BoundingBox2 {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-std::f64::consts::FRAC_PI_2) - 1.5 * std::f64::consts::PI).abs() < EPSILON);
        assert!((normalize_angle(TAU)).abs() < EPSILON);
        assert!((normalize_angle(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_bbox_union_with_empty() {
        let a = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 2.0));
        let merged = BoundingBox2::empty().union(&a);
        assert_eq!(merged, a);
        assert!(BoundingBox2::empty().is_empty());
        assert!(a.contains(&Point2::new(0.5, 1.5)));
        assert!(!a.inflate(0.1).contains(&Point2::new(1.2, 0.0)));
    }
}
