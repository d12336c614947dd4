//! 几何图元定义
//!
//! 支持的图元：
//! - 点 (Point)
//! - 线段 (Line)
//! - 多段线 (Polyline)
//! - 圆 (Circle)
//! - 圆弧 (Arc)
//! - 椭圆 (Ellipse)
//! - 正多边形 (Polygon)
//! - 矩形 (Rectangle)
//! - 样条曲线 (Spline)
//! - 文本 (Text)
//!
//! 线段、多段线、圆弧和样条不直接保存坐标，而是引用已注册的点实体
//! （`EntityId`），点移动时这些图元随之变化。圆弧和样条带有派生缓存，
//! 由 `EntityManager` 在引用的点变化后调用 [`Geometry::rederive`] 刷新。

use crate::algorithms::{
    catmull_rom, distance_to_infinite_line, distance_to_path, fit_arc, regular_tessellation,
    ArcFit, ARC_SEGMENTS, CIRCLE_SEGMENTS, SPLINE_SUBDIVISIONS,
};
use crate::entity::EntityId;
use crate::error::{CoreError, CoreResult};
use crate::math::{BoundingBox2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 按 ID 解析点实体坐标
pub trait PointResolver {
    fn resolve(&self, id: EntityId) -> Option<Point2>;

    /// 解析全部 ID，任一缺失则返回 `None`
    fn resolve_all(&self, ids: &[EntityId]) -> Option<Vec<Point2>> {
        ids.iter().map(|id| self.resolve(*id)).collect()
    }
}

/// 可绘制的轮廓（折线）
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Point2>,
    pub closed: bool,
}

/// 点击测试容差
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTolerance {
    /// 线类图元（世界坐标）
    pub edge: f64,
    /// 点图元（世界坐标）
    pub point: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            edge: 0.0125,
            point: 0.0,
        }
    }
}

/// 几何类型枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Polyline(Polyline),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Polygon(Polygon),
    Rectangle(Rectangle),
    Spline(Spline),
    Text(Text),
}

impl Geometry {
    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Ellipse(_) => "Ellipse",
            Geometry::Polygon(_) => "Polygon",
            Geometry::Rectangle(_) => "Rectangle",
            Geometry::Spline(_) => "Spline",
            Geometry::Text(_) => "Text",
        }
    }

    /// 引用的点实体（按定义顺序）
    pub fn point_refs(&self) -> Vec<EntityId> {
        match self {
            Geometry::Line(l) => vec![l.start, l.end],
            Geometry::Polyline(pl) => pl.vertices.clone(),
            Geometry::Arc(a) => vec![a.start, a.mid, a.end],
            Geometry::Spline(s) => s.control_points.clone(),
            _ => Vec::new(),
        }
    }

    pub fn references(&self, id: EntityId) -> bool {
        match self {
            Geometry::Line(l) => l.start == id || l.end == id,
            Geometry::Polyline(pl) => pl.vertices.contains(&id),
            Geometry::Arc(a) => a.start == id || a.mid == id || a.end == id,
            Geometry::Spline(s) => s.control_points.contains(&id),
            _ => false,
        }
    }

    /// 用引用点的最新坐标刷新派生数据
    ///
    /// `points` 与 [`Geometry::point_refs`] 一一对应。
    pub fn rederive(&mut self, points: &[Point2]) {
        match self {
            Geometry::Arc(a) => {
                if let [start, mid, end] = points {
                    a.fit = fit_arc(*start, *mid, *end);
                }
            }
            Geometry::Spline(s) => s.rebuild(points),
            _ => {}
        }
    }

    /// 平移自身持有的坐标（引用的点由管理器平移）
    pub fn translate_owned(&mut self, delta: Vector2) {
        match self {
            Geometry::Point(p) => p.position += delta,
            Geometry::Circle(c) => c.center += delta,
            Geometry::Ellipse(e) => e.center += delta,
            Geometry::Polygon(pg) => pg.translate(delta),
            Geometry::Rectangle(r) => {
                r.corner_a += delta;
                r.corner_b += delta;
            }
            Geometry::Text(t) => t.position += delta,
            Geometry::Line(_) | Geometry::Polyline(_) | Geometry::Arc(_) | Geometry::Spline(_) => {}
        }
    }

    /// 轮廓折线；点和文本没有轮廓
    pub fn outline(&self, points: &dyn PointResolver) -> Option<Outline> {
        let outline = match self {
            Geometry::Point(_) | Geometry::Text(_) => return None,
            Geometry::Line(l) => Outline {
                points: points.resolve_all(&[l.start, l.end])?,
                closed: false,
            },
            Geometry::Polyline(pl) => Outline {
                points: points.resolve_all(&pl.vertices)?,
                closed: pl.closed,
            },
            Geometry::Circle(c) => Outline {
                points: c.tessellate(CIRCLE_SEGMENTS),
                closed: true,
            },
            Geometry::Arc(a) => Outline {
                points: a.fit.tessellate(ARC_SEGMENTS),
                closed: false,
            },
            Geometry::Ellipse(e) => Outline {
                points: e.tessellate(CIRCLE_SEGMENTS),
                closed: true,
            },
            Geometry::Polygon(pg) => Outline {
                points: pg.vertices.clone(),
                closed: true,
            },
            Geometry::Rectangle(r) => Outline {
                points: r.corners().to_vec(),
                closed: true,
            },
            Geometry::Spline(s) => Outline {
                points: s.curve.clone(),
                closed: false,
            },
        };
        Some(outline)
    }

    /// 检查点是否落在图元上
    ///
    /// 线段、多段线、多边形和矩形按“到无限长直线的垂直距离”判定；
    /// 曲线按到细分折线的距离判定。
    pub fn hit(&self, point: &Point2, tolerance: HitTolerance, points: &dyn PointResolver) -> bool {
        match self {
            Geometry::Point(p) => (p.position - point).norm() <= tolerance.point,
            Geometry::Line(l) => match (points.resolve(l.start), points.resolve(l.end)) {
                (Some(a), Some(b)) => distance_to_infinite_line(point, &a, &b) <= tolerance.edge,
                _ => false,
            },
            Geometry::Polyline(pl) => points
                .resolve_all(&pl.vertices)
                .is_some_and(|v| edges_hit(point, &v, pl.closed, tolerance.edge)),
            Geometry::Polygon(pg) => edges_hit(point, &pg.vertices, true, tolerance.edge),
            Geometry::Rectangle(r) => edges_hit(point, &r.corners(), true, tolerance.edge),
            Geometry::Circle(c) => ((point - c.center).norm() - c.radius).abs() <= tolerance.edge,
            Geometry::Text(t) => t.bounding_box().inflate(tolerance.edge).contains(point),
            Geometry::Arc(_) | Geometry::Ellipse(_) | Geometry::Spline(_) => self
                .outline(points)
                .is_some_and(|o| distance_to_path(point, &o.points, o.closed) <= tolerance.edge),
        }
    }

    /// 包围盒
    pub fn bounding_box(&self, points: &dyn PointResolver) -> BoundingBox2 {
        match self {
            Geometry::Point(p) => BoundingBox2::new(p.position, p.position),
            Geometry::Text(t) => t.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Ellipse(e) => e.bounding_box(),
            _ => self
                .outline(points)
                .map(|o| BoundingBox2::from_points(o.points))
                .unwrap_or_else(BoundingBox2::empty),
        }
    }

    /// 不需要解析引用时的包围盒（引用型图元返回空）
    pub fn own_bounding_box(&self) -> BoundingBox2 {
        match self {
            Geometry::Point(p) => BoundingBox2::new(p.position, p.position),
            Geometry::Text(t) => t.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Ellipse(e) => e.bounding_box(),
            Geometry::Polygon(pg) => BoundingBox2::from_points(pg.vertices.iter().copied()),
            Geometry::Rectangle(r) => BoundingBox2::new(r.corner_a, r.corner_b),
            Geometry::Line(_) | Geometry::Polyline(_) | Geometry::Arc(_) | Geometry::Spline(_) => {
                BoundingBox2::empty()
            }
        }
    }
}

/// 任一条边（按无限长直线）在容差内即命中
fn edges_hit(point: &Point2, vertices: &[Point2], closed: bool, tolerance: f64) -> bool {
    let open = vertices
        .windows(2)
        .any(|w| distance_to_infinite_line(point, &w[0], &w[1]) <= tolerance);
    if open || !closed || vertices.len() < 3 {
        return open;
    }
    let last = vertices[vertices.len() - 1];
    distance_to_infinite_line(point, &last, &vertices[0]) <= tolerance
}

/// 点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Point2,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
        }
    }

    pub fn from_point2(position: Point2) -> Self {
        Self { position }
    }
}

/// 线段，两端引用点实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: EntityId,
    pub end: EntityId,
}

impl Line {
    pub fn new(start: EntityId, end: EntityId) -> Self {
        Self { start, end }
    }

    /// 线段长度
    pub fn length(&self, points: &dyn PointResolver) -> Option<f64> {
        Some((points.resolve(self.end)? - points.resolve(self.start)?).norm())
    }
}

/// 多段线：第 i 段连接第 i 和第 i+1 个顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<EntityId>,
    /// 是否闭合（交互绘制的多段线总是开放的，DXF 可能导入闭合的）
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<EntityId>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn push(&mut self, vertex: EntityId) {
        self.vertices.push(vertex);
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// 去掉最后一段（即最后一个顶点），返回被移除的顶点
    pub fn trim_last_segment(&mut self) -> Option<EntityId> {
        if self.vertices.len() < 2 {
            return None;
        }
        self.vertices.pop()
    }

    /// 总长度
    pub fn length(&self, points: &dyn PointResolver) -> Option<f64> {
        let pts = points.resolve_all(&self.vertices)?;
        let mut total: f64 = pts.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        if self.closed && pts.len() > 2 {
            total += (pts[0] - pts[pts.len() - 1]).norm();
        }
        Some(total)
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
    }

    /// 计算周长
    pub fn circumference(&self) -> f64 {
        std::f64::consts::TAU * self.radius
    }

    pub fn tessellate(&self, segments: usize) -> Vec<Point2> {
        regular_tessellation(self.center, self.radius, self.radius, segments)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 三点圆弧
///
/// 起点、经过点、终点引用点实体；圆心、半径、角度和方向都从这三点派生。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub start: EntityId,
    pub mid: EntityId,
    pub end: EntityId,
    pub fit: ArcFit,
}

impl Arc {
    pub fn new(ids: [EntityId; 3], positions: [Point2; 3]) -> Self {
        let [start, mid, end] = ids;
        let [p1, p2, p3] = positions;
        Self {
            start,
            mid,
            end,
            fit: fit_arc(p1, p2, p3),
        }
    }

    pub fn center(&self) -> Option<Point2> {
        self.fit.circular().map(|a| a.center)
    }

    pub fn radius(&self) -> Option<f64> {
        self.fit.circular().map(|a| a.radius)
    }

    pub fn is_clockwise(&self) -> bool {
        self.fit.circular().is_some_and(|a| a.clockwise)
    }

    /// 弧长；退化为直线时为弦长
    pub fn length(&self) -> f64 {
        match &self.fit {
            ArcFit::Circular(a) => a.length(),
            ArcFit::Straight { start, end } => (end - start).norm(),
        }
    }
}

/// 轴对齐椭圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point2,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center: Point2, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x: radius_x.max(0.0),
            radius_y: radius_y.max(0.0),
        }
    }

    pub fn set_radii(&mut self, radius_x: f64, radius_y: f64) {
        self.radius_x = radius_x.max(0.0);
        self.radius_y = radius_y.max(0.0);
    }

    pub fn tessellate(&self, segments: usize) -> Vec<Point2> {
        regular_tessellation(self.center, self.radius_x, self.radius_y, segments)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius_x, self.center.y - self.radius_y),
            Point2::new(self.center.x + self.radius_x, self.center.y + self.radius_y),
        )
    }
}

/// 正多边形，顶点随半径和边数重新计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub center: Point2,
    num_sides: usize,
    radius: f64,
    pub vertices: Vec<Point2>,
}

impl Polygon {
    pub const MIN_SIDES: usize = 3;
    pub const MAX_SIDES: usize = 1024;

    /// 边数须在 `MIN_SIDES..=MAX_SIDES` 内
    pub fn check_sides(num_sides: usize) -> CoreResult<usize> {
        if (Self::MIN_SIDES..=Self::MAX_SIDES).contains(&num_sides) {
            Ok(num_sides)
        } else {
            Err(CoreError::InvalidPolygonSides(num_sides))
        }
    }

    pub fn new(center: Point2, num_sides: usize, radius: f64) -> CoreResult<Self> {
        Self::check_sides(num_sides)?;
        let mut polygon = Self {
            center,
            num_sides,
            radius: radius.max(0.0),
            vertices: Vec::new(),
        };
        polygon.rebuild();
        Ok(polygon)
    }

    pub fn num_sides(&self) -> usize {
        self.num_sides
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
        self.rebuild();
    }

    pub fn set_num_sides(&mut self, num_sides: usize) -> CoreResult<()> {
        Self::check_sides(num_sides)?;
        self.num_sides = num_sides;
        self.rebuild();
        Ok(())
    }

    fn translate(&mut self, delta: Vector2) {
        self.center += delta;
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    fn rebuild(&mut self) {
        self.vertices = regular_tessellation(self.center, self.radius, self.radius, self.num_sides);
    }
}

/// 矩形，由两个对角点确定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub corner_a: Point2,
    pub corner_b: Point2,
}

impl Rectangle {
    pub fn new(corner_a: Point2, corner_b: Point2) -> Self {
        Self { corner_a, corner_b }
    }

    /// 四个角点，从 corner_a 开始按 a → (b.x, a.y) → b → (a.x, b.y) 的顺序
    pub fn corners(&self) -> [Point2; 4] {
        let (a, b) = (self.corner_a, self.corner_b);
        [a, Point2::new(b.x, a.y), b, Point2::new(a.x, b.y)]
    }

    /// 四条边
    pub fn edges(&self) -> [(Point2, Point2); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    pub fn width(&self) -> f64 {
        (self.corner_b.x - self.corner_a.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.corner_b.y - self.corner_a.y).abs()
    }
}

/// Catmull-Rom 样条，控制点引用点实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub control_points: Vec<EntityId>,
    /// 派生的细分曲线
    #[serde(skip)]
    pub curve: Vec<Point2>,
}

impl Spline {
    pub fn new(control_points: Vec<EntityId>, positions: &[Point2]) -> Self {
        let mut spline = Self {
            control_points,
            curve: Vec::new(),
        };
        spline.rebuild(positions);
        spline
    }

    /// 控制点或其位置变化后整体重算
    pub fn rebuild(&mut self, positions: &[Point2]) {
        self.curve = catmull_rom(positions, SPLINE_SUBDIVISIONS);
    }

    pub fn length(&self) -> f64 {
        self.curve.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// 文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// 插入点
    pub position: Point2,
    /// 文本内容
    pub content: String,
    pub font: String,
    /// 字高（世界坐标）
    pub font_size: f64,
    /// 光标位置（字符索引）
    pub caret: usize,
}

impl Text {
    pub fn new(position: Point2, content: impl Into<String>, font: impl Into<String>, font_size: f64) -> Self {
        let content = content.into();
        let caret = content.chars().count();
        Self {
            position,
            content,
            font: font.into(),
            font_size,
            caret,
        }
    }

    /// 在光标处插入字符
    pub fn insert_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.caret);
        self.content.insert(byte_index, c);
        self.caret += 1;
    }

    /// 删除光标前的字符
    pub fn backspace(&mut self) -> Option<char> {
        if self.caret == 0 {
            return None;
        }
        let byte_index = self.byte_index(self.caret - 1);
        let removed = self.content.remove(byte_index);
        self.caret -= 1;
        Some(removed)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// 估算文本宽度（每个字符约为字高的 0.6 倍）
    pub fn estimated_width(&self) -> f64 {
        self.content.chars().count() as f64 * self.font_size * 0.6
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            self.position,
            Point2::new(self.position.x + self.estimated_width(), self.position.y + self.font_size),
        )
    }
}
