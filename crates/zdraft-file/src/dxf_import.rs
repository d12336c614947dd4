//! DXF 导入
//!
//! 读取 ENTITIES 段，把每个实体的组码映射为几何实体加入实体管理器。
//! 线、多段线、圆弧、样条引用的点作为独立的点实体一并加入。
//!
//! 支持的实体类型及组码：
//! - `LINE`: 10/20 起点，11/21 终点
//! - `POINT`: 10/20
//! - `CIRCLE`: 10/20 圆心，40 半径
//! - `ARC`: 10/20 圆心，40 半径，50/51 起止角（度），73 非零表示顺时针
//! - `ELLIPSE`: 10/20 圆心，11/21 长轴端点（相对圆心），40 短长轴比
//! - `LWPOLYLINE`: 重复的 10/20 顶点，70 位 1 表示闭合
//! - `SPLINE`: 71 阶数，重复的 10/20 控制点，40 节点值（忽略）
//! - `TEXT`: 10/20 插入点，40 字高，1 内容，7 样式名
//!
//! 所有实体都读取 62 颜色索引。其他类型被跳过。

use crate::dxf_raw::{DxfPair, DxfRawParser, PairsExt};
use crate::error::FileError;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::entity_manager::EntityManager;
use zdraft_core::geometry::{Arc, Circle, Ellipse, Geometry, Line, Point, Polyline, Spline, Text};
use zdraft_core::math::{normalize_angle, Point2, EPSILON, TAU};
use zdraft_core::properties::Color;

/// 未指定样式时的字体名
const DEFAULT_TEXT_STYLE: &str = "STANDARD";

/// 导入结果统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// 按类型统计的导入数量
    pub imported: BTreeMap<String, usize>,
    /// 不支持而跳过的类型及数量
    pub unsupported: BTreeMap<String, usize>,
    /// 缺少必要组码而跳过的实体数量
    pub malformed: usize,
    /// 加入实体管理器的实体总数（含引用的点）
    pub entities_added: usize,
}

impl ImportReport {
    /// 导入的 DXF 实体数量
    pub fn imported_count(&self) -> usize {
        self.imported.values().sum()
    }
}

/// 从文件导入
pub fn import_path(path: &Path, entities: &mut EntityManager) -> Result<ImportReport, FileError> {
    let mut parser = DxfRawParser::load(path)?;
    let report = import_entities(&mut parser, entities)?;
    info!(
        path = %path.display(),
        imported = report.imported_count(),
        skipped = report.unsupported.values().sum::<usize>() + report.malformed,
        "DXF imported"
    );
    Ok(report)
}

/// 从文本导入
pub fn import_str(text: &str, entities: &mut EntityManager) -> Result<ImportReport, FileError> {
    let mut parser = DxfRawParser::parse_str(text)?;
    import_entities(&mut parser, entities)
}

/// 从解析器导入 ENTITIES 段
///
/// 没有 ENTITIES 段时把整个文本当作实体序列；没有任何组码时报错。
pub fn import_entities(parser: &mut DxfRawParser, entities: &mut EntityManager) -> Result<ImportReport, FileError> {
    if parser.is_empty() {
        return Err(FileError::Dxf("document contains no group codes".to_string()));
    }
    if !parser.skip_to(2, Some("ENTITIES")) {
        debug!("no ENTITIES section, reading the whole payload");
        parser.rewind();
    }

    let mut report = ImportReport::default();
    let before = entities.len();

    while let Some(pair) = parser.advance() {
        if pair.code != 0 {
            continue;
        }
        let kind = pair.value.trim().to_string();
        if matches!(kind.as_str(), "ENDSEC" | "EOF") {
            break;
        }

        let group = parser.read_until_zero();
        match convert(&kind, &group, entities) {
            Some(true) => *report.imported.entry(kind).or_default() += 1,
            Some(false) => {
                warn!(kind = %kind, "malformed DXF entity skipped");
                report.malformed += 1;
            }
            None => {
                warn!(kind = %kind, "unsupported DXF entity skipped");
                *report.unsupported.entry(kind).or_default() += 1;
            }
        }
    }

    report.entities_added = entities.len() - before;
    Ok(report)
}

/// 转换一个实体；`None` 表示不支持的类型，`Some(false)` 表示缺少组码
fn convert(kind: &str, group: &[DxfPair], entities: &mut EntityManager) -> Option<bool> {
    let color = group
        .i32_of(62)
        .map(aci_to_color)
        .unwrap_or(Color::WHITE);

    let geometry = match kind {
        "POINT" => point(group),
        "LINE" => line(group, entities),
        "CIRCLE" => circle(group),
        "ARC" => arc(group, entities),
        "ELLIPSE" => ellipse(group),
        "LWPOLYLINE" => lwpolyline(group, entities),
        "SPLINE" => spline(group, entities),
        "TEXT" => text(group),
        _ => return None,
    };

    Some(match geometry {
        Some(geometry) => {
            entities.add_entity(Entity::new(geometry).with_color(color));
            true
        }
        None => false,
    })
}

/// 加入一组引用点
fn add_points(points: &[Point2], entities: &mut EntityManager) -> Vec<EntityId> {
    points.iter().map(|p| entities.add_point(*p)).collect()
}

fn point(group: &[DxfPair]) -> Option<Geometry> {
    Some(Geometry::Point(Point::from_point2(group.point_of(10, 20)?)))
}

fn line(group: &[DxfPair], entities: &mut EntityManager) -> Option<Geometry> {
    let start = group.point_of(10, 20)?;
    let end = group.point_of(11, 21)?;
    let ids = add_points(&[start, end], entities);
    Some(Geometry::Line(Line::new(ids[0], ids[1])))
}

fn circle(group: &[DxfPair]) -> Option<Geometry> {
    let center = group.point_of(10, 20)?;
    let radius = group.f64_of(40)?;
    Some(Geometry::Circle(Circle::new(center, radius)))
}

/// 圆心/半径/角度 → 起点、弧中点、终点
fn arc(group: &[DxfPair], entities: &mut EntityManager) -> Option<Geometry> {
    let center = group.point_of(10, 20)?;
    let radius = group.f64_of(40)?;
    let start_angle = group.f64_of(50)?.to_radians();
    let end_angle = group.f64_of(51)?.to_radians();
    let clockwise = group.i32_of(73).is_some_and(|flag| flag != 0);

    let mut sweep = normalize_angle(end_angle - start_angle);
    if sweep < EPSILON {
        sweep = TAU;
    }
    let mid_angle = if clockwise {
        start_angle - (TAU - sweep) / 2.0
    } else {
        start_angle + sweep / 2.0
    };

    let at = |angle: f64| Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
    let positions = [at(start_angle), at(mid_angle), at(end_angle)];
    let ids = add_points(&positions, entities);
    Some(Geometry::Arc(Arc::new([ids[0], ids[1], ids[2]], positions)))
}

/// 只保留轴对齐部分：长轴靠近 X 轴时 radius_x 为长半轴
fn ellipse(group: &[DxfPair]) -> Option<Geometry> {
    let center = group.point_of(10, 20)?;
    let major = group.point_of(11, 21)?.coords;
    let ratio = group.f64_of(40)?;

    let major_radius = major.norm();
    let minor_radius = major_radius * ratio;
    let rotation = major.y.atan2(major.x);
    if (rotation / std::f64::consts::FRAC_PI_2).fract().abs() > 1e-6 {
        debug!(rotation = rotation.to_degrees(), "rotated ellipse imported axis-aligned");
    }

    let (radius_x, radius_y) = if major.x.abs() >= major.y.abs() {
        (major_radius, minor_radius)
    } else {
        (minor_radius, major_radius)
    };
    Some(Geometry::Ellipse(Ellipse::new(center, radius_x, radius_y)))
}

fn lwpolyline(group: &[DxfPair], entities: &mut EntityManager) -> Option<Geometry> {
    let vertices = group.points_of(10, 20);
    if vertices.len() < 2 {
        return None;
    }
    let closed = group.i32_of(70).is_some_and(|flags| flags & 1 != 0);
    let ids = add_points(&vertices, entities);
    Some(Geometry::Polyline(Polyline::new(ids).closed(closed)))
}

fn spline(group: &[DxfPair], entities: &mut EntityManager) -> Option<Geometry> {
    let control_points = group.points_of(10, 20);
    if control_points.len() < 2 {
        return None;
    }
    if let Some(degree) = group.i32_of(71) {
        debug!(degree, control_points = control_points.len(), "spline interpolated through control points");
    }
    let ids = add_points(&control_points, entities);
    Some(Geometry::Spline(Spline::new(ids, &control_points)))
}

fn text(group: &[DxfPair]) -> Option<Geometry> {
    let position = group.point_of(10, 20)?;
    let height = group.f64_of(40)?;
    let content = group.str_of(1).unwrap_or_default();
    let style = group.str_of(7).unwrap_or(DEFAULT_TEXT_STYLE);
    Some(Geometry::Text(Text::new(position, content, style, height)))
}

/// AutoCAD 颜色索引 (ACI) 转颜色
fn aci_to_color(aci: i32) -> Color {
    match aci.abs() {
        1 => Color::RED,
        2 => Color::YELLOW,
        3 => Color::GREEN,
        4 => Color::CYAN,
        5 => Color::BLUE,
        6 => Color::MAGENTA,
        8 => Color::new(128, 128, 128),
        _ => Color::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dxf(body: &str) -> String {
        format!("0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1015\n0\nENDSEC\n0\nSECTION\n2\nENTITIES\n{body}0\nENDSEC\n0\nEOF\n")
    }

    fn only(entities: &EntityManager, type_name: &str) -> Vec<Geometry> {
        entities
            .entities()
            .iter()
            .filter(|e| e.geometry.type_name() == type_name)
            .map(|e| e.geometry.clone())
            .collect()
    }

    #[test]
    fn test_line_and_point() {
        let text = dxf("0\nLINE\n8\n0\n62\n1\n10\n0.0\n20\n0.0\n11\n3.0\n21\n4.0\n0\nPOINT\n10\n5\n20\n6\n");
        let mut entities = EntityManager::new();
        let report = import_str(&text, &mut entities).unwrap();

        assert_eq!(report.imported_count(), 2);
        // 线段的两个端点 + 线段 + 点
        assert_eq!(report.entities_added, 4);

        let line = entities
            .entities()
            .iter()
            .find(|e| e.geometry.type_name() == "Line")
            .unwrap();
        assert_eq!(line.color(), Color::RED);
        let Geometry::Line(l) = &line.geometry else { unreachable!() };
        assert!((l.length(&entities).unwrap() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_arc_ccw_and_cw() {
        let text = dxf(
            "0\nARC\n10\n0\n20\n0\n40\n2\n50\n0\n51\n90\n\
             0\nARC\n10\n0\n20\n0\n40\n2\n50\n0\n51\n90\n73\n1\n",
        );
        let mut entities = EntityManager::new();
        import_str(&text, &mut entities).unwrap();

        let arcs = only(&entities, "Arc");
        assert_eq!(arcs.len(), 2);
        let (Geometry::Arc(ccw), Geometry::Arc(cw)) = (&arcs[0], &arcs[1]) else {
            unreachable!()
        };
        assert!(!ccw.is_clockwise());
        assert!((ccw.length() - std::f64::consts::PI).abs() < 1e-9);
        assert!(cw.is_clockwise());
        assert!((cw.length() - 3.0 * std::f64::consts::PI).abs() < 1e-9);
        assert!(cw.center().unwrap().coords.norm() < 1e-9);
        assert!((cw.radius().unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_ellipse_text() {
        let text = dxf(
            "0\nCIRCLE\n10\n1\n20\n1\n40\n0.5\n\
             0\nELLIPSE\n10\n0\n20\n0\n11\n0\n21\n3\n40\n0.5\n\
             0\nTEXT\n10\n1\n20\n2\n40\n0.25\n1\nHello\n",
        );
        let mut entities = EntityManager::new();
        import_str(&text, &mut entities).unwrap();

        let Geometry::Circle(c) = &only(&entities, "Circle")[0] else { unreachable!() };
        assert!((c.radius - 0.5).abs() < EPSILON);

        // 长轴沿 Y
        let Geometry::Ellipse(e) = &only(&entities, "Ellipse")[0] else { unreachable!() };
        assert!((e.radius_x - 1.5).abs() < EPSILON);
        assert!((e.radius_y - 3.0).abs() < EPSILON);

        let Geometry::Text(t) = &only(&entities, "Text")[0] else { unreachable!() };
        assert_eq!(t.content, "Hello");
        assert_eq!(t.font, DEFAULT_TEXT_STYLE);
        assert!((t.font_size - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_lwpolyline_and_spline() {
        let text = dxf(
            "0\nLWPOLYLINE\n90\n3\n70\n1\n10\n0\n20\n0\n10\n1\n20\n0\n10\n1\n20\n1\n\
             0\nSPLINE\n71\n3\n72\n8\n40\n0\n40\n0\n40\n0\n40\n0\n40\n1\n40\n1\n40\n1\n40\n1\n\
             10\n0\n20\n0\n10\n1\n20\n1\n10\n2\n20\n0\n10\n3\n20\n1\n",
        );
        let mut entities = EntityManager::new();
        let report = import_str(&text, &mut entities).unwrap();
        assert_eq!(report.imported.get("LWPOLYLINE"), Some(&1));
        assert_eq!(report.imported.get("SPLINE"), Some(&1));

        let Geometry::Polyline(pl) = &only(&entities, "Polyline")[0] else { unreachable!() };
        assert!(pl.closed);
        assert_eq!(pl.segment_count(), 3);

        let Geometry::Spline(s) = &only(&entities, "Spline")[0] else { unreachable!() };
        assert_eq!(s.control_points.len(), 4);
        assert_eq!(s.curve.last(), Some(&Point2::new(3.0, 1.0)));
    }

    #[test]
    fn test_unsupported_and_malformed_are_skipped() {
        let text = dxf("0\nHATCH\n10\n0\n20\n0\n0\nCIRCLE\n10\n0\n20\n0\n0\nINSERT\n2\nBLOCK\n");
        let mut entities = EntityManager::new();
        let report = import_str(&text, &mut entities).unwrap();

        assert_eq!(report.imported_count(), 0);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.unsupported.get("HATCH"), Some(&1));
        assert_eq!(report.unsupported.get("INSERT"), Some(&1));
        assert!(entities.is_empty());
    }

    #[test]
    fn test_empty_document_rejected() {
        let mut entities = EntityManager::new();
        assert!(matches!(import_str("", &mut entities), Err(FileError::Dxf(_))));
        assert!(matches!(import_str("\n\n", &mut entities), Err(FileError::Dxf(_))));
        assert!(entities.is_empty());
    }

    #[test]
    fn test_bare_entity_stream() {
        let mut entities = EntityManager::new();
        let report = import_str("0\nPOINT\n10\n1\n20\n2\n0\nEOF\n", &mut entities).unwrap();
        assert_eq!(report.imported_count(), 1);
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_import_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(dxf("0\nCIRCLE\n10\n0\n20\n0\n40\n1\n").as_bytes())
            .unwrap();

        let mut entities = EntityManager::new();
        let report = import_path(file.path(), &mut entities).unwrap();
        assert_eq!(report.imported.get("CIRCLE"), Some(&1));

        let missing = import_path(Path::new("/nonexistent/drawing.dxf"), &mut entities);
        assert!(matches!(missing, Err(FileError::Io(_))));
    }
}
