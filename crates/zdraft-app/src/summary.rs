//! 会话摘要输出

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use zdraft_core::math::BoundingBox2;
use zdraft_core::render::build_frame;
use zdraft_ui::DraftingSession;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub entities: BTreeMap<&'static str, usize>,
    pub total: usize,
    pub temporaries: usize,
    pub bounding_box: Option<BoundingBox2>,
    pub zoom: f64,
    pub scale: Option<String>,
    pub primitives: usize,
    pub active_tool: Option<String>,
}

impl Summary {
    pub fn collect(session: &DraftingSession, active_tool: Option<&str>) -> Self {
        let mut entities = BTreeMap::new();
        for entity in session.entities.entities() {
            *entities.entry(entity.geometry.type_name()).or_insert(0) += 1;
        }
        let bbox = session.entities.bounding_box();
        let zoom = session.camera.zoom();
        let frame = build_frame(&session.entities, &session.camera, &session.viewport, &session.config);
        Self {
            entities,
            total: session.entities.len(),
            temporaries: session.entities.temporary_entities().len(),
            bounding_box: (!bbox.is_empty()).then_some(bbox),
            zoom,
            scale: session.scales.nearest(zoom).map(str::to_owned),
            primitives: frame.primitives.len(),
            active_tool: active_tool.map(str::to_owned),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entities: {} ({} temporary)", self.total, self.temporaries)?;
        for (name, count) in &self.entities {
            writeln!(f, "  {name:<10} {count}")?;
        }
        match &self.bounding_box {
            Some(b) => writeln!(
                f,
                "extent: ({:.3}, {:.3}) - ({:.3}, {:.3})",
                b.min.x, b.min.y, b.max.x, b.max.y
            )?,
            None => writeln!(f, "extent: empty")?,
        }
        writeln!(
            f,
            "zoom: {:.4} (nearest scale {})",
            self.zoom,
            self.scale.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "primitives: {}", self.primitives)?;
        write!(f, "active tool: {}", self.active_tool.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::entity::Entity;
    use zdraft_core::geometry::{Geometry, Line};
    use zdraft_core::math::Point2;

    #[test]
    fn test_collect_counts_by_type() {
        let mut session = DraftingSession::default();
        let a = session.entities.add_point(Point2::new(0.0, 0.0));
        let b = session.entities.add_point(Point2::new(2.0, 1.0));
        session
            .entities
            .add_entity(Entity::new(Geometry::Line(Line::new(a, b))));

        let summary = Summary::collect(&session, Some("line"));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.entities.get("Point"), Some(&2));
        assert_eq!(summary.entities.get("Line"), Some(&1));
        let bbox = summary.bounding_box.unwrap();
        assert_eq!(bbox.max, Point2::new(2.0, 1.0));
        assert_eq!(summary.scale.as_deref(), Some("1:1"));
        assert!(summary.to_string().contains("Line"));
    }

    #[test]
    fn test_empty_session() {
        let summary = Summary::collect(&DraftingSession::default(), None);
        assert_eq!(summary.total, 0);
        assert!(summary.bounding_box.is_none());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"total\":0"));
    }
}
