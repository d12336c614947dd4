//! 具体的 Tool 实现
//!
//! 每个绘图/编辑/导航工具对应一个 Tool 实现

mod arc;
mod circle;
mod ellipse;
mod line;
mod navigate;
mod point;
mod polygon;
mod polyline;
mod rectangle;
mod select;
mod spline;
mod text;

pub use arc::ArcTool;
pub use circle::CircleTool;
pub use ellipse::EllipseTool;
pub use line::LineTool;
pub use navigate::{PanTool, ZoomTool};
pub use point::PointTool;
pub use polygon::PolygonTool;
pub use polyline::PolylineTool;
pub use rectangle::RectangleTool;
pub use select::{MoveTool, SelectTool};
pub use spline::SplineTool;
pub use text::TextTool;

use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::debug;
use zdraft_core::config::DraftConfig;
use zdraft_core::entity::EntityId;

/// 创建指定类型的 Tool
pub fn create_tool(kind: ToolKind, config: &DraftConfig) -> Box<dyn Tool> {
    match kind {
        ToolKind::Point => Box::new(PointTool::new()),
        ToolKind::Line => Box::new(LineTool::new()),
        ToolKind::Polyline => Box::new(PolylineTool::new()),
        ToolKind::Circle => Box::new(CircleTool::new()),
        ToolKind::Arc => Box::new(ArcTool::new()),
        ToolKind::Ellipse => Box::new(EllipseTool::new()),
        ToolKind::Polygon => Box::new(PolygonTool::with_sides(config.default_polygon_sides)),
        ToolKind::Rectangle => Box::new(RectangleTool::new()),
        ToolKind::Spline => Box::new(SplineTool::new()),
        ToolKind::Text => Box::new(TextTool::new()),
        ToolKind::Select => Box::new(SelectTool::new()),
        ToolKind::Move => Box::new(MoveTool::new()),
        ToolKind::Pan => Box::new(PanTool::new()),
        ToolKind::Zoom => Box::new(ZoomTool::new()),
    }
}

/// 撤掉施工中创建的实体（后创建的先移除），并清除捕捉高亮
fn discard_all(session: &mut DraftingSession, kind: ToolKind, ids: &[EntityId]) {
    for id in ids.iter().rev() {
        session.entities.discard(*id);
    }
    session.entities.set_highlight(None);
    debug!(tool = kind.name(), removed = ids.len(), "construction cancelled");
}
