//! 视图导航工具：平移和缩放

use crate::error::ToolResult;
use crate::events::PointerEvent;
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::trace;
use zdraft_core::properties::Color;

/// 平移工具：按住拖动，画面跟随指针
#[derive(Debug, Default)]
pub struct PanTool {
    /// 上一次的屏幕坐标
    last: Option<(f64, f64)>,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PanTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pan
    }

    fn on_left_click(
        &mut self,
        _session: &mut DraftingSession,
        event: PointerEvent,
        _color: Color,
    ) -> ToolResult<()> {
        self.last = Some((event.x, event.y));
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        let Some((lx, ly)) = self.last else {
            return Ok(());
        };
        let from = session.camera.screen_to_world(lx, ly, &session.viewport);
        let to = session.world_position(&event);
        session.camera.pan_by(to - from);
        self.last = Some((event.x, event.y));
        trace!(offset = ?session.camera.offset(), "pan");
        Ok(())
    }

    fn on_mouse_up(&mut self, _session: &mut DraftingSession, _event: PointerEvent) -> ToolResult<()> {
        self.last = None;
        Ok(())
    }

    fn cancel(&mut self, _session: &mut DraftingSession) {
        self.last = None;
    }

    fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

/// 缩放工具：滚轮每格按 `zoom_step` 乘/除，指针下的世界点保持不动；
/// 单击放大一格
#[derive(Debug, Default)]
pub struct ZoomTool;

impl ZoomTool {
    pub fn new() -> Self {
        Self
    }

    fn zoom(session: &mut DraftingSession, event: &PointerEvent, zoom_in: bool) -> ToolResult<()> {
        let step = session.config.zoom_step;
        let factor = if zoom_in { step } else { 1.0 / step };
        session
            .camera
            .zoom_at(factor, event.x, event.y, &session.viewport)?;
        trace!(zoom = session.camera.zoom(), "zoom");
        Ok(())
    }
}

impl Tool for ZoomTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Zoom
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        _color: Color,
    ) -> ToolResult<()> {
        Self::zoom(session, &event, true)
    }

    fn on_wheel(&mut self, session: &mut DraftingSession, event: PointerEvent, delta: f64) -> ToolResult<()> {
        if delta == 0.0 {
            return Ok(());
        }
        Self::zoom(session, &event, delta > 0.0)
    }

    fn cancel(&mut self, _session: &mut DraftingSession) {}

    fn is_active(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{at, close};
    use zdraft_core::math::Point2;

    #[test]
    fn test_pan_keeps_content_under_pointer() {
        let mut session = DraftingSession::default();
        let mut tool = PanTool::new();

        let grabbed = Point2::new(0.25, 0.25);
        let start = at(&session, grabbed.x, grabbed.y);
        tool.on_left_click(&mut session, start, Color::WHITE).unwrap();
        let end = PointerEvent::new(start.x + 100.0, start.y - 50.0);
        tool.on_mouse_move(&mut session, end).unwrap();
        tool.on_mouse_up(&mut session, end).unwrap();

        assert!(close(session.world_position(&end), grabbed));
        assert!(!tool.is_active());
    }

    #[test]
    fn test_wheel_is_multiplicative() {
        let mut session = DraftingSession::default();
        let mut tool = ZoomTool::new();
        let center = PointerEvent::new(400.0, 300.0);

        tool.on_wheel(&mut session, center, 1.0).unwrap();
        tool.on_wheel(&mut session, center, 1.0).unwrap();
        assert!((session.camera.zoom() - 1.21).abs() < 1e-12);

        tool.on_wheel(&mut session, center, -1.0).unwrap();
        tool.on_wheel(&mut session, center, -1.0).unwrap();
        assert!((session.camera.zoom() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let mut session = DraftingSession::default();
        let mut tool = ZoomTool::new();
        let event = at(&session, 0.5, -0.25);

        tool.on_left_click(&mut session, event, Color::WHITE).unwrap();
        assert!(close(session.world_position(&event), Point2::new(0.5, -0.25)));
    }
}
