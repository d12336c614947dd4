//! 事件脚本回放
//!
//! 脚本是 JSON 数组，坐标使用世界坐标，回放时按当前相机换算为屏幕坐标：
//!
//! ```json
//! [
//!   {"event": "tool", "name": "line"},
//!   {"event": "click", "x": 0.0, "y": 0.0},
//!   {"event": "move", "x": 0.5, "y": 0.5},
//!   {"event": "click", "x": 1.0, "y": 1.0},
//!   {"event": "key", "key": "Escape"}
//! ]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};
use zdraft_core::math::Point2;
use zdraft_ui::{DraftingSession, Key, PointerEvent, ShortcutTable, ToolError, ToolManager};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptEvent {
    Tool { name: String },
    Click { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Wheel { x: f64, y: f64, delta: f64 },
    Key { key: String },
    Value { value: f64 },
    Scale { name: String },
}

/// 回放统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub failed: usize,
}

pub fn load(path: &Path) -> Result<Vec<ScriptEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid script {}", path.display()))
}

pub fn parse(text: &str) -> Result<Vec<ScriptEvent>> {
    Ok(serde_json::from_str(text)?)
}

/// 逐个投递事件；单个事件失败时取消当前施工并继续
pub fn replay(
    events: &[ScriptEvent],
    session: &mut DraftingSession,
    tools: &mut ToolManager,
    shortcuts: &ShortcutTable,
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for (index, event) in events.iter().enumerate() {
        stats.events += 1;
        if let Err(err) = apply(event, session, tools, shortcuts) {
            warn!(index, ?event, %err, "event failed, construction cancelled");
            tools.cancel(session);
            stats.failed += 1;
        }
    }
    stats
}

fn pointer(session: &DraftingSession, x: f64, y: f64) -> PointerEvent {
    session.pointer_at(Point2::new(x, y))
}

fn apply(
    event: &ScriptEvent,
    session: &mut DraftingSession,
    tools: &mut ToolManager,
    shortcuts: &ShortcutTable,
) -> Result<(), ToolError> {
    debug!(?event, "replay");
    match event {
        ScriptEvent::Tool { name } => tools.switch_tool(name, session),
        ScriptEvent::Click { x, y } => {
            let event = pointer(session, *x, *y);
            tools.on_left_click(session, event)
        }
        ScriptEvent::Move { x, y } => {
            let event = pointer(session, *x, *y);
            tools.on_mouse_move(session, event)
        }
        ScriptEvent::Up { x, y } => {
            let event = pointer(session, *x, *y);
            tools.on_mouse_up(session, event)
        }
        ScriptEvent::Wheel { x, y, delta } => {
            let event = pointer(session, *x, *y);
            tools.on_wheel(session, event, *delta)
        }
        ScriptEvent::Key { key } => match Key::from_name(key) {
            Some(key) => shortcuts.route_key(key, tools, session),
            None => {
                warn!(key = %key, "unknown key name ignored");
                Ok(())
            }
        },
        ScriptEvent::Value { value } => tools.on_value(session, *value),
        ScriptEvent::Scale { name } => {
            if !session.scales.apply(name, &mut session.camera)? {
                warn!(scale = %name, "unknown scale ignored");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::config::DraftConfig;

    fn run(script: &str) -> (DraftingSession, ReplayStats) {
        let mut session = DraftingSession::new(DraftConfig::default());
        let mut tools = ToolManager::with_defaults(&session.config);
        let shortcuts = ShortcutTable::new();
        let events = parse(script).unwrap();
        let stats = replay(&events, &mut session, &mut tools, &shortcuts);
        (session, stats)
    }

    #[test]
    fn test_replay_polygon_with_value() {
        let (session, stats) = run(
            r#"[
                {"event": "key", "key": "g"},
                {"event": "click", "x": 0, "y": 0},
                {"event": "value", "value": 6},
                {"event": "click", "x": 0.5, "y": 0}
            ]"#,
        );
        assert_eq!(stats, ReplayStats { events: 4, failed: 0 });
        assert_eq!(session.entities.len(), 1);
    }

    #[test]
    fn test_failed_event_cancels_construction() {
        let (session, stats) = run(
            r#"[
                {"event": "tool", "name": "polygon"},
                {"event": "click", "x": 0, "y": 0},
                {"event": "value", "value": 2},
                {"event": "tool", "name": "nonexistent"}
            ]"#,
        );
        assert_eq!(stats.failed, 2);
        assert!(session.entities.is_empty());
    }

    #[test]
    fn test_scale_event_sets_zoom() {
        let (session, stats) = run(r#"[{"event": "scale", "name": "1:2"}]"#);
        assert_eq!(stats.failed, 0);
        assert!((session.camera.zoom() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_unknown_event() {
        assert!(parse(r#"[{"event": "teleport"}]"#).is_err());
    }
}
