//! 文本工具
//!
//! 未编辑时点击创建空文本并进入编辑；字符键追加、Backspace 删除，
//! Enter 或再次点击结束编辑并提交当前内容（空内容也是合法的提交）。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::debug;
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Geometry, Text};
use zdraft_core::properties::Color;

#[derive(Debug, Default)]
pub struct TextTool {
    editing: Option<EntityId>,
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn text_mut(session: &mut DraftingSession, id: EntityId) -> ToolResult<&mut Text> {
        match session.entities.get_mut(id).map(|e| &mut e.geometry) {
            Some(Geometry::Text(text)) => Ok(text),
            _ => Err(CoreError::EntityNotFound(id).into()),
        }
    }

    fn commit(&mut self, session: &DraftingSession) {
        if let Some(id) = self.editing.take() {
            let content = match session.entities.get(id).map(|e| &e.geometry) {
                Some(Geometry::Text(text)) => text.content.as_str(),
                _ => "",
            };
            debug!(%id, content, "text committed");
        }
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        if self.editing.is_some() {
            self.commit(session);
            return Ok(());
        }
        let position = session.resolve_point(&event, None, &[]);
        let text = Text::new(
            position,
            "",
            session.config.default_font.clone(),
            session.config.default_font_size,
        );
        let id = session
            .entities
            .add_entity(Entity::new(Geometry::Text(text)).with_color(color));
        self.editing = Some(id);
        Ok(())
    }

    fn on_key_down(&mut self, session: &mut DraftingSession, key: Key) -> ToolResult<()> {
        let Some(id) = self.editing else {
            return Ok(());
        };
        match key {
            Key::Escape => self.cancel(session),
            Key::Enter => self.commit(session),
            Key::Backspace => {
                Self::text_mut(session, id)?.backspace();
            }
            other => {
                if let Some(c) = other.text_char() {
                    Self::text_mut(session, id)?.insert_char(c);
                }
            }
        }
        Ok(())
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(id) = self.editing.take() {
            discard_all(session, self.kind(), &[id]);
        }
    }

    fn is_active(&self) -> bool {
        self.editing.is_some()
    }

    fn captures_keys(&self) -> bool {
        self.editing.is_some()
    }
}
