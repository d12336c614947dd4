//! 快捷键表
//!
//! 单键分派：切换工具或开关约束。支持用户别名（别名键 → 已绑定的键）。
//! 文本编辑中的按键直接交给工具，不触发快捷键。

use crate::error::ToolResult;
use crate::events::Key;
use crate::session::DraftingSession;
use crate::tool::ToolKind;
use crate::tool_manager::ToolManager;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use zdraft_core::constraint::ConstraintKind;

/// 快捷键触发的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ActivateTool(ToolKind),
    ToggleConstraint(ConstraintKind),
}

#[derive(Debug, Clone)]
pub struct ShortcutTable {
    /// 键 -> 动作
    bindings: HashMap<Key, ShortcutAction>,
    /// 别名键 -> 已绑定的键
    aliases: HashMap<Key, Key>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        let mut table = Self {
            bindings: HashMap::new(),
            aliases: HashMap::new(),
        };
        table.register_defaults();
        table
    }

    fn register_defaults(&mut self) {
        for kind in ToolKind::ALL {
            self.bind(Key::Char(kind.shortcut()), ShortcutAction::ActivateTool(kind));
        }
        self.bind(Key::Function(8), ShortcutAction::ToggleConstraint(ConstraintKind::Orthogonal));
        self.bind(Key::Function(3), ShortcutAction::ToggleConstraint(ConstraintKind::PointSnap));
    }

    /// 绑定键；已有绑定被替换
    pub fn bind(&mut self, key: Key, action: ShortcutAction) {
        self.bindings.insert(key.normalized(), action);
    }

    pub fn unbind(&mut self, key: Key) -> Option<ShortcutAction> {
        self.bindings.remove(&key.normalized())
    }

    /// 查找按键对应的动作：先查绑定，再查别名
    pub fn lookup(&self, key: Key) -> Option<ShortcutAction> {
        let key = key.normalized();
        if let Some(action) = self.bindings.get(&key) {
            return Some(*action);
        }
        let target = self.aliases.get(&key)?;
        self.bindings.get(target).copied()
    }

    /// 添加别名；不覆盖已绑定的键，目标键必须已绑定
    pub fn add_alias(&mut self, alias: Key, target: Key) -> bool {
        let (alias, target) = (alias.normalized(), target.normalized());
        if self.bindings.contains_key(&alias) || !self.bindings.contains_key(&target) {
            return false;
        }
        self.aliases.insert(alias, target);
        true
    }

    pub fn remove_alias(&mut self, alias: Key) {
        self.aliases.remove(&alias.normalized());
    }

    /// 解析别名文本
    ///
    /// 每行 "别名 目标"，以 # 开头的行是注释。返回成功添加的数量。
    pub fn parse_aliases(&mut self, content: &str) -> usize {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let alias = Key::from_name(parts.next()?)?;
                let target = Key::from_name(parts.next()?)?;
                Some((alias, target))
            })
            .filter(|(alias, target)| self.add_alias(*alias, *target))
            .count()
    }

    /// 从文件加载别名
    pub fn load_aliases(&mut self, path: &Path) -> Result<usize, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.parse_aliases(&content))
    }

    /// 执行快捷键；返回触发的动作，未绑定时返回 `None`
    pub fn dispatch(
        &self,
        key: Key,
        tools: &mut ToolManager,
        session: &mut DraftingSession,
    ) -> ToolResult<Option<ShortcutAction>> {
        let Some(action) = self.lookup(key) else {
            return Ok(None);
        };
        match action {
            ShortcutAction::ActivateTool(kind) => tools.switch_tool(kind.name(), session)?,
            ShortcutAction::ToggleConstraint(kind) => {
                let enabled = session.constraints.toggle_constraint(kind);
                info!(constraint = kind.name(), enabled, "constraint toggled");
            }
        }
        Ok(Some(action))
    }

    /// 按键总入口
    ///
    /// 当前工具独占键盘时（文本编辑）直接转发；否则先查快捷键，
    /// 未绑定的键交给当前工具（Escape、Enter 等）。
    pub fn route_key(
        &self,
        key: Key,
        tools: &mut ToolManager,
        session: &mut DraftingSession,
    ) -> ToolResult<()> {
        let captured = tools.active_tool().is_some_and(|tool| tool.captures_keys());
        if !captured && self.dispatch(key, tools, session)?.is_some() {
            return Ok(());
        }
        debug!(?key, captured, "key forwarded to tool");
        tools.on_key_down(session, key)
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::new()
    }
}
