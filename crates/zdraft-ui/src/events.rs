//! 输入事件
//!
//! 宿主 UI 循环把原始指针/键盘事件转成这里的类型后逐个投递。

use serde::{Deserialize, Serialize};

/// 指针事件（屏幕像素坐标）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 按键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Backspace,
    Char(char),
    /// 功能键 F1..F12
    Function(u8),
}

impl Key {
    /// 按名称解析：`Escape`/`Esc`、`Enter`、`Space`、`Backspace`、`F1`..`F12`，
    /// 或单个字符
    pub fn from_name(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(if c == ' ' { Key::Space } else { Key::Char(c) });
        }

        match name.to_ascii_lowercase().as_str() {
            "escape" | "esc" => Some(Key::Escape),
            "enter" | "return" => Some(Key::Enter),
            "space" => Some(Key::Space),
            "backspace" => Some(Key::Backspace),
            other => other
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map(Key::Function),
        }
    }

    /// 快捷键查找用的规范形式：字母统一为小写
    pub fn normalized(self) -> Key {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }

    /// 该键输入到文本中的字符
    pub fn text_char(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            Key::Space => Some(' '),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("ENTER"), Some(Key::Enter));
        assert_eq!(Key::from_name("F8"), Some(Key::Function(8)));
        assert_eq!(Key::from_name("f3"), Some(Key::Function(3)));
        assert_eq!(Key::from_name("l"), Some(Key::Char('l')));
        assert_eq!(Key::from_name("F"), Some(Key::Char('F')));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("F13"), None);
        assert_eq!(Key::from_name("hello"), None);
    }

    #[test]
    fn test_normalized_and_text() {
        assert_eq!(Key::Char('L').normalized(), Key::Char('l'));
        assert_eq!(Key::Function(8).normalized(), Key::Function(8));
        assert_eq!(Key::Space.text_char(), Some(' '));
        assert_eq!(Key::Enter.text_char(), None);
    }
}
