//! DXF 原始文本解析器
//!
//! # 组码 (Group Code)
//!
//! 每个数据项由两行组成：
//! - 第一行：组码（数字）
//! - 第二行：值
//!
//! 实体段的结构：
//! ```text
//! 0
//! SECTION
//! 2
//! ENTITIES
//! 0
//! LINE          ← 实体类型
//! 10            ← 组码
//! 0.0           ← 值
//! ...
//! 0
//! ENDSEC
//! 0
//! EOF
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::FileError;
use zdraft_core::math::Point2;

/// DXF 组码-值对
#[derive(Debug, Clone, PartialEq)]
pub struct DxfPair {
    pub code: i32,
    pub value: String,
}

impl DxfPair {
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    /// 解析为浮点数
    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    /// 解析为整数
    pub fn as_i32(&self) -> Option<i32> {
        self.value.trim().parse().ok()
    }
}

/// 一个实体的组码列表上的查询
pub trait PairsExt {
    /// 第一个指定组码的浮点值
    fn f64_of(&self, code: i32) -> Option<f64>;

    /// 第一个指定组码的整数值
    fn i32_of(&self, code: i32) -> Option<i32>;

    /// 第一个指定组码的文本值
    fn str_of(&self, code: i32) -> Option<&str>;

    /// 第一个 (x_code, y_code) 点
    fn point_of(&self, x_code: i32, y_code: i32) -> Option<Point2> {
        Some(Point2::new(self.f64_of(x_code)?, self.f64_of(y_code)?))
    }

    /// 按出现顺序收集全部 (x_code, y_code) 点，Y 跟在 X 之后
    fn points_of(&self, x_code: i32, y_code: i32) -> Vec<Point2>;
}

impl PairsExt for [DxfPair] {
    fn f64_of(&self, code: i32) -> Option<f64> {
        self.iter().find(|p| p.code == code)?.as_f64()
    }

    fn i32_of(&self, code: i32) -> Option<i32> {
        self.iter().find(|p| p.code == code)?.as_i32()
    }

    fn str_of(&self, code: i32) -> Option<&str> {
        self.iter().find(|p| p.code == code).map(|p| p.value.as_str())
    }

    fn points_of(&self, x_code: i32, y_code: i32) -> Vec<Point2> {
        let mut points = Vec::new();
        let mut pending_x = None;
        for pair in self {
            if pair.code == x_code {
                pending_x = pair.as_f64();
            } else if pair.code == y_code {
                if let (Some(x), Some(y)) = (pending_x.take(), pair.as_f64()) {
                    points.push(Point2::new(x, y));
                }
            }
        }
        points
    }
}

/// DXF 原始解析器
pub struct DxfRawParser {
    pairs: Vec<DxfPair>,
    position: usize,
}

impl DxfRawParser {
    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, FileError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// 从内存文本解析
    pub fn parse_str(text: &str) -> Result<Self, FileError> {
        Self::parse(text.as_bytes())
    }

    /// 从文本解析，遇到 `0/EOF` 停止
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, FileError> {
        let mut pairs = Vec::new();
        let mut lines = reader.lines();

        loop {
            // 读取组码
            let code_line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if code_line.trim().is_empty() {
                continue;
            }

            // 读取值
            let value_line = match lines.next() {
                Some(line) => line?,
                None => {
                    return Err(FileError::InvalidFormat(format!(
                        "Group code {} has no value",
                        code_line.trim()
                    )))
                }
            };

            let code: i32 = code_line
                .trim()
                .parse()
                .map_err(|_| FileError::InvalidFormat(format!("Invalid group code: {code_line}")))?;

            let value = value_line.trim_end_matches('\r').to_string();
            let is_eof = code == 0 && value.trim() == "EOF";
            pairs.push(DxfPair::new(code, value));
            if is_eof {
                break;
            }
        }

        Ok(Self { pairs, position: 0 })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 获取当前对
    pub fn current(&self) -> Option<&DxfPair> {
        self.pairs.get(self.position)
    }

    /// 前进一步
    pub fn advance(&mut self) -> Option<&DxfPair> {
        let pair = self.pairs.get(self.position)?;
        self.position += 1;
        Some(pair)
    }

    /// 回退一步
    pub fn back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// 回到开头
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// 跳到下一个指定组码（可选匹配值），停在它之后
    pub fn skip_to(&mut self, code: i32, value: Option<&str>) -> bool {
        while let Some(pair) = self.advance() {
            if pair.code == code && value.map_or(true, |v| pair.value.trim() == v) {
                return true;
            }
        }
        false
    }

    /// 读取直到遇到组码 0（不消耗它）
    pub fn read_until_zero(&mut self) -> Vec<DxfPair> {
        let mut result = Vec::new();
        while let Some(pair) = self.current() {
            if pair.code == 0 {
                break;
            }
            result.push(pair.clone());
            self.position += 1;
        }
        result
    }
}
