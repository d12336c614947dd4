//! 绘图配置
//!
//! JSON 格式，所有字段都有默认值，配置文件只需写出要覆盖的项。

use crate::error::{CoreError, CoreResult};
use crate::geometry::{HitTolerance, Polygon};
use crate::properties::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// 线类图元点击容差（世界坐标，不随缩放变化）
    pub hit_tolerance: f64,
    /// 点图元点击容差（世界坐标）
    pub point_hit_tolerance: f64,
    /// 点捕捉阈值（世界坐标）
    pub snap_threshold: f64,
    /// 滚轮每格的缩放倍数
    pub zoom_step: f64,
    /// 正多边形默认边数
    pub default_polygon_sides: usize,
    pub default_font: String,
    pub default_font_size: f64,
    pub default_color: Color,
    /// 捕捉命中/选中实体的高亮颜色
    pub highlight_color: Color,
    /// 施工中的临时实体颜色
    pub preview_color: Color,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: 0.0125,
            point_hit_tolerance: 0.0,
            snap_threshold: 0.02,
            zoom_step: 1.1,
            default_polygon_sides: 3,
            default_font: "sans-serif".to_string(),
            default_font_size: 0.05,
            default_color: Color::WHITE,
            highlight_color: Color::YELLOW,
            preview_color: Color::from_hex(0xFF00FF),
        }
    }
}

impl DraftConfig {
    /// 从 JSON 文本解析并校验
    pub fn from_json(text: &str) -> CoreResult<Self> {
        let config: DraftConfig =
            serde_json::from_str(text).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(CoreError::Config(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        let tolerances = [self.hit_tolerance, self.point_hit_tolerance, self.snap_threshold];
        if tolerances.iter().any(|t| !(t.is_finite() && *t >= 0.0)) {
            return Err(CoreError::Config(
                "tolerances must be finite and not negative".to_string(),
            ));
        }
        Polygon::check_sides(self.default_polygon_sides)?;
        Ok(())
    }

    pub fn hit_tolerances(&self) -> HitTolerance {
        HitTolerance {
            edge: self.hit_tolerance,
            point: self.point_hit_tolerance,
        }
    }
}
