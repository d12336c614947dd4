//! 相机与视口
//!
//! 屏幕坐标 → 归一化设备坐标（NDC，Y 轴向上）→ 世界坐标：
//! `world = ndc / zoom + offset`。

use crate::error::{CoreError, CoreResult};
use crate::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 画布在屏幕上的矩形区域（像素）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// 从原点开始、指定尺寸的画布
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::sized(800.0, 600.0)
    }
}

/// 二维相机：平移 + 缩放
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    offset: Point2,
    zoom: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            offset: Point2::origin(),
            zoom: 1.0,
        }
    }

    pub fn offset(&self) -> Point2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point2) {
        self.offset = offset;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// 设置缩放；非正数或非有限值会被拒绝，没有上下限钳制
    pub fn set_zoom(&mut self, zoom: f64) -> CoreResult<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CoreError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        Ok(())
    }

    /// 屏幕像素坐标转世界坐标
    pub fn screen_to_world(&self, sx: f64, sy: f64, viewport: &Viewport) -> Point2 {
        let ndc_x = (sx - viewport.x) / viewport.width * 2.0 - 1.0;
        let ndc_y = 1.0 - (sy - viewport.y) / viewport.height * 2.0; // Y轴翻转
        Point2::new(ndc_x / self.zoom + self.offset.x, ndc_y / self.zoom + self.offset.y)
    }

    /// 世界坐标转屏幕像素坐标
    pub fn world_to_screen(&self, world: Point2, viewport: &Viewport) -> (f64, f64) {
        let ndc_x = (world.x - self.offset.x) * self.zoom;
        let ndc_y = (world.y - self.offset.y) * self.zoom;
        (
            viewport.x + (ndc_x + 1.0) / 2.0 * viewport.width,
            viewport.y + (1.0 - ndc_y) / 2.0 * viewport.height,
        )
    }

    /// 以屏幕上某点为中心按倍数缩放，该点下的世界坐标保持不动
    pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64, viewport: &Viewport) -> CoreResult<()> {
        let world_before = self.screen_to_world(sx, sy, viewport);
        self.set_zoom(self.zoom * factor)?;
        let world_after = self.screen_to_world(sx, sy, viewport);
        self.offset += world_before - world_after;
        Ok(())
    }

    /// 按世界坐标位移平移视图（内容跟随指针移动）
    pub fn pan_by(&mut self, world_delta: Vector2) {
        self.offset -= world_delta;
    }

    /// 一个屏幕像素对应的世界长度（水平方向）
    pub fn world_per_pixel(&self, viewport: &Viewport) -> f64 {
        2.0 / (viewport.width * self.zoom)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
