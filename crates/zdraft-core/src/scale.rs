//! 工程比例
//!
//! 把命名比例（如 `1:50`）映射为相机缩放级别。`1:1` 对应缩放 1.0，
//! `1:n` 对应 1/n，`n:1` 对应 n。

use crate::camera::Camera;
use crate::error::CoreResult;

#[derive(Debug, Clone)]
pub struct ScaleManager {
    /// (名称, 缩放级别)，保持注册顺序
    scales: Vec<(String, f64)>,
}

impl ScaleManager {
    pub fn new() -> Self {
        let mut manager = Self { scales: Vec::new() };
        for name in ["10:1", "5:1", "2:1", "1:1", "1:2", "1:5", "1:10", "1:20", "1:50", "1:100"] {
            if let Some(zoom) = Self::parse_ratio(name) {
                manager.scales.push((name.to_string(), zoom));
            }
        }
        manager
    }

    /// 解析 "a:b" 形式的比例
    pub fn parse_ratio(name: &str) -> Option<f64> {
        let (a, b) = name.split_once(':')?;
        let a: f64 = a.trim().parse().ok()?;
        let b: f64 = b.trim().parse().ok()?;
        (a > 0.0 && b > 0.0).then(|| a / b)
    }

    /// 注册比例，同名时覆盖
    pub fn add_scale(&mut self, name: impl Into<String>, zoom: f64) {
        let name = name.into();
        match self.scales.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = zoom,
            None => self.scales.push((name, zoom)),
        }
    }

    pub fn zoom_for(&self, name: &str) -> Option<f64> {
        self.scales.iter().find(|(n, _)| n == name).map(|(_, z)| *z)
    }

    /// 将命名比例应用到相机；未知名称返回 `Ok(false)`
    pub fn apply(&self, name: &str, camera: &mut Camera) -> CoreResult<bool> {
        match self.zoom_for(name) {
            Some(zoom) => {
                camera.set_zoom(zoom)?;
                tracing::debug!(scale = name, zoom, "scale applied");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 与当前缩放最接近的命名比例（按对数距离）
    pub fn nearest(&self, zoom: f64) -> Option<&str> {
        if zoom <= 0.0 {
            return None;
        }
        self.scales
            .iter()
            .min_by(|a, b| {
                let da = (a.1.ln() - zoom.ln()).abs();
                let db = (b.1.ln() - zoom.ln()).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(n, _)| n.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scales.iter().map(|(n, _)| n.as_str())
    }
}

impl Default for ScaleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_scales() {
        let scales = ScaleManager::new();
        assert_eq!(scales.zoom_for("1:50"), Some(0.02));
        assert_eq!(scales.zoom_for("2:1"), Some(2.0));
        assert_eq!(scales.zoom_for("3:7"), None);
        assert_eq!(ScaleManager::parse_ratio("1:0"), None);
    }

    #[test]
    fn test_apply_and_nearest() {
        let scales = ScaleManager::new();
        let mut camera = Camera::new();
        assert!(scales.apply("1:10", &mut camera).unwrap());
        assert!((camera.zoom() - 0.1).abs() < 1e-12);
        assert!(!scales.apply("bogus", &mut camera).unwrap());

        assert_eq!(scales.nearest(0.11), Some("1:10"));
        assert_eq!(scales.nearest(1.3), Some("1:1"));
        assert_eq!(scales.nearest(0.0), None);
    }

    #[test]
    fn test_add_scale_overrides() {
        let mut scales = ScaleManager::new();
        scales.add_scale("1:1", 1.5);
        scales.add_scale("site", 0.001);
        assert_eq!(scales.zoom_for("1:1"), Some(1.5));
        assert_eq!(scales.names().last(), Some("site"));
    }
}
