//! 渲染契约
//!
//! 外部渲染器每帧调用一次 [`build_frame`]，得到屏幕坐标下的绘制图元：
//! 先是已提交实体（按插入顺序），再是临时实体（覆盖在上层）。
//! 本模块不依赖任何 GPU 上下文。

use crate::camera::{Camera, Viewport};
use crate::config::DraftConfig;
use crate::entity::{Entity, EntityId};
use crate::entity_manager::EntityManager;
use crate::geometry::Geometry;
use crate::math::Point2;
use crate::properties::Color;

/// 绘制图元（屏幕像素坐标）
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Polyline {
        entity: EntityId,
        points: Vec<(f64, f64)>,
        closed: bool,
        color: Color,
    },
    Marker {
        entity: EntityId,
        at: (f64, f64),
        color: Color,
    },
    Label {
        entity: EntityId,
        at: (f64, f64),
        text: String,
        font: String,
        /// 屏幕像素字高
        size: f64,
        color: Color,
    },
}

impl DrawPrimitive {
    pub fn entity(&self) -> EntityId {
        match self {
            DrawPrimitive::Polyline { entity, .. }
            | DrawPrimitive::Marker { entity, .. }
            | DrawPrimitive::Label { entity, .. } => *entity,
        }
    }
}

/// 一帧的绘制列表
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub primitives: Vec<DrawPrimitive>,
    /// 已提交实体产生的图元数量（其后为临时实体）
    pub committed_count: usize,
}

/// 构建一帧
pub fn build_frame(
    entities: &EntityManager,
    camera: &Camera,
    viewport: &Viewport,
    config: &DraftConfig,
) -> Frame {
    let mut frame = Frame::default();
    let highlighted = entities.highlighted();

    for entity in entities.entities() {
        let color = if highlighted == Some(entity.id) {
            config.highlight_color
        } else {
            entity.color()
        };
        push_entity(&mut frame.primitives, entity, color, entities, camera, viewport);
    }
    frame.committed_count = frame.primitives.len();

    for entity in entities.temporary_entities() {
        push_entity(
            &mut frame.primitives,
            entity,
            config.preview_color,
            entities,
            camera,
            viewport,
        );
    }
    frame
}

fn push_entity(
    out: &mut Vec<DrawPrimitive>,
    entity: &Entity,
    color: Color,
    entities: &EntityManager,
    camera: &Camera,
    viewport: &Viewport,
) {
    let to_screen = |p: Point2| camera.world_to_screen(p, viewport);
    match &entity.geometry {
        Geometry::Point(p) => out.push(DrawPrimitive::Marker {
            entity: entity.id,
            at: to_screen(p.position),
            color,
        }),
        Geometry::Text(t) => {
            // 字高从世界长度换算为像素
            let size = t.font_size / camera.world_per_pixel(viewport);
            out.push(DrawPrimitive::Label {
                entity: entity.id,
                at: to_screen(t.position),
                text: t.content.clone(),
                font: t.font.clone(),
                size,
                color,
            });
        }
        Geometry::Rectangle(r) => {
            out.push(DrawPrimitive::Polyline {
                entity: entity.id,
                points: r.corners().iter().map(|c| to_screen(*c)).collect(),
                closed: true,
                color,
            });
            // 角点标记
            for corner in r.corners() {
                out.push(DrawPrimitive::Marker {
                    entity: entity.id,
                    at: to_screen(corner),
                    color,
                });
            }
        }
        geometry => {
            if let Some(outline) = geometry.outline(entities) {
                if outline.points.len() >= 2 {
                    out.push(DrawPrimitive::Polyline {
                        entity: entity.id,
                        points: outline.points.into_iter().map(to_screen).collect(),
                        closed: outline.closed,
                        color,
                    });
                }
            }
        }
    }
}
