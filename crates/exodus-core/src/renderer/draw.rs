//! Draw-command surface.
//!
//! The render pass emits flat, already-ordered primitives instead of touching
//! a graphics context; the embedding shell rasterizes them with whatever
//! canvas/GPU it owns. Command order is paint order, back to front.

use glam::Vec2;

use crate::api::types::Color;
use crate::components::body::Body;
use crate::components::particle::Particle;
use crate::components::planet::{Planet, HEAT_COLORS};
use crate::components::player::Player;
use crate::components::resident::{Resident, ResidentKind};
use crate::core::math::{angle_movement, to_radians};

const TRUNK_COLOR: Color = Color::rgb(0xd0, 0xa6, 0x7c);
const ROOF_COLOR: Color = Color::rgb(0x55, 0x52, 0x4d);
const DOOR_COLOR: Color = Color::rgb(0xa6, 0x7c, 0x5e);
const DOOMSDAY_COLOR: Color = Color::rgb(0xff, 0x00, 0x00);
const BOUNDARY_COLOR: Color = Color::rgb(0x44, 0x44, 0x55);

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Ring { center: Vec2, radius: f32, width: f32 },
    /// Axis box rotated `rot` degrees around its center.
    Rect { center: Vec2, size: Vec2, rot: f32 },
    Polygon { points: Vec<Vec2> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub color: Color,
    pub alpha: f32,
}

/// One frame's worth of primitives, rebuilt by every render pass.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand {
            shape: Shape::Circle { center, radius },
            color,
            alpha,
        });
    }

    pub fn stroke_ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand {
            shape: Shape::Ring {
                center,
                radius,
                width,
            },
            color,
            alpha,
        });
    }

    pub fn fill_rect(&mut self, center: Vec2, size: Vec2, rot: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand {
            shape: Shape::Rect { center, size, rot },
            color,
            alpha,
        });
    }

    pub fn fill_polygon(&mut self, points: Vec<Vec2>, color: Color, alpha: f32) {
        self.commands.push(DrawCommand {
            shape: Shape::Polygon { points },
            color,
            alpha,
        });
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::rgb(
        lerp(a.r as f32, b.r as f32, t).round() as u8,
        lerp(a.g as f32, b.g as f32, t).round() as u8,
        lerp(a.b as f32, b.b as f32, t).round() as u8,
    )
}

/// Rotate a local offset by `deg` (clockwise in the Y-down world).
fn rotate_local(v: Vec2, deg: f32) -> Vec2 {
    let r = to_radians(deg);
    Vec2::new(v.x * r.cos() - v.y * r.sin(), v.x * r.sin() + v.y * r.cos())
}

/// Draw the world boundary ring.
pub fn draw_boundary(map_radius: f32, out: &mut DrawList) {
    out.stroke_ring(Vec2::ZERO, map_radius, 20.0, BOUNDARY_COLOR, 0.25);
}

/// Planet disc, surface spots, residents, and the emerging/doomsday phase
/// visuals. Paint order matters: heat spots under the disc, residents on
/// top, the doomsday pulse over everything.
pub fn draw_planet(planet: &Planet, body: &Body, now_ms: f64, out: &mut DrawList) {
    let radius = body.size.x / 2.0;
    let progress = planet.emerging_progress(now_ms);

    let mut body_alpha = 1.0;
    if progress < 1.0 {
        draw_emerging(planet, body, progress, out);
        // The solid disc fades in only over the last quarter of emergence.
        body_alpha = ((progress - 0.75) * 4.0).max(0.0);
    }

    if body_alpha > 0.0 {
        out.fill_circle(body.pos, radius, planet.base_color(), body_alpha);
        for spot in planet.color_spots() {
            let center = body.pos + rotate_local(spot.pos, body.rot);
            out.fill_circle(center, spot.size, spot.color, body_alpha);
        }
    }

    for resident in planet.residents() {
        draw_resident(resident, out);
    }

    let doom = planet.doomsday_progress(now_ms);
    if doom > 0.0 {
        let pulse = ((now_ms / 1000.0 * std::f64::consts::PI).sin() as f32 + 1.0) / 4.0 + 0.25;
        out.fill_circle(body.pos, radius * doom, DOOMSDAY_COLOR, pulse);
    }
}

fn draw_emerging(planet: &Planet, body: &Body, progress: f32, out: &mut DrawList) {
    let radius = body.size.x / 2.0 * progress;
    let spots = planet.emerging_spots();
    let count = spots.len().max(1);
    for (i, spot) in spots.iter().enumerate() {
        let heat = HEAT_COLORS[HEAT_COLORS.len() * i / count];
        let color = lerp_color(heat, spot.color, progress);
        let angle = lerp(spot.angle.0, spot.angle.1, progress);
        let size = lerp(spot.size.0, spot.size.1, progress);
        let offset = angle_movement(angle, (radius * 1.5 - size) * spot.offset);
        out.fill_circle(body.pos + offset, size, color, progress);
    }
}

/// Residents draw in surface-local orientation: their heading is the
/// outward surface angle, so sprites are rotated to stand on the ground.
pub fn draw_resident(resident: &Resident, out: &mut DrawList) {
    let body = &resident.body;
    let up = body.rot - 180.0;

    match &resident.kind {
        ResidentKind::Tree { leaves } => {
            let trunk = Vec2::new(body.size.x, body.size.y / 2.0);
            out.fill_rect(body.pos, trunk, up, TRUNK_COLOR, 1.0);
            for leaf in leaves {
                let center = body.pos + rotate_local(leaf.pos, up);
                out.fill_circle(center, leaf.size, leaf.color, 1.0);
            }
        }
        ResidentKind::House => {
            let base = Vec2::new(body.size.x, body.size.y / 2.0);
            out.fill_rect(body.pos, base, up, TRUNK_COLOR, 1.0);
            let ridge = body.pos + rotate_local(Vec2::new(0.0, body.size.y), up);
            let eave_l = body.pos + rotate_local(Vec2::new(-body.size.x / 2.0, body.size.y / 2.0), up);
            let eave_r = body.pos + rotate_local(Vec2::new(body.size.x / 2.0, body.size.y / 2.0), up);
            out.fill_polygon(vec![eave_l, ridge, eave_r], ROOF_COLOR, 1.0);
            out.fill_rect(body.pos, Vec2::new(4.0, 8.0), up, DOOR_COLOR, 1.0);
        }
        ResidentKind::Human(human) => {
            let head_size = 4.0;
            let torso = Vec2::new(body.size.x, body.size.y - head_size);
            out.fill_rect(body.pos, torso, up, human.body_color, 1.0);
            let head_center = body.pos + rotate_local(Vec2::new(0.0, body.size.y - head_size), up);
            out.fill_rect(
                head_center,
                Vec2::new(body.size.x, head_size),
                up,
                human.head_color,
                1.0,
            );
        }
    }
}

/// The ship's dart-shaped hull.
pub fn draw_player(player: &Player, body: &Body, out: &mut DrawList) {
    let half = body.size / 2.0;
    let local = [
        Vec2::new(0.0, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(0.0, half.y / 2.0),
        Vec2::new(-half.x, half.y),
    ];
    let points = local
        .iter()
        .map(|p| body.pos + rotate_local(*p, body.rot))
        .collect();
    out.fill_polygon(points, player.color(), 1.0);
}

pub fn draw_particle(particle: &Particle, out: &mut DrawList) {
    out.fill_circle(
        particle.pos,
        particle.size.x * particle.scale,
        particle.color,
        particle.opacity,
    );
}
