//! Frame builder
//!
//! Turns a [`RenderSnapshot`] into one triangle list in canvas space. Pure and
//! GPU-free, so the layering can be tested without a device.
//!
//! Draw order: grid, particles, projectiles, enemies, player, crosshair.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::sim::{EnemyKind, RenderSnapshot, palette};

/// Spacing of the background grid
pub const GRID_SPACING: f32 = 50.0;
/// Grid scroll per unit of player movement
pub const GRID_PARALLAX: f32 = 0.1;

const CIRCLE_SEGMENTS: u32 = 24;
const STROKE: f32 = 2.0;

/// Grid offset for a player position: -(pos * parallax) mod spacing, in [0, spacing)
pub fn grid_offset(player: Vec2) -> Vec2 {
    let shift = -player * GRID_PARALLAX;
    Vec2::new(
        shift.x.rem_euclid(GRID_SPACING),
        shift.y.rem_euclid(GRID_SPACING),
    )
}

/// Build every vertex for one frame
pub fn build_frame(snapshot: &RenderSnapshot) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let bounds = snapshot.bounds;

    // Grid
    let offset = grid_offset(snapshot.player.pos);
    let mut x = offset.x;
    while x <= bounds.width {
        out.extend(shapes::line(
            Vec2::new(x, 0.0),
            Vec2::new(x, bounds.height),
            1.0,
            palette::GRID,
        ));
        x += GRID_SPACING;
    }
    let mut y = offset.y;
    while y <= bounds.height {
        out.extend(shapes::line(
            Vec2::new(0.0, y),
            Vec2::new(bounds.width, y),
            1.0,
            palette::GRID,
        ));
        y += GRID_SPACING;
    }

    for p in &snapshot.particles {
        let color = p.color.with_alpha(p.color.0[3] * p.alpha.clamp(0.0, 1.0));
        out.extend(shapes::circle(p.pos, p.size, color, 8));
    }

    for p in &snapshot.projectiles {
        out.extend(shapes::circle(p.pos, p.radius, p.color, 12));
    }

    for e in &snapshot.enemies {
        match e.kind {
            EnemyKind::Basic => out.extend(shapes::ring(
                e.pos,
                (e.radius - STROKE).max(0.0),
                e.radius,
                e.color,
                CIRCLE_SEGMENTS,
            )),
            EnemyKind::Dasher => {
                out.extend(shapes::triangle_outline(e.pos, e.radius, STROKE, e.color))
            }
            EnemyKind::Tank => out.extend(shapes::square_outline(e.pos, e.radius, STROKE, e.color)),
        }
    }

    let player = &snapshot.player;
    if player.hp > 0 {
        let edge = if player.iframe > 0 {
            palette::WHITE
        } else {
            player.color
        };
        out.extend(shapes::ship(
            player.pos,
            player.radius,
            player.aim_angle,
            palette::BLACK,
            edge,
        ));
    }

    // Crosshair
    let aim = snapshot.aim;
    out.extend(shapes::ring(aim, 8.0, 10.0, palette::WHITE, 16));
    out.extend(shapes::line(aim - Vec2::X * 14.0, aim + Vec2::X * 14.0, 1.0, palette::WHITE));
    out.extend(shapes::line(aim - Vec2::Y * 14.0, aim + Vec2::Y * 14.0, 1.0, palette::WHITE));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::session::SessionState;
    use crate::sim::SimState;

    fn snapshot(state: &SimState, config: &SimConfig) -> RenderSnapshot {
        RenderSnapshot::capture(state, config, SessionState::Playing, 0)
    }

    #[test]
    fn test_grid_offset_parallax() {
        assert_eq!(grid_offset(Vec2::ZERO), Vec2::ZERO);
        // -(600/10) mod 50 = -60 mod 50 = 40
        assert_eq!(grid_offset(Vec2::new(600.0, 400.0)), Vec2::new(40.0, 10.0));
    }

    #[test]
    fn test_frame_contains_enemies_and_flash() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config, 1);
        let base = build_frame(&snapshot(&state, &config)).len();

        state
            .store
            .spawn_enemy(EnemyKind::Tank, Vec2::new(100.0, 100.0), &config.enemies.tank, 1);
        let with_tank = build_frame(&snapshot(&state, &config));
        assert_eq!(with_tank.len(), base + 24);

        state.player.iframe = 5;
        let flashing = build_frame(&snapshot(&state, &config));
        let white = palette::WHITE.rgba();
        let blue = config.player.color.rgba();
        assert!(!flashing.iter().any(|v| v.color == blue));
        assert!(flashing.iter().any(|v| v.color == white));
    }

    #[test]
    fn test_dead_player_not_drawn() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config, 1);
        let alive = build_frame(&snapshot(&state, &config)).len();
        state.player.hp = 0;
        assert!(build_frame(&snapshot(&state, &config)).len() < alive);
    }
}
