//! Read-only per-tick view for the presentation layer
//!
//! A plain copy of what the renderer and HUD need. Holding one never keeps
//! simulation state alive or lets a renderer mutate it.

use glam::Vec2;
use serde::Serialize;

use super::entities::{Color, EnemyKind, EntityId};
use super::movement::is_dashing;
use super::state::SimState;
use crate::config::{Bounds, SimConfig};
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    pub iframe: u32,
    /// Heading from the player toward the aim point (radians, atan2 in y-down space)
    pub aim_angle: f32,
    pub dashing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
    /// life / max_life
    pub alpha: f32,
}

/// Everything needed to draw one frame and its HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub session: SessionState,
    pub tick: u64,
    pub bounds: Bounds,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub aim: Vec2,
    pub score: u64,
    pub high_score: u64,
    pub hp: i32,
    pub wave: u32,
    pub enemies_killed: u32,
    pub dash_ready: bool,
}

impl RenderSnapshot {
    /// Copy the active entities out of the simulation
    pub fn capture(
        state: &SimState,
        config: &SimConfig,
        session: SessionState,
        high_score: u64,
    ) -> Self {
        let player = &state.player;
        let to_aim = state.aim - player.pos;
        let aim_angle = if to_aim == Vec2::ZERO {
            0.0
        } else {
            to_aim.y.atan2(to_aim.x)
        };

        Self {
            session,
            tick: state.time_ticks,
            bounds: config.bounds,
            player: PlayerView {
                pos: player.pos,
                vel: player.vel,
                radius: player.radius,
                color: player.color,
                hp: player.hp,
                max_hp: player.max_hp,
                level: player.level,
                iframe: player.iframe,
                aim_angle,
                dashing: is_dashing(player, &config.player),
            },
            enemies: state
                .store
                .active_enemies()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    radius: e.radius,
                    color: e.color,
                    hp: e.hp,
                })
                .collect(),
            projectiles: state
                .store
                .active_projectiles()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    radius: p.radius,
                    color: p.color,
                })
                .collect(),
            particles: state
                .particles
                .particles()
                .iter()
                .filter(|p| p.active)
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: p.size,
                    color: p.color,
                    alpha: p.alpha(),
                })
                .collect(),
            aim: state.aim,
            score: player.score,
            high_score: high_score.max(player.score),
            hp: player.hp,
            wave: state.current_wave(config),
            enemies_killed: state.enemies_killed,
            dash_ready: player.dash_ready(),
        }
    }

    /// Closest enemy to a point, looked up fresh on every call
    pub fn nearest_enemy(&self, pos: Vec2) -> Option<&EnemyView> {
        self.enemies.iter().min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_skips_inactive() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config, 3);
        state
            .store
            .spawn_enemy(EnemyKind::Basic, Vec2::new(10.0, 10.0), &config.enemies.basic, 1);
        state
            .store
            .spawn_enemy(EnemyKind::Tank, Vec2::new(20.0, 20.0), &config.enemies.tank, 1);
        state.store.enemies[0].active = false;
        state.aim = state.player.pos + Vec2::new(0.0, 10.0);

        let snap = RenderSnapshot::capture(&state, &config, SessionState::Playing, 0);
        assert_eq!(snap.enemies.len(), 1);
        assert_eq!(snap.enemies[0].kind, EnemyKind::Tank);
        assert_eq!(snap.wave, 1);
        assert!(snap.dash_ready);
        assert!((snap.player.aim_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_enemy_ignores_inactive() {
        let config = SimConfig::default();
        let mut state = SimState::new(&config, 3);
        let stats = config.enemies.basic.clone();
        state
            .store
            .spawn_enemy(EnemyKind::Basic, Vec2::new(10.0, 0.0), &stats, 1);
        let far = state
            .store
            .spawn_enemy(EnemyKind::Basic, Vec2::new(50.0, 0.0), &stats, 1);
        state.store.enemies[0].active = false;

        let snap = RenderSnapshot::capture(&state, &config, SessionState::Playing, 0);
        assert_eq!(snap.nearest_enemy(Vec2::ZERO).map(|e| e.id), Some(far));

        state.store.clear();
        let snap = RenderSnapshot::capture(&state, &config, SessionState::Playing, 0);
        assert!(snap.nearest_enemy(Vec2::ZERO).is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let config = SimConfig::default();
        let state = SimState::new(&config, 3);
        let snap = RenderSnapshot::capture(&state, &config, SessionState::Menu, 250);
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"session\":\"menu\""));
        assert!(json.contains("\"high_score\":250"));
    }
}
