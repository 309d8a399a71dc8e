//! Entity types shared by every simulation system
//!
//! All entities carry position, velocity, radius, color and an `active` flag.
//! Systems clear `active` instead of removing mid-iteration; the store culls
//! inactive entities once at the end of the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{EnemyStats, PlayerTuning};

/// Stable entity identifier (unique within a session)
pub type EntityId = u32;

/// Linear RGBA color, carried through for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const fn rgb_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ])
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    pub const fn rgba(self) -> [f32; 4] {
        self.0
    }
}

/// Neon palette
pub mod palette {
    use super::Color;

    pub const NEON_BLUE: Color = Color::rgb_hex(0x00f3ff);
    pub const NEON_PINK: Color = Color::rgb_hex(0xff00ff);
    pub const NEON_GREEN: Color = Color::rgb_hex(0x0aff00);
    pub const NEON_YELLOW: Color = Color::rgb_hex(0xffe600);
    pub const RED: Color = Color::rgb_hex(0xff0000);
    pub const WHITE: Color = Color::rgb_hex(0xffffff);
    pub const BLACK: Color = Color::rgb_hex(0x000000);
    pub const BACKGROUND: Color = Color::rgb_hex(0x050505);
    pub const GRID: Color = Color::rgb_hex(0x1a1a2e);
}

/// The player's ship (one per session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    pub active: bool,
    /// Always within [0, max_hp]
    pub hp: i32,
    pub max_hp: i32,
    pub score: u64,
    /// Ticks until dash is usable again
    pub dash_cooldown: u32,
    /// Ticks until the next shot
    pub weapon_cooldown: u32,
    pub level: u32,
    pub xp: u32,
    /// Remaining invulnerability ticks (>0 blocks damage)
    pub iframe: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: tuning.radius,
            color: tuning.color,
            active: true,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            score: 0,
            dash_cooldown: 0,
            weapon_cooldown: 0,
            level: 1,
            xp: 0,
            iframe: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn dash_ready(&self) -> bool {
        self.dash_cooldown == 0
    }

    /// Apply damage, clamping hp to [0, max_hp]. Returns the new hp.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.hp = (self.hp - amount).clamp(0, self.max_hp);
        self.hp
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Circle, medium speed
    Basic,
    /// Triangle, fast and fragile (wave 2+)
    Dasher,
    /// Square, slow and tough (wave 3+)
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Dasher, EnemyKind::Tank];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Dasher => "dasher",
            EnemyKind::Tank => "tank",
        }
    }
}

/// A hostile walker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    pub active: bool,
    pub hp: i32,
    /// Steering speed (units/tick)
    pub speed: f32,
    /// Score awarded on kill
    pub value: u64,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, stats: &EnemyStats, wave: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: stats.radius,
            color: stats.color,
            active: true,
            hp: stats.hp_at(wave),
            speed: stats.speed,
            value: stats.value_at(wave),
        }
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    pub active: bool,
    pub damage: i32,
    /// Reserved for enemy fire; always false for now
    pub is_enemy: bool,
}

/// Cosmetic spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    pub active: bool,
    /// Ticks left; culled at <= 0
    pub life: f32,
    pub max_life: f32,
    /// Drawn radius
    pub size: f32,
}

impl Particle {
    /// Fade factor for rendering
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(palette::RED.rgba(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(palette::WHITE.with_alpha(0.5).rgba(), [1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_player_damage_clamps() {
        let cfg = SimConfig::default();
        let mut player = Player::new(Vec2::ZERO, &cfg.player);
        assert_eq!(player.take_damage(30), 70);
        assert_eq!(player.take_damage(500), 0);
        assert!(!player.is_alive());
        assert_eq!(player.take_damage(-1000), 100);
    }

    #[test]
    fn test_enemy_stats_by_wave() {
        let cfg = SimConfig::default();
        let e = Enemy::new(1, EnemyKind::Basic, Vec2::ZERO, &cfg.enemies.basic, 1);
        assert_eq!(e.hp, 12);
        assert_eq!(e.value, 10);
        assert_eq!(e.speed, 2.0);

        let t = Enemy::new(2, EnemyKind::Tank, Vec2::ZERO, &cfg.enemies.tank, 4);
        assert_eq!(t.hp, 60);
        assert_eq!(t.radius, 20.0);
    }

    #[test]
    fn test_particle_alpha() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 1.0,
            color: palette::WHITE,
            active: true,
            life: 25.0,
            max_life: 50.0,
            size: 1.0,
        };
        assert!((p.alpha() - 0.5).abs() < 1e-6);
    }
}
