//! Game balance and world configuration
//!
//! Every tunable the tick loop reads lives here so tests can override
//! constants (faster spawns, tiny arenas) without touching the systems.
//! Serialized as JSON; missing fields fall back to the reference values.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, SCORE_PER_WAVE};
use crate::error::{ConfigError, ConfigResult};
use crate::sim::entities::{Color, EnemyKind, palette};

/// Logical play-field size. Origin is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Point is inside the canvas (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Clamp a point into the canvas shrunk by `inset` on every side
    pub fn clamp_inset(&self, p: Vec2, inset: f32) -> Vec2 {
        let max_x = (self.width - inset).max(inset);
        let max_y = (self.height - inset).max(inset);
        Vec2::new(p.x.clamp(inset, max_x), p.y.clamp(inset, max_y))
    }
}

/// Player movement and dash tuning (units per tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub max_hp: i32,
    pub acceleration: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub dash_speed: f32,
    pub dash_cooldown: u32,
    /// Ticks at the start of the cooldown window where the player coasts
    pub dash_duration: u32,
    pub dash_iframes: u32,
    pub color: Color,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            max_hp: 100,
            acceleration: 0.5,
            friction: 0.92,
            max_speed: 4.0,
            dash_speed: 15.0,
            dash_cooldown: 60,
            dash_duration: 10,
            dash_iframes: 10,
            color: palette::NEON_BLUE,
        }
    }
}

/// Player weapon tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Ticks between shots
    pub fire_rate: u32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Spawn distance from the player center along the aim direction
    pub muzzle_offset: f32,
    pub base_damage: i32,
    pub damage_per_level: i32,
    /// Fire every time the cooldown allows, regardless of the fire button
    pub auto_fire: bool,
    pub color: Color,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            fire_rate: 8,
            projectile_speed: 12.0,
            projectile_radius: 4.0,
            muzzle_offset: 20.0,
            base_damage: 10,
            damage_per_level: 2,
            auto_fire: true,
            color: palette::WHITE,
        }
    }
}

impl WeaponTuning {
    pub fn damage_for_level(&self, level: u32) -> i32 {
        self.base_damage + self.damage_per_level * level as i32
    }
}

/// Enemy-on-player contact damage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTuning {
    pub damage: i32,
    /// Invulnerability granted after taking a hit
    pub recovery_iframes: u32,
    /// At or below this hp the low-health commentary fires
    pub low_health_threshold: i32,
}

impl Default for ContactTuning {
    fn default() -> Self {
        Self {
            damage: 10,
            recovery_iframes: 30,
            low_health_threshold: 30,
        }
    }
}

/// Per-variant enemy stats. Hp and value scale linearly with wave.
#[derive(Debug, Clone, Serialize)]
pub struct EnemyStats {
    pub base_hp: i32,
    pub hp_per_wave: i32,
    pub speed: f32,
    pub radius: f32,
    pub base_value: u64,
    pub value_per_wave: u64,
    pub color: Color,
}

impl EnemyStats {
    pub fn hp_at(&self, wave: u32) -> i32 {
        self.base_hp + self.hp_per_wave * wave as i32
    }

    pub fn value_at(&self, wave: u32) -> u64 {
        self.base_value + self.value_per_wave * wave as u64
    }
}

/// Stat table for every enemy variant. Each variant's missing fields fall back
/// to that variant's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "EnemyTableOverrides")]
pub struct EnemyTable {
    pub basic: EnemyStats,
    pub dasher: EnemyStats,
    pub tank: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            basic: EnemyStats {
                base_hp: 10,
                hp_per_wave: 2,
                speed: 2.0,
                radius: 12.0,
                base_value: 10,
                value_per_wave: 0,
                color: palette::NEON_PINK,
            },
            dasher: EnemyStats {
                base_hp: 15,
                hp_per_wave: 2,
                speed: 4.0,
                radius: 10.0,
                base_value: 20,
                value_per_wave: 0,
                color: palette::NEON_GREEN,
            },
            tank: EnemyStats {
                base_hp: 40,
                hp_per_wave: 5,
                speed: 1.0,
                radius: 20.0,
                base_value: 30,
                value_per_wave: 0,
                color: palette::NEON_YELLOW,
            },
        }
    }
}

/// Partial stats as they appear in a config document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnemyStatsOverrides {
    base_hp: Option<i32>,
    hp_per_wave: Option<i32>,
    speed: Option<f32>,
    radius: Option<f32>,
    base_value: Option<u64>,
    value_per_wave: Option<u64>,
    color: Option<Color>,
}

impl EnemyStatsOverrides {
    fn apply(self, base: EnemyStats) -> EnemyStats {
        EnemyStats {
            base_hp: self.base_hp.unwrap_or(base.base_hp),
            hp_per_wave: self.hp_per_wave.unwrap_or(base.hp_per_wave),
            speed: self.speed.unwrap_or(base.speed),
            radius: self.radius.unwrap_or(base.radius),
            base_value: self.base_value.unwrap_or(base.base_value),
            value_per_wave: self.value_per_wave.unwrap_or(base.value_per_wave),
            color: self.color.unwrap_or(base.color),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnemyTableOverrides {
    basic: EnemyStatsOverrides,
    dasher: EnemyStatsOverrides,
    tank: EnemyStatsOverrides,
}

impl From<EnemyTableOverrides> for EnemyTable {
    fn from(overrides: EnemyTableOverrides) -> Self {
        let defaults = EnemyTable::default();
        Self {
            basic: overrides.basic.apply(defaults.basic),
            dasher: overrides.dasher.apply(defaults.dasher),
            tank: overrides.tank.apply(defaults.tank),
        }
    }
}

impl EnemyTable {
    pub fn stats(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Basic => &self.basic,
            EnemyKind::Dasher => &self.dasher,
            EnemyKind::Tank => &self.tank,
        }
    }
}

/// Spawn pacing and variant roll
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Ticks between spawns at score 0
    pub initial_interval: f32,
    /// Floor the interval never drops below
    pub min_interval: f32,
    /// Score per one-tick reduction of the interval
    pub score_per_tick_faster: f32,
    /// Distance outside the canvas edge enemies appear at
    pub padding: f32,
    /// Roll above this (and wave > tank_min_wave) spawns a tank
    pub tank_roll: f32,
    pub tank_min_wave: u32,
    /// Roll above this (and wave > dasher_min_wave) spawns a dasher
    pub dasher_roll: f32,
    pub dasher_min_wave: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            initial_interval: 60.0,
            min_interval: 20.0,
            score_per_tick_faster: 100.0,
            padding: 50.0,
            tank_roll: 0.8,
            tank_min_wave: 2,
            dasher_roll: 0.6,
            dasher_min_wave: 1,
        }
    }
}

impl SpawnTuning {
    /// interval = max(min, initial - score / score_per_tick_faster)
    pub fn interval_for_score(&self, score: u64) -> f32 {
        (self.initial_interval - score as f32 / self.score_per_tick_faster).max(self.min_interval)
    }
}

/// Particle bursts and decay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Visual size upper bound (drawn radius)
    pub max_size: f32,
    pub min_life: f32,
    pub max_life: f32,
    /// Velocity multiplier applied every tick
    pub damping: f32,
    pub hit_burst: u32,
    pub death_burst: u32,
    pub damage_burst: u32,
    pub dash_burst: u32,
    pub damage_color: Color,
    /// Hard cap on live particles (None = unbounded)
    pub max_particles: Option<usize>,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            min_speed: 1.0,
            max_speed: 4.0,
            min_radius: 1.0,
            max_radius: 3.0,
            max_size: 3.0,
            min_life: 30.0,
            max_life: 50.0,
            damping: 0.95,
            hit_burst: 2,
            death_burst: 8,
            damage_burst: 10,
            dash_burst: 8,
            damage_color: palette::RED,
            max_particles: None,
        }
    }
}

/// Score to wave mapping and kill commentary odds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub score_per_wave: u64,
    /// Probability per kill of raising a kill-streak line
    pub kill_streak_chance: f64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            score_per_wave: SCORE_PER_WAVE,
            kill_streak_chance: 0.05,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub bounds: Bounds,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub contact: ContactTuning,
    pub enemies: EnemyTable,
    pub spawn: SpawnTuning,
    pub particles: ParticleTuning,
    pub scoring: ScoringTuning,
    /// RNG seed (None = seeded from entropy)
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_bounds(mut self, width: f32, height: f32) -> Self {
        self.bounds = Bounds::new(width, height);
        self
    }

    /// Fixed spawn interval (min == initial), handy for tests
    pub fn with_spawn_interval(mut self, ticks: f32) -> Self {
        self.spawn.initial_interval = ticks;
        self.spawn.min_interval = ticks;
        self
    }

    /// Reject values the systems cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let b = &self.bounds;
        if !(b.width.is_finite() && b.height.is_finite() && b.width > 0.0 && b.height > 0.0) {
            return Err(ConfigError::invalid("bounds", "width and height must be positive"));
        }
        let p = &self.player;
        if p.max_hp <= 0 {
            return Err(ConfigError::invalid("player.max_hp", "must be positive"));
        }
        if p.radius < 0.0 || p.max_speed <= 0.0 {
            return Err(ConfigError::invalid(
                "player",
                "radius must be non-negative and max_speed positive",
            ));
        }
        if !(0.0..=1.0).contains(&p.friction) {
            return Err(ConfigError::invalid("player.friction", "must be within [0, 1]"));
        }
        if p.dash_duration > p.dash_cooldown {
            return Err(ConfigError::invalid(
                "player.dash_duration",
                "cannot exceed dash_cooldown",
            ));
        }
        if self.weapon.fire_rate == 0 {
            return Err(ConfigError::invalid("weapon.fire_rate", "must be at least 1 tick"));
        }
        let s = &self.spawn;
        if s.min_interval < 0.0 || s.min_interval > s.initial_interval {
            return Err(ConfigError::invalid(
                "spawn.min_interval",
                "must be within [0, initial_interval]",
            ));
        }
        if s.score_per_tick_faster <= 0.0 {
            return Err(ConfigError::invalid("spawn.score_per_tick_faster", "must be positive"));
        }
        let pt = &self.particles;
        if pt.min_speed > pt.max_speed
            || pt.min_radius > pt.max_radius
            || pt.min_life > pt.max_life
        {
            return Err(ConfigError::invalid("particles", "min must not exceed max"));
        }
        if pt.min_life <= 0.0 {
            return Err(ConfigError::invalid("particles.min_life", "must be positive"));
        }
        if self.scoring.score_per_wave == 0 {
            return Err(ConfigError::invalid("scoring.score_per_wave", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.scoring.kill_streak_chance) {
            return Err(ConfigError::invalid(
                "scoring.kill_streak_chance",
                "must be a probability in [0, 1]",
            ));
        }
        Ok(())
    }
}
