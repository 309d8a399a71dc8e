//! Simulation state
//!
//! One explicitly owned struct mutated in place by every system in tick order.
//! The presentation layer never sees it directly; it gets a
//! [`super::RenderSnapshot`] copy once per tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::Player;
use super::particles::ParticleSystem;
use super::spawn::SpawnDirector;
use super::store::EntityStore;
use crate::config::SimConfig;
use crate::wave_for_score;

/// Notable things that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnemySpawned {
        id: u32,
        kind: super::EnemyKind,
    },
    DashTriggered,
    /// Enemy touched the player; hp is the value after damage
    PlayerHit { hp: i32 },
    /// hp dropped to or below the low-health threshold (once per crossing)
    LowHealth { hp: i32 },
    /// hp reached 0 (once per session)
    PlayerDied,
    EnemyKilled {
        id: u32,
        kind: super::EnemyKind,
        value: u64,
    },
    /// Score crossed into a new wave
    WaveAdvanced { wave: u32 },
    /// Random per-kill roll for announcer flavor
    KillStreak,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Ticks simulated since the last reset
    pub time_ticks: u64,
    pub player: Player,
    pub store: EntityStore,
    pub particles: ParticleSystem,
    pub spawner: SpawnDirector,
    /// Aim point used on the last tick (for the renderer)
    pub aim: Vec2,
    pub enemies_killed: u32,
    /// Wave as of the end of the previous tick
    pub wave: u32,
    /// Low-health line already raised for the current dip below threshold
    pub low_health_warned: bool,
    /// Death already reported this session
    pub death_reported: bool,
}

impl SimState {
    pub fn new(config: &SimConfig, seed: u64) -> Self {
        let center = config.bounds.center();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            player: Player::new(center, &config.player),
            store: EntityStore::new(),
            particles: ParticleSystem::new(),
            spawner: SpawnDirector::new(),
            aim: center,
            enemies_killed: 0,
            wave: 1,
            low_health_warned: false,
            death_reported: false,
        }
    }

    /// Back to a fresh run. The RNG keeps its stream so runs differ.
    pub fn reset(&mut self, config: &SimConfig) {
        let center = config.bounds.center();
        self.time_ticks = 0;
        self.player = Player::new(center, &config.player);
        self.store.clear();
        self.particles.clear();
        self.spawner.reset();
        self.aim = center;
        self.enemies_killed = 0;
        self.wave = 1;
        self.low_health_warned = false;
        self.death_reported = false;
    }

    pub fn score(&self) -> u64 {
        self.player.score
    }

    /// Current wave, derived from score
    pub fn current_wave(&self, config: &SimConfig) -> u32 {
        wave_for_score(self.player.score, config.scoring.score_per_wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;

    #[test]
    fn test_new_state_defaults() {
        let cfg = SimConfig::default();
        let state = SimState::new(&cfg, 42);
        assert_eq!(state.player.pos, Vec2::new(600.0, 400.0));
        assert_eq!(state.player.hp, 100);
        assert_eq!(state.score(), 0);
        assert_eq!(state.current_wave(&cfg), 1);
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let cfg = SimConfig::default();
        let mut state = SimState::new(&cfg, 42);
        state.player.hp = 5;
        state.player.score = 1200;
        state.wave = 3;
        state.enemies_killed = 9;
        state.low_health_warned = true;
        state.death_reported = true;
        state
            .store
            .spawn_enemy(EnemyKind::Tank, Vec2::ZERO, &cfg.enemies.tank, 3);
        let mut rng = Pcg32::seed_from_u64(0);
        state
            .particles
            .emit(Vec2::ZERO, cfg.particles.damage_color, 4, &cfg.particles, &mut rng);

        state.reset(&cfg);
        assert_eq!(state.player.hp, 100);
        assert_eq!(state.score(), 0);
        assert_eq!(state.wave, 1);
        assert_eq!(state.enemies_killed, 0);
        assert!(!state.low_health_warned);
        assert!(!state.death_reported);
        assert!(state.store.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.current_wave(&cfg), 1);
    }
}
