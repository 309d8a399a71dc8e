//! Enemy spawning
//!
//! A tick counter fires one spawn whenever it passes the current interval,
//! which shrinks as score grows. Enemies appear just outside a random canvas
//! edge and walk in.

use glam::Vec2;
use rand::Rng;

use super::entities::{EnemyKind, EntityId};
use super::store::EntityStore;
use crate::config::{Bounds, SimConfig, SpawnTuning};

/// Canvas edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn from_index(i: u32) -> Self {
        match i % 4 {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }
}

/// Spawn timer state
#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    /// Ticks since the last spawn
    pub timer: u32,
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.timer = 0;
    }

    /// Advance the timer; spawn one enemy if the interval has passed
    pub fn update<R: Rng>(
        &mut self,
        store: &mut EntityStore,
        config: &SimConfig,
        score: u64,
        wave: u32,
        rng: &mut R,
    ) -> Option<(EntityId, EnemyKind)> {
        self.timer += 1;
        if (self.timer as f32) <= config.spawn.interval_for_score(score) {
            return None;
        }
        self.timer = 0;

        let kind = roll_kind(&config.spawn, wave, rng.random::<f32>());
        let edge = Edge::from_index(rng.random_range(0..4));
        let pos = edge_position(&config.bounds, config.spawn.padding, edge, rng.random::<f32>());
        let id = store.spawn_enemy(kind, pos, config.enemies.stats(kind), wave);
        log::debug!("Spawned {} #{} at {:?} (wave {})", kind.as_str(), id, pos, wave);
        Some((id, kind))
    }
}

/// Weighted variant roll gated by wave
pub fn roll_kind(tuning: &SpawnTuning, wave: u32, roll: f32) -> EnemyKind {
    if roll > tuning.tank_roll && wave > tuning.tank_min_wave {
        EnemyKind::Tank
    } else if roll > tuning.dasher_roll && wave > tuning.dasher_min_wave {
        EnemyKind::Dasher
    } else {
        EnemyKind::Basic
    }
}

/// Position `padding` units outside `edge`, at fraction `t` along it
pub fn edge_position(bounds: &Bounds, padding: f32, edge: Edge, t: f32) -> Vec2 {
    match edge {
        Edge::Top => Vec2::new(t * bounds.width, -padding),
        Edge::Right => Vec2::new(bounds.width + padding, t * bounds.height),
        Edge::Bottom => Vec2::new(t * bounds.width, bounds.height + padding),
        Edge::Left => Vec2::new(-padding, t * bounds.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_gated_by_wave() {
        let tuning = SpawnTuning::default();
        assert_eq!(roll_kind(&tuning, 1, 0.95), EnemyKind::Basic);
        assert_eq!(roll_kind(&tuning, 2, 0.95), EnemyKind::Dasher);
        assert_eq!(roll_kind(&tuning, 3, 0.95), EnemyKind::Tank);
        assert_eq!(roll_kind(&tuning, 3, 0.7), EnemyKind::Dasher);
        assert_eq!(roll_kind(&tuning, 3, 0.6), EnemyKind::Basic);
        assert_eq!(roll_kind(&tuning, 10, 0.1), EnemyKind::Basic);
    }

    #[test]
    fn test_edge_positions_are_off_screen() {
        let bounds = Bounds::default();
        for i in 0..4 {
            let edge = Edge::from_index(i);
            let p = edge_position(&bounds, 50.0, edge, 0.5);
            assert!(!bounds.contains(p), "{:?} spawn {:?} should be off-screen", edge, p);
        }
        assert_eq!(edge_position(&bounds, 50.0, Edge::Left, 0.25), Vec2::new(-50.0, 200.0));
    }

    #[test]
    fn test_spawns_after_interval() {
        let config = SimConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut store = EntityStore::new();
        let mut director = SpawnDirector::new();

        for _ in 0..60 {
            assert!(director.update(&mut store, &config, 0, 1, &mut rng).is_none());
        }
        let spawned = director.update(&mut store, &config, 0, 1, &mut rng);
        assert!(matches!(spawned, Some((_, EnemyKind::Basic))));
        assert_eq!(director.timer, 0);
        assert_eq!(store.enemies.len(), 1);
        assert_eq!(store.enemies[0].hp, 12);
    }

    #[test]
    fn test_interval_floor_at_high_score() {
        let config = SimConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut store = EntityStore::new();
        let mut director = SpawnDirector::new();

        let mut ticks = 0;
        while director.update(&mut store, &config, 50_000, 1, &mut rng).is_none() {
            ticks += 1;
        }
        assert_eq!(ticks, 20);
    }
}
