//! Entity storage and lifecycle
//!
//! Owns the enemy and projectile collections. Nothing outside the store holds
//! references into them across ticks; "nearest enemy" style lookups are
//! recomputed every tick so culling never leaves a dangling handle.

use glam::Vec2;

use super::entities::{Color, Enemy, EnemyKind, EntityId, Projectile};
use crate::config::EnemyStats;

/// Counts of entities dropped by one [`EntityStore::cull`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    pub enemies: usize,
    pub projectiles: usize,
}

/// Enemy and projectile collections
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        pos: Vec2,
        stats: &EnemyStats,
        wave: u32,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind, pos, stats, wave));
        id
    }

    pub fn spawn_projectile(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        color: Color,
        damage: i32,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos,
            vel,
            radius,
            color,
            active: true,
            damage,
            is_enemy: false,
        });
        id
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn active_projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.active)
    }

    /// Drop every inactive entity (end of tick)
    pub fn cull(&mut self) -> CullStats {
        let enemies_before = self.enemies.len();
        let projectiles_before = self.projectiles.len();
        self.enemies.retain(|e| e.active);
        self.projectiles.retain(|p| p.active);
        CullStats {
            enemies: enemies_before - self.enemies.len(),
            projectiles: projectiles_before - self.projectiles.len(),
        }
    }

    /// Remove everything (session reset). IDs keep counting.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.projectiles.is_empty()
    }
}
