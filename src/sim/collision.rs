//! Collision detection and response
//!
//! Everything is a circle. Two pairwise passes per tick:
//! 1. enemy vs player (contact damage, recovery iframes, death)
//! 2. projectile vs enemy (one hit per projectile, kills, score, waves)
//!
//! Populations are tens of entities, so both passes are plain O(n*m) loops.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, SimState};
use crate::config::SimConfig;
use crate::{distance, wave_for_score};

/// Circle-circle overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    distance(a, b) < radius_a + radius_b
}

/// Enemy vs player pass
pub fn resolve_player_contacts(
    state: &mut SimState,
    config: &SimConfig,
    events: &mut Vec<GameEvent>,
) {
    let contact = &config.contact;
    let player = &mut state.player;

    for enemy in state.store.enemies.iter().filter(|e| e.active) {
        if player.iframe > 0 {
            break;
        }
        if !circles_overlap(enemy.pos, enemy.radius, player.pos, player.radius) {
            continue;
        }

        let was_alive = player.is_alive();
        let hp = player.take_damage(contact.damage);
        player.iframe = contact.recovery_iframes;
        state.particles.emit(
            player.pos,
            config.particles.damage_color,
            config.particles.damage_burst,
            &config.particles,
            &mut state.rng,
        );
        events.push(GameEvent::PlayerHit { hp });
        log::debug!("Player hit by {} #{}, hp {}", enemy.kind.as_str(), enemy.id, hp);

        if hp > 0 && hp <= contact.low_health_threshold && !state.low_health_warned {
            state.low_health_warned = true;
            events.push(GameEvent::LowHealth { hp });
        }
        if was_alive && hp <= 0 && !state.death_reported {
            state.death_reported = true;
            events.push(GameEvent::PlayerDied);
            log::info!("Player destroyed at score {}", player.score);
        }
    }

    // Re-arm the warning once the player is healthy again
    if player.hp > contact.low_health_threshold {
        state.low_health_warned = false;
    }
}

/// Projectile vs enemy pass
pub fn resolve_projectile_hits(
    state: &mut SimState,
    config: &SimConfig,
    events: &mut Vec<GameEvent>,
) {
    let enemies = &mut state.store.enemies;

    for projectile in state.store.projectiles.iter_mut().filter(|p| p.active) {
        let Some(enemy) = enemies.iter_mut().find(|e| {
            e.active && circles_overlap(projectile.pos, projectile.radius, e.pos, e.radius)
        }) else {
            continue;
        };

        // A projectile registers exactly one hit
        projectile.active = false;
        enemy.hp -= projectile.damage;
        state.particles.emit(
            enemy.pos,
            enemy.color,
            config.particles.hit_burst,
            &config.particles,
            &mut state.rng,
        );

        if enemy.hp > 0 {
            continue;
        }

        enemy.active = false;
        state.particles.emit(
            enemy.pos,
            enemy.color,
            config.particles.death_burst,
            &config.particles,
            &mut state.rng,
        );
        state.player.score += enemy.value;
        state.enemies_killed += 1;
        events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            kind: enemy.kind,
            value: enemy.value,
        });
        log::debug!(
            "Killed {} #{} (+{}), score {}",
            enemy.kind.as_str(),
            enemy.id,
            enemy.value,
            state.player.score
        );

        let wave = wave_for_score(state.player.score, config.scoring.score_per_wave);
        if wave > state.wave {
            state.wave = wave;
            events.push(GameEvent::WaveAdvanced { wave });
            log::info!("Wave {} reached at score {}", wave, state.player.score);
        }

        if state.rng.random::<f64>() < config.scoring.kill_streak_chance {
            events.push(GameEvent::KillStreak);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{EnemyKind, palette};

    fn setup() -> (SimConfig, SimState) {
        let config = SimConfig::default().with_seed(1);
        let state = SimState::new(&config, 1);
        (config, state)
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_contact_damages_and_grants_iframes() {
        let (config, mut state) = setup();
        let pos = state.player.pos;
        state.store.spawn_enemy(EnemyKind::Basic, pos, &config.enemies.basic, 1);
        state.store.spawn_enemy(EnemyKind::Basic, pos, &config.enemies.basic, 1);

        let mut events = Vec::new();
        resolve_player_contacts(&mut state, &config, &mut events);
        // Second enemy blocked by the fresh iframes
        assert_eq!(state.player.hp, 90);
        assert_eq!(state.player.iframe, 30);
        assert_eq!(events, vec![GameEvent::PlayerHit { hp: 90 }]);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_contact_skipped_during_iframes() {
        let (config, mut state) = setup();
        let pos = state.player.pos;
        state.store.spawn_enemy(EnemyKind::Tank, pos, &config.enemies.tank, 3);
        state.player.iframe = 1;

        let mut events = Vec::new();
        resolve_player_contacts(&mut state, &config, &mut events);
        assert_eq!(state.player.hp, 100);
        assert!(events.is_empty());
    }

    #[test]
    fn test_low_health_raised_once_per_crossing() {
        let (config, mut state) = setup();
        let pos = state.player.pos;
        state.store.spawn_enemy(EnemyKind::Basic, pos, &config.enemies.basic, 1);
        state.player.hp = 40;

        let mut events = Vec::new();
        resolve_player_contacts(&mut state, &config, &mut events);
        assert!(events.contains(&GameEvent::LowHealth { hp: 30 }));

        events.clear();
        state.player.iframe = 0;
        resolve_player_contacts(&mut state, &config, &mut events);
        assert_eq!(events, vec![GameEvent::PlayerHit { hp: 20 }]);

        // Healed above threshold re-arms the warning
        state.player.hp = 50;
        state.player.iframe = 0;
        state.store.clear();
        resolve_player_contacts(&mut state, &config, &mut events);
        assert!(!state.low_health_warned);
    }

    #[test]
    fn test_death_reported_exactly_once() {
        let (config, mut state) = setup();
        let pos = state.player.pos;
        state.store.spawn_enemy(EnemyKind::Basic, pos, &config.enemies.basic, 1);
        state.player.hp = 10;

        let mut events = Vec::new();
        resolve_player_contacts(&mut state, &config, &mut events);
        assert_eq!(state.player.hp, 0);
        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LowHealth { .. })));

        events.clear();
        state.player.iframe = 0;
        resolve_player_contacts(&mut state, &config, &mut events);
        assert_eq!(state.player.hp, 0);
        assert!(!events.contains(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_projectile_hits_only_one_enemy() {
        let (config, mut state) = setup();
        let spot = Vec2::new(300.0, 300.0);
        state.store.spawn_enemy(EnemyKind::Tank, spot, &config.enemies.tank, 1);
        state.store.spawn_enemy(EnemyKind::Tank, spot, &config.enemies.tank, 1);
        state.store.spawn_projectile(spot, Vec2::ZERO, 4.0, palette::WHITE, 10);

        let mut events = Vec::new();
        resolve_projectile_hits(&mut state, &config, &mut events);
        assert!(!state.store.projectiles[0].active);
        assert_eq!(state.store.enemies[0].hp, 35);
        assert_eq!(state.store.enemies[1].hp, 45);
        assert!(events.is_empty());
    }

    #[test]
    fn test_basic_enemy_killed_on_hit_crossing_zero() {
        let (config, mut state) = setup();
        let spot = Vec2::new(300.0, 300.0);
        state.store.spawn_enemy(EnemyKind::Basic, spot, &config.enemies.basic, 1);
        assert_eq!(state.store.enemies[0].hp, 12);
        for _ in 0..3 {
            state.store.spawn_projectile(spot, Vec2::ZERO, 4.0, palette::WHITE, 10);
        }

        let mut events = Vec::new();
        resolve_projectile_hits(&mut state, &config, &mut events);

        assert_eq!(state.store.enemies[0].hp, -8);
        assert!(!state.store.enemies[0].active);
        assert_eq!(state.score(), 10);
        assert_eq!(state.enemies_killed, 1);
        let kills = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        // Third shot found nothing to hit
        assert!(state.store.projectiles[2].active);
    }

    #[test]
    fn test_wave_advances_once_per_crossing() {
        let (mut config, mut state) = setup();
        config.scoring.kill_streak_chance = 0.0;
        state.player.score = 490;
        let spot = Vec2::new(300.0, 300.0);
        for _ in 0..2 {
            state.store.spawn_enemy(EnemyKind::Basic, spot, &config.enemies.basic, 1);
            state.store.spawn_projectile(spot, Vec2::ZERO, 4.0, palette::WHITE, 50);
        }

        let mut events = Vec::new();
        resolve_projectile_hits(&mut state, &config, &mut events);
        assert_eq!(state.score(), 510);
        assert_eq!(state.wave, 2);
        let waves: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::WaveAdvanced { .. }))
            .collect();
        assert_eq!(waves, vec![&GameEvent::WaveAdvanced { wave: 2 }]);
    }

    #[test]
    fn test_kill_streak_with_certain_chance() {
        let (mut config, mut state) = setup();
        config.scoring.kill_streak_chance = 1.0;
        let spot = Vec2::new(300.0, 300.0);
        state.store.spawn_enemy(EnemyKind::Basic, spot, &config.enemies.basic, 1);
        state.store.spawn_projectile(spot, Vec2::ZERO, 4.0, palette::WHITE, 50);

        let mut events = Vec::new();
        resolve_projectile_hits(&mut state, &config, &mut events);
        assert!(events.contains(&GameEvent::KillStreak));
    }
}
