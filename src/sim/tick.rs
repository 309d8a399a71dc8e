//! Fixed-tick simulation step
//!
//! One call advances every system in a fixed order; later systems read what
//! earlier ones wrote this tick (collisions use freshly moved positions).

use super::collision::{resolve_player_contacts, resolve_projectile_hits};
use super::movement::{steer_enemies, update_player, update_projectiles, update_weapon};
use super::state::{GameEvent, SimState};
use crate::config::SimConfig;
use crate::input::TickInput;

/// Advance the simulation by one tick and report what happened.
///
/// Order: player -> weapon -> projectiles -> spawn -> enemy steering ->
/// enemy/player contacts -> projectile hits -> particles -> cull.
pub fn tick(state: &mut SimState, input: &TickInput, config: &SimConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;
    state.aim = input.aim;

    // 1. Player movement + dash
    if update_player(&mut state.player, input, &config.player, &config.bounds) {
        state.particles.emit(
            state.player.pos,
            state.player.color,
            config.particles.dash_burst,
            &config.particles,
            &mut state.rng,
        );
        events.push(GameEvent::DashTriggered);
    }

    // 2. Weapon
    update_weapon(&mut state.player, &mut state.store, input, &config.weapon);

    // 3. Projectile flight
    update_projectiles(&mut state.store, &config.bounds);

    // 4. Spawning
    let wave = state.current_wave(config);
    if let Some((id, kind)) = state.spawner.update(
        &mut state.store,
        config,
        state.player.score,
        wave,
        &mut state.rng,
    ) {
        events.push(GameEvent::EnemySpawned { id, kind });
    }

    // 5. Enemy AI and collisions
    steer_enemies(&mut state.store.enemies, state.player.pos);
    resolve_player_contacts(state, config, &mut events);
    resolve_projectile_hits(state, config, &mut events);

    // 6. Particles
    state.particles.update(&config.particles);

    // 7. Cull
    state.store.cull();
    state.player.iframe = state.player.iframe.saturating_sub(1);

    log::trace!(
        "tick {}: {} enemies, {} projectiles, {} particles",
        state.time_ticks,
        state.store.enemies.len(),
        state.store.projectiles.len(),
        state.particles.len()
    );

    events
}
