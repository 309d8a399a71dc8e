//! Motion integration
//!
//! Player: acceleration + friction + speed cap, with a dash that suspends
//! normal control for its duration. Weapon: cooldown-gated auto fire toward the
//! aim point. Projectiles: straight-line flight, deactivated off-canvas.
//! Enemies: seek the player plus local separation from overlapping neighbors.

use glam::Vec2;

use super::entities::{Enemy, EntityId, Player};
use super::store::EntityStore;
use crate::config::{Bounds, PlayerTuning, WeaponTuning};
use crate::input::TickInput;
use crate::{direction, normalize_or_zero};

/// Player is coasting on dash velocity (first `dash_duration` ticks of the cooldown)
pub fn is_dashing(player: &Player, tuning: &PlayerTuning) -> bool {
    player.dash_cooldown > tuning.dash_cooldown.saturating_sub(tuning.dash_duration)
}

/// Integrate player movement for one tick. Returns true if a dash triggered.
pub fn update_player(
    player: &mut Player,
    input: &TickInput,
    tuning: &PlayerTuning,
    bounds: &Bounds,
) -> bool {
    let move_dir = normalize_or_zero(input.move_dir);

    if player.dash_cooldown > 0 {
        player.dash_cooldown -= 1;
    }
    let dashing = is_dashing(player, tuning);

    let mut dashed = false;
    if input.dash && player.dash_ready() {
        player.dash_cooldown = tuning.dash_cooldown;
        // Dash along held direction, or toward the aim point when standing still
        let dash_dir = if move_dir == Vec2::ZERO {
            direction(player.pos, input.aim)
        } else {
            move_dir
        };
        player.vel = dash_dir * tuning.dash_speed;
        player.iframe = player.iframe.max(tuning.dash_iframes);
        dashed = true;
    } else if !dashing {
        player.vel += move_dir * tuning.acceleration;
        player.vel *= tuning.friction;
        player.vel = player.vel.clamp_length_max(tuning.max_speed);
    }

    player.pos += player.vel;
    player.pos = bounds.clamp_inset(player.pos, player.radius);
    dashed
}

/// Tick the weapon cooldown and fire one projectile when ready
pub fn update_weapon(
    player: &mut Player,
    store: &mut EntityStore,
    input: &TickInput,
    weapon: &WeaponTuning,
) -> Option<EntityId> {
    if player.weapon_cooldown > 0 {
        player.weapon_cooldown -= 1;
    }
    let firing = input.fire || weapon.auto_fire;
    if !firing || player.weapon_cooldown > 0 {
        return None;
    }

    // Aim point on top of the player: fire along +x
    let mut aim_dir = direction(player.pos, input.aim);
    if aim_dir == Vec2::ZERO {
        aim_dir = Vec2::X;
    }
    let id = store.spawn_projectile(
        player.pos + aim_dir * weapon.muzzle_offset,
        aim_dir * weapon.projectile_speed,
        weapon.projectile_radius,
        weapon.color,
        weapon.damage_for_level(player.level),
    );
    player.weapon_cooldown = weapon.fire_rate;
    Some(id)
}

/// Move projectiles; deactivate any that left the canvas. Returns how many left.
pub fn update_projectiles(store: &mut EntityStore, bounds: &Bounds) -> usize {
    let mut exited = 0;
    for p in store.projectiles.iter_mut().filter(|p| p.active) {
        p.pos += p.vel;
        if !bounds.contains(p.pos) {
            p.active = false;
            exited += 1;
        }
    }
    exited
}

/// Repulsion from every other active enemy overlapping `enemies[index]`
pub fn separation(enemies: &[Enemy], index: usize) -> Vec2 {
    let me = &enemies[index];
    enemies
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != index && other.active)
        .fold(Vec2::ZERO, |push, (_, other)| {
            let offset = me.pos - other.pos;
            let dist = offset.length();
            // Coincident centers give no usable direction
            if dist > 0.0 && dist < me.radius + other.radius {
                push + offset / dist
            } else {
                push
            }
        })
}

/// Seek the target with per-variant speed, plus separation.
///
/// Updates in place: later enemies see positions already moved this tick.
pub fn steer_enemies(enemies: &mut [Enemy], target: Vec2) {
    for i in 0..enemies.len() {
        if !enemies[i].active {
            continue;
        }
        let push = separation(enemies, i);
        let enemy = &mut enemies[i];
        let seek = direction(enemy.pos, target);
        let delta = seek * enemy.speed + push;
        enemy.vel = delta;
        enemy.pos += delta;
    }
}
