//! Input ingestion boundary
//!
//! The input-capture collaborator (DOM events, winit, a test script) writes an
//! [`InputSnapshot`]. The session reads it once per tick and runs it through an
//! [`InputFilter`], so the simulation only ever sees finite, in-bounds values.

use glam::Vec2;

use crate::config::Bounds;
use crate::sim::RenderSnapshot;
use crate::{is_finite_vec, normalize_or_zero};

/// Held directional keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    /// Combined (un-normalized) movement vector, y down
    pub fn vector(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.up {
            v.y -= 1.0;
        }
        if self.down {
            v.y += 1.0;
        }
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        v
    }
}

/// Raw per-frame input as written by the capture layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Movement intent (any length; normalized at ingestion)
    pub movement: Vec2,
    /// Aim point in simulation coordinates
    pub aim: Vec2,
    pub dash: bool,
    pub fire: bool,
}

impl InputSnapshot {
    pub fn from_keys(keys: DirectionKeys, aim: Vec2, dash: bool, fire: bool) -> Self {
        Self {
            movement: keys.vector(),
            aim,
            dash,
            fire,
        }
    }
}

/// Sanitized input consumed by the tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Unit vector or zero
    pub move_dir: Vec2,
    /// Finite aim point inside the canvas
    pub aim: Vec2,
    pub dash: bool,
    pub fire: bool,
}

/// Remembers the last good aim point so a bad pointer event doesn't snap aim
#[derive(Debug, Clone)]
pub struct InputFilter {
    last_aim: Vec2,
}

impl InputFilter {
    pub fn new(initial_aim: Vec2) -> Self {
        Self {
            last_aim: initial_aim,
        }
    }

    pub fn last_aim(&self) -> Vec2 {
        self.last_aim
    }

    /// Reject non-finite values and clamp aim into the canvas
    pub fn ingest(&mut self, raw: &InputSnapshot, bounds: &Bounds) -> TickInput {
        let move_dir = if is_finite_vec(raw.movement) {
            normalize_or_zero(raw.movement)
        } else {
            log::warn!("Dropping non-finite movement input {:?}", raw.movement);
            Vec2::ZERO
        };

        if is_finite_vec(raw.aim) {
            self.last_aim = bounds.clamp_inset(raw.aim, 0.0);
        } else {
            log::warn!("Dropping non-finite aim {:?}, keeping {:?}", raw.aim, self.last_aim);
        }

        TickInput {
            move_dir,
            aim: self.last_aim,
            dash: raw.dash,
            fire: raw.fire,
        }
    }
}

/// Keyboard/mouse state tracked by key code (`KeyboardEvent.code` names)
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pub keys: DirectionKeys,
    pub dash: bool,
    pub fire: bool,
    pub pointer: Vec2,
}

impl KeyState {
    /// Apply a key press/release. Returns false for unmapped codes.
    pub fn set_key(&mut self, code: &str, pressed: bool) -> bool {
        match code {
            "KeyW" | "ArrowUp" => self.keys.up = pressed,
            "KeyS" | "ArrowDown" => self.keys.down = pressed,
            "KeyA" | "ArrowLeft" => self.keys.left = pressed,
            "KeyD" | "ArrowRight" => self.keys.right = pressed,
            "Space" => self.dash = pressed,
            "MouseLeft" => self.fire = pressed,
            _ => return false,
        }
        true
    }

    /// Map a pointer position on a scaled canvas element into simulation space
    pub fn set_pointer(
        &mut self,
        client: Vec2,
        element_origin: Vec2,
        element_size: Vec2,
        bounds: &Bounds,
    ) {
        if element_size.x <= 0.0 || element_size.y <= 0.0 {
            return;
        }
        let scale = Vec2::new(bounds.width / element_size.x, bounds.height / element_size.y);
        self.pointer = (client - element_origin) * scale;
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::from_keys(self.keys, self.pointer, self.dash, self.fire)
    }
}

/// Demo pilot: aims at the nearest enemy, backs away from close ones and
/// dashes out when something gets very close.
pub fn autopilot(snapshot: &RenderSnapshot) -> InputSnapshot {
    let player = &snapshot.player;
    let Some(target) = snapshot.nearest_enemy(player.pos) else {
        // Drift back toward the middle while the arena is empty
        let home = snapshot.bounds.center() - player.pos;
        let movement = if home.length() > 40.0 { home } else { Vec2::ZERO };
        return InputSnapshot {
            movement,
            aim: snapshot.bounds.center() + Vec2::new(1.0, 0.0),
            dash: false,
            fire: true,
        };
    };

    let away = player.pos - target.pos;
    let dist = away.length();
    let danger = target.radius + player.radius;

    // Circle-strafe: back off and slide sideways so we don't pin to a wall
    let tangent = Vec2::new(-away.y, away.x);
    let movement = if dist < danger * 6.0 {
        normalize_or_zero(away) + normalize_or_zero(tangent) * 0.5
    } else {
        normalize_or_zero(tangent) * 0.5
    };
    // Lean toward the center so the walls don't trap us
    let movement = movement + normalize_or_zero(snapshot.bounds.center() - player.pos) * 0.4;

    InputSnapshot {
        movement,
        aim: target.pos,
        dash: snapshot.dash_ready && dist < danger * 2.0,
        fire: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_keys_vector() {
        let keys = DirectionKeys {
            up: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(keys.vector(), Vec2::new(-1.0, -1.0));
        let opposed = DirectionKeys {
            up: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(opposed.vector(), Vec2::ZERO);
    }

    #[test]
    fn test_ingest_normalizes_movement() {
        let bounds = Bounds::default();
        let mut filter = InputFilter::new(bounds.center());
        let raw = InputSnapshot {
            movement: Vec2::new(3.0, 4.0),
            aim: Vec2::new(100.0, 100.0),
            dash: true,
            fire: false,
        };
        let input = filter.ingest(&raw, &bounds);
        assert!((input.move_dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert_eq!(input.aim, Vec2::new(100.0, 100.0));
        assert!(input.dash);
    }

    #[test]
    fn test_ingest_rejects_nan_and_clamps_aim() {
        let bounds = Bounds::default();
        let mut filter = InputFilter::new(bounds.center());
        let bad = InputSnapshot {
            movement: Vec2::new(f32::NAN, 1.0),
            aim: Vec2::new(f32::INFINITY, 10.0),
            ..Default::default()
        };
        let input = filter.ingest(&bad, &bounds);
        assert_eq!(input.move_dir, Vec2::ZERO);
        assert_eq!(input.aim, Vec2::new(600.0, 400.0));

        let outside = InputSnapshot {
            aim: Vec2::new(-50.0, 5000.0),
            ..Default::default()
        };
        let input = filter.ingest(&outside, &bounds);
        assert_eq!(input.aim, Vec2::new(0.0, 800.0));
        assert_eq!(filter.last_aim(), Vec2::new(0.0, 800.0));
    }

    #[test]
    fn test_key_mapping() {
        let mut state = KeyState::default();
        assert!(state.set_key("KeyW", true));
        assert!(state.set_key("ArrowRight", true));
        assert!(state.set_key("Space", true));
        assert!(!state.set_key("KeyQ", true));
        let snap = state.snapshot();
        assert_eq!(snap.movement, Vec2::new(1.0, -1.0));
        assert!(snap.dash);
        state.set_key("KeyW", false);
        assert_eq!(state.snapshot().movement, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_pointer_scaling() {
        let bounds = Bounds::default();
        let mut state = KeyState::default();
        state.set_pointer(
            Vec2::new(310.0, 210.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(600.0, 400.0),
            &bounds,
        );
        assert_eq!(state.pointer, Vec2::new(600.0, 400.0));
        // Degenerate element size is ignored
        state.set_pointer(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, &bounds);
        assert_eq!(state.pointer, Vec2::new(600.0, 400.0));
    }

    #[test]
    fn test_autopilot_targets_nearest_enemy() {
        use crate::config::SimConfig;
        use crate::session::SessionState;
        use crate::sim::{EnemyKind, SimState};

        let config = SimConfig::default();
        let mut state = SimState::new(&config, 5);
        let stats = config.enemies.basic.clone();
        let near = state.player.pos + Vec2::new(80.0, 0.0);
        state
            .store
            .spawn_enemy(EnemyKind::Basic, Vec2::new(20.0, 20.0), &stats, 1);
        state.store.spawn_enemy(EnemyKind::Basic, near, &stats, 1);

        let snap = RenderSnapshot::capture(&state, &config, SessionState::Playing, 0);
        let input = autopilot(&snap);
        assert_eq!(input.aim, near);
        assert!(input.fire);
        // Backing away from a close enemy
        assert!(input.movement.x < 0.0);
    }
}
