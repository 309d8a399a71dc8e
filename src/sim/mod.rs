//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, systems run in a fixed order
//! - Seeded RNG owned by the state
//! - Soft deletion via `active`, culled at end of tick
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod movement;
pub mod particles;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{circles_overlap, resolve_player_contacts, resolve_projectile_hits};
pub use entities::{Color, Enemy, EnemyKind, EntityId, Particle, Player, Projectile, palette};
pub use particles::ParticleSystem;
pub use snapshot::{EnemyView, ParticleView, PlayerView, ProjectileView, RenderSnapshot};
pub use spawn::SpawnDirector;
pub use state::{GameEvent, SimState};
pub use store::EntityStore;
pub use tick::tick;
