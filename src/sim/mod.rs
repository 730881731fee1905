//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (the tick counter is the clock)
//! - Seeded RNG only
//! - Stable insertion order for every collection
//! - No rendering or platform dependencies

pub mod collision;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, boxes_overlap, overlaps};
pub use resolve::resolve_collisions;
pub use spawn::{difficulty_multiplier, spawn_particles, spawn_power_up, spawn_wave};
pub use state::{
    Boss, Bullet, BulletOwner, Enemy, EnemyTier, GameEvent, GameState, MAX_PARTICLES, Particle,
    Player, PowerUp, PowerUpKind, SoundCue, WeaponKind,
};
pub use tick::{TickInput, tick};
