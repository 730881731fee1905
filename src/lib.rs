//! Fiat Invaders - HODL the line against waves of fiat currency
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, waves)
//! - `game`: Mode state machine driving the simulation once per frame
//! - `platform`: Collaborator contracts (input, render, HUD, audio, feedback)
//! - `highscores`: Persisted best score
//! - `settings`: Player preferences

pub mod game;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use game::{Game, GameMode, HudSnapshot};
pub use highscores::{HighScore, MemoryStore, ScoreStore};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per simulated second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_START_HEALTH: i32 = 100;
    /// Lives shown at the start of a run; a run still ends on the first death
    pub const STARTING_LIVES: u32 = 3;
    /// Distance kept between the ship center and the side walls
    pub const PLAYER_EDGE_MARGIN: f32 = 15.0;
    /// Ship sits this far above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 100.0;

    /// Shield charge when raised, and its per-tick decay
    pub const SHIELD_MAX: f32 = 100.0;
    pub const SHIELD_DECAY: f32 = 0.5;
    /// Shield charge removed by one absorbed bullet
    pub const SHIELD_HIT_COST: f32 = 25.0;

    /// Holding still this long enters HODL (0.5 s)
    pub const HODL_TICKS: u32 = 30;
    /// Net input below this counts as standing still
    pub const HODL_INPUT_THRESHOLD: f32 = 0.1;

    /// Minimum ticks between shots (100 ms rapid, 200 ms otherwise)
    pub const RAPID_FIRE_TICKS: u64 = 6;
    pub const NORMAL_FIRE_TICKS: u64 = 12;
    /// Power-up weapons last 10 seconds
    pub const WEAPON_DURATION_TICKS: u32 = 10 * TICKS_PER_SECOND;

    /// Wave grid
    pub const WAVE_ROWS: usize = 4;
    pub const WAVE_COLS: usize = 8;
    pub const WAVE_SPACING: f32 = 70.0;
    pub const WAVE_TOP: f32 = 100.0;
    pub const ENEMY_START_HEALTH: i32 = 10;
    /// Enemies reverse when any of them gets this close to a side wall
    pub const ENEMY_EDGE_MARGIN: f32 = 40.0;
    pub const ENEMY_DESCENT: f32 = 30.0;
    pub const ENEMY_FIRE_CHANCE: f64 = 0.002;
    /// Speed multiplier applied per cleared wave
    pub const WAVE_SPEEDUP: f32 = 1.1;

    /// Bullets
    pub const PLAYER_BULLET_SPEED: f32 = -12.0;
    pub const PLAYER_BULLET_DAMAGE: i32 = 10;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;
    pub const ENEMY_BULLET_DAMAGE: i32 = 10;
    /// Bullets are culled this far outside the play field
    pub const BULLET_CULL_MARGIN: f32 = 50.0;

    /// Power-ups
    pub const POWER_UP_DROP_CHANCE: f64 = 0.1;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    pub const POWER_UP_SIZE: f32 = 20.0;

    /// Particles
    pub const PARTICLE_DRAG: f32 = 0.95;
    pub const PARTICLE_FADE: f32 = 0.05;

    /// Hitbox used for entities without declared dimensions
    pub const DEFAULT_HITBOX: f32 = 20.0;
}

/// Packed 0xRRGGBB colors shared by the simulation and the render sink
pub mod palette {
    pub const BITCOIN_ORANGE: u32 = 0xF7931A;
    pub const HODL_GREEN: u32 = 0x00FF00;
    pub const WHITE: u32 = 0xFFFFFF;
    pub const GOLD: u32 = 0xFFD700;
    pub const CYAN: u32 = 0x00FFFF;
    pub const RED: u32 = 0xFF0000;
    pub const ENEMY_BULLET: u32 = 0xFF5555;
    pub const RAPID_BLUE: u32 = 0x3498DB;
    pub const SPREAD_PURPLE: u32 = 0x9B59B6;

    /// CSS hex string for a packed color
    pub fn css(color: u32) -> String {
        format!("#{:06x}", color & 0xFF_FFFF)
    }
}
