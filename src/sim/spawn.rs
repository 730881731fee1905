//! Wave layout, power-up drops and particle bursts

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyTier, GameState, Particle, PowerUp, PowerUpKind};
use crate::consts::*;

/// Replace the enemy collection with a fresh 4x8 grid.
///
/// Rows are laid out top to bottom; the top row is the most valuable and the
/// slowest. Every enemy starts moving right.
pub fn spawn_wave(state: &mut GameState) {
    state.enemies.clear();

    let start_x = (state.width - WAVE_COLS as f32 * WAVE_SPACING) / 2.0 + WAVE_SPACING / 2.0;

    for row in 0..WAVE_ROWS {
        for col in 0..WAVE_COLS {
            state.enemies.push(Enemy {
                pos: Vec2::new(
                    start_x + col as f32 * WAVE_SPACING,
                    WAVE_TOP + row as f32 * WAVE_SPACING,
                ),
                tier: EnemyTier::from_row(row),
                health: ENEMY_START_HEALTH,
                value: (WAVE_ROWS - row) as u64 * 25,
                speed: 1.0 + row as f32 * 0.5,
                dir: 1.0,
            });
        }
    }

    log::debug!("Spawned wave for level {}: {} enemies", state.level, state.enemies.len());
}

/// Speed multiplier for the wave spawned at `level`.
///
/// Compounds per cleared wave so every wave is strictly faster than the last.
pub fn difficulty_multiplier(level: u32) -> f32 {
    WAVE_SPEEDUP.powi(level.saturating_sub(1) as i32)
}

/// Drop a random power-up at `pos`
pub fn spawn_power_up(state: &mut GameState, pos: Vec2) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    state.power_ups.push(PowerUp {
        pos,
        kind,
        size: POWER_UP_SIZE,
    });
    log::debug!("Power-up {:?} dropped at ({:.0}, {:.0})", kind, pos.x, pos.y);
}

/// Emit a burst of `count` particles at `pos`
pub fn spawn_particles(state: &mut GameState, pos: Vec2, color: u32, count: usize) {
    let room = state.max_particles.saturating_sub(state.particles.len());
    for _ in 0..count.min(room) {
        let vel = Vec2::new(
            (state.fx_rng.random::<f32>() - 0.5) * 10.0,
            (state.fx_rng.random::<f32>() - 0.5) * 10.0,
        );
        let size = state.fx_rng.random::<f32>() * 3.0 + 2.0;
        state.particles.push(Particle {
            pos,
            vel,
            life: 1.0,
            color,
            size,
        });
    }
}
