//! Collision resolution
//!
//! Runs once per tick after movement. Each pass walks the current collections,
//! applies damage, scoring and pickups, and removes consumed entities. A pass
//! that kills the player stops the rest of the frame.

use rand::Rng;

use super::collision::overlaps;
use super::spawn::{difficulty_multiplier, spawn_particles, spawn_power_up, spawn_wave};
use super::state::{GameEvent, GameState, SoundCue};
use crate::consts::*;
use crate::palette;

/// Run every collision pass in order
pub fn resolve_collisions(state: &mut GameState) {
    if state.is_over() {
        return;
    }

    resolve_player_shots(state);
    if resolve_enemy_shots(state) {
        return;
    }
    if resolve_crash(state) {
        return;
    }
    resolve_pickups(state);
    check_wave_clear(state);
}

/// Player bullets vs enemies; each bullet hits at most one enemy, the latest
/// spawned one when several overlap
pub fn resolve_player_shots(state: &mut GameState) {
    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = &state.bullets[i];
        if bullet.owner.is_enemy() {
            continue;
        }
        let Some(j) = state.enemies.iter().rposition(|e| overlaps(bullet, e)) else {
            continue;
        };

        let bullet = state.bullets.remove(i);
        let enemy = &mut state.enemies[j];
        enemy.health -= bullet.damage;
        let (pos, color) = (enemy.pos, enemy.color());
        spawn_particles(state, pos, color, 5);

        if state.enemies[j].health > 0 {
            state.emit(GameEvent::Sound(SoundCue::Hit));
            continue;
        }

        let enemy = state.enemies.remove(j);
        let points = enemy.value * if state.player.hodl { 2 } else { 1 };
        state.score += points;
        spawn_particles(state, enemy.pos, palette::GOLD, 15);
        if state.rng.random_bool(POWER_UP_DROP_CHANCE) {
            spawn_power_up(state, enemy.pos);
        }
        state.emit(GameEvent::EnemyDestroyed {
            tier: enemy.tier,
            points,
        });
        state.emit(GameEvent::Sound(SoundCue::Explosion));
        state.emit(GameEvent::ScreenShake(5.0));
    }
}

/// Enemy bullets vs player. Returns true if the player died.
pub fn resolve_enemy_shots(state: &mut GameState) -> bool {
    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = &state.bullets[i];
        if !bullet.owner.is_enemy() || !overlaps(bullet, &state.player) {
            continue;
        }

        let bullet = state.bullets.remove(i);
        let pos = state.player.pos;
        if state.player.shield > 0.0 {
            state.player.shield = (state.player.shield - SHIELD_HIT_COST).max(0.0);
            spawn_particles(state, pos, palette::CYAN, 10);
        } else {
            state.player.health -= bullet.damage;
            spawn_particles(state, pos, palette::RED, 20);
            state.emit(GameEvent::ScreenShake(15.0));
        }
        state.emit(GameEvent::Sound(SoundCue::Hit));

        if state.is_over() {
            state.player.health = 0;
            state.emit(GameEvent::PlayerDestroyed);
            log::info!("Player destroyed by enemy fire (score {})", state.score);
            return true;
        }
    }
    false
}

/// Ship vs enemy body: instant death, shield ignored. Returns true on crash.
pub fn resolve_crash(state: &mut GameState) -> bool {
    if !state.enemies.iter().any(|e| overlaps(&state.player, e)) {
        return false;
    }
    state.player.health = 0;
    state.emit(GameEvent::PlayerDestroyed);
    log::info!("Player crashed into the invaders (score {})", state.score);
    true
}

/// Ship vs falling power-ups
pub fn resolve_pickups(state: &mut GameState) {
    let mut i = state.power_ups.len();
    while i > 0 {
        i -= 1;
        if !overlaps(&state.player, &state.power_ups[i]) {
            continue;
        }
        let power_up = state.power_ups.remove(i);
        state.player.equip(power_up.kind.weapon());

        let pos = state.player.pos;
        spawn_particles(state, pos, power_up.kind.color(), 20);
        state.emit(GameEvent::PowerUpCollected(power_up.kind));
        state.emit(GameEvent::ScreenShake(3.0));
        state.emit(GameEvent::Sound(SoundCue::PowerUp));
        log::debug!("Collected {:?}", power_up.kind);
    }
}

/// Advance the level when the grid is gone and no boss is up.
///
/// Returns true if a new wave was spawned.
pub fn check_wave_clear(state: &mut GameState) -> bool {
    if !state.enemies.is_empty() || state.boss.is_some() {
        return false;
    }

    state.level += 1;
    spawn_wave(state);
    let multiplier = difficulty_multiplier(state.level);
    for enemy in &mut state.enemies {
        enemy.speed *= multiplier;
    }

    state.emit(GameEvent::WaveCleared { level: state.level });
    log::info!("Wave cleared, level {} (speed x{:.2})", state.level, multiplier);
    true
}
