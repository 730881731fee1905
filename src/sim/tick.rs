//! Fixed timestep simulation tick
//!
//! Advances every entity collection by one tick and then resolves collisions.
//! The tick counter is the only clock: fire-rate gating, HODL, shield decay
//! and weapon expiry all count ticks.

use glam::Vec2;
use rand::Rng;

use super::resolve::resolve_collisions;
use super::spawn::spawn_particles;
use super::state::{Bullet, GameEvent, GameState, SoundCue, WeaponKind};
use crate::consts::*;
use crate::palette;

/// Input flags for a single tick, sampled once by the game loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub shoot: bool,
    pub shield: bool,
}

impl TickInput {
    /// Net horizontal input scaled by ship speed; opposite directions cancel
    pub fn horizontal(&self, speed: f32) -> f32 {
        let mut dx = 0.0;
        if self.move_left {
            dx -= speed;
        }
        if self.move_right {
            dx += speed;
        }
        dx
    }
}

/// Advance the game state by one fixed timestep.
///
/// Does nothing once the player is dead.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    update_player(state, input);
    update_bullets(state);
    update_enemies(state);
    update_particles(state);
    update_power_ups(state);
    resolve_collisions(state);
}

/// Movement, HODL, shooting, shield and weapon timer
pub fn update_player(state: &mut GameState, input: &TickInput) {
    let dx = input.horizontal(state.player.speed);
    let player = &mut state.player;
    player.pos.x = (player.pos.x + dx).clamp(PLAYER_EDGE_MARGIN, state.width - PLAYER_EDGE_MARGIN);

    // HODL: standing still charges the bonus, any movement drops it
    if dx.abs() < HODL_INPUT_THRESHOLD {
        player.hodl_ticks = player.hodl_ticks.saturating_add(1);
        if player.hodl_ticks >= HODL_TICKS && !player.hodl {
            player.hodl = true;
            let pos = player.pos;
            spawn_particles(state, pos, palette::HODL_GREEN, 10);
            state.emit(GameEvent::HodlEntered);
            log::debug!("HODL engaged at tick {}", state.time_ticks);
        }
    } else {
        player.hodl_ticks = 0;
        player.hodl = false;
    }

    if input.shoot {
        shoot(state);
    }

    let player = &mut state.player;
    if input.shield && player.shield <= 0.0 {
        player.shield = SHIELD_MAX;
    }
    if player.shield > 0.0 {
        player.shield = (player.shield - SHIELD_DECAY).max(0.0);
    }

    if player.weapon != WeaponKind::Normal {
        player.weapon_ticks = player.weapon_ticks.saturating_sub(1);
        if player.weapon_ticks == 0 {
            player.weapon = WeaponKind::Normal;
            state.emit(GameEvent::WeaponExpired);
        }
    }
}

/// Fire a bullet if the weapon's fire-rate gate allows it.
///
/// Returns true when a bullet was spawned.
pub fn shoot(state: &mut GameState) -> bool {
    let player = &mut state.player;
    let interval = player.weapon.fire_interval_ticks();
    let ready = player
        .last_shot_tick
        .is_none_or(|last| state.time_ticks.saturating_sub(last) >= interval);
    if !ready {
        return false;
    }
    player.last_shot_tick = Some(state.time_ticks);

    let bullet = Bullet::from_player(player.pos, player.hodl);
    let muzzle = player.pos - Vec2::new(0.0, 10.0);
    state.bullets.push(bullet);

    spawn_particles(state, muzzle, palette::WHITE, 3);
    state.emit(GameEvent::Sound(SoundCue::Shoot));
    true
}

/// Move bullets and cull the ones that left the field
pub fn update_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.pos.y += bullet.vel_y;
    }
    let bottom = state.height + BULLET_CULL_MARGIN;
    state
        .bullets
        .retain(|b| b.pos.y >= -BULLET_CULL_MARGIN && b.pos.y <= bottom);
}

/// March the grid sideways, drop it a row at the walls, and roll enemy fire
pub fn update_enemies(state: &mut GameState) {
    let left = ENEMY_EDGE_MARGIN;
    let right = state.width - ENEMY_EDGE_MARGIN;
    let mut hit_edge = false;

    for enemy in &mut state.enemies {
        enemy.pos.x += enemy.speed * enemy.dir;
        if enemy.pos.x <= left || enemy.pos.x >= right {
            hit_edge = true;
        }
        if state.rng.random_bool(ENEMY_FIRE_CHANCE) {
            state.bullets.push(Bullet::from_enemy(enemy.pos));
        }
    }

    // The whole formation turns together
    if hit_edge {
        for enemy in &mut state.enemies {
            enemy.dir = -enemy.dir;
            enemy.pos.y += ENEMY_DESCENT;
        }
    }
}

/// Integrate, drag and fade particles
pub fn update_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_FADE;
        particle.vel *= PARTICLE_DRAG;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Power-ups drift down and vanish below the field
pub fn update_power_ups(state: &mut GameState) {
    for power_up in &mut state.power_ups {
        power_up.pos.y += POWER_UP_FALL_SPEED;
    }
    let bottom = state.height;
    state.power_ups.retain(|p| p.pos.y - p.size <= bottom);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyTier, Particle, PowerUp, PowerUpKind};
    use proptest::prelude::*;

    fn quiet_state() -> GameState {
        GameState::empty(12345, FIELD_WIDTH, FIELD_HEIGHT)
    }

    fn enemy_at(x: f32, y: f32, speed: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, y),
            tier: EnemyTier::Dollar,
            health: 10,
            value: 100,
            speed,
            dir: 1.0,
        }
    }

    const LEFT: TickInput = TickInput {
        move_left: true,
        move_right: false,
        shoot: false,
        shield: false,
    };

    #[test]
    fn test_move_left_one_tick() {
        let mut state = quiet_state();
        assert_eq!(state.player.pos.x, 300.0);
        update_player(&mut state, &LEFT);
        assert_eq!(state.player.pos.x, 295.0);
    }

    #[test]
    fn test_move_clamped_to_field() {
        let mut state = quiet_state();
        state.player.pos.x = 17.0;
        update_player(&mut state, &LEFT);
        assert_eq!(state.player.pos.x, 15.0);

        state.player.pos.x = 583.0;
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        update_player(&mut state, &right);
        assert_eq!(state.player.pos.x, 585.0);
    }

    #[test]
    fn test_left_and_right_cancel() {
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(both.horizontal(5.0), 0.0);

        let mut state = quiet_state();
        update_player(&mut state, &both);
        assert_eq!(state.player.pos.x, 300.0);
        assert_eq!(state.player.hodl_ticks, 1);
    }

    #[test]
    fn test_hodl_engages_once_per_streak() {
        let mut state = quiet_state();
        let idle = TickInput::default();

        for _ in 0..HODL_TICKS - 1 {
            update_player(&mut state, &idle);
        }
        assert!(!state.player.hodl);

        update_player(&mut state, &idle);
        assert!(state.player.hodl);

        for _ in 0..60 {
            update_player(&mut state, &idle);
        }
        let entered = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::HodlEntered)
            .count();
        assert_eq!(entered, 1);
    }

    #[test]
    fn test_movement_clears_hodl_same_tick() {
        let mut state = quiet_state();
        let idle = TickInput::default();
        for _ in 0..HODL_TICKS {
            update_player(&mut state, &idle);
        }
        assert!(state.player.hodl);

        update_player(&mut state, &LEFT);
        assert!(!state.player.hodl);
        assert_eq!(state.player.hodl_ticks, 0);
    }

    #[test]
    fn test_shield_raise_and_decay() {
        let mut state = quiet_state();
        let raise = TickInput {
            shield: true,
            ..Default::default()
        };
        update_player(&mut state, &raise);
        assert_eq!(state.player.shield, 99.5);

        // Holding the key does not recharge while the shield is up
        update_player(&mut state, &raise);
        assert_eq!(state.player.shield, 99.0);

        state.player.shield = 0.25;
        update_player(&mut state, &TickInput::default());
        assert_eq!(state.player.shield, 0.0);
    }

    #[test]
    fn test_weapon_expires_after_ten_seconds() {
        let mut state = quiet_state();
        state.player.equip(WeaponKind::Rapid);
        let idle = TickInput::default();
        for _ in 0..WEAPON_DURATION_TICKS - 1 {
            update_player(&mut state, &idle);
        }
        assert_eq!(state.player.weapon, WeaponKind::Rapid);
        update_player(&mut state, &idle);
        assert_eq!(state.player.weapon, WeaponKind::Normal);
        assert!(state.events.contains(&GameEvent::WeaponExpired));
    }

    #[test]
    fn test_rapid_fire_gate() {
        let mut state = quiet_state();
        state.player.equip(WeaponKind::Rapid);

        state.time_ticks = 100;
        assert!(shoot(&mut state));
        // 50 ms later: suppressed
        state.time_ticks = 103;
        assert!(!shoot(&mut state));
        assert_eq!(state.bullets.len(), 1);

        // 100 ms after the first shot: fires
        state.time_ticks = 106;
        assert!(shoot(&mut state));
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_normal_fire_gate() {
        let mut state = quiet_state();
        state.time_ticks = 10;
        assert!(shoot(&mut state));
        state.time_ticks = 16;
        assert!(!shoot(&mut state));
        state.time_ticks = 22;
        assert!(shoot(&mut state));
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_shoot_emits_cue_and_muzzle_flash() {
        let mut state = quiet_state();
        shoot(&mut state);
        assert_eq!(state.particles.len(), 3);
        assert_eq!(state.events, vec![GameEvent::Sound(SoundCue::Shoot)]);
        assert_eq!(state.bullets[0].damage, PLAYER_BULLET_DAMAGE);
    }

    #[test]
    fn test_bullets_culled_off_field() {
        let mut state = quiet_state();
        let mut up = Bullet::from_player(Vec2::new(100.0, 0.0), false);
        up.pos.y = -45.0;
        let mut down = Bullet::from_enemy(Vec2::ZERO);
        down.pos.y = FIELD_HEIGHT + 48.0;
        let stays = Bullet::from_player(Vec2::new(100.0, 400.0), false);
        state.bullets = vec![up, down, stays];

        update_bullets(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.y, 368.0);
    }

    #[test]
    fn test_enemies_reverse_and_descend_together() {
        let mut state = quiet_state();
        state.enemies = vec![enemy_at(300.0, 100.0, 1.0), enemy_at(558.0, 170.0, 2.0)];

        update_enemies(&mut state);
        // Second enemy reached 560, so the whole formation turns
        assert_eq!(state.enemies[0].pos, Vec2::new(301.0, 130.0));
        assert_eq!(state.enemies[1].pos, Vec2::new(560.0, 200.0));
        assert!(state.enemies.iter().all(|e| e.dir == -1.0));

        update_enemies(&mut state);
        assert_eq!(state.enemies[0].pos, Vec2::new(300.0, 130.0));
        assert_eq!(state.enemies[1].pos, Vec2::new(558.0, 200.0));
    }

    #[test]
    fn test_enemies_keep_marching_in_open_space() {
        let mut state = quiet_state();
        state.enemies = vec![enemy_at(200.0, 100.0, 1.5)];
        update_enemies(&mut state);
        assert_eq!(state.enemies[0].pos, Vec2::new(201.5, 100.0));
        assert_eq!(state.enemies[0].dir, 1.0);
    }

    #[test]
    fn test_enemy_fire_rate_is_rare() {
        let mut state = quiet_state();
        state.enemies = vec![enemy_at(300.0, 100.0, 0.0)];
        for _ in 0..5000 {
            update_enemies(&mut state);
        }
        // Expected ~10 shots at 0.2% per tick
        let shots = state.bullets.len();
        assert!(shots > 0 && shots < 40, "unexpected shot count {shots}");
        assert!(state.bullets.iter().all(|b| b.owner.is_enemy()));
    }

    #[test]
    fn test_particles_fade_and_drag() {
        let mut state = quiet_state();
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(4.0, -2.0),
            life: 1.0,
            color: palette::WHITE,
            size: 3.0,
        });
        update_particles(&mut state);
        let p = &state.particles[0];
        assert_eq!(p.pos, Vec2::new(4.0, -2.0));
        assert!((p.vel.x - 3.8).abs() < 1e-5);
        assert!((p.life - 0.95).abs() < 1e-6);

        for _ in 0..20 {
            update_particles(&mut state);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_power_ups_fall_and_despawn() {
        let mut state = quiet_state();
        state.power_ups.push(PowerUp {
            pos: Vec2::new(100.0, 200.0),
            kind: PowerUpKind::Rapid,
            size: POWER_UP_SIZE,
        });
        update_power_ups(&mut state);
        assert_eq!(state.power_ups[0].pos.y, 202.0);

        state.power_ups[0].pos.y = FIELD_HEIGHT + POWER_UP_SIZE - 1.0;
        update_power_ups(&mut state);
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_tick_stops_when_dead() {
        let mut state = GameState::new(5);
        state.player.health = 0;
        let before = state.time_ticks;
        tick(&mut state, &LEFT);
        assert_eq!(state.time_ticks, before);
        assert_eq!(state.player.pos.x, 300.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let inputs = [
            TickInput {
                shoot: true,
                ..Default::default()
            },
            LEFT,
            TickInput {
                shield: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.bullets.len(), state2.bullets.len());
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(move_left, move_right, shoot, shield)| TickInput {
                move_left,
                move_right,
                shoot,
                shield,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_shield_and_position_stay_in_range(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..400),
        ) {
            let mut state = GameState::new(seed);
            for input in &inputs {
                tick(&mut state, input);
                prop_assert!((0.0..=SHIELD_MAX).contains(&state.player.shield));
                prop_assert!(state.player.pos.x >= PLAYER_EDGE_MARGIN);
                prop_assert!(state.player.pos.x <= state.width - PLAYER_EDGE_MARGIN);
                prop_assert!(state.enemies.iter().all(|e| e.health > 0));
            }
        }

        #[test]
        fn prop_hodl_tracks_idle_streak(inputs in prop::collection::vec(arb_input(), 1..200)) {
            let mut state = GameState::empty(1, FIELD_WIDTH, FIELD_HEIGHT);
            let mut streak = 0u32;
            for input in &inputs {
                update_player(&mut state, input);
                if input.move_left != input.move_right {
                    streak = 0;
                } else {
                    streak += 1;
                }
                prop_assert_eq!(state.player.hodl_ticks, streak);
                prop_assert_eq!(state.player.hodl, streak >= HODL_TICKS);
            }
        }
    }
}
