//! Game state and core simulation types
//!
//! Everything a single play session mutates lives in [`GameState`]; the
//! collaborators only ever see it through a shared borrow.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use crate::consts::*;
use crate::palette;

/// Weapon currently mounted on the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Normal,
    Rapid,
    Spread,
    Shield,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Normal => "NORMAL",
            WeaponKind::Rapid => "RAPID",
            WeaponKind::Spread => "SPREAD",
            WeaponKind::Shield => "SHIELD",
        }
    }

    /// HUD icon
    pub fn icon(&self) -> &'static str {
        match self {
            WeaponKind::Normal => "○",
            WeaponKind::Rapid => "⚡",
            WeaponKind::Spread => "🔱",
            WeaponKind::Shield => "🛡️",
        }
    }

    /// Minimum ticks between two shots
    pub fn fire_interval_ticks(&self) -> u64 {
        match self {
            WeaponKind::Rapid => RAPID_FIRE_TICKS,
            _ => NORMAL_FIRE_TICKS,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    /// Shield charge (0-100), decays every tick while up
    pub shield: f32,
    pub weapon: WeaponKind,
    /// Ticks left before a power-up weapon reverts to Normal
    pub weapon_ticks: u32,
    /// Holding still long enough doubles damage and score
    pub hodl: bool,
    /// Consecutive ticks without horizontal input
    pub hodl_ticks: u32,
    /// Tick of the last accepted shot
    pub last_shot_tick: Option<u64>,
}

impl Player {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(width / 2.0, height - PLAYER_BOTTOM_OFFSET),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            health: PLAYER_START_HEALTH,
            shield: 0.0,
            weapon: WeaponKind::Normal,
            weapon_ticks: 0,
            hodl: false,
            hodl_ticks: 0,
            last_shot_tick: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Seconds left on the current power-up weapon
    pub fn weapon_seconds(&self) -> f32 {
        self.weapon_ticks as f32 * SIM_DT
    }

    /// Mount a power-up weapon for its full duration
    pub fn equip(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
        self.weapon_ticks = WEAPON_DURATION_TICKS;
    }
}

impl Hitbox for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    /// Fired while in HODL: double damage and width
    PlayerHodl,
    Enemy,
}

impl BulletOwner {
    pub fn is_enemy(&self) -> bool {
        matches!(self, BulletOwner::Enemy)
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity in px/tick (negative = upward)
    pub vel_y: f32,
    pub damage: i32,
    pub color: u32,
    pub owner: BulletOwner,
}

impl Bullet {
    /// Shot fired from the player's ship
    pub fn from_player(ship: Vec2, hodl: bool) -> Self {
        let (owner, width, damage, color) = if hodl {
            (
                BulletOwner::PlayerHodl,
                10.0,
                PLAYER_BULLET_DAMAGE * 2,
                palette::HODL_GREEN,
            )
        } else {
            (
                BulletOwner::Player,
                5.0,
                PLAYER_BULLET_DAMAGE,
                palette::BITCOIN_ORANGE,
            )
        };
        Self {
            pos: ship - Vec2::new(0.0, 20.0),
            size: Vec2::new(width, 20.0),
            vel_y: PLAYER_BULLET_SPEED,
            damage,
            color,
            owner,
        }
    }

    /// Shot dropped by an enemy
    pub fn from_enemy(enemy: Vec2) -> Self {
        Self {
            pos: enemy + Vec2::new(0.0, 30.0),
            size: Vec2::new(6.0, 15.0),
            vel_y: ENEMY_BULLET_SPEED,
            damage: ENEMY_BULLET_DAMAGE,
            color: palette::ENEMY_BULLET,
            owner: BulletOwner::Enemy,
        }
    }
}

impl Hitbox for Bullet {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Enemy tier, derived from the grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTier {
    Dollar,
    Euro,
    Pound,
    Yen,
}

impl EnemyTier {
    pub const ALL: [EnemyTier; 4] = [
        EnemyTier::Dollar,
        EnemyTier::Euro,
        EnemyTier::Pound,
        EnemyTier::Yen,
    ];

    /// Tier for a grid row, clamped to the last tier
    pub fn from_row(row: usize) -> Self {
        Self::ALL[row.min(Self::ALL.len() - 1)]
    }

    pub fn symbol(&self) -> char {
        match self {
            EnemyTier::Dollar => '$',
            EnemyTier::Euro => '€',
            EnemyTier::Pound => '£',
            EnemyTier::Yen => '¥',
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            EnemyTier::Dollar => 0x2ECC71,
            EnemyTier::Euro => 0x3498DB,
            EnemyTier::Pound => 0x9B59B6,
            EnemyTier::Yen => 0xBDC3C7,
        }
    }
}

/// An invading currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub tier: EnemyTier,
    pub health: i32,
    /// Points awarded on kill (before the HODL multiplier)
    pub value: u64,
    /// Horizontal speed in px/tick
    pub speed: f32,
    /// Horizontal direction, +1 right / -1 left
    pub dir: f32,
}

impl Enemy {
    pub fn color(&self) -> u32 {
        self.tier.color()
    }
}

impl Hitbox for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }
}

/// Boss slot; while occupied a cleared grid does not advance the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
}

impl Hitbox for Boss {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 1-0, decreases every tick
    pub color: u32,
    pub size: f32,
}

/// Maximum particles alive at once
pub const MAX_PARTICLES: usize = 512;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Rapid,
    Spread,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Rapid, PowerUpKind::Spread, PowerUpKind::Shield];

    /// Weapon granted on pickup
    pub fn weapon(&self) -> WeaponKind {
        match self {
            PowerUpKind::Rapid => WeaponKind::Rapid,
            PowerUpKind::Spread => WeaponKind::Spread,
            PowerUpKind::Shield => WeaponKind::Shield,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Rapid => palette::RAPID_BLUE,
            PowerUpKind::Spread => palette::SPREAD_PURPLE,
            PowerUpKind::Shield => palette::CYAN,
        }
    }

    pub fn icon(&self) -> &'static str {
        self.weapon().icon()
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    /// Draw radius
    pub size: f32,
}

impl Hitbox for PowerUp {
    fn center(&self) -> Vec2 {
        self.pos
    }
}

/// Audio cues emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    Hit,
    Explosion,
    PowerUp,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::Hit => "hit",
            SoundCue::Explosion => "explosion",
            SoundCue::PowerUp => "powerup",
        }
    }
}

/// Things that happened during a tick, drained by the game loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    ScreenShake(f32),
    HodlEntered,
    EnemyDestroyed { tier: EnemyTier, points: u64 },
    PowerUpCollected(PowerUpKind),
    WeaponExpired,
    WaveCleared { level: u32 },
    PlayerDestroyed,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current level (1-based), advanced on every cleared wave
    pub level: u32,
    pub score: u64,
    /// Reset on every run, never spent
    pub lives: u32,
    /// Simulation tick counter, the only clock the simulation reads
    pub time_ticks: u64,
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub boss: Option<Boss>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Gameplay rolls (enemy fire, drops)
    pub(crate) rng: Pcg32,
    /// Cosmetic rolls (particles), kept apart so effects never shift gameplay
    pub(crate) fx_rng: Pcg32,
    /// Cap on live particles
    pub max_particles: usize,
}

/// PCG stream ids for the two generators
const GAMEPLAY_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
const EFFECTS_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

impl GameState {
    /// Fresh session on the default play field: full health, level 1, first wave spawned
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(seed, FIELD_WIDTH, FIELD_HEIGHT);
        super::spawn::spawn_wave(&mut state);
        state
    }

    /// Session with no enemies spawned yet
    pub fn empty(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            level: 1,
            score: 0,
            lives: STARTING_LIVES,
            time_ticks: 0,
            width,
            height,
            player: Player::new(width, height),
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            boss: None,
            events: Vec::new(),
            rng: Pcg32::new(seed, GAMEPLAY_STREAM),
            fx_rng: Pcg32::new(seed, EFFECTS_STREAM),
            max_particles: MAX_PARTICLES,
        }
    }

    /// The run ends once the player's health is gone
    pub fn is_over(&self) -> bool {
        !self.player.is_alive()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
