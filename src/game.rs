//! Game mode state machine
//!
//! Loading -> Menu -> Playing -> GameOver, with restart going back to Playing.
//! While Playing, each step advances the simulation one tick, forwards the
//! tick's events to the collaborators and pushes the HUD when it changed.

use serde::Serialize;

use crate::highscores::{HighScore, ScoreStore};
use crate::platform::{RenderSink, Sinks};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, WeaponKind, tick};

/// Loading bar advances 10% every 100 ms
pub const LOADING_STEP_TICKS: u32 = 6;
/// Pause at 100% before showing the menu (500 ms)
pub const LOADING_HOLD_TICKS: u32 = 30;
const LOADING_TOTAL_TICKS: u32 = LOADING_STEP_TICKS * 10 + LOADING_HOLD_TICKS;

/// Overall game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    Loading,
    Menu,
    Playing,
    GameOver,
}

/// Values shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub level: u32,
    pub health: i32,
    pub weapon: WeaponKind,
    pub high_score: u64,
}

impl HudSnapshot {
    /// Health bar fill, 0-100
    pub fn health_percent(&self) -> f32 {
        self.health.clamp(0, 100) as f32
    }
}

/// Owns the session and drives it frame by frame
#[derive(Debug)]
pub struct Game {
    mode: GameMode,
    loading_ticks: u32,
    state: GameState,
    high_score: HighScore,
    settings: Settings,
    seed: u64,
    runs: u64,
    last_hud: Option<HudSnapshot>,
}

impl Game {
    pub fn new(seed: u64, store: Box<dyn ScoreStore>, settings: Settings) -> Self {
        let high_score = HighScore::load(store);
        log::info!("Game created (seed {}, best {})", seed, high_score.best());
        Self {
            mode: GameMode::Loading,
            loading_ticks: 0,
            state: GameState::new(seed),
            high_score,
            settings,
            seed,
            runs: 0,
            last_hud: None,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Read-only view of the current session
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    /// Loading bar percentage (0-100)
    pub fn loading_progress(&self) -> u32 {
        ((self.loading_ticks / LOADING_STEP_TICKS) * 10).min(100)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.state.score,
            level: self.state.level,
            health: self.state.player.health,
            weapon: self.state.player.weapon,
            high_score: self.high_score.best(),
        }
    }

    /// Begin a fresh run from the menu or the game over screen.
    ///
    /// Returns false if a run is already in progress or still loading.
    pub fn start(&mut self) -> bool {
        if !matches!(self.mode, GameMode::Menu | GameMode::GameOver) {
            return false;
        }
        self.runs += 1;
        let seed = self
            .seed
            .wrapping_add(self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.state = GameState::new(seed);
        self.state.max_particles = self.settings.max_particles();
        self.mode = GameMode::Playing;
        self.last_hud = None;
        log::info!("Run {} started (seed {})", self.runs, seed);
        true
    }

    /// Advance one tick
    pub fn step(&mut self, input: &TickInput, sinks: &mut Sinks<'_>) {
        match self.mode {
            GameMode::Loading => {
                self.loading_ticks += 1;
                if self.loading_ticks >= LOADING_TOTAL_TICKS {
                    self.mode = GameMode::Menu;
                    log::info!("Loading complete");
                }
            }
            GameMode::Menu | GameMode::GameOver => {}
            GameMode::Playing => {
                tick(&mut self.state, input);
                for event in self.state.drain_events() {
                    self.dispatch(event, sinks);
                }
                if self.state.is_over() {
                    self.finish_run();
                }
                self.sync_hud(sinks);
            }
        }
    }

    /// Hand the current snapshot to the renderer
    pub fn draw(&self, render: &mut dyn RenderSink) {
        if matches!(self.mode, GameMode::Playing | GameMode::GameOver) {
            render.draw(&self.state);
        }
    }

    fn dispatch(&mut self, event: GameEvent, sinks: &mut Sinks<'_>) {
        match event {
            GameEvent::Sound(cue) => sinks.audio.play(cue),
            GameEvent::ScreenShake(intensity) => {
                if self.settings.effective_screen_shake() {
                    sinks.feedback.screen_shake(intensity);
                }
            }
            GameEvent::HodlEntered => log::debug!("HODL!"),
            GameEvent::WeaponExpired => log::debug!("Power-up expired"),
            GameEvent::EnemyDestroyed { .. }
            | GameEvent::PowerUpCollected(_)
            | GameEvent::WaveCleared { .. }
            | GameEvent::PlayerDestroyed => {}
        }
    }

    fn finish_run(&mut self) {
        self.mode = GameMode::GameOver;
        let score = self.state.score;
        if self.high_score.submit(score) {
            log::info!("Game over: new high score {} (level {})", score, self.state.level);
        } else {
            log::info!("Game over: score {} (level {})", score, self.state.level);
        }
    }

    fn sync_hud(&mut self, sinks: &mut Sinks<'_>) {
        let hud = self.hud();
        if self.last_hud != Some(hud) {
            sinks.hud.update(&hud);
            self.last_hud = Some(hud);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::highscores::MemoryStore;
    use crate::platform::{AudioSink, FeedbackSink, HudSink};
    use crate::sim::{Enemy, EnemyTier, SoundCue};
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        huds: Vec<HudSnapshot>,
        cues: Vec<SoundCue>,
        shakes: Vec<f32>,
        frames: usize,
    }

    struct Hud<'a>(&'a mut Vec<HudSnapshot>);
    struct Audio<'a>(&'a mut Vec<SoundCue>);
    struct Shake<'a>(&'a mut Vec<f32>);

    impl HudSink for Hud<'_> {
        fn update(&mut self, hud: &HudSnapshot) {
            self.0.push(*hud);
        }
    }

    impl AudioSink for Audio<'_> {
        fn play(&mut self, cue: SoundCue) {
            self.0.push(cue);
        }
    }

    impl FeedbackSink for Shake<'_> {
        fn screen_shake(&mut self, intensity: f32) {
            self.0.push(intensity);
        }
    }

    impl RenderSink for Recorder {
        fn draw(&mut self, _state: &GameState) {
            self.frames += 1;
        }
    }

    fn step(game: &mut Game, input: &TickInput, rec: &mut Recorder) {
        let mut hud = Hud(&mut rec.huds);
        let mut audio = Audio(&mut rec.cues);
        let mut shake = Shake(&mut rec.shakes);
        let mut sinks = Sinks {
            hud: &mut hud,
            audio: &mut audio,
            feedback: &mut shake,
        };
        game.step(input, &mut sinks);
    }

    fn new_game() -> Game {
        Game::new(2024, Box::new(MemoryStore::default()), Settings::default())
    }

    /// Game sitting in the menu
    fn loaded_game(rec: &mut Recorder) -> Game {
        let mut game = new_game();
        for _ in 0..LOADING_TOTAL_TICKS {
            step(&mut game, &TickInput::default(), rec);
        }
        game
    }

    #[test]
    fn test_loading_progress_and_menu() {
        let mut rec = Recorder::default();
        let mut game = new_game();
        assert_eq!(game.mode(), GameMode::Loading);
        assert_eq!(game.loading_progress(), 0);

        for _ in 0..LOADING_STEP_TICKS * 3 {
            step(&mut game, &TickInput::default(), &mut rec);
        }
        assert_eq!(game.loading_progress(), 30);

        for _ in 0..LOADING_STEP_TICKS * 7 {
            step(&mut game, &TickInput::default(), &mut rec);
        }
        assert_eq!(game.loading_progress(), 100);
        assert_eq!(game.mode(), GameMode::Loading);

        for _ in 0..LOADING_HOLD_TICKS {
            step(&mut game, &TickInput::default(), &mut rec);
        }
        assert_eq!(game.mode(), GameMode::Menu);
    }

    #[test]
    fn test_cannot_start_while_loading() {
        let mut game = new_game();
        assert!(!game.start());
        assert_eq!(game.mode(), GameMode::Loading);
    }

    #[test]
    fn test_start_from_menu() {
        let mut rec = Recorder::default();
        let mut game = loaded_game(&mut rec);
        assert!(game.start());
        assert_eq!(game.mode(), GameMode::Playing);
        assert_eq!(game.state().enemies.len(), WAVE_ROWS * WAVE_COLS);
        assert_eq!(game.state().level, 1);
        assert!(!game.start());
    }

    #[test]
    fn test_hud_pushed_only_on_change() {
        let mut rec = Recorder::default();
        let mut game = loaded_game(&mut rec);
        game.start();
        // Clear the field so nothing can happen for a while
        game.state.enemies.clear();
        game.state.boss = Some(crate::sim::Boss {
            pos: Vec2::new(300.0, 50.0),
            size: Vec2::new(100.0, 40.0),
            health: 100,
        });

        for _ in 0..10 {
            step(&mut game, &TickInput::default(), &mut rec);
        }
        assert_eq!(rec.huds.len(), 1);
        assert_eq!(rec.huds[0].health, PLAYER_START_HEALTH);
        assert_eq!(rec.huds[0].weapon, WeaponKind::Normal);

        game.state.score = 250;
        step(&mut game, &TickInput::default(), &mut rec);
        assert_eq!(rec.huds.len(), 2);
        assert_eq!(rec.huds[1].score, 250);
    }

    #[test]
    fn test_events_forwarded_to_sinks() {
        let mut rec = Recorder::default();
        let mut game = loaded_game(&mut rec);
        game.start();
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        step(&mut game, &shoot, &mut rec);
        assert!(rec.cues.contains(&SoundCue::Shoot));
    }

    #[test]
    fn test_screen_shake_respects_settings() {
        let mut rec = Recorder::default();
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        let mut game = Game::new(1, Box::new(MemoryStore::default()), settings);
        game.mode = GameMode::Menu;
        game.start();

        let target = Vec2::new(200.0, 300.0);
        game.state.enemies = vec![
            Enemy {
                pos: target,
                tier: EnemyTier::Dollar,
                health: 10,
                value: 100,
                speed: 0.0,
                dir: 1.0,
            },
            Enemy {
                pos: Vec2::new(100.0, 100.0),
                tier: EnemyTier::Yen,
                health: 10,
                value: 25,
                speed: 0.0,
                dir: 1.0,
            },
        ];
        let mut bullet = crate::sim::Bullet::from_player(Vec2::ZERO, false);
        bullet.pos = target + Vec2::new(0.0, 12.0);
        game.state.bullets.push(bullet);

        step(&mut game, &TickInput::default(), &mut rec);
        assert_eq!(game.state().score, 100);
        assert!(rec.cues.contains(&SoundCue::Explosion));
        assert!(rec.shakes.is_empty());
    }

    #[test]
    fn test_game_over_records_high_score_and_restarts() {
        let mut rec = Recorder::default();
        let mut game = loaded_game(&mut rec);
        game.start();
        game.state.score = 1234;

        // Park an enemy on the ship
        let ship = game.state.player.pos;
        game.state.enemies[0].pos = ship;
        game.state.enemies[0].speed = 0.0;
        step(&mut game, &TickInput::default(), &mut rec);

        assert_eq!(game.mode(), GameMode::GameOver);
        // Death ends the run without spending a life
        assert_eq!(game.state().lives, STARTING_LIVES);
        assert_eq!(game.high_score(), 1234);
        assert_eq!(rec.huds.last().map(|h| h.high_score), Some(1234));
        assert_eq!(rec.huds.last().map(|h| h.health), Some(0));

        // Frozen until restart
        let frozen = game.state().time_ticks;
        step(&mut game, &TickInput::default(), &mut rec);
        assert_eq!(game.state().time_ticks, frozen);

        game.draw(&mut rec);
        assert_eq!(rec.frames, 1);

        assert!(game.start());
        assert_eq!(game.mode(), GameMode::Playing);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().player.health, PLAYER_START_HEALTH);
        assert_eq!(game.state().lives, STARTING_LIVES);
        assert_eq!(game.high_score(), 1234);
    }

    #[test]
    fn test_menu_is_not_drawn() {
        let mut rec = Recorder::default();
        let game = loaded_game(&mut rec);
        let mut render = Recorder::default();
        game.draw(&mut render);
        assert_eq!(render.frames, 0);
    }

    #[test]
    fn test_health_percent_clamped() {
        let mut game = new_game();
        game.state.player.health = -20;
        assert_eq!(game.hud().health_percent(), 0.0);
        game.state.player.health = 100;
        assert_eq!(game.hud().health_percent(), 100.0);
    }
}
