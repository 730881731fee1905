//! Platform abstraction layer
//!
//! Contracts between the simulation and the outside world:
//! - Input polling (keyboard/touch reduced to a [`TickInput`])
//! - Render, HUD, audio and screen-shake sinks
//!
//! Sinks only ever receive shared borrows or copies; none of them can mutate
//! game state.

use crate::game::HudSnapshot;
use crate::sim::{GameState, SoundCue, TickInput};

/// Polled once per tick by the game loop
pub trait InputSource {
    fn poll(&self) -> TickInput;
}

/// Draws a read-only snapshot once per frame
pub trait RenderSink {
    fn draw(&mut self, state: &GameState);
}

/// Displays score, level, health and weapon
pub trait HudSink {
    fn update(&mut self, hud: &HudSnapshot);
}

/// Fire-and-forget sound cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Cosmetic screen shake
pub trait FeedbackSink {
    fn screen_shake(&mut self, intensity: f32);
}

/// Per-tick collaborators handed to [`crate::Game::step`]
pub struct Sinks<'a> {
    pub hud: &'a mut dyn HudSink,
    pub audio: &'a mut dyn AudioSink,
    pub feedback: &'a mut dyn FeedbackSink,
}

/// Sink that drops everything (headless runs)
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&mut self, _state: &GameState) {}
}

impl HudSink for NullSink {
    fn update(&mut self, _hud: &HudSnapshot) {}
}

impl AudioSink for NullSink {
    fn play(&mut self, _cue: SoundCue) {}
}

impl FeedbackSink for NullSink {
    fn screen_shake(&mut self, _intensity: f32) {}
}

/// Held keys plus on-screen touch buttons
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    fire: bool,
    down: bool,
    touch: TickInput,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a keyboard `code` (KeyboardEvent.code). Returns true if the key is bound.
    pub fn set_key(&mut self, code: &str, pressed: bool) -> bool {
        let slot = match code {
            "ArrowLeft" | "KeyA" => &mut self.left,
            "ArrowRight" | "KeyD" => &mut self.right,
            "Space" | "ArrowUp" => &mut self.fire,
            "ArrowDown" | "KeyS" => &mut self.down,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Track an on-screen touch button by name
    pub fn set_touch(&mut self, button: &str, pressed: bool) -> bool {
        let slot = match button {
            "left" => &mut self.touch.move_left,
            "right" => &mut self.touch.move_right,
            "shoot" => &mut self.touch.shoot,
            "shield" => &mut self.touch.shield,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Release everything (window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for KeyState {
    fn poll(&self) -> TickInput {
        TickInput {
            move_left: self.left || self.touch.move_left,
            move_right: self.right || self.touch.move_right,
            shoot: self.fire || self.touch.shoot,
            shield: self.down || self.touch.shield,
        }
    }
}
