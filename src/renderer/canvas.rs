//! Canvas 2D render sink

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wasm_bindgen::JsCast;

use crate::palette::{self, css};
use crate::platform::RenderSink;
use crate::sim::GameState;

const BACKGROUND: &str = "#020202";
const STAR_COUNT: u32 = 50;

/// Renders the game onto a `<canvas>` element
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    /// Wall-clock time (ms) for twinkle/pulse animations
    time_ms: f64,
    starfield: bool,
}

impl CanvasRenderer {
    /// Size the canvas to the play field and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: f32, height: f32) -> Option<Self> {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: width as f64,
            height: height as f64,
            time_ms: 0.0,
            starfield: true,
        })
    }

    pub fn set_time(&mut self, time_ms: f64) {
        self.time_ms = time_ms;
    }

    pub fn set_starfield(&mut self, enabled: bool) {
        self.starfield = enabled;
    }

    fn draw_background(&self) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        if !self.starfield {
            return;
        }
        ctx.set_fill_style_str("#ffffff");
        for i in 0..STAR_COUNT {
            let x = ((i * 12345) as f64) % self.width;
            let y = ((i * 6789) as f64) % self.height;
            let size = (i % 3 + 1) as f64;
            ctx.set_global_alpha(0.5 + (self.time_ms / 1000.0 + i as f64).sin() * 0.3);
            ctx.fill_rect(x, y, size, size);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_player(&self, state: &GameState) {
        let ctx = &self.ctx;
        let player = &state.player;
        let (x, y) = (player.pos.x as f64, player.pos.y as f64);

        ctx.save();
        let hull = if player.hodl {
            palette::HODL_GREEN
        } else {
            palette::BITCOIN_ORANGE
        };
        ctx.set_fill_style_str(&css(hull));
        ctx.begin_path();
        ctx.move_to(x, y - 15.0);
        ctx.line_to(x - 12.0, y + 10.0);
        ctx.line_to(x + 12.0, y + 10.0);
        ctx.close_path();
        ctx.fill();

        if player.hodl {
            ctx.set_font("10px Arial");
            ctx.set_text_align("center");
            ctx.fill_text("HODL!", x, y + 25.0).ok();
        }

        if player.shield > 0.0 {
            let alpha = player.shield as f64 / 100.0;
            ctx.set_stroke_style_str(&format!("rgba(0, 255, 255, {alpha})"));
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.arc(x, y, 25.0, 0.0, TAU).ok();
            ctx.stroke();
        }
        ctx.restore();
    }

    fn draw_bullets(&self, state: &GameState) {
        let ctx = &self.ctx;
        for bullet in &state.bullets {
            let (x, y) = (bullet.pos.x as f64, bullet.pos.y as f64);
            ctx.set_fill_style_str(&css(bullet.color));
            if bullet.owner.is_enemy() {
                ctx.begin_path();
                ctx.move_to(x, y + 10.0);
                ctx.line_to(x - 4.0, y - 4.0);
                ctx.line_to(x + 4.0, y - 4.0);
                ctx.fill();
            } else {
                let (w, h) = (bullet.size.x as f64, bullet.size.y as f64);
                ctx.set_shadow_color(&css(bullet.color));
                ctx.set_shadow_blur(10.0);
                ctx.fill_rect(x - w / 2.0, y, w, h);
                ctx.set_shadow_blur(0.0);
            }
        }
    }

    fn draw_enemies(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_font("bold 24px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for enemy in &state.enemies {
            let (x, y) = (enemy.pos.x as f64, enemy.pos.y as f64);
            ctx.set_fill_style_str(&css(enemy.color()));
            ctx.fill_rect(x - 20.0, y - 20.0, 40.0, 40.0);

            ctx.set_fill_style_str("#000000");
            ctx.fill_text(&enemy.tier.symbol().to_string(), x, y).ok();

            // Health bar
            let fill = (enemy.health.max(0) as f64 / crate::consts::ENEMY_START_HEALTH as f64).min(1.0);
            ctx.set_fill_style_str("#ff0000");
            ctx.fill_rect(x - 20.0, y - 30.0, 40.0, 4.0);
            ctx.set_fill_style_str("#00ff00");
            ctx.fill_rect(x - 20.0, y - 30.0, 40.0 * fill, 4.0);
        }
        ctx.restore();
    }

    fn draw_particles(&self, state: &GameState) {
        let ctx = &self.ctx;
        for p in &state.particles {
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(&css(p.color));
            ctx.begin_path();
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU).ok();
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_power_ups(&self, state: &GameState) {
        let ctx = &self.ctx;
        let pulse = 0.5 + (self.time_ms / 200.0).sin() * 0.3;
        for power_up in &state.power_ups {
            let (x, y, r) = (
                power_up.pos.x as f64,
                power_up.pos.y as f64,
                power_up.size as f64,
            );
            let color = css(power_up.kind.color());

            ctx.save();
            ctx.set_fill_style_str(&color);
            ctx.begin_path();
            ctx.arc(x, y, r, 0.0, TAU).ok();
            ctx.fill();

            ctx.set_fill_style_str("#000000");
            ctx.set_font("bold 16px Arial");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(power_up.kind.icon(), x, y).ok();

            ctx.set_stroke_style_str(&color);
            ctx.set_line_width(2.0);
            ctx.set_global_alpha(pulse);
            ctx.begin_path();
            ctx.arc(x, y, r + 3.0, 0.0, TAU).ok();
            ctx.stroke();
            ctx.restore();
        }
    }
}

impl RenderSink for CanvasRenderer {
    fn draw(&mut self, state: &GameState) {
        self.draw_background();
        self.draw_player(state);
        self.draw_bullets(state);
        self.draw_enemies(state);
        self.draw_particles(state);
        self.draw_power_ups(state);
    }
}
