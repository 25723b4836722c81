//! Canvas2D draw routines (wasm only)

use web_sys::CanvasRenderingContext2d;

use super::sky;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Coin, GameState, Obstacle, ObstacleKind, Powerup, PowerupKind, Tree, TreeKind};

/// Canvas renderer; owns the 2d context and all cosmetic animation phase
pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    /// Coin spin phase (render-only, not gameplay state)
    coin_angle: f64,
    /// Power-up spin phase
    powerup_angle: f64,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            coin_angle: 0.0,
            powerup_angle: 0.0,
        }
    }

    /// Draw one frame from the post-step state (read-only)
    pub fn render(&mut self, state: &GameState, settings: &Settings) {
        self.coin_angle += 0.1;
        self.powerup_angle += 0.05;

        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, LOGICAL_WIDTH as f64, LOGICAL_HEIGHT as f64);

        let shaking = settings.effective_screen_shake() && state.shake > 0.0;
        if shaking {
            ctx.save();
            let shake = state.shake as f64;
            let dx = js_sys::Math::random() * shake - shake / 2.0;
            let dy = js_sys::Math::random() * shake - shake / 2.0;
            let _ = ctx.translate(dx, dy);
        }

        // Ambient backdrop follows the day-night phase
        let bg = sky::css_color(sky::sky_color(state.day_night));
        ctx.set_fill_style_str(&bg);
        ctx.fill_rect(0.0, 0.0, LOGICAL_WIDTH as f64, LOGICAL_HEIGHT as f64);

        for tree in &state.trees {
            self.draw_tree(tree);
        }
        self.draw_road(state.road_offset as f64);

        for particle in &state.particles {
            ctx.set_fill_style_str(particle.color);
            ctx.set_global_alpha(particle.life.max(0.0) as f64);
            ctx.begin_path();
            let _ = ctx.arc(
                particle.pos.x as f64,
                particle.pos.y as f64,
                particle.size as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
            ctx.set_global_alpha(1.0);
        }

        for obstacle in &state.obstacles {
            self.draw_obstacle(obstacle);
        }
        for coin in &state.coins {
            self.draw_coin(coin);
        }
        for powerup in &state.powerups {
            self.draw_powerup(powerup);
        }
        self.draw_car(state);

        if shaking {
            ctx.restore();
        }
    }

    fn draw_road(&self, offset: f64) {
        let ctx = &self.ctx;
        let h = LOGICAL_HEIGHT as f64;

        // Road surface and shoulders
        ctx.set_fill_style_str("#1a1a1a");
        ctx.fill_rect(ROAD_LEFT as f64, 0.0, (ROAD_RIGHT - ROAD_LEFT) as f64, h);
        ctx.set_fill_style_str("#333333");
        ctx.fill_rect(ROAD_LEFT as f64, 0.0, ROAD_SHOULDER as f64, h);
        ctx.fill_rect((ROAD_RIGHT - ROAD_SHOULDER) as f64, 0.0, ROAD_SHOULDER as f64, h);

        // Dashed lane dividers, scrolled by the road offset
        ctx.set_stroke_style_str("#ffff00");
        ctx.set_line_width(4.0);
        let dash = js_sys::Array::of2(&30.0.into(), &20.0.into());
        let _ = ctx.set_line_dash(&dash);
        ctx.set_line_dash_offset(-offset);

        for divider in [250.0, 450.0, 650.0] {
            ctx.begin_path();
            ctx.move_to(divider, 0.0);
            ctx.line_to(divider, h);
            ctx.stroke();
        }
        let _ = ctx.set_line_dash(&js_sys::Array::new());
        ctx.set_line_dash_offset(0.0);

        // Solid side lines
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(6.0);
        for edge in [ROAD_LEFT as f64, ROAD_RIGHT as f64] {
            ctx.begin_path();
            ctx.move_to(edge, 0.0);
            ctx.line_to(edge, h);
            ctx.stroke();
        }
    }

    fn draw_tree(&self, tree: &Tree) {
        let ctx = &self.ctx;
        let (x, y, size) = (tree.x as f64, tree.y as f64, tree.size as f64);

        ctx.set_fill_style_str("#2d5016");
        match tree.kind {
            TreeKind::Pine => {
                ctx.begin_path();
                ctx.move_to(x, y - size);
                ctx.line_to(x - size * 0.4, y);
                ctx.line_to(x + size * 0.4, y);
                ctx.close_path();
                ctx.fill();

                ctx.set_fill_style_str("#4a3728");
                ctx.fill_rect(x - size * 0.1, y, size * 0.2, size * 0.3);
            }
            TreeKind::Round => {
                ctx.begin_path();
                let _ = ctx.arc(x, y - size * 0.3, size * 0.4, 0.0, std::f64::consts::TAU);
                ctx.fill();

                ctx.set_fill_style_str("#4a3728");
                ctx.fill_rect(x - size * 0.08, y, size * 0.16, size * 0.3);
            }
        }
    }

    fn draw_obstacle(&self, obs: &Obstacle) {
        let ctx = &self.ctx;
        let (x, y) = (obs.x as f64, obs.y as f64);
        let (w, h) = (obs.width as f64, obs.height as f64);

        // Ground shadow
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
        ctx.fill_rect(x + 3.0, y + h - 3.0, w - 6.0, 5.0);

        if obs.kind == ObstacleKind::Cone {
            ctx.set_fill_style_str(obs.kind.color());
            ctx.begin_path();
            ctx.move_to(x + w / 2.0, y);
            ctx.line_to(x, y + h);
            ctx.line_to(x + w, y + h);
            ctx.close_path();
            ctx.fill();

            ctx.set_fill_style_str("#ffffff");
            ctx.fill_rect(x + 5.0, y + h * 0.4, w - 10.0, 5.0);
        } else {
            ctx.set_fill_style_str(obs.kind.color());
            ctx.fill_rect(x, y, w, h);

            // Windows
            ctx.set_fill_style_str("#444444");
            ctx.fill_rect(x + 5.0, y + h - 30.0, w - 10.0, 20.0);
            ctx.fill_rect(x + 5.0, y + 5.0, w - 10.0, 20.0);

            // Lights
            ctx.set_fill_style_str("#ffffff");
            ctx.fill_rect(x + 3.0, y + h - 5.0, 6.0, 4.0);
            ctx.fill_rect(x + w - 9.0, y + h - 5.0, 6.0, 4.0);
        }
    }

    fn draw_coin(&self, coin: &Coin) {
        let ctx = &self.ctx;
        let r = coin.radius as f64;

        ctx.save();
        let _ = ctx.translate(coin.pos.x as f64, coin.pos.y as f64);
        let _ = ctx.rotate(self.coin_angle);

        // Outer glow
        if let Ok(glow) = ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, r + 5.0) {
            let _ = glow.add_color_stop(0.0, "rgba(255, 215, 0, 0.8)");
            let _ = glow.add_color_stop(1.0, "rgba(255, 215, 0, 0)");
            ctx.set_fill_style_canvas_gradient(&glow);
            ctx.fill_rect(-r - 5.0, -r - 5.0, (r + 5.0) * 2.0, (r + 5.0) * 2.0);
        }

        if let Ok(body) = ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, r) {
            let _ = body.add_color_stop(0.0, "#ffed4e");
            let _ = body.add_color_stop(0.5, "#ffd700");
            let _ = body.add_color_stop(1.0, "#daa520");
            ctx.set_fill_style_canvas_gradient(&body);
        }
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, r, 0.0, std::f64::consts::TAU);
        ctx.fill();

        ctx.set_stroke_style_str("#daa520");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, r - 4.0, 0.0, std::f64::consts::TAU);
        ctx.stroke();

        ctx.restore();
    }

    fn draw_powerup(&self, powerup: &Powerup) {
        let ctx = &self.ctx;
        let r = powerup.radius as f64;
        let glow_color = match powerup.kind {
            PowerupKind::Shield => "#00ffff",
            PowerupKind::SlowMo => "#9b59b6",
            PowerupKind::Magnet => "#ff00ff",
        };

        ctx.save();
        let _ = ctx.translate(powerup.pos.x as f64, powerup.pos.y as f64);
        let _ = ctx.rotate(self.powerup_angle);

        if let Ok(glow) = ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, r + 10.0) {
            let _ = glow.add_color_stop(0.0, glow_color);
            let _ = glow.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
            ctx.set_fill_style_canvas_gradient(&glow);
            ctx.fill_rect(-r - 10.0, -r - 10.0, (r + 10.0) * 2.0, (r + 10.0) * 2.0);
        }

        ctx.set_fill_style_str(glow_color);
        ctx.fill_rect(-r, -r, r * 2.0, r * 2.0);
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(2.0);
        ctx.stroke_rect(-r, -r, r * 2.0, r * 2.0);

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 18px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let symbol = match powerup.kind {
            PowerupKind::Shield => "S",
            PowerupKind::SlowMo => "T",
            PowerupKind::Magnet => "M",
        };
        let _ = ctx.fill_text(symbol, 0.0, 0.0);

        ctx.restore();
    }

    fn draw_car(&self, state: &GameState) {
        let ctx = &self.ctx;
        let car = &state.car;
        let (w, h) = (car.width as f64, car.height as f64);

        ctx.save();
        let _ = ctx.translate((car.x + car.width / 2.0) as f64, (car.y + car.height / 2.0) as f64);
        let _ = ctx.rotate(car.tilt as f64);

        // Ground shadow
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.3)");
        ctx.fill_rect(-w / 2.0 + 5.0, h / 2.0 - 5.0, w - 10.0, 8.0);

        // Body
        let body = ctx.create_linear_gradient(-w / 2.0, 0.0, w / 2.0, 0.0);
        let _ = body.add_color_stop(0.0, "#00ffff");
        let _ = body.add_color_stop(0.5, "#0099ff");
        let _ = body.add_color_stop(1.0, "#00ffff");
        ctx.set_fill_style_canvas_gradient(&body);
        ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);

        // Windshield and back window
        ctx.set_fill_style_str("#222222");
        ctx.fill_rect(-w / 2.0 + 8.0, -h / 2.0 + 10.0, w - 16.0, 25.0);
        ctx.fill_rect(-w / 2.0 + 8.0, h / 2.0 - 25.0, w - 16.0, 15.0);

        // Headlights
        ctx.set_fill_style_str("#ffff00");
        ctx.fill_rect(-w / 2.0 + 5.0, -h / 2.0, 8.0, 5.0);
        ctx.fill_rect(w / 2.0 - 13.0, -h / 2.0, 8.0, 5.0);

        // Tail lights
        ctx.set_fill_style_str("#ff0000");
        ctx.fill_rect(-w / 2.0 + 5.0, h / 2.0 - 5.0, 8.0, 5.0);
        ctx.fill_rect(w / 2.0 - 13.0, h / 2.0 - 5.0, 8.0, 5.0);

        // Shield glow ring
        if state.effects.shield {
            ctx.set_stroke_style_str("#00ffff");
            ctx.set_line_width(3.0);
            ctx.set_shadow_blur(20.0);
            ctx.set_shadow_color("#00ffff");
            ctx.begin_path();
            let _ = ctx.arc(0.0, 0.0, w * 0.8, 0.0, std::f64::consts::TAU);
            ctx.stroke();
            ctx.set_shadow_blur(0.0);
        }

        ctx.restore();
    }
}
