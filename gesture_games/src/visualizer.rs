//! Software-rendered game window using `minifb`.
//!
//! Each frame the camera image (or a plain background when the source has
//! none) is copied into the framebuffer, the tracked hand is overlaid, and
//! the game's [`Scene`] is painted on top.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Score: 40                                        Time: 7s    │
//! │ Level: 2/3                                                   │
//! │                                                              │
//! │                 scene shapes over camera image               │
//! │                                                              │
//! │ key legend                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The window is also the simulated hand's input device: when a
//! [`SimInput`] sender is attached, mouse motion and the number keys are
//! forwarded to the [`SimProvider`](hand_tracking::sim::SimProvider).

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use hand_tracking::sim::SimInput;
use hand_tracking::{Frame, LandmarkSet, Point};

use crate::config::Config;
use crate::error::GameError;
use crate::session::{Rect, Scene, Shape, Signal};

const LEGEND_SIM: &str = "mouse=move  0-5=fingers  h=hide hand  space/n=submit  esc/q=quit";
const LEGEND:     &str = "space/n=submit  esc/q=quit";
const LEGEND_COLOR: u32 = 0xFF888888;
const HAND_COLOR:   u32 = 0xFF00C8FF;
const BANNER_SHADE: f32 = 0.6;

// ════════════════════════════════════════════════════════════════════════════
// Screen
// ════════════════════════════════════════════════════════════════════════════

/// What the app loop needs from a display.
pub trait Screen {
    fn is_open(&self) -> bool;

    /// Keyboard signal for this frame.
    fn poll_input(&mut self) -> Signal;

    fn render(&mut self, frame: &Frame, hand: Option<&LandmarkSet>, scene: &Scene);

    /// Full-screen message lines `(text, color)`.
    fn render_banner(&mut self, frame: &Frame, lines: &[(&str, u32)]);
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    width:      usize,
    height:     usize,
    background: u32,
    sim_tx:     Option<Sender<SimInput>>,
    last_mouse: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(config: &Config, sim_tx: Option<Sender<SimInput>>) -> Result<Self, GameError> {
        let width = config.window.width as usize;
        let height = config.window.height as usize;
        let mut window = Window::new(
            "Gesture Games",
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| GameError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(config.window.frame_delay_ms)));

        Ok(Visualizer {
            window,
            buf: vec![config.palette.background; width * height],
            width,
            height,
            background: config.palette.background,
            sim_tx,
            last_mouse: None,
        })
    }

    fn present(&mut self) {
        if let Err(e) = self.window.update_with_buffer(&self.buf, self.width, self.height) {
            tracing::warn!("Window update failed: {}", e);
        }
    }

    // ── Layers ────────────────────────────────────────────────────────────

    /// Camera pixels scaled to the window, or the plain background.
    fn draw_background(&mut self, frame: &Frame) {
        if !frame.has_image() || frame.width == 0 || frame.height == 0 {
            self.buf.fill(self.background);
            return;
        }
        let (fw, fh) = (frame.width as usize, frame.height as usize);
        for row in 0..self.height {
            let sy = row * fh / self.height;
            for col in 0..self.width {
                let sx = col * fw / self.width;
                self.buf[row * self.width + col] =
                    frame.pixels.get(sy * fw + sx).copied().unwrap_or(self.background);
            }
        }
    }

    /// `hand` is already in window pixels.
    fn draw_hand(&mut self, hand: &LandmarkSet) {
        const BONES: [(usize, usize); 21] = [
            (0, 1), (1, 2), (2, 3), (3, 4),
            (0, 5), (5, 6), (6, 7), (7, 8),
            (5, 9), (9, 10), (10, 11), (11, 12),
            (9, 13), (13, 14), (14, 15), (15, 16),
            (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
        ];
        for (a, b) in BONES {
            if let (Some(pa), Some(pb)) = (hand.get(a), hand.get(b)) {
                self.draw_line(pa, pb, HAND_COLOR, 2);
            }
        }
        for &p in hand.points() {
            self.fill_circle(p, 4, 0xFFFFFFFF);
        }
    }

    fn draw_scene(&mut self, scene: &Scene) {
        for shape in &scene.shapes {
            match shape {
                Shape::Circle { center, radius, color, filled: true } => {
                    self.fill_circle(*center, *radius, *color)
                }
                Shape::Circle { center, radius, color, filled: false } => {
                    self.draw_circle(*center, *radius, *color)
                }
                Shape::Line { from, to, color, thickness } => {
                    self.draw_line(*from, *to, *color, *thickness)
                }
                Shape::Rect { rect, color, filled: true } => self.fill_rect(*rect, *color),
                Shape::Rect { rect, color, filled: false } => self.draw_border(*rect, *color),
                Shape::Text { pos, text, color, scale } => {
                    if pos.x >= 0 && pos.y >= 0 {
                        self.draw_text(text, pos.x as usize, pos.y as usize, *color, *scale);
                    }
                }
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, r: Rect, color: u32) {
        let x0 = r.x.max(0);
        let y0 = r.y.max(0);
        let x1 = (r.x + r.w).min(self.width as i32);
        let y1 = (r.y + r.h).min(self.height as i32);
        for row in y0..y1 {
            for col in x0..x1 {
                self.buf[row as usize * self.width + col as usize] = color;
            }
        }
    }

    fn draw_border(&mut self, r: Rect, color: u32) {
        for col in r.x..r.x + r.w {
            self.set_pixel(col, r.y, color);
            self.set_pixel(col, r.y + r.h - 1, color);
        }
        for row in r.y..r.y + r.h {
            self.set_pixel(r.x, row, color);
            self.set_pixel(r.x + r.w - 1, row, color);
        }
    }

    fn fill_circle(&mut self, c: Point, r: i32, color: u32) {
        let r2 = r * r;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(c.x + dx, c.y + dy, color);
                }
            }
        }
    }

    fn draw_circle(&mut self, c: Point, r: i32, color: u32) {
        let outer = r * r;
        let inner = (r - 2).max(0).pow(2);
        for dy in -r..=r {
            for dx in -r..=r {
                let d = dx * dx + dy * dy;
                if d <= outer && d > inner {
                    self.set_pixel(c.x + dx, c.y + dy, color);
                }
            }
        }
    }

    /// Bresenham line, stamped with a `thickness`-wide square.
    fn draw_line(&mut self, from: Point, to: Point, color: u32, thickness: i32) {
        let half = (thickness.max(1) - 1) / 2;
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            for oy in -half..=half {
                for ox in -half..=half {
                    self.set_pixel(x + ox, y + oy, color);
                }
            }
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Bitmap text, each 3×5 glyph cell scaled by `scale`.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        let r = Rect::new(
                            (cx + col * scale) as i32,
                            (y + row * scale) as i32,
                            scale as i32,
                            scale as i32,
                        );
                        self.fill_rect(r, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.width {
                break;
            }
        }
    }

}

impl Screen for Visualizer {
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Keyboard signal; in simulation also forwards mouse and finger keys.
    fn poll_input(&mut self) -> Signal {
        if !self.window.is_open() {
            return Signal::Quit;
        }
        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        let signal = if pressed(Key::Escape) || pressed(Key::Q) {
            Signal::Quit
        } else if pressed(Key::Space) || pressed(Key::N) {
            Signal::Advance
        } else {
            Signal::None
        };

        if let Some(tx) = &self.sim_tx {
            let finger_keys = [Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5];
            for (n, key) in finger_keys.iter().enumerate() {
                if pressed(*key) {
                    let _ = tx.send(SimInput::Fingers(n as u8));
                }
            }
            if pressed(Key::H) {
                let _ = tx.send(SimInput::ToggleHand);
            }

            let mouse = self.window.get_mouse_pos(MouseMode::Clamp);
            if let Some((mx, my)) = mouse {
                if mouse != self.last_mouse {
                    let _ = tx.send(SimInput::Pointer {
                        x: mx / self.width as f32,
                        y: my / self.height as f32,
                    });
                    self.last_mouse = mouse;
                }
            }
        }

        signal
    }

    fn render(&mut self, frame: &Frame, hand: Option<&LandmarkSet>, scene: &Scene) {
        self.draw_background(frame);
        if let Some(hand) = hand {
            self.draw_hand(hand);
        }
        self.draw_scene(scene);
        let legend = if self.sim_tx.is_some() { LEGEND_SIM } else { LEGEND };
        self.draw_text(legend, 10, self.height.saturating_sub(20), LEGEND_COLOR, 2);
        self.present();
    }

    /// Full-screen message over a dimmed background.
    fn render_banner(&mut self, frame: &Frame, lines: &[(&str, u32)]) {
        self.draw_background(frame);
        for px in self.buf.iter_mut() {
            *px = blend(*px, 0xFF000000, BANNER_SHADE);
        }

        let scale = 5;
        let line_h = 5 * scale + 20;
        let block_h = lines.len() * line_h;
        let mut y = (self.height.saturating_sub(block_h)) / 2;
        for &(text, color) in lines {
            let x = self.width.saturating_sub(text_width(text, scale)) / 2;
            self.draw_text(text, x, y, color, scale);
            y += line_h;
        }
        self.present();
    }

}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * 4 * scale.max(1)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFF000000, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFF000000, 1.0), 0xFF000000);
        assert_eq!(blend(0xFF646464, 0xFF000000, 0.5), 0xFF323232);
    }

    #[test]
    fn every_label_character_has_a_glyph() {
        let fallback = char_glyph('~');
        for ch in "Score: Level Time Accuracy % Jitter Next Dot Game Over! Starting (1/5)'".chars() {
            if ch != ' ' {
                assert_ne!(char_glyph(ch), fallback, "no glyph for {:?}", ch);
            }
        }
    }

    #[test]
    fn text_width_scales() {
        assert_eq!(text_width("abc", 1), 12);
        assert_eq!(text_width("abc", 3), 36);
    }
}
