use std::io::Write;

use crate::Rgb;
use crate::fireworks::Canvas;
use crate::game::{Banner, GameController};

const TITLE: Rgb = (240, 147, 251);
const SUBTITLE: Rgb = (168, 237, 234);
const HEADER: Rgb = (246, 211, 101);
const CELL_BG: Rgb = (40, 42, 54);
const CELL_FG: Rgb = (220, 220, 230);
const SELECTED_BG: Rgb = (102, 126, 234);
const SELECTED_FG: Rgb = (255, 255, 255);
const WINNING_BG: Rgb = (246, 211, 101);
const WINNING_FG: Rgb = (40, 30, 20);
const BANNER_BG: Rgb = (118, 75, 162);
const BANNER_FG: Rgb = (255, 255, 255);
const STATUS: Rgb = (246, 211, 101);
const HINT: Rgb = (120, 120, 140);

/// Canvas pixels dimmer than this leave the card untouched.
const GLOW_THRESHOLD: f32 = 0.02;

const KEY_HINT: &str = "click/space: mark   arrows: move   n: new card   r: reset   q: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: usize,
    pub rows: usize,
    pub grid_size: usize,
    pub origin_x: usize,
    pub origin_y: usize,
    pub cell_w: usize,
    pub cell_h: usize,
}

impl Layout {
    const TOP: usize = 4;
    const BOTTOM: usize = 3;

    pub fn new(cols: usize, rows: usize, grid_size: usize) -> Self {
        let n = grid_size.max(1);
        let avail_h = rows.saturating_sub(Self::TOP + Self::BOTTOM);
        let cell_w = (cols.saturating_sub(2) / n).clamp(2, 20);
        let cell_h = (avail_h / n).clamp(1, 5);
        let board_w = cell_w * n;

        Self {
            cols,
            rows,
            grid_size: n,
            origin_x: cols.saturating_sub(board_w) / 2,
            origin_y: Self::TOP,
            cell_w,
            cell_h,
        }
    }

    pub fn board_width(&self) -> usize {
        self.cell_w * self.grid_size
    }

    pub fn board_height(&self) -> usize {
        self.cell_h * self.grid_size
    }

    /// Top-left corner and drawable size of a cell, excluding the gutter.
    pub fn cell_rect(&self, index: usize) -> (usize, usize, usize, usize) {
        let row = index / self.grid_size;
        let col = index % self.grid_size;
        let w = self.cell_w - 1;
        let h = if self.cell_h >= 3 { self.cell_h - 1 } else { self.cell_h };
        (
            self.origin_x + col * self.cell_w,
            self.origin_y + row * self.cell_h,
            w,
            h,
        )
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let col = (x - self.origin_x) / self.cell_w;
        let row = (y - self.origin_y) / self.cell_h;
        if col >= self.grid_size || row >= self.grid_size {
            return None;
        }

        let index = row * self.grid_size + col;
        let (cx, cy, w, h) = self.cell_rect(index);
        (x < cx + w && y < cy + h).then_some(index)
    }

    fn status_row(&self) -> usize {
        self.rows.saturating_sub(2)
    }

    fn hint_row(&self) -> usize {
        self.rows.saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

pub struct Frame {
    cols: usize,
    rows: usize,
    glyphs: Vec<Glyph>,
}

impl Frame {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            glyphs: vec![Self::blank((0, 0, 0)); cols * rows],
        }
    }

    fn blank(bg: Rgb) -> Glyph {
        Glyph {
            ch: ' ',
            fg: bg,
            bg,
            bold: false,
        }
    }

    pub fn clear(&mut self, bg: Rgb) {
        self.glyphs.fill(Self::blank(bg));
    }

    pub fn glyph(&self, x: usize, y: usize) -> Option<&Glyph> {
        (x < self.cols && y < self.rows).then(|| &self.glyphs[y * self.cols + x])
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Rgb) {
        for row in y..(y + h).min(self.rows) {
            for col in x..(x + w).min(self.cols) {
                self.glyphs[row * self.cols + col] = Self::blank(bg);
            }
        }
    }

    /// Write text starting at `x`, clipped to the frame. Background is taken
    /// from what is already there.
    pub fn put_str(&mut self, x: usize, y: usize, text: &str, fg: Rgb, bold: bool) {
        if y >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let col = x + i;
            if col >= self.cols {
                break;
            }
            let glyph = &mut self.glyphs[y * self.cols + col];
            glyph.ch = ch;
            glyph.fg = fg;
            glyph.bold = bold;
        }
    }

    pub fn put_centered(&mut self, y: usize, text: &str, fg: Rgb, bold: bool) {
        let len = text.chars().count();
        self.put_str(self.cols.saturating_sub(len) / 2, y, text, fg, bold);
    }

    /// Composite the fireworks layer. Each terminal cell covers two canvas
    /// pixels; blank cells become half-block pixels, text cells get the light
    /// added behind the text.
    pub fn overlay(&mut self, canvas: &Canvas) {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let top = canvas.pixel(x, y * 2)[3];
                let bot = canvas.pixel(x, y * 2 + 1)[3];
                if top < GLOW_THRESHOLD && bot < GLOW_THRESHOLD {
                    continue;
                }

                let glyph = &mut self.glyphs[y * self.cols + x];
                let base = glyph.bg;
                let top_color = canvas.composite_over(x, y * 2, base);
                let bot_color = canvas.composite_over(x, y * 2 + 1, base);

                if glyph.ch == ' ' {
                    glyph.ch = '▄';
                    glyph.bg = top_color;
                    glyph.fg = bot_color;
                } else {
                    glyph.bg = average(top_color, bot_color);
                }
            }
        }
    }

    pub fn write_ansi(&self, out: &mut Vec<u8>) -> std::io::Result<()> {
        out.extend_from_slice(b"\x1b[H");

        for y in 0..self.rows {
            let mut prev_fg: Option<Rgb> = None;
            let mut prev_bg: Option<Rgb> = None;
            let mut prev_bold = false;

            for x in 0..self.cols {
                let glyph = self.glyphs[y * self.cols + x];
                if glyph.bold != prev_bold {
                    let code: &[u8] = if glyph.bold { b"\x1b[1m" } else { b"\x1b[22m" };
                    out.extend_from_slice(code);
                    prev_bold = glyph.bold;
                }
                if prev_bg != Some(glyph.bg) {
                    write!(out, "\x1b[48;2;{};{};{}m", glyph.bg.0, glyph.bg.1, glyph.bg.2)?;
                    prev_bg = Some(glyph.bg);
                }
                if prev_fg != Some(glyph.fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", glyph.fg.0, glyph.fg.1, glyph.fg.2)?;
                    prev_fg = Some(glyph.fg);
                }
                let mut buf = [0u8; 4];
                out.extend_from_slice(glyph.ch.encode_utf8(&mut buf).as_bytes());
            }

            out.extend_from_slice(b"\x1b[0m");
            if y + 1 < self.rows {
                out.extend_from_slice(b"\r\n");
            }
        }
        Ok(())
    }
}

fn average(a: Rgb, b: Rgb) -> Rgb {
    (
        ((a.0 as u16 + b.0 as u16) / 2) as u8,
        ((a.1 as u16 + b.1 as u16) / 2) as u8,
        ((a.2 as u16 + b.2 as u16) / 2) as u8,
    )
}

/// Greedy word wrap; words longer than the width are cut.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let word: String = word.chars().take(width).collect();
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn draw_card(frame: &mut Frame, layout: &Layout, game: &GameController, cursor: usize, bg: Rgb) {
    frame.clear(bg);

    let config = game.config();
    frame.put_centered(0, &config.title, TITLE, true);
    frame.put_centered(1, &config.subtitle, SUBTITLE, false);

    let board = game.board();
    for (col, header) in board.column_headers().iter().enumerate() {
        let (x, _, w, _) = layout.cell_rect(col);
        let pad = w.saturating_sub(header.chars().count()) / 2;
        frame.put_str(x + pad, layout.origin_y - 1, header, HEADER, true);
    }

    for index in 0..board.size() * board.size() {
        let (x, y, w, h) = layout.cell_rect(index);
        let selected = board.selection().is_selected(index);
        let (mut cell_bg, fg) = if game.is_winning(index) {
            (WINNING_BG, WINNING_FG)
        } else if selected {
            (SELECTED_BG, SELECTED_FG)
        } else {
            (CELL_BG, CELL_FG)
        };
        if index == cursor {
            cell_bg = average(cell_bg, (255, 255, 255));
        }
        frame.fill_rect(x, y, w, h, cell_bg);

        let inner = w.saturating_sub(2).max(1);
        let lines = wrap(board.label(index), inner);
        let shown = lines.len().min(h);
        let top = y + (h - shown) / 2;
        for (i, line) in lines.iter().take(shown).enumerate() {
            let pad = w.saturating_sub(line.chars().count()) / 2;
            frame.put_str(x + pad, top + i, line, fg, board.is_free(index) || selected);
        }
        if selected && w >= 3 {
            frame.put_str(x + w - 1, y, "✓", fg, true);
        }
    }

    if let Some(banner) = game.banner() {
        draw_banner(frame, layout, banner);
    }
    if let Some(status) = game.status() {
        frame.put_centered(layout.status_row(), status, STATUS, true);
    }
    frame.put_centered(layout.hint_row(), KEY_HINT, HINT, false);
}

fn draw_banner(frame: &mut Frame, layout: &Layout, banner: Banner) {
    let text_w = banner.text.chars().count().max(banner.subtext.chars().count());
    let w = (text_w + 8).min(layout.cols);
    let h = if banner.subtext.is_empty() { 3 } else { 4 };
    let x = layout.cols.saturating_sub(w) / 2;
    let y = layout.origin_y + layout.board_height().saturating_sub(h) / 2;

    frame.fill_rect(x, y, w, h, BANNER_BG);
    let text_x = x + w.saturating_sub(banner.text.chars().count()) / 2;
    frame.put_str(text_x, y + 1, banner.text, BANNER_FG, true);
    if !banner.subtext.is_empty() {
        let sub_x = x + w.saturating_sub(banner.subtext.chars().count()) / 2;
        frame.put_str(sub_x, y + 2, banner.subtext, BANNER_FG, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BingoConfig;
    use crate::fireworks::BlendMode;

    #[test]
    fn test_layout_fits_terminal() {
        let layout = Layout::new(100, 40, 5);
        assert_eq!(layout.cell_w, 19);
        assert_eq!(layout.cell_h, 5);
        assert!(layout.origin_x + layout.board_width() <= 100);
        assert!(layout.origin_y + layout.board_height() <= 40 - 3);
    }

    #[test]
    fn test_hit_testing() {
        let layout = Layout::new(100, 40, 5);
        let (x, y, w, h) = layout.cell_rect(7);
        assert_eq!(layout.cell_at(x, y), Some(7));
        assert_eq!(layout.cell_at(x + w - 1, y + h - 1), Some(7));
        // Gutters belong to no cell
        assert_eq!(layout.cell_at(x + w, y), None);
        assert_eq!(layout.cell_at(0, 0), None);
        assert_eq!(layout.cell_at(layout.origin_x, layout.origin_y + layout.board_height()), None);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("Let's take this offline", 10), vec!["Let's take", "this", "offline"]);
        assert_eq!(wrap("Supercalifragilistic", 5), vec!["Super"]);
        assert!(wrap("", 5).is_empty());
    }

    #[test]
    fn test_overlay_turns_blank_cells_into_pixels() {
        let mut frame = Frame::new(4, 2);
        frame.clear((0, 0, 0));
        frame.put_str(0, 0, "A", (255, 255, 255), false);

        let mut canvas = Canvas::new(4, 4);
        canvas.set_blend(BlendMode::Lighter);
        canvas.fill((255, 0, 0), 1.0);
        frame.overlay(&canvas);

        let text = frame.glyph(0, 0).unwrap();
        assert_eq!(text.ch, 'A');
        assert_eq!(text.bg, (255, 0, 0));

        let pixel = frame.glyph(1, 0).unwrap();
        assert_eq!(pixel.ch, '▄');
        assert_eq!(pixel.fg, (255, 0, 0));
    }

    #[test]
    fn test_ansi_output_skips_repeated_colors() {
        let mut frame = Frame::new(3, 2);
        frame.clear((1, 2, 3));
        let mut out = Vec::new();
        frame.write_ansi(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("\x1b[H"));
        assert_eq!(text.matches("\x1b[48;2;1;2;3m").count(), 2);
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_card_shows_banner_and_hint() {
        let mut game = GameController::new(BingoConfig::default(), 100, 80, 3);
        for idx in [0, 1, 2, 3, 4] {
            game.toggle(idx);
        }
        let layout = Layout::new(100, 40, 5);
        let mut frame = Frame::new(100, 40);
        draw_card(&mut frame, &layout, &game, 0, (0, 0, 0));

        let plain: String = (0..40)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .map(|(x, y)| frame.glyph(x, y).map_or(' ', |g| g.ch))
            .collect();
        assert!(plain.contains("BINGO!"));
        assert!(plain.contains("Meeting Bingo"));
        assert!(plain.contains("n: new card"));
    }
}
