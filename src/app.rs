use std::io::Write;

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};

use crate::Rgb;
use crate::config::BingoConfig;
use crate::game::GameController;
use crate::view::{self, Frame, Layout};

pub struct BingoApp {
    game: GameController,
    layout: Layout,
    frame: Frame,
    cursor: usize,
    bg_color: Rgb,
    output_buf: Vec<u8>,
}

impl BingoApp {
    pub fn new(config: BingoConfig, cols: usize, rows: usize, seed: u64, bg_color: Rgb) -> Self {
        let layout = Layout::new(cols, rows, config.grid_size);
        let cursor = config.cell_count() / 2;
        Self {
            game: GameController::new(config, cols, rows * 2, seed),
            layout,
            frame: Frame::new(cols, rows),
            cursor,
            bg_color,
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn update(&mut self, dt: f32) {
        self.game.update(dt);
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        tracing::debug!(cols, rows, "terminal resized");
        self.layout = Layout::new(cols, rows, self.game.board().size());
        self.frame = Frame::new(cols, rows);
        self.game.resize(cols, rows * 2);
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        view::draw_card(&mut self.frame, &self.layout, &self.game, self.cursor, self.bg_color);
        self.frame.overlay(self.game.fireworks().canvas());

        self.output_buf.clear();
        self.frame.write_ansi(&mut self.output_buf)?;
        out.write_all(&self.output_buf)?;
        out.flush()
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse_event) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
                    let x = mouse_event.column as usize;
                    let y = mouse_event.row as usize;
                    if let Some(index) = self.layout.cell_at(x, y) {
                        self.cursor = index;
                        self.game.toggle(index);
                    }
                }
            }
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                match key_event.code {
                    KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
                    KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
                    KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
                    KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        self.game.toggle(self.cursor);
                    }
                    KeyCode::Char('n') => self.game.new_card(),
                    KeyCode::Char('r') => self.game.reset(),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let n = self.game.board().size() as isize;
        let row = (self.cursor as isize / n + d_row).rem_euclid(n);
        let col = (self.cursor as isize % n + d_col).rem_euclid(n);
        self.cursor = (row * n + col) as usize;
    }
}
