use std::time::Duration;

use crate::board::Board;
use crate::config::BingoConfig;
use crate::fireworks::FireworksEngine;
use crate::schedule::{Scheduler, TaskId};
use crate::win::{self, WinResult};

/// How long the bingo banner and its fireworks stay up.
pub const BINGO_CELEBRATION: Duration = Duration::from_millis(4000);

pub const BINGO_STATUS: &str = "BINGO! Now go for the Full House!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    BingoAnnounced,
    FullHouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banner {
    pub text: &'static str,
    pub subtext: &'static str,
}

impl Banner {
    pub const BINGO: Banner = Banner {
        text: "BINGO!",
        subtext: "Now go for the Full House!",
    };
    pub const FULL_HOUSE: Banner = Banner {
        text: "FULL HOUSE!",
        subtext: "",
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameTask {
    EndBingoCelebration,
}

pub struct GameController {
    config: BingoConfig,
    board: Board,
    state: GameState,
    winning: Vec<bool>,
    banner: Option<Banner>,
    status: Option<&'static str>,
    fireworks: FireworksEngine,
    timers: Scheduler<GameTask>,
    celebration: Option<TaskId>,
    rng: fastrand::Rng,
}

impl GameController {
    /// `canvas_width` x `canvas_height` is the fireworks canvas in pixels.
    /// The config must already be validated.
    pub fn new(config: BingoConfig, canvas_width: usize, canvas_height: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let fireworks = FireworksEngine::new(canvas_width, canvas_height, rng.fork());
        let board = Board::shuffled(&config, &mut rng);
        let winning = vec![false; config.cell_count()];

        Self {
            config,
            board,
            state: GameState::Idle,
            winning,
            banner: None,
            status: None,
            fireworks,
            timers: Scheduler::new(),
            celebration: None,
            rng,
        }
    }

    /// Flip a cell and check for a win if it became selected. Returns what
    /// the detector saw; lines after the first bingo are reported but not
    /// announced.
    pub fn toggle(&mut self, index: usize) -> WinResult {
        if self.state == GameState::FullHouse {
            return WinResult::NoWin;
        }

        let Some(selected) = self.board.selection_mut().toggle(index) else {
            return WinResult::NoWin;
        };
        if !selected {
            return WinResult::NoWin;
        }

        let result = win::evaluate(self.board.selection().cells(), self.board.size());
        match &result {
            WinResult::FullHouse => self.announce_full_house(),
            WinResult::Line(line) if self.state == GameState::Idle => self.announce_bingo(line),
            WinResult::Line(_) | WinResult::NoWin => {}
        }
        result
    }

    fn announce_bingo(&mut self, line: &[usize]) {
        tracing::info!(?line, "bingo");
        self.state = GameState::BingoAnnounced;
        for &idx in line {
            if let Some(cell) = self.winning.get_mut(idx) {
                *cell = true;
            }
        }
        self.banner = Some(Banner::BINGO);
        self.fireworks.start();
        let id = self.timers.schedule(BINGO_CELEBRATION, GameTask::EndBingoCelebration);
        self.celebration = Some(id);
    }

    fn announce_full_house(&mut self) {
        tracing::info!(previous = ?self.state, "full house");
        // The bingo banner timeout would otherwise stop these fireworks.
        if let Some(id) = self.celebration.take() {
            self.timers.cancel(id);
        }
        self.state = GameState::FullHouse;
        self.winning.fill(true);
        self.status = None;
        self.banner = Some(Banner::FULL_HOUSE);
        self.fireworks.start();
    }

    pub fn reset(&mut self) {
        tracing::info!(state = ?self.state, "card reset");
        self.timers.cancel_all();
        self.fireworks.stop();
        self.clear_marks();
        self.board.selection_mut().clear();
    }

    pub fn new_card(&mut self) {
        tracing::info!(state = ?self.state, "new card requested");
        self.timers.cancel_all();
        self.fireworks.clear();
        self.board.reshuffle(&self.config, &mut self.rng);
        self.clear_marks();
    }

    fn clear_marks(&mut self) {
        self.celebration = None;
        self.state = GameState::Idle;
        self.winning.fill(false);
        self.banner = None;
        self.status = None;
    }

    pub fn update(&mut self, dt: f32) {
        self.timers.advance(dt);
        while let Some(task) = self.timers.pop_due() {
            match task {
                GameTask::EndBingoCelebration => {
                    self.celebration = None;
                    self.end_bingo_celebration();
                }
            }
        }
        self.fireworks.update(dt);
    }

    fn end_bingo_celebration(&mut self) {
        if self.state != GameState::BingoAnnounced {
            return;
        }
        tracing::debug!("bingo celebration over");
        self.fireworks.stop();
        self.banner = None;
        self.status = Some(BINGO_STATUS);
    }

    pub fn resize(&mut self, canvas_width: usize, canvas_height: usize) {
        self.fireworks.resize(canvas_width, canvas_height);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &BingoConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_winning(&self, index: usize) -> bool {
        self.winning.get(index).copied().unwrap_or(false)
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn status(&self) -> Option<&'static str> {
        self.status
    }

    pub fn fireworks(&self) -> &FireworksEngine {
        &self.fireworks
    }
}
