pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod fireworks;
pub mod game;
pub mod schedule;
pub mod view;
pub mod win;

pub use error::{Error, Result};

pub type Rgb = (u8, u8, u8);
