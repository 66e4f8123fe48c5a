use std::path::Path;

use serde::Deserialize;

use crate::Rgb;
use crate::error::{Error, Result};

const DEFAULT_TERMS: [&str; 30] = [
    "Can you hear me?",
    "You're on mute",
    "Sorry, go ahead",
    "Let's take this offline",
    "Circle back",
    "Quick sync",
    "Can everyone see my screen?",
    "Who just joined?",
    "Hard stop",
    "Low-hanging fruit",
    "Action items",
    "Per my last email",
    "Bandwidth",
    "Deep dive",
    "Let's table that",
    "Dog barking",
    "Frozen video",
    "Wrong window shared",
    "Echo",
    "Is it recording?",
    "Touch base",
    "Moving forward",
    "Synergy",
    "Next steps",
    "Out of time",
    "Parking lot",
    "Going forward",
    "I'll keep it brief",
    "Did we lose someone?",
    "Run late",
];

#[derive(Debug, Clone, Deserialize)]
pub struct BingoConfig {
    #[serde(alias = "gridSize")]
    pub grid_size: usize,
    #[serde(alias = "freeSpaceText", default = "default_free_space")]
    pub free_space_text: String,
    pub terms: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

fn default_free_space() -> String {
    "FREE".to_string()
}

impl Default for BingoConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            free_space_text: default_free_space(),
            terms: DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
            title: "Meeting Bingo".to_string(),
            subtitle: "Click a square when you hear it".to_string(),
        }
    }
}

impl BingoConfig {
    /// Load and validate a config file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_toml_str(&text)?
        };

        tracing::info!(
            path = %path.display(),
            grid_size = config.grid_size,
            terms = config.terms.len(),
            "loaded card config"
        );
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::ZeroGridSize);
        }
        let cells = self
            .grid_size
            .checked_mul(self.grid_size)
            .ok_or(Error::GridTooLarge(self.grid_size))?;
        let needed = cells - 1;
        if self.terms.len() < needed {
            return Err(Error::NotEnoughTerms {
                grid_size: self.grid_size,
                needed,
                available: self.terms.len(),
            });
        }
        Ok(())
    }
}

pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let invalid = || Error::InvalidColor(hex.to_string());
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| invalid())?;

    Ok((r, g, b))
}
