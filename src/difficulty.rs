use std::fmt;
use std::str::FromStr;

use crate::error::{ChessError, ChessResult};

/// How hard the computer plays: plies searched, and the chance of
/// playing a uniformly random legal move instead of searching.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    pub name: String,
    pub search_depth: u32,
    pub randomness: f64,
}

impl Difficulty {
    pub fn new(name: impl Into<String>, search_depth: u32, randomness: f64) -> ChessResult<Self> {
        if search_depth == 0 {
            return Err(ChessError::InvalidDifficulty(
                "search depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&randomness) {
            return Err(ChessError::InvalidDifficulty(format!(
                "randomness {} is outside [0, 1]",
                randomness
            )));
        }
        Ok(Self {
            name: name.into(),
            search_depth,
            randomness,
        })
    }

    pub fn easy() -> Self {
        Self::preset("Easy", 1, 0.3)
    }

    pub fn medium() -> Self {
        Self::preset("Medium", 2, 0.2)
    }

    pub fn hard() -> Self {
        Self::preset("Hard", 3, 0.1)
    }

    pub fn presets() -> [Difficulty; 3] {
        [Self::easy(), Self::medium(), Self::hard()]
    }

    fn preset(name: &str, search_depth: u32, randomness: f64) -> Self {
        Self {
            name: name.to_string(),
            search_depth,
            randomness,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::medium()
    }
}

impl FromStr for Difficulty {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::presets()
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChessError::UnknownDifficulty(s.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (depth {}, randomness {:.2})",
            self.name, self.search_depth, self.randomness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_parse_by_name() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::easy()));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::hard()));
        assert_eq!(Difficulty::default().search_depth, 2);
        assert!(matches!(
            "grandmaster".parse::<Difficulty>(),
            Err(ChessError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn custom_tiers_are_validated() {
        assert!(Difficulty::new("Deep", 4, 0.0).is_ok());
        assert!(Difficulty::new("Zero", 0, 0.0).is_err());
        assert!(Difficulty::new("Wild", 2, 1.5).is_err());
        assert!(Difficulty::new("Nan", 2, f64::NAN).is_err());
    }
}
