use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Result of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "P", alias = "p")]
    Player,
    #[serde(rename = "B", alias = "b")]
    Banker,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Player, Outcome::Banker];

    /// Single-character symbol used on score cards and in pattern keys.
    pub fn symbol(self) -> char {
        match self {
            Outcome::Player => 'P',
            Outcome::Banker => 'B',
        }
    }

    pub fn from_symbol(c: char) -> Option<Outcome> {
        match c {
            'P' | 'p' => Some(Outcome::Player),
            'B' | 'b' => Some(Outcome::Banker),
            _ => None,
        }
    }

    pub fn opposite(self) -> Outcome {
        match self {
            Outcome::Player => Outcome::Banker,
            Outcome::Banker => Outcome::Player,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Outcome {
    type Error = LayoutError;

    fn try_from(c: char) -> Result<Self> {
        Outcome::from_symbol(c).ok_or(LayoutError::InvalidSymbol {
            symbol: c,
            position: 0,
        })
    }
}

impl FromStr for Outcome {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Outcome::try_from(c),
            (Some(_), Some(extra)) => Err(LayoutError::InvalidSymbol {
                symbol: extra,
                position: 1,
            }),
            (None, _) => Err(LayoutError::InvalidSymbol {
                symbol: ' ',
                position: 0,
            }),
        }
    }
}

/// Parse a symbol string such as `"PPB BPB"` or `"P,B,P"`.
///
/// ASCII whitespace and commas are separators. Every other character must be a
/// valid symbol; the reported position is the 0-based char index in `input`.
pub fn parse_outcomes(input: &str) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::with_capacity(input.len());
    for (position, symbol) in input.chars().enumerate() {
        if symbol.is_ascii_whitespace() || symbol == ',' {
            continue;
        }
        let outcome =
            Outcome::from_symbol(symbol).ok_or(LayoutError::InvalidSymbol { symbol, position })?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

pub fn format_outcomes(outcomes: &[Outcome]) -> String {
    outcomes.iter().map(|o| o.symbol()).collect()
}
