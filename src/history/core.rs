use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
use crate::outcome::{Outcome, format_outcomes, parse_outcomes};

/// Trailing outcomes used as the prediction lookup key.
pub const DEFAULT_PATTERN_LEN: usize = 11;

/// A maximal run of identical outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub outcome: Outcome,
    /// 1-based turn of the first outcome in the run.
    pub start: usize,
    pub len: usize,
}

impl Streak {
    /// 1-based turn of the last outcome in the run. An empty run ends where it starts.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len.saturating_sub(1))
    }
}

/// Append-only turn log for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeHistory {
    outcomes: Vec<Outcome>,
}

impl OutcomeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self {
            outcomes: parse_outcomes(input)?,
        })
    }

    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = Outcome>) {
        self.outcomes.extend(outcomes);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.last().copied()
    }

    /// Outcome of a 1-based turn.
    pub fn turn(&self, index: usize) -> Option<Outcome> {
        index
            .checked_sub(1)
            .and_then(|idx| self.outcomes.get(idx).copied())
    }

    /// The game as it stood after `turn` (clamped to the history length).
    pub fn up_to(&self, turn: usize) -> &[Outcome] {
        &self.outcomes[..turn.min(self.outcomes.len())]
    }

    pub fn streaks(&self) -> Vec<Streak> {
        let mut streaks: Vec<Streak> = Vec::new();
        for (idx, &outcome) in self.outcomes.iter().enumerate() {
            match streaks.last_mut() {
                Some(streak) if streak.outcome == outcome => streak.len += 1,
                _ => streaks.push(Streak {
                    outcome,
                    start: idx + 1,
                    len: 1,
                }),
            }
        }
        streaks
    }

    pub fn current_streak(&self) -> Option<Streak> {
        let last = self.last()?;
        let len = self
            .outcomes
            .iter()
            .rev()
            .take_while(|&&o| o == last)
            .count();
        Some(Streak {
            outcome: last,
            start: self.outcomes.len() - len + 1,
            len,
        })
    }

    /// Trailing `len` symbols, or the whole history when shorter.
    pub fn pattern_key(&self, len: usize) -> String {
        let start = self.outcomes.len().saturating_sub(len);
        format_outcomes(&self.outcomes[start..])
    }

    /// `(player, banker)` tallies.
    pub fn counts(&self) -> (usize, usize) {
        let player = self
            .outcomes
            .iter()
            .filter(|&&o| o == Outcome::Player)
            .count();
        (player, self.outcomes.len() - player)
    }
}

impl fmt::Display for OutcomeHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_outcomes(&self.outcomes))
    }
}

impl From<Vec<Outcome>> for OutcomeHistory {
    fn from(outcomes: Vec<Outcome>) -> Self {
        Self { outcomes }
    }
}

impl Serialize for OutcomeHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for OutcomeHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OutcomeHistory::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_streak_ends_at_its_start() {
        let streak = Streak {
            outcome: Outcome::Player,
            start: 0,
            len: 0,
        };
        assert_eq!(streak.end(), 0);
        let run = Streak {
            outcome: Outcome::Banker,
            start: 3,
            len: 3,
        };
        assert_eq!(run.end(), 5);
    }

    #[test]
    fn streaks_split_on_change() {
        let history = OutcomeHistory::parse("PPBBBPB").unwrap();
        let streaks = history.streaks();
        assert_eq!(streaks.len(), 4);
        assert_eq!(
            streaks[1],
            Streak {
                outcome: Outcome::Banker,
                start: 3,
                len: 3
            }
        );
        assert_eq!(streaks[1].end(), 5);
        assert!(OutcomeHistory::new().streaks().is_empty());
    }

    #[test]
    fn current_streak_counts_tail() {
        let history = OutcomeHistory::parse("PBBB").unwrap();
        let streak = history.current_streak().unwrap();
        assert_eq!(streak.outcome, Outcome::Banker);
        assert_eq!(streak.start, 2);
        assert_eq!(streak.len, 3);
        assert_eq!(OutcomeHistory::new().current_streak(), None);
    }

    #[test]
    fn pattern_key_takes_trailing_symbols() {
        let history = OutcomeHistory::parse("PPPPBBBBPPPPB").unwrap();
        assert_eq!(history.pattern_key(DEFAULT_PATTERN_LEN), "PPBBBBPPPPB");
        assert_eq!(history.pattern_key(3), "PPB");
        assert_eq!(OutcomeHistory::parse("PB").unwrap().pattern_key(11), "PB");
    }

    #[test]
    fn turn_lookup_is_one_based() {
        let mut history = OutcomeHistory::new();
        history.push(Outcome::Player);
        history.extend([Outcome::Banker, Outcome::Banker]);

        assert_eq!(history.turn(0), None);
        assert_eq!(history.turn(1), Some(Outcome::Player));
        assert_eq!(history.turn(3), Some(Outcome::Banker));
        assert_eq!(history.turn(4), None);
        assert_eq!(history.up_to(2).len(), 2);
        assert_eq!(history.up_to(99).len(), 3);
        assert_eq!(history.counts(), (1, 2));
    }

    #[test]
    fn serializes_as_symbol_string() {
        let history = OutcomeHistory::parse("PBB").unwrap();
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#""PBB""#);
        let back: OutcomeHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
        assert!(serde_json::from_str::<OutcomeHistory>(r#""PXB""#).is_err());
    }
}
