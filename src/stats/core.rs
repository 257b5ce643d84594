use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::history::OutcomeHistory;
use crate::logging::{LogEvent, LogFields, LogLevel};
use crate::outcome::Outcome;
use crate::predict::PredictionSource;

/// Scoring of one turn against the prediction made before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Hit,
    Miss,
    NoPrediction,
}

/// Running hit/miss tally for a single game.
#[derive(Debug, Clone, Default)]
pub struct HitTracker {
    hits: u64,
    misses: u64,
    skipped: u64,
    current_hit_run: u64,
    current_miss_run: u64,
    longest_hit_run: u64,
    longest_miss_run: u64,
}

impl HitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, predicted: Option<Outcome>, actual: Outcome) -> Verdict {
        let Some(predicted) = predicted else {
            self.skipped += 1;
            return Verdict::NoPrediction;
        };

        if predicted == actual {
            self.hits += 1;
            self.current_hit_run += 1;
            self.current_miss_run = 0;
            self.longest_hit_run = self.longest_hit_run.max(self.current_hit_run);
            Verdict::Hit
        } else {
            self.misses += 1;
            self.current_miss_run += 1;
            self.current_hit_run = 0;
            self.longest_miss_run = self.longest_miss_run.max(self.current_miss_run);
            Verdict::Miss
        }
    }

    /// Score every turn of `history`, predicting each from the turns before it.
    pub fn replay(source: &impl PredictionSource, history: &OutcomeHistory) -> Self {
        let mut tracker = Self::new();
        let mut seen = OutcomeHistory::new();
        for &actual in history.as_slice() {
            let predicted = source.predict(&seen).first().copied();
            tracker.record(predicted, actual);
            seen.push(actual);
        }
        tracker
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn current_miss_run(&self) -> u64 {
        self.current_miss_run
    }

    /// `None` until at least one prediction was scored.
    pub fn hit_rate(&self) -> Option<f64> {
        let scored = self.hits + self.misses;
        (scored > 0).then(|| self.hits as f64 / scored as f64)
    }

    pub fn summary(&self) -> HitSummary {
        HitSummary {
            hits: self.hits,
            misses: self.misses,
            skipped: self.skipped,
            hit_rate: self.hit_rate(),
            longest_hit_run: self.longest_hit_run,
            longest_miss_run: self.longest_miss_run,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitSummary {
    pub hits: u64,
    pub misses: u64,
    pub skipped: u64,
    pub hit_rate: Option<f64>,
    pub longest_hit_run: u64,
    pub longest_miss_run: u64,
}

impl HitSummary {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        let mut fields = LogFields::new();
        fields.insert("hits".to_string(), json!(self.hits));
        fields.insert("misses".to_string(), json!(self.misses));
        fields.insert("skipped".to_string(), json!(self.skipped));
        fields.insert("hit_rate".to_string(), json!(self.hit_rate));
        fields.insert("longest_hit_run".to_string(), json!(self.longest_hit_run));
        fields.insert("longest_miss_run".to_string(), json!(self.longest_miss_run));
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "hit_summary".to_string(),
            fields,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::PatternTable;

    #[test]
    fn tracks_runs_and_rate() {
        let mut tracker = HitTracker::new();
        let p = Outcome::Player;
        let b = Outcome::Banker;

        assert_eq!(tracker.hit_rate(), None);
        assert_eq!(tracker.record(None, p), Verdict::NoPrediction);
        assert_eq!(tracker.record(Some(p), p), Verdict::Hit);
        assert_eq!(tracker.record(Some(p), p), Verdict::Hit);
        assert_eq!(tracker.record(Some(b), p), Verdict::Miss);
        assert_eq!(tracker.record(Some(b), p), Verdict::Miss);
        assert_eq!(tracker.record(Some(b), p), Verdict::Miss);
        assert_eq!(tracker.record(Some(b), b), Verdict::Hit);

        let summary = tracker.summary();
        assert_eq!(summary.hits, 3);
        assert_eq!(summary.misses, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.hit_rate, Some(0.5));
        assert_eq!(summary.longest_hit_run, 2);
        assert_eq!(summary.longest_miss_run, 3);
        assert_eq!(tracker.current_miss_run(), 0);
    }

    #[test]
    fn replay_predicts_from_prior_turns() {
        // Always expect the streak to continue.
        let mut table = PatternTable::new(1);
        table.insert("P", "P").unwrap();
        table.insert("B", "B").unwrap();

        let history = OutcomeHistory::parse("PPBBBP").unwrap();
        let tracker = HitTracker::replay(&table, &history);

        // Turn 1 has no history; of the remaining 5, turns 2, 4, 5 continue.
        assert_eq!(tracker.skipped(), 1);
        assert_eq!(tracker.hits(), 3);
        assert_eq!(tracker.misses(), 2);
    }

    #[test]
    fn summary_log_event() {
        let summary = HitTracker::new().summary();
        let event = summary.to_log_event("bigroad::stats");
        assert_eq!(event.message, "hit_summary");
        assert_eq!(event.fields["hit_rate"], serde_json::Value::Null);
    }
}
