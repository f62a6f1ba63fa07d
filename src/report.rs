// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-sample outcomes and the daily summary.
//!
//! The [`Reporter`] classifies samples in input order. A sample whose output
//! distribution is degenerate is recorded as unclassifiable and the run goes
//! on; configuration errors stop the run.
//!
//! [`build_daily_summary`] folds outcomes into fixed time slots (24 hourly
//! slots by default). Within a slot the last outcome in input order wins and
//! empty slots read [`Condition::Unknown`].

use crate::classifier::{ClassificationResult, Classifier};
use crate::error::{CanisError, ConfigurationError, Result};
use crate::sample::Sample;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default number of slots in a daily summary.
pub const DEFAULT_SLOT_COUNT: usize = 24;

const MINUTES_PER_DAY: usize = 24 * 60;

/// Reporting category, ordered by ordinal rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Unknown,
    Urgent,
    #[serde(rename = "need help")]
    NeedHelp,
    Normal,
    Perfect,
}

impl Condition {
    /// All categories, best first.
    pub const ALL: [Condition; 5] = [
        Condition::Perfect,
        Condition::Normal,
        Condition::NeedHelp,
        Condition::Urgent,
        Condition::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Perfect => "perfect",
            Condition::Normal => "normal",
            Condition::NeedHelp => "need help",
            Condition::Urgent => "urgent",
            Condition::Unknown => "unknown",
        }
    }

    /// Chart height: perfect 4 down to unknown 0.
    pub fn ordinal_rank(&self) -> u8 {
        match self {
            Condition::Perfect => 4,
            Condition::Normal => 3,
            Condition::NeedHelp => 2,
            Condition::Urgent => 1,
            Condition::Unknown => 0,
        }
    }

    /// Display colour.
    pub fn colour(&self) -> &'static str {
        match self {
            Condition::Perfect => "#a8c9ca",  // opal
            Condition::Normal => "#a6d301",   // pistachio
            Condition::NeedHelp => "#d37401", // orange
            Condition::Urgent => "#a90120",   // dark red
            Condition::Unknown => "gray",
        }
    }

    /// Map an output term name to a category. Matching ignores case and
    /// surrounding whitespace; anything unmapped is `Unknown`.
    pub fn from_term(term: &str) -> Condition {
        let term = term.trim().to_lowercase();
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == term)
            .unwrap_or(Condition::Unknown)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can be placed in a daily summary slot.
pub trait SlotEntry {
    fn timestamp(&self) -> NaiveTime;
    fn condition(&self) -> Condition;
}

impl SlotEntry for ClassificationResult {
    fn timestamp(&self) -> NaiveTime {
        self.timestamp
    }

    fn condition(&self) -> Condition {
        ClassificationResult::condition(self)
    }
}

/// Result of processing one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleOutcome {
    Classified(ClassificationResult),
    Unclassifiable { timestamp: NaiveTime, reason: String },
}

impl SampleOutcome {
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            SampleOutcome::Classified(result) => Some(result),
            SampleOutcome::Unclassifiable { .. } => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.result().is_some()
    }

    /// Console line for this outcome.
    pub fn report_line(&self, output_name: &str) -> String {
        match self {
            SampleOutcome::Classified(r) => format!(
                "Time: {} | Fuzzification value for {}: {:.2} -> Condition: {}",
                r.timestamp.format("%H:%M"),
                output_name,
                r.output,
                r.label
            ),
            SampleOutcome::Unclassifiable { timestamp, reason } => format!(
                "Time: {} | unclassifiable: {}",
                timestamp.format("%H:%M"),
                reason
            ),
        }
    }
}

impl SlotEntry for SampleOutcome {
    fn timestamp(&self) -> NaiveTime {
        match self {
            SampleOutcome::Classified(r) => r.timestamp,
            SampleOutcome::Unclassifiable { timestamp, .. } => *timestamp,
        }
    }

    fn condition(&self) -> Condition {
        match self {
            SampleOutcome::Classified(r) => r.condition(),
            SampleOutcome::Unclassifiable { .. } => Condition::Unknown,
        }
    }
}

/// One slot of the daily summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    /// Slot start as `HH:MM`.
    pub slot: String,
    pub condition: Condition,
    pub ordinal_rank: u8,
    pub colour: &'static str,
}

impl SlotSummary {
    fn new(start_minute: usize, condition: Condition) -> Self {
        Self {
            slot: format!("{:02}:{:02}", start_minute / 60, start_minute % 60),
            condition,
            ordinal_rank: condition.ordinal_rank(),
            colour: condition.colour(),
        }
    }
}

/// Fixed-size, time-indexed condition summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    slots: Vec<SlotSummary>,
}

impl DailySummary {
    pub fn slots(&self) -> &[SlotSummary] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot by its `HH:MM` label.
    pub fn get(&self, slot: &str) -> Option<&SlotSummary> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Fold entries into `slot_count` equal slots of the day.
///
/// `slot_count` must divide 1440 (24 gives hourly `HH:00` slots). Later
/// entries overwrite earlier ones in the same slot; unfilled slots are
/// `Unknown`.
pub fn build_daily_summary<T: SlotEntry>(
    entries: &[T],
    slot_count: usize,
) -> std::result::Result<DailySummary, ConfigurationError> {
    if slot_count == 0 || MINUTES_PER_DAY % slot_count != 0 {
        return Err(ConfigurationError::InvalidSlotCount(slot_count));
    }
    let width = MINUTES_PER_DAY / slot_count;

    let mut conditions = vec![Condition::Unknown; slot_count];
    for entry in entries {
        let time = entry.timestamp();
        let minute = (time.hour() * 60 + time.minute()) as usize;
        conditions[minute / width] = entry.condition();
    }

    Ok(DailySummary {
        slots: conditions
            .into_iter()
            .enumerate()
            .map(|(i, condition)| SlotSummary::new(i * width, condition))
            .collect(),
    })
}

/// Counts over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTally {
    pub classified: usize,
    pub unclassifiable: usize,
    pub by_condition: BTreeMap<Condition, usize>,
}

impl ReportTally {
    pub fn total(&self) -> usize {
        self.classified + self.unclassifiable
    }
}

/// Classifies samples in order and keeps one outcome per sample.
#[derive(Debug, Clone)]
pub struct Reporter<'a> {
    classifier: Classifier<'a>,
    outcomes: Vec<SampleOutcome>,
}

impl<'a> Reporter<'a> {
    pub fn new(classifier: Classifier<'a>) -> Self {
        Self {
            classifier,
            outcomes: Vec::new(),
        }
    }

    /// Classify one sample and record the outcome.
    ///
    /// Inference errors are recorded as unclassifiable; configuration errors
    /// are returned and nothing is recorded.
    pub fn record(&mut self, sample: &Sample) -> Result<&SampleOutcome> {
        let outcome = match self.classifier.classify_sample(sample) {
            Ok(result) => SampleOutcome::Classified(result),
            Err(CanisError::Inference(e)) => {
                log::warn!(
                    "sample at {} is unclassifiable: {}",
                    sample.time.format("%H:%M"),
                    e
                );
                SampleOutcome::Unclassifiable {
                    timestamp: sample.time,
                    reason: e.to_string(),
                }
            }
            Err(e) => return Err(e),
        };
        self.outcomes.push(outcome);
        Ok(&self.outcomes[self.outcomes.len() - 1])
    }

    /// Record every sample, stopping at the first configuration error.
    pub fn record_all<'s, I>(&mut self, samples: I) -> Result<()>
    where
        I: IntoIterator<Item = &'s Sample>,
    {
        for sample in samples {
            self.record(sample)?;
        }
        Ok(())
    }

    pub fn outcomes(&self) -> &[SampleOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<SampleOutcome> {
        self.outcomes
    }

    /// Classified vs. unclassifiable counts and primary-condition histogram.
    pub fn tally(&self) -> ReportTally {
        let mut tally = ReportTally::default();
        for outcome in &self.outcomes {
            if outcome.is_classified() {
                tally.classified += 1;
            } else {
                tally.unclassifiable += 1;
            }
            *tally.by_condition.entry(outcome.condition()).or_insert(0) += 1;
        }
        tally
    }

    /// Daily summary of the outcomes recorded so far.
    pub fn daily_summary(&self, slot_count: usize) -> std::result::Result<DailySummary, ConfigurationError> {
        build_daily_summary(&self.outcomes, slot_count)
    }
}
