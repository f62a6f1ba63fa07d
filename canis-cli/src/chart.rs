// Canis CLI - Text rendering
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Plain-text charts for the terminal.

use canis::{Condition, DailySummary, LinguisticVariable, ReportTally};
use std::fmt::Write;

const BAR_UNIT: usize = 4;

/// One bar per slot, height proportional to the ordinal rank.
///
/// ```text
/// 08:00 | ############     | normal    #a6d301
/// ```
pub fn render_summary(summary: &DailySummary) -> String {
    let width = BAR_UNIT * Condition::Perfect.ordinal_rank() as usize;
    let mut out = String::new();
    for slot in summary.slots() {
        let bar = "#".repeat(BAR_UNIT * slot.ordinal_rank as usize);
        let _ = writeln!(
            out,
            "{} | {:<width$} | {:<9} {}",
            slot.slot,
            bar,
            slot.condition.as_str(),
            slot.colour,
            width = width
        );
    }
    out
}

/// Counts per condition, best first.
pub fn render_tally(tally: &ReportTally) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} samples, {} classified, {} unclassifiable",
        tally.total(),
        tally.classified,
        tally.unclassifiable
    );
    for condition in Condition::ALL {
        let count = tally.by_condition.get(&condition).copied().unwrap_or(0);
        let _ = writeln!(out, "  {:<9} {}", condition.as_str(), count);
    }
    out
}

/// Membership curves as CSV: the universe point, then one column per term.
///
/// With `max_points`, the universe is thinned to at most that many rows,
/// always keeping both ends.
pub fn render_curves(variable: &LinguisticVariable, max_points: Option<usize>) -> String {
    let curves = variable.curves();
    let points = variable.universe().points();

    let mut out = String::new();
    let _ = write!(out, "{}", variable.name());
    for curve in &curves {
        let _ = write!(out, ",{}", curve.term);
    }
    out.push('\n');

    for i in thinned_indices(points.len(), max_points) {
        let _ = write!(out, "{}", round4(points[i]));
        for curve in &curves {
            let _ = write!(out, ",{}", round4(curve.points[i].1));
        }
        out.push('\n');
    }
    out
}

fn thinned_indices(len: usize, max_points: Option<usize>) -> Vec<usize> {
    match max_points {
        Some(max) if max >= 2 && len > max => {
            let stride = (len - 1) as f64 / (max - 1) as f64;
            (0..max).map(|k| (k as f64 * stride).round() as usize).collect()
        }
        Some(1) if len > 1 => vec![0],
        _ => (0..len).collect(),
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
