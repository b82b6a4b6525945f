//! Lateralization rule engine.
//!
//! Rules are evaluated top to bottom and the first match wins. The table order
//! (severe, moderate, functional) is not the ascending threshold order, so a
//! value that satisfies several bands is always claimed by the earliest entry.

use crate::domain::model::Label;

/// Labels produced by one rule, picked by which side is the smaller one.
#[derive(Debug, Clone, Copy)]
struct LabelPair {
    left: Label,
    right: Label,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    name: &'static str,
    /// Band test for a single side, given `(full_rom, value)`.
    band: fn(f64, f64) -> bool,
    labels: LabelPair,
}

fn severe(full_rom: f64, value: f64) -> bool {
    value <= full_rom / 2.0
}

fn moderate(full_rom: f64, value: f64) -> bool {
    full_rom / 2.0 < value && value <= full_rom - 10.0
}

fn functional(full_rom: f64, value: f64) -> bool {
    value <= full_rom - 10.0
}

const RULES: [Rule; 3] = [
    Rule {
        name: "rule-1-severe",
        band: severe,
        labels: LabelPair {
            left: Label::IncompleteLeftLateralizationLimitedBoth,
            right: Label::IncompleteRightLateralizationLimitedBoth,
        },
    },
    Rule {
        name: "rule-3-moderate",
        band: moderate,
        labels: LabelPair {
            left: Label::IntactLeftLateralizedLimitedLeft,
            right: Label::IntactRightLateralizedLimitedRight,
        },
    },
    Rule {
        name: "rule-2-functional",
        band: functional,
        labels: LabelPair {
            left: Label::FunctionallyLeftLateralizedNoLimit,
            right: Label::FunctionallyRightLateralizedNoLimit,
        },
    },
];

/// Classify one left/right reading against the expected full range of motion.
///
/// A missing or zero `full_rom`, or a zero reading on either side, counts as
/// "not measured" and yields [`Label::NoMatch`].
pub fn classify(full_rom: Option<f64>, left: f64, right: f64) -> Label {
    let full_rom = match full_rom {
        Some(rom) if rom != 0.0 => rom,
        _ => return Label::NoMatch,
    };
    if left == 0.0 || right == 0.0 {
        return Label::NoMatch;
    }

    for rule in &RULES {
        if (rule.band)(full_rom, left) || (rule.band)(full_rom, right) {
            tracing::trace!(rule = rule.name, full_rom, left, right, "rule matched");
            return if left <= right {
                rule.labels.left
            } else {
                rule.labels.right
            };
        }
    }

    Label::NoMatch
}
