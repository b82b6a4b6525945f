use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "incomplete_left_limited_both")]
    IncompleteLeftLateralizationLimitedBoth,
    #[serde(rename = "incomplete_right_limited_both")]
    IncompleteRightLateralizationLimitedBoth,
    #[serde(rename = "intact_left_limited_left")]
    IntactLeftLateralizedLimitedLeft,
    #[serde(rename = "intact_right_limited_right")]
    IntactRightLateralizedLimitedRight,
    #[serde(rename = "functionally_left_no_limit")]
    FunctionallyLeftLateralizedNoLimit,
    #[serde(rename = "functionally_right_no_limit")]
    FunctionallyRightLateralizedNoLimit,
    #[serde(rename = "no_match")]
    NoMatch,
}

impl Label {
    /// Clinical wording shown to users and written to exports.
    pub fn description(&self) -> &'static str {
        match self {
            Label::IncompleteLeftLateralizationLimitedBoth => {
                "From Incomplete Left Lateralization: Limited Both (Left Potentially Very Limited)"
            }
            Label::IncompleteRightLateralizationLimitedBoth => {
                "From Incomplete Right Lateralized: Limited Both (Right Potentially Very Limited)"
            }
            Label::IntactLeftLateralizedLimitedLeft => {
                "From In-Tact Left Lateralized: Limited Left"
            }
            Label::IntactRightLateralizedLimitedRight => {
                "From In-Tact Right Lateralized: Limited Right"
            }
            Label::FunctionallyLeftLateralizedNoLimit => {
                "From Functionally Left Lateralized: No Limit"
            }
            Label::FunctionallyRightLateralizedNoLimit => {
                "From Functionally Right Lateralized: No Limit"
            }
            Label::NoMatch => "No Match",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub surname: String,
}

impl Subject {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
        }
    }
}

/// One row of battery input, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub test: String,
    pub left: f64,
    pub right: f64,
}

/// A classified reading not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub subject: Subject,
    pub date: NaiveDate,
    pub test: String,
    pub full_rom: Option<f64>,
    pub left: f64,
    pub right: f64,
    pub result: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: u64,
    pub name: String,
    pub surname: String,
    pub date: NaiveDate,
    pub test: String,
    pub full_rom: Option<f64>,
    pub left: f64,
    pub right: f64,
    pub result: Label,
}

impl Measurement {
    pub fn from_new(id: u64, new: NewMeasurement) -> Self {
        Self {
            id,
            name: new.subject.name,
            surname: new.subject.surname,
            date: new.date,
            test: new.test,
            full_rom: new.full_rom,
            left: new.left,
            right: new.right,
            result: new.result,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub date: Option<NaiveDate>,
}

impl SearchQuery {
    pub fn matches(&self, m: &Measurement) -> bool {
        contains_ignore_case(&m.name, self.name.as_deref())
            && contains_ignore_case(&m.surname, self.surname.as_deref())
            && self.date.is_none_or(|d| d == m.date)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
        _ => true,
    }
}

/// All measurements recorded for one subject on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub date: NaiveDate,
    pub name: String,
    pub surname: String,
    pub measurements: Vec<Measurement>,
}

impl Session {
    pub fn key(&self) -> String {
        format!("{} - {} {}", self.date, self.name, self.surname)
    }
}
