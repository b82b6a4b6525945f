use crate::core::{
    Measurement, MeasurementRepository, NewMeasurement, Reading, Result, Session, Subject,
};
use crate::domain::{battery, rules};
use crate::utils::error::RomError;
use crate::utils::validation::validate_non_empty_string;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Parse a `"<test>=<left>,<right>"` reading as given on the command line.
pub fn parse_reading(input: &str) -> Result<Reading> {
    let invalid = |reason: &str| RomError::InvalidReading {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (test, values) = input
        .rsplit_once('=')
        .ok_or_else(|| invalid("expected '<test>=<left>,<right>'"))?;
    let (left, right) = values
        .split_once(',')
        .ok_or_else(|| invalid("expected two comma-separated values"))?;

    let test = battery::find(test).ok_or_else(|| RomError::UnknownTest {
        name: test.trim().to_string(),
    })?;
    let left: f64 = left
        .trim()
        .parse()
        .map_err(|_| invalid("left value is not a number"))?;
    let right: f64 = right
        .trim()
        .parse()
        .map_err(|_| invalid("right value is not a number"))?;

    Ok(Reading {
        test: test.name.to_string(),
        left,
        right,
    })
}

/// Classify a subject's readings against the whole battery.
///
/// Every battery test yields one row. Tests without a reading are recorded as
/// `0 / 0`, and tests with no expected full ROM are stored without one; both
/// classify as `NoMatch`.
pub fn classify_readings(
    subject: &Subject,
    date: NaiveDate,
    readings: &[Reading],
) -> Result<Vec<NewMeasurement>> {
    validate_non_empty_string("name", &subject.name)?;
    validate_non_empty_string("surname", &subject.surname)?;

    let mut seen = HashSet::new();
    for reading in readings {
        let test = battery::find(&reading.test).ok_or_else(|| RomError::UnknownTest {
            name: reading.test.clone(),
        })?;
        if !seen.insert(test.name) {
            return Err(RomError::ValidationError {
                message: format!("'{}' was given more than once", test.name),
            });
        }
    }

    let subject = Subject::new(subject.name.trim(), subject.surname.trim());
    let rows = battery::all()
        .iter()
        .map(|test| {
            let (left, right) = readings
                .iter()
                .find(|r| r.test.trim().eq_ignore_ascii_case(test.name))
                .map(|r| (r.left, r.right))
                .unwrap_or((0.0, 0.0));
            NewMeasurement {
                subject: subject.clone(),
                date,
                test: test.name.to_string(),
                full_rom: test.full_rom,
                left,
                right,
                result: rules::classify(test.full_rom, left, right),
            }
        })
        .collect();

    Ok(rows)
}

/// Classifies one subject's battery and persists it through a repository.
pub struct SessionRecorder<R: MeasurementRepository> {
    repository: R,
}

impl<R: MeasurementRepository> SessionRecorder<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn record(
        &self,
        subject: &Subject,
        date: NaiveDate,
        readings: &[Reading],
    ) -> Result<Vec<Measurement>> {
        let rows = classify_readings(subject, date, readings)?;
        tracing::debug!(
            "Classified {} rows for {} {} on {}",
            rows.len(),
            subject.name,
            subject.surname,
            date
        );
        self.repository.insert_many(rows).await
    }
}

/// Group measurements by (date, name, surname), keeping first-seen order.
/// Rows inside a session follow battery order.
pub fn group_sessions(measurements: Vec<Measurement>) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();

    for m in measurements {
        match sessions
            .iter_mut()
            .find(|s| s.date == m.date && s.name == m.name && s.surname == m.surname)
        {
            Some(session) => session.measurements.push(m),
            None => sessions.push(Session {
                date: m.date,
                name: m.name.clone(),
                surname: m.surname.clone(),
                measurements: vec![m],
            }),
        }
    }

    for session in &mut sessions {
        session
            .measurements
            .sort_by_key(|m| (battery::position(&m.test).unwrap_or(usize::MAX), m.id));
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Label;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn reading(test: &str, left: f64, right: f64) -> Reading {
        Reading {
            test: test.to_string(),
            left,
            right,
        }
    }

    #[test]
    fn test_parse_reading() {
        let r = parse_reading("hip ir = 30, 35.5").unwrap();
        assert_eq!(r, reading("Hip IR", 30.0, 35.5));

        let r = parse_reading("Ober's (Hip Adduction)=20,40").unwrap();
        assert_eq!(r.test, "Ober's (Hip Adduction)");
    }

    #[test]
    fn test_parse_reading_errors() {
        assert!(matches!(
            parse_reading("Hip IR 30 35"),
            Err(RomError::InvalidReading { .. })
        ));
        assert!(matches!(
            parse_reading("Hip IR=30"),
            Err(RomError::InvalidReading { .. })
        ));
        assert!(matches!(
            parse_reading("Hip IR=thirty,35"),
            Err(RomError::InvalidReading { .. })
        ));
        assert!(matches!(
            parse_reading("Elbow=30,35"),
            Err(RomError::UnknownTest { .. })
        ));
    }

    #[test]
    fn test_classify_readings_covers_whole_battery() {
        let subject = Subject::new("Ada", "Lovelace");
        let rows = classify_readings(
            &subject,
            date(),
            &[
                reading("Shoulder IR", 40.0, 80.0),
                reading("Foot Presentation", 10.0, 12.0),
            ],
        )
        .unwrap();

        assert_eq!(rows.len(), 12);

        let foot = rows.last().unwrap();
        assert_eq!(foot.test, "Foot Presentation");
        assert_eq!(foot.full_rom, None);
        assert_eq!((foot.left, foot.right), (10.0, 12.0));
        assert_eq!(foot.result, Label::NoMatch);

        let shoulder = &rows[0];
        assert_eq!(shoulder.test, "Shoulder IR");
        assert_eq!(shoulder.full_rom, Some(90.0));
        assert_eq!(shoulder.result, Label::IncompleteLeftLateralizationLimitedBoth);

        let untouched = rows.iter().find(|r| r.test == "Hip IR").unwrap();
        assert_eq!((untouched.left, untouched.right), (0.0, 0.0));
        assert_eq!(untouched.result, Label::NoMatch);
    }

    #[test]
    fn test_classify_readings_validation() {
        let blank = Subject::new("  ", "Lovelace");
        assert!(matches!(
            classify_readings(&blank, date(), &[]),
            Err(RomError::ValidationError { .. })
        ));

        let subject = Subject::new("Ada", "Lovelace");
        assert!(matches!(
            classify_readings(&subject, date(), &[reading("Elbow", 1.0, 2.0)]),
            Err(RomError::UnknownTest { .. })
        ));
        assert!(matches!(
            classify_readings(
                &subject,
                date(),
                &[reading("Hip IR", 1.0, 2.0), reading("hip ir", 3.0, 4.0)]
            ),
            Err(RomError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_group_sessions() {
        let m = |id: u64, name: &str, test: &str, day: u32| Measurement {
            id,
            name: name.to_string(),
            surname: "L".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            test: test.to_string(),
            full_rom: Some(90.0),
            left: 50.0,
            right: 60.0,
            result: Label::IntactLeftLateralizedLimitedLeft,
        };

        let sessions = group_sessions(vec![
            m(1, "Ada", "Hip IR", 1),
            m(2, "Grace", "Hip IR", 1),
            m(3, "Ada", "Shoulder IR", 1),
            m(4, "Ada", "Hip IR", 2),
        ]);

        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].key(), "2024-06-01 - Ada L");
        assert_eq!(
            sessions[0]
                .measurements
                .iter()
                .map(|m| m.test.as_str())
                .collect::<Vec<_>>(),
            vec!["Shoulder IR", "Hip IR"]
        );
        assert_eq!(sessions[1].name, "Grace");
        assert_eq!(sessions[2].date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }
}
