use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;

/// Accepted calendar window for entry dates.
const DATE_MIN: (i32, u32, u32) = (2000, 1, 1);
const DATE_MAX: (i32, u32, u32) = (2100, 12, 31);

const DESCRIPTION_MAX: usize = 10_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub hour_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub name: String,
    pub client_id: i64,
}

/// Create payload. The hour rate is not accepted here: it is snapshotted from
/// the user at creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryInput {
    pub user_id: i64,
    pub project_id: i64,
    pub entry_date: NaiveDate,
    pub hours: i32,
    pub description: String,
}

/// Update payload. The user, project and rate snapshot of an entry are fixed
/// at creation and deliberately absent here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryUpdate {
    pub entry_date: NaiveDate,
    pub hours: i32,
    pub description: String,
}

impl UserInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_name("name", &self.name);
        errors.check_hour_rate("hourRate", self.hour_rate);
        errors.finish()
    }
}

impl ClientInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_name("name", &self.name);
        errors.finish()
    }
}

impl ProjectInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_name("name", &self.name);
        errors.check_reference("clientId", self.client_id);
        errors.finish()
    }
}

impl TimeEntryInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_reference("userId", self.user_id);
        errors.check_reference("projectId", self.project_id);
        errors.check_entry_date("entryDate", self.entry_date);
        errors.check_hours("hours", self.hours);
        errors.check_description("description", &self.description);
        errors.finish()
    }
}

impl TimeEntryUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.check_entry_date("entryDate", self.entry_date);
        errors.check_hours("hours", self.hours);
        errors.check_description("description", &self.description);
        errors.finish()
    }
}

/// Accumulates per-field messages so a response reports every violation at
/// once rather than the first one hit.
struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    fn new() -> Self {
        Self(HashMap::new())
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    fn check_name(&mut self, field: &str, value: &str) {
        let len = value.chars().count();
        if len == 0 || len > 100 {
            self.push(field, "must be between 1 and 100 characters");
        }
    }

    fn check_hour_rate(&mut self, field: &str, rate: Decimal) {
        if rate <= Decimal::ZERO || rate >= Decimal::from(1000) {
            self.push(field, "must be greater than 0 and less than 1000");
        }
    }

    fn check_reference(&mut self, field: &str, id: i64) {
        if id < 1 {
            self.push(field, "must reference an existing record");
        }
    }

    fn check_hours(&mut self, field: &str, hours: i32) {
        if !(1..=24).contains(&hours) {
            self.push(field, "must be between 1 and 24");
        }
    }

    fn check_entry_date(&mut self, field: &str, date: NaiveDate) {
        let min = NaiveDate::from_ymd_opt(DATE_MIN.0, DATE_MIN.1, DATE_MIN.2)
            .expect("valid window bound");
        let max = NaiveDate::from_ymd_opt(DATE_MAX.0, DATE_MAX.1, DATE_MAX.2)
            .expect("valid window bound");
        if date < min || date > max {
            self.push(field, "must fall between 2000-01-01 and 2100-12-31");
        }
    }

    fn check_description(&mut self, field: &str, value: &str) {
        let len = value.chars().count();
        if len == 0 || len > DESCRIPTION_MAX {
            self.push(field, "must be between 1 and 10000 characters");
        }
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_failed(
                "one or more fields are invalid",
                self.0,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_user_input_bounds() {
        let ok = UserInput {
            name: "Ann".to_string(),
            hour_rate: Decimal::from(25),
        };
        assert!(ok.validate().is_ok());

        let empty_name = UserInput {
            name: String::new(),
            ..ok.clone()
        };
        assert!(empty_name.validate().is_err());

        let long_name = UserInput {
            name: "x".repeat(101),
            ..ok.clone()
        };
        assert!(long_name.validate().is_err());

        // The rate window is exclusive at both ends.
        for rate in [Decimal::ZERO, Decimal::from(1000), Decimal::from(-5)] {
            let bad = UserInput {
                hour_rate: rate,
                ..ok.clone()
            };
            assert!(bad.validate().is_err(), "rate {rate} should be rejected");
        }
        let edge = UserInput {
            hour_rate: Decimal::new(99999, 2), // 999.99
            ..ok
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_project_input_requires_client_reference() {
        let bad = ProjectInput {
            name: "Website".to_string(),
            client_id: 0,
        };
        let err = bad.validate().unwrap_err();
        let body = err.problem_body(None);
        assert!(body["errors"]["clientId"].is_string());
    }

    #[test]
    fn test_time_entry_hours_and_date_window() {
        let ok = TimeEntryInput {
            user_id: 1,
            project_id: 1,
            entry_date: date(2026, 8, 7),
            hours: 8,
            description: "worked".to_string(),
        };
        assert!(ok.validate().is_ok());

        for hours in [0, 25, -3] {
            let bad = TimeEntryInput { hours, ..ok.clone() };
            assert!(bad.validate().is_err(), "hours {hours} should be rejected");
        }
        for hours in [1, 24] {
            let edge = TimeEntryInput { hours, ..ok.clone() };
            assert!(edge.validate().is_ok(), "hours {hours} should be accepted");
        }

        let too_early = TimeEntryInput {
            entry_date: date(1999, 12, 31),
            ..ok.clone()
        };
        assert!(too_early.validate().is_err());

        let too_long = TimeEntryInput {
            description: "x".repeat(10_001),
            ..ok
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_violations_are_reported_together() {
        let bad = TimeEntryInput {
            user_id: 0,
            project_id: 0,
            entry_date: date(1990, 1, 1),
            hours: 0,
            description: String::new(),
        };
        let err = bad.validate().unwrap_err();
        let body = err.problem_body(None);
        assert_eq!(body["errors"].as_object().unwrap().len(), 5);
    }
}
