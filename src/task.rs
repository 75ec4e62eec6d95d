use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Format due dates are written in.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

const ACCEPTED_FORMATS: [&str; 2] = [DATE_FORMAT, "%Y-%m-%d"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    #[serde(rename = "date", with = "due_date")]
    pub due_date: NaiveDate,
}

impl Task {
    pub fn new(text: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            text: text.into(),
            due_date,
        }
    }

    pub fn due_label(&self) -> String {
        format_due_date(self.due_date)
    }
}

pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a due date as entered by the user or read from storage.
pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| BoardError::InvalidDate(input.to_string()))
}

mod due_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_due_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_due_date(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_locale_format() {
        assert_eq!(parse_due_date("11/23/2019").unwrap(), date(2019, 11, 23));
    }

    #[test]
    fn test_parse_iso_format() {
        assert_eq!(parse_due_date("2019-11-23").unwrap(), date(2019, 11, 23));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_due_date("  03/04/2025 \n").unwrap(), date(2025, 3, 4));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_due_date("next tuesday"),
            Err(BoardError::InvalidDate(s)) if s == "next tuesday"
        ));
        assert!(parse_due_date("").is_err());
        assert!(parse_due_date("02/30/2025").is_err());
    }

    #[test]
    fn test_task_json_shape() {
        let task = Task::new("Walk the dog", date(2026, 10, 20));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Walk the dog", "date": "10/20/2026" })
        );
    }

    #[test]
    fn test_task_rejects_bad_date_in_json() {
        let result: std::result::Result<Task, _> =
            serde_json::from_str(r#"{"text":"x","date":"soon"}"#);
        assert!(result.is_err());
    }
}
