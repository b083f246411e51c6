use crate::config::DEFAULT_DATE_FORMATS;
use crate::domain::ports::DateService;
use crate::error::{PaymentError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Date service backed by the system clock (UTC).
#[derive(Debug, Clone)]
pub struct SystemDateService {
    formats: Vec<String>,
}

impl SystemDateService {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }
}

impl Default for SystemDateService {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl DateService for SystemDateService {
    fn application_timestamp(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime> {
        parse_with_formats(value, &self.formats)
    }
}

/// Date service frozen at a single instant. Used where results must not
/// depend on when they run.
#[derive(Debug, Clone)]
pub struct FixedDateService {
    now: NaiveDateTime,
    formats: Vec<String>,
}

impl FixedDateService {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl DateService for FixedDateService {
    fn application_timestamp(&self) -> NaiveDateTime {
        self.now
    }

    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime> {
        parse_with_formats(value, &self.formats)
    }
}

/// Tries each layout in turn. Date-only layouts resolve to midnight.
pub fn parse_with_formats(value: &str, formats: &[String]) -> Result<NaiveDateTime> {
    let value = value.trim();
    for format in formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(PaymentError::ParseError(format!(
        "'{value}' matches none of the accepted date formats"
    )))
}
