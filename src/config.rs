//! Tunables for the lifecycle manager and the bundled date service.

/// Timestamp layouts accepted by `SystemDateService`, tried in order.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

/// Default half-width, in days, of the duplicate search window.
pub const DEFAULT_DUPLICATE_WINDOW_DAYS: i64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    /// Entries dated within this many days either side of a new entry's
    /// transaction date are considered for duplicate matching.
    pub duplicate_window_days: i64,
    /// Layouts handed to the date service when parsing caller-supplied dates.
    pub date_formats: Vec<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            duplicate_window_days: DEFAULT_DUPLICATE_WINDOW_DAYS,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl ManagerConfig {
    pub fn with_duplicate_window_days(mut self, days: i64) -> Self {
        self.duplicate_window_days = days;
        self
    }
}
