use chrono::NaiveDate;
use serde::Serialize;

/// Accumulated on-campus seconds for one user on one reference-timezone day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub user_id: i64,
    pub day: NaiveDate,
    pub total_seconds: i64,
}

/// A daily total joined with the student it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDailyTotal {
    pub student_code: String,
    pub full_name: String,
    pub total: DailyTotal,
}

/// Portion of a closed interval that falls on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySlice {
    pub day: NaiveDate,
    pub seconds: i64,
}

impl DaySlice {
    pub fn day_str(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }
}
