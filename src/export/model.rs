// src/export/model.rs

use crate::models::clock_event::ClockEvent;
use crate::models::daily_total::{DailyTotal, StudentDailyTotal};
use crate::models::user::User;
use crate::utils::formatting::format_duration;
use chrono_tz::Tz;
use serde::Serialize;

/// Flat row for daily total exports.
#[derive(Serialize, Clone, Debug)]
pub struct TotalExport {
    pub student_code: String,
    pub day: String,
    pub total_seconds: i64,
    pub total: String,
}

impl TotalExport {
    pub fn from_total(user: &User, t: &DailyTotal) -> Self {
        Self {
            student_code: user.student_code.clone(),
            day: t.day.format("%Y-%m-%d").to_string(),
            total_seconds: t.total_seconds,
            total: format_duration(t.total_seconds),
        }
    }

    pub fn from_student_total(t: &StudentDailyTotal) -> Self {
        Self {
            student_code: t.student_code.clone(),
            day: t.total.day.format("%Y-%m-%d").to_string(),
            total_seconds: t.total.total_seconds,
            total: format_duration(t.total.total_seconds),
        }
    }
}

/// Flat row for clock event exports.
#[derive(Serialize, Clone, Debug)]
pub struct EventExport {
    pub id: i64,
    pub student_code: String,
    pub kind: String,
    pub recorded_at: String,
    pub local_time: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub accuracy: Option<f64>,
    pub source: String,
}

impl EventExport {
    pub fn from_event(user: &User, ev: &ClockEvent, tz: &Tz) -> Self {
        Self {
            id: ev.id,
            student_code: user.student_code.clone(),
            kind: ev.kind.to_db_str().to_string(),
            recorded_at: ev.recorded_at_str(),
            local_time: ev
                .recorded_at
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            lat: ev.coords.map(|c| c.lat),
            lng: ev.coords.map(|c| c.lng),
            accuracy: ev.coords.and_then(|c| c.accuracy),
            source: ev.source.clone(),
        }
    }
}
