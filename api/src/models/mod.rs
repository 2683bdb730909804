use crate::common::errors::ApiError;
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A bookable service offered by the business.
///
/// Read-only reference data from the booking workflow's perspective:
/// fetched once per session and never mutated by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub price: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A single availability opening returned by the server for a
/// (service, date) query.
///
/// `datetime` is the machine-readable instant as the server sent it, which
/// may be a naive local timestamp; `time` is the display label
/// (e.g. "9:00 AM"). Slot sets are replaced wholesale on refetch, never
/// merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub datetime: String,
    pub time: String,
}

impl TimeSlot {
    /// Resolves the slot's timestamp to an unambiguous absolute instant.
    ///
    /// Timestamps that already carry an offset (or `Z`) are taken as-is.
    /// Naive timestamps are interpreted in the viewer's local timezone; a
    /// DST fold resolves to the earlier offset, and a nonexistent local
    /// time (spring-forward gap) is an error. A booking intent is never
    /// transmitted with a naive timestamp.
    pub fn resolve_instant(&self) -> Result<DateTime<Utc>, ApiError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.datetime) {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(&self.datetime, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&self.datetime, "%Y-%m-%dT%H:%M"))
            .map_err(|e| {
                ApiError::InvalidRequest(format!(
                    "Unparseable slot timestamp '{}': {e}",
                    self.datetime
                ))
            })?;

        match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
            LocalResult::None => Err(ApiError::InvalidRequest(format!(
                "Slot timestamp '{}' does not exist in the local timezone",
                self.datetime
            ))),
        }
    }
}

/// The finalized payload submitted to create an appointment.
///
/// Constructed only when the workflow has a complete selection and the
/// user has passed the confirmation gate. `start_time` is always an
/// absolute instant and serializes as RFC 3339 with a `Z` suffix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingIntent {
    pub service_id: i64,
    #[serde(serialize_with = "serialize_instant")]
    pub start_time: DateTime<Utc>,
}

impl BookingIntent {
    pub fn new(service_id: i64, start_time: DateTime<Utc>) -> Self {
        Self {
            service_id,
            start_time,
        }
    }
}

fn serialize_instant<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment as returned by the server.
///
/// Timestamps are kept as the server's ISO strings; the client displays
/// them but never recomputes scheduling from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    #[serde(default)]
    pub service_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Partial update for an existing appointment (status change or
/// reschedule). Absent fields are left untouched by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_instant"
    )]
    pub start_time: Option<DateTime<Utc>>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn reschedule(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start_time),
            ..Self::default()
        }
    }
}

fn serialize_optional_instant<S>(
    instant: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match instant {
        Some(instant) => serialize_instant(instant, serializer),
        None => serializer.serialize_none(),
    }
}
