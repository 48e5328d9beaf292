//! Appointment domain model.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::record::{Record, Value, ValueKind};
use crate::domain::errors::{DomainError, FieldError};

/// A scheduled meeting between an agent and a client, optionally at a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Storage-assigned id.
    pub id: i64,
    /// Agent attending.
    pub agent_id: i64,
    /// Client attending.
    pub client_id: i64,
    /// Property being viewed, if any.
    pub property_id: Option<i64>,
    /// Day of the meeting.
    pub appointment_date: NaiveDate,
    /// Start time, minute precision.
    pub appointment_time: NaiveTime,
    /// Free-text reason; may be empty.
    pub purpose: String,
}

impl TryFrom<Record> for Appointment {
    type Error = DomainError;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.integer("appointment_id")?,
            agent_id: record.integer("agent_id")?,
            client_id: record.integer("client_id")?,
            property_id: record.opt_integer("property_id")?,
            appointment_date: record.date("appointment_date")?,
            appointment_time: record.time("appointment_time")?,
            purpose: record.opt_text("purpose")?.unwrap_or_default(),
        })
    }
}

/// Booking request as received from a caller. Date and time arrive as text
/// (`YYYY-MM-DD`, `HH:MM`) and are validated before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    /// Agent to meet.
    pub agent_id: i64,
    /// Client booking the meeting.
    pub client_id: i64,
    /// Property to view, if any.
    pub property_id: Option<i64>,
    /// `YYYY-MM-DD`.
    pub appointment_date: String,
    /// `HH:MM`, 24-hour.
    pub appointment_time: String,
    /// Trimmed before storing.
    pub purpose: String,
}

impl NewAppointment {
    /// Column values for insertion, or every field that failed to parse.
    pub fn to_record(&self) -> Result<Record, Vec<FieldError>> {
        let mut errors = Vec::new();
        let date = parse_field("appointment_date", &self.appointment_date, ValueKind::Date, "YYYY-MM-DD", &mut errors);
        let time = parse_field("appointment_time", &self.appointment_time, ValueKind::Time, "HH:MM", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Record::new()
            .with("agent_id", self.agent_id)
            .with("client_id", self.client_id)
            .with("property_id", self.property_id)
            .with("appointment_date", date)
            .with("appointment_time", time)
            .with("purpose", self.purpose.trim()))
    }
}

fn parse_field(
    field: &str,
    raw: &str,
    kind: ValueKind,
    format: &str,
    errors: &mut Vec<FieldError>,
) -> Value {
    if raw.trim().is_empty() {
        errors.push(FieldError::missing(field));
        return Value::Null;
    }
    Value::from(raw).coerce(kind).unwrap_or_else(|| {
        errors.push(FieldError::new(field, format!("must be formatted as {format}")));
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(date: &str, time: &str) -> NewAppointment {
        NewAppointment {
            agent_id: 1,
            client_id: 2,
            property_id: None,
            appointment_date: date.to_string(),
            appointment_time: time.to_string(),
            purpose: " Showing ".to_string(),
        }
    }

    #[test]
    fn test_to_record_parses_date_and_time() {
        let record = booking("2024-06-01", "09:30").to_record().unwrap();
        assert_eq!(
            record.date("appointment_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(
            record.time("appointment_time").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(record.text("purpose").unwrap(), "Showing");
        assert_eq!(record.get("property_id"), Some(&Value::Null));
    }

    #[test]
    fn test_to_record_reports_both_fields() {
        let errors = booking("June 1st", "").to_record().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "appointment_date");
        assert_eq!(errors[1], FieldError::missing("appointment_time"));
    }
}
