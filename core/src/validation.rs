//! Validation of administrator event forms.
//!
//! The admin API accepts loosely typed JSON (prices and ticket counts may
//! arrive as numbers or strings) and turns it into an [`EventDraft`].

use crate::types::EventDraft;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Image used when an event has no usable image URL.
pub const PLACEHOLDER_IMAGE: &str = "/event-placeholder.jpg";

/// Reasons an event form is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),

    /// A field is present but cannot be interpreted.
    #[error("Invalid value for {field}: {reason}")]
    InvalidField {
        /// Field name as sent by the client
        field: &'static str,
        /// What was wrong
        reason: String,
    },
}

/// A number that clients may send either as JSON number or as string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    /// JSON number
    Number(f64),
    /// Numeric string such as `"25.50"`
    Text(String),
}

impl NumberInput {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Raw event form as posted by the admin UI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    /// Title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Venue
    pub venue: Option<String>,
    /// Category
    pub category: Option<String>,
    /// RFC 3339 timestamp, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`
    pub date: Option<String>,
    /// Ticket price
    pub price: Option<NumberInput>,
    /// Ticket count
    pub available_tickets: Option<NumberInput>,
    /// Image URL
    pub image_url: Option<String>,
}

fn required(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse the date formats produced by HTML date and datetime inputs.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolve the image to store.
///
/// A blank or non-absolute URL falls back to `fallback` (the event's current
/// image when editing) and then to [`PLACEHOLDER_IMAGE`].
#[must_use]
pub fn resolve_image_url(candidate: Option<&str>, fallback: Option<&str>) -> String {
    let fallback = || fallback.unwrap_or(PLACEHOLDER_IMAGE).to_string();
    match candidate.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) if url::Url::parse(c).is_ok() => c.to_string(),
        _ => fallback(),
    }
}

impl EventForm {
    /// Validate the form.
    ///
    /// `existing_image` is the image of the event being edited, used when the
    /// submitted URL is blank or invalid.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingFields`] when a required field is absent
    /// - [`ValidationError::InvalidField`] when date, price or ticket count
    ///   cannot be parsed, or the ticket count is below one
    pub fn into_draft(self, existing_image: Option<&str>) -> Result<EventDraft, ValidationError> {
        let title = required(self.title.as_ref());
        let description = required(self.description.as_ref());
        let venue = required(self.venue.as_ref());
        let date = required(self.date.as_ref());

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if description.is_none() {
            missing.push("description");
        }
        if venue.is_none() {
            missing.push("venue");
        }
        if date.is_none() {
            missing.push("date");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.available_tickets.is_none() {
            missing.push("availableTickets");
        }

        let (Some(title), Some(description), Some(venue), Some(date), Some(price), Some(tickets)) = (
            title,
            description,
            venue,
            date,
            self.price,
            self.available_tickets,
        ) else {
            return Err(ValidationError::MissingFields(missing));
        };

        let date = parse_date(&date).ok_or_else(|| ValidationError::InvalidField {
            field: "date",
            reason: format!("unrecognised date '{date}'"),
        })?;

        let price = price
            .as_f64()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| ValidationError::InvalidField {
                field: "price",
                reason: "must be a non-negative number".to_string(),
            })?;

        #[allow(clippy::cast_possible_truncation)]
        let available_tickets = tickets
            .as_f64()
            .filter(|t| t.is_finite() && *t >= 1.0 && *t <= f64::from(i32::MAX))
            .map(|t| t.trunc() as i32)
            .ok_or_else(|| ValidationError::InvalidField {
                field: "availableTickets",
                reason: "must be a whole number of at least 1".to_string(),
            })?;

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(EventDraft {
            title,
            description,
            venue,
            category,
            date,
            price,
            available_tickets,
            image_url: resolve_image_url(self.image_url.as_deref(), existing_image),
        })
    }
}
