//! Event creation form parsing.

use serde::Deserialize;
use thiserror::Error;
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::query::event::{NewEvent, topic_label, type_label};

/// Combined form value of a date field and a time field, e.g. `2006-01-02 15:04`.
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

const TITLE_MAX_LEN: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("`{0}` must be at most {1} characters")]
    TooLong(&'static str, usize),

    #[error("invalid {field} `{value}`, expected YYYY-MM-DD HH:MM")]
    InvalidDateTime { field: &'static str, value: String },

    #[error("event must not end before it starts")]
    EndBeforeStart,

    #[error("invalid {field} `{value}`")]
    InvalidCategory { field: &'static str, value: String },
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CreateEventForm {
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub description: String,
    pub event_topic: String,
    pub event_type: String,
    pub location: String,
}

/// Submission that passed every check and only lacks its creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEvent {
    pub title: String,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub description: String,
    pub event_topic: i64,
    pub event_type: i64,
    pub location: String,
}

impl ValidEvent {
    pub fn created_by(self, creator_id: i64) -> NewEvent {
        NewEvent {
            creator_id,
            title: self.title,
            start_timestamp: self.start_timestamp,
            end_timestamp: self.end_timestamp,
            description: self.description,
            event_topic: self.event_topic,
            event_type: self.event_type,
            location: self.location,
        }
    }
}

impl CreateEventForm {
    pub fn validate(self) -> Result<ValidEvent, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingField("title"));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(FormError::TooLong("title", TITLE_MAX_LEN));
        }

        let start = parse_date_time("start", &self.start_date, &self.start_time)?;
        let end = parse_date_time("end", &self.end_date, &self.end_time)?;
        if end < start {
            return Err(FormError::EndBeforeStart);
        }

        let event_topic = parse_category("event_topic", &self.event_topic, topic_label)?;
        let event_type = parse_category("event_type", &self.event_type, type_label)?;

        Ok(ValidEvent {
            title: title.to_owned(),
            start_timestamp: start.assume_utc().unix_timestamp(),
            end_timestamp: end.assume_utc().unix_timestamp(),
            description: self.description.trim().to_owned(),
            event_topic,
            event_type,
            location: self.location.trim().to_owned(),
        })
    }
}

fn parse_date_time(
    field: &'static str,
    date: &str,
    time: &str,
) -> Result<PrimitiveDateTime, FormError> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() {
        return Err(FormError::MissingField(if field == "start" {
            "start_date"
        } else {
            "end_date"
        }));
    }
    if time.is_empty() {
        return Err(FormError::MissingField(if field == "start" {
            "start_time"
        } else {
            "end_time"
        }));
    }

    let value = format!("{date} {time}");

    PrimitiveDateTime::parse(&value, DATE_TIME_FORMAT)
        .map_err(|_| FormError::InvalidDateTime { field, value })
}

fn parse_category(
    field: &'static str,
    value: &str,
    label: fn(i64) -> Option<&'static str>,
) -> Result<i64, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }

    value
        .parse::<i64>()
        .ok()
        .filter(|code| label(*code).is_some())
        .ok_or_else(|| FormError::InvalidCategory {
            field,
            value: value.to_owned(),
        })
}
