pub mod account;
pub mod event;

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const HUMAN_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

const HUMAN_TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

fn format_timestamp(timestamp: i64, format: &[BorrowedFormatItem<'_>]) -> String {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|date| date.format(format).ok())
        .unwrap_or_else(|| timestamp.to_string())
}

/// `Jan 02, 2006`
pub fn format_date(timestamp: i64) -> String {
    format_timestamp(timestamp, HUMAN_DATE_FORMAT)
}

/// `15:04`
pub fn format_time(timestamp: i64) -> String {
    format_timestamp(timestamp, HUMAN_TIME_FORMAT)
}
