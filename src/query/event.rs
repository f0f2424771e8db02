use protestpulse_db::table::Event;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

pub const EVENT_TOPICS: &[(i64, &str)] = &[
    (1, "Environment"),
    (2, "Civil Rights"),
    (3, "Immigration"),
    (4, "Labor"),
    (5, "Education"),
    (6, "Health Care"),
    (7, "Housing"),
    (8, "Other"),
];

pub const EVENT_TYPES: &[(i64, &str)] = &[
    (1, "March"),
    (2, "Rally"),
    (3, "Town Hall"),
    (4, "Phone Bank"),
    (5, "Canvassing"),
    (6, "Workshop"),
    (7, "Other"),
];

fn label(codes: &'static [(i64, &'static str)], code: i64) -> Option<&'static str> {
    codes
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, name)| *name)
}

pub fn topic_label(code: i64) -> Option<&'static str> {
    label(EVENT_TOPICS, code)
}

pub fn type_label(code: i64) -> Option<&'static str> {
    label(EVENT_TYPES, code)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub creator_id: i64,
    pub title: String,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub description: String,
    pub event_topic: i64,
    pub event_type: i64,
    pub location: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventSummary {
    pub id: i64,
    pub title: String,
    pub start_timestamp: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventDetail {
    pub title: String,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub description: String,
    pub event_type: i64,
    pub event_topic: i64,
    pub location: String,
}

impl EventDetail {
    pub fn topic(&self) -> String {
        topic_label(self.event_topic)
            .map(str::to_owned)
            .unwrap_or_else(|| self.event_topic.to_string())
    }

    pub fn kind(&self) -> String {
        type_label(self.event_type)
            .map(str::to_owned)
            .unwrap_or_else(|| self.event_type.to_string())
    }
}

pub async fn create_event(pool: &SqlitePool, event: &NewEvent) -> Result<i64, sqlx::Error> {
    let statement = Query::insert()
        .into_table(Event::Table)
        .columns([
            Event::CreatorId,
            Event::Title,
            Event::StartTimestamp,
            Event::EndTimestamp,
            Event::Description,
            Event::EventTopic,
            Event::EventType,
            Event::Location,
            Event::Stars,
        ])
        .values_panic([
            event.creator_id.into(),
            event.title.to_owned().into(),
            event.start_timestamp.into(),
            event.end_timestamp.into(),
            event.description.to_owned().into(),
            event.event_topic.into(),
            event.event_type.into(),
            event.location.to_owned().into(),
            0.into(),
        ])
        .returning_col(Event::Id)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let (id,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(id)
}

/// Every event, earliest start first.
pub async fn list_events(pool: &SqlitePool) -> Result<Vec<EventSummary>, sqlx::Error> {
    let statement = Query::select()
        .columns([Event::Id, Event::Title, Event::StartTimestamp])
        .from(Event::Table)
        .order_by(Event::StartTimestamp, Order::Asc)
        .order_by(Event::Id, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_as_with::<_, EventSummary, _>(&sql, values)
        .fetch_all(pool)
        .await
}

pub async fn get_event(pool: &SqlitePool, id: i64) -> Result<Option<EventDetail>, sqlx::Error> {
    let statement = Query::select()
        .columns([
            Event::Title,
            Event::StartTimestamp,
            Event::EndTimestamp,
            Event::Description,
            Event::EventType,
            Event::EventTopic,
            Event::Location,
        ])
        .from(Event::Table)
        .and_where(Expr::col(Event::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_as_with::<_, EventDetail, _>(&sql, values)
        .fetch_optional(pool)
        .await
}
