use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::error::AppError;
use crate::form::CreateEventForm;
use crate::middleware::AuthUser;
use crate::profile::Profile;
use crate::query::account::resolve_or_create_account;
use crate::query::event::{
    EVENT_TOPICS, EVENT_TYPES, EventDetail, EventSummary, create_event, get_event, list_events,
};
use crate::routes::AppState;
use crate::template::{Template, filters};

#[derive(askama::Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub user: Profile,
    pub events: Vec<EventSummary>,
}

#[derive(askama::Template)]
#[template(path = "event.html")]
pub struct EventTemplate {
    pub user: Profile,
    pub event: EventDetail,
}

#[derive(askama::Template)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub user: Profile,
    pub topics: &'static [(i64, &'static str)],
    pub types: &'static [(i64, &'static str)],
}

pub async fn list(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
) -> Result<Response, AppError> {
    let events = list_events(&app.pool).await?;

    Ok(template.render(EventsTemplate { user, events }))
}

pub async fn detail(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = id
        .parse::<i64>()
        .map_err(|_| AppError::InvalidEventId(id))?;

    let event = get_event(&app.pool, id)
        .await?
        .ok_or(AppError::EventNotFound(id))?;

    Ok(template.render(EventTemplate { user, event }))
}

pub async fn create_page(template: Template, AuthUser(user): AuthUser) -> impl IntoResponse {
    template.render(CreateTemplate {
        user,
        topics: EVENT_TOPICS,
        types: EVENT_TYPES,
    })
}

/// Stores the submitted event for the signed in user, creating their account
/// on first use, then shows the events list.
pub async fn create_action(
    template: Template,
    AuthUser(user): AuthUser,
    State(app): State<AppState>,
    Form(form): Form<CreateEventForm>,
) -> Result<Response, AppError> {
    let event = form.validate()?;
    let creator_id = resolve_or_create_account(&app.pool, &user).await?;
    let event = event.created_by(creator_id);
    let id = create_event(&app.pool, &event).await?;

    tracing::info!(event_id = id, creator_id, title = %event.title, "event created");

    let events = list_events(&app.pool).await?;

    Ok(template.render(EventsTemplate { user, events }))
}
