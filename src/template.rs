use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use std::{collections::HashMap, convert::Infallible};

pub(crate) mod filters {
    use crate::query::{format_date, format_time};

    /// `Jan 02, 2006`
    #[askama::filter_fn]
    pub fn date(value: &i64, _values: &dyn askama::Values) -> askama::Result<String> {
        Ok(format_date(*value))
    }

    /// `Jan 02, 2006 15:04`
    #[askama::filter_fn]
    pub fn date_time(value: &i64, _values: &dyn askama::Values) -> askama::Result<String> {
        Ok(format!("{} {}", format_date(*value), format_time(*value)))
    }
}

/// Page renderer, extracted per request.
pub struct Template {
    current_path: String,
}

impl Template {
    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("current_path", Box::new(self.current_path.to_owned()));

        template.render_with_values(&values)
    }

    /// Rendered page, or a 500 carrying the render error.
    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        match self.render_with_values(template) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, path = %self.current_path, "failed to render template");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template. Error: {err}"),
                )
                    .into_response()
            }
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Template {
            current_path: parts.uri.path().to_owned(),
        })
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;
