use axum::response::IntoResponse;

use crate::middleware::AuthUser;
use crate::profile::Profile;
use crate::template::Template;

#[derive(askama::Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: Profile,
}

pub async fn page(template: Template, AuthUser(user): AuthUser) -> impl IntoResponse {
    template.render(IndexTemplate { user })
}
