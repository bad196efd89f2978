mod add;
mod delete;
mod get;

use crate::StateTrait;
use axum::{
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use validator::Validate;

/// Routes for team management
///
/// POST   /team/add
/// GET    /team/get?team_name=
/// DELETE /team/delete?team_name=
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/add", post(add::add_team::<S>))
        .route("/get", get(get::get_team::<S>))
        .route("/delete", delete(delete::delete_team::<S>))
}

#[derive(Deserialize, Validate)]
pub struct TeamNameQuery {
    #[validate(length(min = 1))]
    team_name: String,
}
