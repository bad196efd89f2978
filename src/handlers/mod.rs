mod pull_request;
mod team;
mod users;

use crate::{state::StateTrait, store::Store};
use axum::{extract::State, http::StatusCode, routing::get, Router};

pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .nest("/team", team::routes::<S>())
        .nest("/users", users::routes::<S>())
        .nest("/pullRequest", pull_request::routes::<S>())
        .route("/livez", get(liveness::<S>))
        .route("/readyz", get(|| async {}))
}

async fn liveness<S: StateTrait>(State(state): State<S>) -> StatusCode {
    if state.store().ping().await.is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    StatusCode::OK
}
