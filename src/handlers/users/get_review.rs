use crate::{
    error,
    models::PullRequestShort,
    store::{ReviewerStore, TeamStore},
    Json, Query, Result, StateTrait,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Params {
    #[validate(length(min = 1))]
    user_id: String,
}

#[derive(Serialize)]
pub struct Response {
    user_id: String,
    pull_requests: Vec<PullRequestShort>,
}

pub async fn get_review<S: StateTrait>(
    State(state): State<S>,
    Query(params): Query<Params>,
) -> Result<Json<Response>> {
    let user = state
        .store()
        .find_user(&params.user_id)
        .await?
        .ok_or(error::USER_NOT_FOUND)?;

    let pull_requests = state
        .store()
        .pull_requests_by_reviewer(&user.user_id)
        .await?;

    Ok(Json(Response {
        user_id: user.user_id,
        pull_requests,
    }))
}
