use crate::{
    models::{NewPullRequest, PullRequest},
    review, Json, Result, StateTrait, ValidatedJson,
};
use axum::{extract::State, http::StatusCode};
use serde::Serialize;

#[derive(Serialize)]
pub struct Response {
    pr: PullRequest,
}

pub async fn create_pull_request<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<NewPullRequest>,
) -> Result<(StatusCode, Json<Response>)> {
    let mut rng = state.rng();

    let pr = review::create_pull_request(state.store(), &request, &mut rng).await?;

    Ok((StatusCode::CREATED, Json(Response { pr })))
}
