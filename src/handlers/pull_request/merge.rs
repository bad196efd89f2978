use crate::{models::PullRequest, review, Json, Result, StateTrait, ValidatedJson};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1))]
    pull_request_id: String,
}

#[derive(Serialize)]
pub struct Response {
    pr: PullRequest,
}

pub async fn merge_pull_request<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<Request>,
) -> Result<Json<Response>> {
    let pr = review::merge_pull_request(state.store(), &request.pull_request_id).await?;

    Ok(Json(Response { pr }))
}
