use crate::{review, Json, Result, StateTrait, ValidatedJson};
use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1))]
    pull_request_id: String,
    #[validate(length(min = 1))]
    old_user_id: String,
}

pub async fn reassign_reviewer<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<Request>,
) -> Result<Json<review::Reassigned>> {
    let mut rng = state.rng();

    let reassigned = review::reassign_reviewer(
        state.store(),
        &request.pull_request_id,
        &request.old_user_id,
        &mut rng,
    )
    .await?;

    Ok(Json(reassigned))
}
