use crate::{review, Json, Result, StateTrait, ValidatedJson};
use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1))]
    team_name: String,
    user_ids: Vec<String>,
}

pub async fn deactivate_team_members<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<Request>,
) -> Result<Json<review::Deactivation>> {
    let mut rng = state.rng();

    let deactivation = review::deactivate_team_members(
        state.store(),
        &request.team_name,
        &request.user_ids,
        &mut rng,
    )
    .await?;

    Ok(Json(deactivation))
}
