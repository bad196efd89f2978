use crate::{error, models::User, store::TeamStore, Json, Result, StateTrait, ValidatedJson};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1))]
    user_id: String,
    is_active: bool,
}

#[derive(Serialize)]
pub struct Response {
    user: User,
}

pub async fn set_is_active<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<Request>,
) -> Result<Json<Response>> {
    let user = state
        .store()
        .set_user_active(&request.user_id, request.is_active)
        .await?
        .ok_or(error::USER_NOT_FOUND)?;

    info!("user {} is_active set to {}", user.user_id, user.is_active);

    Ok(Json(Response { user }))
}
