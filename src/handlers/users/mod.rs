mod deactivate;
mod get_review;
mod set_is_active;

use crate::StateTrait;
use axum::{
    routing::{get, post},
    Router,
};

/// Routes for users
///
/// POST /users/setIsActive
/// GET  /users/getReview?user_id=
/// POST /users/deactivateTeamMembers
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/setIsActive", post(set_is_active::set_is_active::<S>))
        .route("/getReview", get(get_review::get_review::<S>))
        .route(
            "/deactivateTeamMembers",
            post(deactivate::deactivate_team_members::<S>),
        )
}
