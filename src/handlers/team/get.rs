use super::TeamNameQuery;
use crate::{error, models::Team, store::TeamStore, Json, Query, Result, StateTrait};
use axum::extract::State;

pub async fn get_team<S: StateTrait>(
    State(state): State<S>,
    Query(query): Query<TeamNameQuery>,
) -> Result<Json<Team>> {
    let team = state
        .store()
        .find_team(&query.team_name)
        .await?
        .ok_or(error::TEAM_NOT_FOUND)?;

    Ok(Json(team))
}
