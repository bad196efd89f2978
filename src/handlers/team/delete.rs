use super::TeamNameQuery;
use crate::{error, store::TeamStore, Query, Result, StateTrait};
use axum::{extract::State, http::StatusCode};

pub async fn delete_team<S: StateTrait>(
    State(state): State<S>,
    Query(query): Query<TeamNameQuery>,
) -> Result<StatusCode> {
    if !state.store().delete_team(&query.team_name).await? {
        return Err(error::TEAM_NOT_FOUND);
    }

    info!("team {} deleted", query.team_name);

    Ok(StatusCode::NO_CONTENT)
}
