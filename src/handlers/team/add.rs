use crate::{
    error,
    models::Team,
    store::TeamStore,
    Json, Result, StateTrait, ValidatedJson,
};
use axum::{extract::State, http::StatusCode};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Serialize)]
pub struct Response {
    team: Team,
}

pub async fn add_team<S: StateTrait>(
    State(state): State<S>,
    ValidatedJson(request): ValidatedJson<Team>,
) -> Result<(StatusCode, Json<Response>)> {
    let mut seen = HashSet::with_capacity(request.members.len());
    if let Some(member) = request
        .members
        .iter()
        .find(|member| !seen.insert(member.user_id.as_str()))
    {
        return Err(error::DUPLICATE_MEMBER.with_message(format!(
            "user {} is listed more than once",
            member.user_id
        )));
    }

    let team = state.store().create_team(&request).await?;

    info!(
        "team {} created with {} members",
        team.team_name,
        team.members.len()
    );

    Ok((StatusCode::CREATED, Json(Response { team })))
}
