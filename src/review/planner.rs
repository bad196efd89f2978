//! Reviewer replacement planning for bulk deactivation.
//!
//! The plan is computed from reads only. Nothing is written unless every
//! affected pull request keeps at least one reviewer.

use super::selector::select_reviewers;
use crate::{
    error,
    models::{PullRequest, Reassignment, Team, TeamMember},
    store::ReviewerStore,
    Result,
};
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeactivationPlan {
    /// Requested ids with duplicates removed, in request order.
    pub user_ids: Vec<String>,
    pub reassignments: Vec<Reassignment>,
}

pub async fn plan_deactivation<S, R>(
    store: &S,
    team: &Team,
    user_ids: &[String],
    rng: &mut R,
) -> Result<DeactivationPlan>
where
    S: ReviewerStore + Sync,
    R: Rng + Send + ?Sized,
{
    if user_ids.is_empty() {
        return Err(error::EMPTY_DEACTIVATION);
    }

    let mut seen = HashSet::with_capacity(user_ids.len());
    let user_ids: Vec<String> = user_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    for user_id in &user_ids {
        if !team.members.iter().any(|member| &member.user_id == user_id) {
            return Err(error::NOT_A_TEAM_MEMBER.with_message(format!(
                "user {} is not a member of team {}",
                user_id, team.team_name
            )));
        }
    }

    if user_ids.len() >= team.members.len() {
        return Err(error::DEACTIVATE_ALL_MEMBERS);
    }

    let mut affected = BTreeMap::new();
    for user_id in &user_ids {
        for pull_request in store.open_pull_requests_by_reviewer(user_id).await? {
            affected
                .entry(pull_request.pull_request_id.clone())
                .or_insert(pull_request);
        }
    }

    let deactivated: HashSet<&str> = user_ids.iter().map(String::as_str).collect();
    let available: Vec<TeamMember> = team
        .members
        .iter()
        .filter(|member| !deactivated.contains(member.user_id.as_str()))
        .cloned()
        .collect();

    let mut reassignments = Vec::new();
    for pull_request in affected.values() {
        reassignments.extend(plan_pull_request(
            pull_request,
            &deactivated,
            &available,
            rng,
        )?);
    }

    debug!(
        "planned {} reassignments over {} pull requests",
        reassignments.len(),
        affected.len()
    );

    Ok(DeactivationPlan {
        user_ids,
        reassignments,
    })
}

fn plan_pull_request<R: Rng + ?Sized>(
    pull_request: &PullRequest,
    deactivated: &HashSet<&str>,
    available: &[TeamMember],
    rng: &mut R,
) -> Result<Vec<Reassignment>> {
    let to_replace: Vec<&String> = pull_request
        .assigned_reviewers
        .iter()
        .filter(|id| deactivated.contains(id.as_str()))
        .collect();

    if to_replace.is_empty() {
        return Ok(Vec::new());
    }

    let eligible: Vec<TeamMember> = available
        .iter()
        .filter(|member| !pull_request.assigned_reviewers.contains(&member.user_id))
        .cloned()
        .collect();

    let mut candidates = select_reviewers(
        &eligible,
        &pull_request.author_id,
        to_replace.len(),
        rng,
    )
    .into_iter();

    let plan: Vec<Reassignment> = to_replace
        .into_iter()
        .map(|old_reviewer_id| Reassignment {
            pull_request_id: pull_request.pull_request_id.clone(),
            old_reviewer_id: old_reviewer_id.clone(),
            new_reviewer_id: candidates.next(),
        })
        .collect();

    let replaced = plan
        .iter()
        .filter(|step| step.new_reviewer_id.is_some())
        .count();
    let final_count = pull_request.assigned_reviewers.len() - plan.len() + replaced;

    if final_count == 0 {
        return Err(error::NO_CANDIDATE.with_message(format!(
            "pull request {} would be left without reviewers",
            pull_request.pull_request_id
        )));
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::NewPullRequest,
        store::{MemoryStore, PullRequestStore, TeamStore},
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn member(user_id: &str) -> TeamMember {
        TeamMember {
            user_id: user_id.to_owned(),
            username: user_id.to_owned(),
            is_active: true,
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|&id| id.to_owned()).collect()
    }

    async fn team_with(store: &MemoryStore, members: &[&str]) -> Team {
        store
            .create_team(&Team {
                team_name: "backend".to_owned(),
                members: members.iter().map(|&id| member(id)).collect(),
            })
            .await
            .unwrap()
    }

    async fn open_pr(store: &MemoryStore, id: &str, author_id: &str, reviewers: &[&str]) {
        store
            .create_pull_request(
                &NewPullRequest {
                    pull_request_id: id.to_owned(),
                    pull_request_name: id.to_owned(),
                    author_id: author_id.to_owned(),
                },
                &ids(reviewers),
                reviewers.len() < 2,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn replaces_with_the_only_free_member() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "david"]).await;
        open_pr(&store, "pr-1", "alice", &["bob"]).await;

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = plan_deactivation(&store, &team, &ids(&["bob"]), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            plan.reassignments,
            vec![Reassignment {
                pull_request_id: "pr-1".to_owned(),
                old_reviewer_id: "bob".to_owned(),
                new_reviewer_id: Some("david".to_owned()),
            }]
        );
    }

    #[tokio::test]
    async fn free_members_always_replace_a_deactivated_reviewer() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie", "david", "erin"]).await;
        open_pr(&store, "pr-7", "alice", &["bob", "charlie"]).await;

        for seed in 0..300 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let plan = plan_deactivation(&store, &team, &ids(&["bob"]), &mut rng)
                .await
                .unwrap();

            assert_eq!(plan.reassignments.len(), 1);
            let replacement = plan.reassignments[0].new_reviewer_id.as_deref();
            assert!(
                matches!(replacement, Some("david" | "erin")),
                "seed {}: bob replaced by {:?}",
                seed,
                replacement
            );
        }
    }

    #[tokio::test]
    async fn removes_reviewer_when_others_remain() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie"]).await;
        open_pr(&store, "pr-2", "alice", &["bob", "charlie"]).await;

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let plan = plan_deactivation(&store, &team, &ids(&["bob"]), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            plan.reassignments,
            vec![Reassignment {
                pull_request_id: "pr-2".to_owned(),
                old_reviewer_id: "bob".to_owned(),
                new_reviewer_id: None,
            }]
        );
    }

    #[tokio::test]
    async fn pull_request_reviewed_by_two_deactivated_users_is_planned_once() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie", "david"]).await;
        open_pr(&store, "pr-3", "alice", &["bob", "charlie"]).await;

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plan = plan_deactivation(&store, &team, &ids(&["bob", "charlie"]), &mut rng)
            .await
            .unwrap();

        assert_eq!(
            plan.reassignments,
            vec![
                Reassignment {
                    pull_request_id: "pr-3".to_owned(),
                    old_reviewer_id: "bob".to_owned(),
                    new_reviewer_id: Some("david".to_owned()),
                },
                Reassignment {
                    pull_request_id: "pr-3".to_owned(),
                    old_reviewer_id: "charlie".to_owned(),
                    new_reviewer_id: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn starving_a_pull_request_fails_the_whole_plan() {
        let store = MemoryStore::new();
        team_with(&store, &["alice", "bob", "charlie", "david"]).await;
        open_pr(&store, "pr-4", "alice", &["bob", "david"]).await;
        open_pr(&store, "pr-5", "alice", &["bob", "charlie"]).await;
        store.set_user_active("david", false).await.unwrap();
        let team = store.find_team("backend").await.unwrap().unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let error = plan_deactivation(&store, &team, &ids(&["bob", "charlie"]), &mut rng)
            .await
            .unwrap_err();

        assert_eq!(error.code(), "NO_CANDIDATE");
        assert!(error.message().contains("pr-5"), "{}", error.message());
    }

    #[tokio::test]
    async fn affected_pull_requests_are_planned_in_id_order() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie"]).await;
        open_pr(&store, "pr-b", "alice", &["bob", "charlie"]).await;
        open_pr(&store, "pr-a", "charlie", &["bob", "alice"]).await;

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let plan = plan_deactivation(&store, &team, &ids(&["bob"]), &mut rng)
            .await
            .unwrap();

        let order: Vec<_> = plan
            .reassignments
            .iter()
            .map(|step| step.pull_request_id.as_str())
            .collect();
        assert_eq!(order, vec!["pr-a", "pr-b"]);
    }

    #[tokio::test]
    async fn merged_pull_requests_are_left_alone() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie"]).await;
        open_pr(&store, "pr-6", "alice", &["bob"]).await;
        store
            .merge_pull_request("pr-6", chrono::Utc::now())
            .await
            .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let plan = plan_deactivation(&store, &team, &ids(&["bob"]), &mut rng)
            .await
            .unwrap();

        assert!(plan.reassignments.is_empty());
    }

    #[tokio::test]
    async fn rejects_invalid_requests() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie"]).await;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let error = plan_deactivation(&store, &team, &[], &mut rng)
            .await
            .unwrap_err();
        assert_eq!(error.code(), "INVALID_REQUEST");

        let error = plan_deactivation(&store, &team, &ids(&["alice", "bob", "charlie"]), &mut rng)
            .await
            .unwrap_err();
        assert_eq!(error, error::DEACTIVATE_ALL_MEMBERS);

        let error = plan_deactivation(&store, &team, &ids(&["bob", "mallory"]), &mut rng)
            .await
            .unwrap_err();
        assert_eq!(error.code(), "INVALID_REQUEST");
        assert!(error.message().contains("mallory"));
    }

    #[tokio::test]
    async fn duplicate_ids_are_collapsed() {
        let store = MemoryStore::new();
        let team = team_with(&store, &["alice", "bob", "charlie"]).await;
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let plan = plan_deactivation(
            &store,
            &team,
            &ids(&["bob", "charlie", "bob", "charlie"]),
            &mut rng,
        )
        .await
        .unwrap();

        assert_eq!(plan.user_ids, ids(&["bob", "charlie"]));
    }
}
