use super::{planner::plan_deactivation, selector::select_reviewers};
use crate::{
    error,
    models::{NewPullRequest, PullRequest, Reassignment, TeamMember},
    store::Store,
    Result,
};
use chrono::{SubsecRound, Utc};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

/// Number of reviewers a new pull request gets when the team allows it.
pub const TARGET_REVIEWER_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reassigned {
    pub pr: PullRequest,
    pub replaced_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deactivation {
    pub deactivated_user_ids: Vec<String>,
    pub reassignments: Vec<Reassignment>,
}

pub async fn create_pull_request<S, R>(
    store: &S,
    request: &NewPullRequest,
    rng: &mut R,
) -> Result<PullRequest>
where
    S: Store,
    R: Rng + Send + ?Sized,
{
    let author = store
        .find_user(&request.author_id)
        .await?
        .ok_or(error::AUTHOR_NOT_FOUND)?;

    let team = store
        .find_team(&author.team_name)
        .await?
        .ok_or(error::TEAM_NOT_FOUND)?;

    let reviewers = select_reviewers(&team.members, &author.user_id, TARGET_REVIEWER_COUNT, rng);
    let need_more_reviewers = reviewers.len() < TARGET_REVIEWER_COUNT;

    let pull_request = store
        .create_pull_request(request, &reviewers, need_more_reviewers)
        .await?;

    info!(
        "pull request {} created by {} with {} reviewers",
        pull_request.pull_request_id,
        pull_request.author_id,
        pull_request.assigned_reviewers.len()
    );

    Ok(pull_request)
}

pub async fn merge_pull_request<S: Store>(store: &S, pull_request_id: &str) -> Result<PullRequest> {
    let now = Utc::now().trunc_subsecs(6);

    let (pull_request, merged) = store
        .merge_pull_request(pull_request_id, now)
        .await?
        .ok_or(error::PR_NOT_FOUND)?;

    match pull_request.merged_at {
        Some(merged_at) if merged => {
            let lifetime = merged_at - pull_request.created_at;

            info!(
                "pull request {} merged after {:.2} hours",
                pull_request.pull_request_id,
                lifetime.num_milliseconds() as f64 / 3_600_000.0
            );
        }
        _ => debug!("pull request {} was already merged", pull_request_id),
    }

    Ok(pull_request)
}

pub async fn reassign_reviewer<S, R>(
    store: &S,
    pull_request_id: &str,
    old_reviewer_id: &str,
    rng: &mut R,
) -> Result<Reassigned>
where
    S: Store,
    R: Rng + Send + ?Sized,
{
    let pull_request = store
        .find_pull_request(pull_request_id)
        .await?
        .ok_or(error::PR_NOT_FOUND)?;

    if pull_request.is_merged() {
        return Err(error::PR_MERGED);
    }

    if !pull_request
        .assigned_reviewers
        .iter()
        .any(|id| id == old_reviewer_id)
    {
        return Err(error::NOT_ASSIGNED);
    }

    let old_reviewer = store
        .find_user(old_reviewer_id)
        .await?
        .ok_or(error::USER_NOT_FOUND)?;

    let team = store
        .find_team(&old_reviewer.team_name)
        .await?
        .ok_or(error::TEAM_NOT_FOUND)?;

    let candidates: Vec<&TeamMember> = team
        .members
        .iter()
        .filter(|member| {
            member.is_active
                && member.user_id != pull_request.author_id
                && !pull_request.assigned_reviewers.contains(&member.user_id)
        })
        .collect();

    let Some(new_reviewer_id) = candidates
        .choose(rng)
        .map(|member| member.user_id.clone())
    else {
        store
            .set_need_more_reviewers(pull_request_id, true)
            .await?;

        warn!(
            "no replacement for {} on pull request {}",
            old_reviewer_id, pull_request_id
        );

        return Err(error::NO_REPLACEMENT_CANDIDATE);
    };

    store
        .reassign_reviewer(pull_request_id, old_reviewer_id, &new_reviewer_id)
        .await?;

    let pr = store
        .find_pull_request(pull_request_id)
        .await?
        .ok_or(error::PR_NOT_FOUND)?;

    info!(
        "reviewer {} replaced by {} on pull request {}",
        old_reviewer_id, new_reviewer_id, pull_request_id
    );

    Ok(Reassigned {
        pr,
        replaced_by: new_reviewer_id,
    })
}

pub async fn deactivate_team_members<S, R>(
    store: &S,
    team_name: &str,
    user_ids: &[String],
    rng: &mut R,
) -> Result<Deactivation>
where
    S: Store,
    R: Rng + Send + ?Sized,
{
    let team = store
        .find_team(team_name)
        .await?
        .ok_or(error::TEAM_NOT_FOUND)?;

    let plan = plan_deactivation(store, &team, user_ids, rng).await?;

    let deactivated_user_ids = store
        .deactivate_team_members(team_name, &plan.user_ids, &plan.reassignments)
        .await?;

    info!(
        "deactivated {} members of team {} with {} reassignments",
        deactivated_user_ids.len(),
        team_name,
        plan.reassignments.len()
    );

    Ok(Deactivation {
        deactivated_user_ids,
        reassignments: plan.reassignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{PullRequestStatus, Team},
        store::{MemoryStore, PullRequestStore, ReviewerStore, TeamStore},
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn member(user_id: &str, is_active: bool) -> TeamMember {
        TeamMember {
            user_id: user_id.to_owned(),
            username: user_id.to_owned(),
            is_active,
        }
    }

    fn new_pr(id: &str, author_id: &str) -> NewPullRequest {
        NewPullRequest {
            pull_request_id: id.to_owned(),
            pull_request_name: "Add feature".to_owned(),
            author_id: author_id.to_owned(),
        }
    }

    async fn backend_team(store: &MemoryStore) {
        store
            .create_team(&Team {
                team_name: "backend".to_owned(),
                members: vec![
                    member("alice", true),
                    member("bob", true),
                    member("charlie", true),
                    member("david", false),
                ],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_assigns_two_active_non_authors() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let pr = create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();

        let reviewers: HashSet<_> = pr.assigned_reviewers.iter().map(String::as_str).collect();
        assert_eq!(reviewers, HashSet::from(["bob", "charlie"]));
        assert!(!pr.need_more_reviewers);
        assert_eq!(pr.status, PullRequestStatus::Open);
        assert!(pr.merged_at.is_none());
    }

    #[tokio::test]
    async fn create_flags_pull_request_short_of_reviewers() {
        let store = MemoryStore::new();
        store
            .create_team(&Team {
                team_name: "solo".to_owned(),
                members: vec![member("erin", true), member("frank", false)],
            })
            .await
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let pr = create_pull_request(&store, &new_pr("pr-solo", "erin"), &mut rng)
            .await
            .unwrap();

        assert!(pr.assigned_reviewers.is_empty());
        assert!(pr.need_more_reviewers);
    }

    #[tokio::test]
    async fn create_rejects_unknown_author_and_duplicate_id() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let error = create_pull_request(&store, &new_pr("pr-x", "nobody"), &mut rng)
            .await
            .unwrap_err();
        assert_eq!(error.code(), "NOT_FOUND");

        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();
        let error = create_pull_request(&store, &new_pr("pr-1", "bob"), &mut rng)
            .await
            .unwrap_err();
        assert_eq!(error, error::PR_EXISTS);
    }

    #[tokio::test]
    async fn merge_is_idempotent() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();

        let first = merge_pull_request(&store, "pr-1").await.unwrap();
        let second = merge_pull_request(&store, "pr-1").await.unwrap();

        assert_eq!(first.status, PullRequestStatus::Merged);
        assert!(first.merged_at.is_some());
        assert_eq!(first, second);

        let error = merge_pull_request(&store, "pr-missing").await.unwrap_err();
        assert_eq!(error, error::PR_NOT_FOUND);
    }

    #[tokio::test]
    async fn reassign_on_merged_pull_request_conflicts() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();
        merge_pull_request(&store, "pr-1").await.unwrap();

        let error = reassign_reviewer(&store, "pr-1", "bob", &mut rng)
            .await
            .unwrap_err();

        assert_eq!(error, error::PR_MERGED);
    }

    #[tokio::test]
    async fn reassign_requires_an_assigned_reviewer() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();

        let error = reassign_reviewer(&store, "pr-1", "david", &mut rng)
            .await
            .unwrap_err();

        assert_eq!(error, error::NOT_ASSIGNED);
    }

    #[tokio::test]
    async fn reassign_without_candidates_keeps_reviewer_and_flags() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();

        let error = reassign_reviewer(&store, "pr-1", "bob", &mut rng)
            .await
            .unwrap_err();
        assert_eq!(error.code(), "NO_CANDIDATE");

        let pr = store.find_pull_request("pr-1").await.unwrap().unwrap();
        assert!(pr.need_more_reviewers);
        assert!(pr.assigned_reviewers.contains(&"bob".to_owned()));
    }

    #[tokio::test]
    async fn reassign_swaps_in_the_free_member() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();
        store.set_user_active("david", true).await.unwrap();

        let reassigned = reassign_reviewer(&store, "pr-1", "bob", &mut rng)
            .await
            .unwrap();

        assert_eq!(reassigned.replaced_by, "david");
        assert_eq!(reassigned.pr.assigned_reviewers.len(), 2);
        assert!(!reassigned.pr.assigned_reviewers.contains(&"bob".to_owned()));
        assert!(reassigned
            .pr
            .assigned_reviewers
            .contains(&"charlie".to_owned()));
    }

    #[tokio::test]
    async fn starved_deactivation_changes_nothing() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();

        let error = deactivate_team_members(
            &store,
            "backend",
            &["bob".to_owned(), "charlie".to_owned()],
            &mut rng,
        )
        .await
        .unwrap_err();
        assert_eq!(error.code(), "NO_CANDIDATE");

        let team = store.find_team("backend").await.unwrap().unwrap();
        let active: Vec<_> = team
            .members
            .iter()
            .filter(|member| member.is_active)
            .map(|member| member.user_id.as_str())
            .collect();
        assert_eq!(active, vec!["alice", "bob", "charlie"]);

        let reviewers: HashSet<_> = store
            .assigned_reviewers("pr-1")
            .await
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            reviewers,
            HashSet::from(["bob".to_owned(), "charlie".to_owned()])
        );
    }

    #[tokio::test]
    async fn deactivation_removes_reviewer_when_others_remain() {
        let store = MemoryStore::new();
        backend_team(&store).await;
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        create_pull_request(&store, &new_pr("pr-1", "alice"), &mut rng)
            .await
            .unwrap();

        let deactivation = deactivate_team_members(&store, "backend", &["bob".to_owned()], &mut rng)
            .await
            .unwrap();

        assert_eq!(deactivation.deactivated_user_ids, vec!["bob"]);
        assert_eq!(
            deactivation.reassignments,
            vec![Reassignment {
                pull_request_id: "pr-1".to_owned(),
                old_reviewer_id: "bob".to_owned(),
                new_reviewer_id: None,
            }]
        );
        assert_eq!(
            store.assigned_reviewers("pr-1").await.unwrap(),
            vec!["charlie"]
        );
        assert!(!store.find_user("bob").await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn deactivation_of_unknown_team_is_not_found() {
        let store = MemoryStore::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let error = deactivate_team_members(&store, "ghosts", &["bob".to_owned()], &mut rng)
            .await
            .unwrap_err();

        assert_eq!(error, error::TEAM_NOT_FOUND);
    }
}
