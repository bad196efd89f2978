use crate::models::TeamMember;
use rand::{seq::SliceRandom, Rng};

/// Picks up to `max_count` distinct active members other than `exclude`.
///
/// When there are more candidates than `max_count` every candidate has the
/// same chance of being picked. The order of the result carries no meaning.
pub fn select_reviewers<R: Rng + ?Sized>(
    members: &[TeamMember],
    exclude: &str,
    max_count: usize,
    rng: &mut R,
) -> Vec<String> {
    if max_count == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<&str> = members
        .iter()
        .filter(|member| member.is_active && member.user_id != exclude)
        .map(|member| member.user_id.as_str())
        .collect();

    if candidates.len() > max_count {
        let (picked, _) = candidates.partial_shuffle(rng, max_count);
        return picked.iter().map(|&id| id.to_owned()).collect();
    }

    candidates.into_iter().map(str::to_owned).collect()
}
