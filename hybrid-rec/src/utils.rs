use std::{cmp::Ordering, collections::HashMap};

use crate::data::{CandidateScore, ItemId};

/// Allows comparing and sorting f32 even if `NaN` is involved.
///
/// Pretend that f32 has a total ordering.
///
/// `NaN` is treated as the lowest possible value if `nan_min`, similar to what [`f32::max`] does.
/// Otherwise it is treated as the highest possible value, similar to what [`f32::min`] does.
///
/// If this is used for sorting this will lead to an ascending order, like
/// for example:
/// ```ignore
/// [NaN, -inf, -1, 0, 1, inf]
/// ```
fn nan_safe_f32_cmp_base(a: &f32, b: &f32, nan_min: bool) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| {
        // if `partial_cmp` returns None we have at least one `NaN`,
        let cmp = match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, _) => Ordering::Less,
            (_, true) => Ordering::Greater,
            _ => unreachable!("partial_cmp returned None but both numbers are not NaN"),
        };
        if nan_min {
            cmp
        } else {
            cmp.reverse()
        }
    })
}

/// Compares f32 in ascending order with `NaN` treated as the lowest value.
pub(crate) fn nan_safe_f32_cmp(a: &f32, b: &f32) -> Ordering {
    nan_safe_f32_cmp_base(a, b, true)
}

/// Compares f32 in descending order with `NaN` treated as the lowest value.
pub(crate) fn nan_safe_f32_cmp_desc(a: &f32, b: &f32) -> Ordering {
    nan_safe_f32_cmp(b, a)
}

/// Orders candidates by descending score and breaks ties by ascending item id.
pub(crate) fn candidate_cmp(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    nan_safe_f32_cmp_desc(&a.score, &b.score).then_with(|| a.item_id.cmp(&b.item_id))
}

/// Sorts the candidates into a ranking and keeps at most the `top_n` best ones.
pub(crate) fn rank_candidates(
    mut candidates: Vec<CandidateScore>,
    top_n: usize,
) -> Vec<CandidateScore> {
    candidates.sort_unstable_by(candidate_cmp);
    candidates.truncate(top_n);
    candidates
}

/// Ranks accumulated scores per item, see [`rank_candidates`].
pub(crate) fn rank_scores(scores: HashMap<ItemId, f32>, top_n: usize) -> Vec<CandidateScore> {
    rank_candidates(
        scores
            .into_iter()
            .map(|(item_id, score)| CandidateScore { item_id, score })
            .collect(),
        top_n,
    )
}
