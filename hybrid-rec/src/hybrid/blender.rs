use std::{collections::HashMap, sync::Arc};

use log::trace;

use crate::{
    collaborative::CollaborativeScorer,
    content::ContentScorer,
    data::{CandidateScore, ItemId, UserId},
    hybrid::HybridConfig,
    utils::{nan_safe_f32_cmp, rank_scores},
};

/// Divides the scores by their maximum.
///
/// Nothing happens if there are no scores or if the maximum isn't positive.
pub(crate) fn normalize_by_max(scores: &mut HashMap<ItemId, f32>) {
    if let Some(max) = scores.values().copied().max_by(nan_safe_f32_cmp) {
        if max > 0. {
            scores.values_mut().for_each(|score| *score /= max);
        }
    }
}

/// Blends collaborative and content based scores into one ranking.
#[derive(Clone, Debug)]
pub struct HybridBlender {
    collaborative: Arc<CollaborativeScorer>,
    content: Arc<ContentScorer>,
    config: HybridConfig,
}

impl HybridBlender {
    pub fn new(
        collaborative: Arc<CollaborativeScorer>,
        content: Arc<ContentScorer>,
        config: HybridConfig,
    ) -> Self {
        Self {
            collaborative,
            content,
            config,
        }
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// The collaborative candidates of the user, normalized by their maximum.
    fn collaborative_scores(&self, user_id: UserId) -> HashMap<ItemId, f32> {
        let mut scores = self
            .collaborative
            .score_for_user(user_id, true)
            .into_iter()
            .take(self.config.collaborative_breadth())
            .map(|candidate| (candidate.item_id, candidate.score))
            .collect();
        normalize_by_max(&mut scores);

        scores
    }

    /// The summed content similarities to the user's positively rated items, normalized by
    /// their maximum.
    fn content_scores(&self, user_id: UserId) -> HashMap<ItemId, f32> {
        let rated = self.collaborative.rated_items(user_id);
        let mut scores = self
            .content
            .aggregate_for_items(&rated, self.config.content_breadth());
        normalize_by_max(&mut scores);

        scores
    }

    /// Recommends the `top_n` best items for the user.
    ///
    /// The score of a candidate is `alpha * collaborative + (1 - alpha) * content`, where a
    /// missing score counts as zero and a source with zero weight contributes no candidates.
    pub fn recommend_for_user(&self, user_id: UserId, top_n: usize) -> Vec<CandidateScore> {
        let alpha = self.config.alpha();
        let collaborative = if alpha > 0. {
            self.collaborative_scores(user_id)
        } else {
            HashMap::new()
        };
        let content = if alpha < 1. {
            self.content_scores(user_id)
        } else {
            HashMap::new()
        };
        trace!(
            "blending {} collaborative and {} content candidates for user {}",
            collaborative.len(),
            content.len(),
            user_id,
        );

        let mut scores = content
            .iter()
            .map(|(&item_id, &score)| (item_id, (1. - alpha) * score))
            .collect::<HashMap<_, _>>();
        for (&item_id, &score) in &collaborative {
            *scores.entry(item_id).or_default() += alpha * score;
        }

        rank_scores(scores, top_n)
    }

    /// Gets the `top_n` items most similar in content to the item.
    pub fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore> {
        self.content.similar_items(item_id, top_n)
    }
}
