use std::collections::{BTreeSet, HashMap};

use log::trace;

use crate::{
    content::ContentProfiles,
    data::{CandidateScore, ItemId},
    similarity::SimilarityMatrix,
    utils::rank_candidates,
};

/// Scores items by the similarity of their content profiles.
#[derive(Clone, Debug)]
pub struct ContentScorer {
    profiles: ContentProfiles,
    similarities: SimilarityMatrix,
}

impl ContentScorer {
    /// Precomputes the pairwise similarities of the profiles.
    pub fn new(profiles: ContentProfiles) -> Self {
        let similarities = SimilarityMatrix::from_rows(&profiles.features());

        Self {
            profiles,
            similarities,
        }
    }

    pub fn profiles(&self) -> &ContentProfiles {
        &self.profiles
    }

    pub fn similarities(&self) -> &SimilarityMatrix {
        &self.similarities
    }

    /// Gets the `top_n` items most similar to the item, excluding the item itself.
    ///
    /// An unknown item has no similar items.
    pub fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore> {
        let index = if let Some(index) = self.profiles.items().index(&item_id) {
            index
        } else {
            trace!("unknown item {}", item_id);
            return Vec::new();
        };

        let candidates = self
            .similarities
            .row(index)
            .iter()
            .zip(self.profiles.items().ids())
            .filter(|(_, &candidate)| candidate != item_id)
            .map(|(&score, &item_id)| CandidateScore { item_id, score })
            .collect();

        rank_candidates(candidates, top_n)
    }

    /// Sums the scores of the `breadth` most similar items over all the given items.
    ///
    /// The given items themselves are never part of the result.
    pub fn aggregate_for_items(&self, items: &[ItemId], breadth: usize) -> HashMap<ItemId, f32> {
        let sources = items.iter().collect::<BTreeSet<_>>();

        sources
            .iter()
            .flat_map(|&&item_id| self.similar_items(item_id, breadth))
            .filter(|candidate| !sources.contains(&candidate.item_id))
            .fold(HashMap::new(), |mut scores, candidate| {
                *scores.entry(candidate.item_id).or_default() += candidate.score;
                scores
            })
    }
}
