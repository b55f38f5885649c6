use std::{str::FromStr, sync::Arc};

use log::trace;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{
    config::Error as ConfigError,
    data::{CandidateScore, ItemId, UserId},
    interaction::InteractionMatrix,
    similarity::SimilarityMatrix,
    utils::rank_candidates,
};

/// The axis of the interaction matrix over which similarities are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityAxis {
    /// Users are similar if they rated the same items alike.
    User,
    /// Items are similar if the same users rated them alike.
    Item,
}

impl Default for SimilarityAxis {
    fn default() -> Self {
        Self::User
    }
}

impl FromStr for SimilarityAxis {
    type Err = ConfigError;

    fn from_str(axis: &str) -> Result<Self, Self::Err> {
        match axis {
            "user" => Ok(Self::User),
            "item" => Ok(Self::Item),
            _ => Err(ConfigError::UnknownAxis(axis.to_string())),
        }
    }
}

/// Scores items for users from the ratings of similar users or of similar items.
///
/// Unobserved ratings count as `0.0`, which is an approximation: an item nobody rated
/// pulls the similarities towards zero instead of being ignored.
#[derive(Clone, Debug)]
pub struct CollaborativeScorer {
    matrix: Arc<InteractionMatrix>,
    axis: SimilarityAxis,
    similarities: SimilarityMatrix,
}

impl CollaborativeScorer {
    /// Precomputes the similarities along the axis.
    pub fn new(matrix: Arc<InteractionMatrix>, axis: SimilarityAxis) -> Self {
        let similarities = match axis {
            SimilarityAxis::User => SimilarityMatrix::from_rows(&matrix.ratings()),
            SimilarityAxis::Item => SimilarityMatrix::from_rows(&matrix.ratings().t()),
        };

        Self {
            matrix,
            axis,
            similarities,
        }
    }

    pub fn matrix(&self) -> &Arc<InteractionMatrix> {
        &self.matrix
    }

    pub fn axis(&self) -> SimilarityAxis {
        self.axis
    }

    pub fn similarities(&self) -> &SimilarityMatrix {
        &self.similarities
    }

    /// The items rated positively by the user in ascending id order.
    pub fn rated_items(&self, user_id: UserId) -> Vec<ItemId> {
        self.matrix.rated_items(user_id)
    }

    /// Scores all candidate items for the user, best first with ties by ascending item id.
    ///
    /// Items the user rated with a non-zero value aren't candidates if `exclude_rated`. An
    /// unknown user has no candidates.
    pub fn score_for_user(&self, user_id: UserId, exclude_rated: bool) -> Vec<CandidateScore> {
        let user = if let Some(user) = self.matrix.users().index(&user_id) {
            user
        } else {
            trace!("unknown user {}", user_id);
            return Vec::new();
        };
        let ratings = self.matrix.user_ratings(user);

        let candidates = match self.axis {
            SimilarityAxis::User => self
                .user_based_scores(user)
                .iter()
                .zip(ratings)
                .zip(self.matrix.items().ids())
                .filter(|((_, &rating), _)| !(exclude_rated && rating != 0.))
                .map(|((&score, _), &item_id)| CandidateScore { item_id, score })
                .collect(),
            SimilarityAxis::Item => self.item_based_scores(ratings, exclude_rated),
        };

        rank_candidates(candidates, usize::MAX)
    }

    /// Predicts the rating of the user for the item.
    ///
    /// In the user based mode this is the similarity weighted average of all ratings for the
    /// item. In the item based mode it is the similarity weighted average of the user's ratings
    /// for the other items. The prediction is `None` for unknown ids or if no similarity
    /// carries any information about the pair.
    pub fn predict_rating(&self, user_id: UserId, item_id: ItemId) -> Option<f32> {
        let user = self.matrix.users().index(&user_id)?;
        let item = self.matrix.items().index(&item_id)?;

        match self.axis {
            SimilarityAxis::User => Some(self.user_based_scores(user)[item]),
            SimilarityAxis::Item => {
                let (weighted, norm) = self
                    .matrix
                    .user_ratings(user)
                    .iter()
                    .zip(self.similarities.row(item))
                    .enumerate()
                    .filter(|&(rated, (&rating, _))| rated != item && rating != 0.)
                    .fold((0., 0.), |(weighted, norm), (_, (&rating, &similarity))| {
                        (weighted + rating * similarity, norm + similarity.abs())
                    });
                (norm != 0.).then(|| weighted / norm)
            }
        }
    }

    /// Computes `sim · R / sum(sim)` for the user's similarity row, including the self term.
    fn user_based_scores(&self, user: usize) -> Array1<f32> {
        let similarities = self.similarities.row(user);
        let weighted = similarities.dot(&self.matrix.ratings());
        let sum = similarities.sum();

        if sum == 0. {
            trace!("user at index {} has no similar users", user);
            weighted
        } else {
            weighted / sum
        }
    }

    /// Sums `rating * sim(rated, candidate)` over all items rated by the user.
    fn item_based_scores(
        &self,
        ratings: ArrayView1<'_, f32>,
        exclude_rated: bool,
    ) -> Vec<CandidateScore> {
        let len = ratings.len();
        let mut scores = vec![0.; len];
        let mut touched = vec![false; len];

        for (rated, &rating) in ratings.iter().enumerate() {
            if rating == 0. {
                continue;
            }
            let similarities = self.similarities.row(rated);
            for candidate in 0..len {
                if candidate == rated || (exclude_rated && ratings[candidate] != 0.) {
                    continue;
                }
                scores[candidate] += rating * similarities[candidate];
                touched[candidate] = true;
            }
        }

        scores
            .into_iter()
            .zip(touched)
            .zip(self.matrix.items().ids())
            .filter(|((_, touched), _)| *touched)
            .map(|((score, _), &item_id)| CandidateScore { item_id, score })
            .collect()
    }
}
