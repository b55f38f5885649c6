use std::ops::RangeInclusive;

use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::{
    data::{Interaction, ItemId, UserId},
    error::DataError,
    interaction::IdIndex,
};

/// The ratings of users (rows) for items (columns).
///
/// Unobserved cells are stored as `0.0`, the scorers treat them as an approximation of "no
/// preference". An observed rating of `0.0` is indistinguishable from an unobserved one.
#[derive(Clone, Debug)]
pub struct InteractionMatrix {
    users: IdIndex<UserId>,
    items: IdIndex<ItemId>,
    ratings: Array2<f32>,
}

impl InteractionMatrix {
    /// The user id to row index mapping.
    pub fn users(&self) -> &IdIndex<UserId> {
        &self.users
    }

    /// The item id to column index mapping.
    pub fn items(&self) -> &IdIndex<ItemId> {
        &self.items
    }

    /// The dense ratings with unobserved cells as `0.0`.
    pub fn ratings(&self) -> ArrayView2<'_, f32> {
        self.ratings.view()
    }

    /// The dense ratings of the user at the row index.
    pub(crate) fn user_ratings(&self, user: usize) -> ArrayView1<'_, f32> {
        self.ratings.row(user)
    }

    /// The items rated positively by the user in ascending id order.
    pub fn rated_items(&self, user_id: UserId) -> Vec<ItemId> {
        self.users
            .index(&user_id)
            .map(|user| {
                self.user_ratings(user)
                    .iter()
                    .zip(self.items.ids())
                    .filter(|(&rating, _)| rating > 0.)
                    .map(|(_, &item_id)| item_id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The number of non-zero ratings.
    pub fn nnz(&self) -> usize {
        count_non_zero(&self.ratings)
    }
}

fn count_non_zero(ratings: &Array2<f32>) -> usize {
    ratings.iter().filter(|&&rating| rating != 0.).count()
}

/// Whether the squared l2 norm of any user row or item column isn't representable.
fn norm_overflows(ratings: &Array2<f32>) -> bool {
    let overflows = |lane: ArrayView1<'_, f32>| !lane.dot(&lane).is_finite();
    ratings.rows().into_iter().any(overflows) || ratings.columns().into_iter().any(overflows)
}

/// Builds an [`InteractionMatrix`] from a list of interactions.
#[derive(Clone, Debug)]
pub struct InteractionMatrixBuilder {
    rating_range: RangeInclusive<f32>,
}

impl Default for InteractionMatrixBuilder {
    fn default() -> Self {
        Self::new(0. ..=5.)
    }
}

impl InteractionMatrixBuilder {
    pub fn new(rating_range: RangeInclusive<f32>) -> Self {
        Self { rating_range }
    }

    /// Builds the interaction matrix.
    ///
    /// If a user rated the same item several times, the last rating wins.
    ///
    /// # Errors
    /// Fails if there are no interactions, if a rating is not finite or outside of the
    /// configured range or if the ratings are too large to compute their similarities.
    pub fn build(&self, interactions: &[Interaction]) -> Result<InteractionMatrix, DataError> {
        if interactions.is_empty() {
            return Err(DataError::EmptyInteractions);
        }
        interactions
            .iter()
            .try_for_each(|interaction| self.check_rating(interaction))?;

        let users = IdIndex::new(interactions.iter().map(|interaction| interaction.user_id));
        let items = IdIndex::new(interactions.iter().map(|interaction| interaction.item_id));
        let mut ratings = Array2::zeros((users.len(), items.len()));

        for interaction in interactions {
            // both ids are known by construction of the indices
            if let (Some(user), Some(item)) = (
                users.index(&interaction.user_id),
                items.index(&interaction.item_id),
            ) {
                ratings[[user, item]] = interaction.rating;
            }
        }
        if norm_overflows(&ratings) {
            return Err(DataError::NormOverflow);
        }

        debug!(
            "built interaction matrix of {} users and {} items with {} non-zero ratings",
            users.len(),
            items.len(),
            count_non_zero(&ratings),
        );

        Ok(InteractionMatrix {
            users,
            items,
            ratings,
        })
    }

    fn check_rating(&self, interaction: &Interaction) -> Result<(), DataError> {
        let Interaction {
            user_id,
            item_id,
            rating,
        } = *interaction;

        if !rating.is_finite() {
            Err(DataError::NonFiniteRating {
                user: user_id.0,
                item: item_id.0,
                rating,
            })
        } else if !self.rating_range.contains(&rating) {
            Err(DataError::RatingOutOfRange {
                user: user_id.0,
                item: item_id.0,
                rating,
                min: *self.rating_range.start(),
                max: *self.rating_range.end(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::arr2;

    use super::*;

    fn interactions() -> Vec<Interaction> {
        vec![
            Interaction::new(1, 101, 5.),
            Interaction::new(1, 102, 3.),
            Interaction::new(2, 101, 4.),
            Interaction::new(2, 103, 2.),
            Interaction::new(3, 104, 5.),
        ]
    }

    #[test]
    fn test_build() {
        let matrix = InteractionMatrixBuilder::default()
            .build(&interactions())
            .unwrap();

        assert_eq!(matrix.users().ids(), [UserId(1), UserId(2), UserId(3)]);
        assert_eq!(
            matrix.items().ids(),
            [ItemId(101), ItemId(102), ItemId(103), ItemId(104)],
        );
        assert_eq!(
            matrix.ratings(),
            arr2(&[[5f32, 3., 0., 0.], [4., 0., 2., 0.], [0., 0., 0., 5.]]),
        );
        assert_eq!(matrix.nnz(), 5);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let matrix = InteractionMatrixBuilder::default()
            .build(&[
                Interaction::new(1, 101, 5.),
                Interaction::new(2, 101, 1.),
                Interaction::new(1, 101, 2.),
            ])
            .unwrap();

        assert_eq!(matrix.ratings(), arr2(&[[2f32], [1.]]));
        assert_eq!(matrix.nnz(), 2);
    }

    #[test]
    fn test_zero_rating_counts_as_unobserved() {
        let matrix = InteractionMatrixBuilder::default()
            .build(&[Interaction::new(1, 101, 0.), Interaction::new(2, 102, 4.)])
            .unwrap();

        assert_eq!(matrix.ratings(), arr2(&[[0f32, 0.], [0., 4.]]));
        assert_eq!(matrix.nnz(), 1);
        assert!(matrix.rated_items(UserId(1)).is_empty());
    }

    #[test]
    fn test_rated_items() {
        let matrix = InteractionMatrixBuilder::default()
            .build(&interactions())
            .unwrap();

        assert_eq!(matrix.rated_items(UserId(1)), [ItemId(101), ItemId(102)]);
        assert_eq!(matrix.rated_items(UserId(3)), [ItemId(104)]);
        assert!(matrix.rated_items(UserId(9)).is_empty());
    }

    #[test]
    fn test_empty_interactions() {
        assert_eq!(
            InteractionMatrixBuilder::default().build(&[]).unwrap_err(),
            DataError::EmptyInteractions,
        );
    }

    #[test]
    fn test_invalid_ratings() {
        let builder = InteractionMatrixBuilder::default();

        assert!(matches!(
            builder.build(&[Interaction::new(1, 2, f32::NAN)]),
            Err(DataError::NonFiniteRating { user: 1, item: 2, .. }),
        ));
        assert!(matches!(
            builder.build(&[Interaction::new(1, 2, 5.5)]),
            Err(DataError::RatingOutOfRange { user: 1, item: 2, .. }),
        ));
    }

    #[test]
    fn test_overflowing_norms() {
        let builder = InteractionMatrixBuilder::new(0. ..=f32::MAX);

        assert_eq!(
            builder
                .build(&[Interaction::new(1, 101, 1e30)])
                .unwrap_err(),
            DataError::NormOverflow,
        );
        // each rating fits, but the norm of the item column doesn't
        let interactions = (1..=4)
            .map(|user| Interaction::new(user, 101, 1e19))
            .collect::<Vec<_>>();
        assert_eq!(
            builder.build(&interactions).unwrap_err(),
            DataError::NormOverflow,
        );
        assert!(builder.build(&[Interaction::new(1, 101, 1e18)]).is_ok());
    }
}
