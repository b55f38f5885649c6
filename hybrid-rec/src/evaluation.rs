//! Offline evaluation of the recommendation models.

use std::{collections::HashMap, sync::Arc};

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    collaborative::CollaborativeScorer,
    config::Config,
    content::ContentScorer,
    data::{Interaction, ItemId},
    error::{Error, InputError},
    interaction::InteractionMatrixBuilder,
};

/// Randomly splits the interactions into a train and a test set.
///
/// The split is reproducible for the same seed. The test set gets `ceil(len * test_fraction)`
/// interactions.
///
/// # Errors
/// Fails if the test fraction is not within `[0, 1]`.
pub fn train_test_split(
    interactions: &[Interaction],
    test_fraction: f32,
    seed: u64,
) -> Result<(Vec<Interaction>, Vec<Interaction>), InputError> {
    if !(0. ..=1.).contains(&test_fraction) {
        return Err(InputError::TestFraction);
    }

    let mut shuffled = interactions.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let test_len = ((shuffled.len() as f32 * test_fraction).ceil() as usize).min(shuffled.len());
    let test = shuffled.split_off(shuffled.len() - test_len);

    Ok((shuffled, test))
}

/// The accuracy of predicted ratings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingAccuracy {
    /// Root mean squared error, `NaN` if nothing was evaluated.
    pub rmse: f32,
    /// Mean absolute error, `NaN` if nothing was evaluated.
    pub mae: f32,
    /// The number of evaluated test interactions.
    pub evaluated: usize,
    /// The number of test interactions without prediction, e.g. because of an unknown user.
    pub skipped: usize,
}

/// Evaluates the collaborative rating predictions of a model trained on the train set against
/// the ratings of the test set.
///
/// # Errors
/// Fails if the train set can't be turned into an interaction matrix.
pub fn evaluate_ratings(
    train: &[Interaction],
    test: &[Interaction],
    config: &Config,
) -> Result<RatingAccuracy, Error> {
    let matrix = InteractionMatrixBuilder::new(config.rating_range().clone()).build(train)?;
    let scorer = CollaborativeScorer::new(Arc::new(matrix), config.axis());

    let errors = test
        .iter()
        .filter_map(|interaction| {
            scorer
                .predict_rating(interaction.user_id, interaction.item_id)
                .map(|predicted| predicted - interaction.rating)
        })
        .collect::<Vec<_>>();

    let evaluated = errors.len();
    #[allow(clippy::cast_precision_loss)] // number of interactions is small
    let len = evaluated as f32;
    let (rmse, mae) = if evaluated > 0 {
        (
            (errors.iter().map(|error| error * error).sum::<f32>() / len).sqrt(),
            errors.iter().map(|error| error.abs()).sum::<f32>() / len,
        )
    } else {
        (f32::NAN, f32::NAN)
    };
    debug!("evaluated {} of {} test ratings", evaluated, test.len());

    Ok(RatingAccuracy {
        rmse,
        mae,
        evaluated,
        skipped: test.len() - evaluated,
    })
}

/// Computes the fraction of tagged items for which at least one of the `top_n` most similar
/// items has the same tag.
///
/// The precision is `0` if no item is tagged.
#[allow(clippy::cast_precision_loss)] // number of items is small
pub fn tag_precision(
    content: &ContentScorer,
    tags: &HashMap<ItemId, String>,
    top_n: usize,
) -> f32 {
    let (hits, total) = content
        .profiles()
        .items()
        .ids()
        .iter()
        .filter_map(|item_id| tags.get(item_id).map(|tag| (item_id, tag)))
        .fold((0, 0), |(hits, total), (&item_id, tag)| {
            let hit = content
                .similar_items(item_id, top_n)
                .iter()
                .any(|candidate| tags.get(&candidate.item_id) == Some(tag));
            (hits + usize::from(hit), total + 1)
        });

    if total > 0 {
        hits as f32 / total as f32
    } else {
        0.
    }
}

#[cfg(test)]
mod tests {
    use test_utils::assert_approx_eq;

    use super::*;
    use crate::{
        collaborative::SimilarityAxis,
        content::{ContentConfig, ContentProfiles},
        data::ItemText,
    };

    fn interactions() -> Vec<Interaction> {
        (1..=4)
            .flat_map(|user| {
                (101..=105).map(move |item| {
                    Interaction::new(user, item, ((user + item) % 5) as f32 + 0.5)
                })
            })
            .collect()
    }

    #[test]
    fn test_train_test_split() {
        let interactions = interactions();

        let (train, test) = train_test_split(&interactions, 0.2, 42).unwrap();

        assert_eq!(train.len(), 16);
        assert_eq!(test.len(), 4);
        let mut all = train.iter().chain(&test).copied().collect::<Vec<_>>();
        all.sort_by_key(|interaction| (interaction.user_id, interaction.item_id));
        assert_eq!(all, interactions);
    }

    #[test]
    fn test_train_test_split_is_reproducible() {
        let interactions = interactions();

        assert_eq!(
            train_test_split(&interactions, 0.3, 7).unwrap(),
            train_test_split(&interactions, 0.3, 7).unwrap(),
        );
    }

    #[test]
    fn test_train_test_split_bounds() {
        let interactions = interactions();

        let (train, test) = train_test_split(&interactions, 0., 1).unwrap();
        assert_eq!((train.len(), test.len()), (20, 0));
        let (train, test) = train_test_split(&interactions, 1., 1).unwrap();
        assert_eq!((train.len(), test.len()), (0, 20));
        assert_eq!(
            train_test_split(&interactions, 1.5, 1).unwrap_err(),
            InputError::TestFraction,
        );
    }

    #[test]
    fn test_evaluate_ratings_on_train_set() {
        let interactions = vec![
            Interaction::new(1, 101, 4.),
            Interaction::new(2, 101, 4.),
            Interaction::new(1, 102, 2.),
            Interaction::new(2, 102, 2.),
        ];

        let accuracy =
            evaluate_ratings(&interactions, &interactions, &Config::default()).unwrap();

        // both users are identical, so every prediction is exact
        assert_eq!(accuracy.evaluated, 4);
        assert_eq!(accuracy.skipped, 0);
        assert_approx_eq!(f32, accuracy.rmse, 0., epsilon = 1e-6);
        assert_approx_eq!(f32, accuracy.mae, 0., epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_ratings_skips_unknown() {
        let train = vec![Interaction::new(1, 101, 4.), Interaction::new(2, 102, 2.)];
        let test = vec![Interaction::new(3, 101, 4.), Interaction::new(1, 103, 2.)];
        let config = Config::default().with_axis(SimilarityAxis::Item);

        let accuracy = evaluate_ratings(&train, &test, &config).unwrap();

        assert_eq!(accuracy.evaluated, 0);
        assert_eq!(accuracy.skipped, 2);
        assert!(accuracy.rmse.is_nan());
        assert!(accuracy.mae.is_nan());
    }

    #[test]
    fn test_evaluate_ratings_errors() {
        let train = vec![Interaction::new(1, 101, 2.), Interaction::new(2, 101, 4.)];
        let test = vec![Interaction::new(1, 101, 2.)];

        let accuracy = evaluate_ratings(&train, &test, &Config::default()).unwrap();

        // users 1 and 2 are identical in direction, so the prediction is (2 + 4) / 2
        assert_eq!(accuracy.evaluated, 1);
        assert_approx_eq!(f32, accuracy.rmse, 1.);
        assert_approx_eq!(f32, accuracy.mae, 1.);
    }

    #[test]
    fn test_tag_precision() {
        let profiles = ContentProfiles::build(
            &[
                ItemText::new(1, "space opera with aliens"),
                ItemText::new(2, "aliens invade space"),
                ItemText::new(3, "romantic comedy"),
                ItemText::new(4, "paris romance"),
                ItemText::new(5, "untagged documentary"),
            ],
            &ContentConfig::default(),
        )
        .unwrap();
        let content = ContentScorer::new(profiles);
        let tags = vec![
            (ItemId(1), "scifi".to_string()),
            (ItemId(2), "scifi".to_string()),
            (ItemId(3), "romance".to_string()),
            (ItemId(4), "romance".to_string()),
        ]
        .into_iter()
        .collect();

        // items 1 and 2 find each other, items 3 and 4 share no terms
        assert_approx_eq!(f32, tag_precision(&content, &tags, 1), 0.5);
        assert_approx_eq!(f32, tag_precision(&content, &tags, 4), 1.);
        assert_approx_eq!(f32, tag_precision(&content, &HashMap::new(), 4), 0.);
    }
}
