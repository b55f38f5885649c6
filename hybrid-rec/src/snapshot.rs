use std::{fmt, sync::Arc};

use log::debug;

use crate::{
    collaborative::CollaborativeScorer,
    config::Config,
    content::{ContentProfiles, ContentScorer},
    data::{CandidateScore, Dataset, ItemId, UserId},
    error::Error,
    interaction::{InteractionMatrix, InteractionMatrixBuilder},
    model::Recommender,
};

/// An immutable, fully built state of the engine.
///
/// All similarities are precomputed when the snapshot is built, requests only read them.
pub struct Snapshot {
    config: Config,
    collaborative: Arc<CollaborativeScorer>,
    content: Arc<ContentScorer>,
    recommender: Box<dyn Recommender>,
}

impl Snapshot {
    /// Builds the interaction matrix, the content profiles, all similarities and the model.
    ///
    /// # Errors
    /// Fails if the dataset is degenerate, e.g. it has no interactions or no vocabulary.
    pub fn build(dataset: &Dataset, config: Config) -> Result<Self, Error> {
        let matrix = InteractionMatrixBuilder::new(config.rating_range().clone())
            .build(&dataset.interactions)?;
        let profiles = ContentProfiles::build(&dataset.items, config.content())?;

        let collaborative = Arc::new(CollaborativeScorer::new(Arc::new(matrix), config.axis()));
        let content = Arc::new(ContentScorer::new(profiles));
        let recommender = config.model().build(
            collaborative.clone(),
            content.clone(),
            config.hybrid(),
        );
        debug!("built {:?} snapshot", config.model());

        Ok(Self {
            config,
            collaborative,
            content,
            recommender,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        self.collaborative.matrix()
    }

    pub fn collaborative(&self) -> &CollaborativeScorer {
        &self.collaborative
    }

    pub fn content(&self) -> &ContentScorer {
        &self.content
    }

    /// Recommends the `top_n` best items for the user with the configured model.
    pub fn recommend_for_user(&self, user_id: UserId, top_n: usize) -> Vec<CandidateScore> {
        self.recommender.recommend_for_user(user_id, top_n)
    }

    /// Gets the `top_n` items most similar in content to the item.
    pub fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore> {
        self.recommender.similar_items(item_id, top_n)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("config", &self.config)
            .field("users", &self.matrix().users().len())
            .field("items", &self.matrix().items().len())
            .field("profiles", &self.content.profiles().items().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{Interaction, ItemText},
        error::DataError,
    };

    fn dataset() -> Dataset {
        Dataset {
            interactions: vec![
                Interaction::new(1, 101, 5.),
                Interaction::new(1, 102, 3.),
                Interaction::new(2, 101, 4.),
                Interaction::new(2, 103, 2.),
                Interaction::new(3, 104, 5.),
            ],
            items: vec![
                ItemText::new(101, "Action and adventure movie"),
                ItemText::new(102, "Romantic love story in Paris"),
                ItemText::new(103, "Sci-fi with space exploration"),
                ItemText::new(104, "More action and thrilling story"),
            ],
        }
    }

    #[test]
    fn test_build() {
        let snapshot = Snapshot::build(&dataset(), Config::default()).unwrap();

        assert_eq!(snapshot.matrix().users().len(), 3);
        assert_eq!(snapshot.collaborative().similarities().len(), 3);
        assert_eq!(snapshot.content().similarities().len(), 4);
        assert!(!snapshot.recommend_for_user(UserId(1), 10).is_empty());
        assert_eq!(snapshot.similar_items(ItemId(101), 1)[0].item_id, ItemId(104));
    }

    #[test]
    fn test_build_fails_on_degenerate_data() {
        let mut dataset = dataset();
        dataset.interactions.clear();
        assert!(matches!(
            Snapshot::build(&dataset, Config::default()),
            Err(Error::Data(DataError::EmptyInteractions)),
        ));

        let mut dataset = self::dataset();
        dataset.items.iter_mut().for_each(|item| item.text = None);
        assert!(matches!(
            Snapshot::build(&dataset, Config::default()),
            Err(Error::Data(DataError::EmptyVocabulary)),
        ));
    }

    #[test]
    fn test_build_checks_rating_range() {
        let config = Config::default().with_rating_range(0., 4.).unwrap();
        assert!(matches!(
            Snapshot::build(&dataset(), config),
            Err(Error::Data(DataError::RatingOutOfRange { .. })),
        ));
    }

    #[test]
    fn test_build_fails_on_overflowing_ratings() {
        let config = Config::default().with_rating_range(0., 1e30).unwrap();
        let mut dataset = dataset();
        dataset.interactions.push(Interaction::new(1, 101, 1e30));

        assert!(matches!(
            Snapshot::build(&dataset, config),
            Err(Error::Data(DataError::NormOverflow)),
        ));
    }

    #[test]
    fn test_snapshot_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Snapshot>();
    }
}
