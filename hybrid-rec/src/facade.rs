use std::sync::{Arc, PoisonError, RwLock};

use log::info;

use crate::{
    config::Config,
    data::{CandidateScore, Dataset, ItemId, UserId},
    error::{Error, InputError},
    snapshot::Snapshot,
};

/// The default number of recommendations.
pub const DEFAULT_TOP_N: usize = 10;

/// The entry point for recommendations.
///
/// Requests are served from the current [`Snapshot`] without holding any lock while scoring. A
/// rebuild creates a new snapshot and swaps it in, requests in flight finish on the old one.
#[derive(Debug)]
pub struct RecommendationFacade {
    config: Config,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl RecommendationFacade {
    /// Builds the initial snapshot from the dataset.
    ///
    /// # Errors
    /// Fails if the snapshot can't be built, the facade is never created half ready.
    pub fn new(dataset: &Dataset, config: Config) -> Result<Self, Error> {
        let snapshot = Snapshot::build(dataset, config.clone())?;
        info!("recommendation facade is ready: {:?}", snapshot);

        Ok(Self {
            config,
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The snapshot which currently serves the requests.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current snapshot by one built from the dataset.
    ///
    /// # Errors
    /// Fails if the new snapshot can't be built, in which case the current one keeps serving.
    pub fn rebuild(&self, dataset: &Dataset) -> Result<(), Error> {
        let snapshot = Arc::new(Snapshot::build(dataset, self.config.clone())?);
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
        info!("swapped in a rebuilt snapshot");

        Ok(())
    }

    /// Recommends the `top_n` best items for the user.
    ///
    /// An unknown user gets an empty list.
    ///
    /// # Errors
    /// Fails if `top_n` is zero.
    pub fn recommend_for_user(
        &self,
        user_id: UserId,
        top_n: usize,
    ) -> Result<Vec<CandidateScore>, Error> {
        check_top_n(top_n)?;
        Ok(self.snapshot().recommend_for_user(user_id, top_n))
    }

    /// Recommends the `top_n` items most similar in content to the item.
    ///
    /// An unknown item gets an empty list.
    ///
    /// # Errors
    /// Fails if `top_n` is zero.
    pub fn recommend_similar_items(
        &self,
        item_id: ItemId,
        top_n: usize,
    ) -> Result<Vec<CandidateScore>, Error> {
        check_top_n(top_n)?;
        Ok(self.snapshot().similar_items(item_id, top_n))
    }
}

fn check_top_n(top_n: usize) -> Result<(), InputError> {
    if top_n > 0 {
        Ok(())
    } else {
        Err(InputError::ZeroTopN)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::data::{Interaction, ItemText};

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
    fn test_zero_top_n() {
        let facade = RecommendationFacade::new(&dataset(), Config::default()).unwrap();

        assert!(matches!(
            facade.recommend_for_user(UserId(1), 0),
            Err(Error::Input(InputError::ZeroTopN)),
        ));
        assert!(matches!(
            facade.recommend_similar_items(ItemId(101), 0),
            Err(Error::Input(InputError::ZeroTopN)),
        ));
    }

    #[test]
    fn test_unknown_ids() {
        let facade = RecommendationFacade::new(&dataset(), Config::default()).unwrap();

        assert!(facade.recommend_for_user(UserId(42), 10).unwrap().is_empty());
        assert!(facade
            .recommend_similar_items(ItemId(999), DEFAULT_TOP_N)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rebuild_swaps_snapshot() {
        let facade = RecommendationFacade::new(&dataset(), Config::default()).unwrap();
        let old = facade.snapshot();
        assert!(facade.recommend_for_user(UserId(4), 10).unwrap().is_empty());

        let mut dataset = dataset();
        dataset.interactions.push(Interaction::new(4, 101, 5.));
        facade.rebuild(&dataset).unwrap();

        assert!(!Arc::ptr_eq(&old, &facade.snapshot()));
        assert!(!facade.recommend_for_user(UserId(4), 10).unwrap().is_empty());
        // the old snapshot stays consistent for requests still holding it
        assert!(old.recommend_for_user(UserId(4), 10).is_empty());
    }

    #[test]
    fn test_failed_rebuild_keeps_snapshot() {
        let facade = RecommendationFacade::new(&dataset(), Config::default()).unwrap();
        let old = facade.snapshot();

        assert!(facade.rebuild(&Dataset::default()).is_err());

        assert!(Arc::ptr_eq(&old, &facade.snapshot()));
    }

    #[test]
    fn test_concurrent_requests() {
        let facade = Arc::new(RecommendationFacade::new(&dataset(), Config::default()).unwrap());
        let expected = facade.recommend_for_user(UserId(1), 10).unwrap();

        let handles = (0..4)
            .map(|_| {
                let facade = facade.clone();
                thread::spawn(move || facade.recommend_for_user(UserId(1), 10).unwrap())
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
