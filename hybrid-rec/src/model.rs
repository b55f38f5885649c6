use std::{str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    collaborative::CollaborativeScorer,
    config::Error as ConfigError,
    content::ContentScorer,
    data::{CandidateScore, ItemId, UserId},
    hybrid::{normalize_by_max, HybridBlender, HybridConfig},
    utils::{rank_candidates, rank_scores},
};

/// Common capabilities of all recommendation models.
pub trait Recommender: Send + Sync {
    /// Recommends the `top_n` best items for the user, best first.
    ///
    /// An unknown user gets no recommendations.
    fn recommend_for_user(&self, user_id: UserId, top_n: usize) -> Vec<CandidateScore>;

    /// Gets the `top_n` items most similar to the item, best first.
    ///
    /// An unknown item has no similar items.
    fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore>;
}

/// The available recommendation models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Collaborative,
    ContentBased,
    Hybrid,
}

impl Default for ModelKind {
    fn default() -> Self {
        Self::Hybrid
    }
}

impl FromStr for ModelKind {
    type Err = ConfigError;

    fn from_str(model: &str) -> Result<Self, Self::Err> {
        match model {
            "collaborative" => Ok(Self::Collaborative),
            "content_based" => Ok(Self::ContentBased),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(ConfigError::UnknownModel(model.to_string())),
        }
    }
}

impl ModelKind {
    /// Creates the model from the precomputed scorers.
    pub fn build(
        self,
        collaborative: Arc<CollaborativeScorer>,
        content: Arc<ContentScorer>,
        config: &HybridConfig,
    ) -> Box<dyn Recommender> {
        match self {
            Self::Collaborative => Box::new(CollaborativeModel {
                collaborative,
                content,
            }),
            Self::ContentBased => Box::new(ContentBasedModel {
                collaborative,
                content,
                breadth: config.content_breadth(),
            }),
            Self::Hybrid => Box::new(HybridBlender::new(collaborative, content, config.clone())),
        }
    }
}

/// Ranks by the raw collaborative scores.
struct CollaborativeModel {
    collaborative: Arc<CollaborativeScorer>,
    content: Arc<ContentScorer>,
}

impl Recommender for CollaborativeModel {
    fn recommend_for_user(&self, user_id: UserId, top_n: usize) -> Vec<CandidateScore> {
        rank_candidates(self.collaborative.score_for_user(user_id, true), top_n)
    }

    fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore> {
        self.content.similar_items(item_id, top_n)
    }
}

/// Ranks by the content similarity to the items the user rated positively.
struct ContentBasedModel {
    collaborative: Arc<CollaborativeScorer>,
    content: Arc<ContentScorer>,
    breadth: usize,
}

impl Recommender for ContentBasedModel {
    fn recommend_for_user(&self, user_id: UserId, top_n: usize) -> Vec<CandidateScore> {
        let rated = self.collaborative.rated_items(user_id);
        let mut scores = self.content.aggregate_for_items(&rated, self.breadth);
        normalize_by_max(&mut scores);

        rank_scores(scores, top_n)
    }

    fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore> {
        self.content.similar_items(item_id, top_n)
    }
}

impl Recommender for HybridBlender {
    fn recommend_for_user(&self, user_id: UserId, top_n: usize) -> Vec<CandidateScore> {
        HybridBlender::recommend_for_user(self, user_id, top_n)
    }

    fn similar_items(&self, item_id: ItemId, top_n: usize) -> Vec<CandidateScore> {
        HybridBlender::similar_items(self, item_id, top_n)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        collaborative::SimilarityAxis,
        content::{ContentConfig, ContentProfiles},
        data::{Interaction, ItemText},
        interaction::InteractionMatrixBuilder,
    };

    fn model(kind: ModelKind) -> Box<dyn Recommender> {
        let matrix = InteractionMatrixBuilder::default()
            .build(&[
                Interaction::new(1, 101, 5.),
                Interaction::new(1, 102, 3.),
                Interaction::new(2, 101, 4.),
                Interaction::new(2, 103, 2.),
                Interaction::new(3, 104, 5.),
            ])
            .unwrap();
        let profiles = ContentProfiles::build(
            &[
                ItemText::new(101, "Action and adventure movie"),
                ItemText::new(102, "Romantic love story in Paris"),
                ItemText::new(103, "Sci-fi with space exploration"),
                ItemText::new(104, "More action and thrilling story"),
            ],
            &ContentConfig::default(),
        )
        .unwrap();

        kind.build(
            Arc::new(CollaborativeScorer::new(
                Arc::new(matrix),
                SimilarityAxis::User,
            )),
            Arc::new(ContentScorer::new(profiles)),
            &HybridConfig::default(),
        )
    }

    #[test]
    fn test_parse_model_kind() {
        assert_eq!(
            "collaborative".parse::<ModelKind>().unwrap(),
            ModelKind::Collaborative,
        );
        assert_eq!(
            "content_based".parse::<ModelKind>().unwrap(),
            ModelKind::ContentBased,
        );
        assert_eq!("hybrid".parse::<ModelKind>().unwrap(), ModelKind::Hybrid);
        assert_eq!(
            "svd".parse::<ModelKind>().unwrap_err(),
            ConfigError::UnknownModel("svd".into()),
        );
    }

    #[test]
    fn test_collaborative_model_keeps_raw_scores() {
        let recommended = model(ModelKind::Collaborative).recommend_for_user(UserId(1), 10);

        assert_eq!(recommended.len(), 2);
        assert_eq!(recommended[0].item_id, ItemId(103));
        assert!(recommended[0].score < 1.);
    }

    #[test]
    fn test_content_based_model() {
        let recommended = model(ModelKind::ContentBased).recommend_for_user(UserId(1), 10);

        assert_eq!(
            recommended,
            [CandidateScore::new(104, 1.), CandidateScore::new(103, 0.)],
        );
    }

    #[rstest]
    #[case(ModelKind::Collaborative)]
    #[case(ModelKind::ContentBased)]
    #[case(ModelKind::Hybrid)]
    fn test_models_share_properties(#[case] kind: ModelKind) {
        let model = model(kind);

        assert!(model.recommend_for_user(UserId(42), 10).is_empty());
        assert!(model.similar_items(ItemId(999), 10).is_empty());
        let similar = model.similar_items(ItemId(101), 2);
        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0].item_id, ItemId(104));
        for user in 1..=3 {
            let recommended = model.recommend_for_user(UserId(user), 1);
            assert!(recommended.len() <= 1);
        }
    }
}
