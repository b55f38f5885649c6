use std::{
    collections::HashMap,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use hybrid_rec::{
    Config,
    Dataset,
    HybridConfig,
    Interaction,
    ItemId,
    ItemText,
    ModelKind,
    SimilarityAxis,
    UserId,
};
use log::info;
use serde::Deserialize;
use structopt::StructOpt;

/// The data files and the engine configuration shared by all commands.
#[derive(StructOpt, Debug)]
pub struct EngineArgs {
    /// The csv file with the `user_id,item_id,rating` columns.
    #[structopt(long, default_value = "data/ratings.csv")]
    pub ratings: PathBuf,

    /// The csv file with the `item_id,description` columns and an optional `tag` column.
    #[structopt(long, default_value = "data/items.csv")]
    pub items: PathBuf,

    /// The model which ranks items for users (collaborative, content_based or hybrid).
    #[structopt(long, default_value = "hybrid")]
    pub model: ModelKind,

    /// The axis of the collaborative similarities (user or item).
    #[structopt(long, default_value = "user")]
    pub axis: SimilarityAxis,

    /// The weight of the collaborative scores in the hybrid model.
    #[structopt(long, default_value = "0.7")]
    pub alpha: f32,

    /// The maximum number of collaborative candidates of the hybrid model.
    #[structopt(long, default_value = "100")]
    pub collaborative_breadth: usize,

    /// The number of similar items per rated item of the content based models.
    #[structopt(long, default_value = "20")]
    pub content_breadth: usize,

    /// The maximum size of the content vocabulary.
    #[structopt(long, default_value = "1000")]
    pub max_features: usize,

    /// The lowest valid rating, lower ratings are dropped.
    #[structopt(long, default_value = "0")]
    pub min_rating: f32,

    /// The highest valid rating, higher ratings are dropped.
    #[structopt(long, default_value = "5")]
    pub max_rating: f32,
}

impl EngineArgs {
    /// Creates the engine configuration from the arguments.
    pub fn config(&self) -> Result<Config, Error> {
        let hybrid = HybridConfig::default()
            .with_alpha(self.alpha)?
            .with_collaborative_breadth(self.collaborative_breadth)?
            .with_content_breadth(self.content_breadth)?;

        Ok(Config::default()
            .with_rating_range(self.min_rating, self.max_rating)?
            .with_max_features(self.max_features)?
            .with_axis(self.axis)
            .with_model(self.model)
            .with_hybrid(hybrid))
    }

    /// Loads and cleans the ratings and the items.
    pub fn load(&self, config: &Config) -> Result<LoadedData, Error> {
        let interactions = load_ratings(&self.ratings, config.rating_range())
            .with_context(|| format!("Loading ratings from {} failed.", self.ratings.display()))?;
        let (items, tags) = load_items(&self.items)
            .with_context(|| format!("Loading items from {} failed.", self.items.display()))?;

        Ok(LoadedData {
            dataset: Dataset {
                interactions,
                items,
            },
            tags,
        })
    }
}

/// The cleaned dataset together with the optional item tags.
pub struct LoadedData {
    pub dataset: Dataset,
    pub tags: HashMap<ItemId, String>,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    user_id: Option<u64>,
    item_id: Option<u64>,
    rating: Option<String>,
}

impl RatingRecord {
    /// Turns the record into an interaction if it is complete and its rating is valid.
    fn into_interaction(self, range: &RangeInclusive<f32>) -> Option<Interaction> {
        let rating = self.rating?.trim().parse::<f32>().ok()?;
        let interaction = Interaction {
            user_id: UserId(self.user_id?),
            item_id: ItemId(self.item_id?),
            rating,
        };

        (rating.is_finite() && range.contains(&rating)).then(|| interaction)
    }
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    item_id: Option<u64>,
    description: Option<String>,
    #[serde(default)]
    tag: Option<String>,
}

/// Loads the ratings and drops incomplete rows and invalid ratings.
fn load_ratings(path: &Path, range: &RangeInclusive<f32>) -> Result<Vec<Interaction>, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<RatingRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(clean_ratings(records, range))
}

fn clean_ratings(records: Vec<RatingRecord>, range: &RangeInclusive<f32>) -> Vec<Interaction> {
    let total = records.len();
    let interactions = records
        .into_iter()
        .filter_map(|record| record.into_interaction(range))
        .collect::<Vec<_>>();
    info!("cleaned ratings: {} -> {} rows", total, interactions.len());

    interactions
}

/// Loads the items, a missing description counts as empty.
fn load_items(path: &Path) -> Result<(Vec<ItemText>, HashMap<ItemId, String>), Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut items = Vec::new();
    let mut tags = HashMap::new();

    for record in reader.deserialize() {
        let ItemRecord {
            item_id,
            description,
            tag,
        } = record?;
        let item_id = if let Some(item_id) = item_id {
            ItemId(item_id)
        } else {
            continue;
        };
        if let Some(tag) = tag.filter(|tag| !tag.trim().is_empty()) {
            tags.insert(item_id, tag);
        }
        items.push(ItemText {
            item_id,
            text: description,
        });
    }
    info!("loaded {} items with {} tags", items.len(), tags.len());

    Ok((items, tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: Option<u64>, item_id: Option<u64>, rating: &str) -> RatingRecord {
        RatingRecord {
            user_id,
            item_id,
            rating: Some(rating.to_string()),
        }
    }

    #[test]
    fn test_clean_ratings() {
        let records = vec![
            record(Some(1), Some(101), "4.5"),
            record(Some(1), Some(102), "5.5"),
            record(Some(1), Some(103), "-1"),
            record(Some(1), Some(104), "good"),
            record(Some(1), Some(105), "NaN"),
            record(None, Some(106), "3"),
            record(Some(2), None, "3"),
            record(Some(2), Some(101), " 0 "),
            RatingRecord {
                user_id: Some(3),
                item_id: Some(101),
                rating: None,
            },
        ];

        assert_eq!(
            clean_ratings(records, &(0. ..=5.)),
            [Interaction::new(1, 101, 4.5), Interaction::new(2, 101, 0.)],
        );
    }

    #[test]
    fn test_load_example_data() {
        let ratings = test_utils::ratings_csv().unwrap();
        let items = test_utils::items_csv().unwrap();

        let interactions = load_ratings(&ratings, &(0. ..=5.)).unwrap();
        let (items, tags) = load_items(&items).unwrap();

        // one rating is out of range and one row misses its item
        assert_eq!(interactions.len(), 16);
        assert_eq!(items.len(), 8);
        assert_eq!(items[7].item_id, ItemId(108));
        assert_eq!(items[7].text(), "");
        assert_eq!(tags.len(), 7);
        assert_eq!(tags[&ItemId(103)], "scifi");
    }

    #[test]
    fn test_config() {
        let args = EngineArgs::from_iter_safe(&[
            "engine",
            "--model",
            "content_based",
            "--axis",
            "item",
            "--alpha",
            "0.25",
        ])
        .unwrap();

        let config = args.config().unwrap();

        assert_eq!(config.model(), ModelKind::ContentBased);
        assert_eq!(config.axis(), SimilarityAxis::Item);
        assert_eq!(config.hybrid().alpha(), 0.25);
    }

    #[test]
    fn test_invalid_config() {
        assert!(EngineArgs::from_iter_safe(&["engine", "--model", "svd"]).is_err());
        let args = EngineArgs::from_iter_safe(&["engine", "--alpha", "2"]).unwrap();
        assert!(args.config().is_err());
    }
}
