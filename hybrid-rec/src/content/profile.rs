use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};
use regex::Regex;

use crate::{
    content::{stop_words::is_stop_word, ContentConfig},
    data::{ItemId, ItemText},
    error::DataError,
    interaction::IdIndex,
    utils::nan_safe_f32_cmp_desc,
};

lazy_static! {
    // the pattern is a valid regex
    static ref TOKEN: Regex = Regex::new(r"(?u)\b\w\w+\b").unwrap();
}

/// Splits the text into lowercased terms of at least two word characters.
fn tokenize<'a>(text: &'a str, stop_words: bool) -> impl Iterator<Item = String> + 'a {
    TOKEN
        .find_iter(text)
        .map(|token| token.as_str().to_lowercase())
        .filter(move |term| !(stop_words && is_stop_word(term)))
}

/// TF-IDF feature vectors of the item descriptions.
///
/// The rows follow the ascending order of the item ids and the columns the alphabetical order
/// of the vocabulary. An item with an empty description has a zero row.
#[derive(Clone, Debug)]
pub struct ContentProfiles {
    items: IdIndex<ItemId>,
    vocabulary: Vec<String>,
    features: Array2<f32>,
}

impl ContentProfiles {
    /// Builds the profiles from the item texts.
    ///
    /// If an item appears several times, its last text wins. The vocabulary keeps the
    /// `max_features` terms with the highest frequency over all texts.
    ///
    /// # Errors
    /// Fails if the vocabulary is empty, e.g. because every text is empty.
    pub fn build(items: &[ItemText], config: &ContentConfig) -> Result<Self, DataError> {
        let texts = items
            .iter()
            .map(|item| (item.item_id, item.text()))
            .collect::<HashMap<_, _>>();
        let index = IdIndex::new(texts.keys().copied());
        let documents = index
            .ids()
            .iter()
            .map(|id| {
                tokenize(texts[id], config.stop_words()).fold(
                    BTreeMap::<String, f32>::new(),
                    |mut counts, term| {
                        *counts.entry(term).or_default() += 1.;
                        counts
                    },
                )
            })
            .collect::<Vec<_>>();

        let mut frequencies = BTreeMap::<&str, (f32, f32)>::new();
        for counts in &documents {
            for (term, count) in counts {
                let (total, document) = frequencies.entry(term.as_str()).or_default();
                *total += count;
                *document += 1.;
            }
        }
        if frequencies.is_empty() {
            return Err(DataError::EmptyVocabulary);
        }

        // the frequencies are iterated alphabetically and the stable sort keeps that for ties
        let vocabulary = frequencies
            .iter()
            .sorted_by(|(_, (a, _)), (_, (b, _))| nan_safe_f32_cmp_desc(a, b))
            .take(config.max_features())
            .map(|(&term, _)| term)
            .sorted()
            .collect::<Vec<_>>();

        #[allow(clippy::cast_precision_loss)] // number of items is small
        let len = documents.len() as f32;
        let idf = vocabulary
            .iter()
            .map(|term| ((1. + len) / (1. + frequencies[term].1)).ln() + 1.)
            .collect::<Vec<f32>>();

        let mut features = Array2::zeros((documents.len(), vocabulary.len()));
        for (mut row, counts) in features.outer_iter_mut().zip(&documents) {
            for (column, (term, idf)) in vocabulary.iter().zip(&idf).enumerate() {
                if let Some(count) = counts.get(*term) {
                    row[column] = count * idf;
                }
            }
        }

        debug!(
            "built content profiles of {} items over {} terms",
            index.len(),
            vocabulary.len(),
        );

        Ok(Self {
            items: index,
            vocabulary: vocabulary.into_iter().map(ToString::to_string).collect(),
            features,
        })
    }

    /// The item id to row index mapping.
    pub fn items(&self) -> &IdIndex<ItemId> {
        &self.items
    }

    /// The terms in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// The TF-IDF weights, one row per item.
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// The TF-IDF weights of the item.
    pub fn profile(&self, item_id: ItemId) -> Option<ArrayView1<'_, f32>> {
        self.items
            .index(&item_id)
            .map(|index| self.features.row(index))
    }
}
