//! A hybrid recommendation engine.
//!
//! Combines collaborative filtering over a user-item rating matrix with content based
//! filtering over TF-IDF profiles of item descriptions and blends both into one ranking.

mod collaborative;
mod config;
mod content;
mod data;
mod error;
pub mod evaluation;
mod facade;
mod hybrid;
mod interaction;
mod model;
mod similarity;
mod snapshot;
mod utils;

pub use crate::{
    collaborative::{CollaborativeScorer, SimilarityAxis},
    config::{Config, Error as ConfigError},
    content::{ContentConfig, ContentConfigError, ContentProfiles, ContentScorer},
    data::{CandidateScore, Dataset, Interaction, ItemId, ItemText, UserId},
    error::{DataError, Error, InputError},
    facade::{RecommendationFacade, DEFAULT_TOP_N},
    hybrid::{HybridBlender, HybridConfig, HybridConfigError},
    interaction::{IdIndex, InteractionMatrix, InteractionMatrixBuilder},
    model::{ModelKind, Recommender},
    similarity::{cosine_similarity, l2_norm, SimilarityMatrix},
    snapshot::Snapshot,
};
