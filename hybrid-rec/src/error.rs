use displaydoc::Display;
use thiserror::Error;

use crate::config::Error as ConfigError;

/// Errors of requests which are rejected before any scoring happens.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum InputError {
    /// Invalid number of requested results, expected a positive value
    ZeroTopN,
    /// Malformed identifier: {0:?}
    MalformedIdentifier(String),
    /// Invalid test fraction, expected value in the unit interval
    TestFraction,
}

/// Errors of degenerate data which prevent a snapshot from being built.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum DataError {
    /// The interaction set is empty
    EmptyInteractions,
    /// The vocabulary of the item descriptions is empty
    EmptyVocabulary,
    /// Non-finite rating {rating} for user {user} and item {item}
    NonFiniteRating { user: u64, item: u64, rating: f32 },
    /// The ratings are too large to compute their similarities
    NormOverflow,
    /// Rating {rating} for user {user} and item {item} is outside of [{min}, {max}]
    RatingOutOfRange {
        user: u64,
        item: u64,
        rating: f32,
        min: f32,
        max: f32,
    },
}

#[derive(Debug, Display, Error)]
pub enum Error {
    /// Invalid input: {0}
    Input(#[from] InputError),
    /// Invalid data: {0}
    Data(#[from] DataError),
    /// Invalid configuration: {0}
    Config(#[from] ConfigError),
}
