use std::ops::RangeInclusive;

use displaydoc::Display;
use thiserror::Error;

use crate::{
    collaborative::SimilarityAxis,
    content::{ContentConfig, ContentConfigError},
    hybrid::{HybridConfig, HybridConfigError},
    model::ModelKind,
};

/// The configuration of a recommendation snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    rating_range: RangeInclusive<f32>,
    axis: SimilarityAxis,
    model: ModelKind,
    content: ContentConfig,
    hybrid: HybridConfig,
}

/// Potential errors of the configuration.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum Error {
    /// Invalid rating range, expected finite non-negative bounds with min <= max
    RatingRange,
    /// Unknown similarity axis {0:?}, expected "user" or "item"
    UnknownAxis(String),
    /// Unknown model {0:?}, expected "collaborative", "content_based" or "hybrid"
    UnknownModel(String),
    /// Invalid content configuration: {0}
    Content(#[from] ContentConfigError),
    /// Invalid hybrid configuration: {0}
    Hybrid(#[from] HybridConfigError),
}

impl Config {
    /// The range of valid ratings.
    pub fn rating_range(&self) -> &RangeInclusive<f32> {
        &self.rating_range
    }

    /// Sets the range of valid ratings.
    ///
    /// Ratings are non-negative, so collaborative scores are too and can be normalized by their
    /// maximum before they are blended.
    ///
    /// # Errors
    /// Fails if the bounds aren't finite, min is negative or greater than max.
    pub fn with_rating_range(self, min: f32, max: f32) -> Result<Self, Error> {
        if min.is_finite() && max.is_finite() && 0. <= min && min <= max {
            Ok(Self {
                rating_range: min..=max,
                ..self
            })
        } else {
            Err(Error::RatingRange)
        }
    }

    /// The axis of the collaborative similarities.
    pub fn axis(&self) -> SimilarityAxis {
        self.axis
    }

    /// Sets the axis of the collaborative similarities.
    pub fn with_axis(self, axis: SimilarityAxis) -> Self {
        Self { axis, ..self }
    }

    /// The model which ranks items for users.
    pub fn model(&self) -> ModelKind {
        self.model
    }

    /// Sets the model which ranks items for users.
    pub fn with_model(self, model: ModelKind) -> Self {
        Self { model, ..self }
    }

    pub fn content(&self) -> &ContentConfig {
        &self.content
    }

    pub fn with_content(self, content: ContentConfig) -> Self {
        Self { content, ..self }
    }

    pub fn hybrid(&self) -> &HybridConfig {
        &self.hybrid
    }

    pub fn with_hybrid(self, hybrid: HybridConfig) -> Self {
        Self { hybrid, ..self }
    }

    /// Sets the blend weight of the collaborative scores.
    ///
    /// # Errors
    /// Fails if alpha is not within `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Result<Self, Error> {
        let hybrid = self.hybrid.clone().with_alpha(alpha)?;
        Ok(Self { hybrid, ..self })
    }

    /// Sets the maximum size of the content vocabulary.
    ///
    /// # Errors
    /// Fails if the maximum is zero.
    pub fn with_max_features(self, max_features: usize) -> Result<Self, Error> {
        let content = self.content.clone().with_max_features(max_features)?;
        Ok(Self { content, ..self })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rating_range: 0. ..=5.,
            axis: SimilarityAxis::default(),
            model: ModelKind::default(),
            content: ContentConfig::default(),
            hybrid: HybridConfig::default(),
        }
    }
}
