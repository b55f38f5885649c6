use displaydoc::Display;
use thiserror::Error;

/// The configuration of the content profiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    max_features: usize,
    stop_words: bool,
}

/// Potential errors of the content configuration.
#[derive(Copy, Clone, Debug, Display, Error, PartialEq)]
pub enum Error {
    /// Invalid maximum number of features, expected positive value
    MaxFeatures,
}

impl Config {
    /// The maximum size of the vocabulary.
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Sets the maximum size of the vocabulary.
    ///
    /// # Errors
    /// Fails if the maximum is zero.
    pub fn with_max_features(self, max_features: usize) -> Result<Self, Error> {
        if max_features > 0 {
            Ok(Self {
                max_features,
                ..self
            })
        } else {
            Err(Error::MaxFeatures)
        }
    }

    /// Whether english stop words are removed from the vocabulary.
    pub fn stop_words(&self) -> bool {
        self.stop_words
    }

    /// Sets the stop words removal.
    pub fn with_stop_words(self, stop_words: bool) -> Self {
        Self { stop_words, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_features: 1000,
            stop_words: true,
        }
    }
}
