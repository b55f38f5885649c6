mod config;
mod profile;
mod scorer;
mod stop_words;

pub use self::{
    config::{Config as ContentConfig, Error as ContentConfigError},
    profile::ContentProfiles,
    scorer::ContentScorer,
};
