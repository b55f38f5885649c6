use std::str::FromStr;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// The identifier of a user.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Display, From, Into, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// The identifier of an item.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Display, From, Into, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

fn parse_id(id: &str) -> Result<u64, InputError> {
    id.trim()
        .parse()
        .map_err(|_| InputError::MalformedIdentifier(id.to_string()))
}

impl FromStr for UserId {
    type Err = InputError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        parse_id(id).map(Self)
    }
}

impl FromStr for ItemId {
    type Err = InputError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        parse_id(id).map(Self)
    }
}

/// A rating of an item given by a user.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f32,
}

impl Interaction {
    pub fn new(user_id: u64, item_id: u64, rating: f32) -> Self {
        Self {
            user_id: UserId(user_id),
            item_id: ItemId(item_id),
            rating,
        }
    }
}

/// The descriptive text of an item, a missing text counts as empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemText {
    pub item_id: ItemId,
    pub text: Option<String>,
}

impl ItemText {
    pub fn new(item_id: u64, text: impl Into<String>) -> Self {
        Self {
            item_id: ItemId(item_id),
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// A finalized set of interactions and item texts from which a snapshot is built.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub interactions: Vec<Interaction>,
    pub items: Vec<ItemText>,
}

/// A scored candidate item.
///
/// Scores are only comparable within the ranking they were computed for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub item_id: ItemId,
    pub score: f32,
}

impl CandidateScore {
    pub fn new(item_id: u64, score: f32) -> Self {
        Self {
            item_id: ItemId(item_id),
            score,
        }
    }
}
