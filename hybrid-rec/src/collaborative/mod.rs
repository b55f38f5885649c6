mod scorer;

pub use self::scorer::{CollaborativeScorer, SimilarityAxis};
