//! A small movie dataset with known similarities.

/// The `(user, item, rating)` triples.
pub const RATINGS: [(u64, u64, f32); 5] = [
    (1, 101, 5.),
    (1, 102, 3.),
    (2, 101, 4.),
    (2, 103, 2.),
    (3, 104, 5.),
];

/// The `(item, description)` pairs.
pub const DESCRIPTIONS: [(u64, &str); 4] = [
    (101, "Action and adventure movie"),
    (102, "Romantic love story in Paris"),
    (103, "Sci-fi with space exploration"),
    (104, "More action and thrilling story"),
];
