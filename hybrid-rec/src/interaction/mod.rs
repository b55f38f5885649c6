mod index;
mod matrix;

pub use self::{
    index::IdIndex,
    matrix::{InteractionMatrix, InteractionMatrixBuilder},
};
