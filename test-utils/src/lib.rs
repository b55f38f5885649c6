//! Shared helpers for the tests of the workspace.

mod approx_eq;
pub mod movies;

pub use crate::approx_eq::ApproxEqIter;
#[doc(hidden)]
pub use float_cmp::approx_eq;

use std::{
    env::var_os,
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

/// The directory of the example data relative to the workspace directory.
pub const DATA_DIR: &str = "data";

/// Resolves the path to the requested data relative to the workspace directory.
pub fn resolve_path(path: &[impl AsRef<Path>]) -> Result<PathBuf> {
    let manifest = var_os("CARGO_MANIFEST_DIR")
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "missing CARGO_MANIFEST_DIR"))?;
    let workspace = PathBuf::from(manifest)
        .parent()
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "missing cargo workspace dir"))?
        .to_path_buf();

    path.iter()
        .fold(workspace, |path, component| path.join(component))
        .canonicalize()
}

/// Resolves the path to the example ratings.
pub fn ratings_csv() -> Result<PathBuf> {
    resolve_path(&[DATA_DIR, "ratings.csv"])
}

/// Resolves the path to the example items.
pub fn items_csv() -> Result<PathBuf> {
    resolve_path(&[DATA_DIR, "items.csv"])
}
