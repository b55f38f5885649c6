use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};

#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Computes the l2 norm (euclidean metric) of a vector.
///
/// # Panics
/// Panics if the vector doesn't consist solely of real values.
pub fn l2_norm<S>(a: &ArrayBase<S, Ix1>) -> f32
where
    S: Data<Elem = f32>,
{
    let norm = a.dot(a).sqrt();
    assert!(
        norm.is_finite(),
        "vector must consist of real values only, but got:\n{:?}",
        a,
    );

    norm
}

/// Computes the cosine similarity of two vectors.
///
/// The similarity is `0` if either vector has zero magnitude.
///
/// # Panics
/// Panics if the vectors don't consist solely of real values or their shapes don't match.
pub fn cosine_similarity<S, T>(a: &ArrayBase<S, Ix1>, b: &ArrayBase<T, Ix1>) -> f32
where
    S: Data<Elem = f32>,
    T: Data<Elem = f32>,
{
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    (norm_a != 0. && norm_b != 0.)
        .then(|| a.dot(b) / norm_a / norm_b)
        .unwrap_or_default()
}

/// Cosine similarities between all pairs of rows of a table.
///
/// The matrix is symmetric and its diagonal is `1` for rows with non-zero magnitude and `0`
/// otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix(Array2<f32>);

impl SimilarityMatrix {
    /// Computes the pairwise similarities of the rows.
    ///
    /// This is quadratic in the number of rows and meant to run once at build time.
    pub fn from_rows<S>(rows: &ArrayBase<S, Ix2>) -> Self
    where
        S: Data<Elem = f32>,
    {
        let rows = rows.view();
        let len = rows.nrows();
        let norms = rows.outer_iter().map(|row| l2_norm(&row)).collect::<Vec<_>>();

        #[cfg(not(feature = "multithreaded"))]
        let indices = 0..len;
        #[cfg(feature = "multithreaded")]
        let indices = (0..len).into_par_iter();

        let rows_similarities = indices
            .map(|i| similarity_row(rows, &norms, i))
            .collect::<Vec<_>>();
        let mut similarities = Array2::zeros((len, len));
        for (mut target, row) in similarities.outer_iter_mut().zip(rows_similarities) {
            target.assign(&Array1::from(row));
        }

        let degenerate = norms.iter().filter(|&&norm| norm == 0.).count();
        if degenerate > 0 {
            warn!("{} of {} rows are zero and similar to nothing", degenerate, len);
        }
        debug!("computed {0}x{0} similarities", len);

        Self(similarities)
    }

    /// The similarities of the row at the index to all rows.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.0.row(index)
    }

    /// The similarity of the rows at the indices.
    pub fn get(&self, a: usize, b: usize) -> Option<f32> {
        self.0.get([a, b]).copied()
    }

    /// The number of rows of the similarity matrix.
    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.0.view()
    }
}

fn similarity_row(rows: ArrayView2<'_, f32>, norms: &[f32], i: usize) -> Vec<f32> {
    let row = rows.row(i);
    norms
        .iter()
        .enumerate()
        .map(|(j, &norm)| {
            if norms[i] == 0. || norm == 0. {
                0.
            } else if i == j {
                1.
            } else {
                row.dot(&rows.row(j)) / (norms[i] * norm)
            }
        })
        .collect()
}
