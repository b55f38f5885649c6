use ndarray::{ArrayBase, Data, Dimension, IntoDimension, Ix};

/// Asserts that two scores, rankings or score matrices are approximately equal.
///
/// Both sides are flattened in logical order and compared element by element with
/// [`float_cmp::approx_eq!`]. Supported are `f32`, arrays, slices and vectors of those and
/// ndarray arrays of any dimension.
///
/// ```
/// use ndarray::arr2;
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(f32, 0.70710677, 0.7071068);
/// assert_approx_eq!(f32, arr2(&[[1., 0.5], [0.5, 1.]]), [[1., 0.5], [0.5, 1.]]);
/// assert_approx_eq!(f32, vec![0.25, 0.125], [0.25, 0.12], epsilon = 0.01);
/// ```
///
/// `ulps` defaults to `2` and `epsilon` to `0`. Two `NaN` values count as equal, an undefined
/// score is an expected outcome in some places (e.g. metrics over nothing).
#[macro_export]
macro_rules! assert_approx_eq {
    ($t:ty, $left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = 0., ulps = 2)
    };
    ($t:ty, $left:expr, $right:expr, ulps = $ulps:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = 0., ulps = $ulps)
    };
    ($t:ty, $left:expr, $right:expr, epsilon = $epsilon:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = $epsilon, ulps = 2)
    };
    ($t:ty, $left:expr, $right:expr, epsilon = $epsilon:expr, ulps = $ulps:expr $(,)?) => {{
        let epsilon = $epsilon;
        let ulps = $ulps;
        let left = $left;
        let right = $right;
        let mut left = $crate::ApproxEqIter::flat_indexed(&left, Vec::new());
        let mut right = $crate::ApproxEqIter::flat_indexed(&right, Vec::new());
        loop {
            match (left.next(), right.next()) {
                (Some((left_index, left_value)), Some((right_index, right_value))) => {
                    std::assert_eq!(
                        left_index, right_index,
                        "shapes differ: {:?} != {:?}",
                        left_index, right_index,
                    );
                    std::assert!(
                        (left_value.is_nan() && right_value.is_nan())
                            || $crate::approx_eq!(
                                $t,
                                left_value,
                                right_value,
                                ulps = ulps,
                                epsilon = epsilon
                            ),
                        "values differ (ulps={:?}, epsilon={:?}) at index {:?}: {:?} != {:?}",
                        ulps,
                        epsilon,
                        left_index,
                        left_value,
                        right_value,
                    );
                }
                (Some((index, _)), None) => {
                    std::panic!("left side is longer, starting at index {:?}", index);
                }
                (None, Some((index, _))) => {
                    std::panic!("right side is longer, starting at index {:?}", index);
                }
                (None, None) => break,
            }
        }
    }};
}

/// Flattens a value into its `f32` leaves together with their multi-dimensional index.
///
/// Implemented on references, only meant to be used by [`assert_approx_eq!`].
pub trait ApproxEqIter<'a>: Copy {
    /// Iterates over all leaves in logical order, their indices are appended to `prefix`.
    fn flat_indexed(self, prefix: Vec<Ix>) -> Box<dyn Iterator<Item = (Vec<Ix>, f32)> + 'a>;
}

impl<'a> ApproxEqIter<'a> for &'a f32 {
    fn flat_indexed(self, prefix: Vec<Ix>) -> Box<dyn Iterator<Item = (Vec<Ix>, f32)> + 'a> {
        Box::new(std::iter::once((prefix, *self)))
    }
}

impl<'a, T: 'a> ApproxEqIter<'a> for &'a [T]
where
    &'a T: ApproxEqIter<'a>,
{
    fn flat_indexed(self, prefix: Vec<Ix>) -> Box<dyn Iterator<Item = (Vec<Ix>, f32)> + 'a> {
        Box::new(self.iter().enumerate().flat_map(move |(index, element)| {
            let mut prefix = prefix.clone();
            prefix.push(index);
            element.flat_indexed(prefix)
        }))
    }
}

impl<'a, T, const N: usize> ApproxEqIter<'a> for &'a [T; N]
where
    &'a T: ApproxEqIter<'a>,
{
    fn flat_indexed(self, prefix: Vec<Ix>) -> Box<dyn Iterator<Item = (Vec<Ix>, f32)> + 'a> {
        self.as_ref().flat_indexed(prefix)
    }
}

impl<'a, T: 'a> ApproxEqIter<'a> for &'a Vec<T>
where
    &'a T: ApproxEqIter<'a>,
{
    fn flat_indexed(self, prefix: Vec<Ix>) -> Box<dyn Iterator<Item = (Vec<Ix>, f32)> + 'a> {
        self.as_slice().flat_indexed(prefix)
    }
}

impl<'a, S, D> ApproxEqIter<'a> for &'a ArrayBase<S, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    fn flat_indexed(self, prefix: Vec<Ix>) -> Box<dyn Iterator<Item = (Vec<Ix>, f32)> + 'a> {
        Box::new(self.indexed_iter().map(move |(index, &value)| {
            let mut prefix = prefix.clone();
            prefix.extend(index.into_dimension().as_array_view().iter());
            (prefix, value)
        }))
    }
}
