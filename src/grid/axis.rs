//! Monotonic coordinate axes and bracketing-index search.
//!
//! Every interpolation in the tracker starts here: a scalar query coordinate
//! is turned into the pair of neighbouring node indices and the fractional
//! position between them.

use serde::{Deserialize, Serialize};

use super::GridError;

/// What to do with a query that falls outside an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Report the query as out of domain.
    #[default]
    NoExtrapolation,
    /// Snap the query to the nearest end of the axis.
    Clamp,
}

/// Bracketing nodes for a query: `x = (1 - frac) * x[i0] + frac * x[i1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    /// Lower node index.
    pub i0: usize,
    /// Upper node index (`i0 + 1`, or `i0` on a single-node axis).
    pub i1: usize,
    /// Fractional position between the nodes, in [0, 1].
    pub frac: f64,
}

impl Bracket {
    /// A degenerate bracket sitting exactly on node `i`.
    #[inline]
    pub const fn at(i: usize) -> Self {
        Self {
            i0: i,
            i1: i,
            frac: 0.0,
        }
    }
}

/// A strictly monotonic 1-D coordinate vector.
///
/// Both increasing and decreasing axes are accepted; the bracket search
/// respects whichever direction the data runs.
///
/// # Example
///
/// ```
/// use ptrack_rs::grid::{Axis, ExtrapolationPolicy};
///
/// let axis = Axis::new(vec![0.0, 1.0, 2.0, 4.0]).unwrap();
/// let b = axis.bracket(3.0, ExtrapolationPolicy::NoExtrapolation).unwrap();
/// assert_eq!((b.i0, b.i1), (2, 3));
/// assert!((b.frac - 0.5).abs() < 1e-12);
///
/// assert!(axis.bracket(5.0, ExtrapolationPolicy::NoExtrapolation).is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    values: Vec<f64>,
    ascending: bool,
}

impl Axis {
    /// Create an axis, validating strict monotonicity.
    pub fn new(values: Vec<f64>) -> Result<Self, GridError> {
        if values.is_empty() {
            return Err(GridError::TooFewPoints { needed: 1, found: 0 });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GridError::NonMonotonic("axis contains non-finite values".into()));
        }
        let ascending = values.len() < 2 || values[1] > values[0];
        let monotonic = values
            .windows(2)
            .all(|w| if ascending { w[1] > w[0] } else { w[1] < w[0] });
        if !monotonic {
            return Err(GridError::NonMonotonic(format!(
                "axis of {} points is not strictly monotonic",
                values.len()
            )));
        }
        Ok(Self { values, ascending })
    }

    /// Extract the longitude axis from a plaid 2-D array `[ny][nx]`.
    ///
    /// Every row must repeat the first row to within `tol`.
    pub fn from_plaid_rows(
        values: &[f64],
        ny: usize,
        nx: usize,
        tol: f64,
    ) -> Result<Self, GridError> {
        if values.len() != ny * nx || ny == 0 {
            return Err(GridError::ShapeMismatch {
                what: "plaid coordinate array".into(),
                expected: (ny, nx),
                found: values.len(),
            });
        }
        let first = &values[..nx];
        for j in 1..ny {
            let row = &values[j * nx..(j + 1) * nx];
            if row.iter().zip(first).any(|(a, b)| (a - b).abs() > tol) {
                return Err(GridError::NotPlaid(format!("row {} differs from row 0", j)));
            }
        }
        Self::new(first.to_vec())
    }

    /// Extract the latitude axis from a plaid 2-D array `[ny][nx]`.
    ///
    /// Every column must repeat the first column to within `tol`.
    pub fn from_plaid_columns(
        values: &[f64],
        ny: usize,
        nx: usize,
        tol: f64,
    ) -> Result<Self, GridError> {
        if values.len() != ny * nx || nx == 0 {
            return Err(GridError::ShapeMismatch {
                what: "plaid coordinate array".into(),
                expected: (ny, nx),
                found: values.len(),
            });
        }
        let first: Vec<f64> = (0..ny).map(|j| values[j * nx]).collect();
        for j in 0..ny {
            let row = &values[j * nx..(j + 1) * nx];
            if row.iter().any(|v| (v - first[j]).abs() > tol) {
                return Err(GridError::NotPlaid(format!("row {} is not constant", j)));
            }
        }
        Self::new(first)
    }

    /// Evenly spaced axis from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, n: usize) -> Result<Self, GridError> {
        if n < 2 {
            return Err(GridError::TooFewPoints { needed: 2, found: n });
        }
        let step = (end - start) / (n - 1) as f64;
        Self::new((0..n).map(|i| start + step * i as f64).collect())
    }

    /// Node coordinates.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: axes have at least one node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest coordinate.
    #[inline]
    pub fn min(&self) -> f64 {
        if self.ascending {
            self.values[0]
        } else {
            self.values[self.values.len() - 1]
        }
    }

    /// Largest coordinate.
    #[inline]
    pub fn max(&self) -> f64 {
        if self.ascending {
            self.values[self.values.len() - 1]
        } else {
            self.values[0]
        }
    }

    /// True if `x` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min() && x <= self.max()
    }

    /// Find the bracketing nodes of `x`.
    ///
    /// Returns `None` for not-a-number queries, and for queries outside the
    /// axis under [`ExtrapolationPolicy::NoExtrapolation`]. Under
    /// [`ExtrapolationPolicy::Clamp`] an outside query maps to the end
    /// bracket with `frac` 0 or 1.
    pub fn bracket(&self, x: f64, policy: ExtrapolationPolicy) -> Option<Bracket> {
        if x.is_nan() {
            return None;
        }
        let n = self.values.len();
        if n == 1 {
            return match policy {
                ExtrapolationPolicy::Clamp => Some(Bracket::at(0)),
                ExtrapolationPolicy::NoExtrapolation => {
                    (x == self.values[0]).then(|| Bracket::at(0))
                }
            };
        }

        if !self.contains(x) {
            if policy == ExtrapolationPolicy::NoExtrapolation {
                return None;
            }
            let below_first = if self.ascending {
                x < self.values[0]
            } else {
                x > self.values[0]
            };
            return Some(if below_first {
                Bracket { i0: 0, i1: 1, frac: 0.0 }
            } else {
                Bracket {
                    i0: n - 2,
                    i1: n - 1,
                    frac: 1.0,
                }
            });
        }

        // Number of nodes at or "before" x in axis order
        let count = if self.ascending {
            self.values.partition_point(|&v| v <= x)
        } else {
            self.values.partition_point(|&v| v >= x)
        };
        let i0 = count.saturating_sub(1).min(n - 2);
        let i1 = i0 + 1;
        let frac = (x - self.values[i0]) / (self.values[i1] - self.values[i0]);
        Some(Bracket {
            i0,
            i1,
            frac: frac.clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;
    const NO_EXTRAP: ExtrapolationPolicy = ExtrapolationPolicy::NoExtrapolation;

    #[test]
    fn test_interior_bracket() {
        let axis = Axis::new(vec![10.0, 11.0, 13.0]).unwrap();
        let b = axis.bracket(12.0, NO_EXTRAP).unwrap();
        assert_eq!((b.i0, b.i1), (1, 2));
        assert!((b.frac - 0.5).abs() < TOL);
    }

    #[test]
    fn test_bracket_on_nodes() {
        let axis = Axis::new(vec![0.0, 1.0, 2.0]).unwrap();
        let first = axis.bracket(0.0, NO_EXTRAP).unwrap();
        assert_eq!((first.i0, first.i1, first.frac), (0, 1, 0.0));
        let mid = axis.bracket(1.0, NO_EXTRAP).unwrap();
        assert_eq!((mid.i0, mid.i1, mid.frac), (1, 2, 0.0));
        let last = axis.bracket(2.0, NO_EXTRAP).unwrap();
        assert_eq!((last.i0, last.i1, last.frac), (1, 2, 1.0));
    }

    #[test]
    fn test_descending_axis() {
        let axis = Axis::new(vec![3.0, 2.0, 0.0]).unwrap();
        let b = axis.bracket(1.0, NO_EXTRAP).unwrap();
        assert_eq!((b.i0, b.i1), (1, 2));
        assert!((b.frac - 0.5).abs() < TOL);
        assert_eq!(axis.min(), 0.0);
        assert_eq!(axis.max(), 3.0);
    }

    #[test]
    fn test_outside_no_extrapolation() {
        let axis = Axis::new(vec![0.0, 1.0]).unwrap();
        assert!(axis.bracket(-0.1, NO_EXTRAP).is_none());
        assert!(axis.bracket(1.1, NO_EXTRAP).is_none());
        assert!(axis.bracket(f64::NAN, NO_EXTRAP).is_none());
    }

    #[test]
    fn test_outside_clamp() {
        let axis = Axis::new(vec![0.0, 1.0, 2.0]).unwrap();
        let lo = axis.bracket(-5.0, ExtrapolationPolicy::Clamp).unwrap();
        assert_eq!((lo.i0, lo.i1, lo.frac), (0, 1, 0.0));
        let hi = axis.bracket(5.0, ExtrapolationPolicy::Clamp).unwrap();
        assert_eq!((hi.i0, hi.i1, hi.frac), (1, 2, 1.0));
    }

    #[test]
    fn test_single_node_axis() {
        let axis = Axis::new(vec![-0.5]).unwrap();
        assert_eq!(axis.bracket(-0.2, ExtrapolationPolicy::Clamp), Some(Bracket::at(0)));
        assert_eq!(axis.bracket(-0.2, NO_EXTRAP), None);
    }

    #[test]
    fn test_rejects_non_monotonic() {
        assert!(Axis::new(vec![0.0, 2.0, 1.0]).is_err());
        assert!(Axis::new(vec![0.0, 0.0]).is_err());
        assert!(Axis::new(vec![]).is_err());
    }

    #[test]
    fn test_plaid_extraction() {
        // 2 x 3 grid
        let lon = vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let lat = vec![5.0, 5.0, 5.0, 6.0, 6.0, 6.0];
        let lon_axis = Axis::from_plaid_rows(&lon, 2, 3, 1e-9).unwrap();
        let lat_axis = Axis::from_plaid_columns(&lat, 2, 3, 1e-9).unwrap();
        assert_eq!(lon_axis.values(), &[0.0, 1.0, 2.0]);
        assert_eq!(lat_axis.values(), &[5.0, 6.0]);

        let skewed = vec![0.0, 1.0, 2.0, 0.5, 1.5, 2.5];
        assert!(Axis::from_plaid_rows(&skewed, 2, 3, 1e-9).is_err());
    }

    #[test]
    fn test_linspace() {
        let axis = Axis::linspace(-1.0, 1.0, 5).unwrap();
        assert_eq!(axis.values(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
    }
}
