//! Dense cost matrix.

use crate::error::InstanceError;

/// A dense n×n cost matrix stored in row-major order.
///
/// The diagonal is never read by the solver; a complete instance only
/// specifies the `n·(n−1)` off-diagonal entries.
///
/// # Examples
///
/// ```
/// use cvrp_bnb::graph::CostMatrix;
///
/// let points = [(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)];
/// let cm = CostMatrix::from_points(&points);
/// assert!((cm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(cm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    data: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a cost matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean cost matrix from planar coordinates.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut cm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let d = (dx * dx + dy * dy).sqrt();
                cm.set(i, j, d);
                cm.set(j, i, d);
            }
        }
        cm
    }

    /// Creates a cost matrix from rows that omit the diagonal entry.
    ///
    /// Row `i` lists the costs to every `j != i` in ascending `j` order, so
    /// `data` must hold exactly `size * (size - 1)` values.
    ///
    /// ```
    /// use cvrp_bnb::graph::CostMatrix;
    ///
    /// let cm = CostMatrix::from_off_diagonal(3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(cm.get(0, 2), 2.0);
    /// assert_eq!(cm.get(1, 0), 3.0);
    /// assert_eq!(cm.get(2, 1), 6.0);
    /// ```
    pub fn from_off_diagonal(size: usize, data: Vec<f64>) -> Result<Self, InstanceError> {
        let expected = size * size.saturating_sub(1);
        if data.len() != expected {
            return Err(InstanceError::MatrixSize {
                expected,
                got: data.len(),
            });
        }
        let mut cm = Self::new(size);
        let mut values = data.into_iter();
        for i in 0..size {
            for j in (0..size).filter(|&j| j != i) {
                if let Some(cost) = values.next() {
                    cm.set(i, j, cost);
                }
            }
        }
        Ok(cm)
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: f64) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}
