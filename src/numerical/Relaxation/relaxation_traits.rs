//! The equation provider seam of the relaxation solver.
//!
//! The solver knows nothing about the physics: at every stage of the sweep it asks a [`Difeq`]
//! implementation to linearize the discretized equations at one mesh point and write the result
//! into the scratch matrix `s`.
use nalgebra::DMatrix;
use std::ops::Range;

/// Which part of the sweep a mesh point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRegion {
    /// conditions at the first mesh point (k == k1)
    FirstBoundary,
    /// difference equations between mesh points k-1 and k
    Interior,
    /// conditions at the last mesh point (k == k2)
    LastBoundary,
}

/// Where the provider is asked to linearize and which part of `s` it has to fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshPoint {
    /// mesh index; equals `k2 = m` for the last boundary
    pub k: usize,
    /// index of the first mesh point
    pub k1: usize,
    /// one past the last mesh point
    pub k2: usize,
    /// number of equations
    pub ne: usize,
    /// rows of `s` to fill
    pub rows: Range<usize>,
    /// column of `s` receiving residuals
    pub residual_col: usize,
}

impl MeshPoint {
    pub fn region(&self) -> MeshRegion {
        if self.k == self.k1 {
            MeshRegion::FirstBoundary
        } else if self.k >= self.k2 {
            MeshRegion::LastBoundary
        } else {
            MeshRegion::Interior
        }
    }
    /// column of `s` for the derivative with respect to variable `var` at mesh point k-1
    /// (interior only), `indexv` decides the placement
    pub fn prev_col(&self, indexv: &[usize], var: usize) -> usize {
        indexv[var]
    }
    /// column of `s` for the derivative with respect to variable `var` at mesh point k
    /// (or at the boundary point for the boundary regions)
    pub fn this_col(&self, indexv: &[usize], var: usize) -> usize {
        self.ne + indexv[var]
    }
    /// mesh column of `y` the boundary conditions are evaluated at
    pub fn boundary_point(&self) -> usize {
        match self.region() {
            MeshRegion::FirstBoundary => self.k1,
            _ => self.k2 - 1,
        }
    }
}

/// Difference-equation provider.
///
/// Must write, for every row in `point.rows`, the partial derivatives of the discretized
/// equations (columns placed through `indexv`) and the residual (column `point.residual_col`).
/// `s` is zeroed by the solver before every call, so only non-zero entries need to be written.
/// Must be a deterministic function of `y`.
pub trait Difeq {
    fn smatrix(&self, point: &MeshPoint, indexv: &[usize], s: &mut DMatrix<f64>, y: &DMatrix<f64>);
}

impl<F> Difeq for F
where
    F: Fn(&MeshPoint, &[usize], &mut DMatrix<f64>, &DMatrix<f64>),
{
    fn smatrix(&self, point: &MeshPoint, indexv: &[usize], s: &mut DMatrix<f64>, y: &DMatrix<f64>) {
        self(point, indexv, s, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(k: usize) -> MeshPoint {
        MeshPoint {
            k,
            k1: 0,
            k2: 5,
            ne: 2,
            rows: 0..2,
            residual_col: 4,
        }
    }

    #[test]
    fn test_mesh_regions() {
        assert_eq!(point(0).region(), MeshRegion::FirstBoundary);
        assert_eq!(point(3).region(), MeshRegion::Interior);
        assert_eq!(point(5).region(), MeshRegion::LastBoundary);
        assert_eq!(point(0).boundary_point(), 0);
        assert_eq!(point(5).boundary_point(), 4);
    }

    #[test]
    fn test_columns_follow_indexv() {
        let p = point(2);
        let indexv = [1, 0];
        assert_eq!(p.prev_col(&indexv, 0), 1);
        assert_eq!(p.this_col(&indexv, 0), 3);
        assert_eq!(p.this_col(&indexv, 1), 2);
    }

    #[test]
    fn test_closure_is_a_provider() {
        let provider = |p: &MeshPoint, _indexv: &[usize], s: &mut DMatrix<f64>, _y: &DMatrix<f64>| {
            for i in p.rows.clone() {
                s[(i, p.residual_col)] = p.k as f64;
            }
        };
        let boxed: Box<dyn Difeq> = Box::new(provider);
        let mut s = DMatrix::zeros(2, 5);
        let y = DMatrix::zeros(2, 5);
        boxed.smatrix(&point(3), &[0, 1], &mut s, &y);
        assert_eq!(s[(1, 4)], 3.0);
    }
}
