/*
Ready-made equation provider for first order systems y' = f(x, y) with Dirichlet conditions
at both ends. Interior intervals are discretized with the trapezoid rule:
    E_i = y_i(k) - y_i(k-1) - h/2 * ( f_i(x_k, y(k)) + f_i(x_{k-1}, y(k-1)) ) = 0
so the derivatives with respect to y(k-1) go to block A of s and those with respect to y(k)
to block B.
*/
use crate::numerical::Relaxation::relaxation_error::ConfigError;
use crate::numerical::Relaxation::relaxation_traits::{Difeq, MeshPoint, MeshRegion};
use nalgebra::{DMatrix, DVector};

pub type RhsFunction = Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>;
pub type RhsJacobian = Box<dyn Fn(f64, &DVector<f64>) -> DMatrix<f64>>;

pub struct TrapezoidDifeq {
    pub ne: usize,
    pub x_mesh: DVector<f64>,
    /// right hand side f(x, y)
    pub rhs: RhsFunction,
    /// df/dy, ne x ne
    pub jac: RhsJacobian,
    /// (variable, value) pairs fixed at the first mesh point
    pub first_bc: Vec<(usize, f64)>,
    /// (variable, value) pairs fixed at the last mesh point
    pub last_bc: Vec<(usize, f64)>,
}

impl TrapezoidDifeq {
    pub fn new(
        ne: usize,
        x_mesh: DVector<f64>,
        rhs: RhsFunction,
        jac: RhsJacobian,
        first_bc: Vec<(usize, f64)>,
        last_bc: Vec<(usize, f64)>,
    ) -> Result<TrapezoidDifeq, ConfigError> {
        let given = first_bc.len() + last_bc.len();
        if given != ne {
            return Err(ConfigError::BoundaryConditions { given, ne });
        }
        if let Some(&(var, _)) = first_bc.iter().chain(last_bc.iter()).find(|(var, _)| *var >= ne) {
            return Err(ConfigError::UnknownVariable { var, ne });
        }
        if x_mesh.len() < 2 {
            return Err(ConfigError::MeshTooSmall { m: x_mesh.len() });
        }
        Ok(TrapezoidDifeq {
            ne,
            x_mesh,
            rhs,
            jac,
            first_bc,
            last_bc,
        })
    }

    /// number of conditions at the first point
    pub fn nb(&self) -> usize {
        self.first_bc.len()
    }

    /// Column ordering putting the variables fixed at the first point in the leading columns,
    /// the rest keep their natural order
    pub fn natural_indexv(&self) -> Vec<usize> {
        let leading: Vec<usize> = self.first_bc.iter().map(|(var, _)| *var).collect();
        let rest = (0..self.ne).filter(|var| !leading.contains(var));
        let order: Vec<usize> = leading.iter().copied().chain(rest).collect();
        let mut indexv = vec![0; self.ne];
        for (col, var) in order.into_iter().enumerate() {
            indexv[var] = col;
        }
        indexv
    }
}

impl Difeq for TrapezoidDifeq {
    fn smatrix(&self, point: &MeshPoint, indexv: &[usize], s: &mut DMatrix<f64>, y: &DMatrix<f64>) {
        let res = point.residual_col;
        match point.region() {
            MeshRegion::FirstBoundary | MeshRegion::LastBoundary => {
                let conditions = if point.region() == MeshRegion::FirstBoundary {
                    &self.first_bc
                } else {
                    &self.last_bc
                };
                let kb = point.boundary_point();
                for (row, (var, value)) in point.rows.clone().zip(conditions.iter()) {
                    s[(row, point.this_col(indexv, *var))] = 1.0;
                    s[(row, res)] = y[(*var, kb)] - value;
                }
            }
            MeshRegion::Interior => {
                let k = point.k;
                let (xa, xb) = (self.x_mesh[k - 1], self.x_mesh[k]);
                let h = xb - xa;
                let ya: DVector<f64> = y.column(k - 1).into_owned();
                let yb: DVector<f64> = y.column(k).into_owned();
                let fa = (self.rhs)(xa, &ya);
                let fb = (self.rhs)(xb, &yb);
                let ja = (self.jac)(xa, &ya);
                let jb = (self.jac)(xb, &yb);
                for (i, row) in point.rows.clone().enumerate() {
                    for j in 0..self.ne {
                        let delta = if i == j { 1.0 } else { 0.0 };
                        s[(row, point.prev_col(indexv, j))] = -delta - 0.5 * h * ja[(i, j)];
                        s[(row, point.this_col(indexv, j))] = delta - 0.5 * h * jb[(i, j)];
                    }
                    s[(row, res)] = yb[i] - ya[i] - 0.5 * h * (fa[i] + fb[i]);
                }
            }
        }
    }
}
