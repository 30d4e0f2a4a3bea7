/// two-point boundary value problems with known exact solutions, used by tests, benches and main
use crate::numerical::Relaxation::difeq_trapezoid::{RhsFunction, RhsJacobian, TrapezoidDifeq};
use crate::numerical::Relaxation::relaxation_error::ConfigError;
use crate::numerical::Relaxation::relaxation_settings::SolvdeSettings;
use crate::numerical::Relaxation::relaxation_utils::uniform_mesh;
use nalgebra::{DMatrix, DVector};
use strum_macros::EnumIter;

/*
constant profile:
y' = 0, y(0) = 1
exact solution: y = 1

linear profile (second order equation split in two):
y' = z, z' = 0, y(0) = 1, y(1) = 3
exact solution: y = 1 + 2x, z = 2

two-point boundary value problem:
y'' = -(2/a)*(1 + ln(y^2))*y
y(-1) = exp(-1/a)
y(1) = exp(-1/a)
exact solution:
y(x) = exp(-x^2/a)

"Parachute Equation" with k = g = 1:
y'' + y'^2 - 1 = 0, y(0) = 0, y'(0) = 0
exact solution:
y = ln(cosh(x)), y' = tanh(x)
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum RelaxationExample {
    ConstantProfile,
    LinearProfile,
    TwoPointGaussian,
    ParachuteEquation,
}

const A: f64 = 1.0;

impl RelaxationExample {
    pub fn values(&self) -> Vec<String> {
        match self {
            RelaxationExample::ConstantProfile => vec!["y".to_string()],
            _ => vec!["y".to_string(), "z".to_string()],
        }
    }

    pub fn arg(&self) -> String {
        "x".to_string()
    }

    pub fn ne(&self) -> usize {
        self.values().len()
    }

    /// conditions at the first mesh point
    pub fn nb(&self) -> usize {
        match self {
            RelaxationExample::ParachuteEquation => 2,
            _ => 1,
        }
    }

    pub fn span(&self) -> (f64, f64) {
        match self {
            RelaxationExample::TwoPointGaussian => (-1.0, 1.0),
            _ => (0.0, 1.0),
        }
    }

    pub fn mesh_points(&self) -> usize {
        match self {
            RelaxationExample::ConstantProfile => 4,
            RelaxationExample::LinearProfile => 5,
            RelaxationExample::TwoPointGaussian => 101,
            RelaxationExample::ParachuteEquation => 51,
        }
    }

    pub fn mesh(&self) -> Result<DVector<f64>, ConfigError> {
        self.mesh_on(self.mesh_points())
    }

    /// uniform mesh of `m` points over `span()`
    pub fn mesh_on(&self, m: usize) -> Result<DVector<f64>, ConfigError> {
        let (start, end) = self.span();
        uniform_mesh(start, end, m)
    }

    pub fn settings(&self) -> SolvdeSettings {
        let settings = SolvdeSettings::for_system(self.ne(), self.nb());
        match self {
            RelaxationExample::ConstantProfile | RelaxationExample::LinearProfile => {
                settings.with_itmax(10).with_conv(1e-10)
            }
            _ => settings.with_itmax(50).with_conv(1e-10),
        }
    }

    pub fn initial_guess(&self) -> DMatrix<f64> {
        self.initial_guess_on(self.mesh_points())
    }

    pub fn initial_guess_on(&self, m: usize) -> DMatrix<f64> {
        match self {
            RelaxationExample::TwoPointGaussian => {
                DMatrix::from_fn(2, m, |j, _| if j == 0 { 0.7 } else { 0.0 })
            }
            _ => DMatrix::zeros(self.ne(), m),
        }
    }

    pub fn boundary_conditions(&self) -> (Vec<(usize, f64)>, Vec<(usize, f64)>) {
        match self {
            RelaxationExample::ConstantProfile => (vec![(0, 1.0)], vec![]),
            RelaxationExample::LinearProfile => (vec![(0, 1.0)], vec![(0, 3.0)]),
            RelaxationExample::TwoPointGaussian => {
                let y_at_ends = (-1.0 / A).exp();
                (vec![(0, y_at_ends)], vec![(0, y_at_ends)])
            }
            RelaxationExample::ParachuteEquation => (vec![(0, 0.0), (1, 0.0)], vec![]),
        }
    }

    fn rhs(&self) -> (RhsFunction, RhsJacobian) {
        match self {
            RelaxationExample::ConstantProfile => {
                let rhs: RhsFunction =
                    Box::new(|_x: f64, _y: &DVector<f64>| DVector::zeros(1));
                let jac: RhsJacobian =
                    Box::new(|_x: f64, _y: &DVector<f64>| DMatrix::zeros(1, 1));
                (rhs, jac)
            }
            RelaxationExample::LinearProfile => {
                let rhs: RhsFunction =
                    Box::new(|_x: f64, y: &DVector<f64>| DVector::from_vec(vec![y[1], 0.0]));
                let jac: RhsJacobian = Box::new(|_x: f64, _y: &DVector<f64>| {
                    DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, 0.0])
                });
                (rhs, jac)
            }
            RelaxationExample::TwoPointGaussian => {
                let rhs: RhsFunction = Box::new(|_x: f64, y: &DVector<f64>| {
                    let ln_y2 = (y[0] * y[0]).ln();
                    DVector::from_vec(vec![y[1], -(2.0 / A) * (1.0 + ln_y2) * y[0]])
                });
                let jac: RhsJacobian = Box::new(|_x: f64, y: &DVector<f64>| {
                    let ln_y2 = (y[0] * y[0]).ln();
                    DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -(2.0 / A) * (3.0 + ln_y2), 0.0])
                });
                (rhs, jac)
            }
            RelaxationExample::ParachuteEquation => {
                let rhs: RhsFunction = Box::new(|_x: f64, y: &DVector<f64>| {
                    DVector::from_vec(vec![y[1], 1.0 - y[1] * y[1]])
                });
                let jac: RhsJacobian = Box::new(|_x: f64, y: &DVector<f64>| {
                    DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 0.0, -2.0 * y[1]])
                });
                (rhs, jac)
            }
        }
    }

    /// trapezoid discretization of the problem on `mesh()`
    pub fn difeq(&self) -> Result<TrapezoidDifeq, ConfigError> {
        self.difeq_on(self.mesh()?)
    }

    pub fn difeq_on(&self, mesh: DVector<f64>) -> Result<TrapezoidDifeq, ConfigError> {
        let (rhs, jac) = self.rhs();
        let (first_bc, last_bc) = self.boundary_conditions();
        TrapezoidDifeq::new(self.ne(), mesh, rhs, jac, first_bc, last_bc)
    }

    /// exact solution on `mesh()`, one row per variable
    pub fn exact_solution(&self) -> Result<DMatrix<f64>, ConfigError> {
        let mesh = self.mesh()?;
        let exact = |j: usize, x: f64| -> f64 {
            match self {
                RelaxationExample::ConstantProfile => 1.0,
                RelaxationExample::LinearProfile => {
                    if j == 0 {
                        1.0 + 2.0 * x
                    } else {
                        2.0
                    }
                }
                RelaxationExample::TwoPointGaussian => {
                    let y = (-x * x / A).exp();
                    if j == 0 { y } else { -2.0 * x / A * y }
                }
                RelaxationExample::ParachuteEquation => {
                    if j == 0 {
                        x.cosh().ln()
                    } else {
                        x.tanh()
                    }
                }
            }
        };
        Ok(DMatrix::from_fn(self.ne(), mesh.len(), |j, k| exact(j, mesh[k])))
    }

    /// discretization error expected against the exact solution
    pub fn abs_tolerance(&self) -> f64 {
        match self {
            RelaxationExample::ConstantProfile | RelaxationExample::LinearProfile => 1e-10,
            RelaxationExample::TwoPointGaussian => 1e-3,
            RelaxationExample::ParachuteEquation => 1e-4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_examples_are_consistent() {
        for example in RelaxationExample::iter() {
            let settings = example.settings();
            assert!(settings.validate(example.ne(), example.mesh_points()).is_ok());
            let guess = example.initial_guess();
            assert_eq!(guess.shape(), (example.ne(), example.mesh_points()));
            let difeq = example.difeq().unwrap();
            assert_eq!(difeq.nb(), example.nb());
            assert_eq!(difeq.natural_indexv(), settings.indexv);
            let exact = example.exact_solution().unwrap();
            let (first_bc, last_bc) = example.boundary_conditions();
            for (var, value) in first_bc {
                assert!((exact[(var, 0)] - value).abs() < 1e-12);
            }
            for (var, value) in last_bc {
                assert!((exact[(var, example.mesh_points() - 1)] - value).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_examples_on_other_meshes() {
        let example = RelaxationExample::ParachuteEquation;
        let mesh = example.mesh_on(201).unwrap();
        assert_eq!(mesh.len(), 201);
        assert_eq!(example.initial_guess_on(201).shape(), (2, 201));
        assert!(example.difeq_on(mesh).is_ok());
        assert_eq!(
            example.mesh_on(1).err(),
            Some(ConfigError::MeshTooSmall { m: 1 })
        );
        assert!(example.difeq_on(DVector::from_vec(vec![0.0])).is_err());
    }
}
