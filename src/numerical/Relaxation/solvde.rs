/*
Driver of the relaxation method for two-point boundary value problems. One iteration visits the
first boundary, every interior interval and the last boundary. At each stop the equation provider
linearizes the discretized equations into s, red folds in the coefficients of the previous mesh
point and pinvs diagonalizes the remaining block, storing the recursion coefficients in c. bksub
then resolves the corrections for the whole mesh, errest measures them, and the corrections (damped
when they are large) are subtracted from y. The loop stops when the normalized error drops below
conv or after itmax iterations.
*/
use crate::numerical::Relaxation::bksub::bksub;
use crate::numerical::Relaxation::block_partition::{BlockPartition, SweepStage};
use crate::numerical::Relaxation::errest::{errest, worst_corrections};
use crate::numerical::Relaxation::pinvs::pinvs;
use crate::numerical::Relaxation::red::red;
use crate::numerical::Relaxation::relaxation_error::{ConfigError, SingularPivot, SolveOutcome};
use crate::numerical::Relaxation::relaxation_settings::SolvdeSettings;
use crate::numerical::Relaxation::relaxation_traits::{Difeq, MeshPoint};
use log::{debug, error, info, warn};
use nalgebra::DMatrix;
use ndarray::Array3;

/// Scratch buffers of one solve, allocated once and reused by every mesh point and iteration
#[derive(Debug, Clone)]
pub struct RelaxationWorkspace {
    /// linearization matrix, ne x (2ne+1)
    pub s: DMatrix<f64>,
    /// recursion coefficients, ne x (ne-nb+1) x (m+1)
    pub c: Array3<f64>,
    indxr: Vec<Option<usize>>,
    pscl: Vec<f64>,
}

impl RelaxationWorkspace {
    pub fn new(partition: &BlockPartition, m: usize) -> RelaxationWorkspace {
        let ne = partition.ne;
        RelaxationWorkspace {
            s: DMatrix::zeros(ne, partition.s_cols()),
            c: Array3::zeros((ne, partition.c_cols(), m + 1)),
            indxr: vec![None; ne],
            pscl: vec![0.0; ne],
        }
    }
}

/// Error and damping factor of one iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub error: f64,
    pub fac: f64,
}

pub struct Solvde {
    settings: SolvdeSettings,
    ne: usize,
    m: usize,
    partition: BlockPartition,
    workspace: RelaxationWorkspace,
    history: Vec<IterationRecord>,
}

impl Solvde {
    /// Validate the settings for a system of `ne` equations on `m` mesh points and allocate the
    /// workspace
    pub fn new(settings: SolvdeSettings, ne: usize, m: usize) -> Result<Solvde, ConfigError> {
        settings.validate(ne, m)?;
        let partition = BlockPartition::new(ne, settings.nb);
        let workspace = RelaxationWorkspace::new(&partition, m);
        Ok(Solvde {
            settings,
            ne,
            m,
            partition,
            workspace,
            history: Vec::new(),
        })
    }

    pub fn settings(&self) -> &SolvdeSettings {
        &self.settings
    }

    pub fn ne(&self) -> usize {
        self.ne
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn partition(&self) -> &BlockPartition {
        &self.partition
    }

    /// Corrections computed in the last iteration, one row per variable (before damping)
    pub fn last_corrections(&self) -> DMatrix<f64> {
        let c = &self.workspace.c;
        let indexv = &self.settings.indexv;
        DMatrix::from_fn(self.ne, self.m, |j, k| c[[indexv[j], 0, k]])
    }

    /// Run the relaxation iteration on `y` in place
    pub fn solve<D: Difeq + ?Sized>(
        &mut self,
        y: &mut DMatrix<f64>,
        difeq: &D,
    ) -> Result<SolveOutcome, ConfigError> {
        let (ne, m) = (self.ne, self.m);
        if y.nrows() != ne {
            return Err(ConfigError::GuessShape {
                rows: y.nrows(),
                ne,
            });
        }
        if y.ncols() != m {
            return Err(ConfigError::MeshMismatch {
                mesh: m,
                cols: y.ncols(),
            });
        }
        self.settings.validate(ne, m)?;
        if self.settings.nb != self.partition.nb {
            return Err(ConfigError::PartitionMismatch {
                nb: self.settings.nb,
                partition_nb: self.partition.nb,
            });
        }
        self.history.clear();
        let (k1, k2) = (0, m);
        let nvars = (ne * m) as f64;
        let mut err = f64::INFINITY;
        info!(
            "relaxation started: ne = {}, nb = {}, m = {}, itmax = {}, conv = {:e}, slowc = {}",
            ne, self.settings.nb, m, self.settings.itmax, self.settings.conv, self.settings.slowc
        );
        for it in 1..=self.settings.itmax {
            if let Err(singular) = self.sweep(y, difeq, k1, k2) {
                error!("{}", singular);
                return Ok(SolveOutcome::SingularSystem {
                    mesh_index: singular.mesh_index,
                });
            }
            bksub(&mut self.workspace.c, ne, self.settings.nb, k1, k2);

            err = errest(
                &self.workspace.c,
                &self.settings.indexv,
                &self.settings.scalv,
                k1,
                k2,
            ) / nvars;
            if !err.is_finite() {
                error!(
                    "iteration {}: non-finite error {}, the last finite iterate is kept",
                    it, err
                );
                self.history.push(IterationRecord {
                    iteration: it,
                    error: err,
                    fac: 0.0,
                });
                return Ok(SolveOutcome::NotConverged {
                    iterations: it,
                    error: err,
                });
            }
            // reduce correction when the error is large
            let fac = if err > self.settings.slowc {
                self.settings.slowc / err
            } else {
                1.0
            };
            self.apply_corrections(y, fac, k1, k2);

            info!("iteration {:>4}   error {:>12.5e}   fac {:>10.5}", it, err, fac);
            if log::log_enabled!(log::Level::Debug) {
                let worst = worst_corrections(
                    &self.workspace.c,
                    &self.settings.indexv,
                    &self.settings.scalv,
                    k1,
                    k2,
                );
                for (j, w) in worst.iter().enumerate() {
                    debug!(
                        "   variable {:>3}: max scaled correction {:>12.5e} at mesh point {}",
                        j, w.ermax, w.kmax
                    );
                }
            }
            self.history.push(IterationRecord {
                iteration: it,
                error: err,
                fac,
            });

            if err < self.settings.conv {
                info!("relaxation converged in {} iterations", it);
                return Ok(SolveOutcome::Converged {
                    iterations: it,
                    error: err,
                });
            }
        }
        warn!(
            "relaxation did not converge in {} iterations, error = {:e}",
            self.settings.itmax, err
        );
        Ok(SolveOutcome::NotConverged {
            iterations: self.settings.itmax,
            error: err,
        })
    }

    /// Forward sweep: first boundary, interior intervals, last boundary
    fn sweep<D: Difeq + ?Sized>(
        &mut self,
        y: &DMatrix<f64>,
        difeq: &D,
        k1: usize,
        k2: usize,
    ) -> Result<(), SingularPivot> {
        let indexv = &self.settings.indexv;
        let ws = &mut self.workspace;
        reduce_stage(&self.partition.first, k1, k1, k2, ws, y, indexv, difeq)?;
        for k in k1 + 1..k2 {
            reduce_stage(&self.partition.interior, k, k1, k2, ws, y, indexv, difeq)?;
        }
        reduce_stage(&self.partition.last, k2, k1, k2, ws, y, indexv, difeq)
    }

    fn apply_corrections(&self, y: &mut DMatrix<f64>, fac: f64, k1: usize, k2: usize) {
        let c = &self.workspace.c;
        for (j, &jv) in self.settings.indexv.iter().enumerate() {
            for k in k1..k2 {
                y[(j, k)] -= fac * c[[jv, 0, k]];
            }
        }
    }
}

/// Linearize at mesh point `k`, fold in the previous coefficients and diagonalize
#[allow(clippy::too_many_arguments)]
fn reduce_stage<D: Difeq + ?Sized>(
    stage: &SweepStage,
    k: usize,
    k1: usize,
    k2: usize,
    ws: &mut RelaxationWorkspace,
    y: &DMatrix<f64>,
    indexv: &[usize],
    difeq: &D,
) -> Result<(), SingularPivot> {
    let ne = ws.s.nrows();
    let point = MeshPoint {
        k,
        k1,
        k2,
        ne,
        rows: stage.rows.clone(),
        residual_col: 2 * ne,
    };
    ws.s.fill(0.0);
    difeq.smatrix(&point, indexv, &mut ws.s, y);
    if let Some(reduce) = &stage.reduce {
        red(&mut ws.s, &ws.c, reduce, k);
    }
    pinvs(
        &mut ws.s,
        &mut ws.c,
        &stage.pivot,
        k,
        &mut ws.indxr,
        &mut ws.pscl,
    )
}

/// Solve the two-point boundary value problem linearized by `difeq`, starting from (and
/// overwriting) `y`.
///
/// `y` has one row per variable and one column per mesh point. The returned outcome tells whether
/// the normalized error fell below `settings.conv`; `y` holds the last applied iterate in every
/// case.
pub fn solvde<D: Difeq + ?Sized>(
    settings: &SolvdeSettings,
    y: &mut DMatrix<f64>,
    difeq: &D,
) -> Result<SolveOutcome, ConfigError> {
    let (ne, m) = y.shape();
    let mut solver = Solvde::new(settings.clone(), ne, m)?;
    solver.solve(y, difeq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::Relaxation::relaxation_traits::MeshRegion;

    /// y' = 0, y(0) = 1
    fn constant_provider(
        p: &MeshPoint,
        indexv: &[usize],
        s: &mut DMatrix<f64>,
        y: &DMatrix<f64>,
    ) {
        match p.region() {
            MeshRegion::FirstBoundary => {
                s[(0, p.this_col(indexv, 0))] = 1.0;
                s[(0, p.residual_col)] = y[(0, 0)] - 1.0;
            }
            MeshRegion::Interior => {
                s[(0, p.prev_col(indexv, 0))] = -1.0;
                s[(0, p.this_col(indexv, 0))] = 1.0;
                s[(0, p.residual_col)] = y[(0, p.k)] - y[(0, p.k - 1)];
            }
            MeshRegion::LastBoundary => {}
        }
    }

    /// same equations with a boundary residual that is NaN for negative y
    fn log_boundary_provider(
        p: &MeshPoint,
        indexv: &[usize],
        s: &mut DMatrix<f64>,
        y: &DMatrix<f64>,
    ) {
        constant_provider(p, indexv, s, y);
        if p.region() == MeshRegion::FirstBoundary {
            s[(0, p.residual_col)] = y[(0, 0)].ln();
        }
    }

    fn settings() -> SolvdeSettings {
        SolvdeSettings::for_system(1, 1).with_itmax(10).with_conv(1e-10)
    }

    #[test]
    fn test_settings_changed_after_new_are_rejected() {
        let mut solver = Solvde::new(settings(), 1, 4).unwrap();
        assert_eq!(solver.ne(), 1);
        assert_eq!(solver.m(), 4);
        let mut y = DMatrix::zeros(1, 4);

        solver.settings.nb = 0;
        assert_eq!(
            solver.solve(&mut y, &constant_provider),
            Err(ConfigError::PartitionMismatch {
                nb: 0,
                partition_nb: 1
            })
        );
        solver.settings.nb = 1;
        solver.settings.indexv = vec![5];
        assert_eq!(
            solver.solve(&mut y, &constant_provider),
            Err(ConfigError::NotPermutation {
                indexv: vec![5],
                ne: 1
            })
        );
        // nothing was iterated
        assert!(solver.history().is_empty());
        assert_eq!(y, DMatrix::zeros(1, 4));

        solver.settings.indexv = vec![0];
        assert!(solver.solve(&mut y, &constant_provider).unwrap().is_converged());
        assert_eq!(solver.settings(), &settings());
    }

    #[test]
    fn test_non_finite_error_stops_with_last_finite_iterate() {
        let mut y = DMatrix::from_element(1, 4, -1.0);
        let mut solver = Solvde::new(settings(), 1, 4).unwrap();
        let outcome = solver.solve(&mut y, &log_boundary_provider).unwrap();
        match outcome {
            SolveOutcome::NotConverged { iterations, error } => {
                assert_eq!(iterations, 1);
                assert!(error.is_nan());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(solver.history().len(), 1);
        assert_eq!(y, DMatrix::from_element(1, 4, -1.0));
    }
}
