//! Error types and the tagged outcome of a relaxation solve.
use std::fmt;
use thiserror::Error;

/// Problems found in the task before the first iteration is started
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("boundary conditions at the first point nb = {nb} must lie in [0, ne = {ne}]")]
    BoundaryCount { nb: usize, ne: usize },

    #[error("mesh must have at least 2 points, got m = {m}")]
    MeshTooSmall { m: usize },

    #[error("system must have at least one equation")]
    NoEquations,

    #[error("scalv has length {got}, expected ne = {expected}")]
    ScalvLength { got: usize, expected: usize },

    #[error("scalv[{index}] = {value} must be finite and non-zero")]
    BadScale { index: usize, value: f64 },

    #[error("indexv has length {got}, expected ne = {expected}")]
    IndexvLength { got: usize, expected: usize },

    #[error("indexv {indexv:?} is not a permutation of 0..{ne}")]
    NotPermutation { indexv: Vec<usize>, ne: usize },

    #[error("convergence tolerance conv = {0} must be finite and positive")]
    Conv(f64),

    #[error("damping threshold slowc = {0} must be finite and positive")]
    Slowc(f64),

    #[error("itmax must be at least 1")]
    ZeroIterations,

    #[error("initial guess has {rows} rows, expected ne = {ne}")]
    GuessShape { rows: usize, ne: usize },

    #[error("mesh has {mesh} points but initial guess has {cols} columns")]
    MeshMismatch { mesh: usize, cols: usize },

    #[error("settings ask for nb = {nb}, the solver workspace was built for nb = {partition_nb}")]
    PartitionMismatch { nb: usize, partition_nb: usize },

    #[error("{given} boundary conditions given for {ne} equations")]
    BoundaryConditions { given: usize, ne: usize },

    #[error("boundary condition for variable {var}, the system has only {ne} variables")]
    UnknownVariable { var: usize, ne: usize },

    #[error("loglevel must be debug, info, warn, error or off, got {0}")]
    LogLevel(String),
}

/// Errors of the high level API: everything that is not a numerical outcome
#[derive(Debug, Error)]
pub enum RelaxationError {
    #[error("invalid task: {0}")]
    Config(#[from] ConfigError),

    #[error("settings document: {0}")]
    Settings(String),

    #[error("no result to return, the task was not solved yet")]
    NoResult,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A pivot-reduce sub-block without a usable pivot
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("degenerate linearization at mesh point {mesh_index}, row {row} has no non-zero pivot")]
pub struct SingularPivot {
    pub mesh_index: usize,
    pub row: usize,
}

/// What came out of a solve. `y` holds the last applied iterate in every case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveOutcome {
    /// normalized error dropped below `conv`
    Converged { iterations: usize, error: f64 },
    /// `itmax` iterations were spent without reaching `conv`
    NotConverged { iterations: usize, error: f64 },
    /// the linearized system could not be reduced at `mesh_index`
    SingularSystem { mesh_index: usize },
}

impl SolveOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, SolveOutcome::Converged { .. })
    }

    pub fn iterations(&self) -> Option<usize> {
        match self {
            SolveOutcome::Converged { iterations, .. }
            | SolveOutcome::NotConverged { iterations, .. } => Some(*iterations),
            SolveOutcome::SingularSystem { .. } => None,
        }
    }

    pub fn error(&self) -> Option<f64> {
        match self {
            SolveOutcome::Converged { error, .. } | SolveOutcome::NotConverged { error, .. } => {
                Some(*error)
            }
            SolveOutcome::SingularSystem { .. } => None,
        }
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Converged { iterations, error } => write!(
                f,
                "converged after {} iterations, error = {:e}",
                iterations, error
            ),
            SolveOutcome::NotConverged { iterations, error } => write!(
                f,
                "not converged after {} iterations, error = {:e}",
                iterations, error
            ),
            SolveOutcome::SingularSystem { mesh_index } => {
                write!(f, "singular linearization at mesh point {}", mesh_index)
            }
        }
    }
}
