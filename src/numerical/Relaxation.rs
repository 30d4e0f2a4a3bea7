//! Relaxation method for two-point boundary value problems (solvde/pinvs/red/bksub family).
//!
//! The unknowns live in a matrix `y` with one row per variable and one column per mesh point. A
//! user supplied equation provider ([`relaxation_traits::Difeq`]) linearizes the discretized
//! equations at every mesh point; the solver reduces the resulting block-diagonal system mesh point
//! by mesh point, back-substitutes the corrections and iterates until the normalized correction
//! drops below `conv`.
//! ```ignore
//! use RustedRelaxation::numerical::Relaxation::relaxation_settings::SolvdeSettings;
//! use RustedRelaxation::numerical::Relaxation::solvde::solvde;
//! use RustedRelaxation::numerical::Examples_and_utils::RelaxationExample;
//! let example = RelaxationExample::TwoPointGaussian;
//! let mut y = example.initial_guess();
//! let outcome = solvde(&example.settings(), &mut y, &example.difeq()?)?;
//! assert!(outcome.is_converged());
//! ```
/// offsets of the sub-blocks of s and c used by the three sweep stages
pub mod block_partition;
/// Gauss-Jordan elimination of one sub-block with implicit row scaling and full pivoting
pub mod pinvs;
/// elimination of the leading columns of s with the coefficients of the previous mesh point
pub mod red;
/// back-substitution of the recursion coefficients over the whole mesh
pub mod bksub;
/// normalized error of the corrections
pub mod errest;
pub mod relaxation_error;
pub mod relaxation_settings;
/// equation provider trait
pub mod relaxation_traits;
/// the iteration driver
pub mod solvde;
/// ready-made provider for y' = f(x, y) with trapezoid differencing
pub mod difeq_trapezoid;
pub mod relaxation_utils;
/// settings document reader
pub mod task_parser_relaxation;
/// high level api: solve with logging, statistics, save results
pub mod Relaxation_api;
