//! High level interface of the relaxation solver: a task made of names of unknowns, mesh,
//! initial guess, settings and equation provider, solved with logging and saved to txt/csv.
//!
//! ```ignore
//! let mut bvp = RelaxationBVP::from_example(RelaxationExample::ParachuteEquation)?
//!     .with_settings_document("solver_settings\nconv: 1e-10\nnb: 2\nlogging\nloglevel: warn")?;
//! let outcome = bvp.solve()?;
//! println!("{}", outcome);
//! bvp.save_to_csv(None)?;
//! ```
use crate::Utils::logger::{save_solution_to_csv, save_solution_to_file};
use crate::numerical::Examples_and_utils::RelaxationExample;
use crate::numerical::Relaxation::relaxation_error::{ConfigError, RelaxationError, SolveOutcome};
use crate::numerical::Relaxation::relaxation_settings::SolvdeSettings;
use crate::numerical::Relaxation::relaxation_traits::Difeq;
use crate::numerical::Relaxation::relaxation_utils::{elapsed_time, level_filter, statistics_table};
use crate::numerical::Relaxation::solvde::{IterationRecord, Solvde};
use crate::numerical::Relaxation::task_parser_relaxation::parse_relaxation_task;
use chrono::Local;
use log::info;
use nalgebra::{DMatrix, DVector};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct RelaxationBVP {
    /// names of unknowns, one per row of the solution
    pub values: Vec<String>,
    /// name of the independent variable
    pub arg: String,
    pub x_mesh: DVector<f64>,
    /// ne x m
    pub initial_guess: DMatrix<f64>,
    pub settings: SolvdeSettings,
    pub difeq: Box<dyn Difeq>,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
    /// directory of the log_<date>.txt file, the working directory if None
    pub log_dir: Option<PathBuf>,
    result: Option<DMatrix<f64>>,
    outcome: Option<SolveOutcome>,
    history: Vec<IterationRecord>,
    calc_statistics: HashMap<String, String>,
}

impl RelaxationBVP {
    pub fn new(
        values: Vec<String>,
        arg: String,
        x_mesh: DVector<f64>,
        initial_guess: DMatrix<f64>,
        settings: SolvdeSettings,
        difeq: Box<dyn Difeq>,
    ) -> RelaxationBVP {
        RelaxationBVP {
            values,
            arg,
            x_mesh,
            initial_guess,
            settings,
            difeq,
            loglevel: None,
            log_to_file: false,
            log_dir: None,
            result: None,
            outcome: None,
            history: Vec::new(),
            calc_statistics: HashMap::new(),
        }
    }

    pub fn from_example(example: RelaxationExample) -> Result<RelaxationBVP, RelaxationError> {
        Ok(RelaxationBVP::new(
            example.values(),
            example.arg(),
            example.mesh()?,
            example.initial_guess(),
            example.settings(),
            Box::new(example.difeq()?),
        ))
    }

    /// Replace settings and logging options with the ones read from a settings document
    pub fn with_settings_document(
        mut self,
        document: &str,
    ) -> Result<RelaxationBVP, RelaxationError> {
        let task = parse_relaxation_task(document, self.values.len())?;
        self.settings = task.settings;
        self.loglevel = task.loglevel;
        self.log_to_file = task.log_to_file;
        Ok(self)
    }

    pub fn set_logging(&mut self, loglevel: Option<String>, log_to_file: bool) {
        self.loglevel = loglevel;
        self.log_to_file = log_to_file;
    }

    /// Shapes of the task and the settings must agree before anything is solved
    pub fn task_check(&self) -> Result<(), RelaxationError> {
        let ne = self.values.len();
        let m = self.x_mesh.len();
        self.settings.validate(ne, m)?;
        if self.initial_guess.nrows() != ne {
            return Err(ConfigError::GuessShape {
                rows: self.initial_guess.nrows(),
                ne,
            }
            .into());
        }
        if self.initial_guess.ncols() != m {
            return Err(ConfigError::MeshMismatch {
                mesh: m,
                cols: self.initial_guess.ncols(),
            }
            .into());
        }
        if let Some(level) = &self.loglevel {
            level_filter(Some(level))?;
        }
        Ok(())
    }

    /// Solve without touching the logger setup
    pub fn solver(&mut self) -> Result<SolveOutcome, RelaxationError> {
        self.task_check()?;
        let begin = Instant::now();
        let mut y = self.initial_guess.clone();
        let mut solvde = Solvde::new(self.settings.clone(), self.values.len(), self.x_mesh.len())?;
        let outcome = solvde.solve(&mut y, self.difeq.as_ref())?;
        let (unit, time) = elapsed_time(begin.elapsed());

        info!("{}", outcome);
        self.history = solvde.history().to_vec();
        self.result = Some(y);
        self.outcome = Some(outcome);
        self.calc_statistics = HashMap::from([
            ("outcome".to_string(), outcome.to_string()),
            (
                "number of iterations".to_string(),
                self.history.len().to_string(),
            ),
            (
                "final error".to_string(),
                self.history
                    .last()
                    .map_or("-".to_string(), |r| format!("{:e}", r.error)),
            ),
            (
                "number of grid points".to_string(),
                self.x_mesh.len().to_string(),
            ),
            (
                "number of unknowns".to_string(),
                (self.values.len() * self.x_mesh.len()).to_string(),
            ),
            ("time elapsed".to_string(), format!("{}{}", time, unit)),
        ]);
        statistics_table(&self.calc_statistics);
        Ok(outcome)
    }

    /// Solve with a terminal logger (and a log_<date>.txt file if requested).
    /// If a logger is already installed the solve goes on with it and no log file is created.
    pub fn solve(&mut self) -> Result<SolveOutcome, RelaxationError> {
        let log_option = level_filter(self.loglevel.as_deref())?;
        if log::max_level() != log::LevelFilter::Off {
            return self.solver();
        }
        let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
        loggers.push(TermLogger::new(
            log_option,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
        if self.log_to_file {
            let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
            let name = format!("log_{}.txt", date_and_time);
            let path = self
                .log_dir
                .as_ref()
                .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name));
            loggers.push(WriteLogger::new(
                log_option,
                Config::default(),
                File::create(path)?,
            ));
        }
        match CombinedLogger::init(loggers) {
            Ok(()) => {
                let res = self.solver();
                info!(" \n \n Program ended");
                res
            }
            Err(_) => self.solver(),
        }
    }

    pub fn get_result(&self) -> Option<DMatrix<f64>> {
        self.result.clone()
    }

    pub fn outcome(&self) -> Option<SolveOutcome> {
        self.outcome
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn statistics(&self) -> &HashMap<String, String> {
        &self.calc_statistics
    }

    /// largest absolute deviation of the result from `reference` for every variable
    pub fn max_deviation(&self, reference: &DMatrix<f64>) -> Option<Vec<f64>> {
        let result = self.result.as_ref()?;
        if result.shape() != reference.shape() {
            return None;
        }
        Some(
            (result - reference)
                .row_iter()
                .map(|row| row.amax())
                .collect(),
        )
    }

    /// tab-separated table: argument and unknowns in columns, one line per mesh point
    pub fn save_to_file(&self, filename: Option<&Path>) -> Result<PathBuf, RelaxationError> {
        let result = self.result.as_ref().ok_or(RelaxationError::NoResult)?;
        let name = filename.map_or_else(|| PathBuf::from("result.txt"), Path::to_path_buf);
        save_solution_to_file(result, &self.values, &name, &self.x_mesh, &self.arg)?;
        info!("result saved to {}", name.display());
        Ok(name)
    }

    pub fn save_to_csv(&self, filename: Option<&Path>) -> Result<PathBuf, RelaxationError> {
        let result = self.result.as_ref().ok_or(RelaxationError::NoResult)?;
        let name = filename.map_or_else(|| PathBuf::from("result.csv"), Path::to_path_buf);
        save_solution_to_csv(result, &self.values, &name, &self.x_mesh, &self.arg)?;
        info!("result saved to {}", name.display());
        Ok(name)
    }
}
