/*
Reads relaxation settings from a text document of the form

solver_settings
itmax: 100
conv: 1e-8
slowc: 1.0
scalv: 1.0, 1.0
indexv: 0, 1
nb: 1
logging
loglevel: info
log_to_file: false

max_iterations, tolerance and damping are accepted as other names of itmax, conv and slowc.
*/
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document_as};
use crate::numerical::Relaxation::relaxation_error::RelaxationError;
use crate::numerical::Relaxation::relaxation_settings::SolvdeSettings;
use crate::numerical::Relaxation::relaxation_utils::level_filter;
use log::info;

const SOLVER_SECTION: &str = "solver_settings";
const LOGGING_SECTION: &str = "logging";
const ALIASES: [(&str, &str); 3] = [
    ("max_iterations", "itmax"),
    ("tolerance", "conv"),
    ("damping", "slowc"),
];

/// Settings of a relaxation task read from a document
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationTask {
    pub settings: SolvdeSettings,
    pub loglevel: Option<String>,
    pub log_to_file: bool,
}

fn template() -> DocumentMap {
    let solver_keys = ["itmax", "conv", "slowc", "scalv", "indexv", "nb"];
    let logging_keys = ["loglevel", "log_to_file"];
    DocumentMap::from([
        (
            SOLVER_SECTION.to_string(),
            solver_keys.iter().map(|k| (k.to_string(), None)).collect(),
        ),
        (
            LOGGING_SECTION.to_string(),
            logging_keys.iter().map(|k| (k.to_string(), None)).collect(),
        ),
    ])
}

/// rename aliased keys; a key given under both names is an error
fn resolve_aliases(section: &mut SectionMap) -> Result<(), RelaxationError> {
    for (alias, key) in ALIASES {
        if let Some(values) = section.remove(alias) {
            if section.get(key).is_some_and(|v| v.is_some()) {
                return Err(RelaxationError::Settings(format!(
                    "{} and {} given at the same time",
                    alias, key
                )));
            }
            section.insert(key.to_string(), values);
        }
    }
    Ok(())
}

fn single<'a>(section: &'a SectionMap, key: &str) -> Result<Option<&'a Value>, RelaxationError> {
    match section.get(key) {
        Some(Some(values)) if values.len() == 1 => Ok(values.first()),
        Some(Some(values)) => Err(RelaxationError::Settings(format!(
            "{} expects a single value, got {}",
            key,
            values.len()
        ))),
        _ => Ok(None),
    }
}

fn bad_value(key: &str, value: &Value) -> RelaxationError {
    RelaxationError::Settings(format!("cannot read {} from '{}'", key, value))
}

fn get_usize(section: &SectionMap, key: &str) -> Result<Option<usize>, RelaxationError> {
    single(section, key)?
        .map(|v| v.as_usize().ok_or_else(|| bad_value(key, v)))
        .transpose()
}

fn get_float(section: &SectionMap, key: &str) -> Result<Option<f64>, RelaxationError> {
    single(section, key)?
        .map(|v| v.as_float().ok_or_else(|| bad_value(key, v)))
        .transpose()
}

fn get_list<T>(
    section: &SectionMap,
    key: &str,
    read: fn(&Value) -> Option<T>,
) -> Result<Option<Vec<T>>, RelaxationError> {
    match section.get(key) {
        Some(Some(values)) => values
            .iter()
            .map(|v| read(v).ok_or_else(|| bad_value(key, v)))
            .collect::<Result<Vec<T>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}

/// Parse the settings document for a system of `ne` unknowns. Missing itmax/conv/slowc take the
/// defaults, missing scalv/indexv take unit scales and the identity ordering; nb is required.
/// Only the document is checked here, the settings are validated against the mesh by the solver.
pub fn parse_relaxation_task(input: &str, ne: usize) -> Result<RelaxationTask, RelaxationError> {
    let mut document =
        parse_document_as(input, Some(&template())).map_err(RelaxationError::Settings)?;
    if let Some(unknown) = document
        .keys()
        .find(|title| title.as_str() != SOLVER_SECTION && title.as_str() != LOGGING_SECTION)
    {
        return Err(RelaxationError::Settings(format!("unknown section {}", unknown)));
    }
    let solver = document
        .get_mut(SOLVER_SECTION)
        .ok_or_else(|| RelaxationError::Settings(format!("missing section {}", SOLVER_SECTION)))?;
    resolve_aliases(solver)?;
    let solver = &*solver;

    let nb = get_usize(solver, "nb")?
        .ok_or_else(|| RelaxationError::Settings("nb is required".to_string()))?;
    let defaults = SolvdeSettings::for_system(ne, nb);
    let settings = SolvdeSettings {
        itmax: get_usize(solver, "itmax")?.unwrap_or(defaults.itmax),
        conv: get_float(solver, "conv")?.unwrap_or(defaults.conv),
        slowc: get_float(solver, "slowc")?.unwrap_or(defaults.slowc),
        scalv: get_list(solver, "scalv", Value::as_float)?.unwrap_or(defaults.scalv),
        indexv: get_list(solver, "indexv", Value::as_usize)?.unwrap_or(defaults.indexv),
        nb,
    };

    let logging = document.get(LOGGING_SECTION);
    let loglevel = match logging
        .map(|section| single(section, "loglevel"))
        .transpose()?
        .flatten()
    {
        Some(value) => {
            let level = value.to_string();
            level_filter(Some(&level))?;
            Some(level)
        }
        None => None,
    };
    let log_to_file = match logging
        .map(|section| single(section, "log_to_file"))
        .transpose()?
        .flatten()
    {
        Some(value) => value
            .as_boolean()
            .ok_or_else(|| bad_value("log_to_file", value))?,
        None => false,
    };
    info!("relaxation settings read: {:?}", settings);
    Ok(RelaxationTask {
        settings,
        loglevel,
        log_to_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::Relaxation::relaxation_error::ConfigError;

    #[test]
    fn test_full_document() {
        let doc = "
        solver_settings
        itmax: 40
        conv: 1e-10
        slowc: 0.5
        scalv: 1.0, 2
        indexv: 1, 0
        nb: 1
        logging
        loglevel: debug
        log_to_file: true
        ";
        let task = parse_relaxation_task(doc, 2).unwrap();
        assert_eq!(
            task.settings,
            SolvdeSettings {
                itmax: 40,
                conv: 1e-10,
                slowc: 0.5,
                scalv: vec![1.0, 2.0],
                indexv: vec![1, 0],
                nb: 1
            }
        );
        assert_eq!(task.loglevel, Some("debug".to_string()));
        assert!(task.log_to_file);
    }

    #[test]
    fn test_defaults_and_aliases() {
        let doc = "solver_settings\nmax_iterations: 7\ntolerance: 1e-4\nnb: 2";
        let task = parse_relaxation_task(doc, 3).unwrap();
        assert_eq!(task.settings.itmax, 7);
        assert_eq!(task.settings.conv, 1e-4);
        assert_eq!(task.settings.slowc, 1.0);
        assert_eq!(task.settings.scalv, vec![1.0; 3]);
        assert_eq!(task.settings.indexv, vec![0, 1, 2]);
        assert_eq!(task.loglevel, None);
        assert!(!task.log_to_file);
    }

    #[test]
    fn test_document_errors() {
        assert!(matches!(
            parse_relaxation_task("solver_settings\nitmax: 7", 1),
            Err(RelaxationError::Settings(_))
        ));
        assert!(matches!(
            parse_relaxation_task("solver_settings\nnb: 1\nitmax: 7\nmax_iterations: 8", 1),
            Err(RelaxationError::Settings(_))
        ));
        assert!(matches!(
            parse_relaxation_task("solver_settings\nnb: 1\nitmax: many", 1),
            Err(RelaxationError::Settings(_))
        ));
        assert!(matches!(
            parse_relaxation_task("solver_settings\nnb: 1\nmesh\npoints: 3", 1),
            Err(RelaxationError::Settings(_))
        ));
        assert!(matches!(
            parse_relaxation_task("solver_settings\nnb: 1\nlogging\nloglevel: loud", 1),
            Err(RelaxationError::Config(ConfigError::LogLevel(_)))
        ));
    }
}
