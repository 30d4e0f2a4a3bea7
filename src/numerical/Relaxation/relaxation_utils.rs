use crate::numerical::Relaxation::relaxation_error::ConfigError;
use log::info;
use nalgebra::DVector;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::time::Duration;
use tabled::{builder::Builder, settings::Style};

/// Report elapsed time in the most readable units
pub fn elapsed_time(elapsed: Duration) -> (String, f64) {
    let time = elapsed.as_millis();
    if time < 1000 {
        info!("Elapsed {} ms", time);
        (" ms".to_string(), time as f64)
    } else if time < 60_000 {
        info!("Elapsed {} s", elapsed.as_secs());
        (" s".to_string(), elapsed.as_secs_f64())
    } else if time < 3_600_000 {
        info!("Elapsed {} min", elapsed.as_secs() / 60);
        (" min".to_string(), elapsed.as_secs_f64() / 60.0)
    } else {
        info!("Elapsed {} h", elapsed.as_secs() / 3600);
        (" h".to_string(), elapsed.as_secs_f64() / 3600.0)
    }
}

/// Uniform mesh of `m` points on [t0, t_end]
pub fn uniform_mesh(t0: f64, t_end: f64, m: usize) -> Result<DVector<f64>, ConfigError> {
    if m < 2 {
        return Err(ConfigError::MeshTooSmall { m });
    }
    let h = (t_end - t0) / (m - 1) as f64;
    Ok(DVector::from_fn(m, |i, _| if i == m - 1 { t_end } else { t0 + i as f64 * h }))
}

/// Map a loglevel name onto a simplelog filter; None means Info
pub fn level_filter(loglevel: Option<&str>) -> Result<LevelFilter, ConfigError> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some(level) => match level.to_lowercase().as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" | "none" => Ok(LevelFilter::Off),
            _ => Err(ConfigError::LogLevel(level.to_string())),
        },
    }
}

/// Pretty-print solver statistics into the log
pub fn statistics_table(stats: &HashMap<String, String>) -> String {
    let mut table = Builder::from(stats.clone()).build();
    table.with(Style::modern_rounded());
    let table = table.to_string();
    info!("\n \n CALC STATISTICS \n \n {}", table);
    table
}
