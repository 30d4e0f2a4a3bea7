use crate::numerical::Relaxation::relaxation_error::ConfigError;
use itertools::Itertools;

/// Parameters of the relaxation iteration
#[derive(Debug, Clone, PartialEq)]
pub struct SolvdeSettings {
    /// maximum number of iterations
    pub itmax: usize,
    /// convergence criterion for the normalized error
    pub conv: f64,
    /// corrections are damped by slowc/error whenever the error exceeds slowc
    pub slowc: f64,
    /// typical size of every variable, weights the error estimate
    pub scalv: Vec<f64>,
    /// column of the linearization block occupied by every variable
    pub indexv: Vec<usize>,
    /// number of boundary conditions at the first mesh point
    pub nb: usize,
}

impl Default for SolvdeSettings {
    fn default() -> Self {
        SolvdeSettings {
            itmax: 100,
            conv: 1e-6,
            slowc: 1.0,
            scalv: Vec::new(),
            indexv: Vec::new(),
            nb: 0,
        }
    }
}

impl SolvdeSettings {
    /// Default iteration parameters, unit scales and identity ordering for `ne` unknowns
    pub fn for_system(ne: usize, nb: usize) -> SolvdeSettings {
        SolvdeSettings {
            scalv: vec![1.0; ne],
            indexv: (0..ne).collect(),
            nb,
            ..SolvdeSettings::default()
        }
    }

    pub fn with_itmax(mut self, itmax: usize) -> Self {
        self.itmax = itmax;
        self
    }

    pub fn with_conv(mut self, conv: f64) -> Self {
        self.conv = conv;
        self
    }

    pub fn with_slowc(mut self, slowc: f64) -> Self {
        self.slowc = slowc;
        self
    }

    pub fn with_scalv(mut self, scalv: Vec<f64>) -> Self {
        self.scalv = scalv;
        self
    }

    pub fn with_indexv(mut self, indexv: Vec<usize>) -> Self {
        self.indexv = indexv;
        self
    }

    /// Check the settings against a system of `ne` equations on `m` mesh points
    pub fn validate(&self, ne: usize, m: usize) -> Result<(), ConfigError> {
        if ne == 0 {
            return Err(ConfigError::NoEquations);
        }
        if self.nb > ne {
            return Err(ConfigError::BoundaryCount { nb: self.nb, ne });
        }
        if m < 2 {
            return Err(ConfigError::MeshTooSmall { m });
        }
        if self.itmax == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.conv.is_finite() || self.conv <= 0.0 {
            return Err(ConfigError::Conv(self.conv));
        }
        if !self.slowc.is_finite() || self.slowc <= 0.0 {
            return Err(ConfigError::Slowc(self.slowc));
        }
        if self.scalv.len() != ne {
            return Err(ConfigError::ScalvLength {
                got: self.scalv.len(),
                expected: ne,
            });
        }
        if let Some((index, &value)) = self
            .scalv
            .iter()
            .enumerate()
            .find(|(_, v)| **v == 0.0 || !v.is_finite())
        {
            return Err(ConfigError::BadScale { index, value });
        }
        if self.indexv.len() != ne {
            return Err(ConfigError::IndexvLength {
                got: self.indexv.len(),
                expected: ne,
            });
        }
        if !self.indexv.iter().all(|&j| j < ne) || !self.indexv.iter().all_unique() {
            return Err(ConfigError::NotPermutation {
                indexv: self.indexv.clone(),
                ne,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_system_is_valid() {
        let settings = SolvdeSettings::for_system(3, 1);
        assert_eq!(settings.indexv, vec![0, 1, 2]);
        assert_eq!(settings.scalv, vec![1.0; 3]);
        assert!(settings.validate(3, 10).is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let base = SolvdeSettings::for_system(2, 1);
        assert_eq!(
            SolvdeSettings { nb: 3, ..base.clone() }.validate(2, 5),
            Err(ConfigError::BoundaryCount { nb: 3, ne: 2 })
        );
        assert_eq!(base.validate(2, 1), Err(ConfigError::MeshTooSmall { m: 1 }));
        assert_eq!(base.validate(0, 5), Err(ConfigError::NoEquations));
        assert_eq!(
            base.clone().with_scalv(vec![1.0, 0.0]).validate(2, 5),
            Err(ConfigError::BadScale {
                index: 1,
                value: 0.0
            })
        );
        assert_eq!(
            base.clone().with_scalv(vec![1.0]).validate(2, 5),
            Err(ConfigError::ScalvLength {
                got: 1,
                expected: 2
            })
        );
        assert_eq!(
            base.clone().with_indexv(vec![1, 1]).validate(2, 5),
            Err(ConfigError::NotPermutation {
                indexv: vec![1, 1],
                ne: 2
            })
        );
        assert_eq!(
            base.clone().with_indexv(vec![0, 2]).validate(2, 5),
            Err(ConfigError::NotPermutation {
                indexv: vec![0, 2],
                ne: 2
            })
        );
        assert_eq!(
            base.clone().with_indexv(vec![0]).validate(2, 5),
            Err(ConfigError::IndexvLength {
                got: 1,
                expected: 2
            })
        );
        assert_eq!(
            base.clone().with_conv(0.0).validate(2, 5),
            Err(ConfigError::Conv(0.0))
        );
        assert_eq!(
            base.clone().with_slowc(-1.0).validate(2, 5),
            Err(ConfigError::Slowc(-1.0))
        );
        assert_eq!(
            base.with_itmax(0).validate(2, 5),
            Err(ConfigError::ZeroIterations)
        );
    }
}
