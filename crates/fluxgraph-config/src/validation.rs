//! Range checks for simulation configs.

use thiserror::Error;

/// A config field outside its allowed range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Size is not a power of two ≥ 2.
    #[error("'{field}' must be a power of two >= 2, got {value}")]
    NotPowerOfTwo {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: usize,
    },

    /// Value must be strictly positive and finite.
    #[error("'{field}' must be > 0, got {value}")]
    NotPositive {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Value must be non-negative and finite.
    #[error("'{field}' must be >= 0, got {value}")]
    Negative {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Several fields failed.
    #[error("{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accumulates field errors and folds them into one [`ValidationError`].
#[derive(Debug, Default)]
pub(crate) struct Checks(Vec<ValidationError>);

impl Checks {
    pub(crate) fn power_of_two(&mut self, field: &'static str, value: usize) -> &mut Self {
        if value < 2 || !value.is_power_of_two() {
            self.0.push(ValidationError::NotPowerOfTwo { field, value });
        }
        self
    }

    pub(crate) fn positive(&mut self, field: &'static str, value: f64) -> &mut Self {
        if !(value.is_finite() && value > 0.0) {
            self.0.push(ValidationError::NotPositive { field, value });
        }
        self
    }

    pub(crate) fn non_negative(&mut self, field: &'static str, value: f64) -> &mut Self {
        if !(value.is_finite() && value >= 0.0) {
            self.0.push(ValidationError::Negative { field, value });
        }
        self
    }

    pub(crate) fn finish(&mut self) -> ValidationResult<()> {
        let mut errors = std::mem::take(&mut self.0);
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_error_is_unwrapped() {
        let err = Checks::default().positive("dt", 0.0).finish().unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: "dt", value: 0.0 });
        assert_eq!(err.to_string(), "'dt' must be > 0, got 0");
    }

    #[test]
    fn many_errors_are_joined() {
        let err = Checks::default()
            .power_of_two("size", 6)
            .non_negative("delay", -1.0)
            .positive("speed", f64::NAN)
            .finish()
            .unwrap_err();
        let ValidationError::Multiple(errors) = &err else {
            panic!("expected Multiple, got {err:?}");
        };
        assert_eq!(errors.len(), 3);
        assert!(err.to_string().contains("'size' must be a power of two"));
    }

    #[test]
    fn valid_values_pass() {
        assert!(
            Checks::default()
                .power_of_two("size", 32)
                .positive("dt", 1.0)
                .non_negative("epsilon", 0.0)
                .finish()
                .is_ok()
        );
    }
}
