//! Integrator Errors

use thiserror::Error;

/// Errors detected while creating an integrator. Rendering never starts when
/// one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegratorError {
    /// A parameter has a value the integrator cannot work with.
    #[error("invalid value {value} for parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: String,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// The integrator name is not recognized.
    #[error("unknown integrator '{0}'")]
    UnknownIntegrator(String),

    /// The film has no pixels to render.
    #[error("the image has no pixels to render")]
    EmptyImage,
}

impl IntegratorError {
    /// Returns an `InvalidParameter` error.
    ///
    /// * `name`   - Parameter name.
    /// * `value`  - The offending value.
    /// * `reason` - What the value must satisfy.
    pub fn invalid<T: ToString>(name: &'static str, value: T, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
