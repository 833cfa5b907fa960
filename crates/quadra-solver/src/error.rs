//! Adapter error types.

use crate::VarType;

/// Error type for adapter operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A variable was tagged with a domain the backing engine cannot model.
    UnsupportedVariableType {
        /// Index of the variable being retagged.
        index: usize,
        /// The requested domain tag.
        requested: VarType,
    },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::UnsupportedVariableType { .. } => "VARIABLE_TYPE_UNSUPPORTED",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::UnsupportedVariableType { index, requested } => write!(
                f,
                "[{}] Variable {} cannot be {}: the backing engine only solves continuous problems",
                self.code(),
                index,
                requested.as_str()
            ),
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unsupported_type() {
        let err = SolverError::UnsupportedVariableType {
            index: 3,
            requested: VarType::Integer,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("VARIABLE_TYPE_UNSUPPORTED"));
        assert!(msg.contains('3'));
        assert!(msg.contains("integer"));
    }

    #[test]
    fn test_error_code() {
        let err = SolverError::UnsupportedVariableType {
            index: 0,
            requested: VarType::Binary,
        };
        assert_eq!(err.code(), "VARIABLE_TYPE_UNSUPPORTED");
    }
}
