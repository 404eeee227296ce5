//! Common error infrastructure for stat-core.
//!
//! The engine separates two kinds of failure:
//!
//! - **Caller mistakes** (empty ids, unknown stats, `None` conditions): logged through
//!   `tracing` and turned into no-ops. They never surface as `Err`.
//! - **Broken definitions** (inverted bounds, category bits outside the universe):
//!   returned as [`DefinitionError`] from registration so a bad data source fails loudly.

use crate::category::CategorySet;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: a definition whose minimum exceeds its maximum
    Validation,

    /// The data source itself is corrupt and loading cannot continue.
    ///
    /// Examples: category bits that no [`crate::Category`] declares
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if loading cannot continue past this error.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all stat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait StatSystemError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A stat definition violates an invariant and was not registered.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("stat `{id}` has inverted bounds: min {min} > max {max}")]
    InvertedBounds { id: String, min: f64, max: f64 },

    #[error("stat `{id}` has a NaN bound or default value")]
    NonNumericBound { id: String },

    #[error("stat `{id}` uses category bits {:#x} outside the declared universe", .categories.bits())]
    UnknownCategories { id: String, categories: CategorySet },
}

impl DefinitionError {
    /// The stat id the error refers to.
    pub fn stat_id(&self) -> &str {
        match self {
            Self::InvertedBounds { id, .. }
            | Self::NonNumericBound { id }
            | Self::UnknownCategories { id, .. } => id,
        }
    }
}

impl StatSystemError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvertedBounds { .. } | Self::NonNumericBound { .. } => {
                ErrorSeverity::Validation
            }
            Self::UnknownCategories { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvertedBounds { .. } => "DEFINITION_INVERTED_BOUNDS",
            Self::NonNumericBound { .. } => "DEFINITION_NAN_BOUND",
            Self::UnknownCategories { .. } => "DEFINITION_UNKNOWN_CATEGORIES",
        }
    }
}
