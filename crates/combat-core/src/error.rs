//! Common error infrastructure shared by every public error enum in this crate.
//!
//! # Design Principles
//!
//! - **Type Safety**: each component defines its own error enum with specific variants.
//! - **Rich Context**: errors can carry the combatant and roll index active at failure time.
//! - **Severity Classification**: errors are categorized for recovery strategies.

use crate::ids::CombatantId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same call may succeed with a different input.
    ///
    /// Examples: stack at max depth, modifier id not found on remove.
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: malformed boost DSL, negative roll index.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    ///
    /// Examples: turn order referencing an unknown combatant.
    Internal,

    /// Combat state is corrupted and cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Combatant that triggered the error, if applicable.
    pub actor: Option<CombatantId>,

    /// RNG roll index at the time of the error, if applicable.
    pub roll_index: Option<i64>,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actor: None,
            roll_index: None,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: CombatantId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_roll_index(mut self, roll_index: i64) -> Self {
        self.roll_index = Some(roll_index);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all public errors in this crate.
///
/// - All error enums should implement this trait.
/// - Use `#[derive(thiserror::Error)]` for the `Display`/`Error` impl.
/// - Classify severity by recoverability, not by how bad the outcome feels.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Static string identifier for this error variant, for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Error type for operations that never fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("this error should never be constructed")]
pub enum NeverError {}

impl CoreError for NeverError {
    fn severity(&self) -> ErrorSeverity {
        match *self {}
    }

    fn context(&self) -> Option<&ErrorContext> {
        match *self {}
    }

    fn error_code(&self) -> &'static str {
        match *self {}
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NeverError {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {}
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NeverError {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Err(serde::de::Error::custom(
            "NeverError cannot be deserialized as it represents an impossible error",
        ))
    }
}
