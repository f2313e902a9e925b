use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

use crate::metadata::TypeRef;
use crate::path::PropertyPath;

/// Error kinds for mapkit operations.
///
/// The first four kinds are raised by property path resolution, the rest by
/// the metadata registry and configuration layers.
///
/// # Examples
///
/// ```rust,ignore
/// use mapkit::errors::{MappingError, ErrorKind, MappingResult};
///
/// fn example() -> MappingResult<()> {
///     Err(MappingError::new("Path must not be empty", ErrorKind::InvalidInput))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorKind {
    // Path resolution errors
    /// The token names no property of the type being searched
    UnknownProperty,
    /// Malformed segment (leading separator, digit-led name, bad characters)
    InvalidToken,
    /// The path produces more segments than the configured maximum
    PathTooLong,
    /// Empty path or unknown root type supplied by the caller
    InvalidInput,

    // Metadata errors
    /// A different descriptor is already registered under the same type name
    MetadataConflict,
    /// A type descriptor failed validation while being built
    InvalidMetadata,

    // Configuration errors
    /// The operation is not valid in the current context
    InvalidOperation,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnknownProperty => write!(f, "Unknown property"),
            ErrorKind::InvalidToken => write!(f, "Invalid token"),
            ErrorKind::PathTooLong => write!(f, "Path too long"),
            ErrorKind::InvalidInput => write!(f, "Invalid input"),
            ErrorKind::MetadataConflict => write!(f, "Metadata conflict"),
            ErrorKind::InvalidMetadata => write!(f, "Invalid metadata"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Details of a failed property reference.
///
/// Attached to `UnknownProperty` and `InvalidToken` errors so callers can
/// render "did you mean" hints or point at the offending token without
/// parsing the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyReference {
    token: String,
    searched_type: TypeRef,
    traversed: Option<PropertyPath>,
    suggestions: Vec<String>,
}

impl PropertyReference {
    pub fn new(
        token: &str,
        searched_type: TypeRef,
        traversed: Option<PropertyPath>,
        suggestions: Vec<String>,
    ) -> Self {
        PropertyReference {
            token: token.to_string(),
            searched_type,
            traversed,
            suggestions,
        }
    }

    /// The token that could not be resolved.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The type the token was searched against.
    pub fn searched_type(&self) -> &TypeRef {
        &self.searched_type
    }

    /// The chain resolved before the failure, if any segment was resolved.
    pub fn traversed(&self) -> Option<&PropertyPath> {
        self.traversed.as_ref()
    }

    /// Declared property names close to the failing token.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Custom mapkit error type.
///
/// `MappingError` carries a message, a kind, an optional cause and, for path
/// resolution failures, a [`PropertyReference`]. Errors are cheap to clone
/// so resolution failures can be cached alongside successful chains.
///
/// # Examples
///
/// ```rust,ignore
/// use mapkit::errors::{MappingError, ErrorKind};
///
/// let err = MappingError::new("Path must not be empty", ErrorKind::InvalidInput);
///
/// let cause = MappingError::new("Property 'id' declared twice", ErrorKind::InvalidMetadata);
/// let err = MappingError::new_with_cause("Failed to register User", ErrorKind::InvalidMetadata, cause);
/// ```
#[derive(Clone)]
pub struct MappingError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MappingError>>,
    reference: Option<Box<PropertyReference>>,
    backtrace: Arc<Backtrace>,
}

impl MappingError {
    /// Creates a new `MappingError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MappingError {
            message: message.to_string(),
            error_kind,
            cause: None,
            reference: None,
            backtrace: Arc::new(Backtrace::new_unresolved()),
        }
    }

    /// Creates a new `MappingError` with a cause error.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MappingError) -> Self {
        MappingError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            reference: None,
            backtrace: Arc::new(Backtrace::new_unresolved()),
        }
    }

    /// Creates a path resolution error carrying the failed property reference.
    pub fn new_with_reference(
        message: &str,
        error_kind: ErrorKind,
        reference: PropertyReference,
    ) -> Self {
        MappingError {
            message: message.to_string(),
            error_kind,
            cause: None,
            reference: Some(Box::new(reference)),
            backtrace: Arc::new(Backtrace::new_unresolved()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MappingError> {
        self.cause.as_deref()
    }

    pub fn reference(&self) -> Option<&PropertyReference> {
        self.reference.as_deref()
    }

    /// Shortcut for the suggestions of the attached property reference.
    pub fn suggestions(&self) -> &[String] {
        match &self.reference {
            Some(reference) => reference.suggestions(),
            None => &[],
        }
    }
}

impl PartialEq for MappingError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.error_kind == other.error_kind
            && self.cause == other.cause
            && self.reference == other.reference
    }
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => {
                let mut backtrace = (*self.backtrace).clone();
                backtrace.resolve();
                write!(f, "{}\n{:?}", self.message, backtrace)
            }
        }
    }
}

impl Error for MappingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for mapkit operations.
pub type MappingResult<T> = Result<T, MappingError>;

impl From<String> for MappingError {
    fn from(msg: String) -> Self {
        MappingError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MappingError {
    fn from(msg: &str) -> Self {
        MappingError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_error_new_creates_error() {
        let error = MappingError::new("An error occurred", ErrorKind::InvalidInput);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::InvalidInput);
        assert!(error.cause().is_none());
        assert!(error.reference().is_none());
        assert!(error.suggestions().is_empty());
    }

    #[test]
    fn mapping_error_new_with_cause_creates_error() {
        let cause = MappingError::new("duplicate property", ErrorKind::InvalidMetadata);
        let error = MappingError::new_with_cause(
            "registration failed",
            ErrorKind::MetadataConflict,
            cause.clone(),
        );
        assert_eq!(error.kind(), &ErrorKind::MetadataConflict);
        assert_eq!(error.cause(), Some(&cause));
        assert!(error.source().is_some());
    }

    #[test]
    fn mapping_error_with_reference_exposes_suggestions() {
        let reference = PropertyReference::new(
            "userAme",
            TypeRef::named("User"),
            None,
            vec!["userName".to_string()],
        );
        let error = MappingError::new_with_reference(
            "No property 'userAme' found for type 'User'",
            ErrorKind::UnknownProperty,
            reference,
        );
        assert_eq!(error.suggestions(), &["userName".to_string()]);
        let reference = error.reference().unwrap();
        assert_eq!(reference.token(), "userAme");
        assert_eq!(reference.searched_type(), &TypeRef::named("User"));
        assert!(reference.traversed().is_none());
    }

    #[test]
    fn mapping_error_display_is_message() {
        let error = MappingError::new("Path too long", ErrorKind::PathTooLong);
        assert_eq!(format!("{}", error), "Path too long");
    }

    #[test]
    fn mapping_error_debug_includes_cause() {
        let cause = MappingError::new("inner", ErrorKind::InternalError);
        let error = MappingError::new_with_cause("outer", ErrorKind::InternalError, cause);
        let debug = format!("{:?}", error);
        assert!(debug.starts_with("outer\nCaused by: inner"));
    }

    #[test]
    fn mapping_error_clone_is_equal() {
        let error = MappingError::new("An error occurred", ErrorKind::InvalidToken);
        assert_eq!(error.clone(), error);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::UnknownProperty.to_string(), "Unknown property");
        assert_eq!(ErrorKind::InvalidToken.to_string(), "Invalid token");
        assert_eq!(ErrorKind::PathTooLong.to_string(), "Path too long");
        assert_eq!(ErrorKind::InvalidInput.to_string(), "Invalid input");
        assert_eq!(ErrorKind::MetadataConflict.to_string(), "Metadata conflict");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn error_kind_serializes_as_variant_name() {
        let json = serde_json::to_string(&ErrorKind::PathTooLong).unwrap();
        assert_eq!(json, r#""PathTooLong""#);
    }

    #[test]
    fn from_string_is_internal_error() {
        let error: MappingError = "boom".into();
        assert_eq!(error.kind(), &ErrorKind::InternalError);
        let error: MappingError = String::from("boom").into();
        assert_eq!(error.message(), "boom");
    }
}
