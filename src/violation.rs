use jsonschema::error::ValidationErrorKind;
use std::fmt;

/// Where the offending request data was carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationContext {
    Query,
    Body,
}

impl ViolationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
        }
    }

    fn code_prefix(&self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Body => "BODY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    TypeMismatch,
    MissingRequired,
    EnumViolation,
    FormatViolation,
    PatternMismatch,
    OneOfNoMatch,
    AnyOfNoMatch,
    ConstraintViolation,
}

impl ViolationKind {
    fn code_suffix(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::MissingRequired => "MISSING_REQUIRED",
            Self::EnumViolation => "ENUM_VIOLATION",
            Self::FormatViolation => "FORMAT_VIOLATION",
            Self::PatternMismatch => "PATTERN_MISMATCH",
            Self::OneOfNoMatch => "ONEOF_NO_MATCH",
            Self::AnyOfNoMatch => "ANYOF_NO_MATCH",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
        }
    }
}

/// Maps a jsonschema error kind onto a violation kind.
///
/// Every kind maps to something; keywords without a dedicated code fall back to
/// [`ViolationKind::ConstraintViolation`].
pub fn classify(kind: &ValidationErrorKind) -> ViolationKind {
    match kind {
        ValidationErrorKind::Type { .. } => ViolationKind::TypeMismatch,
        ValidationErrorKind::Required { .. } => ViolationKind::MissingRequired,
        ValidationErrorKind::Enum { .. } => ViolationKind::EnumViolation,
        ValidationErrorKind::Format { .. } => ViolationKind::FormatViolation,
        ValidationErrorKind::Pattern { .. } => ViolationKind::PatternMismatch,
        ValidationErrorKind::OneOfNotValid { .. } => ViolationKind::OneOfNoMatch,
        ValidationErrorKind::AnyOf { .. } => ViolationKind::AnyOfNoMatch,
        _ => ViolationKind::ConstraintViolation,
    }
}

/// One violated constraint, located in the request data and in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub context: ViolationContext,
    pub location: String,
    pub schema_path: String,
    pub message: String,
}

impl Violation {
    /// Stable machine-readable code, e.g. `BODY_MISSING_REQUIRED`.
    pub fn code(&self) -> String {
        format!(
            "{}_{}",
            self.context.code_prefix(),
            self.kind.code_suffix()
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {} - {}", self.code(), self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_combine_context_and_kind() {
        let violation = Violation {
            kind: ViolationKind::EnumViolation,
            context: ViolationContext::Query,
            location: "query/genre".into(),
            schema_path: "/properties/genre/enum".into(),
            message: "\"poetry\" is not one of [\"fiction\"]".into(),
        };
        assert_eq!(violation.code(), "QUERY_ENUM_VIOLATION");
        assert!(violation.to_string().starts_with("[QUERY_ENUM_VIOLATION] at query/genre"));
    }

    #[test]
    fn context_names() {
        assert_eq!(ViolationContext::Query.as_str(), "query");
        assert_eq!(ViolationContext::Body.as_str(), "body");
    }
}
