//! # Classified errors
//!
//! Every failure that leaves a pipeline component is reclassified into an
//! [`AssetError`]: a caller-facing kind (which doubles as an HTTP status), a
//! stable human-readable message, and the original cause.
//!
//! - the kind decides the severity seen by clients (bad request, missing, server fault)
//! - the cause is kept for diagnostics and dropped by [`AssetError::sanitize_for_client`]
//! - an `AssetError` can travel inside `anyhow::Error` and be recovered with
//!   [`AssetError::from_anyhow`]
//!
//! With feature `serde` the `errors` field holds per-field validation detail as
//! `serde_json::Value` and [`AssetError::to_json`] renders the response payload.

use std::fmt;

use anyhow::Error as AnyError;

/// Result type used by the pipeline crates.
pub type AssetResult<T> = std::result::Result<T, AssetError>;

/// Caller-visible failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed client input: schema, decoding or filename validation.
    BadRequest,
    /// A referenced feed or stored object is absent from the sink.
    NotFound,
    /// Retry budget exhausted, bundler rejection, unreadable stored data.
    GeneralError,
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotFound => "not-found",
            ErrorKind::GeneralError => "general-error",
        }
    }

    /// Whether the failure is the client's to fix.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(feature = "serde")]
pub type ErrorValue = serde_json::Value;

#[cfg(not(feature = "serde"))]
pub type ErrorValue = std::sync::Arc<dyn std::any::Any + Send + Sync>;

/// A classified failure.
#[derive(Debug)]
pub struct AssetError {
    pub kind: ErrorKind,
    pub message: String,
    pub errors: Option<ErrorValue>,
    pub source: Option<AnyError>,
}

impl AssetError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: ErrorValue) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Attach the original cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<AnyError>,
    {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Find an `AssetError` anywhere in an `anyhow` chain.
    pub fn from_anyhow(err: &AnyError) -> Option<&AssetError> {
        err.chain().find_map(|e| e.downcast_ref::<AssetError>())
    }

    /// Keep an `AssetError` as is, wrap anything else as a `GeneralError`.
    pub fn normalize(err: AnyError) -> AssetError {
        match err.downcast::<AssetError>() {
            Ok(asset) => asset,
            Err(other) => AssetError::new(ErrorKind::GeneralError, other.to_string()).with_source(other),
        }
    }

    /// Copy without the inner cause, safe to hand to clients.
    pub fn sanitize_for_client(&self) -> AssetError {
        AssetError {
            kind: self.kind,
            message: self.message.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(feature = "serde")]
impl AssetError {
    /// Response payload: `{name, message, code, className, errors?}`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }
}

/// Return early with a classified failure.
#[macro_export]
macro_rules! bail_asset {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::AssetError::$ctor($msg))
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::AssetError::$ctor(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kinds_map_to_http_statuses() {
        assert_eq!(AssetError::bad_request("x").code(), 400);
        assert_eq!(AssetError::not_found("x").code(), 404);
        assert_eq!(AssetError::general_error("x").code(), 500);
        assert!(ErrorKind::NotFound.is_client_error());
        assert!(!ErrorKind::GeneralError.is_client_error());
    }

    #[test]
    fn cause_is_preserved_and_sanitized_away() {
        let err = AssetError::general_error("Unable to bundle feeds as JS")
            .with_source(anyhow::anyhow!("unexpected token"));

        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("unexpected token"));
        assert!(err.sanitize_for_client().source.is_none());
        assert_eq!(err.to_string(), "GeneralError (500): Unable to bundle feeds as JS");
    }

    #[test]
    fn normalize_keeps_classified_errors() {
        let wrapped = AssetError::not_found("gone").into_anyhow();
        assert_eq!(AssetError::from_anyhow(&wrapped).map(|e| e.kind), Some(ErrorKind::NotFound));
        assert_eq!(AssetError::normalize(wrapped).kind, ErrorKind::NotFound);

        let plain = AssetError::normalize(anyhow::anyhow!("boom"));
        assert_eq!(plain.kind, ErrorKind::GeneralError);
        assert_eq!(plain.message, "boom");
    }

    fn bails() -> AssetResult<()> {
        bail_asset!(bad_request, "feed {} is invalid", "a.json");
    }

    #[test]
    fn bail_macro_formats_message() {
        let err = bails().unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
        assert_eq!(err.message, "feed a.json is invalid");
    }
}
