use crate::RouteMethod;
use thiserror::Error;

/// Errors raised while registering, removing or reversing routes.
///
/// Routing itself never fails: a request that matches nothing resolves to the
/// not-found or method-not-allowed handler chain instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("ambiguous route `{method} {path}`: {reason}")]
    Ambiguous { method: RouteMethod, path: String, reason: String },

    #[error("route `{method} {path}` is already registered")]
    Duplicate { method: RouteMethod, path: String },

    #[error("invalid route pattern `{path}`: {reason}")]
    InvalidPattern { path: String, reason: String },

    #[error("route `{method} {path}` is not registered")]
    NotFound { method: RouteMethod, path: String },

    #[error("no route named `{name}`")]
    UnknownName { name: String },
}

impl RouteError {
    pub fn ambiguous<S: ToString>(method: &RouteMethod, path: &str, reason: S) -> Self {
        Self::Ambiguous { method: method.clone(), path: path.to_owned(), reason: reason.to_string() }
    }

    pub fn duplicate(method: &RouteMethod, path: &str) -> Self {
        Self::Duplicate { method: method.clone(), path: path.to_owned() }
    }

    pub fn invalid_pattern<S: ToString>(path: &str, reason: S) -> Self {
        Self::InvalidPattern { path: path.to_owned(), reason: reason.to_string() }
    }

    pub fn not_found(method: &RouteMethod, path: &str) -> Self {
        Self::NotFound { method: method.clone(), path: path.to_owned() }
    }

    pub fn unknown_name(name: &str) -> Self {
        Self::UnknownName { name: name.to_owned() }
    }
}
