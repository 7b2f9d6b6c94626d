//! Error types for roleguard
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API.
//! A denied access check is never one of these: denials flow back as
//! `bool` or [`Decision`](crate::access_control::Decision) values.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid access requirement: {0}")]
    Requirement(#[from] RequirementError),
}

/// Configuration-related errors
///
/// All of these are fatal at startup; a malformed policy table must never
/// be loaded with entries silently dropped.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Empty path pattern configured for role '{role}'")]
    EmptyPattern { role: String },

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Role '{role}' is declared more than once")]
    DuplicateRole { role: String },

    #[error("Capability '{resource}:{action}' is declared more than once")]
    DuplicateCapability { resource: String, action: String },

    #[error("Invalid requirement in {context}: {source}")]
    Requirement {
        context: String,
        #[source]
        source: RequirementError,
    },
}

/// Malformed access requirements (programmer errors)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    #[error("requirement declares no clauses")]
    NoClauses,

    #[error("requirement checks nothing: its only clause is an empty all_of list")]
    EmptyKeyList,

    #[error("permission key '{resource}:{action}' has an empty resource or action")]
    EmptyPermissionKey { resource: String, action: String },

    #[error("permission key '{0}' must have the form 'resource:action'")]
    MalformedPermissionKey(String),

    #[error("role requirement names an empty role")]
    EmptyRole,

    #[error("role requirement lists no roles")]
    EmptyRoleList,

    #[error("path requirement is empty")]
    EmptyPath,
}

/// Access denial surfaced as an error
///
/// Only produced by callers that opt into `?` propagation via
/// [`AccessGuard::require`](crate::access_control::AccessGuard::require).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Access denied for '{subject}': {reason}")]
pub struct AccessDeniedError {
    pub subject: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            subject: "anonymous".into(),
            reason: "no authenticated principal".into(),
        }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
