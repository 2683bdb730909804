//! # Bookly Client Library
//!
//! Headless client core for the Bookly appointment booking service.
//! This library drives the booking workflow, session handling, and
//! appointment management against the Bookly HTTP API, leaving rendering
//! to whichever shell embeds it.
//!
//! ## Features
//!
//! - Guided booking workflow (service, date, time slot, confirmed submission)
//! - Session guard that separates recoverable request failures from an
//!   invalid session, with once-only sign-out teardown
//! - Appointment listing, cancellation, and rescheduling
//! - Sign-in, registration, and persistent credential restore
//! - Configuration management and structured logging
//!
//! ## Modules
//!
//! - [`app`] - Application model, booking workflow, and message handling
//! - [`components`] - Message types exchanged with the embedding shell
//! - [`config`] - Configuration management and validation
//! - [`error`] - Error types and centralized error reporting
//! - [`logger`] - Logging configuration
//! - [`services`] - Session guard and navigation seam
//! - [`validation`] - Input validation
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod services;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use error::{AppError, AppResult};

// Re-export the Msg type that embedders and tests commonly need
pub use components::common::Msg;

// Re-export validation trait for broader use
pub use validation::Validator;
