//! # Bookly API Library
//!
//! Core client library for the Bookly appointment booking service.
//! This library provides the typed HTTP client, data models, error
//! taxonomy and persistent credential storage used by the application
//! crate.
//!
//! ## Modules
//!
//! - [`auth`] - Credential types and the persistent credential store
//! - [`client`] - Typed HTTP client for the booking API
//! - [`common`] - Common error types
//! - [`models`] - Data models for services, slots and appointments

pub mod auth;
pub mod client;
pub mod common;
pub mod models;

pub use client::{ApiClient, BookingApi, Endpoint};
pub use common::errors::ApiError;
