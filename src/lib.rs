//! Fraterny Affiliates API Library
//!
//! Admin-facing CRUD surface for influencer affiliate records: a filtered,
//! paginated list endpoint, a creation endpoint, a demo endpoint, and the
//! influencer list view that consumes them.
//!
//! # Modules
//!
//! - `app`: Router construction and middleware.
//! - `client`: HTTP client for the influencer collection endpoint.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Data models and response envelopes.
//! - `query`: Query model for influencer reads.
//! - `store`: Storage trait with Postgres and in-memory implementations.
//! - `view`: Influencer list view state, driver, and rendering.

pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod query;
pub mod store;
pub mod view;
