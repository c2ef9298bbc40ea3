//! JSON REST API over the loaded dataset snapshot.
//!
//! A thin wrapper: handlers call the ranking pipeline and the summarizer
//! and serialize their plain record types into the response envelope.

pub mod handlers;
pub mod models;
pub mod routes;
