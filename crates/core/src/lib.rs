//! Shared domain types for the merx catalog service.
//!
//! This crate holds everything both the storage layer and the HTTP layer
//! need to agree on: the identity alias ([`types`]) and the bounded
//! list-query description built from untrusted request parameters
//! ([`query`]).

pub mod query;
pub mod types;
