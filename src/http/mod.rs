//! HTTP transport layer for the dispatch protocol
//!
//! Provides the external API routing: tool execution, resource reads, and
//! the health endpoint.

pub mod handlers;
