//! Middleware-specific tests for FluentRouter
//!
//! Tests are organized by middleware type in separate modules.

mod api_negotiation;
mod catch_panic;
mod error_rendering;
mod logging;
mod request_id;
