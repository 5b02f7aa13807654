//! FluentRouter and middleware configuration.
//!
//! - [`router`] - Core `FluentRouter` struct and initialization
//! - [`negotiation`] - API classification middleware and API error rendering
//! - [`context`] - The [`ApiContext`] extractor handlers use to reach the lifecycle hooks
//! - [`observability`] - Request logging spans
//! - [`request`] - Request ID
//! - [`control`] - Panic catching
//! - [`builder`] - Orchestration (setup_middleware, start, router delegation)

mod builder;
mod context;
mod control;
mod negotiation;
mod observability;
mod request;
mod router;

pub use context::ApiContext;
pub use router::FluentRouter;

#[cfg(test)]
mod tests;
