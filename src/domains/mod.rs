//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: the capability registry, dispatcher, aggregator and the tools
//!   themselves.

pub mod tools;
