//! # publishable: a dual-channel publish/subscribe protocol
//!
//! A push-based, backpressure-aware stream protocol with **two statically
//! distinguishable failure channels**: a stream may fail with a
//! domain-typed *fault* or with a generic, untyped runtime error, and the
//! protocol routes each failure to exactly one handler deterministically.
//!
//! ## Quick Start
//!
//! ```rust
//! use publishable::prelude::*;
//!
//! from_iter(0..10).subscribe(|v| println!("value: {v}"));
//! ```
//!
//! Consuming both failure channels, with a subscription context:
//!
//! ```rust
//! use publishable::prelude::*;
//! use std::num::ParseIntError;
//!
//! let source = raise::<i32, ParseIntError>("x".parse::<i32>().unwrap_err());
//! source.subscribe_all_with(
//!   |v| println!("item: {v}"),
//!   |fault| println!("typed fault: {fault}"),
//!   |error| println!("generic error: {error}"),
//!   || println!("done"),
//!   Context::of([("trace-id", Value::new("a1b2"))]),
//! );
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Publishable`] | Repeatable source of dual-channel subscriptions |
//! | [`Subscriber`] | Consumes `on_next`, `on_fault`, `on_error` and `on_complete` |
//! | [`Subscription`] | Per-subscription demand (`request`) and `cancel` |
//! | [`Failure`] | A failure already routed to the fault or error channel |
//! | [`Context`] | Immutable metadata travelling from subscriber to publisher |
//!
//! The callback subscribe entry points request unbounded demand up front;
//! they exist for "consume everything" use, not for manual backpressure.
//!
//! [`Publishable`]: publishable::Publishable
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Failure`]: error::Failure
//! [`Context`]: context::Context

pub mod bridge;
pub mod context;
pub mod error;
pub mod prelude;
pub mod publishable;
pub mod subscriber;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;
