//! Failure taxonomy of the protocol.
//!
//! A publisher internally only knows how to signal one generic failure
//! value. [`Failure`] is the tagged union produced once at the boundary
//! where that untyped failure enters the typed world, so downstream code
//! never needs a "try to narrow, catch, fall back" idiom: classification
//! happens exactly once, and each failure is already routed when a handler
//! sees it.

use thiserror::Error;

/// The payload of the generic, untyped error channel.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Marker for application-declared failure kinds.
///
/// Any error type that can travel on the typed fault channel and be
/// narrowed back out of a [`BoxError`] qualifies; the blanket impl makes
/// the bound a shorthand rather than an opt-in.
pub trait Fault: std::error::Error + Send + Sync + 'static {}

impl<T> Fault for T where T: std::error::Error + Send + Sync + 'static {}

/// A terminal failure, already routed to one of the two channels.
#[derive(Debug)]
pub enum Failure<E> {
  /// A domain-typed, checked failure.
  Fault(E),
  /// Any other runtime error.
  Error(BoxError),
}

impl<E: Fault> Failure<E> {
  /// Classify a generic failure.
  ///
  /// If the value narrows to `E` the result is [`Failure::Fault`] carrying
  /// the narrowed value; otherwise it is [`Failure::Error`] carrying the
  /// original box untouched. Exactly one of the two, never both.
  pub fn classify(error: BoxError) -> Self {
    match error.downcast::<E>() {
      Ok(fault) => Failure::Fault(*fault),
      Err(error) => Failure::Error(error),
    }
  }

  /// Erase back to the generic channel.
  ///
  /// A fault is boxed exactly once; a generic error keeps its identity.
  pub fn into_error(self) -> BoxError {
    match self {
      Failure::Fault(fault) => Box::new(fault),
      Failure::Error(error) => error,
    }
  }

  pub fn is_fault(&self) -> bool { matches!(self, Failure::Fault(_)) }
}

/// Context lookup miss.
///
/// Local and recoverable: callers either check `contains_key` first or use
/// a defaulting accessor. Never delivered on the fault or error channels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value associated with context key `{key}`")]
pub struct KeyNotFound {
  /// The key that had no entry.
  pub key: String,
}

impl KeyNotFound {
  pub fn new(key: impl Into<String>) -> Self { KeyNotFound { key: key.into() } }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::num::ParseIntError;

  fn parse_error() -> ParseIntError { "nope".parse::<i32>().unwrap_err() }

  #[test]
  fn classify_narrows_matching_kind() {
    let erased: BoxError = Box::new(parse_error());
    let failure = Failure::<ParseIntError>::classify(erased);
    assert!(failure.is_fault());
  }

  #[test]
  fn classify_keeps_foreign_error_identity() {
    let erased: BoxError = Box::new(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
    match Failure::<ParseIntError>::classify(erased) {
      Failure::Error(error) => {
        assert_eq!(error.to_string(), "disk gone");
        assert!(error.downcast_ref::<std::io::Error>().is_some());
      }
      Failure::Fault(_) => panic!("io error must not narrow to ParseIntError"),
    }
  }

  #[test]
  fn into_error_boxes_fault_once() {
    let failure = Failure::<ParseIntError>::Fault(parse_error());
    let erased = failure.into_error();
    assert!(erased.downcast_ref::<ParseIntError>().is_some());
  }

  #[test]
  fn into_error_passes_generic_through() {
    let original: BoxError = Box::new(std::fmt::Error);
    let failure = Failure::<ParseIntError>::Error(original);
    assert!(failure.into_error().downcast_ref::<std::fmt::Error>().is_some());
  }

  #[test]
  fn key_not_found_names_the_key() {
    let err = KeyNotFound::new("trace-id");
    assert_eq!(err.to_string(), "no value associated with context key `trace-id`");
  }
}
