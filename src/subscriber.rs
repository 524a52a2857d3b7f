//! Subscriber contracts.
//!
//! [`Subscriber`] is the dual-channel terminal consumer this crate
//! exposes: items on `on_next`, domain-typed faults on `on_fault`, generic
//! errors on `on_error`, completion on `on_complete`. [`RawSubscriber`] is
//! the plain single-error-channel contract the crate consumes from the
//! surrounding engine.
//!
//! Terminal methods consume `self`: a second terminal signal on the same
//! subscriber is unrepresentable, which is how the "at most one terminal
//! signal" rule is enforced without any runtime state.

use crate::{
  context::ContextView,
  error::{BoxError, Failure, Fault},
  subscription::BoxSubscription,
};

// ============================================================================
// Subscriber - the dual-channel contract
// ============================================================================

/// Terminal consumer of one dual-channel subscription.
pub trait Subscriber<Item, Err> {
  /// Receives the subscription before any other signal.
  fn on_subscribe(&mut self, subscription: BoxSubscription);

  /// Receives one item. May be called any number of times (including
  /// zero) before exactly one terminal signal.
  fn on_next(&mut self, item: Item);

  /// Terminal: the domain-typed fault channel.
  fn on_fault(self, fault: Err);

  /// Terminal: the generic error channel, reserved for values that are
  /// never faults.
  fn on_error(self, error: BoxError);

  /// Terminal: successful completion.
  fn on_complete(self);

  /// The metadata this subscriber makes visible to upstream stages.
  fn context(&self) -> &dyn ContextView;

  /// Deliver an already-routed failure to exactly one of the two failure
  /// handlers, never both, never neither.
  fn on_failure(self, failure: Failure<Err>)
  where
    Self: Sized,
  {
    match failure {
      Failure::Fault(fault) => self.on_fault(fault),
      Failure::Error(error) => self.on_error(error),
    }
  }

  /// The single point where an untyped failure enters the typed world:
  /// classify, then dispatch.
  fn on_erased_error(self, error: BoxError)
  where
    Self: Sized,
    Err: Fault,
  {
    self.on_failure(Failure::classify(error))
  }
}

/// Object-safe mirror of [`Subscriber`], enabling `Box<dyn ...>` while the
/// real trait keeps its consuming terminal methods.
pub trait DynSubscriber<Item, Err> {
  fn box_on_subscribe(&mut self, subscription: BoxSubscription);
  fn box_on_next(&mut self, item: Item);
  fn box_on_fault(self: Box<Self>, fault: Err);
  fn box_on_error(self: Box<Self>, error: BoxError);
  fn box_on_complete(self: Box<Self>);
  fn box_context(&self) -> &dyn ContextView;
}

impl<S, Item, Err> DynSubscriber<Item, Err> for S
where
  S: Subscriber<Item, Err>,
{
  fn box_on_subscribe(&mut self, subscription: BoxSubscription) { self.on_subscribe(subscription) }

  fn box_on_next(&mut self, item: Item) { self.on_next(item) }

  fn box_on_fault(self: Box<Self>, fault: Err) { (*self).on_fault(fault) }

  fn box_on_error(self: Box<Self>, error: BoxError) { (*self).on_error(error) }

  fn box_on_complete(self: Box<Self>) { (*self).on_complete() }

  fn box_context(&self) -> &dyn ContextView { self.context() }
}

/// Boxed dual-channel subscriber, the canonical subscribe argument.
pub type BoxSubscriber<Item, Err> = Box<dyn DynSubscriber<Item, Err>>;

impl<Item, Err> Subscriber<Item, Err> for BoxSubscriber<Item, Err> {
  #[inline]
  fn on_subscribe(&mut self, subscription: BoxSubscription) {
    (**self).box_on_subscribe(subscription)
  }

  #[inline]
  fn on_next(&mut self, item: Item) { (**self).box_on_next(item) }

  #[inline]
  fn on_fault(self, fault: Err) { self.box_on_fault(fault) }

  #[inline]
  fn on_error(self, error: BoxError) { self.box_on_error(error) }

  #[inline]
  fn on_complete(self) { self.box_on_complete() }

  #[inline]
  fn context(&self) -> &dyn ContextView { (**self).box_context() }
}

// ============================================================================
// RawSubscriber - the consumed plain contract
// ============================================================================

/// Terminal consumer of a plain subscription: one error channel only.
pub trait RawSubscriber<Item> {
  fn on_subscribe(&mut self, subscription: BoxSubscription);

  fn on_next(&mut self, item: Item);

  /// Terminal: the single, untyped error channel.
  fn on_error(self, error: BoxError);

  fn on_complete(self);

  fn context(&self) -> &dyn ContextView;
}

/// Object-safe mirror of [`RawSubscriber`].
pub trait DynRawSubscriber<Item> {
  fn box_on_subscribe(&mut self, subscription: BoxSubscription);
  fn box_on_next(&mut self, item: Item);
  fn box_on_error(self: Box<Self>, error: BoxError);
  fn box_on_complete(self: Box<Self>);
  fn box_context(&self) -> &dyn ContextView;
}

impl<S, Item> DynRawSubscriber<Item> for S
where
  S: RawSubscriber<Item>,
{
  fn box_on_subscribe(&mut self, subscription: BoxSubscription) { self.on_subscribe(subscription) }

  fn box_on_next(&mut self, item: Item) { self.on_next(item) }

  fn box_on_error(self: Box<Self>, error: BoxError) { (*self).on_error(error) }

  fn box_on_complete(self: Box<Self>) { (*self).on_complete() }

  fn box_context(&self) -> &dyn ContextView { self.context() }
}

/// Boxed plain subscriber.
pub type BoxRawSubscriber<Item> = Box<dyn DynRawSubscriber<Item>>;

impl<Item> RawSubscriber<Item> for BoxRawSubscriber<Item> {
  #[inline]
  fn on_subscribe(&mut self, subscription: BoxSubscription) {
    (**self).box_on_subscribe(subscription)
  }

  #[inline]
  fn on_next(&mut self, item: Item) { (**self).box_on_next(item) }

  #[inline]
  fn on_error(self, error: BoxError) { self.box_on_error(error) }

  #[inline]
  fn on_complete(self) { self.box_on_complete() }

  #[inline]
  fn context(&self) -> &dyn ContextView { (**self).box_context() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::Context;
  use std::{cell::RefCell, num::ParseIntError, rc::Rc};

  #[derive(Clone, Default)]
  struct Log(Rc<RefCell<Vec<String>>>);

  impl Log {
    fn push(&self, entry: impl Into<String>) { self.0.borrow_mut().push(entry.into()); }

    fn entries(&self) -> Vec<String> { self.0.borrow().clone() }
  }

  struct Probe {
    log: Log,
    ctx: Context,
  }

  impl Probe {
    fn new(log: Log) -> Self { Probe { log, ctx: Context::empty() } }
  }

  impl Subscriber<i32, ParseIntError> for Probe {
    fn on_subscribe(&mut self, _subscription: BoxSubscription) { self.log.push("subscribe"); }

    fn on_next(&mut self, item: i32) { self.log.push(format!("next:{item}")); }

    fn on_fault(self, fault: ParseIntError) { self.log.push(format!("fault:{fault}")); }

    fn on_error(self, error: BoxError) { self.log.push(format!("error:{error}")); }

    fn on_complete(self) { self.log.push("complete"); }

    fn context(&self) -> &dyn ContextView { &self.ctx }
  }

  #[test]
  fn failure_routes_to_exactly_one_handler() {
    let log = Log::default();
    let fault = "x".parse::<i32>().unwrap_err();
    Probe::new(log.clone()).on_failure(Failure::Fault(fault));
    assert_eq!(log.entries().len(), 1);
    assert!(log.entries()[0].starts_with("fault:"));

    let log = Log::default();
    Probe::new(log.clone()).on_failure(Failure::Error(Box::new(std::fmt::Error)));
    assert_eq!(log.entries().len(), 1);
    assert!(log.entries()[0].starts_with("error:"));
  }

  #[test]
  fn erased_error_is_classified_once() {
    let log = Log::default();
    let erased: BoxError = Box::new("x".parse::<i32>().unwrap_err());
    Probe::new(log.clone()).on_erased_error(erased);
    assert!(log.entries()[0].starts_with("fault:"));

    let log = Log::default();
    Probe::new(log.clone()).on_erased_error(Box::new(std::fmt::Error));
    assert!(log.entries()[0].starts_with("error:"));
  }

  #[test]
  fn boxed_subscriber_forwards_signals() {
    let log = Log::default();
    let mut boxed: BoxSubscriber<i32, ParseIntError> = Box::new(Probe::new(log.clone()));
    boxed.on_next(1);
    boxed.on_complete();
    assert_eq!(log.entries(), vec!["next:1", "complete"]);
  }
}
