use crate::prelude::*;

/// Subscriber built from item and generic-error handlers.
///
/// The fault slot stays a no-op: the generic-error handler only sees
/// values that are never faults.
pub struct SubscriberErr<N, E, Ctx> {
  item: N,
  error: E,
  context: Ctx,
  handle: CancelHandle,
}

impl<N, E, Ctx> SubscriberErr<N, E, Ctx> {
  pub fn new(item: N, error: E, context: Ctx) -> Self {
    SubscriberErr { item, error, context, handle: CancelHandle::new() }
  }

  pub fn handle(&self) -> CancelHandle { self.handle.clone() }
}

impl<Item, Err, N, E, Ctx> Subscriber<Item, Err> for SubscriberErr<N, E, Ctx>
where
  N: FnMut(Item),
  E: FnOnce(BoxError),
  Ctx: ContextView,
{
  fn on_subscribe(&mut self, mut subscription: BoxSubscription) {
    subscription.request(UNBOUNDED);
    self.handle.attach(subscription);
  }

  #[inline]
  fn on_next(&mut self, item: Item) { (self.item)(item); }

  #[inline]
  fn on_fault(self, _fault: Err) {}

  #[inline]
  fn on_error(self, error: BoxError) { (self.error)(error); }

  #[inline]
  fn on_complete(self) {}

  #[inline]
  fn context(&self) -> &dyn ContextView { &self.context }
}

pub trait SubscribeErr<N, E> {
  /// Subscribe with item and generic-error handlers and an empty context.
  fn subscribe_err(&self, item: N, error: E) -> CancelHandle;

  /// Same, with an explicit context visible to upstream stages.
  fn subscribe_err_with<Ctx>(&self, item: N, error: E, context: Ctx) -> CancelHandle
  where
    Ctx: ContextView + 'static;
}

impl<P, N, E> SubscribeErr<N, E> for P
where
  P: Publishable,
  N: FnMut(P::Item) + 'static,
  E: FnOnce(BoxError) + 'static,
{
  fn subscribe_err(&self, item: N, error: E) -> CancelHandle {
    self.subscribe_err_with(item, error, Context::empty())
  }

  fn subscribe_err_with<Ctx>(&self, item: N, error: E, context: Ctx) -> CancelHandle
  where
    Ctx: ContextView + 'static,
  {
    let subscriber = SubscriberErr::new(item, error, context);
    let handle = subscriber.handle();
    self.actual_subscribe(Box::new(subscriber));
    handle
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::publishable::{raise, throw};
  use std::{cell::RefCell, num::ParseIntError, rc::Rc};

  #[test]
  fn generic_error_reaches_the_handler() {
    let errors = Rc::new(RefCell::new(0));
    let e = errors.clone();
    throw::<i32, ParseIntError, _>(std::fmt::Error)
      .subscribe_err(|_| {}, move |_| *e.borrow_mut() += 1);
    assert_eq!(*errors.borrow(), 1);
  }

  #[test]
  fn fault_stays_on_its_own_channel() {
    let errors = Rc::new(RefCell::new(0));
    let e = errors.clone();
    let fault = "x".parse::<i32>().unwrap_err();
    raise::<i32, ParseIntError>(fault).subscribe_err(|_| {}, move |_| *e.borrow_mut() += 1);
    // The fault slot is a no-op here; the generic handler must not fire.
    assert_eq!(*errors.borrow(), 0);
  }
}
