use crate::prelude::*;

/// Subscriber built from item, generic-error and completion handlers.
pub struct SubscriberComp<N, E, C, Ctx> {
  item: N,
  error: E,
  complete: C,
  context: Ctx,
  handle: CancelHandle,
}

impl<N, E, C, Ctx> SubscriberComp<N, E, C, Ctx> {
  pub fn new(item: N, error: E, complete: C, context: Ctx) -> Self {
    SubscriberComp { item, error, complete, context, handle: CancelHandle::new() }
  }

  pub fn handle(&self) -> CancelHandle { self.handle.clone() }
}

impl<Item, Err, N, E, C, Ctx> Subscriber<Item, Err> for SubscriberComp<N, E, C, Ctx>
where
  N: FnMut(Item),
  E: FnOnce(BoxError),
  C: FnOnce(),
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
  fn on_complete(self) { (self.complete)(); }

  #[inline]
  fn context(&self) -> &dyn ContextView { &self.context }
}

pub trait SubscribeComplete<N, E, C> {
  /// Subscribe with item, generic-error and completion handlers and an
  /// empty context.
  fn subscribe_complete(&self, item: N, error: E, complete: C) -> CancelHandle;

  /// Same, with an explicit context visible to upstream stages.
  fn subscribe_complete_with<Ctx>(&self, item: N, error: E, complete: C, context: Ctx) -> CancelHandle
  where
    Ctx: ContextView + 'static;
}

impl<P, N, E, C> SubscribeComplete<N, E, C> for P
where
  P: Publishable,
  N: FnMut(P::Item) + 'static,
  E: FnOnce(BoxError) + 'static,
  C: FnOnce() + 'static,
{
  fn subscribe_complete(&self, item: N, error: E, complete: C) -> CancelHandle {
    self.subscribe_complete_with(item, error, complete, Context::empty())
  }

  fn subscribe_complete_with<Ctx>(&self, item: N, error: E, complete: C, context: Ctx) -> CancelHandle
  where
    Ctx: ContextView + 'static,
  {
    let subscriber = SubscriberComp::new(item, error, complete, context);
    let handle = subscriber.handle();
    self.actual_subscribe(Box::new(subscriber));
    handle
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::publishable::from_iter;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn completion_fires_exactly_once() {
    let completed = Rc::new(RefCell::new(0));
    let c = completed.clone();
    from_iter(0..2).subscribe_complete(|_| {}, |_| panic!("no error"), move || {
      *c.borrow_mut() += 1
    });
    assert_eq!(*completed.borrow(), 1);
  }
}
