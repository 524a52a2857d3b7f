use crate::prelude::*;

/// Subscriber built from the full set of four handlers plus a context.
pub struct SubscriberAll<N, F, E, C, Ctx> {
  item: N,
  fault: F,
  error: E,
  complete: C,
  context: Ctx,
  handle: CancelHandle,
}

impl<N, F, E, C, Ctx> SubscriberAll<N, F, E, C, Ctx> {
  pub fn new(item: N, fault: F, error: E, complete: C, context: Ctx) -> Self {
    SubscriberAll { item, fault, error, complete, context, handle: CancelHandle::new() }
  }

  pub fn handle(&self) -> CancelHandle { self.handle.clone() }
}

impl<Item, Err, N, F, E, C, Ctx> Subscriber<Item, Err> for SubscriberAll<N, F, E, C, Ctx>
where
  N: FnMut(Item),
  F: FnOnce(Err),
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
  fn on_fault(self, fault: Err) { (self.fault)(fault); }

  #[inline]
  fn on_error(self, error: BoxError) { (self.error)(error); }

  #[inline]
  fn on_complete(self) { (self.complete)(); }

  #[inline]
  fn context(&self) -> &dyn ContextView { &self.context }
}

pub trait SubscribeAll<N, F, E, C> {
  /// Subscribe with item, fault, generic-error and completion handlers
  /// and an empty context. Requests unbounded demand up front and returns
  /// the cancellation handle.
  fn subscribe_all(&self, item: N, fault: F, error: E, complete: C) -> CancelHandle;

  /// Same, with an explicit context visible to upstream stages. The
  /// context may be owned ([`Context`]) or a lazy view over a foreign
  /// structure ([`ViewContext`]).
  fn subscribe_all_with<Ctx>(
    &self,
    item: N,
    fault: F,
    error: E,
    complete: C,
    context: Ctx,
  ) -> CancelHandle
  where
    Ctx: ContextView + 'static;
}

impl<P, N, F, E, C> SubscribeAll<N, F, E, C> for P
where
  P: Publishable,
  N: FnMut(P::Item) + 'static,
  F: FnOnce(P::Err) + 'static,
  E: FnOnce(BoxError) + 'static,
  C: FnOnce() + 'static,
{
  fn subscribe_all(&self, item: N, fault: F, error: E, complete: C) -> CancelHandle {
    self.subscribe_all_with(item, fault, error, complete, Context::empty())
  }

  fn subscribe_all_with<Ctx>(
    &self,
    item: N,
    fault: F,
    error: E,
    complete: C,
    context: Ctx,
  ) -> CancelHandle
  where
    Ctx: ContextView + 'static,
  {
    let subscriber = SubscriberAll::new(item, fault, error, complete, context);
    let handle = subscriber.handle();
    self.actual_subscribe(Box::new(subscriber));
    handle
  }
}
