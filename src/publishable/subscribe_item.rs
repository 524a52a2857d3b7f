use crate::prelude::*;

/// Subscriber built from an item handler alone; every other signal is a
/// no-op.
pub struct SubscriberItem<N, Ctx> {
  item: N,
  context: Ctx,
  handle: CancelHandle,
}

impl<N, Ctx> SubscriberItem<N, Ctx> {
  pub fn new(item: N, context: Ctx) -> Self {
    SubscriberItem { item, context, handle: CancelHandle::new() }
  }

  pub fn handle(&self) -> CancelHandle { self.handle.clone() }
}

impl<Item, Err, N, Ctx> Subscriber<Item, Err> for SubscriberItem<N, Ctx>
where
  N: FnMut(Item),
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
  fn on_error(self, _error: BoxError) {}

  #[inline]
  fn on_complete(self) {}

  #[inline]
  fn context(&self) -> &dyn ContextView { &self.context }
}

pub trait SubscribeItem<N> {
  /// Subscribe with only an item handler and an empty context. Requests
  /// unbounded demand up front and returns the cancellation handle.
  fn subscribe(&self, item: N) -> CancelHandle;

  /// Same, with an explicit context visible to upstream stages.
  fn subscribe_with<Ctx>(&self, item: N, context: Ctx) -> CancelHandle
  where
    Ctx: ContextView + 'static;
}

impl<P, N> SubscribeItem<N> for P
where
  P: Publishable,
  N: FnMut(P::Item) + 'static,
{
  fn subscribe(&self, item: N) -> CancelHandle { self.subscribe_with(item, Context::empty()) }

  fn subscribe_with<Ctx>(&self, item: N, context: Ctx) -> CancelHandle
  where
    Ctx: ContextView + 'static,
  {
    let subscriber = SubscriberItem::new(item, context);
    let handle = subscriber.handle();
    self.actual_subscribe(Box::new(subscriber));
    handle
  }
}
