//! Bridging between the dual-channel and the plain single-error-channel
//! contracts, in both directions.
//!
//! Either direction wraps the incoming subscriber, never the signals
//! themselves: items, the subscription and the subscriber's context pass
//! through untouched, so upstream stages observe the same metadata
//! whichever channel shape was used to subscribe.

use std::marker::PhantomData;

use crate::{
  context::ContextView,
  error::{BoxError, Fault},
  publishable::{Publishable, RawPublisher},
  subscriber::{BoxRawSubscriber, BoxSubscriber, RawSubscriber, Subscriber},
  subscription::BoxSubscription,
};

// ============================================================================
// Erased - dual-channel publisher consumed through the plain contract
// ============================================================================

/// A dual-channel publisher exposed as a plain one: the fault channel is
/// erased into the generic error channel.
#[derive(Clone)]
pub struct Erased<P>(P);

impl<P> Erased<P> {
  pub fn new(publisher: P) -> Self { Erased(publisher) }
}

impl<P> RawPublisher for Erased<P>
where
  P: Publishable,
  P::Err: Fault,
{
  type Item = P::Item;

  fn actual_subscribe(&self, subscriber: BoxRawSubscriber<P::Item>) {
    self.0.actual_subscribe(Box::new(FunnelSubscriber(subscriber)));
  }
}

/// Dual-channel face over a plain subscriber: both failure channels funnel
/// into the single error signal. A fault is boxed exactly once; a generic
/// error keeps its identity.
struct FunnelSubscriber<S>(S);

impl<Item, Err, S> Subscriber<Item, Err> for FunnelSubscriber<S>
where
  S: RawSubscriber<Item>,
  Err: Fault,
{
  fn on_subscribe(&mut self, subscription: BoxSubscription) { self.0.on_subscribe(subscription) }

  #[inline]
  fn on_next(&mut self, item: Item) { self.0.on_next(item) }

  fn on_fault(self, fault: Err) { self.0.on_error(Box::new(fault)) }

  fn on_error(self, error: BoxError) { self.0.on_error(error) }

  fn on_complete(self) { self.0.on_complete() }

  fn context(&self) -> &dyn ContextView { self.0.context() }
}

// ============================================================================
// Classified - plain publisher consumed through the dual-channel contract
// ============================================================================

/// A plain publisher exposed as a dual-channel one: each generic failure
/// is classified exactly once, into a typed fault where it narrows to `E`.
pub struct Classified<P, E> {
  publisher: P,
  _fault: PhantomData<E>,
}

impl<P, E> Classified<P, E> {
  pub fn new(publisher: P) -> Self { Classified { publisher, _fault: PhantomData } }
}

impl<P: Clone, E> Clone for Classified<P, E> {
  fn clone(&self) -> Self { Classified::new(self.publisher.clone()) }
}

impl<P, E> Publishable for Classified<P, E>
where
  P: RawPublisher,
  E: Fault,
{
  type Item = P::Item;
  type Err = E;

  fn actual_subscribe(&self, subscriber: BoxSubscriber<P::Item, E>) {
    self
      .publisher
      .actual_subscribe(Box::new(SplitSubscriber { inner: subscriber, _fault: PhantomData::<E> }));
  }
}

/// Plain face over a dual-channel subscriber: the one point where an
/// untyped failure is classified into the typed world.
struct SplitSubscriber<S, E> {
  inner: S,
  _fault: PhantomData<E>,
}

impl<Item, E, S> RawSubscriber<Item> for SplitSubscriber<S, E>
where
  S: Subscriber<Item, E>,
  E: Fault,
{
  fn on_subscribe(&mut self, subscription: BoxSubscription) {
    self.inner.on_subscribe(subscription)
  }

  #[inline]
  fn on_next(&mut self, item: Item) { self.inner.on_next(item) }

  fn on_error(self, error: BoxError) { self.inner.on_erased_error(error) }

  fn on_complete(self) { self.inner.on_complete() }

  fn context(&self) -> &dyn ContextView { self.inner.context() }
}
