//! Publisher contracts and the bundled sources.
//!
//! [`Publishable`] is the dual-channel publisher: a repeatable source of
//! subscriptions with distinct fault and error channels. [`RawPublisher`]
//! is the minimal plain publish/subscribe capability the crate consumes
//! from the surrounding engine.
//!
//! The callback subscribe conveniences live in one file per handler arity,
//! mirroring how the subscriber is assembled: item only, item+error,
//! item+error+complete, and the full four-handler set.

use std::{convert::Infallible, marker::PhantomData};

use crate::{
  bridge::{Classified, Erased},
  error::Fault,
  subscriber::{BoxRawSubscriber, BoxSubscriber, Subscriber},
  subscription::{SharedSubscription, Subscription},
};

mod subscribe_all;
pub use subscribe_all::*;
mod subscribe_comp;
pub use subscribe_comp::*;
mod subscribe_err;
pub use subscribe_err::*;
mod subscribe_item;
pub use subscribe_item::*;

// ============================================================================
// Publisher traits
// ============================================================================

/// A repeatable source of dual-channel subscriptions.
///
/// Every call to [`actual_subscribe`](Publishable::actual_subscribe) opens
/// an independent subscription; the protocol requires no shared mutable
/// state across them.
pub trait Publishable {
  type Item: 'static;
  type Err: 'static;

  /// The one canonical subscribe. All convenience entry points build a
  /// subscriber and funnel through here.
  fn actual_subscribe(&self, subscriber: BoxSubscriber<Self::Item, Self::Err>);

  /// Consume this publisher through the plain contract: the fault channel
  /// is erased into the generic error channel.
  fn erased(self) -> Erased<Self>
  where
    Self: Sized,
    Self::Err: Fault,
  {
    Erased::new(self)
  }
}

/// The minimal plain publish/subscribe capability this crate consumes.
pub trait RawPublisher {
  type Item: 'static;

  fn actual_subscribe(&self, subscriber: BoxRawSubscriber<Self::Item>);

  /// Expose this plain publisher as a dual-channel one: generic failures
  /// are classified into typed faults where they narrow to `E`.
  fn classified<E: Fault>(self) -> Classified<Self, E>
  where
    Self: Sized,
  {
    Classified::new(self)
  }
}

// ============================================================================
// create - minimal emission contract to Publishable
// ============================================================================

/// Turn a minimal emission contract into a [`Publishable`].
///
/// The closure is invoked once per subscription with the boxed subscriber
/// and drives the whole signal sequence itself: `on_subscribe`, any number
/// of `on_next`, then exactly one terminal signal.
///
/// ```
/// use publishable::prelude::*;
/// use std::num::ParseIntError;
///
/// let source = create::<i32, ParseIntError, _>(|mut subscriber| {
///   let subscription = SharedSubscription::new();
///   subscriber.on_subscribe(Box::new(subscription.clone()));
///   subscriber.on_next(1);
///   subscriber.on_complete();
/// });
/// source.subscribe(|v| println!("{v}"));
/// ```
pub fn create<Item, Err, F>(emit: F) -> Create<F, Item, Err>
where
  F: Fn(BoxSubscriber<Item, Err>),
{
  Create { emit, _hint: PhantomData }
}

pub struct Create<F, Item, Err> {
  emit: F,
  _hint: PhantomData<(Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { emit: self.emit.clone(), _hint: PhantomData } }
}

impl<F, Item, Err> Publishable for Create<F, Item, Err>
where
  F: Fn(BoxSubscriber<Item, Err>),
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, subscriber: BoxSubscriber<Item, Err>) { (self.emit)(subscriber) }
}

// ============================================================================
// empty
// ============================================================================

/// A publisher that emits no items: `on_subscribe`, then completion.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(PhantomData) }

pub struct Empty<Item, Err>(PhantomData<(Item, Err)>);

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item: 'static, Err: 'static> Publishable for Empty<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, mut subscriber: BoxSubscriber<Item, Err>) {
    let subscription = SharedSubscription::new();
    subscriber.on_subscribe(Box::new(subscription.clone()));
    if !subscription.is_cancelled() {
      subscriber.on_complete();
    }
  }
}

// ============================================================================
// from_iter
// ============================================================================

/// Emit every element of an iterator, honoring demand and cancellation,
/// then complete. Never fails.
///
/// A synchronous source cannot park on missing demand; when bounded demand
/// runs out the remaining items are dropped and the fact logged.
///
/// ```
/// use publishable::prelude::*;
///
/// from_iter(0..3).subscribe(|v| println!("{v}"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator + Clone,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<Iter>(Iter);

impl<Iter> Publishable for FromIter<Iter>
where
  Iter: IntoIterator + Clone,
  Iter::Item: 'static,
{
  type Item = Iter::Item;
  type Err = Infallible;

  fn actual_subscribe(&self, mut subscriber: BoxSubscriber<Iter::Item, Infallible>) {
    let subscription = SharedSubscription::new();
    subscriber.on_subscribe(Box::new(subscription.clone()));
    for item in self.0.clone() {
      if subscription.is_cancelled() {
        return;
      }
      if subscription.claim(1) == 0 {
        tracing::debug!("bounded demand exhausted; dropping remaining items");
        return;
      }
      subscriber.on_next(item);
    }
    if !subscription.is_cancelled() {
      subscriber.on_complete();
    }
  }
}

// ============================================================================
// just
// ============================================================================

/// A publisher emitting a single value, then completing. Never fails.
pub fn just<Item, Err>(value: Item) -> Just<Item, Err>
where
  Item: Clone,
{
  Just { value, _hint: PhantomData }
}

pub struct Just<Item, Err> {
  value: Item,
  _hint: PhantomData<Err>,
}

impl<Item: Clone, Err> Clone for Just<Item, Err> {
  fn clone(&self) -> Self { Just { value: self.value.clone(), _hint: PhantomData } }
}

impl<Item, Err> Publishable for Just<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, mut subscriber: BoxSubscriber<Item, Err>) {
    let subscription = SharedSubscription::new();
    subscriber.on_subscribe(Box::new(subscription.clone()));
    if subscription.is_cancelled() {
      return;
    }
    if subscription.claim(1) == 0 {
      tracing::debug!("bounded demand exhausted; dropping the value");
      return;
    }
    subscriber.on_next(self.value.clone());
    if !subscription.is_cancelled() {
      subscriber.on_complete();
    }
  }
}

// ============================================================================
// throw / raise - immediately failing sources
// ============================================================================

/// A publisher that fails immediately on the generic error channel.
pub fn throw<Item, Err, E>(error: E) -> Throw<E, Item, Err>
where
  E: Fault + Clone,
{
  Throw { error, _hint: PhantomData }
}

pub struct Throw<E, Item, Err> {
  error: E,
  _hint: PhantomData<(Item, Err)>,
}

impl<E: Clone, Item, Err> Clone for Throw<E, Item, Err> {
  fn clone(&self) -> Self { Throw { error: self.error.clone(), _hint: PhantomData } }
}

impl<E, Item, Err> Publishable for Throw<E, Item, Err>
where
  E: Fault + Clone,
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, mut subscriber: BoxSubscriber<Item, Err>) {
    let subscription = SharedSubscription::new();
    subscriber.on_subscribe(Box::new(subscription.clone()));
    if !subscription.is_cancelled() {
      subscriber.on_error(Box::new(self.error.clone()));
    }
  }
}

/// A publisher that fails immediately on the typed fault channel. No
/// classification happens: the fault is already statically typed.
pub fn raise<Item, Err>(fault: Err) -> Raise<Err, Item>
where
  Err: Clone,
{
  Raise { fault, _hint: PhantomData }
}

pub struct Raise<Err, Item> {
  fault: Err,
  _hint: PhantomData<Item>,
}

impl<Err: Clone, Item> Clone for Raise<Err, Item> {
  fn clone(&self) -> Self { Raise { fault: self.fault.clone(), _hint: PhantomData } }
}

impl<Err, Item> Publishable for Raise<Err, Item>
where
  Err: Clone + 'static,
  Item: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, mut subscriber: BoxSubscriber<Item, Err>) {
    let subscription = SharedSubscription::new();
    subscriber.on_subscribe(Box::new(subscription.clone()));
    if !subscription.is_cancelled() {
      subscriber.on_fault(self.fault.clone());
    }
  }
}
