//! Demand and cancellation control for one in-flight subscription.
//!
//! A publisher creates the subscription inside `subscribe` and hands it to
//! the subscriber before any other signal. `request` accumulates demand,
//! `cancel` is an advisory "stop soon": a publisher that has already begun
//! an emission batch may legally deliver signals racing with it, so
//! handlers must tolerate at most one extra signal after cancel.

use std::sync::{
  atomic::{AtomicBool, AtomicU64, Ordering},
  Arc, Mutex,
};

/// Demand amount that effectively disables manual backpressure.
pub const UNBOUNDED: u64 = u64::MAX;

/// The control object for one publisher/subscriber relationship.
pub trait Subscription {
  /// Add `n` to the outstanding demand.
  ///
  /// Accumulated demand saturates at [`UNBOUNDED`] instead of wrapping.
  /// No-op once cancelled. A conforming publisher requires `n > 0`; a zero
  /// request is logged and ignored.
  fn request(&mut self, n: u64);

  /// Stop further emission. Idempotent and safe to call from within a
  /// signal handler.
  fn cancel(&mut self);

  fn is_cancelled(&self) -> bool;
}

/// Boxed subscription as delivered to a subscriber.
pub type BoxSubscription = Box<dyn Subscription>;

impl<T: ?Sized> Subscription for Box<T>
where
  T: Subscription,
{
  #[inline]
  fn request(&mut self, n: u64) { (**self).request(n) }

  #[inline]
  fn cancel(&mut self) { (**self).cancel() }

  #[inline]
  fn is_cancelled(&self) -> bool { (**self).is_cancelled() }
}

// ============================================================================
// SharedSubscription
// ============================================================================

/// Atomic demand counter and cancel flag shared between the publisher side
/// and the subscriber side of one subscription.
///
/// Cloning yields another handle onto the same state, which is how the
/// bundled publishers keep polling cancellation while the subscriber holds
/// the boxed clone.
#[derive(Clone, Default)]
pub struct SharedSubscription(Arc<State>);

#[derive(Default)]
struct State {
  demand: AtomicU64,
  cancelled: AtomicBool,
}

impl SharedSubscription {
  pub fn new() -> Self { Self::default() }

  /// Outstanding demand.
  pub fn demand(&self) -> u64 { self.0.demand.load(Ordering::Acquire) }

  /// Consume up to `n` emission credits, returning how many were granted.
  ///
  /// Unbounded demand stays saturated and is never decremented.
  pub fn claim(&self, n: u64) -> u64 {
    let mut current = self.0.demand.load(Ordering::Acquire);
    loop {
      if current == UNBOUNDED {
        return n;
      }
      let granted = current.min(n);
      if granted == 0 {
        return 0;
      }
      match self.0.demand.compare_exchange_weak(
        current,
        current - granted,
        Ordering::AcqRel,
        Ordering::Acquire,
      ) {
        Ok(_) => return granted,
        Err(actual) => current = actual,
      }
    }
  }
}

impl Subscription for SharedSubscription {
  fn request(&mut self, n: u64) {
    if n == 0 {
      tracing::warn!("request(0) violates the demand contract; ignoring");
      return;
    }
    if self.is_cancelled() {
      return;
    }
    let mut current = self.0.demand.load(Ordering::Acquire);
    loop {
      let next = current.saturating_add(n);
      match self
        .0
        .demand
        .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
      {
        Ok(_) => return,
        Err(actual) => current = actual,
      }
    }
  }

  #[inline]
  fn cancel(&mut self) { self.0.cancelled.store(true, Ordering::Release); }

  #[inline]
  fn is_cancelled(&self) -> bool { self.0.cancelled.load(Ordering::Acquire) }
}

// ============================================================================
// CancelHandle
// ============================================================================

/// Clonable cancellation handle returned by the callback subscribe entry
/// points, equivalent to the underlying subscription's `cancel`.
///
/// The handle exists before the publisher delivers the subscription;
/// cancelling early is honored by cancelling the subscription the moment
/// it is attached, and demand requested early is buffered and replayed
/// on attach.
#[derive(Clone, Default)]
pub struct CancelHandle(Arc<Mutex<HandleState>>);

#[derive(Default)]
struct HandleState {
  cancelled: bool,
  pending_demand: u64,
  subscription: Option<BoxSubscription>,
}

impl CancelHandle {
  pub fn new() -> Self { Self::default() }

  pub(crate) fn attach(&self, mut subscription: BoxSubscription) {
    let mut state = self.0.lock().unwrap();
    if state.cancelled {
      tracing::debug!("subscription attached to a cancelled handle");
      subscription.cancel();
    } else if state.subscription.is_some() {
      tracing::warn!("second on_subscribe for one subscriber; ignoring");
    } else {
      if state.pending_demand > 0 {
        subscription.request(state.pending_demand);
        state.pending_demand = 0;
      }
      state.subscription = Some(subscription);
    }
  }

  pub fn cancel(&self) {
    let mut state = self.0.lock().unwrap();
    state.cancelled = true;
    if let Some(subscription) = state.subscription.as_mut() {
      subscription.cancel();
    }
  }

  pub fn is_cancelled(&self) -> bool { self.0.lock().unwrap().cancelled }

  /// RAII: cancel as soon as the returned guard goes out of scope.
  pub fn cancel_when_dropped(self) -> SubscriptionGuard<CancelHandle> {
    SubscriptionGuard::new(self)
  }
}

impl Subscription for CancelHandle {
  fn request(&mut self, n: u64) {
    let mut state = self.0.lock().unwrap();
    if state.cancelled {
      return;
    }
    match state.subscription.as_mut() {
      Some(subscription) => subscription.request(n),
      None => state.pending_demand = state.pending_demand.saturating_add(n),
    }
  }

  fn cancel(&mut self) { CancelHandle::cancel(&*self) }

  fn is_cancelled(&self) -> bool { CancelHandle::is_cancelled(self) }
}

// ============================================================================
// SubscriptionGuard
// ============================================================================

/// An RAII wrapper cancelling its subscription on drop.
///
/// If the value is not bound to a variable it is dropped immediately and
/// the subscription cancelled right away, which is probably not intended.
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(T);

impl<T: Subscription> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> Self { SubscriptionGuard(subscription) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.cancel() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn demand_accumulates_and_saturates() {
    let mut s = SharedSubscription::new();
    s.request(10);
    s.request(5);
    assert_eq!(s.demand(), 15);
    s.request(UNBOUNDED - 1);
    assert_eq!(s.demand(), UNBOUNDED);
  }

  #[test]
  fn zero_request_is_ignored() {
    let mut s = SharedSubscription::new();
    s.request(0);
    assert_eq!(s.demand(), 0);
  }

  #[test]
  fn request_after_cancel_is_noop() {
    let mut s = SharedSubscription::new();
    s.cancel();
    s.cancel();
    assert!(s.is_cancelled());
    s.request(3);
    assert_eq!(s.demand(), 0);
  }

  #[test]
  fn claim_consumes_bounded_demand() {
    let mut s = SharedSubscription::new();
    s.request(3);
    assert_eq!(s.claim(2), 2);
    assert_eq!(s.claim(2), 1);
    assert_eq!(s.claim(2), 0);
  }

  #[test]
  fn claim_never_drains_unbounded_demand() {
    let mut s = SharedSubscription::new();
    s.request(UNBOUNDED);
    assert_eq!(s.claim(1000), 1000);
    assert_eq!(s.demand(), UNBOUNDED);
  }

  #[test]
  fn handle_cancel_reaches_attached_subscription() {
    let subscription = SharedSubscription::new();
    let handle = CancelHandle::new();
    handle.attach(Box::new(subscription.clone()));
    handle.cancel();
    assert!(subscription.is_cancelled());
    assert!(handle.is_cancelled());
  }

  #[test]
  fn early_demand_is_replayed_on_attach() {
    let subscription = SharedSubscription::new();
    let mut handle = CancelHandle::new();
    handle.request(3);
    handle.request(2);
    handle.attach(Box::new(subscription.clone()));
    assert_eq!(subscription.demand(), 5);
    handle.request(4);
    assert_eq!(subscription.demand(), 9);
  }

  #[test]
  fn early_cancel_applies_on_attach() {
    let subscription = SharedSubscription::new();
    let handle = CancelHandle::new();
    handle.cancel();
    handle.attach(Box::new(subscription.clone()));
    assert!(subscription.is_cancelled());
  }

  #[test]
  fn guard_cancels_on_drop() {
    let subscription = SharedSubscription::new();
    {
      let _guard = SubscriptionGuard::new(subscription.clone());
    }
    assert!(subscription.is_cancelled());
  }
}
