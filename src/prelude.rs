//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Bridging
pub use crate::bridge::{Classified, Erased};
// Context
pub use crate::context::{AssocSource, Context, ContextView, Entry, Value, ViewContext};
// Failure taxonomy
pub use crate::error::{BoxError, Failure, Fault, KeyNotFound};
// Publisher contracts, sources and callback subscribe entry points
pub use crate::publishable::{
  create, empty, from_iter, just, raise, throw, Create, Empty, FromIter, Just, Publishable,
  Raise, RawPublisher, SubscribeAll, SubscribeComplete, SubscribeErr, SubscribeItem,
  SubscriberAll, SubscriberComp, SubscriberErr, SubscriberItem, Throw,
};
// Subscriber contracts
pub use crate::subscriber::{
  BoxRawSubscriber, BoxSubscriber, DynRawSubscriber, DynSubscriber, RawSubscriber, Subscriber,
};
// Subscription
pub use crate::subscription::{
  BoxSubscription, CancelHandle, SharedSubscription, Subscription, SubscriptionGuard, UNBOUNDED,
};
