//! Subscription-scoped metadata that travels from a subscriber to the
//! stages it subscribes through.
//!
//! A [`Context`] is an immutable, ordered, key-unique associative map
//! built once at subscribe time. Upstream stages read it through the
//! [`ContextView`] capability; they never mutate it, which is what makes
//! it safe to consult from any thread once the subscriber is published.
//!
//! A context can also be a lazy, read-only *view* over a foreign
//! associative structure ([`ViewContext`]): nothing is copied at
//! construction, every read delegates to the source's own primitives.

use std::{
  any::Any,
  cell::RefCell,
  collections::{BTreeMap, HashMap},
  fmt,
  rc::Rc,
  sync::{Arc, Mutex},
};

use smallvec::SmallVec;

use crate::error::KeyNotFound;

/// Opaque, cheaply clonable context value.
///
/// Never null: absence of a key is expressed by [`KeyNotFound`], not by an
/// empty value.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
  pub fn new<T: Any + Send + Sync>(value: T) -> Self { Value(Arc::new(value)) }

  /// Typed read of the carried value.
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> { self.0.downcast_ref() }

  pub fn is<T: Any>(&self) -> bool { self.0.is::<T>() }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Value(..)") }
}

/// One context entry.
pub type Entry = (String, Value);

// ============================================================================
// ContextView - the read capability
// ============================================================================

/// Read capabilities every context shape exposes.
///
/// `lookup`, `len` and `entries` are the primitives; everything else is
/// derived from them, which keeps the derived views consistent with each
/// other by construction: `contains_key(k)` is equivalent to `get(k)`
/// succeeding, and `keys`/`values`/`entries` all agree with `len`.
pub trait ContextView {
  /// The value for `key`, if present.
  fn lookup(&self, key: &str) -> Option<Value>;

  /// Number of distinct keys.
  fn len(&self) -> usize;

  /// All entries, in construction order (or the foreign source's own
  /// order for adapted views).
  fn entries(&self) -> Vec<Entry>;

  /// The unique value for `key`; [`KeyNotFound`] when absent.
  fn get(&self, key: &str) -> Result<Value, KeyNotFound> {
    self.lookup(key).ok_or_else(|| KeyNotFound::new(key))
  }

  /// The value for `key`, or `default` when absent.
  fn get_or(&self, key: &str, default: Value) -> Value { self.lookup(key).unwrap_or(default) }

  fn contains_key(&self, key: &str) -> bool { self.lookup(key).is_some() }

  fn keys(&self) -> Vec<String> { self.entries().into_iter().map(|(k, _)| k).collect() }

  fn values(&self) -> Vec<Value> { self.entries().into_iter().map(|(_, v)| v).collect() }

  fn is_empty(&self) -> bool { self.len() == 0 }
}

// ============================================================================
// Context - the owned, ordered, key-unique map
// ============================================================================

/// Immutable context map, constructed once at subscribe time.
///
/// Iteration order is the insertion/merge order of its sources. Merging is
/// a single reduce-left: each supplying entry is put into the accumulator
/// in order, and a colliding key keeps its first-seen position while
/// taking the later value.
#[derive(Clone, Default)]
pub struct Context {
  entries: SmallVec<[Entry; 4]>,
}

impl Context {
  pub fn empty() -> Self { Context::default() }

  /// Build a context from key/value pairs.
  pub fn of<K, I>(entries: I) -> Self
  where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
  {
    Context::empty().merge(entries)
  }

  /// Merge further entries in, later entries overriding earlier ones on
  /// key collision.
  pub fn merge<K, I>(mut self, entries: I) -> Self
  where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
  {
    for (key, value) in entries {
      self.put(key.into(), value);
    }
    self
  }

  /// Eagerly capture any view into an owned context.
  pub fn from_view(view: &dyn ContextView) -> Self {
    Context { entries: view.entries().into_iter().collect() }
  }

  pub fn iter(&self) -> impl Iterator<Item = &Entry> { self.entries.iter() }

  fn put(&mut self, key: String, value: Value) {
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((key, value)),
    }
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
  }
}

impl ContextView for Context {
  fn lookup(&self, key: &str) -> Option<Value> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
  }

  fn len(&self) -> usize { self.entries.len() }

  fn entries(&self) -> Vec<Entry> { self.entries.to_vec() }
}

// ============================================================================
// AssocSource - the consumed foreign associative capability
// ============================================================================

/// The associative capability a foreign structure must expose to be
/// adapted as a context: keyed read, membership, size and ordered
/// iteration. Ownership stays with the caller; implementations for shared
/// wrappers delegate through them so a [`ViewContext`] observes the source
/// as it currently is.
///
/// Method names deliberately avoid [`ContextView`]'s: a type implementing
/// both (as [`Context`] does) keeps every call unambiguous.
pub trait AssocSource {
  fn fetch(&self, key: &str) -> Option<Value>;

  fn has_key(&self, key: &str) -> bool { self.fetch(key).is_some() }

  fn size(&self) -> usize;

  /// Entries in the source's own iteration order.
  fn snapshot(&self) -> Vec<Entry>;
}

impl AssocSource for BTreeMap<String, Value> {
  fn fetch(&self, key: &str) -> Option<Value> { self.get(key).cloned() }

  fn has_key(&self, key: &str) -> bool { self.contains_key(key) }

  fn size(&self) -> usize { self.len() }

  fn snapshot(&self) -> Vec<Entry> { self.iter().map(|(k, v)| (k.clone(), v.clone())).collect() }
}

impl AssocSource for HashMap<String, Value> {
  fn fetch(&self, key: &str) -> Option<Value> { self.get(key).cloned() }

  fn has_key(&self, key: &str) -> bool { self.contains_key(key) }

  fn size(&self) -> usize { self.len() }

  fn snapshot(&self) -> Vec<Entry> { self.iter().map(|(k, v)| (k.clone(), v.clone())).collect() }
}

/// Pair slices act as an associative source keyed by first occurrence.
impl AssocSource for Vec<Entry> {
  fn fetch(&self, key: &str) -> Option<Value> {
    self.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
  }

  fn size(&self) -> usize { self.len() }

  fn snapshot(&self) -> Vec<Entry> { self.clone() }
}

/// An existing context is itself an adaptable source.
impl AssocSource for Context {
  fn fetch(&self, key: &str) -> Option<Value> { self.lookup(key) }

  fn size(&self) -> usize { ContextView::len(self) }

  fn snapshot(&self) -> Vec<Entry> { ContextView::entries(self) }
}

impl<M: AssocSource> AssocSource for &M {
  fn fetch(&self, key: &str) -> Option<Value> { (**self).fetch(key) }

  fn has_key(&self, key: &str) -> bool { (**self).has_key(key) }

  fn size(&self) -> usize { (**self).size() }

  fn snapshot(&self) -> Vec<Entry> { (**self).snapshot() }
}

impl<M: AssocSource> AssocSource for Rc<RefCell<M>> {
  fn fetch(&self, key: &str) -> Option<Value> { self.borrow().fetch(key) }

  fn has_key(&self, key: &str) -> bool { self.borrow().has_key(key) }

  fn size(&self) -> usize { self.borrow().size() }

  fn snapshot(&self) -> Vec<Entry> { self.borrow().snapshot() }
}

impl<M: AssocSource> AssocSource for Arc<Mutex<M>> {
  fn fetch(&self, key: &str) -> Option<Value> { self.lock().unwrap().fetch(key) }

  fn has_key(&self, key: &str) -> bool { self.lock().unwrap().has_key(key) }

  fn size(&self) -> usize { self.lock().unwrap().size() }

  fn snapshot(&self) -> Vec<Entry> { self.lock().unwrap().snapshot() }
}

// ============================================================================
// ViewContext - lazy adapter over a foreign source
// ============================================================================

/// Lazy, read-only context over a foreign associative structure.
///
/// Holds the source without copying; every operation delegates on demand,
/// so mutations made through the source before first use are reflected.
/// The view itself exposes no mutators.
#[derive(Clone)]
pub struct ViewContext<M> {
  source: M,
}

impl<M: AssocSource> ViewContext<M> {
  pub fn new(source: M) -> Self { ViewContext { source } }

  pub fn into_inner(self) -> M { self.source }
}

impl<M: AssocSource> ContextView for ViewContext<M> {
  fn lookup(&self, key: &str) -> Option<Value> { self.source.fetch(key) }

  fn len(&self) -> usize { self.source.size() }

  fn entries(&self) -> Vec<Entry> { self.source.snapshot() }

  fn contains_key(&self, key: &str) -> bool { self.source.has_key(key) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn int(v: i32) -> Value { Value::new(v) }

  fn read(ctx: &dyn ContextView, key: &str) -> i32 {
    *ctx.get(key).unwrap().downcast_ref::<i32>().unwrap()
  }

  #[test]
  fn merge_is_reduce_left_with_override() {
    let ctx = Context::empty()
      .merge([("a", int(1)), ("b", int(2))])
      .merge([("b", int(3)), ("c", int(4))]);

    assert_eq!(ctx.keys(), vec!["a", "b", "c"]);
    assert_eq!(read(&ctx, "a"), 1);
    assert_eq!(read(&ctx, "b"), 3);
    assert_eq!(read(&ctx, "c"), 4);
    assert_eq!(ctx.len(), 3);
  }

  #[test]
  fn of_deduplicates_keys() {
    let ctx = Context::of([("k", int(1)), ("k", int(2))]);
    assert_eq!(ctx.len(), 1);
    assert_eq!(read(&ctx, "k"), 2);
  }

  #[test]
  fn views_agree_with_len() {
    let ctx = Context::of([("a", int(1)), ("b", int(2))]);
    assert_eq!(ctx.keys().len(), ctx.len());
    assert_eq!(ctx.values().len(), ctx.len());
    assert_eq!(ContextView::entries(&ctx).len(), ctx.len());
  }

  #[test]
  fn absent_key_is_key_not_found() {
    let ctx = Context::empty();
    assert_eq!(ctx.get("missing").unwrap_err().key, "missing");
    assert!(!ctx.contains_key("missing"));
    assert_eq!(*ctx.get_or("missing", int(7)).downcast_ref::<i32>().unwrap(), 7);
  }

  #[test]
  fn adapter_delegates_without_copying() {
    let source = Rc::new(RefCell::new(BTreeMap::new()));
    let view = ViewContext::new(source.clone());

    // Mutation through the foreign structure before first read is visible.
    source.borrow_mut().insert("x".to_string(), int(10));

    assert_eq!(read(&view, "x"), 10);
    assert!(!view.contains_key("y"));
    assert_eq!(view.len(), 1);
  }

  #[test]
  fn both_capabilities_resolve_unqualified_on_context() {
    // Context is a ContextView and an AssocSource at once; every method of
    // either must resolve without turbofish even with both traits in scope.
    let ctx = Context::of([("a", int(1))]);
    assert!(ctx.get("a").is_ok());
    assert!(ctx.fetch("a").is_some());
    assert_eq!(ctx.size(), ctx.len());
    assert_eq!(ctx.snapshot().len(), ctx.entries().len());
  }

  #[test]
  fn adapter_over_existing_context() {
    let base = Context::of([("a", int(1))]);
    let view = ViewContext::new(base);
    assert_eq!(read(&view, "a"), 1);
    assert_eq!(view.keys(), vec!["a"]);
  }

  #[test]
  fn capture_view_into_owned_context() {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), int(1));
    map.insert("b".to_string(), int(2));
    let view = ViewContext::new(map);

    let owned = Context::from_view(&view);
    assert_eq!(owned.keys(), vec!["a", "b"]);
    assert_eq!(read(&owned, "b"), 2);
  }
}
