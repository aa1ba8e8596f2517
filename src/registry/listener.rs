//! Listener handles.
//!
//! A [`Listener`] is a cheaply clonable handle around a callback. Clones share identity:
//! subscribing a clone is the same as subscribing the original, and either one can be
//! used to unsubscribe. Two handles built from identical closures are distinct listeners.

use crate::error::{ListenerError, ListenerResult};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

type Callback<P> = dyn Fn(&P) -> ListenerResult + Send + Sync;

struct ListenerInner<P> {
    id: u64,
    name: Option<String>,
    callback: Box<Callback<P>>,
}

/// Shared handle to a callback invoked with a reference to each published payload.
pub struct Listener<P> {
    inner: Arc<ListenerInner<P>>,
}

impl<P: 'static> Listener<P> {
    /// Wraps an infallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self::build(None, infallible(callback))
    }

    /// Wraps a callback whose errors are reported as listener failures.
    pub fn fallible<F, E>(callback: F) -> Self
    where
        F: Fn(&P) -> Result<(), E> + Send + Sync + 'static,
        E: Into<ListenerError>,
    {
        Self::build(None, boxed_errors(callback))
    }

    /// Like [`Listener::new`], with a name that shows up in failure diagnostics.
    pub fn named<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self::build(Some(name.into()), infallible(callback))
    }

    /// Named variant of [`Listener::fallible`].
    pub fn named_fallible<F, E>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&P) -> Result<(), E> + Send + Sync + 'static,
        E: Into<ListenerError>,
    {
        Self::build(Some(name.into()), boxed_errors(callback))
    }

    fn build(name: Option<String>, callback: Box<Callback<P>>) -> Self {
        Self {
            inner: Arc::new(ListenerInner {
                id: NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed),
                name,
                callback,
            }),
        }
    }
}

impl<P> Listener<P> {
    /// Process-unique id, stable across clones.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// True when both handles refer to the same registration.
    pub fn same_as(&self, other: &Listener<P>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn call(&self, payload: &P) -> ListenerResult {
        (self.inner.callback)(payload)
    }
}

fn infallible<P, F>(callback: F) -> Box<Callback<P>>
where
    P: 'static,
    F: Fn(&P) + Send + Sync + 'static,
{
    Box::new(move |payload: &P| {
        callback(payload);
        Ok(())
    })
}

fn boxed_errors<P, F, E>(callback: F) -> Box<Callback<P>>
where
    P: 'static,
    F: Fn(&P) -> Result<(), E> + Send + Sync + 'static,
    E: Into<ListenerError>,
{
    Box::new(move |payload: &P| callback(payload).map_err(Into::into))
}

impl<P> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> PartialEq for Listener<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<P> Eq for Listener<P> {}

impl<P> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("callback", &"<Fn(&P)>")
            .finish()
    }
}
