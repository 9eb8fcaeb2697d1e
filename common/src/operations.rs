//! Storage operations, used as `Args` of a [`Handler`].
//!
//! [`Handler`]: crate::Handler

use std::marker::PhantomData;

/// Stores a new value, returning it as stored.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Changes a stored value in place.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes stored values.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads stored values.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Performs an action returning no stored value (a probe, for example).
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Selector of a `W`hat by a `B` criterion.
///
/// The `W` type only distinguishes operations over the same criterion, like
/// counting and listing by the same filter.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Criterion to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] out of the provided criterion.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps the criterion of this [`By`].
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
