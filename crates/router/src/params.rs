//! Path parameters captured while routing a request.

use std::sync::Arc;

/// Represents path parameters extracted from the URL path of an HTTP request.
///
/// Parameters are kept in routing order, which is also their left to right
/// order in the request path. For the pattern `/users/:user/files/*` and the
/// path `/users/42/files/a/b.txt` the params are `[("user", "42"), ("*", "a/b.txt")]`.
///
/// A `PathParams` is meant to be reused between requests: [`PathParams::clear`]
/// keeps the allocated capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<PathParam>,
}

/// A single `(name, value)` capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    name: Arc<str>,
    value: String,
}

impl PathParam {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl PathParams {
    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Creates an empty instance able to hold `capacity` params without reallocating,
    /// usually sized with the router's `max_params`.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Gets the value of a path parameter by its name
    /// Returns None if the parameter doesn't exist
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.entries.iter().find(|param| &*param.name == name).map(PathParam::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|param| (param.name(), param.value()))
    }

    /// Removes every param, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Makes sure `additional` more params fit without reallocating.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    pub(crate) fn push(&mut self, name: &Arc<str>, value: &str) {
        self.entries.push(PathParam { name: Arc::clone(name), value: value.to_owned() });
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

impl<'a> IntoIterator for &'a PathParams {
    type Item = &'a PathParam;
    type IntoIter = std::slice::Iter<'a, PathParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
