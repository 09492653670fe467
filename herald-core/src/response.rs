//! Listener results collected during a trigger.

/// The ordered results of one trigger.
///
/// Values appear in invocation order. [`stopped`](Self::stopped) reports
/// whether the trigger ended early, either because a listener stopped
/// propagation or because the trigger-until predicate matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCollection<R> {
    responses: Vec<R>,
    stopped: bool,
}

impl<R> Default for ResponseCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ResponseCollection<R> {
    /// Create an empty, not-stopped collection.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            stopped: false,
        }
    }

    /// Append a listener result.
    pub fn push(&mut self, response: R) {
        self.responses.push(response);
    }

    /// Mark whether the trigger ended early.
    pub fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    /// Returns `true` if the trigger ended before every listener ran.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// The result of the first listener invoked.
    pub fn first(&self) -> Option<&R> {
        self.responses.first()
    }

    /// The result of the last listener invoked.
    pub fn last(&self) -> Option<&R> {
        self.responses.last()
    }

    /// Number of collected results.
    pub fn count(&self) -> usize {
        self.responses.len()
    }

    /// Returns `true` if no listener ran.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Returns `true` if any listener produced `value`.
    pub fn contains(&self, value: &R) -> bool
    where
        R: PartialEq,
    {
        self.responses.contains(value)
    }

    /// Iterate over the results in invocation order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.responses.iter()
    }

    /// Consume the collection, returning the raw results.
    pub fn into_vec(self) -> Vec<R> {
        self.responses
    }
}

impl<R> IntoIterator for ResponseCollection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a ResponseCollection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}
