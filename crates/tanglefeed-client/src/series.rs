//! Bounded time series.
//!
//! A [`SeriesBuffer`] keeps the most recent `capacity` samples in arrival
//! order. Appending to a full buffer evicts exactly the oldest sample. Samples
//! are never sorted; out-of-order timestamps stay where they arrived.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

/// Fixed-capacity, oldest-first sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuffer<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> SeriesBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted oldest sample if the buffer
    /// was full.
    pub fn append(&mut self, sample: T) -> Option<T> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&T> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&T> {
        self.samples.back()
    }
}

impl<T: Clone> SeriesBuffer<T> {
    /// An owned copy of the samples, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

/// A [`SeriesBuffer`] shared between one writer and any number of readers.
///
/// Clones share the same buffer.
#[derive(Debug)]
pub struct SharedSeries<T> {
    inner: Arc<RwLock<SeriesBuffer<T>>>,
}

impl<T> Clone for SharedSeries<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedSeries<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SeriesBuffer::new(capacity))),
        }
    }

    /// Append under the write lock; see [`SeriesBuffer::append`].
    pub fn append(&self, sample: T) -> Option<T> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append(sample)
    }

    pub fn len(&self) -> usize {
        self.read(SeriesBuffer::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(SeriesBuffer::is_empty)
    }

    pub fn capacity(&self) -> usize {
        self.read(SeriesBuffer::capacity)
    }

    /// Run `f` against the buffer under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&SeriesBuffer<T>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }
}

impl<T: Clone> SharedSeries<T> {
    pub fn snapshot(&self) -> Vec<T> {
        self.read(SeriesBuffer::snapshot)
    }

    pub fn newest(&self) -> Option<T> {
        self.read(|buf| buf.newest().cloned())
    }
}
