//! # Series Buffer
//!
//! Bounded, append-only storage for the samples collected during a session.
//!
//! The buffer is the one piece of state shared between the acquisition loop
//! (single writer) and everything that reads the signal: the query surface
//! while monitoring, and the estimator once at stop. All access goes through
//! a `parking_lot::Mutex`, and readers only ever receive an owned
//! [`Series`] copy, so no reader observes a half-finished append or eviction.
//!
//! ## Example
//!
//! ```rust
//! use respiration_monitor::series::{Sample, SeriesBuffer};
//!
//! let buffer = SeriesBuffer::new(2);
//! buffer.append(Sample::new(0.0, 1.0));
//! buffer.append(Sample::new(0.2, 2.0));
//! buffer.append(Sample::new(0.4, 3.0));
//!
//! let snapshot = buffer.snapshot();
//! assert_eq!(snapshot.values(), vec![2.0, 3.0]);
//! assert_eq!(buffer.evicted(), 1);
//! ```

mod types;


use std::collections::VecDeque;

use parking_lot::Mutex;

pub use self::types::{Sample, Series};

#[derive(Debug)]
struct BufferState {
    samples: VecDeque<Sample>,
    appended: u64,
    evicted: u64,
}

/// Capacity-limited FIFO of samples with drop-oldest eviction
#[derive(Debug)]
pub struct SeriesBuffer {
    state: Mutex<BufferState>,
    max_points: usize,
}

impl SeriesBuffer {
    /// Creates an empty buffer holding at most `max_points` samples.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_points: usize) -> Self {
        let max_points = max_points.max(1);
        Self {
            state: Mutex::new(BufferState {
                samples: VecDeque::with_capacity(max_points),
                appended: 0,
                evicted: 0,
            }),
            max_points,
        }
    }

    /// Appends a sample, evicting the oldest one when the buffer is full.
    pub fn append(&self, sample: Sample) {
        let mut state = self.state.lock();
        if state.samples.len() == self.max_points {
            state.samples.pop_front();
            state.evicted += 1;
        }
        state.samples.push_back(sample);
        state.appended += 1;
    }

    /// Returns an independent copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Series {
        let state = self.state.lock();
        state.samples.iter().copied().collect()
    }

    /// Empties the buffer and resets its counters.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.samples.clear();
        state.appended = 0;
        state.evicted = 0;
    }

    pub fn len(&self) -> usize {
        self.state.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_points
    }

    /// Samples appended since the last clear, including evicted ones
    pub fn appended(&self) -> u64 {
        self.state.lock().appended
    }

    /// Samples dropped to respect the capacity since the last clear
    pub fn evicted(&self) -> u64 {
        self.state.lock().evicted
    }
}
