// ---------------------------------------------------------------------------
// Fixed-capacity sliding window
// ---------------------------------------------------------------------------

/// Ring buffer of the `N` most recent scalar samples, zero-initialized.
///
/// Pushing evicts the oldest sample. Used for both the raw position windows
/// and the filtered-velocity memory of the low-pass differentiator, which
/// must stay paired slot-for-slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleWindow<const N: usize> {
    samples: [f64; N],
    /// Index of the oldest sample (next slot to be overwritten).
    head: usize,
}

impl<const N: usize> SampleWindow<N> {
    pub fn new() -> Self {
        Self {
            samples: [0.0; N],
            head: 0,
        }
    }

    /// Insert a new sample, dropping the oldest.
    pub fn push(&mut self, value: f64) {
        self.samples[self.head] = value;
        self.head = (self.head + 1) % N;
    }

    /// Sample at `offset` steps back from the most recent one.
    ///
    /// `newest(0)` is the last pushed value, `newest(N - 1)` the oldest
    /// retained one. Offsets beyond the capacity are a logic error.
    pub fn newest(&self, offset: usize) -> f64 {
        debug_assert!(offset < N);
        self.samples[(self.head + N - 1 - offset) % N]
    }

    pub fn latest(&self) -> f64 {
        self.newest(0)
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}
