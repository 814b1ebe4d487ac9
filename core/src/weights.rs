//! Explicit discrete distributions.
//!
//! Every categorical draw in the generators goes through a `Weighted`
//! table declared as a named constant next to the code that uses it, so a
//! fixed seed reproduces the same labels and the tables can be inspected
//! in tests.

use crate::rng::StepRng;

#[derive(Debug, Clone, Copy)]
pub struct Weighted<T: Copy + 'static> {
    entries: &'static [(T, f64)],
}

impl<T: Copy + 'static> Weighted<T> {
    /// Weights need not sum to 1.0; they are normalised at draw time.
    /// The table must not be empty.
    pub const fn new(entries: &'static [(T, f64)]) -> Self {
        assert!(!entries.is_empty(), "weighted table must not be empty");
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(T, f64)] {
        self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| *w).sum()
    }

    /// Draw one label. A single uniform roll is walked against the
    /// cumulative weights; rounding leftovers fall to the last entry.
    pub fn sample(&self, rng: &mut StepRng) -> T {
        let roll = rng.next_f64() * self.total_weight();
        let mut cumulative = 0.0;
        for (label, weight) in self.entries {
            cumulative += weight;
            if roll < cumulative {
                return *label;
            }
        }
        self.entries[self.entries.len() - 1].0
    }

    /// Weight for `label`, or 0.0 when it is not in the table.
    pub fn weight_of(&self, label: T) -> f64
    where
        T: PartialEq,
    {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}
