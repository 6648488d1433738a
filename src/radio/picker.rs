use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of the "pick uniformly among the top K" choices made by strategies
pub trait Picker {
    /// Return an index in `0..len`. Callers never pass zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform picker backed by any `rand` generator
pub struct RngPicker<R: Rng> {
    rng: R,
}

impl RngPicker<ThreadRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl RngPicker<StdRng> {
    /// Reproducible picks for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Picker for RngPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always picks the same position, clamped to the last element
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

#[cfg(test)]
impl Picker for FixedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Pick one element of `items`, or `None` when empty
pub fn choose<'a, T>(items: &'a [T], picker: &mut dyn Picker) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(picker.pick(items.len()))
}
