/// Source of uniform draws in `[0, 1)`.
///
/// Spawning and star placement only ever ask for unit draws, so tests can
/// substitute an exact sequence for the seeded generator.
pub trait UnitRandom {
    fn next_unit(&mut self) -> f64;
}

#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }
}

impl UnitRandom for SeededRng {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        // xorshift32 never yields 0, so the top of the range is u32::MAX.
        f64::from(self.next() - 1) / (f64::from(u32::MAX))
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Self {
        debug_assert!(!values.is_empty());
        Self { values, cursor: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl UnitRandom for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_falls_back_to_fixed_state() {
        assert_eq!(SeededRng::new(0).state(), 0xDEAD_BEEF);
    }

    #[test]
    fn unit_draws_stay_in_half_open_range() {
        let mut rng = SeededRng::new(7);
        for _ in 0..10_000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value), "draw out of range: {value}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(1234);
        let mut b = SeededRng::new(1234);
        for _ in 0..32 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn fixed_sequence_cycles_and_clamps() {
        let mut seq = FixedSequence::new(vec![0.25, 1.0]);
        assert_eq!(seq.next_unit(), 0.25);
        assert!(seq.next_unit() < 1.0);
        assert_eq!(seq.next_unit(), 0.25);
    }
}
