use rand::Rng;

/// Source of bounded uniform draws used by sampling and generation.
///
/// Every `rand::Rng` is a `RandomSource`, so a seeded `StdRng` gives
/// reproducible runs and `rand::rng()` gives an entropy-seeded one.
pub trait RandomSource {
	/// Returns an integer uniformly distributed in `[0, bound)`.
	///
	/// `bound` is always strictly positive.
	fn draw(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
	fn draw(&mut self, bound: usize) -> usize {
		self.random_range(0..bound)
	}
}
