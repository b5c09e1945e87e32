//! Time-driven node relocation.

/// Linear move from a start point to a target over a fixed duration.
///
/// The animator is sampled with wall-clock timestamps (milliseconds), so it
/// reaches the target no matter how irregularly frames arrive. Sampling twice
/// at the same time gives the same point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionAnimator {
	start: (i32, i32),
	target: (i32, i32),
	duration_ms: f64,
	started_at: f64,
}

impl MotionAnimator {
	pub fn new(start: (i32, i32), target: (i32, i32), duration_ms: f64, started_at: f64) -> Self {
		Self {
			start,
			target,
			duration_ms,
			started_at,
		}
	}

	pub fn target(&self) -> (i32, i32) {
		self.target
	}

	/// Fraction of the move completed at `now`, in `[0, 1]`.
	pub fn progress(&self, now: f64) -> f64 {
		if self.duration_ms <= 0.0 {
			return 1.0;
		}
		((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
	}

	/// Position at `now`.
	pub fn sample(&self, now: f64) -> (i32, i32) {
		let progress = self.progress(now);
		let lerp = |from: i32, to: i32| (progress * to as f64 + (1.0 - progress) * from as f64).round() as i32;
		(lerp(self.start.0, self.target.0), lerp(self.start.1, self.target.1))
	}

	pub fn is_finished(&self, now: f64) -> bool {
		self.progress(now) >= 1.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn converges_exactly_on_the_target() {
		for (target, duration) in [((300, -40), 500.0), ((7, 13), 16.0), ((-1000, 999), 1234.5)] {
			let motion = MotionAnimator::new((10, 20), target, duration, 1000.0);
			assert_eq!(motion.sample(1000.0 + duration), target);
			assert_eq!(motion.sample(1000.0 + duration * 3.0), target);
			assert!(motion.is_finished(1000.0 + duration));
		}
	}

	#[test]
	fn starts_where_it_was() {
		let motion = MotionAnimator::new((10, 20), (300, 400), 500.0, 1000.0);
		assert_eq!(motion.sample(1000.0), (10, 20));
		assert_eq!(motion.sample(900.0), (10, 20));
		assert!(!motion.is_finished(1000.0));
	}

	#[test]
	fn interpolates_linearly_and_repeatably() {
		let motion = MotionAnimator::new((0, 100), (100, 0), 400.0, 0.0);
		assert_eq!(motion.sample(100.0), (25, 75));
		assert_eq!(motion.sample(200.0), (50, 50));
		assert_eq!(motion.sample(200.0), (50, 50));
	}

	#[test]
	fn zero_duration_jumps() {
		let motion = MotionAnimator::new((0, 0), (5, 6), 0.0, 10.0);
		assert_eq!(motion.sample(10.0), (5, 6));
		assert!(motion.is_finished(0.0));
	}
}
