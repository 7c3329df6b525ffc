//! Sine for `no_std` builds.
//!
//! Only used while building wavetables, so it trades speed for simplicity: fold the argument
//! into [-π/2, π/2] and sum the Taylor series to the x^17 term, which keeps the error below
//! 1e-12 across the range.

use core::f64::consts::{FRAC_PI_2, PI};

/// Sine of `x`, for `x` in [-π, π].
pub(crate) fn sine(x: f64) -> f64 {
	debug_assert!((-PI..=PI).contains(&x));
	let x = if x > FRAC_PI_2 {
		PI - x
	} else if x < -FRAC_PI_2 {
		-PI - x
	} else {
		x
	};

	let x2 = x * x;
	let mut term = x;
	let mut sum = x;
	let mut n = 1.0;
	while n < 17.0 {
		term *= -x2 / ((n + 1.0) * (n + 2.0));
		sum += term;
		n += 2.0;
	}
	sum
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sine_test() {
		for i in -999..=999 {
			let x = PI * i as f64 / 1000.0;
			assert!((sine(x) - x.sin()).abs() < 1e-12, "x: {}", x);
		}
		assert_eq!(sine(0.0), 0.0);
		assert!((sine(FRAC_PI_2) - 1.0).abs() < 1e-12);
	}
}
