//! Precomputed carrier samples.
//!
//! A [`Wavetable`] holds the shortest run of samples that spans a whole number of carrier cycles
//! at a given sample rate. Playing it in a loop reproduces the carrier exactly, so the audio
//! callback never evaluates a sine. For a 20 kHz carrier at 48 kHz that is 12 samples covering 5
//! cycles.

use crate::{shrink, sine, ConfigError, Level};
use core::f64::consts::PI;

/// Longest supported table.
pub const MAX_TABLE_LEN: usize = 1024;

/// A carrier frequency of `num / den` Hz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carrier {
	/// Numerator, in Hz
	pub num: u32,
	/// Denominator
	pub den: u32
}

impl Carrier {
	/// A whole number of Hz.
	pub const fn hz(hz: u32) -> Carrier {
		Carrier { num: hz, den: 1 }
	}

	/// `num / den` Hz.
	pub const fn ratio(num: u32, den: u32) -> Carrier {
		Carrier { num, den }
	}
}

/// High and low amplitude samples of a carrier.
#[derive(Clone, Debug)]
pub struct Wavetable {
	high: [f32; MAX_TABLE_LEN],
	low: [f32; MAX_TABLE_LEN],
	len: usize,
	cycles: usize,
	half_turn: Option<usize>
}

impl Wavetable {
	/// Build tables for `carrier` at `rate`, with the low table scaled by `low_level`.
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] if `rate` is zero, the carrier is zero or at least half of
	/// `rate`, or a whole number of cycles needs more than [`MAX_TABLE_LEN`] samples.
	///
	/// # Examples
	///
	/// ```
	/// # use signals::{Carrier, Wavetable};
	/// let table = Wavetable::new(Carrier::hz(20000), 48000, 0.1).unwrap();
	/// assert_eq!((table.len(), table.cycles()), (12, 5));
	/// assert_eq!(table.half_turn(), Some(6));
	/// ```
	pub fn new(carrier: Carrier, rate: u32, low_level: f32) -> Result<Wavetable, ConfigError> {
		let Carrier { num, den } = carrier;
		if rate == 0 {
			return Err(ConfigError::UnsupportedSampleRate(rate))
		}
		if num == 0 || den == 0 {
			return Err(ConfigError::InvalidCarrier { num, den })
		}
		if 2 * num as u64 >= den as u64 * rate as u64 {
			return Err(ConfigError::CarrierAboveNyquist { num, den, rate })
		}

		let (cycles, len) = shrink(num as u64, den as u64 * rate as u64);
		if len > MAX_TABLE_LEN as u64 {
			return Err(ConfigError::TableTooLong { len, max: MAX_TABLE_LEN })
		}
		let (cycles, len) = (cycles as usize, len as usize);

		let mut high = [0f32; MAX_TABLE_LEN];
		let mut low = [0f32; MAX_TABLE_LEN];
		for i in 0..len {
			// Phase in [-len/2, len/2] so the argument stays within [-π, π]
			let m = (i * cycles) % len;
			let m = if 2 * m > len { m as f64 - len as f64 } else { m as f64 };
			let x = (2. * PI * m / len as f64).clamp(-PI, PI);
			high[i] = sine(x) as f32;
			low[i] = high[i] * low_level;
		}

		// Rotation k with k * cycles / len == 1/2 (mod 1)
		let half_turn = (0..len).find(|&k| (2 * k * cycles) % (2 * len) == len);

		Ok(Wavetable { high, low, len, cycles, half_turn })
	}

	/// Number of samples in one loop of the table.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Always `false`; tables hold at least one sample.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Carrier cycles in one loop of the table.
	#[inline]
	pub fn cycles(&self) -> usize {
		self.cycles
	}

	/// Index offset that shifts the carrier by 180°, if one exists.
	#[inline]
	pub fn half_turn(&self) -> Option<usize> {
		self.half_turn
	}

	/// One loop of samples at `level`.
	#[inline]
	pub fn samples(&self, level: Level) -> &[f32] {
		match level {
			Level::High => &self.high[..self.len],
			Level::Low => &self.low[..self.len]
		}
	}

	/// Sample `index` (wrapping) at `level`.
	#[inline]
	pub fn sample(&self, level: Level, index: usize) -> f32 {
		self.samples(level)[index % self.len]
	}

	/// Copy samples at `level` into `out`, starting at table position `index + rotation`.
	///
	/// Returns the index following the last sample written.
	pub fn render(&self, level: Level, index: usize, rotation: usize, out: &mut [f32]) -> usize {
		let table = self.samples(level);
		let mut index = index % self.len;
		let mut pos = (index + rotation) % self.len;
		for sample in out.iter_mut() {
			*sample = table[pos];
			index += 1;
			pos += 1;
			if index == self.len { index = 0 }
			if pos == self.len { pos = 0 }
		}
		index
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_size_test() {
		let t = Wavetable::new(Carrier::hz(20000), 48000, 0.1).unwrap();
		assert_eq!((t.len(), t.cycles(), t.half_turn()), (12, 5, Some(6)));
		assert!(!t.is_empty());

		let t = Wavetable::new(Carrier::ratio(40000, 3), 48000, 0.1).unwrap();
		assert_eq!((t.len(), t.cycles(), t.half_turn()), (18, 5, Some(9)));

		let t = Wavetable::new(Carrier::hz(20000), 44100, 0.1).unwrap();
		assert_eq!((t.len(), t.cycles(), t.half_turn()), (441, 200, None));

		let t = Wavetable::new(Carrier::hz(20000), 96000, 0.1).unwrap();
		assert_eq!((t.len(), t.cycles(), t.half_turn()), (24, 5, Some(12)));
	}

	#[test]
	fn sample_test() {
		let t = Wavetable::new(Carrier::hz(20000), 48000, 0.25).unwrap();
		let high = t.samples(Level::High);
		let low = t.samples(Level::Low);
		assert_eq!(high.len(), 12);
		assert_eq!(high[0], 0.);
		// 3 * 5 / 12 = 1.25 cycles
		assert!((high[3] - 1.).abs() < 1e-6);
		for i in 0..12 {
			let expected = (2. * PI * (i * 5) as f64 / 12.).sin() as f32;
			assert!((high[i] - expected).abs() < 1e-6, "index: {}", i);
			assert_eq!(low[i], high[i] * 0.25);
			assert!((t.sample(Level::High, i + 6) + high[i]).abs() < 1e-6);
		}
		assert_eq!(t.sample(Level::Low, 15), low[3]);
	}

	#[test]
	fn render_test() {
		let t = Wavetable::new(Carrier::hz(20000), 48000, 0.1).unwrap();
		let mut out = [0f32; 5];
		assert_eq!(t.render(Level::High, 10, 0, &mut out), 3);
		for (j, s) in out.iter().enumerate() {
			assert_eq!(*s, t.sample(Level::High, 10 + j));
		}
		assert_eq!(t.render(Level::Low, 10, 6, &mut out), 3);
		for (j, s) in out.iter().enumerate() {
			assert_eq!(*s, t.sample(Level::Low, 16 + j));
		}
	}

	#[test]
	fn error_test() {
		assert_eq!(Wavetable::new(Carrier::hz(20000), 0, 0.1).unwrap_err(), ConfigError::UnsupportedSampleRate(0));
		assert_eq!(
			Wavetable::new(Carrier::hz(0), 48000, 0.1).unwrap_err(),
			ConfigError::InvalidCarrier { num: 0, den: 1 }
		);
		assert_eq!(
			Wavetable::new(Carrier::ratio(20000, 0), 48000, 0.1).unwrap_err(),
			ConfigError::InvalidCarrier { num: 20000, den: 0 }
		);
		assert_eq!(
			Wavetable::new(Carrier::hz(24000), 48000, 0.1).unwrap_err(),
			ConfigError::CarrierAboveNyquist { num: 24000, den: 1, rate: 48000 }
		);
		assert_eq!(
			Wavetable::new(Carrier::ratio(40000, 3), 44100, 0.1).unwrap_err(),
			ConfigError::TableTooLong { len: 1323, max: MAX_TABLE_LEN }
		);
	}
}
