//! Encode longwave time signals as audio.
//!
//! This crate renders two station formats as a continuous sample stream: [JJY] (a 60-bit
//! amplitude code in Japanese civil time) and [WWVB] (a 60-bit amplitude code in UTC plus an
//! independent phase-modulated code). The stream is meant for a real-time audio callback: a
//! [`Transmitter`] fills buffers of any length, recomputing the time code only at second
//! boundaries and otherwise copying precomputed [`Wavetable`] samples.
//!
//! The pieces, leaf first:
//! - [`bits`]: BCD and predicate bits derived from a [`Calendar`]
//! - [`frame`]: per-second [`Slot`] tables resolving to a [`Symbol`]
//! - [`jjy`], [`wwvb`]: the two protocols, including the WWVB phase code
//! - [`wavetable`]: carrier tables at a fixed ratio to the sample rate
//! - [`scheduler`]: the sample clock
//!
//! This crate is `no_std` by default and includes a small sine implementation for building
//! wavetables. Enabling feature `std` uses [`f64::sin`] instead.
//!
//! [JJY]: https://en.wikipedia.org/wiki/JJY
//! [WWVB]: https://en.wikipedia.org/wiki/WWVB
//!
//! # Examples
//! ```
//! # use signals::{jjy::{Band, Jjy}, Symbol, Transmitter};
//! # use time::{TimeSpec, Zone};
//! // Jul 4, 2020 11:36:00 JST, at the start of a minute
//! let start = TimeSpec { sec: 1593830160, nsec: 0 };
//! let mut tx = Transmitter::new(Jjy::new(Zone::JST, Band::Khz60), 48000, start).unwrap();
//! assert_eq!(tx.symbol(), Symbol::Mark);
//!
//! // Render one second in audio-callback sized pieces
//! let mut buf = [0f32; 480];
//! for _ in 0..100 {
//! 	tx.advance(&mut buf);
//! }
//! assert_eq!(tx.time(), 1593830161);
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod bits;
pub mod calendar;
pub mod frame;
pub mod jjy;
pub mod scheduler;
pub mod wavetable;
pub mod wwvb;

pub use calendar::Calendar;
pub use frame::{Frame, Slot, Symbol};
pub use scheduler::Transmitter;
pub use wavetable::{Carrier, Wavetable};

/// Carrier amplitude state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
	/// Full amplitude
	High,
	/// Attenuated amplitude
	Low
}

impl Level {
	/// The other level.
	#[inline]
	pub const fn opposite(self) -> Level {
		match self {
			Level::High => Level::Low,
			Level::Low => Level::High
		}
	}
}

/// How a protocol keys a [`Symbol`] onto the carrier.
///
/// Every second starts at the `lead` level, held for a symbol-dependent duration, then switches
/// to the opposite level for the rest of the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keying {
	/// Level at the start of each second
	pub lead: Level,
	/// Lead duration for [`Symbol::Mark`], in milliseconds
	pub mark: u32,
	/// Lead duration for [`Symbol::One`], in milliseconds
	pub one: u32,
	/// Lead duration for [`Symbol::Zero`], in milliseconds
	pub zero: u32
}

impl Keying {
	/// Lead duration for `symbol`, in milliseconds.
	pub const fn lead_ms(&self, symbol: Symbol) -> u32 {
		match symbol {
			Symbol::Mark => self.mark,
			Symbol::One => self.one,
			Symbol::Zero => self.zero
		}
	}

	/// Lead duration for `symbol`, in samples at `rate`.
	///
	/// # Examples
	///
	/// ```
	/// # use signals::{jjy, Symbol};
	/// assert_eq!(jjy::KEYING.lead_samples(Symbol::Mark, 48000), 9600);
	/// assert_eq!(jjy::KEYING.lead_samples(Symbol::Zero, 44100), 35280);
	/// ```
	pub const fn lead_samples(&self, symbol: Symbol, rate: u32) -> u32 {
		let (ms, per_second) = shrink(self.lead_ms(symbol) as u64, 1000);
		(rate as u64 * ms / per_second) as u32
	}
}

/// A time signal format.
///
/// Implementations derive a [`Calendar`] for each second and map it to the amplitude
/// [`Symbol`] (and, for phase-modulated formats, the phase bit) of that second. Everything here
/// is called from the audio callback and must not block or allocate.
pub trait Protocol {
	/// Whether the format carries a phase-modulated code alongside the amplitude code.
	const PHASE_MODULATED: bool = false;

	/// Short display name.
	fn name(&self) -> &'static str;

	/// Calendar fields for Unix second `time`.
	fn calendar(&self, time: i64) -> Calendar;

	/// Amplitude symbol for the second described by `calendar`.
	fn symbol(&self, calendar: &Calendar) -> Symbol;

	/// Phase bit for the second described by `calendar`. `true` is a 180° inversion.
	fn phase(&self, _calendar: &Calendar) -> bool {
		false
	}

	/// Lead level and durations.
	fn keying(&self) -> Keying;

	/// Audio carrier standing in for the station frequency.
	fn carrier(&self) -> Carrier;

	/// Amplitude of [`Level::Low`] relative to [`Level::High`].
	fn low_level(&self) -> f32;
}

/// The error type for configuring a [`Transmitter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// The sample rate is zero.
	#[error("Unsupported sample rate: {0} Hz")]
	UnsupportedSampleRate(u32),
	/// The carrier has a zero numerator or denominator.
	#[error("Invalid carrier frequency: {num}/{den} Hz")]
	InvalidCarrier {
		/// Carrier numerator
		num: u32,
		/// Carrier denominator
		den: u32
	},
	/// The carrier cannot be represented at this sample rate.
	#[error("Carrier frequency {num}/{den} Hz is at or above the Nyquist frequency for {rate} Hz")]
	CarrierAboveNyquist {
		/// Carrier numerator
		num: u32,
		/// Carrier denominator
		den: u32,
		/// Sample rate
		rate: u32
	},
	/// A table holding a whole number of carrier cycles would be too long.
	#[error("Wavetable needs {len} samples, more than the maximum of {max}")]
	TableTooLong {
		/// Required table length
		len: u64,
		/// Supported table length
		max: usize
	},
	/// No rotation of the table is exactly half a carrier cycle.
	#[error("No wavetable rotation gives a 180 degree phase shift at {rate} Hz")]
	NoHalfTurn {
		/// Sample rate
		rate: u32
	}
}

/// Find the minimum `(u, v)` such that `x * u / v == x * l / r` assuming no overflow.
///
/// This function calculates the greatest common divisor of `l` and `r`, and then returns
/// `l / gcd` and `r / gcd`.
///
/// # Examples
/// ```ignore
/// assert_eq!(shrink(500, 10), (50, 1));
/// assert_eq!(shrink(20000, 48000), (5, 12));
/// ```
const fn shrink(l: u64, r: u64) -> (u64, u64) {
	// Source: https://en.wikipedia.org/wiki/Binary_GCD_algorithm
	if l == 0 || r == 0 { return (l, r) }

	let i = l.trailing_zeros();
	let j = r.trailing_zeros();
	let k = if j < i { j } else { i };
	let mut u = l >> i;
	let mut v = r >> j;

	loop {
		if u > v {
			let tmp = u;
			u = v;
			v = tmp;
		}

		v -= u;

		if v == 0 {
			let gcd = u << k;
			break (l / gcd, r / gcd)
		}

		v >>= v.trailing_zeros();
	}
}

/// 64-bit sine function.
///
/// This version simply uses [`f64::sin`].
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[inline(always)]
fn sine(x: f64) -> f64 {
	x.sin()
}

#[cfg(any(test, not(feature = "std")))]
mod sin;
#[cfg(not(feature = "std"))]
use sin::sine;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shrink_test() {
		assert_eq!(shrink(500, 10), (50, 1));
		assert_eq!(shrink(20000, 48000), (5, 12));
		assert_eq!(shrink(40000, 144000), (5, 18));
		assert_eq!(shrink(20000, 44100), (200, 441));
		assert_eq!(shrink(0, 7), (0, 7));
		let (l, r) = const { shrink(1000, 500000) };
		assert_eq!(1234567890987654321 * l / r, 2469135781975308);
	}

	#[test]
	fn keying_test() {
		assert_eq!(Level::High.opposite(), Level::Low);
		assert_eq!(jjy::KEYING.lead, Level::High);
		assert_eq!(wwvb::KEYING.lead, Level::Low);
		assert_eq!(jjy::KEYING.lead_samples(Symbol::One, 48000), 24000);
		assert_eq!(wwvb::KEYING.lead_samples(Symbol::Mark, 48000), 38400);
		assert_eq!(wwvb::KEYING.lead_samples(Symbol::Zero, 44100), 8820);
	}
}
