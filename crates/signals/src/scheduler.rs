//! The sample clock.
//!
//! A [`Transmitter`] owns everything needed to turn a [`Protocol`] into samples: the wavetables,
//! the position within the current second and the symbol being sent. Each call to
//! [`Transmitter::advance`] renders the next samples in runs that end at one of three boundaries
//! within a second:
//!
//! - the end of the lead, where the carrier switches level,
//! - the phase point 0.1 s into the second, where a phase-modulated protocol may invert the
//!   carrier,
//! - the end of the second, where the next second's symbol is computed.
//!
//! Between boundaries samples are copied straight from the wavetable.

use crate::wavetable::Wavetable;
use crate::{Calendar, ConfigError, Keying, Protocol, Symbol};
use time::TimeSpec;

/// Samples per run when fanning out to multiple channels.
const SCRATCH_LEN: usize = 256;

/// Streaming sample generator for a time signal.
///
/// # Examples
/// ```
/// # use signals::{wwvb::Wwvb, Transmitter};
/// # use time::{TimeSpec, Zone};
/// let start = TimeSpec { sec: 1341423002, nsec: 500_000_000 };
/// let mut tx = Transmitter::new(Wwvb::new(Zone::UTC), 48000, start).unwrap();
/// assert_eq!(tx.sample_index(), 24000);
///
/// // Stereo, interleaved
/// let mut buf = [0f32; 1024];
/// tx.fill(&mut buf, 2);
/// assert_eq!(buf[0], buf[1]);
/// assert_eq!(tx.sample_index(), 24512);
/// ```
#[derive(Clone, Debug)]
pub struct Transmitter<P> {
	protocol: P,
	table: Wavetable,
	keying: Keying,
	rate: u32,
	phase_point: u32,
	half_turn: usize,
	time: i64,
	sample: u32,
	index: usize,
	rotation: usize,
	phase_pending: bool,
	phase: bool,
	calendar: Calendar,
	symbol: Symbol,
	lead: u32
}

impl<P: Protocol> Transmitter<P> {
	/// Start transmitting `protocol` at `rate` samples per second, from instant `start`.
	///
	/// # Errors
	///
	/// Returns a [`ConfigError`] if the protocol's carrier can't be tabulated at `rate`, or if the
	/// protocol is phase modulated and no table rotation is exactly 180°.
	pub fn new(protocol: P, rate: u32, start: TimeSpec) -> Result<Transmitter<P>, ConfigError> {
		let table = Wavetable::new(protocol.carrier(), rate, protocol.low_level())?;
		let half_turn = match (P::PHASE_MODULATED, table.half_turn()) {
			(false, _) => 0,
			(true, Some(half_turn)) => half_turn,
			(true, None) => return Err(ConfigError::NoHalfTurn { rate })
		};

		let keying = protocol.keying();
		let nsec = start.nsec.clamp(0, 999_999_999) as u64;
		let sample = (nsec * rate as u64 / 1_000_000_000) as u32;
		let calendar = protocol.calendar(start.sec);
		let symbol = protocol.symbol(&calendar);
		let phase_point = rate / 10;

		let mut tx = Transmitter {
			index: sample as usize % table.len(),
			protocol,
			table,
			keying,
			rate,
			phase_point,
			half_turn,
			time: start.sec,
			sample,
			rotation: 0,
			phase_pending: false,
			phase: false,
			calendar,
			symbol,
			lead: keying.lead_samples(symbol, rate)
		};

		if P::PHASE_MODULATED {
			// Before the phase point the previous second's phase is still on air
			let phase = if sample < phase_point {
				let previous = tx.protocol.calendar(start.sec - 1);
				tx.protocol.phase(&previous)
			} else {
				tx.protocol.phase(&tx.calendar)
			};
			tx.set_phase(phase);
			tx.phase_pending = sample < phase_point;
		}

		Ok(tx)
	}

	/// Render the next `out.len()` mono samples.
	pub fn advance(&mut self, mut out: &mut [f32]) {
		while !out.is_empty() {
			if self.phase_pending && self.sample >= self.phase_point {
				let phase = self.protocol.phase(&self.calendar);
				self.set_phase(phase);
				self.phase_pending = false;
			}

			let (level, mut until) = if self.sample < self.lead {
				(self.keying.lead, self.lead)
			} else {
				(self.keying.lead.opposite(), self.rate)
			};
			if self.phase_pending && self.phase_point < until {
				until = self.phase_point;
			}

			let n = ((until - self.sample) as usize).min(out.len());
			let (run, rest) = core::mem::take(&mut out).split_at_mut(n);
			self.index = self.table.render(level, self.index, self.rotation, run);
			out = rest;

			self.sample += n as u32;
			if self.sample >= self.rate {
				self.next_second();
			}
		}
	}

	/// Render interleaved frames into `data`, writing the same sample to each of `channels`.
	pub fn fill(&mut self, data: &mut [f32], channels: usize) {
		if channels <= 1 {
			return self.advance(data)
		}

		let mut scratch = [0f32; SCRATCH_LEN];
		for frames in data.chunks_mut(SCRATCH_LEN * channels) {
			let mono = &mut scratch[..frames.len().div_ceil(channels)];
			self.advance(mono);
			for (frame, &sample) in frames.chunks_mut(channels).zip(mono.iter()) {
				frame.fill(sample);
			}
		}
	}

	fn next_second(&mut self) {
		self.time += 1;
		self.sample = 0;
		self.calendar = self.protocol.calendar(self.time);
		self.symbol = self.protocol.symbol(&self.calendar);
		self.lead = self.keying.lead_samples(self.symbol, self.rate);
		self.phase_pending = P::PHASE_MODULATED;
	}

	fn set_phase(&mut self, phase: bool) {
		self.phase = phase;
		self.rotation = if phase { self.half_turn } else { 0 };
	}

	/// The protocol being transmitted.
	pub fn protocol(&self) -> &P {
		&self.protocol
	}

	/// Unix second currently being transmitted.
	#[inline]
	pub fn time(&self) -> i64 {
		self.time
	}

	/// Samples already rendered in the current second.
	#[inline]
	pub fn sample_index(&self) -> u32 {
		self.sample
	}

	/// Symbol of the current second.
	#[inline]
	pub fn symbol(&self) -> Symbol {
		self.symbol
	}

	/// Samples at the lead level in the current second.
	#[inline]
	pub fn lead_samples(&self) -> u32 {
		self.lead
	}

	/// Whether the carrier is currently inverted.
	#[inline]
	pub fn phase(&self) -> bool {
		self.phase
	}

	/// Calendar of the current second.
	#[inline]
	pub fn calendar(&self) -> &Calendar {
		&self.calendar
	}

	/// Samples per second.
	#[inline]
	pub fn sample_rate(&self) -> u32 {
		self.rate
	}

	/// The carrier tables.
	#[inline]
	pub fn table(&self) -> &Wavetable {
		&self.table
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::jjy::{Band, Jjy};
	use crate::wwvb::Wwvb;
	use crate::Level;
	use proptest::prelude::*;
	use std::{vec, vec::Vec};
	use time::Zone;

	const RATE: u32 = 48000;
	const JJY: Jjy = Jjy::new(Zone::JST, Band::Khz60);
	// Jul 4, 2020 11:36:00 JST
	const JJY_START: i64 = 1593830160;
	// Jul 4, 2012 17:30:00 UTC
	const WWVB_START: i64 = 1341423000;

	fn at(sec: i64) -> TimeSpec {
		TimeSpec { sec, nsec: 0 }
	}

	fn pacific() -> Wwvb {
		Wwvb::new(Zone::parse("PST8PDT,M3.2.0,M11.1.0").unwrap())
	}

	fn render<P: Protocol>(tx: &mut Transmitter<P>, len: usize, chunk: usize) -> Vec<f32> {
		let mut out = vec![0f32; len];
		for run in out.chunks_mut(chunk) {
			tx.advance(run);
		}
		out
	}

	#[test]
	fn init_test() {
		let tx = Transmitter::new(JJY, RATE, at(JJY_START)).unwrap();
		assert_eq!((tx.time(), tx.sample_index()), (JJY_START, 0));
		assert_eq!(tx.symbol(), Symbol::Mark);
		assert_eq!(tx.lead_samples(), 9600);
		assert!(!tx.phase());
		assert_eq!(tx.sample_rate(), RATE);
		assert_eq!(tx.calendar().tm.min, 36);

		// Second 2 of 11:36 is a one
		let tx = Transmitter::new(JJY, RATE, TimeSpec { sec: JJY_START + 2, nsec: 250_000_001 }).unwrap();
		assert_eq!((tx.time(), tx.sample_index()), (JJY_START + 2, 12000));
		assert_eq!(tx.symbol(), Symbol::One);
		assert_eq!(tx.lead_samples(), 24000);

		let tx = Transmitter::new(JJY, 44100, TimeSpec { sec: JJY_START, nsec: 999_999_999 }).unwrap();
		assert_eq!(tx.sample_index(), 44099);
		assert_eq!(tx.table().len(), 441);
	}

	#[test]
	fn config_error_test() {
		assert_eq!(
			Transmitter::new(pacific(), 44100, at(WWVB_START)).unwrap_err(),
			ConfigError::NoHalfTurn { rate: 44100 }
		);
		assert_eq!(Transmitter::new(JJY, 0, at(JJY_START)).unwrap_err(), ConfigError::UnsupportedSampleRate(0));
		assert!(Transmitter::new(Jjy::new(Zone::JST, Band::Khz40), 96000, at(JJY_START)).is_ok());
	}

	#[test]
	fn keying_test() {
		let mut tx = Transmitter::new(JJY, RATE, at(JJY_START)).unwrap();
		let out = render(&mut tx, RATE as usize, 480);
		let table = tx.table().clone();
		for (i, s) in out.iter().enumerate() {
			let level = if i < 9600 { Level::High } else { Level::Low };
			assert_eq!(*s, table.sample(level, i), "sample: {}", i);
		}
		assert_eq!((tx.time(), tx.sample_index()), (JJY_START + 1, 0));
		// Minute 36: weight 40 is a zero
		assert_eq!(tx.symbol(), Symbol::Zero);
		assert_eq!(tx.lead_samples(), 38400);
	}

	#[test]
	fn phase_test() {
		// Second 2 is an amplitude one and a phase one; second 1 is phase zero
		let mut tx = Transmitter::new(pacific(), RATE, at(WWVB_START + 2)).unwrap();
		assert!(!tx.phase());
		assert_eq!(tx.symbol(), Symbol::One);
		assert_eq!(tx.lead_samples(), 24000);

		let out = render(&mut tx, RATE as usize, 1000);
		let table = tx.table().clone();
		for (j, s) in out.iter().enumerate() {
			let expected = match j {
				0..4800 => table.sample(Level::Low, j),
				4800..24000 => table.sample(Level::Low, j + 6),
				_ => table.sample(Level::High, j + 6)
			};
			assert_eq!(*s, expected, "sample: {}", j);
		}
		assert!(tx.phase());

		// Started after the phase point, the current second's phase applies at once
		let tx = Transmitter::new(pacific(), RATE, TimeSpec { sec: WWVB_START + 2, nsec: 200_000_000 }).unwrap();
		assert!(tx.phase());
		// Second 5 is phase zero, second 4 phase one
		let mut tx = Transmitter::new(pacific(), RATE, at(WWVB_START + 5)).unwrap();
		assert!(tx.phase());
		render(&mut tx, 4801, 4801);
		assert!(!tx.phase());
	}

	#[test]
	fn conservation_test() {
		let mut tx = Transmitter::new(pacific(), RATE, at(WWVB_START)).unwrap();
		render(&mut tx, 60 * RATE as usize, 1000);
		assert_eq!((tx.time(), tx.sample_index()), (WWVB_START + 60, 0));

		// Runs much longer than a second
		let mut tx = Transmitter::new(JJY, RATE, at(JJY_START)).unwrap();
		render(&mut tx, 60 * RATE as usize, 100_000);
		assert_eq!((tx.time(), tx.sample_index()), (JJY_START + 60, 0));
	}

	#[test]
	fn fill_test() {
		let start = TimeSpec { sec: WWVB_START, nsec: 50_000_000 };
		let mut mono = Transmitter::new(pacific(), RATE, start).unwrap();
		let mut stereo = mono.clone();
		let expected = render(&mut mono, 10_000, 10_000);

		let mut out = vec![0f32; 20_000];
		for run in out.chunks_mut(1000) {
			stereo.fill(run, 2);
		}
		for (i, frame) in out.chunks(2).enumerate() {
			assert_eq!(frame, [expected[i], expected[i]], "frame: {}", i);
		}
		assert_eq!(stereo.sample_index(), mono.sample_index());
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(32))]

		#[test]
		fn chunking_independent(chunk in 1usize..6000, nsec in 0i64..1_000_000_000) {
			let start = TimeSpec { sec: WWVB_START + 7, nsec };
			let mut whole = Transmitter::new(pacific(), RATE, start).unwrap();
			let mut chunked = whole.clone();
			let len = 3 * RATE as usize;
			prop_assert_eq!(render(&mut whole, len, len), render(&mut chunked, len, chunk));
			prop_assert_eq!(whole.time(), chunked.time());
			prop_assert_eq!(whole.sample_index(), chunked.sample_index());
		}

		#[test]
		fn samples_conserved(chunks in prop::collection::vec(1usize..100_000, 1..20)) {
			let mut tx = Transmitter::new(JJY, RATE, at(JJY_START)).unwrap();
			let mut out = vec![0f32; 100_000];
			for &n in &chunks {
				tx.advance(&mut out[..n]);
			}
			let total: usize = chunks.iter().sum();
			prop_assert_eq!(tx.time(), JJY_START + (total / RATE as usize) as i64);
			prop_assert_eq!(tx.sample_index() as usize, total % RATE as usize);
		}
	}
}
