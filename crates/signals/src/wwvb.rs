//! Support for transmitting the WWVB time signal.
//!
//! See [NIST documentation](https://www.nist.gov/pml/time-and-frequency-division/time-distribution/radio-station-wwvb/wwvb-time-code-format)
//! for details. WWVB carries two independent codes on its 60 kHz carrier:
//!
//! - An amplitude code with the same slot structure as JJY but inverted keying: each second
//!   starts at reduced power, returning to full power after 0.2 s for a zero, 0.5 s for a one and
//!   0.8 s for a marker. Fields are in UTC, with US daylight saving time announced through bits 57
//!   and 58.
//! - A [phase code](https://www.nist.gov/publications/enhanced-wwvb-broadcast-format) that
//!   inverts the carrier 0.1 s after the start of a second. It carries minute-of-century with a
//!   Hamming check, DST state, and during six minutes of each half hour a fixed synchronization
//!   pattern.
//!
//! DUT1 is always sent as +0.0 and leap seconds are never announced. Minutes that would carry an
//! extended phase message are encoded like any other.
//!
//! # Examples
//! ```
//! # use signals::{wwvb::Wwvb, Protocol, Symbol};
//! # use time::Zone;
//! let wwvb = Wwvb::new(Zone::parse("PST8PDT,M3.2.0,M11.1.0").unwrap());
//! // Jul 4, 2012 17:30:02 UTC: tens of minutes, weight 20
//! let c = wwvb.calendar(1341423002);
//! assert_eq!(wwvb.symbol(&c), Symbol::One);
//! // Phase is inverted during the fixed ones at seconds 2-4
//! assert!(wwvb.phase(&c));
//! ```

use crate::bits::{CalendarBit, Field::*};
use crate::frame::{digit, Frame, Slot::{self, *}};
use crate::{Calendar, Carrier, Keying, Level, Protocol, Symbol};
use time::Zone;

/// Amplitude keying: low first, zero 0.2 s, one 0.5 s, marker 0.8 s.
pub const KEYING: Keying = Keying { lead: Level::Low, mark: 800, one: 500, zero: 200 };

/// Amplitude of the reduced carrier, -17 dB.
pub const LOW_LEVEL: f32 = 0.141;

/// Audio carrier; 60 kHz is its third harmonic.
pub const CARRIER: Carrier = Carrier::hz(20000);

const LEAP_YEAR: Slot = Slot::Bit(CalendarBit::LeapYear);
const LEAP_PENDING: Slot = Slot::Bit(CalendarBit::LeapSecondPending);
const DST_AT_END: Slot = Slot::Bit(CalendarBit::DstAtEnd);
const DST_AT_START: Slot = Slot::Bit(CalendarBit::DstAtStart);

/// The WWVB amplitude frame layout.
pub const FRAME: Frame = Frame::new([
	// 0-9: minute
	Mark, digit(Minute, 40), digit(Minute, 20), digit(Minute, 10), Zero,
	digit(Minute, 8), digit(Minute, 4), digit(Minute, 2), digit(Minute, 1), Mark,
	// 10-19: hour
	Zero, Zero, digit(Hour, 20), digit(Hour, 10), Zero,
	digit(Hour, 8), digit(Hour, 4), digit(Hour, 2), digit(Hour, 1), Mark,
	// 20-29: day of year, hundreds and tens
	Zero, Zero, digit(YearDay, 200), digit(YearDay, 100), Zero,
	digit(YearDay, 80), digit(YearDay, 40), digit(YearDay, 20), digit(YearDay, 10), Mark,
	// 30-39: day of year, units; DUT1 sign (+)
	digit(YearDay, 8), digit(YearDay, 4), digit(YearDay, 2), digit(YearDay, 1), Zero,
	Zero, One, Zero, One, Mark,
	// 40-49: DUT1 magnitude (0.0); year, tens
	Zero, Zero, Zero, Zero, Zero,
	digit(Year, 80), digit(Year, 40), digit(Year, 20), digit(Year, 10), Mark,
	// 50-59: year, units; flags
	digit(Year, 8), digit(Year, 4), digit(Year, 2), digit(Year, 1), Zero,
	LEAP_YEAR, LEAP_PENDING, DST_AT_END, DST_AT_START, Mark
]);

/// 127-bit sequence sent during the synchronization minutes, rotated by the half-hour.
pub const HALF_HOUR_SEQUENCE: [u64; 2] = [0x34bd771e648ab67f, 0xb5037c1610e8c4e5];

/// 106-bit word sent in the middle of the synchronization minutes.
pub const FIXED_TIMING_WORD: [u64; 2] = [0x42a5cb431d9a6b8b, 0x0000009207fb6b47];

#[inline]
const fn table_bit(table: &[u64; 2], i: usize) -> bool {
	(table[i / 64] >> (i % 64)) & 1 != 0
}

/// Phase code of one second outside the synchronization minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseSlot {
	/// Always 0
	Zero,
	/// Always 1
	One,
	/// Hamming parity bit `p` over the time bits
	Parity(u8),
	/// Bit `i` of minute-of-century
	Time(u8),
	/// DST starts or ends today
	DstChanging,
	/// DST is not in effect at any point today
	StandardAllDay,
	/// DST is in effect at the end of the day
	DstAtEnd,
	/// DST is in effect at the start of the day
	DstAtStart
}

/// Phase slot for `second`. Second 60 is a zero.
pub const fn phase_slot(second: u8) -> PhaseSlot {
	match second {
		2..=4 | 6 | 7 | 9 | 54 | 55 | 57 | 58 => PhaseSlot::One,
		13..=17 => PhaseSlot::Parity(17 - second),
		18 => PhaseSlot::Time(25),
		19 => PhaseSlot::Time(0),
		20..=28 => PhaseSlot::Time(44 - second),
		30..=38 => PhaseSlot::Time(45 - second),
		40..=46 => PhaseSlot::Time(46 - second),
		47 | 50 => PhaseSlot::DstChanging,
		48 => PhaseSlot::StandardAllDay,
		51 => PhaseSlot::DstAtEnd,
		52 => PhaseSlot::DstAtStart,
		_ => PhaseSlot::Zero
	}
}

/// The second carrying time bit `i`, for `i` in `0..=25`.
pub const fn time_bit_second(i: u8) -> u8 {
	match i {
		0 => 19,
		1..=6 => 46 - i,
		7..=15 => 45 - i,
		16..=24 => 44 - i,
		_ => 18
	}
}

#[inline]
const fn time_bit(minutes: u32, i: u8) -> bool {
	(minutes >> i) & 1 != 0
}

/// Odd Hamming parity bit `p` over time bits 1-25 of `minutes`.
pub fn hamming_parity(minutes: u32, p: u8) -> bool {
	(1..=25u8)
		.filter(|&i| i & (1u8 << p) != 0)
		.fold(true, |b, i| b ^ time_bit(minutes, i))
}

/// Where a synchronization minute second reads its phase bit from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPosition {
	/// Bit of [`HALF_HOUR_SEQUENCE`]
	Sequence(usize),
	/// Bit of [`FIXED_TIMING_WORD`]
	TimingWord(usize)
}

// Offsets indexed by [DST at end][DST at start][hour period]
const HALF_HOUR_OFFSETS: [[[i32; 3]; 2]; 2] = [
	[[1, 1, 1], [2, 82, 1]],
	[[1, 81, 2], [2, 2, 2]]
];

/// Rotation of [`HALF_HOUR_SEQUENCE`] for the half hour containing `calendar`.
pub fn half_hour_sequence(calendar: &Calendar) -> i32 {
	let tm = &calendar.tm;
	let period = match tm.hour {
		0..=3 => 0,
		4..=10 => 1,
		_ => 2
	};
	let offset = HALF_HOUR_OFFSETS[calendar.dst_at_end as usize][calendar.dst_at_start as usize][period];
	tm.hour as i32 * 4 + tm.min as i32 / 17 + offset
}

/// The synchronization bit for `calendar`, or `None` outside minutes 10-16 of each half hour.
pub fn sync_position(calendar: &Calendar) -> Option<SyncPosition> {
	let tm = &calendar.tm;
	if !(10..=16).contains(&(tm.min % 30)) {
		return None
	}

	let frame_sec = (tm.min % 10) as i32 * 60 + tm.sec as i32;
	Some(if frame_sec < 127 {
		let seq = half_hour_sequence(calendar);
		SyncPosition::Sequence((seq - 1 + frame_sec).rem_euclid(127) as usize)
	} else if frame_sec < 233 {
		SyncPosition::TimingWord((frame_sec - 127) as usize)
	} else {
		let seq = half_hour_sequence(calendar);
		SyncPosition::Sequence((seq + 358 - frame_sec).rem_euclid(127) as usize)
	})
}

/// Phase bit for the second described by `calendar`. `true` inverts the carrier.
pub fn phase_symbol(calendar: &Calendar) -> bool {
	match sync_position(calendar) {
		Some(SyncPosition::Sequence(i)) => return table_bit(&HALF_HOUR_SEQUENCE, i),
		Some(SyncPosition::TimingWord(i)) => return table_bit(&FIXED_TIMING_WORD, i),
		None => {}
	}

	match phase_slot(calendar.tm.sec) {
		PhaseSlot::Zero => false,
		PhaseSlot::One => true,
		PhaseSlot::Parity(p) => hamming_parity(calendar.minute_of_century(), p),
		PhaseSlot::Time(i) => time_bit(calendar.minute_of_century(), i),
		PhaseSlot::DstChanging => calendar.dst_at_end != calendar.dst_at_start,
		PhaseSlot::StandardAllDay => !calendar.dst_at_end && !calendar.dst_at_start,
		PhaseSlot::DstAtEnd => calendar.dst_at_end,
		PhaseSlot::DstAtStart => calendar.dst_at_start
	}
}

/// The WWVB time signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wwvb {
	zone: Zone
}

impl Wwvb {
	/// WWVB announcing the DST rules of `zone`. Time fields are always UTC.
	pub const fn new(zone: Zone) -> Wwvb {
		Wwvb { zone }
	}
}

impl Protocol for Wwvb {
	const PHASE_MODULATED: bool = true;

	fn name(&self) -> &'static str {
		"WWVB"
	}

	fn calendar(&self, time: i64) -> Calendar {
		Calendar::utc(time, &self.zone)
	}

	#[inline]
	fn symbol(&self, calendar: &Calendar) -> Symbol {
		FRAME.symbol(calendar)
	}

	#[inline]
	fn phase(&self, calendar: &Calendar) -> bool {
		phase_symbol(calendar)
	}

	fn keying(&self) -> Keying {
		KEYING
	}

	fn carrier(&self) -> Carrier {
		CARRIER
	}

	fn low_level(&self) -> f32 {
		LOW_LEVEL
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::frame::tests::{calendar, render};
	use proptest::prelude::*;
	use std::vec::Vec;

	fn pacific() -> Wwvb {
		Wwvb::new(Zone::parse("PST8PDT,M3.2.0,M11.1.0").unwrap())
	}

	// Phase bits of the whole minute starting at `base`
	fn phases(wwvb: &Wwvb, base: i64) -> Vec<bool> {
		(0..60).map(|s| wwvb.phase(&wwvb.calendar(base + s))).collect()
	}

	#[test]
	fn frame_test() {
		// Jul 4, 2012 17:30 UTC, day 186 of a leap year, DST all day
		let wwvb = pacific();
		let c = wwvb.calendar(1341423000);
		let s = render(&FRAME.symbols(&c));
		assert_eq!(&s[0..10], "MZOOZZZZZM");
		assert_eq!(&s[10..20], "ZZZOZZOOOM");
		assert_eq!(&s[20..30], "ZZZOZOZZZM");
		assert_eq!(&s[30..40], "ZOOZZZOZOM");
		assert_eq!(&s[40..50], "ZZZZZZZZOM");
		assert_eq!(&s[50..60], "ZZOZZOZOOM");
	}

	#[test]
	fn leap_year_test() {
		assert!(!FRAME.value(55, &calendar(55, 0, 0, 1, 2025, 3)));
		assert!(FRAME.value(55, &calendar(55, 0, 0, 1, 2024, 1)));
		assert!(!FRAME.value(55, &calendar(55, 0, 0, 1, 2100, 5)));
		assert!(!FRAME.value(56, &calendar(56, 0, 0, 1, 2024, 1)));
	}

	#[test]
	fn phase_test() {
		let wwvb = pacific();
		let p = phases(&wwvb, 1341423000);
		let minutes = 6578970;

		for s in [0, 1, 5, 8, 10, 11, 12, 29, 39, 49, 53, 56, 59] {
			assert!(!p[s], "second: {}", s);
		}
		for s in [2, 3, 4, 6, 7, 9, 54, 55, 57, 58] {
			assert!(p[s], "second: {}", s);
		}

		// Time bits land where expected
		for i in 0..=25 {
			assert_eq!(p[time_bit_second(i) as usize], (minutes >> i) & 1 != 0, "bit: {}", i);
		}

		// Hamming bits, decoded back from the transmitted time bits
		let bit = |i: u8| p[time_bit_second(i) as usize];
		for parity in 0..5u8 {
			let expected = (1..=25u8)
				.filter(|&i| i & (1u8 << parity) != 0)
				.fold(true, |b, i| b != bit(i));
			assert_eq!(p[17 - parity as usize], expected, "parity: {}", parity);
		}

		// DST all day
		assert_eq!((p[47], p[48], p[50], p[51], p[52]), (false, false, false, true, true));

		// Leap second
		assert!(!wwvb.phase(&calendar(60, 30, 17, 186, 2012, 3)));
	}

	#[test]
	fn dst_phase_test() {
		let wwvb = pacific();
		// Nov 3, 2024 12:00 UTC, DST ends at 09:00 UTC
		let p = phases(&wwvb, 1730635200);
		assert_eq!((p[47], p[48], p[50], p[51], p[52]), (true, false, true, false, true));
		// Jan 15, 2024 12:00 UTC
		let p = phases(&wwvb, 1705320000);
		assert_eq!((p[47], p[48], p[50], p[51], p[52]), (false, true, false, false, false));
	}

	#[test]
	fn sequence_test() {
		// No DST: hour * 4 + minute / 17 + 1
		for hour in 0..24 {
			for min in [10, 16, 40, 46] {
				let c = calendar(0, min, hour, 100, 2025, 4);
				assert_eq!(half_hour_sequence(&c), hour as i32 * 4 + min as i32 / 17 + 1);
			}
		}

		let mut c = calendar(0, 12, 5, 100, 2025, 4);
		c.dst_at_end = true;
		assert_eq!(half_hour_sequence(&c), 20 + 81);
		c.dst_at_start = true;
		assert_eq!(half_hour_sequence(&c), 22);
		c.dst_at_end = false;
		assert_eq!(half_hour_sequence(&c), 20 + 82);
		c.tm.hour = 3;
		assert_eq!(half_hour_sequence(&c), 14);
	}

	#[test]
	fn sync_test() {
		// 00:10:00, no DST: first bit of the sequence
		let c = calendar(0, 10, 0, 100, 2025, 4);
		assert_eq!(sync_position(&c), Some(SyncPosition::Sequence(0)));
		assert_eq!(phase_symbol(&c), table_bit(&HALF_HOUR_SEQUENCE, 0));

		// 00:12:07 is 127 seconds in
		let c = calendar(7, 12, 0, 100, 2025, 4);
		assert_eq!(sync_position(&c), Some(SyncPosition::TimingWord(0)));
		let c = calendar(52, 13, 0, 100, 2025, 4);
		assert_eq!(sync_position(&c), Some(SyncPosition::TimingWord(105)));

		// 00:13:53 is 233 seconds in
		let c = calendar(53, 13, 0, 100, 2025, 4);
		assert_eq!(sync_position(&c), Some(SyncPosition::Sequence(126)));

		// Outside the window the normal code applies
		assert_eq!(sync_position(&calendar(0, 9, 0, 100, 2025, 4)), None);
		assert_eq!(sync_position(&calendar(0, 17, 0, 100, 2025, 4)), None);
		assert!(sync_position(&calendar(0, 46, 0, 100, 2025, 4)).is_some());
	}

	#[test]
	fn time_bit_second_test() {
		for i in 0..=25 {
			assert_eq!(phase_slot(time_bit_second(i)), PhaseSlot::Time(i));
		}
	}

	proptest! {
		#[test]
		fn sync_in_bounds(
			min in 0u8..60,
			sec in 0u8..=60,
			hour in 0u8..24,
			end in any::<bool>(),
			start in any::<bool>()
		) {
			let mut c = calendar(sec, min, hour, 100, 2025, 4);
			c.dst_at_end = end;
			c.dst_at_start = start;
			match sync_position(&c) {
				Some(SyncPosition::Sequence(i)) => prop_assert!(i < 127),
				Some(SyncPosition::TimingWord(i)) => prop_assert!(i < 106),
				None => prop_assert!(!(10..=16).contains(&(min % 30)))
			}
		}
	}
}
