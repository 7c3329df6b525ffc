//! Support for transmitting the JJY time signal.
//!
//! See [JJY documentation](https://www.nict.go.jp/en/sts/jjy_signal.html) for details. This module
//! implements the time-related part of JJY's time code. The alternate layout of minutes 15 and 45
//! (call sign announcement and service interruption bits) is not produced; those minutes are
//! encoded like any other. Leap seconds are never announced.
//!
//! Each second starts at full power and drops to 10% after 0.2 s for a marker, 0.5 s for a one
//! and 0.8 s for a zero. Fields are in civil time, normally Japan Standard Time.
//!
//! JJY broadcasts on 40 kHz (Fukushima) and 60 kHz (Kyushu). Audio outputs can't reach either, so
//! the carrier is a sub-harmonic chosen to land on the station frequency as an odd harmonic of the
//! speaker's output: 20 kHz for 60 kHz, and 40/3 kHz for 40 kHz.
//!
//! # Examples
//! ```
//! # use signals::{jjy::{self, Band, Jjy}, Protocol, Symbol};
//! # use time::Zone;
//! let jjy = Jjy::new(Zone::JST, Band::Khz40);
//! // Jul 4, 2020 11:36:01 JST: tens of minutes, weight 40
//! let c = jjy.calendar(1593830161);
//! assert_eq!(jjy.symbol(&c), Symbol::Zero);
//! assert_eq!(jjy::FRAME.slot(9), signals::Slot::Mark);
//! ```

use crate::bits::{CalendarBit, Field::*};
use crate::frame::{digit, parity, Frame, Slot::{self, *}};
use crate::{Calendar, Carrier, Keying, Level, Protocol, Symbol};
use time::Zone;

/// Broadcast frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
	/// Ōtakadoya-yama, Fukushima
	Khz40,
	/// Hagane-yama, Kyushu
	Khz60
}

impl Band {
	/// Audio carrier standing in for this band.
	pub const fn carrier(self) -> Carrier {
		match self {
			Band::Khz40 => Carrier::ratio(40000, 3),
			Band::Khz60 => Carrier::hz(20000)
		}
	}
}

/// Amplitude keying: high first, marker 0.2 s, one 0.5 s, zero 0.8 s.
pub const KEYING: Keying = Keying { lead: Level::High, mark: 200, one: 500, zero: 800 };

/// Amplitude of the reduced carrier.
pub const LOW_LEVEL: f32 = 0.1;

const LEAP_PENDING: Slot = Slot::Bit(CalendarBit::LeapSecondPending);
const LEAP_SIGN: Slot = Slot::Bit(CalendarBit::LeapSecondInserted);

/// The JJY frame layout.
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
	// 30-39: day of year, units; parity
	digit(YearDay, 8), digit(YearDay, 4), digit(YearDay, 2), digit(YearDay, 1), Zero,
	Zero, parity(12, 18), parity(1, 8), Zero, Mark,
	// 40-49: year
	Zero, digit(Year, 80), digit(Year, 40), digit(Year, 20), digit(Year, 10),
	digit(Year, 8), digit(Year, 4), digit(Year, 2), digit(Year, 1), Mark,
	// 50-59: weekday, leap second
	digit(Weekday, 4), digit(Weekday, 2), digit(Weekday, 1), LEAP_PENDING, LEAP_SIGN,
	Zero, Zero, Zero, Zero, Mark
]);

/// The JJY time signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jjy {
	zone: Zone,
	band: Band
}

impl Jjy {
	/// JJY on `band`, with fields in `zone`'s civil time. [`Zone::JST`] matches the real station.
	pub const fn new(zone: Zone, band: Band) -> Jjy {
		Jjy { zone, band }
	}

	/// The broadcast band.
	pub const fn band(&self) -> Band {
		self.band
	}
}

impl Protocol for Jjy {
	fn name(&self) -> &'static str {
		match self.band {
			Band::Khz40 => "JJY 40 kHz",
			Band::Khz60 => "JJY 60 kHz"
		}
	}

	fn calendar(&self, time: i64) -> Calendar {
		Calendar::civil(time, &self.zone)
	}

	#[inline]
	fn symbol(&self, calendar: &Calendar) -> Symbol {
		FRAME.symbol(calendar)
	}

	fn keying(&self) -> Keying {
		KEYING
	}

	fn carrier(&self) -> Carrier {
		self.band.carrier()
	}

	fn low_level(&self) -> f32 {
		LOW_LEVEL
	}
}
