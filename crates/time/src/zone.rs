//! Civil time zones: fixed offsets, POSIX TZ rules, and the process's ambient zone.
//!
//! A [`Zone`] answers one question, "what is the UTC offset and DST state at this instant?",
//! through [`Zone::info`]. Rules follow the [TZ string] format, including the extended POSIX
//! transition times (negative, or beyond 24 hours). With the `local` feature enabled,
//! [`Zone::Local`] delegates to libc's `localtime_r`, which understands every zone the system
//! does (including `TZ=Area/City` names).
//!
//! Leap seconds are not modelled.
//!
//! [TZ string]: https://www.gnu.org/software/libc/manual/html_node/TZ-Variable.html
//!
//! # Examples
//!
//! ```
//! # use time::{time::Tm, zone::{Zone, TzInfo, ZonedTm}};
//! let zone = Zone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
//! assert_eq!(zone.date(1723433665), ZonedTm {
//! 	tm: Tm { sec: 25, min: 34, hour: 23, day: 11, mon: 8, year: 2024, wday: 0, yday: 224 },
//! 	info: TzInfo { utoff: -14400, isdst: true }
//! });
//!
//! let jst = Zone::parse("JST-9").unwrap();
//! assert_eq!(jst, Zone::Fixed(32400));
//! ```

use crate::cursor::Cursor;
use crate::time::{
	civil_from_days,
	days_from_civil,
	days_per_month,
	is_leap_year,
	weekday,
	Tm,
	SECONDS_PER_DAY,
	SECONDS_PER_HOUR,
	SECONDS_PER_MINUTE
};

/// Zone state at a moment in time.
///
/// `utoff` is added to UTC to get local time, so US Eastern Standard Time is `-18000`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TzInfo {
	/// The UTC offset in seconds
	pub utoff: i32,
	/// Whether daylight saving time is in effect
	pub isdst: bool
}

/// Calendar time with the zone state it was derived with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZonedTm {
	/// The calendar time in the zone
	pub tm: Tm,
	/// The zone state at that instant
	pub info: TzInfo
}

/// The error type for parsing TZ strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
	/// Empty input.
	#[error("Missing TZ string")]
	Empty,
	/// A zone name is shorter than three letters or an unterminated `<...>`.
	#[error("Invalid zone name")]
	InvalidName,
	/// A UTC offset or transition time is missing or malformed.
	#[error("Invalid UTC offset or transition time")]
	InvalidTime,
	/// A time component is out of range.
	#[error("Time component out of range")]
	TimeOutOfRange,
	/// A DST zone was named without transition rules.
	#[error("Missing DST transition rule")]
	MissingRule,
	/// A transition date is malformed or out of range.
	#[error("Invalid DST date rule")]
	InvalidDateRule,
	/// Bytes remain after a valid TZ string.
	#[error("Unexpected input at end of TZ string")]
	UnexpectedInput
}

/// A TZ string transition date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRule {
	/// `Jn`: day 1-365, never counting February 29.
	Julian(u16),
	/// `n`: zero-based day 0-365, counting February 29 in leap years.
	Ordinal(u16),
	/// `Mm.w.d`: weekday `wday` (0 = Sunday) of week `week` (1-5, 5 = last) of month `mon`.
	Weekday {
		/// Month, 1-12
		mon: u8,
		/// Week of the month, 1-5
		week: u8,
		/// Day of the week, 0-6
		wday: u8
	}
}

impl DateRule {
	/// Zero-based day of year selected by this rule in `year`.
	///
	/// # Examples
	///
	/// ```
	/// # use time::zone::DateRule;
	/// assert_eq!(DateRule::Julian(60).day_of_year(2024), 60);
	/// assert_eq!(DateRule::Ordinal(59).day_of_year(2024), 59);
	/// // Last Thursday of February 2024 is the 29th
	/// assert_eq!(DateRule::Weekday { mon: 2, week: 5, wday: 4 }.day_of_year(2024), 59);
	/// ```
	pub fn day_of_year(&self, year: i32) -> i64 {
		match *self {
			DateRule::Julian(n) => {
				let skip_leap_day = is_leap_year(year) && n >= 60;
				n as i64 - 1 + skip_leap_day as i64
			},
			DateRule::Ordinal(n) => n as i64,
			DateRule::Weekday { mon, week, wday } => {
				let first = days_from_civil(year, mon, 1);
				let lead = (wday as i64 - weekday(first) as i64).rem_euclid(7);
				let mut day = lead + (week as i64 - 1) * 7;
				if day >= days_per_month(year, mon) as i64 {
					day -= 7;
				}
				first - days_from_civil(year, 1, 1) + day
			}
		}
	}
}

/// A transition date plus the local time of day it happens at, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
	/// The transition date
	pub date: DateRule,
	/// Seconds after local midnight, possibly negative or beyond one day
	pub time: i32
}

impl Transition {
	/// The Unix instant of this transition in `year`, for a zone currently at `utoff`.
	fn instant(&self, year: i32, utoff: i32) -> i64 {
		let day = days_from_civil(year, 1, 1) + self.date.day_of_year(year);
		day * SECONDS_PER_DAY + self.time as i64 - utoff as i64
	}
}

/// Daylight saving time configuration of a [`Zone::Rule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DstRule {
	/// UTC offset during DST, in seconds
	pub utoff: i32,
	/// Switch from standard time to DST (in standard local time)
	pub start: Transition,
	/// Switch from DST back to standard time (in DST local time)
	pub end: Transition
}

impl DstRule {
	fn in_effect(&self, time: i64, std_utoff: i32) -> bool {
		let (year, _, _) = civil_from_days((time + std_utoff as i64).div_euclid(SECONDS_PER_DAY));
		let start = self.start.instant(year, std_utoff);
		let end = self.end.instant(year, self.utoff);
		if start <= end {
			start <= time && time < end
		} else {
			// Southern hemisphere: DST spans the new year
			time < end || start <= time
		}
	}
}

/// A civil time zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
	/// A constant UTC offset in seconds, never in DST.
	Fixed(i32),
	/// Standard time at `utoff` with annual DST transitions.
	Rule {
		/// Standard time UTC offset, in seconds
		utoff: i32,
		/// DST offset and transitions
		dst: DstRule
	},
	/// The process's ambient zone, as resolved by libc from `TZ` or `/etc/localtime`.
	#[cfg(feature = "local")]
	Local
}

// The libc crate only binds `tzset` on Windows; declare the C symbol directly.
#[cfg(feature = "local")]
unsafe extern "C" {
	fn tzset();
}

impl Zone {
	/// Coordinated Universal Time.
	pub const UTC: Zone = Zone::Fixed(0);

	/// Japan Standard Time, UTC+9 with no DST.
	pub const JST: Zone = Zone::Fixed(9 * 3600);

	/// The process's ambient zone.
	///
	/// Calls `tzset` so later lookups see the current `TZ` environment variable.
	#[cfg(feature = "local")]
	pub fn local() -> Zone {
		// Safety: tzset has no preconditions; it only refreshes libc's zone globals
		unsafe { tzset() };
		Zone::Local
	}

	/// Get the zone state at Unix time `time`.
	///
	/// # Examples
	///
	/// ```
	/// # use time::zone::{Zone, TzInfo};
	/// let zone = Zone::parse("PST8PDT,M3.2.0,M11.1.0").unwrap();
	/// assert_eq!(zone.info(1723433665), TzInfo { utoff: -25200, isdst: true });
	/// assert_eq!(zone.info(1735689600), TzInfo { utoff: -28800, isdst: false });
	/// ```
	pub fn info(&self, time: i64) -> TzInfo {
		match *self {
			Zone::Fixed(utoff) => TzInfo { utoff, isdst: false },
			Zone::Rule { utoff, dst } => {
				if dst.in_effect(time, utoff) {
					TzInfo { utoff: dst.utoff, isdst: true }
				} else {
					TzInfo { utoff, isdst: false }
				}
			},
			#[cfg(feature = "local")]
			Zone::Local => local_info(time)
		}
	}

	/// Get the civil calendar time at Unix time `time` in this zone.
	pub fn date(&self, time: i64) -> ZonedTm {
		let info = self.info(time);
		ZonedTm {
			tm: Tm::new(time + info.utoff as i64),
			info
		}
	}

	/// Parse a POSIX TZ string such as `EST5EDT,M3.2.0,M11.1.0` or `JST-9`.
	///
	/// A string without a DST name yields [`Zone::Fixed`]. When a DST name is given the
	/// transition rules are required. Names may be quoted as `<+09>`.
	///
	/// # Errors
	///
	/// Returns [`ZoneError`] for empty, malformed, or out of range input, or when bytes remain
	/// after a complete TZ string.
	///
	/// # Examples
	///
	/// ```
	/// # use time::zone::{DateRule, DstRule, Transition, Zone, ZoneError};
	/// assert_eq!(Zone::parse("UTC0"), Ok(Zone::UTC));
	/// assert_eq!(Zone::parse("<+0530>-5:30"), Ok(Zone::Fixed(19800)));
	/// assert_eq!(Zone::parse("EST5EDT"), Err(ZoneError::MissingRule));
	/// assert_eq!(Zone::parse("XXX4YYY,J1/0,J365/25"), Ok(Zone::Rule {
	/// 	utoff: -14400,
	/// 	dst: DstRule {
	/// 		utoff: -10800,
	/// 		start: Transition { date: DateRule::Julian(1), time: 0 },
	/// 		end: Transition { date: DateRule::Julian(365), time: 90000 }
	/// 	}
	/// }));
	/// ```
	pub fn parse(s: &str) -> Result<Zone, ZoneError> {
		let mut c = Cursor::new(s.as_bytes());
		if c.is_empty() {
			return Err(ZoneError::Empty);
		}

		name(&mut c)?;
		// TZ strings count offsets westward; flip to "add to UTC"
		let utoff = -clock(&mut c, 24)?;
		if c.is_empty() {
			return Ok(Zone::Fixed(utoff));
		}

		name(&mut c)?;
		let dst_utoff = match c.peek() {
			Some(b'+' | b'-' | b'0'..=b'9') => -clock(&mut c, 24)?,
			_ => utoff + SECONDS_PER_HOUR as i32
		};
		if !c.eat(b',') {
			return Err(ZoneError::MissingRule);
		}
		let start = transition(&mut c)?;
		if !c.eat(b',') {
			return Err(ZoneError::MissingRule);
		}
		let end = transition(&mut c)?;
		if !c.is_empty() {
			return Err(ZoneError::UnexpectedInput);
		}

		Ok(Zone::Rule {
			utoff,
			dst: DstRule { utoff: dst_utoff, start, end }
		})
	}
}

#[cfg(feature = "local")]
fn local_info(time: i64) -> TzInfo {
	use core::mem::MaybeUninit;

	let t = time as libc::time_t;
	let mut tm = MaybeUninit::<libc::tm>::uninit();
	// Safety: localtime_r reads `t` and only writes `tm`, initializing it when non-null is returned
	let r = unsafe { libc::localtime_r(&t, tm.as_mut_ptr()) };
	if r.is_null() {
		return TzInfo::default();
	}
	// Safety: checked above
	let tm = unsafe { tm.assume_init() };
	TzInfo {
		utoff: tm.tm_gmtoff as i32,
		isdst: tm.tm_isdst > 0
	}
}

fn name(c: &mut Cursor) -> Result<(), ZoneError> {
	let len = if c.eat(b'<') {
		c.until(b'>').ok_or(ZoneError::InvalidName)?.len()
	} else {
		c.take_while(|b| b.is_ascii_alphabetic()).len()
	};
	if len < 3 { Err(ZoneError::InvalidName) } else { Ok(()) }
}

/// `[+|-]hh[:mm[:ss]]` in seconds, with hours up to `max_hours`.
fn clock(c: &mut Cursor, max_hours: u32) -> Result<i32, ZoneError> {
	let sign = if c.eat(b'-') {
		-1
	} else {
		c.eat(b'+');
		1
	};
	let hours = c.number().ok_or(ZoneError::InvalidTime)?;
	let mut minutes = 0;
	let mut seconds = 0;
	if c.eat(b':') {
		minutes = c.number().ok_or(ZoneError::InvalidTime)?;
		if c.eat(b':') {
			seconds = c.number().ok_or(ZoneError::InvalidTime)?;
		}
	}
	if hours > max_hours || minutes > 59 || seconds > 59 {
		return Err(ZoneError::TimeOutOfRange);
	}
	let total = hours as i64 * SECONDS_PER_HOUR + minutes as i64 * SECONDS_PER_MINUTE + seconds as i64;
	Ok(sign * total as i32)
}

fn transition(c: &mut Cursor) -> Result<Transition, ZoneError> {
	let date = date_rule(c)?;
	// Transitions default to 02:00 local time
	let time = if c.eat(b'/') { clock(c, 167)? } else { 2 * SECONDS_PER_HOUR as i32 };
	Ok(Transition { date, time })
}

fn date_rule(c: &mut Cursor) -> Result<DateRule, ZoneError> {
	if c.eat(b'J') {
		match c.number() {
			Some(n @ 1..=365) => Ok(DateRule::Julian(n as u16)),
			_ => Err(ZoneError::InvalidDateRule)
		}
	} else if c.eat(b'M') {
		let mon = c.number().ok_or(ZoneError::InvalidDateRule)?;
		if !c.eat(b'.') {
			return Err(ZoneError::InvalidDateRule);
		}
		let week = c.number().ok_or(ZoneError::InvalidDateRule)?;
		if !c.eat(b'.') {
			return Err(ZoneError::InvalidDateRule);
		}
		let wday = c.number().ok_or(ZoneError::InvalidDateRule)?;
		if !(1..=12).contains(&mon) || !(1..=5).contains(&week) || wday > 6 {
			return Err(ZoneError::InvalidDateRule);
		}
		Ok(DateRule::Weekday { mon: mon as u8, week: week as u8, wday: wday as u8 })
	} else {
		match c.number() {
			Some(n @ 0..=365) => Ok(DateRule::Ordinal(n as u16)),
			Some(_) => Err(ZoneError::InvalidDateRule),
			None => Err(ZoneError::MissingRule)
		}
	}
}
