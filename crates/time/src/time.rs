//! Unix time and proleptic Gregorian calendar arithmetic.
//!
//! Nothing in this module consults libc except [`now`], so every conversion is thread safe,
//! allocation free, and cheap enough to run from a real-time audio callback.
//!
//! # Examples
//!
//! ```
//! # use time::time::Tm;
//! let date = Tm::new(1718617807);
//! assert_eq!(date, Tm {
//! 	sec: 7,
//! 	min: 50,
//! 	hour: 9,
//! 	day: 17,
//! 	mon: 6,
//! 	year: 2024,
//! 	wday: 1,
//! 	yday: 169
//! });
//! ```

#[cfg(feature = "now")]
use core::mem::MaybeUninit;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: i64 = 60;
/// Seconds per hour.
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
/// Minutes per day.
const MINUTES_PER_DAY: i64 = 24 * 60;
/// Days per 400-year Gregorian cycle.
const DAYS_PER_ERA: i64 = 146097;
/// Days from March 1, 0000 to January 1, 1970.
const DAYS_FROM_MARCH_0000_TO_EPOCH: i64 = 719468;

/// Unix time with nanosecond granularity.
///
/// `nsec` is always in `[0, 999999999]`, also for instants before the epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeSpec {
	/// Seconds since the Unix epoch
	pub sec: i64,
	/// Nanoseconds since the beginning of `sec`
	pub nsec: i64
}

/// Get the current time as a Unix timestamp with nanosecond granularity.
///
/// Returns `None` if `clock_gettime` fails.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "now")] {
/// # use time::time::now;
/// let t = now().expect("clock_gettime failed");
/// assert!(t.sec > 0);
/// assert!((0..1000000000).contains(&t.nsec));
/// # }
/// ```
#[cfg(feature = "now")]
pub fn now() -> Option<TimeSpec> {
	let mut ts = MaybeUninit::<libc::timespec>::uninit();
	// Safety: clock_gettime only writes to `ts`, and initializes it fully when it returns zero
	let rc = unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, ts.as_mut_ptr()) };
	if rc != 0 {
		return None;
	}
	// Safety: checked the return code above
	let ts = unsafe { ts.assume_init() };
	Some(TimeSpec {
		sec: ts.tv_sec as i64,
		nsec: ts.tv_nsec as i64
	})
}

/// Check whether `year` (absolute Gregorian year, e.g. 2024) is a leap year.
///
/// # Examples
///
/// ```
/// # use time::time::is_leap_year;
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2000));
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(2025));
/// ```
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
	year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// The number of days in month `mon` (1-12) of `year`.
pub const fn days_per_month(year: i32, mon: u8) -> u8 {
	if mon == 2 {
		if is_leap_year(year) { 29 } else { 28 }
	} else {
		// 31 for Jan, Mar, May, Jul, Aug, Oct, Dec; 30 otherwise
		30 | (mon ^ (mon >> 3))
	}
}

/// Days since the Unix epoch for a given year, month (1-12) and day of month (1-31).
///
/// The calendar is rotated to start in March so the leap day falls at the end of the year, then
/// counted in 400-year eras. See <http://howardhinnant.github.io/date_algorithms.html>.
///
/// # Examples
///
/// ```
/// # use time::time::days_from_civil;
/// assert_eq!(days_from_civil(1970, 1, 1), 0);
/// assert_eq!(days_from_civil(2024, 2, 29), 19782);
/// assert_eq!(days_from_civil(1969, 12, 31), -1);
/// ```
pub const fn days_from_civil(year: i32, mon: u8, day: u8) -> i64 {
	let y = if mon <= 2 { year as i64 - 1 } else { year as i64 };
	let era = y.div_euclid(400);
	let yoe = y.rem_euclid(400);
	let mp = if mon > 2 { mon as i64 - 3 } else { mon as i64 + 9 };
	let doy = (153 * mp + 2) / 5 + day as i64 - 1;
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
	era * DAYS_PER_ERA + doe - DAYS_FROM_MARCH_0000_TO_EPOCH
}

/// Inverse of [`days_from_civil`]: `(year, month, day)` for a day count since the Unix epoch.
pub const fn civil_from_days(days: i64) -> (i32, u8, u8) {
	let z = days + DAYS_FROM_MARCH_0000_TO_EPOCH;
	let era = z.div_euclid(DAYS_PER_ERA);
	let doe = z.rem_euclid(DAYS_PER_ERA);
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let day = doy - (153 * mp + 2) / 5 + 1;
	let mon = if mp < 10 { mp + 3 } else { mp - 9 };
	let year = yoe + era * 400 + if mon <= 2 { 1 } else { 0 };
	(year as i32, mon as u8, day as u8)
}

/// Weekday (0-6 => Sunday-Saturday) of a day count since the Unix epoch.
#[inline]
pub const fn weekday(days: i64) -> u8 {
	// Jan 1, 1970 was a Thursday
	(days + 4).rem_euclid(7) as u8
}

/// Weekday (0-6 => Sunday-Saturday) of a given calendar date.
///
/// # Examples
///
/// ```
/// # use time::time::wday_from_ymd;
/// assert_eq!(wday_from_ymd(2024, 1, 1), 1);
/// assert_eq!(wday_from_ymd(2024, 2, 29), 4);
/// assert_eq!(wday_from_ymd(2024, 10, 27), 0);
/// ```
#[inline]
pub const fn wday_from_ymd(year: i32, mon: u8, day: u8) -> u8 {
	weekday(days_from_civil(year, mon, day))
}

/// Unix timestamp of 00:00:00 UTC on a given calendar date.
///
/// # Examples
///
/// ```
/// # use time::time::timestamp_from_ymd;
/// assert_eq!(timestamp_from_ymd(2024, 2, 28), 1709078400);
/// assert_eq!(timestamp_from_ymd(2024, 3, 1), 1709251200);
/// ```
#[inline]
pub const fn timestamp_from_ymd(year: i32, mon: u8, day: u8) -> i64 {
	days_from_civil(year, mon, day) * SECONDS_PER_DAY
}

/// Unix timestamp of the first second of the UTC day containing `time`.
#[inline]
pub const fn start_of_day(time: i64) -> i64 {
	time - time.rem_euclid(SECONDS_PER_DAY)
}

/// Gregorian calendar date and time of day.
///
/// Unlike `libc::tm`, `mon` is 1-based, `yday` is 1-based, and `year` is the absolute year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tm {
	/// Seconds, ranged [0, 59]
	pub sec: u8,
	/// Minutes, ranged [0, 59]
	pub min: u8,
	/// Hours, ranged [0, 23]
	pub hour: u8,
	/// Day of the month, ranged [1, 31]
	pub day: u8,
	/// Month of the year, ranged [1, 12]
	pub mon: u8,
	/// Absolute Gregorian year
	pub year: i32,
	/// Day of the week, ranged [0, 6] => [Sunday, Saturday]
	pub wday: u8,
	/// Day of the year, ranged [1, 366]
	pub yday: u16
}

impl Tm {
	/// Break a Unix timestamp into calendar fields.
	///
	/// Instants before the epoch are supported. Callers passing local time add the zone's UTC
	/// offset first.
	pub const fn new(time: i64) -> Tm {
		let days = time.div_euclid(SECONDS_PER_DAY);
		let secs = time.rem_euclid(SECONDS_PER_DAY);
		let (year, mon, day) = civil_from_days(days);
		Tm {
			sec: (secs % SECONDS_PER_MINUTE) as u8,
			min: (secs % SECONDS_PER_HOUR / SECONDS_PER_MINUTE) as u8,
			hour: (secs / SECONDS_PER_HOUR) as u8,
			day,
			mon,
			year,
			wday: weekday(days),
			yday: (days - days_from_civil(year, 1, 1) + 1) as u16
		}
	}

	/// Whether `self` falls in a leap year.
	#[inline]
	pub const fn is_leap_year(&self) -> bool {
		is_leap_year(self.year)
	}

	/// Year within the century, [0, 99].
	#[inline]
	pub const fn year_of_century(&self) -> u8 {
		self.year.rem_euclid(100) as u8
	}
}

/// Minutes elapsed since 00:00 on January 1 of the first year of the century containing `tm`
/// (2000, 2100, ...).
///
/// # Examples
///
/// ```
/// # use time::time::{minute_of_century, Tm};
/// // Jul 4, 2012 17:30 UTC
/// assert_eq!(minute_of_century(&Tm::new(1341423000)), 6578970);
/// ```
pub const fn minute_of_century(tm: &Tm) -> u32 {
	let first = tm.year - tm.year.rem_euclid(100);
	let days = days_from_civil(tm.year, 1, 1) - days_from_civil(first, 1, 1) + tm.yday as i64 - 1;
	(days * MINUTES_PER_DAY + tm.hour as i64 * 60 + tm.min as i64) as u32
}
