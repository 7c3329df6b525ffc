//! Calendar fields for one transmitted second.

use time::{minute_of_century, start_of_day, Tm, Zone, ZonedTm, SECONDS_PER_DAY};

/// Calendar fields of one second, as a protocol encodes them.
///
/// Which clock the fields are read from (UTC or a civil zone) and where the day boundaries for
/// the DST flags fall is the protocol's choice, see [`Calendar::utc`] and [`Calendar::civil`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calendar {
	/// Unix second this calendar describes
	pub time: i64,
	/// Calendar fields
	pub tm: Tm,
	/// Whether DST is in effect at the first second of the day
	pub dst_at_start: bool,
	/// Whether DST is in effect at the last second of the day
	pub dst_at_end: bool
}

impl Calendar {
	/// Fields in UTC; DST flags from `zone` at 00:00:00 and 23:59:59 UTC of the same UTC day.
	///
	/// # Examples
	///
	/// ```
	/// # use signals::Calendar;
	/// # use time::Zone;
	/// let eastern = Zone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
	/// // Mar 10, 2024 12:00 UTC: DST begins at 07:00 UTC
	/// let c = Calendar::utc(1710072000, &eastern);
	/// assert_eq!((c.tm.hour, c.dst_at_start, c.dst_at_end), (12, false, true));
	/// ```
	pub fn utc(time: i64, zone: &Zone) -> Calendar {
		let start = start_of_day(time);
		Calendar {
			time,
			tm: Tm::new(time),
			dst_at_start: zone.info(start).isdst,
			dst_at_end: zone.info(start + SECONDS_PER_DAY - 1).isdst
		}
	}

	/// Fields in `zone`'s civil time; DST flags at 00:00:00 and 23:59:59 of the same civil day.
	///
	/// Day boundaries are located with the offset in effect at `time`.
	pub fn civil(time: i64, zone: &Zone) -> Calendar {
		let ZonedTm { tm, info } = zone.date(time);
		let into_day = (time + info.utoff as i64).rem_euclid(SECONDS_PER_DAY);
		let start = time - into_day;
		Calendar {
			time,
			tm,
			dst_at_start: zone.info(start).isdst,
			dst_at_end: zone.info(start + SECONDS_PER_DAY - 1).isdst
		}
	}

	/// Whether the calendar year is a leap year.
	#[inline]
	pub fn is_leap_year(&self) -> bool {
		self.tm.is_leap_year()
	}

	/// Minutes since the start of the century.
	#[inline]
	pub fn minute_of_century(&self) -> u32 {
		minute_of_century(&self.tm)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn utc_test() {
		let pacific = Zone::parse("PST8PDT,M3.2.0,M11.1.0").unwrap();
		// Jul 4, 2012 17:30:18 UTC
		let c = Calendar::utc(1341423018, &pacific);
		assert_eq!((c.tm.min, c.tm.hour, c.tm.yday, c.tm.year), (30, 17, 186, 2012));
		assert!(c.dst_at_start && c.dst_at_end);
		assert!(c.is_leap_year());
		assert_eq!(c.minute_of_century(), 6578970);

		// Nov 3, 2024: DST ends at 09:00 UTC
		let c = Calendar::utc(1730635200, &pacific);
		assert_eq!((c.dst_at_start, c.dst_at_end), (true, false));
		assert!(!Calendar::utc(1730635200, &Zone::UTC).dst_at_start);
	}

	#[test]
	fn civil_test() {
		// Jul 4, 2020 11:36:58 JST
		let c = Calendar::civil(1593830218, &Zone::JST);
		assert_eq!(c.tm, Tm { sec: 58, min: 36, hour: 11, day: 4, mon: 7, year: 2020, wday: 6, yday: 186 });
		assert!(!c.dst_at_start && !c.dst_at_end);

		// Mar 10, 2024 01:00 EST, the morning DST begins
		let eastern = Zone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
		let c = Calendar::civil(1710050400, &eastern);
		assert_eq!((c.tm.day, c.tm.hour), (10, 1));
		assert_eq!((c.dst_at_start, c.dst_at_end), (false, true));
	}
}
