//! Single-bit functions of a [`Calendar`].
//!
//! Both protocols encode numbers the same way: one bit per BCD weight, most significant first.
//! A minute of 47 becomes the weights 40, 20, 10 / 8, 4, 2, 1 set as `1 0 0 / 0 1 1 1`. The same
//! bit can be read as a cascade of thresholds (`V ≥ 40`, `V % 40 ≥ 20`, `V % 20 ≥ 10`,
//! `V % 10 ≥ 8`, ...), which is how [`bcd_bit`] is specified; the implementation picks the
//! decimal digit the weight belongs to and tests one bit of it.

use crate::calendar::Calendar;
use crate::frame::Frame;

/// A numeric calendar field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	/// Minute, 0-59
	Minute,
	/// Hour, 0-23
	Hour,
	/// Day of the year, 1-366
	YearDay,
	/// Year within the century, 0-99
	Year,
	/// Day of the week, 0-6 (Sunday = 0)
	Weekday
}

impl Field {
	/// Value of this field in `calendar`.
	pub fn value(self, calendar: &Calendar) -> u16 {
		let tm = &calendar.tm;
		match self {
			Field::Minute => tm.min as u16,
			Field::Hour => tm.hour as u16,
			Field::YearDay => tm.yday,
			Field::Year => tm.year_of_century() as u16,
			Field::Weekday => tm.wday as u16
		}
	}
}

/// BCD bit of `value` at `weight` (one of 200, 100, 80, 40, 20, 10, 8, 4, 2, 1).
///
/// # Examples
///
/// ```
/// # use signals::bits::bcd_bit;
/// assert!(bcd_bit(47, 40));
/// assert!(!bcd_bit(47, 20));
/// assert!(bcd_bit(47, 4));
/// assert!(bcd_bit(366, 200));
/// assert!(bcd_bit(366, 100));
/// ```
pub const fn bcd_bit(value: u16, weight: u16) -> bool {
	let place = if weight >= 100 {
		100
	} else if weight >= 10 {
		10
	} else {
		1
	};
	((value / place % 10) & (weight / place)) != 0
}

/// A calendar-dependent bit in a [`Frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarBit {
	/// The BCD bit of a field at a weight
	Digit(Field, u16),
	/// Even parity over the frame's values from second `first` to `last`, inclusive
	EvenParity {
		/// First second covered
		first: u8,
		/// Last second covered
		last: u8
	},
	/// The calendar year is a leap year
	LeapYear,
	/// A leap second is scheduled at the end of the month (never, see [`leap_second_pending`])
	LeapSecondPending,
	/// The scheduled leap second is inserted rather than removed (never)
	LeapSecondInserted,
	/// DST is in effect at the end of the day
	DstAtEnd,
	/// DST is in effect at the start of the day
	DstAtStart
}

impl CalendarBit {
	/// Resolve this bit. `frame` supplies the values that parity bits cover.
	pub fn eval(self, frame: &Frame, calendar: &Calendar) -> bool {
		match self {
			CalendarBit::Digit(field, weight) => bcd_bit(field.value(calendar), weight),
			CalendarBit::EvenParity { first, last } => {
				(first..=last).fold(false, |p, second| p ^ frame.value(second, calendar))
			},
			CalendarBit::LeapYear => calendar.is_leap_year(),
			CalendarBit::LeapSecondPending | CalendarBit::LeapSecondInserted => leap_second_pending(calendar),
			CalendarBit::DstAtEnd => calendar.dst_at_end,
			CalendarBit::DstAtStart => calendar.dst_at_start
		}
	}
}

/// Leap seconds are not announced.
///
/// System clocks repeat or smear leap seconds rather than reporting them, so there is nothing
/// reliable to announce from.
#[inline]
pub const fn leap_second_pending(_calendar: &Calendar) -> bool {
	false
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn decode(value: u16, weights: &[u16]) -> u16 {
		weights.iter().filter(|&&w| bcd_bit(value, w)).sum()
	}

	// The threshold cascade, written out for the two-digit fields
	fn cascade(v: u16) -> [bool; 7] {
		[v >= 40, v % 40 >= 20, v % 20 >= 10, v % 10 >= 8, v % 10 % 8 >= 4, v % 10 % 4 >= 2, v % 2 == 1]
	}

	#[test]
	fn bcd_bit_matches_cascade() {
		for v in 0..60 {
			let bits = [40, 20, 10, 8, 4, 2, 1].map(|w| bcd_bit(v, w));
			assert_eq!(bits, cascade(v), "value: {}", v);
		}
	}

	#[test]
	fn bcd_round_trip() {
		for v in 0..=59 {
			assert_eq!(decode(v, &[40, 20, 10, 8, 4, 2, 1]), v);
		}
		for v in 0..=23 {
			assert_eq!(decode(v, &[20, 10, 8, 4, 2, 1]), v);
		}
		for v in 1..=366 {
			assert_eq!(decode(v, &[200, 100, 80, 40, 20, 10, 8, 4, 2, 1]), v);
		}
		for v in 0..=99 {
			assert_eq!(decode(v, &[80, 40, 20, 10, 8, 4, 2, 1]), v);
		}
		for v in 0..=6 {
			assert_eq!(decode(v, &[4, 2, 1]), v);
		}
	}

	proptest! {
		#[test]
		fn field_values_in_range(time in -2_000_000_000i64..4_000_000_000) {
			let c = Calendar::utc(time, &time::Zone::UTC);
			prop_assert!(Field::Minute.value(&c) <= 59);
			prop_assert!(Field::Hour.value(&c) <= 23);
			prop_assert!((1..=366).contains(&Field::YearDay.value(&c)));
			prop_assert!(Field::Year.value(&c) <= 99);
			prop_assert!(Field::Weekday.value(&c) <= 6);
			prop_assert!(!leap_second_pending(&c));
		}
	}
}
