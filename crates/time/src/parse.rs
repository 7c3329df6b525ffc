//! Parse date time strings like `YYYY-MM-DD HH:mm:ss.sss +HH:mm`.
//!
//! # Examples
//! ```
//! # use time::{parse::parse_timestamp, time::TimeSpec};
//! assert_eq!(
//! 	parse_timestamp("2025-02-18T12:30:45Z"),
//! 	Ok(TimeSpec { sec: 1739881845, nsec: 0 })
//! );
//! assert_eq!(
//! 	parse_timestamp("2024-04-12 10:27:00.519 -07:00"),
//! 	Ok(TimeSpec { sec: 1712942820, nsec: 519000000 })
//! );
//! assert_eq!(parse_timestamp("@1735689600"), Ok(TimeSpec { sec: 1735689600, nsec: 0 }));
//! ```

use crate::cursor::Cursor;
use crate::time::{days_per_month, timestamp_from_ymd, TimeSpec, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Error type for parsing date time strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	/// The date part is missing or not `YYYY-MM-DD`.
	#[error("Date missing or malformed, expected YYYY-MM-DD")]
	MalformedDate,
	/// The month or day is not a valid calendar date.
	#[error("Date out of range")]
	DateOutOfRange,
	/// The time part is not `HH:mm[:ss[.fraction]]`.
	#[error("Time malformed, expected HH:mm[:ss[.sss]]")]
	MalformedTime,
	/// Hours, minutes, or seconds out of range.
	#[error("Time out of range")]
	TimeOutOfRange,
	/// The UTC offset is not `Z` or `±HH:mm`.
	#[error("UTC offset malformed, expected Z or +HH:mm")]
	MalformedOffset,
	/// A Unix timestamp after `@` could not be read.
	#[error("Unix timestamp malformed")]
	MalformedUnixTime,
	/// Bytes remain after a valid date time string.
	#[error("Unexpected input at end of date time string")]
	UnexpectedInput
}

/// Parse a date time string into a Unix timestamp.
///
/// Accepted forms:
/// - `@<seconds>`: a signed Unix timestamp
/// - `YYYY-MM-DD`: midnight UTC
/// - `YYYY-MM-DD[T| ]HH:mm[:ss[.fraction]][ ][Z|+HH:mm|-HH:mm]`
///
/// Without an offset, the time is UTC. The fraction may have one to nine digits.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is malformed or out of range, including when a valid
/// prefix is followed by extra bytes.
pub fn parse_timestamp(s: &str) -> Result<TimeSpec, ParseError> {
	if let Some(unix) = s.strip_prefix('@') {
		let sec = unix.parse::<i64>().map_err(|_| ParseError::MalformedUnixTime)?;
		return Ok(TimeSpec { sec, nsec: 0 });
	}

	let mut c = Cursor::new(s.as_bytes());
	let (year, mon, day) = date(&mut c)?;
	let mut t = TimeSpec { sec: timestamp_from_ymd(year, mon, day), nsec: 0 };
	if c.is_empty() {
		return Ok(t);
	}
	if !(c.eat(b'T') || c.eat(b' ')) {
		return Err(ParseError::UnexpectedInput);
	}

	let (secs, nsec) = time_of_day(&mut c)?;
	t.sec += secs;
	t.nsec = nsec;

	c.eat(b' ');
	if c.is_empty() {
		return Ok(t);
	}
	t.sec -= offset(&mut c)?;

	if c.is_empty() { Ok(t) } else { Err(ParseError::UnexpectedInput) }
}

fn date(c: &mut Cursor) -> Result<(i32, u8, u8), ParseError> {
	let year = c.fixed(4).ok_or(ParseError::MalformedDate)?;
	if !c.eat(b'-') {
		return Err(ParseError::MalformedDate);
	}
	let mon = c.fixed(2).ok_or(ParseError::MalformedDate)?;
	if !c.eat(b'-') {
		return Err(ParseError::MalformedDate);
	}
	let day = c.fixed(2).ok_or(ParseError::MalformedDate)?;

	let year = year as i32;
	if !(1..=12).contains(&mon) || day == 0 || day > days_per_month(year, mon as u8) as u32 {
		return Err(ParseError::DateOutOfRange);
	}
	Ok((year, mon as u8, day as u8))
}

fn time_of_day(c: &mut Cursor) -> Result<(i64, i64), ParseError> {
	let hour = c.fixed(2).ok_or(ParseError::MalformedTime)?;
	if !c.eat(b':') {
		return Err(ParseError::MalformedTime);
	}
	let min = c.fixed(2).ok_or(ParseError::MalformedTime)?;
	let sec = if c.eat(b':') { c.fixed(2).ok_or(ParseError::MalformedTime)? } else { 0 };
	if hour > 23 || min > 59 || sec > 59 {
		return Err(ParseError::TimeOutOfRange);
	}

	let mut nsec = 0;
	if c.eat(b'.') {
		let digits = c.take_while(|b| b.is_ascii_digit());
		if digits.is_empty() || digits.len() > 9 {
			return Err(ParseError::MalformedTime);
		}
		let scale = 10i64.pow(9 - digits.len() as u32);
		nsec = digits.iter().fold(0i64, |n, d| n * 10 + (d - b'0') as i64) * scale;
	}

	let secs = hour as i64 * SECONDS_PER_HOUR + min as i64 * SECONDS_PER_MINUTE + sec as i64;
	Ok((secs, nsec))
}

/// UTC offset in seconds, positive east of Greenwich.
fn offset(c: &mut Cursor) -> Result<i64, ParseError> {
	if c.eat(b'Z') {
		return Ok(0);
	}
	let sign = if c.eat(b'+') {
		1
	} else if c.eat(b'-') {
		-1
	} else {
		return Err(ParseError::MalformedOffset);
	};
	let hours = c.fixed(2).ok_or(ParseError::MalformedOffset)?;
	if !c.eat(b':') {
		return Err(ParseError::MalformedOffset);
	}
	let minutes = c.fixed(2).ok_or(ParseError::MalformedOffset)?;
	if hours > 23 || minutes > 59 {
		return Err(ParseError::TimeOutOfRange);
	}
	Ok(sign * (hours as i64 * SECONDS_PER_HOUR + minutes as i64 * SECONDS_PER_MINUTE))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_timestamp_test() {
		// Date only
		assert_eq!(parse_timestamp("2025-02-18"), Ok(TimeSpec { sec: 1739836800, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-02"), Err(ParseError::MalformedDate));
		assert_eq!(parse_timestamp("2025-2-18"), Err(ParseError::MalformedDate));
		assert_eq!(parse_timestamp("2025-02-29"), Err(ParseError::DateOutOfRange));
		assert_eq!(parse_timestamp("2024-02-29"), Ok(TimeSpec { sec: 1709164800, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-13-01"), Err(ParseError::DateOutOfRange));

		// Date and time
		assert_eq!(parse_timestamp("2025-02-18T12:30"), Ok(TimeSpec { sec: 1739881800, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-02-18 12:30:45"), Ok(TimeSpec { sec: 1739881845, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-02-18T12"), Err(ParseError::MalformedTime));
		assert_eq!(parse_timestamp("2025-02-18T24:00"), Err(ParseError::TimeOutOfRange));
		assert_eq!(parse_timestamp("2025-02-18T12:60"), Err(ParseError::TimeOutOfRange));
		assert_eq!(parse_timestamp("2025-02-18X12:30"), Err(ParseError::UnexpectedInput));

		// Fractions
		assert_eq!(parse_timestamp("2025-02-18T12:30:45.123"), Ok(TimeSpec { sec: 1739881845, nsec: 123000000 }));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45.5"), Ok(TimeSpec { sec: 1739881845, nsec: 500000000 }));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45.000000001"), Ok(TimeSpec { sec: 1739881845, nsec: 1 }));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45."), Err(ParseError::MalformedTime));

		// Offsets
		assert_eq!(parse_timestamp("2025-02-18T12:30:45Z"), Ok(TimeSpec { sec: 1739881845, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45+01:00"), Ok(TimeSpec { sec: 1739878245, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-02-18 12:30:45 -01:00"), Ok(TimeSpec { sec: 1739885445, nsec: 0 }));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45+01"), Err(ParseError::MalformedOffset));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45+01:60"), Err(ParseError::TimeOutOfRange));
		assert_eq!(parse_timestamp("2025-02-18T12:30:45Zjunk"), Err(ParseError::UnexpectedInput));

		// Unix time
		assert_eq!(parse_timestamp("@-1"), Ok(TimeSpec { sec: -1, nsec: 0 }));
		assert_eq!(parse_timestamp("@12a"), Err(ParseError::MalformedUnixTime));
		assert_eq!(parse_timestamp(""), Err(ParseError::MalformedDate));
	}
}
