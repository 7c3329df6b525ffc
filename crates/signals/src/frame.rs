//! Per-second slot tables.
//!
//! A [`Frame`] classifies each second of the minute as a fixed [`Slot::Mark`], [`Slot::Zero`] or
//! [`Slot::One`], or as a [`Slot::Bit`] resolved from the calendar. The classification is total:
//! seconds 0-59 come from the table and a leap second (60) is a mark.

use crate::bits::{CalendarBit, Field};
use crate::calendar::Calendar;

/// The amplitude code of one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
	/// Frame or sub-frame boundary
	Mark,
	/// Data bit 0
	Zero,
	/// Data bit 1
	One
}

/// How one second of a frame is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
	/// Always a mark
	Mark,
	/// Always zero
	Zero,
	/// Always one
	One,
	/// Depends on the calendar
	Bit(CalendarBit)
}

/// Shorthand for a BCD digit slot.
pub const fn digit(field: Field, weight: u16) -> Slot {
	Slot::Bit(CalendarBit::Digit(field, weight))
}

/// Shorthand for an even parity slot over seconds `first..=last`.
pub const fn parity(first: u8, last: u8) -> Slot {
	Slot::Bit(CalendarBit::EvenParity { first, last })
}

/// A 60-second frame layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame([Slot; 60]);

impl Frame {
	/// Build a frame from one slot per second.
	pub const fn new(slots: [Slot; 60]) -> Frame {
		Frame(slots)
	}

	/// The slot for `second`. Second 60 is a mark.
	#[inline]
	pub const fn slot(&self, second: u8) -> Slot {
		if (second as usize) < self.0.len() {
			self.0[second as usize]
		} else {
			Slot::Mark
		}
	}

	/// Data value of `second`: `false` for marks and zeros, `true` for ones.
	pub fn value(&self, second: u8, calendar: &Calendar) -> bool {
		match self.slot(second) {
			Slot::Mark | Slot::Zero => false,
			Slot::One => true,
			Slot::Bit(bit) => bit.eval(self, calendar)
		}
	}

	/// Symbol of `second` for `calendar`.
	pub fn symbol_at(&self, second: u8, calendar: &Calendar) -> Symbol {
		match self.slot(second) {
			Slot::Mark => Symbol::Mark,
			Slot::Zero => Symbol::Zero,
			Slot::One => Symbol::One,
			Slot::Bit(bit) => if bit.eval(self, calendar) { Symbol::One } else { Symbol::Zero }
		}
	}

	/// Symbol of the second `calendar` describes.
	#[inline]
	pub fn symbol(&self, calendar: &Calendar) -> Symbol {
		self.symbol_at(calendar.tm.sec, calendar)
	}

	/// Symbols of the whole minute containing `calendar`, with `calendar`'s fields held fixed.
	pub fn symbols(&self, calendar: &Calendar) -> [Symbol; 60] {
		core::array::from_fn(|s| self.symbol_at(s as u8, calendar))
	}
}
