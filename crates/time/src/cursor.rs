/// Byte-oriented reader shared by the zone and timestamp parsers.
pub(crate) struct Cursor<'a>(&'a [u8]);

impl<'a> Cursor<'a> {
	pub(crate) fn new(bytes: &'a [u8]) -> Cursor<'a> {
		Cursor(bytes)
	}

	#[inline]
	pub(crate) fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[inline]
	pub(crate) fn peek(&self) -> Option<u8> {
		self.0.first().copied()
	}

	/// Consume `byte` if it is next.
	pub(crate) fn eat(&mut self, byte: u8) -> bool {
		match self.0.split_first() {
			Some((&b, rest)) if b == byte => {
				self.0 = rest;
				true
			}
			_ => false
		}
	}

	/// Consume the longest prefix whose bytes satisfy `f`.
	pub(crate) fn take_while(&mut self, f: impl Fn(u8) -> bool) -> &'a [u8] {
		let len = self.0.iter().take_while(|&&b| f(b)).count();
		let (head, tail) = self.0.split_at(len);
		self.0 = tail;
		head
	}

	/// Consume everything up to and including `byte`, returning the bytes before it.
	pub(crate) fn until(&mut self, byte: u8) -> Option<&'a [u8]> {
		let len = self.0.iter().position(|&b| b == byte)?;
		let head = &self.0[..len];
		self.0 = &self.0[len + 1..];
		Some(head)
	}

	/// Read an unsigned decimal number of one to nine digits.
	pub(crate) fn number(&mut self) -> Option<u32> {
		let digits = self.take_while(|b| b.is_ascii_digit());
		if digits.is_empty() || digits.len() > 9 {
			return None;
		}
		Some(to_number(digits))
	}

	/// Read exactly `n` decimal digits.
	pub(crate) fn fixed(&mut self, n: usize) -> Option<u32> {
		let digits = self.0.get(..n)?;
		if !digits.iter().all(u8::is_ascii_digit) {
			return None;
		}
		self.0 = &self.0[n..];
		Some(to_number(digits))
	}
}

fn to_number(digits: &[u8]) -> u32 {
	digits.iter().fold(0, |n, d| n * 10 + (d - b'0') as u32)
}
