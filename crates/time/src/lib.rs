//! Calendar and time zone utilities.
//!
//! This crate is divided into three parts: [`time`] converts between Unix timestamps and UTC
//! calendar time with no notion of zones; [`zone`] maps instants to UTC offsets and DST state
//! using fixed offsets, [TZ strings], or (with the `local` feature) the process's ambient zone;
//! [`parse`] reads date time strings.
//!
//! The crate is `no_std`. The `now` feature adds [`time::now`], and `local` adds
//! [`zone::Zone::Local`]; both call into libc.
//!
//! [TZ strings]: https://www.gnu.org/software/libc/manual/html_node/TZ-Variable.html
//!
//! # Examples
//!
//! Conversion from Unix time to UTC calendar time.
//! ```
//! # use time::Tm;
//! let date = Tm::new(1718617807);
//! assert_eq!((date.year, date.mon, date.day, date.hour), (2024, 6, 17, 9));
//! ```
//!
//! Conversion from Unix time to US Eastern calendar time.
//! ```
//! # use time::{Tm, Zone, TzInfo, ZonedTm};
//! let zone = Zone::parse("EST5EDT,M3.2.0,M11.1.0").unwrap();
//! assert_eq!(zone.date(1723433665), ZonedTm {
//! 	tm: Tm { sec: 25, min: 34, hour: 23, day: 11, mon: 8, year: 2024, wday: 0, yday: 224 },
//! 	info: TzInfo { utoff: -14400, isdst: true }
//! });
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(test)]
extern crate std;

mod cursor;
pub mod time;
pub mod zone;
pub mod parse;

pub use time::*;
pub use zone::*;
pub use parse::*;
