//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use clap::{ArgAction, Parser, ValueEnum};
use time::{parse_timestamp, ParseError, TimeSpec, Zone, ZoneError};

const EXAMPLES: &str = "\
Examples:
  longwave jjy
  longwave -j -n 5 jjy40
  longwave -z \"EST5EDT,M3.2.0,M11.1.0\" wwvb
  longwave -t \"2024-04-12 10:27:00.519 -07:00\" -r 96000 -c 2 wwvb";

/// Known time signal types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SignalType {
	/// Japan's JJY on 60 kHz (Kyushu)
	#[value(name = "jjy", alias = "jjy60")]
	Jjy,
	/// Japan's JJY on 40 kHz (Fukushima)
	#[value(name = "jjy40")]
	Jjy40,
	/// USA's WWVB on 60 kHz
	#[value(name = "wwvb")]
	Wwvb
}

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "longwave", version)]
#[command(about = "Emulate longwave time signal stations through the audio output")]
#[command(after_help = EXAMPLES)]
pub struct Arguments {
	/// Time signal to transmit
	#[arg(value_enum, ignore_case = true)]
	pub signal: SignalType,

	/// Use Japan Standard Time (UTC+9) for JJY, ignoring --zone
	#[arg(short, long)]
	pub jst: bool,

	/// Time zone: `local`, or a TZ string such as `EST5EDT,M3.2.0,M11.1.0`. JJY encodes civil
	/// time in this zone; WWVB announces its daylight saving time
	#[arg(short, long, value_name = "TZ", default_value = "local", value_parser = parse_zone)]
	pub zone: Zone,

	/// Starting time to transmit instead of the system clock, e.g. `2024-04-12 10:27:00 -07:00`
	#[arg(short, long, value_name = "DATETIME", value_parser = parse_time)]
	pub time: Option<TimeSpec>,

	/// Stop after this many whole minutes; runs until interrupted otherwise
	#[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
	pub minutes: Option<u32>,

	/// Output sample rate in Hz
	#[arg(short = 'r', long, value_name = "HZ", default_value_t = 48000, value_parser = clap::value_parser!(u32).range(1..))]
	pub sample_rate: u32,

	/// Audio buffer size in frames
	#[arg(short, long, value_name = "FRAMES", default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
	pub buffer: u32,

	/// Number of output channels
	#[arg(short, long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
	pub channels: u16,

	/// Increase logging verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8
}

impl Arguments {
	/// The zone JJY encodes its fields in.
	pub fn jjy_zone(&self) -> Zone {
		if self.jst { Zone::JST } else { self.zone }
	}
}

/// Parse `local` (any case) or a TZ string.
fn parse_zone(s: &str) -> Result<Zone, ZoneError> {
	if s.eq_ignore_ascii_case("local") {
		Ok(Zone::local())
	} else {
		Zone::parse(s)
	}
}

fn parse_time(s: &str) -> Result<TimeSpec, ParseError> {
	parse_timestamp(s)
}
