//! Emulate longwave time signal stations using simple audio output.
//!
//! This application transmits [JJY] (40 kHz or 60 kHz) or [WWVB] time codes through the default
//! audio output. Radio-controlled clocks don't hear the audio itself: a DAC driven with a high
//! frequency carrier leaks harmonics of it as RF, and the carriers here are chosen so that a
//! harmonic lands on the station frequency. Place the clock's antenna close to the speaker or
//! headphone cable.
//!
//! [JJY]: https://en.wikipedia.org/wiki/JJY
//! [WWVB]: https://en.wikipedia.org/wiki/WWVB
//!
//! # Command Line Arguments
//!
//! General form: `longwave [options...] signal`
//!
//! | Short form | Long form       | Argument           | Default     | Description                          |
//! | ---------- | --------------- | ------------------ | ----------- | ------------------------------------ |
//! | `-j`       | `--jst`         |                    | Off         | Encode JJY in Japan Standard Time    |
//! | `-z`       | `--zone`        | `local`, TZ string | `local`     | Zone for JJY fields and WWVB DST     |
//! | `-t`       | `--time`        | [Date time string] | System time | The starting time to transmit        |
//! | `-n`       | `--minutes`     | Integer > 0        | Unlimited   | Stop after this many whole minutes   |
//! | `-r`       | `--sample-rate` | Integer > 0        | 48000       | Output sample rate in Hz             |
//! | `-b`       | `--buffer`      | Integer > 0        | 512         | Audio buffer size in frames          |
//! | `-c`       | `--channels`    | Integer > 0        | 1           | Output channels, all the same        |
//! | `-v`       | `--verbose`     |                    |             | More logging, repeat for more detail |
//!
//! The signal is one of `jjy` (alias `jjy60`), `jjy40` or `wwvb`. `RUST_LOG` overrides the
//! verbosity flags.
//!
//! WWVB needs a sample rate at which its carrier can be inverted exactly, such as 48 kHz or
//! 96 kHz; 44.1 kHz is rejected.
//!
//! [Date time string]: time::parse::parse_timestamp
//!
//! # Examples
//!
//! Transmit JJY 40 kHz in Japan Standard Time until interrupted
//! ```sh
//! longwave -j jjy40
//! ```
//!
//! Transmit WWVB with US Eastern DST announcements for 10 minutes
//! ```sh
//! longwave -n 10 -z "EST5EDT,M3.2.0,M11.1.0" wwvb
//! ```

use std::process::ExitCode;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use clap::Parser;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Arguments, SignalType};
use error::AppError;
use signals::jjy::{Band, Jjy};
use signals::wwvb::Wwvb;
use signals::{Protocol, Symbol, Transmitter};
use time::TimeSpec;

mod args;
mod error;

/// How often the main thread checks the transmitted minute.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Simple multi-threaded flag using a condition variable.
///
/// Note that this type does not support re-use, i.e. once a thread calls [`Flagger::notify`],
/// all subsequent waits return immediately.
struct Flagger {
	/// Mutex containing the flag. `true` means continue waiting.
	mutex: Mutex<bool>,
	/// Condition variable to manage wait/notify.
	cond: Condvar
}

impl Flagger {
	/// Create a new [`Flagger`] ready to be waited on.
	fn new() -> Arc<Flagger> {
		Arc::new(Flagger {
			mutex: Mutex::new(true),
			cond: Condvar::new()
		})
	}

	/// Wait up to `timeout` for another thread to call [`Flagger::notify`].
	///
	/// Returns `true` if notified.
	fn wait_timeout(&self, timeout: Duration) -> bool {
		let guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
		let (pending, _) = self.cond
			.wait_timeout_while(guard, timeout, |pending| *pending)
			.unwrap_or_else(PoisonError::into_inner);
		!*pending
	}

	/// Notify threads waiting to unblock.
	fn notify(&self) {
		let mut flag = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
		*flag = false;
		self.cond.notify_all();
	}
}

/// The Unix second at which `minutes` whole minutes starting at or after `start` are complete.
///
/// A start partway through a minute finishes that minute first.
fn stop_time(start: TimeSpec, minutes: u32) -> i64 {
	let into_minute = start.sec.rem_euclid(60);
	let first = if into_minute == 0 && start.nsec == 0 {
		start.sec
	} else {
		start.sec - into_minute + 60
	};
	first + 60 * minutes as i64
}

/// Amplitude code of the minute starting at `minute`, as `M`, `0` and `1`.
fn minute_code<P: Protocol>(protocol: &P, minute: i64) -> String {
	(0..60)
		.map(|s| match protocol.symbol(&protocol.calendar(minute + s)) {
			Symbol::Mark => 'M',
			Symbol::Zero => '0',
			Symbol::One => '1'
		})
		.collect()
}

/// Play `protocol` on the default audio output device until interrupted, until
/// `args.minutes` are transmitted, or until the stream fails.
///
/// # Errors
///
/// Returns an [`AppError`] if no output device is available, the signal can't be generated
/// with the requested audio settings, or the stream can't be started.
fn play<P>(protocol: P, args: &Arguments, start: TimeSpec) -> Result<(), AppError>
where P: Protocol + Clone + Send + 'static
{
	// Set up output device
	let host = cpal::default_host();
	let device = host.default_output_device().ok_or(AppError::NoOutputDevice)?;
	let config = cpal::StreamConfig {
		channels: args.channels,
		sample_rate: cpal::SampleRate(args.sample_rate),
		buffer_size: cpal::BufferSize::Fixed(args.buffer)
	};

	let mut tx = Transmitter::new(protocol.clone(), args.sample_rate, start)?;
	info!(
		signal = protocol.name(),
		sample_rate = args.sample_rate,
		channels = args.channels,
		buffer = args.buffer,
		start = start.sec,
		"Starting transmission"
	);

	// Set up thread synchronization
	let flagger = Flagger::new();
	let clock = Arc::new(AtomicI64::new(start.sec));
	let stop = args.minutes.map(|n| stop_time(start, n));
	let channels = args.channels as usize;

	let stream = {
		let finished = flagger.clone();
		let failed = flagger.clone();
		let clock = clock.clone();
		let mut done = false;
		device.build_output_stream(
			&config,
			move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
				tx.fill(data, channels);
				clock.store(tx.time(), Ordering::Relaxed);
				if !done && stop.is_some_and(|stop| tx.time() >= stop) {
					done = true;
					finished.notify();
				}
			},
			move |e| {
				error!("Error occurred on the audio stream: {}", e);
				failed.notify();
			},
			None
		)?
	};
	stream.play()?;

	let interrupted = flagger.clone();
	ctrlc::set_handler(move || {
		info!("Interrupted");
		interrupted.notify();
	})?;

	let mut announced = None;
	while !flagger.wait_timeout(POLL_INTERVAL) {
		let now = clock.load(Ordering::Relaxed);
		let minute = now - now.rem_euclid(60);
		if announced != Some(minute) {
			announced = Some(minute);
			let tm = protocol.calendar(minute).tm;
			debug!(
				"{} {:04}-{:02}-{:02} {:02}:{:02} {}",
				protocol.name(), tm.year, tm.mon, tm.day, tm.hour, tm.min, minute_code(&protocol, minute)
			);
		}
	}

	drop(stream);
	info!(end = clock.load(Ordering::Relaxed), "Stopped transmission");
	Ok(())
}

/// Pick the protocol for `args.signal` and play it.
fn run(args: Arguments) -> Result<(), AppError> {
	let start = match args.time {
		Some(t) => t,
		None => time::now().ok_or(AppError::Clock)?
	};

	match args.signal {
		SignalType::Jjy => play(Jjy::new(args.jjy_zone(), Band::Khz60), &args, start),
		SignalType::Jjy40 => play(Jjy::new(args.jjy_zone(), Band::Khz40), &args, start),
		SignalType::Wwvb => play(Wwvb::new(args.zone), &args, start)
	}
}

/// Main program entry point.
///
/// Parses input arguments and plays time signal audio output. See [`crate`] documentation for
/// details.
fn main() -> ExitCode {
	let args = Arguments::parse();

	let log_level = match args.verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace"
	};
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| format!("longwave={}", log_level).into())
		)
		.with(tracing_subscriber::fmt::layer().with_target(false))
		.init();

	match run(args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{}", e);
			ExitCode::FAILURE
		}
	}
}
