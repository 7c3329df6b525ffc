//! Error types for the command line application.

use signals::ConfigError;

/// The error type for setting up and running a transmission.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	/// No default audio output device is available.
	#[error("Failed to get default audio output device")]
	NoOutputDevice,
	/// The system clock could not be read.
	#[error("Failed to get current system time")]
	Clock,
	/// The signal can't be generated with the requested audio settings.
	#[error("Invalid signal configuration: {0}")]
	Config(#[from] ConfigError),
	/// The output stream could not be created.
	#[error("Failed to open audio stream: {0}")]
	BuildStream(#[from] cpal::BuildStreamError),
	/// The output stream could not be started.
	#[error("Failed to start audio stream: {0}")]
	PlayStream(#[from] cpal::PlayStreamError),
	/// The interrupt handler could not be installed.
	#[error("Failed to install Ctrl-C handler: {0}")]
	Signal(#[from] ctrlc::Error)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn message_test() {
		assert_eq!(AppError::Clock.to_string(), "Failed to get current system time");
		let e = AppError::from(ConfigError::NoHalfTurn { rate: 44100 });
		assert_eq!(
			e.to_string(),
			"Invalid signal configuration: No wavetable rotation gives a 180 degree phase shift at 44100 Hz"
		);
	}
}
