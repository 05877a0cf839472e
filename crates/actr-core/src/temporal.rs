//! Time Perception
//!
//! Pacemaker-accumulator model of interval timing. A pacemaker emits
//! pulses whose duration grows geometrically, with noise proportional to
//! the current duration:
//!
//! `t_{n+1} = a × t_n + ε`, `ε ~ Logistic(0, b × a × t_n)`
//!
//! Counting pulses turns an elapsed interval into a discrete quantity that
//! can be stored in a chunk slot, and counting them back turns a stored
//! count into seconds. Longer intervals are represented with coarser and
//! noisier resolution (scalar timing).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::logistic_noise;
use crate::error::{ActrError, Result};

/// Pacemaker parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacemakerConfig {
	/// `t0` - duration of the first pulse in seconds
	pub start_pulse: f64,
	/// `a` - growth factor of successive pulses
	pub pulse_growth: f64,
	/// `b` - noise scale relative to the grown pulse duration
	pub pulse_noise: f64,
	/// Whether to perturb pulse durations at all
	pub noisy: bool,
}

impl Default for PacemakerConfig {
	fn default() -> Self {
		Self {
			start_pulse: 0.011,
			pulse_growth: 1.1,
			pulse_noise: 0.015,
			noisy: true,
		}
	}
}

impl PacemakerConfig {
	/// Parse a pacemaker from TOML and validate it.
	///
	/// # Errors
	///
	/// Returns [`ActrError::Config`] for malformed TOML and
	/// [`ActrError::InvalidParameter`] for out-of-range values.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Check that pulses always have a positive, non-shrinking duration.
	///
	/// The first pulse must be positive and the growth factor at least 1.
	/// Noise is bounded by `b × ln(999) < 1`, so the largest logistic draw
	/// cannot cancel a whole pulse.
	///
	/// # Errors
	///
	/// Returns [`ActrError::InvalidParameter`] naming the first bad field.
	pub fn validate(&self) -> Result<()> {
		let fields = [
			("start_pulse", self.start_pulse),
			("pulse_growth", self.pulse_growth),
			("pulse_noise", self.pulse_noise),
		];
		if let Some(&(name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
			return Err(ActrError::InvalidParameter { name, value });
		}

		if self.start_pulse <= 0.0 {
			return Err(ActrError::InvalidParameter {
				name: "start_pulse",
				value: self.start_pulse,
			});
		}
		if self.pulse_growth < 1.0 {
			return Err(ActrError::InvalidParameter {
				name: "pulse_growth",
				value: self.pulse_growth,
			});
		}
		if self.pulse_noise < 0.0 || self.pulse_noise * 999.0_f64.ln() >= 1.0 {
			return Err(ActrError::InvalidParameter {
				name: "pulse_noise",
				value: self.pulse_noise,
			});
		}
		Ok(())
	}

	fn next_pulse<R: Rng>(&self, duration: f64, rng: &mut R) -> f64 {
		let grown = self.pulse_growth * duration;
		if self.noisy {
			grown + logistic_noise(rng, self.pulse_noise * grown)
		} else {
			grown
		}
	}
}

/// Count the pulses that fit in `seconds`.
///
/// Counting stops at the first pulse that is not positive, so a config
/// that fails [`PacemakerConfig::validate`] still terminates.
#[must_use]
pub fn time_to_pulses<R: Rng>(seconds: f64, config: &PacemakerConfig, rng: &mut R) -> u32 {
	let mut remaining = seconds;
	let mut pulses = 0;
	let mut duration = config.start_pulse;

	while duration > 0.0 && remaining >= duration {
		remaining -= duration;
		pulses += 1;
		duration = config.next_pulse(duration, rng);
	}

	pulses
}

/// Seconds covered by `pulses` pulses.
#[must_use]
pub fn pulses_to_time<R: Rng>(pulses: u32, config: &PacemakerConfig, rng: &mut R) -> f64 {
	let mut seconds = 0.0;
	let mut duration = config.start_pulse;

	for _ in 0..pulses {
		seconds += duration;
		duration = config.next_pulse(duration, rng);
	}

	seconds
}
