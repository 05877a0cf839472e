//! Model parameters.
//!
//! Defaults follow the ACT-R reference values used by the card-game model.
//! Every field can be overridden from a TOML document; keys that are left
//! out keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{ActrError, Result};

/// Parameters of activation and retrieval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActrParams {
	/// `ga` - spreading from the goal buffer (`:ga`, default 1.0)
	pub goal_activation: f64,
	/// `ia` - spreading from the imaginal buffer (`:imaginal-activation`, default 1.0)
	pub imaginal_activation: f64,
	/// `mas` - maximum associative strength (`:mas`, default 2.0)
	pub max_spreading: f64,
	/// `d` - base-level decay (`:bll`, default 0.5)
	pub decay: f64,
	/// `s` - activation noise scale, also the softmax temperature (`:ans`)
	pub noise_scale: f64,
	/// `F` - latency factor (`:lf`, default 0.1)
	pub latency_factor: f64,
	/// `f` - latency exponent (`:le`, default 1.0)
	pub latency_exponent: f64,
	/// `τ` - retrieval threshold (`:rt`, default 0.0)
	pub retrieval_threshold: f64,
	/// `mp` - mismatch penalty (`:mp`)
	pub mismatch_penalty: f64,
}

impl Default for ActrParams {
	fn default() -> Self {
		Self {
			goal_activation: 1.0,
			imaginal_activation: 1.0,
			max_spreading: 2.0,
			decay: 0.5,
			noise_scale: 0.2,
			latency_factor: 0.1,
			latency_exponent: 1.0,
			retrieval_threshold: 0.0,
			mismatch_penalty: 3.0,
		}
	}
}

impl ActrParams {
	/// Parse parameters from TOML and validate them.
	///
	/// ```
	/// use actr_core::ActrParams;
	///
	/// let params = ActrParams::from_toml_str("noise_scale = 0.0\nretrieval_threshold = -2.0").unwrap();
	/// assert_eq!(params.noise_scale, 0.0);
	/// assert_eq!(params.decay, 0.5);
	/// ```
	///
	/// # Errors
	///
	/// Returns [`ActrError::Config`] for malformed TOML and
	/// [`ActrError::InvalidParameter`] for out-of-range values.
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let params: Self = toml::from_str(source)?;
		params.validate()?;
		Ok(params)
	}

	/// Check that every parameter is usable.
	///
	/// All values must be finite; decay and noise scale must not be negative,
	/// and the latency factor must be positive.
	///
	/// # Errors
	///
	/// Returns [`ActrError::InvalidParameter`] naming the first bad field.
	pub fn validate(&self) -> Result<()> {
		let fields = [
			("goal_activation", self.goal_activation),
			("imaginal_activation", self.imaginal_activation),
			("max_spreading", self.max_spreading),
			("decay", self.decay),
			("noise_scale", self.noise_scale),
			("latency_factor", self.latency_factor),
			("latency_exponent", self.latency_exponent),
			("retrieval_threshold", self.retrieval_threshold),
			("mismatch_penalty", self.mismatch_penalty),
		];
		if let Some(&(name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
			return Err(ActrError::InvalidParameter { name, value });
		}

		if self.decay < 0.0 {
			return Err(ActrError::InvalidParameter {
				name: "decay",
				value: self.decay,
			});
		}
		if self.noise_scale < 0.0 {
			return Err(ActrError::InvalidParameter {
				name: "noise_scale",
				value: self.noise_scale,
			});
		}
		if self.latency_factor <= 0.0 {
			return Err(ActrError::InvalidParameter {
				name: "latency_factor",
				value: self.latency_factor,
			});
		}
		Ok(())
	}
}
