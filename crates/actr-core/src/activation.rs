//! Activation Calculation
//!
//! The mathematics of remembering.
//!
//! A chunk's activation is the sum of:
//! 1. **Base-level activation** (recency/frequency): `B = ln[Σ(t - t_k)^(-d)] + blc`
//! 2. **Spreading activation** from the goal and imaginal buffers:
//!    `S = (W / n) × Σ max(0, mas - ln(fan_j))`
//! 3. **Noise**: a logistic sample with scale `s`, redrawn on every call
//!
//! Retrieval latency follows from activation: `T = F × e^(-f × A)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::config::ActrParams;
use crate::error::{ActrError, Result};
use crate::memory::DeclarativeMemory;

// ============================================================================
// Base-Level Activation
// ============================================================================

/// Compute base-level activation from encounter history.
///
/// `B = ln[Σ(t - t_k)^(-d)]`
///
/// Where:
/// - `t` = current time (seconds)
/// - `t_k` = time of encounter k; only encounters strictly before `t` count
/// - `d` = decay rate (≈ 0.5 for humans)
///
/// # Returns
///
/// `None` if no encounter lies strictly before `current_time`.
#[must_use]
pub fn compute_base_level(encounters: &[f64], current_time: f64, decay: f64) -> Option<f64> {
	let mut past = encounters.iter().filter(|&&t| t < current_time).peekable();
	past.peek()?;

	let sum: f64 = past.map(|&t| (current_time - t).powf(-decay)).sum();
	Some(sum.ln())
}

/// Base-level activation of a chunk, including its constant offset.
///
/// # Errors
///
/// Returns [`ActrError::NoPriorEncounter`] if the chunk was not encountered
/// before `time`.
pub fn base_level(chunk: &Chunk, time: f64, decay: f64) -> Result<f64> {
	compute_base_level(chunk.encounters(), time, decay)
		.map(|b| b + chunk.blc())
		.ok_or_else(|| ActrError::NoPriorEncounter {
			name: chunk.name().to_owned(),
			time,
		})
}

// ============================================================================
// Spreading Activation
// ============================================================================

/// Associative strength of a source chunk with the given fan.
///
/// `S_j = max(0, mas - ln(fan_j))`
#[inline]
#[must_use]
pub fn associative_strength(fan: u32, max_spreading: f64) -> f64 {
	(max_spreading - f64::from(fan).ln()).max(0.0)
}

/// Spreading activation from one buffer to `target`.
///
/// Every slot value of the buffer chunk that names a chunk with positive fan,
/// and that also appears among `target`'s slot values, contributes its
/// associative strength. The sum is scaled by `gain / n`, where `n` counts
/// all buffer slots, including empty and numeric ones.
#[must_use]
pub fn spreading_from(
	buffer: Option<&Chunk>,
	target: &Chunk,
	memory: &DeclarativeMemory,
	gain: f64,
	max_spreading: f64,
) -> f64 {
	let Some(buffer) = buffer else {
		return 0.0;
	};
	let total_slots = buffer.slots().len();
	if total_slots == 0 {
		return 0.0;
	}

	let spreading: f64 = buffer
		.slots()
		.values()
		.filter_map(|value| {
			let source = memory.find(value.as_ref_name()?)?;
			(source.fan() > 0 && target.slots().contains_value(value))
				.then(|| associative_strength(source.fan(), max_spreading))
		})
		.sum();

	#[allow(clippy::cast_precision_loss)]
	let per_slot = gain / total_slots as f64;
	spreading * per_slot
}

// ============================================================================
// Noise and Latency
// ============================================================================

/// Draw activation noise from a logistic distribution with mean 0 and scale `s`.
///
/// `ε = s × ln((1 - u) / u)`, `u ~ U[0.001, 0.999]`
///
/// The uniform draw is clipped away from 0 and 1 so a single sample stays
/// within `±s × ln(999)`.
pub fn logistic_noise<R: Rng>(rng: &mut R, scale: f64) -> f64 {
	let u: f64 = rng.gen_range(0.001..=0.999);
	scale * ((1.0 - u) / u).ln()
}

/// Retrieval latency in seconds for an already sampled activation.
///
/// `T = F × e^(-f × A)`
#[inline]
#[must_use]
pub fn retrieval_latency(activation: f64, latency_factor: f64, latency_exponent: f64) -> f64 {
	latency_factor * (-latency_exponent * activation).exp()
}

// ============================================================================
// Activation in Context
// ============================================================================

/// Breakdown of the noise-free activation of a single chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationBreakdown {
	/// Decay of past encounters plus `blc`
	pub base_level: f64,
	/// Spreading from the goal buffer
	pub goal_spreading: f64,
	/// Spreading from the imaginal buffer
	pub imaginal_spreading: f64,
	/// Combined total
	pub total: f64,
}

/// Everything activation depends on, borrowed for the span of one query.
#[derive(Clone, Copy, Debug)]
pub struct ActivationContext<'a> {
	/// Chunks that can be retrieved and that buffer slots can point at
	pub memory: &'a DeclarativeMemory,
	/// Goal buffer content
	pub goal: Option<&'a Chunk>,
	/// Imaginal buffer content
	pub imaginal: Option<&'a Chunk>,
	/// Model parameters
	pub params: &'a ActrParams,
	/// Clock, in seconds
	pub time: f64,
}

impl ActivationContext<'_> {
	/// Noise-free activation split into its sources.
	///
	/// # Errors
	///
	/// Returns [`ActrError::NoPriorEncounter`] if `chunk` has no encounter
	/// before the context time.
	pub fn breakdown(&self, chunk: &Chunk) -> Result<ActivationBreakdown> {
		let base_level = base_level(chunk, self.time, self.params.decay)?;
		let goal_spreading = spreading_from(
			self.goal,
			chunk,
			self.memory,
			self.params.goal_activation,
			self.params.max_spreading,
		);
		let imaginal_spreading = spreading_from(
			self.imaginal,
			chunk,
			self.memory,
			self.params.imaginal_activation,
			self.params.max_spreading,
		);

		Ok(ActivationBreakdown {
			base_level,
			goal_spreading,
			imaginal_spreading,
			total: base_level + goal_spreading + imaginal_spreading,
		})
	}

	/// Activation without noise.
	///
	/// # Errors
	///
	/// See [`ActivationContext::breakdown`].
	pub fn activation_no_noise(&self, chunk: &Chunk) -> Result<f64> {
		self.breakdown(chunk).map(|b| b.total)
	}

	/// Activation with a fresh noise sample. Two calls give two samples.
	///
	/// # Errors
	///
	/// See [`ActivationContext::breakdown`].
	pub fn activation<R: Rng>(&self, chunk: &Chunk, rng: &mut R) -> Result<f64> {
		Ok(self.activation_no_noise(chunk)? + logistic_noise(rng, self.params.noise_scale))
	}

	/// Latency of a retrieval that settled on `activation`.
	#[must_use]
	pub fn latency(&self, activation: f64) -> f64 {
		retrieval_latency(
			activation,
			self.params.latency_factor,
			self.params.latency_exponent,
		)
	}

	/// Latency of a retrieval that failed, or that did not select a single chunk.
	#[must_use]
	pub fn threshold_latency(&self) -> f64 {
		self.latency(self.params.retrieval_threshold)
	}
}
