//! Retrieval
//!
//! Four ways of asking declarative memory a question, all sharing the
//! activation defined in [`crate::activation`]:
//!
//! 1. **Exact** - the matching chunk with the highest noisy activation
//! 2. **Partial** - like exact, but numeric slots may mismatch at a penalty
//! 3. **Probability** - softmax chance that a given chunk would be retrieved
//! 4. **Blended** - activation-weighted average of a slot across matches
//!
//! Exact and partial retrieval must beat the retrieval threshold to succeed.
//! Their latency reuses the activation sample that won, so a trial never
//! draws a second, inconsistent noise value for the same chunk.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::activation::ActivationContext;
use crate::chunk::{Chunk, SlotValue, Slots};
use crate::error::{ActrError, Result};

/// Outcome of an exact or partial retrieval.
#[derive(Clone, Copy, Debug)]
pub struct Retrieval<'a> {
	/// Retrieved chunk, `None` if nothing beat the threshold
	pub chunk: Option<&'a Chunk>,
	/// Winning score (noisy activation plus any mismatch penalty)
	pub activation: Option<f64>,
	/// Retrieval time in seconds
	pub latency: f64,
}

impl Retrieval<'_> {
	/// Whether the retrieval came back empty.
	#[must_use]
	pub const fn is_failure(&self) -> bool {
		self.chunk.is_none()
	}
}

/// Outcome of a blended retrieval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendedRetrieval {
	/// Blended slot value, `None` if no chunk qualified
	pub value: Option<f64>,
	/// Retrieval time in seconds (always the threshold latency)
	pub latency: f64,
}

// ============================================================================
// Matching
// ============================================================================

/// Whether every slot of `pattern` exists in `chunk` with an equal value.
///
/// The pattern is a conjunctive filter; the chunk may carry extra slots.
#[must_use]
pub fn matches(chunk: &Chunk, pattern: &Slots) -> bool {
	pattern
		.iter()
		.all(|(name, value)| chunk.slots().get(name) == Some(value))
}

/// Similarity penalty between two slot values.
///
/// - `0` for equal values
/// - `None` if the values differ and either is not a number
/// - `-√|a - b| / 5` for two different numbers
#[must_use]
pub fn mismatch(a: &SlotValue, b: &SlotValue) -> Option<f64> {
	if a == b {
		return Some(0.0);
	}
	match (a, b) {
		(SlotValue::Number(x), SlotValue::Number(y)) => Some(-(x - y).abs().sqrt() / 5.0),
		_ => None,
	}
}

/// Total mismatch penalty of `chunk` against `pattern`, scaled by `mp`.
///
/// Returns `None` (the chunk cannot be partially matched) if a pattern slot
/// is missing from the chunk or compares two incomparable values.
#[must_use]
pub fn partial_penalty(chunk: &Chunk, pattern: &Slots, mismatch_penalty: f64) -> Option<f64> {
	pattern.iter().try_fold(0.0, |penalty, (name, value)| {
		let similarity = mismatch(chunk.slots().get(name)?, value)?;
		Some(similarity.mul_add(mismatch_penalty, penalty))
	})
}

// ============================================================================
// Exact and Partial Retrieval
// ============================================================================

/// Scan memory in creation order and keep the best score above threshold.
///
/// `score_offset` disqualifies a chunk with `None` or adds a fixed amount to its
/// noisy activation. Only qualifying chunks draw noise. Ties keep the
/// earlier chunk.
fn retrieve_best<'a, R, F>(
	ctx: &ActivationContext<'a>,
	rng: &mut R,
	mut score_offset: F,
) -> Result<Retrieval<'a>>
where
	R: Rng,
	F: FnMut(&Chunk) -> Option<f64>,
{
	let mut best: Option<(&'a Chunk, f64)> = None;
	let mut best_score = ctx.params.retrieval_threshold;

	for chunk in ctx.memory.iter() {
		let Some(offset) = score_offset(chunk) else {
			continue;
		};
		let activation = ctx.activation(chunk, rng)?;
		let score = activation + offset;
		trace!(chunk = chunk.name(), activation, penalty = offset, score, "candidate");

		if score > best_score {
			best = Some((chunk, score));
			best_score = score;
		}
	}

	Ok(match best {
		Some((chunk, score)) => Retrieval {
			chunk: Some(chunk),
			activation: Some(score),
			latency: ctx.latency(score),
		},
		None => Retrieval {
			chunk: None,
			activation: None,
			latency: ctx.threshold_latency(),
		},
	})
}

/// Retrieve the matching chunk with the highest noisy activation.
///
/// The winner must strictly exceed the retrieval threshold. On failure the
/// latency is the threshold latency `F × e^(-f × τ)`.
///
/// # Errors
///
/// Returns [`ActrError::NoPriorEncounter`] if a matching chunk has no
/// encounter before the context time.
pub fn retrieve_exact<'a, R: Rng>(
	ctx: &ActivationContext<'a>,
	pattern: &Slots,
	rng: &mut R,
) -> Result<Retrieval<'a>> {
	retrieve_best(ctx, rng, |chunk| matches(chunk, pattern).then_some(0.0))
}

/// Retrieve with partial matching on numeric slots.
///
/// Candidates are scored `activation + penalty`, where the penalty comes
/// from [`partial_penalty`]; chunks without a penalty are skipped. The
/// penalized score is what must beat the threshold.
///
/// # Errors
///
/// Returns [`ActrError::NoPriorEncounter`] if a comparable chunk has no
/// encounter before the context time.
pub fn retrieve_partial<'a, R: Rng>(
	ctx: &ActivationContext<'a>,
	pattern: &Slots,
	rng: &mut R,
) -> Result<Retrieval<'a>> {
	let mp = ctx.params.mismatch_penalty;
	retrieve_best(ctx, rng, |chunk| partial_penalty(chunk, pattern, mp))
}

// ============================================================================
// Probability and Blending
// ============================================================================

/// Normalized Boltzmann weights `e^(A_i / s) / Σ e^(A_j / s)`.
///
/// The largest activation is subtracted before exponentiating. At `s = 0`
/// the weights take their limit: the maximal activations share all weight.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn boltzmann_weights(activations: &[f64], temperature: f64) -> Vec<f64> {
	let max = activations.iter().copied().fold(f64::NEG_INFINITY, f64::max);

	let raw: Vec<f64> = if temperature > 0.0 {
		activations
			.iter()
			.map(|&a| ((a - max) / temperature).exp())
			.collect()
	} else {
		activations
			.iter()
			.map(|&a| if a == max { 1.0 } else { 0.0 })
			.collect()
	};

	let total: f64 = raw.iter().sum();
	raw.into_iter().map(|w| w / total).collect()
}

/// Probability that `target` is the chunk retrieved for `pattern`.
///
/// `P = e^(A_target / s) / Σ e^(A_c / s)` over the chunks matching `pattern`,
/// using noise-free activation and the noise scale as temperature.
///
/// # Errors
///
/// Returns [`ActrError::NotInMatchingSet`] if `target` does not match, and
/// [`ActrError::NoPriorEncounter`] if a matching chunk was never encountered
/// before the context time.
pub fn retrieval_probability(
	ctx: &ActivationContext<'_>,
	target: &Chunk,
	pattern: &Slots,
) -> Result<f64> {
	let mut position = None;
	let mut activations = Vec::new();
	for chunk in ctx.memory.iter().filter(|c| matches(c, pattern)) {
		if chunk.name() == target.name() {
			position = Some(activations.len());
		}
		activations.push(ctx.activation_no_noise(chunk)?);
	}

	let position = position.ok_or_else(|| ActrError::NotInMatchingSet {
		name: target.name().to_owned(),
	})?;
	Ok(boltzmann_weights(&activations, ctx.params.noise_scale)[position])
}

/// Blend `slot` across every matching chunk that fills it.
///
/// Each eligible chunk is weighted by the Boltzmann weight of its
/// noise-free activation. Latency is always the threshold latency, since
/// no single chunk is selected.
///
/// # Errors
///
/// Returns [`ActrError::NonNumericSlot`] if an eligible chunk holds a chunk
/// reference in `slot`, and [`ActrError::NoPriorEncounter`] if an eligible
/// chunk was never encountered before the context time.
pub fn retrieve_blended(
	ctx: &ActivationContext<'_>,
	pattern: &Slots,
	slot: &str,
) -> Result<BlendedRetrieval> {
	let latency = ctx.threshold_latency();

	let mut values = Vec::new();
	let mut activations = Vec::new();
	for chunk in ctx.memory.iter().filter(|c| matches(c, pattern)) {
		let value = match chunk.slots().get(slot) {
			None | Some(SlotValue::Null) => continue,
			Some(SlotValue::Number(n)) => *n,
			Some(SlotValue::Ref(_)) => {
				return Err(ActrError::NonNumericSlot {
					chunk: chunk.name().to_owned(),
					slot: slot.to_owned(),
				})
			}
		};
		values.push(value);
		activations.push(ctx.activation_no_noise(chunk)?);
	}

	if values.is_empty() {
		return Ok(BlendedRetrieval {
			value: None,
			latency,
		});
	}

	let blended = boltzmann_weights(&activations, ctx.params.noise_scale)
		.iter()
		.zip(&values)
		.map(|(w, v)| w * v)
		.sum();

	Ok(BlendedRetrieval {
		value: Some(blended),
		latency,
	})
}
