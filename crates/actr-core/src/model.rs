//! Model
//!
//! One simulated agent: its clock, declarative memory, goal and imaginal
//! buffers, parameters and noise source. The surrounding task layer
//! advances the clock, fills the buffers and records chunks; the model
//! answers retrieval requests as of the current time.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::activation::{ActivationBreakdown, ActivationContext};
use crate::chunk::{Chunk, Slots};
use crate::config::ActrParams;
use crate::error::{ActrError, Result};
use crate::learned::LearnedFact;
use crate::memory::DeclarativeMemory;
use crate::retrieval::{self, BlendedRetrieval, Retrieval};

/// A single ACT-R agent.
#[derive(Clone, Debug)]
pub struct Model<R = StdRng> {
	params: ActrParams,
	time: f64,
	memory: DeclarativeMemory,
	goal: Option<Chunk>,
	imaginal: Option<Chunk>,
	rng: R,
}

impl Model<StdRng> {
	/// Model at time 0 with noise seeded from the operating system.
	#[must_use]
	pub fn new(params: ActrParams) -> Self {
		Self::with_rng(params, StdRng::from_entropy())
	}

	/// Model with reproducible noise.
	#[must_use]
	pub fn seeded(params: ActrParams, seed: u64) -> Self {
		Self::with_rng(params, StdRng::seed_from_u64(seed))
	}
}

impl Default for Model<StdRng> {
	fn default() -> Self {
		Self::new(ActrParams::default())
	}
}

impl<R: Rng> Model<R> {
	/// Model drawing noise from `rng`.
	pub fn with_rng(params: ActrParams, rng: R) -> Self {
		Self {
			params,
			time: 0.0,
			memory: DeclarativeMemory::new(),
			goal: None,
			imaginal: None,
			rng,
		}
	}

	/// Parameters.
	pub const fn params(&self) -> &ActrParams {
		&self.params
	}

	/// Mutable parameters.
	pub fn params_mut(&mut self) -> &mut ActrParams {
		&mut self.params
	}

	/// Current time in seconds.
	pub const fn time(&self) -> f64 {
		self.time
	}

	/// Move the clock forward by `seconds` and return the new time.
	///
	/// # Errors
	///
	/// Returns [`ActrError::InvalidClockAdvance`] for a negative or
	/// non-finite step.
	pub fn advance(&mut self, seconds: f64) -> Result<f64> {
		if !seconds.is_finite() || seconds < 0.0 {
			return Err(ActrError::InvalidClockAdvance(seconds));
		}
		self.time += seconds;
		Ok(self.time)
	}

	/// Declarative memory.
	pub const fn memory(&self) -> &DeclarativeMemory {
		&self.memory
	}

	/// Goal buffer content.
	pub const fn goal(&self) -> Option<&Chunk> {
		self.goal.as_ref()
	}

	/// Mutable goal buffer content.
	pub fn goal_mut(&mut self) -> Option<&mut Chunk> {
		self.goal.as_mut()
	}

	/// Replace the goal buffer, returning what it held.
	pub fn set_goal(&mut self, goal: Option<Chunk>) -> Option<Chunk> {
		std::mem::replace(&mut self.goal, goal)
	}

	/// Imaginal buffer content.
	pub const fn imaginal(&self) -> Option<&Chunk> {
		self.imaginal.as_ref()
	}

	/// Mutable imaginal buffer content.
	pub fn imaginal_mut(&mut self) -> Option<&mut Chunk> {
		self.imaginal.as_mut()
	}

	/// Replace the imaginal buffer, returning what it held.
	pub fn set_imaginal(&mut self, imaginal: Option<Chunk>) -> Option<Chunk> {
		std::mem::replace(&mut self.imaginal, imaginal)
	}

	/// Record an encounter of `chunk` at the current time.
	///
	/// # Errors
	///
	/// Returns [`ActrError::SlotConflict`] if a chunk with the same name but
	/// different slots already exists.
	pub fn record(&mut self, chunk: Chunk) -> Result<()> {
		self.memory.record(chunk, self.time)
	}

	/// Find a chunk by name.
	pub fn find(&self, name: &str) -> Option<&Chunk> {
		self.memory.find(name)
	}

	fn context(&self) -> ActivationContext<'_> {
		ActivationContext {
			memory: &self.memory,
			goal: self.goal.as_ref(),
			imaginal: self.imaginal.as_ref(),
			params: &self.params,
			time: self.time,
		}
	}

	/// Context and noise source, borrowed together.
	fn split(&mut self) -> (ActivationContext<'_>, &mut R) {
		let ctx = ActivationContext {
			memory: &self.memory,
			goal: self.goal.as_ref(),
			imaginal: self.imaginal.as_ref(),
			params: &self.params,
			time: self.time,
		};
		(ctx, &mut self.rng)
	}

	fn require(&self, name: &str) -> Result<&Chunk> {
		self.memory
			.find(name)
			.ok_or_else(|| ActrError::UnknownChunk(name.to_owned()))
	}

	/// Noise-free activation of a chunk, split into its sources.
	///
	/// # Errors
	///
	/// Returns [`ActrError::UnknownChunk`] if no chunk has this name and
	/// [`ActrError::NoPriorEncounter`] if it was not encountered before now.
	pub fn activation_breakdown(&self, name: &str) -> Result<ActivationBreakdown> {
		self.context().breakdown(self.require(name)?)
	}

	/// Noise-free activation of a chunk.
	///
	/// # Errors
	///
	/// See [`Model::activation_breakdown`].
	pub fn activation_no_noise(&self, name: &str) -> Result<f64> {
		self.context().activation_no_noise(self.require(name)?)
	}

	/// Activation of a chunk with a fresh noise sample.
	///
	/// # Errors
	///
	/// See [`Model::activation_breakdown`].
	pub fn activation(&mut self, name: &str) -> Result<f64> {
		let (ctx, rng) = self.split();
		let chunk = ctx
			.memory
			.find(name)
			.ok_or_else(|| ActrError::UnknownChunk(name.to_owned()))?;
		ctx.activation(chunk, rng)
	}

	/// Retrieval latency for an activation value; draws no noise.
	pub fn latency(&self, activation: f64) -> f64 {
		self.context().latency(activation)
	}

	/// Retrieve the best chunk matching every slot of `pattern`.
	///
	/// # Errors
	///
	/// Returns [`ActrError::NoPriorEncounter`] if a matching chunk was not
	/// encountered before now.
	#[instrument(level = "debug", skip_all, fields(time = self.time, pattern = %pattern))]
	pub fn retrieve_exact(&mut self, pattern: &Slots) -> Result<Retrieval<'_>> {
		let (ctx, rng) = self.split();
		let result = retrieval::retrieve_exact(&ctx, pattern, rng)?;
		debug!(
			chunk = result.chunk.map(Chunk::name),
			activation = result.activation,
			latency = result.latency,
			"exact retrieval"
		);
		Ok(result)
	}

	/// Retrieve the best chunk, allowing numeric slots to mismatch.
	///
	/// # Errors
	///
	/// Returns [`ActrError::NoPriorEncounter`] if a comparable chunk was not
	/// encountered before now.
	#[instrument(level = "debug", skip_all, fields(time = self.time, pattern = %pattern))]
	pub fn retrieve_partial(&mut self, pattern: &Slots) -> Result<Retrieval<'_>> {
		let (ctx, rng) = self.split();
		let result = retrieval::retrieve_partial(&ctx, pattern, rng)?;
		debug!(
			chunk = result.chunk.map(Chunk::name),
			activation = result.activation,
			latency = result.latency,
			"partial retrieval"
		);
		Ok(result)
	}

	/// Blend `slot` over all chunks matching `pattern`.
	///
	/// # Errors
	///
	/// Returns [`ActrError::NonNumericSlot`] if a matching chunk stores a
	/// chunk reference in `slot`, and [`ActrError::NoPriorEncounter`] if an
	/// eligible chunk was not encountered before now.
	#[instrument(level = "debug", skip_all, fields(time = self.time, pattern = %pattern, slot = slot))]
	pub fn retrieve_blended(&self, pattern: &Slots, slot: &str) -> Result<BlendedRetrieval> {
		let result = retrieval::retrieve_blended(&self.context(), pattern, slot)?;
		debug!(value = result.value, latency = result.latency, "blended retrieval");
		Ok(result)
	}

	/// Probability that the chunk named `target` is retrieved for `pattern`.
	///
	/// # Errors
	///
	/// Returns [`ActrError::UnknownChunk`] if no chunk has this name,
	/// [`ActrError::NotInMatchingSet`] if it does not match `pattern`, and
	/// [`ActrError::NoPriorEncounter`] if a matching chunk was not
	/// encountered before now.
	pub fn retrieval_probability(&self, target: &str, pattern: &Slots) -> Result<f64> {
		retrieval::retrieval_probability(&self.context(), self.require(target)?, pattern)
	}

	/// Record every fact at the current time, e.g. after a restart.
	///
	/// # Errors
	///
	/// Returns [`ActrError::SlotConflict`] on the first fact that contradicts
	/// memory; facts before it stay recorded.
	pub fn remember_all<'a, I>(&mut self, facts: I) -> Result<usize>
	where
		I: IntoIterator<Item = &'a LearnedFact>,
	{
		let mut count = 0;
		for fact in facts {
			self.record(fact.to_chunk())?;
			count += 1;
		}
		debug!(count, time = self.time, "restored learned facts");
		Ok(count)
	}

	/// Definitions of every chunk matching `pattern`, in creation order.
	pub fn export_facts(&self, pattern: &Slots) -> Vec<LearnedFact> {
		self.memory
			.iter()
			.filter(|c| retrieval::matches(c, pattern))
			.map(LearnedFact::from)
			.collect()
	}
}

impl<R> fmt::Display for Model<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "=== Model ===")?;
		writeln!(f, "Time: {} s", self.time)?;
		match &self.goal {
			Some(goal) => writeln!(f, "Goal: {} {}", goal.name(), goal.slots())?,
			None => writeln!(f, "Goal: none")?,
		}
		match &self.imaginal {
			Some(imaginal) => writeln!(f, "Imaginal: {} {}", imaginal.name(), imaginal.slots())?,
			None => writeln!(f, "Imaginal: none")?,
		}
		writeln!(f, "DM:")?;
		for chunk in self.memory.iter() {
			write!(f, "{chunk}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;
	use crate::chunk::SlotValue;

	fn deterministic() -> Model {
		Model::seeded(
			ActrParams {
				noise_scale: 0.0,
				retrieval_threshold: -100.0,
				..Default::default()
			},
			0,
		)
	}

	fn fact(name: &str, x: i32) -> Chunk {
		Chunk::new(name, Slots::new().with("type", "fact").with("x", x))
	}

	#[test]
	fn test_equal_recency_returns_first_fact() {
		let mut model = deterministic();
		model.record(fact("A", 1)).unwrap();
		model.record(fact("B", 2)).unwrap();
		assert_eq!(model.advance(10.0).unwrap(), 10.0);

		let result = model.retrieve_exact(&Slots::new().with("type", "fact")).unwrap();
		assert_eq!(result.chunk.map(Chunk::name), Some("A"));
	}

	#[test]
	fn test_retrieval_at_encounter_time_fails_loudly() {
		let mut model = deterministic();
		model.record(fact("A", 1)).unwrap();

		let err = model
			.retrieve_exact(&Slots::new().with("type", "fact"))
			.unwrap_err();
		assert!(err.is_sequencing_error());
	}

	#[test]
	fn test_reencounter_adds_time_not_fan() {
		let mut model = deterministic();
		model.record(Chunk::singleton("five")).unwrap();
		model.record(Chunk::new("gf", Slots::new().with("gap", "five"))).unwrap();
		model.advance(2.0).unwrap();
		model.record(Chunk::new("gf", Slots::new().with("gap", "five"))).unwrap();

		let gf = model.find("gf").unwrap();
		assert_eq!(gf.encounters(), &[0.0, 2.0]);
		assert_eq!(model.find("five").unwrap().fan(), 1);
	}

	#[test]
	fn test_goal_spreads_to_referencing_chunks() {
		let mut model = deterministic();
		model
			.record(Chunk::new("gf-3", Slots::new().with("type", "gap-fact").with("card", "c3")))
			.unwrap();
		model
			.record(Chunk::new("gf-7", Slots::new().with("type", "gap-fact").with("card", "c7")))
			.unwrap();
		model.advance(5.0).unwrap();

		let before = model.activation_no_noise("gf-7").unwrap();
		let previous = model.set_goal(Some(Chunk::new("goal", Slots::new().with("card", "c7"))));
		assert!(previous.is_none());

		let breakdown = model.activation_breakdown("gf-7").unwrap();
		assert!((breakdown.goal_spreading - 2.0).abs() < 1e-12);
		assert!(breakdown.total > before);
		assert_eq!(model.activation_breakdown("gf-3").unwrap().goal_spreading, 0.0);

		let result = model.retrieve_exact(&Slots::new().with("type", "gap-fact")).unwrap();
		assert_eq!(result.chunk.map(Chunk::name), Some("gf-7"));
	}

	#[test]
	fn test_goal_can_be_edited_in_place() {
		let mut model = deterministic();
		let _ = model.set_goal(Some(Chunk::new("goal", Slots::new().with("gap", SlotValue::Null))));
		if let Some(goal) = model.goal_mut() {
			let _ = goal.slots_mut().insert("gap", 4);
		}
		assert_eq!(
			model.goal().and_then(|g| g.slots().get("gap")),
			Some(&SlotValue::Number(4.0))
		);
		assert!(model.set_goal(None).is_some());
		assert!(model.goal().is_none());
	}

	#[test]
	fn test_imaginal_spreading_uses_its_own_gain() {
		let mut model = deterministic();
		model.params_mut().imaginal_activation = 0.5;
		model
			.record(Chunk::new("gf-3", Slots::new().with("type", "gap-fact")))
			.unwrap();
		model.advance(1.0).unwrap();
		let _ = model.set_imaginal(Some(Chunk::new("img", Slots::new().with("type", "gap-fact"))));

		let breakdown = model.activation_breakdown("gf-3").unwrap();
		assert!((breakdown.imaginal_spreading - 1.0).abs() < 1e-12);
		assert_eq!(breakdown.goal_spreading, 0.0);
	}

	#[test]
	fn test_partial_retrieval_prefers_nearer_gap() {
		let mut model = deterministic();
		model.record(Chunk::new("g3", Slots::new().with("gap", 3))).unwrap();
		model.record(Chunk::new("g8", Slots::new().with("gap", 8))).unwrap();
		model.advance(10.0).unwrap();

		let result = model.retrieve_partial(&Slots::new().with("gap", 5)).unwrap();
		assert_eq!(result.chunk.map(Chunk::name), Some("g3"));
	}

	#[test]
	fn test_noisy_activation_varies_between_calls() {
		let mut model = Model::seeded(ActrParams::default(), 5);
		model.record(fact("A", 1)).unwrap();
		model.advance(3.0).unwrap();

		let samples: Vec<f64> = (0..10).map(|_| model.activation("A").unwrap()).collect();
		assert!(samples.windows(2).any(|w| w[0] != w[1]));
		// Noise-free activation does not vary.
		assert_eq!(
			model.activation_no_noise("A").unwrap(),
			model.activation_no_noise("A").unwrap()
		);
	}

	#[test]
	fn test_seeded_models_agree() {
		let run = || {
			let mut model = Model::seeded(ActrParams::default(), 17);
			model.record(fact("A", 1)).unwrap();
			model.record(fact("B", 2)).unwrap();
			model.advance(4.0).unwrap();
			let result = model.retrieve_exact(&Slots::new().with("type", "fact")).unwrap();
			(result.chunk.map(|c| c.name().to_owned()), result.latency)
		};
		assert_eq!(run(), run());
	}

	#[test]
	fn test_unknown_chunk() {
		let model = deterministic();
		assert!(matches!(
			model.activation_no_noise("ghost"),
			Err(ActrError::UnknownChunk(_))
		));
		assert!(matches!(
			model.retrieval_probability("ghost", &Slots::new()),
			Err(ActrError::UnknownChunk(_))
		));
	}

	#[test]
	fn test_probability_and_blend_through_model() {
		let mut model = Model::seeded(ActrParams::default(), 1);
		model
			.record(Chunk::new("w1", Slots::new().with("type", "wait-fact").with("wait", 30)))
			.unwrap();
		model
			.record(Chunk::new("w2", Slots::new().with("type", "wait-fact").with("wait", 50)))
			.unwrap();
		model.advance(2.0).unwrap();
		let pattern = Slots::new().with("type", "wait-fact");

		let p1 = model.retrieval_probability("w1", &pattern).unwrap();
		assert!((p1 - 0.5).abs() < 1e-12);

		let blended = model.retrieve_blended(&pattern, "wait").unwrap();
		assert!((blended.value.unwrap() - 40.0).abs() < 1e-9);
	}

	#[test]
	fn test_advance_rejects_backwards_time() {
		let mut model = deterministic();
		assert!(matches!(
			model.advance(-1.0),
			Err(ActrError::InvalidClockAdvance(_))
		));
		assert!(model.advance(f64::INFINITY).is_err());
		assert_eq!(model.time(), 0.0);
	}

	#[test]
	fn test_learned_facts_survive_restart() {
		let mut model = deterministic();
		model
			.record(Chunk::new("wf-5", Slots::new().with("type", "wait-fact").with("gap", 5).with("wait", 44)))
			.unwrap();
		model.record(fact("A", 1)).unwrap();
		let facts = model.export_facts(&Slots::new().with("type", "wait-fact"));
		assert_eq!(facts.len(), 1);

		let mut restarted = deterministic();
		restarted.advance(1.0).unwrap();
		assert_eq!(restarted.remember_all(&facts).unwrap(), 1);
		let wf = restarted.find("wf-5").unwrap();
		assert_eq!(wf.encounters(), &[1.0]);
		assert_eq!(restarted.find("wait-fact").unwrap().fan(), 1);

		// Replaying the same facts is an ordinary re-encounter.
		restarted.advance(1.0).unwrap();
		assert_eq!(restarted.remember_all(&facts).unwrap(), 1);
		assert_eq!(restarted.find("wf-5").unwrap().encounters(), &[1.0, 2.0]);
	}

	#[test]
	fn test_display_lists_memory() {
		let mut model = deterministic();
		model.record(fact("A", 1)).unwrap();
		let text = model.to_string();
		assert!(text.contains("Time: 0 s"));
		assert!(text.contains("Goal: none"));
		assert!(text.contains("Chunk A"));
		assert!(text.contains("Chunk fact"));
	}
}
