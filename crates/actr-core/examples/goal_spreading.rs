//! Goal Spreading Example
//!
//! Two facts are equally recent, so on base level alone they tie. Putting
//! a chunk in the goal buffer that one of them references spreads
//! activation to it and decides the retrieval.
//!
//! Run with: `cargo run --example goal_spreading`

#![allow(clippy::expect_used)] // Fine in examples

use actr_core::{ActrParams, Chunk, Model, Slots};

fn main() {
	println!("=== Goal Spreading ===\n");

	let params = ActrParams {
		noise_scale: 0.0,
		retrieval_threshold: -5.0,
		..Default::default()
	};
	let mut model = Model::seeded(params, 1);

	// "card-7" is referenced by two facts, "card-3" by one
	let facts = [
		("play-3", "card-3", "low"),
		("play-7", "card-7", "high"),
		("hold-7", "card-7", "wait"),
	];
	for (name, card, action) in facts {
		model
			.record(Chunk::new(
				name,
				Slots::new()
					.with("type", "play-fact")
					.with("card", card)
					.with("action", action),
			))
			.expect("fresh fact");
	}
	let _ = model.advance(5.0).expect("positive step");

	for chunk in model.memory().iter().filter(|c| c.slots().is_empty()) {
		println!("{:<7} fan {}", chunk.name(), chunk.fan());
	}

	let pattern = Slots::new().with("type", "play-fact");
	let before = model.retrieve_exact(&pattern).expect("encountered");
	println!(
		"\nNo goal: retrieved {:?}",
		before.chunk.map(Chunk::name)
	);

	for card in ["card-3", "card-7"] {
		let _ = model.set_goal(Some(Chunk::new("goal", Slots::new().with("card", card))));
		println!("\nGoal holds {card}:");
		for name in ["play-3", "play-7", "hold-7"] {
			let breakdown = model.activation_breakdown(name).expect("known chunk");
			let probability = model
				.retrieval_probability(name, &pattern)
				.expect("matching chunk");
			println!(
				"  {name:<7} base {:+.3}  goal {:+.3}  total {:+.3}  P = {probability:.3}",
				breakdown.base_level, breakdown.goal_spreading, breakdown.total
			);
		}
		let result = model.retrieve_exact(&pattern).expect("encountered");
		println!(
			"  retrieved {:?} after {:.3} s",
			result.chunk.map(Chunk::name),
			result.latency
		);
	}
}
