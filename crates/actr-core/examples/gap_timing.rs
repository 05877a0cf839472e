//! Gap Timing Example
//!
//! A card-game agent learns how long to wait before playing a card, given
//! the gap between its card and the card on the table. Waits are stored as
//! pacemaker pulses in wait facts and blended back when a new gap comes up.
//!
//! Run with: `RUST_LOG=actr_core=debug cargo run --example gap_timing`

#![allow(clippy::expect_used)] // Fine in examples

use actr_core::{
	pulses_to_time, time_to_pulses, ActrParams, Chunk, Model, PacemakerConfig, Slots,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	println!("=== Gap Timing ===\n");

	let mut model = Model::seeded(ActrParams::default(), 2024);
	let pacemaker = PacemakerConfig::default();
	let mut rng = StdRng::seed_from_u64(7);

	// Waits (seconds) that worked well for a few gaps, seen one per trial
	let experience = [(2, 1.5), (5, 3.0), (5, 3.4), (9, 5.5), (2, 1.2), (5, 2.9)];

	for (trial, (gap, wait)) in experience.iter().enumerate() {
		let pulses = time_to_pulses(*wait, &pacemaker, &mut rng);
		let fact = Chunk::new(
			format!("wf-{trial}"),
			Slots::new()
				.with("type", "wait-fact")
				.with("gap", *gap)
				.with("pulses", pulses),
		);
		model.record(fact).expect("fresh fact");
		println!("Trial {trial}: gap {gap:>2} → waited {wait:.1} s ({pulses} pulses)");
		let _ = model.advance(10.0).expect("positive step");
	}

	println!("\n--- Estimates at t = {} s ---\n", model.time());

	for gap in [2, 5, 9, 12] {
		let pattern = Slots::new().with("type", "wait-fact").with("gap", gap);
		let blended = model
			.retrieve_blended(&pattern, "pulses")
			.expect("facts were encountered");

		match blended.value {
			Some(pulses) => {
				#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
				let pulses = pulses.round() as u32;
				let wait = pulses_to_time(pulses, &pacemaker, &mut rng);
				println!("Gap {gap:>2}: blend of {pulses} pulses ≈ {wait:.2} s");
			}
			None => {
				// Nothing learned for this gap; fall back on the closest one.
				let nearest = model
					.retrieve_partial(&pattern)
					.expect("facts were encountered");
				match nearest.chunk {
					Some(chunk) => println!(
						"Gap {gap:>2}: no exact facts, nearest is {} {}",
						chunk.name(),
						chunk.slots()
					),
					None => println!("Gap {gap:>2}: nothing comes to mind"),
				}
			}
		}
	}

	println!("\n{model}");
}
