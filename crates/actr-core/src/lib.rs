//! # ACT-R Core
//!
//! Declarative memory for ACT-R style cognitive models: chunks, fan
//! bookkeeping, base-level decay, spreading activation from the goal and
//! imaginal buffers, logistic noise, and four kinds of retrieval.
//!
//! ## Core Concepts
//!
//! ### Chunks
//!
//! A chunk is a named record of slots. A slot holds a number, the name of
//! another chunk, or nothing. Recording a chunk that refers to an unknown
//! name creates an empty chunk of that name, so every reference can act as
//! a source of spreading activation.
//!
//! ### Activation
//!
//! 1. **Base-level activation** - recency and frequency of encounters
//!    ```text
//!    B = ln[Σ(t - t_k)^(-d)] + blc
//!    ```
//!
//! 2. **Spreading activation** - from chunks named in the goal and imaginal buffers
//!    ```text
//!    S = (W / n) × Σ max(0, mas - ln(fan_j))
//!    ```
//!
//! 3. **Noise** - a fresh logistic sample with scale `s` per query
//!
//! ### Retrieval
//!
//! - **Exact**: best matching chunk above the retrieval threshold
//! - **Partial**: numeric slots may mismatch at a penalty
//! - **Probability**: softmax chance of retrieving a given chunk
//! - **Blended**: activation-weighted average of a numeric slot
//!
//! Latency is `F × e^(-f × A)`, using the activation that won.
//!
//! ## Example
//!
//! ```rust
//! use actr_core::{ActrParams, Chunk, Model, Slots};
//!
//! let params = ActrParams {
//!     noise_scale: 0.0,
//!     retrieval_threshold: -5.0,
//!     ..Default::default()
//! };
//! let mut model = Model::seeded(params, 7);
//!
//! model.record(Chunk::new("gf-3", Slots::new().with("type", "gap-fact").with("gap", 3))).unwrap();
//! model.record(Chunk::new("gf-8", Slots::new().with("type", "gap-fact").with("gap", 8))).unwrap();
//! model.advance(10.0).unwrap();
//!
//! let result = model.retrieve_partial(&Slots::new().with("type", "gap-fact").with("gap", 5)).unwrap();
//! assert_eq!(result.chunk.map(Chunk::name), Some("gf-3"));
//! ```
//!
//! ## References
//!
//! - Anderson, J. R. (2007). *How Can the Human Mind Occur in the Physical Universe?*
//! - Taatgen, N. A., van Rijn, H., & Anderson, J. (2007). *An integrated theory of
//!   prospective time interval estimation*

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activation;
pub mod chunk;
pub mod config;
pub mod error;
pub mod learned;
pub mod memory;
pub mod model;
pub mod retrieval;
pub mod temporal;

pub use activation::{
	associative_strength, base_level, compute_base_level, logistic_noise, retrieval_latency,
	spreading_from, ActivationBreakdown, ActivationContext,
};
pub use chunk::{Chunk, SlotValue, Slots};
pub use config::ActrParams;
pub use error::{ActrError, Result};
pub use learned::{read_facts, write_facts, LearnedFact};
pub use memory::DeclarativeMemory;
pub use model::Model;
pub use retrieval::{
	boltzmann_weights, matches, mismatch, partial_penalty, retrieval_probability,
	retrieve_blended, retrieve_exact, retrieve_partial, BlendedRetrieval, Retrieval,
};
pub use temporal::{pulses_to_time, time_to_pulses, PacemakerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
