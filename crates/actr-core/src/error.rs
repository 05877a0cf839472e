//! Error types for declarative memory operations.

use crate::chunk::Slots;

/// Errors that can occur while recording or activating chunks.
#[derive(Debug, thiserror::Error)]
pub enum ActrError {
	/// A chunk name was recorded twice with different slot contents.
	#[error("chunk `{name}` already exists with slots {existing}, cannot record it with slots {incoming}")]
	SlotConflict {
		/// Name shared by both definitions
		name: String,
		/// Slots of the chunk already in memory
		existing: Slots,
		/// Slots of the rejected chunk
		incoming: Slots,
	},

	/// Activation was requested before the chunk was ever encountered.
	#[error("chunk `{name}` has no encounter before time {time}")]
	NoPriorEncounter {
		/// Chunk name
		name: String,
		/// Query time in seconds
		time: f64,
	},

	/// No chunk with this name exists in memory.
	#[error("chunk `{0}` does not exist in declarative memory")]
	UnknownChunk(String),

	/// The target of a retrieval probability is not matched by the pattern.
	#[error("chunk `{name}` does not match the retrieval pattern")]
	NotInMatchingSet {
		/// Chunk name
		name: String,
	},

	/// Blending over a slot that holds a chunk reference instead of a number.
	#[error("slot `{slot}` of chunk `{chunk}` is not numeric and cannot be blended")]
	NonNumericSlot {
		/// Chunk name
		chunk: String,
		/// Slot name
		slot: String,
	},

	/// A model parameter is out of range.
	#[error("invalid value {value} for parameter `{name}`")]
	InvalidParameter {
		/// Parameter name
		name: &'static str,
		/// Rejected value
		value: f64,
	},

	/// The clock can only move forward by a finite amount.
	#[error("cannot advance the clock by {0} seconds")]
	InvalidClockAdvance(f64),

	/// Parameter file could not be parsed.
	#[error("failed to parse parameters: {0}")]
	Config(#[from] toml::de::Error),

	/// Learned fact could not be encoded or decoded.
	#[error("failed to (de)serialize learned fact: {0}")]
	Serialization(#[from] serde_json::Error),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl ActrError {
	/// Check if this error comes from inconsistent chunk definitions or parameters.
	#[must_use]
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			Self::SlotConflict { .. } | Self::InvalidParameter { .. } | Self::Config(_)
		)
	}

	/// Check if the caller queried memory in the wrong order (before it existed).
	#[must_use]
	pub fn is_sequencing_error(&self) -> bool {
		matches!(
			self,
			Self::NoPriorEncounter { .. } | Self::UnknownChunk(_) | Self::InvalidClockAdvance(_)
		)
	}
}

/// Result type alias for declarative memory operations.
pub type Result<T> = std::result::Result<T, ActrError>;
