//! Declarative Memory
//!
//! The store of every chunk one agent knows. Chunks are appended in the
//! order they are first encountered and never removed; retrieval scans
//! walk them in that order, so the earliest chunk wins exact ties.
//!
//! Fan is counted once, when a chunk is first created: every chunk named
//! by one of its slot values gains one fan. Later encounters of the same
//! chunk leave fan untouched.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::chunk::{Chunk, Slots};
use crate::error::{ActrError, Result};

/// All chunks of one agent, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct DeclarativeMemory {
	chunks: Vec<Chunk>,
	index: HashMap<String, usize>,
}

impl DeclarativeMemory {
	/// Empty memory.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Find a chunk by name.
	#[must_use]
	pub fn find(&self, name: &str) -> Option<&Chunk> {
		self.index.get(name).map(|&i| &self.chunks[i])
	}

	/// Whether a chunk with this name exists.
	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	/// Chunks in creation order.
	pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
		self.chunks.iter()
	}

	/// Number of chunks.
	#[must_use]
	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	/// Whether memory is empty.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}

	/// Record an encounter of `chunk` at `time`.
	///
	/// A new name is inserted as given. A known name must carry exactly the
	/// slots already stored; only the encounter is added in that case, and
	/// the incoming chunk is otherwise discarded.
	///
	/// Every slot value naming a chunk that does not exist yet creates a
	/// singleton chunk encountered at `time`. When the name was new, each
	/// chunk it references then gains one fan.
	///
	/// # Errors
	///
	/// Returns [`ActrError::SlotConflict`] if the name is known with different
	/// slots. Memory is left unchanged in that case.
	pub fn record(&mut self, chunk: Chunk, time: f64) -> Result<()> {
		let known = self.index.get(chunk.name()).copied();
		let (idx, created) = match known {
			Some(idx) => {
				let existing = &self.chunks[idx];
				if existing.slots() != chunk.slots() {
					return Err(ActrError::SlotConflict {
						name: chunk.name().to_owned(),
						existing: existing.slots().clone(),
						incoming: chunk.slots().clone(),
					});
				}
				(idx, false)
			}
			None => (self.insert(chunk), true),
		};

		self.chunks[idx].add_encounter(time);

		let slots = self.chunks[idx].slots().clone();
		for name in slots.refs() {
			if !self.contains(name) {
				let mut singleton = Chunk::singleton(name);
				singleton.add_encounter(time);
				let _ = self.insert(singleton);
			}
		}

		if created {
			self.increment_fans(&slots);
		}

		Ok(())
	}

	fn insert(&mut self, chunk: Chunk) -> usize {
		let idx = self.chunks.len();
		debug!(chunk = chunk.name(), slots = %chunk.slots(), "new chunk");
		let _ = self.index.insert(chunk.name().to_owned(), idx);
		self.chunks.push(chunk);
		idx
	}

	/// Each distinct referenced chunk gains one fan, however many slots name it.
	fn increment_fans(&mut self, slots: &Slots) {
		let mut seen: Vec<&str> = Vec::with_capacity(slots.len());
		for name in slots.refs() {
			if seen.contains(&name) {
				continue;
			}
			seen.push(name);
			if let Some(&i) = self.index.get(name) {
				self.chunks[i].increment_fan();
				trace!(chunk = name, fan = self.chunks[i].fan(), "fan incremented");
			}
		}
	}
}
