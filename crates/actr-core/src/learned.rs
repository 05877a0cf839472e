//! Learned facts
//!
//! Facts the agent learns during a session (how long to wait for a given
//! gap, say) are written out as JSON Lines and recorded again on the next
//! start. Only the chunk definition is kept; encounter history and fan are
//! rebuilt by recording.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, Slots};
use crate::error::Result;

/// Durable definition of a chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearnedFact {
	/// Chunk name
	pub name: String,
	/// Slot mapping
	pub slots: Slots,
	/// Base-level constant
	#[serde(default, skip_serializing_if = "is_zero")]
	pub blc: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
fn is_zero(value: &f64) -> bool {
	*value == 0.0
}

impl LearnedFact {
	/// Chunk this fact defines, not yet encountered.
	#[must_use]
	pub fn to_chunk(&self) -> Chunk {
		Chunk::new(self.name.clone(), self.slots.clone()).with_blc(self.blc)
	}
}

impl From<&Chunk> for LearnedFact {
	fn from(chunk: &Chunk) -> Self {
		Self {
			name: chunk.name().to_owned(),
			slots: chunk.slots().clone(),
			blc: chunk.blc(),
		}
	}
}

/// Write facts as JSON Lines.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_facts<'a, W, I>(mut writer: W, facts: I) -> Result<()>
where
	W: Write,
	I: IntoIterator<Item = &'a LearnedFact>,
{
	for fact in facts {
		serde_json::to_writer(&mut writer, fact)?;
		writer.write_all(b"\n")?;
	}
	writer.flush()?;
	Ok(())
}

/// Read facts written by [`write_facts`]. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if reading fails or a line is not a valid fact.
pub fn read_facts<R: BufRead>(reader: R) -> Result<Vec<LearnedFact>> {
	let mut facts = Vec::new();
	for line in reader.lines() {
		let line = line?;
		if line.trim().is_empty() {
			continue;
		}
		facts.push(serde_json::from_str(&line)?);
	}
	Ok(facts)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;
	use crate::error::ActrError;

	fn wait_fact(gap: i32, wait: f64) -> LearnedFact {
		LearnedFact {
			name: format!("wf-{gap}-{wait}"),
			slots: Slots::new()
				.with("type", "wait-fact")
				.with("gap", gap)
				.with("wait", wait),
			blc: 0.0,
		}
	}

	#[test]
	fn test_written_facts_read_back() {
		let facts = vec![wait_fact(3, 41.0), wait_fact(7, 63.5)];
		let mut buffer = Vec::new();
		write_facts(&mut buffer, &facts).unwrap();

		let text = String::from_utf8(buffer.clone()).unwrap();
		assert_eq!(text.lines().count(), 2);
		assert!(!text.contains("blc"));

		let back = read_facts(buffer.as_slice()).unwrap();
		assert_eq!(back, facts);
	}

	#[test]
	fn test_read_skips_blank_lines() {
		let input = "\n{\"name\":\"gf\",\"slots\":{\"type\":\"gap-fact\"},\"blc\":1.5}\n\n";
		let facts = read_facts(input.as_bytes()).unwrap();
		assert_eq!(facts.len(), 1);
		assert_eq!(facts[0].blc, 1.5);
		assert_eq!(facts[0].to_chunk().blc(), 1.5);
	}

	#[test]
	fn test_malformed_line() {
		let err = read_facts("{\"name\": 3}".as_bytes()).unwrap_err();
		assert!(matches!(err, ActrError::Serialization(_)));
	}
}
