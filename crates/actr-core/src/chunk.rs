//! Chunks
//!
//! A chunk is a named record of slot/value pairs plus the history of when
//! it was experienced. Slot values are either numbers, `null`, or the name
//! of another chunk. Any name used as a slot value is itself a chunk in the
//! same memory, which is what lets chunks in a buffer spread activation to
//! the chunks that mention them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

/// Value held by a single slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
	/// Empty slot
	Null,
	/// Numeric fact (gaps, pulse counts, ...)
	Number(f64),
	/// Reference to another chunk by name
	Ref(String),
}

impl SlotValue {
	/// Numeric content, if any.
	#[must_use]
	pub const fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			Self::Null | Self::Ref(_) => None,
		}
	}

	/// Referenced chunk name, if any.
	#[must_use]
	pub fn as_ref_name(&self) -> Option<&str> {
		match self {
			Self::Ref(name) => Some(name),
			Self::Null | Self::Number(_) => None,
		}
	}

	/// Whether the slot is empty.
	#[must_use]
	pub const fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

impl From<&str> for SlotValue {
	fn from(name: &str) -> Self {
		Self::Ref(name.to_owned())
	}
}

impl From<String> for SlotValue {
	fn from(name: String) -> Self {
		Self::Ref(name)
	}
}

impl From<f64> for SlotValue {
	fn from(n: f64) -> Self {
		Self::Number(n)
	}
}

impl From<i32> for SlotValue {
	fn from(n: i32) -> Self {
		Self::Number(f64::from(n))
	}
}

impl From<u32> for SlotValue {
	fn from(n: u32) -> Self {
		Self::Number(f64::from(n))
	}
}

impl<T: Into<Self>> From<Option<T>> for SlotValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

impl fmt::Display for SlotValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => write!(f, "nil"),
			Self::Number(n) => write!(f, "{n}"),
			Self::Ref(name) => write!(f, "{name}"),
		}
	}
}

/// Ordered slot mapping.
///
/// Kept inline for the handful of slots a chunk usually has. Equality
/// ignores slot order: two mappings are equal when they name the same
/// slots with equal values.
#[derive(Clone, Debug, Default)]
pub struct Slots(SmallVec<[(String, SlotValue); 4]>);

impl Slots {
	/// Empty mapping.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder form of [`Slots::insert`].
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
		let _ = self.insert(name, value);
		self
	}

	/// Set a slot, returning the previous value if the slot existed.
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		value: impl Into<SlotValue>,
	) -> Option<SlotValue> {
		let name = name.into();
		let value = value.into();
		if let Some((_, existing)) = self.0.iter_mut().find(|(n, _)| *n == name) {
			return Some(std::mem::replace(existing, value));
		}
		self.0.push((name, value));
		None
	}

	/// Value of a slot.
	#[must_use]
	pub fn get(&self, name: &str) -> Option<&SlotValue> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
	}

	/// Whether any slot holds `value`.
	#[must_use]
	pub fn contains_value(&self, value: &SlotValue) -> bool {
		self.0.iter().any(|(_, v)| v == value)
	}

	/// Slots in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
		self.0.iter().map(|(n, v)| (n.as_str(), v))
	}

	/// Slot values in insertion order.
	pub fn values(&self) -> impl Iterator<Item = &SlotValue> {
		self.0.iter().map(|(_, v)| v)
	}

	/// Names of the chunks referenced by slot values.
	pub fn refs(&self) -> impl Iterator<Item = &str> {
		self.values().filter_map(SlotValue::as_ref_name)
	}

	/// Number of slots.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether there are no slots.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl PartialEq for Slots {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len()
			&& self.iter().all(|(name, value)| {
				other.get(name).is_some_and(|theirs| same_definition(value, theirs))
			})
	}
}

/// Value equality for chunk definitions, where a NaN slot equals a NaN slot.
#[allow(clippy::float_cmp)]
fn same_definition(a: &SlotValue, b: &SlotValue) -> bool {
	match (a, b) {
		(SlotValue::Number(x), SlotValue::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
		_ => a == b,
	}
}

impl<K: Into<String>, V: Into<SlotValue>> FromIterator<(K, V)> for Slots {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut slots = Self::new();
		for (name, value) in iter {
			let _ = slots.insert(name, value);
		}
		slots
	}
}

impl fmt::Display for Slots {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{{")?;
		for (i, (name, value)) in self.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{name}: {value}")?;
		}
		write!(f, "}}")
	}
}

impl Serialize for Slots {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (name, value) in self.iter() {
			map.serialize_entry(name, value)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Slots {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct SlotsVisitor;

		impl<'de> Visitor<'de> for SlotsVisitor {
			type Value = Slots;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "a map of slot names to numbers, strings or null")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Slots, A::Error> {
				let mut slots = Slots::new();
				while let Some((name, value)) = access.next_entry::<String, SlotValue>()? {
					let _ = slots.insert(name, value);
				}
				Ok(slots)
			}
		}

		deserializer.deserialize_map(SlotsVisitor)
	}
}

/// A declarative memory record.
#[derive(Clone, Debug)]
pub struct Chunk {
	name: String,
	slots: Slots,
	encounters: Vec<f64>,
	fan: u32,
	blc: f64,
}

impl Chunk {
	/// New chunk with no encounters yet.
	#[must_use]
	pub fn new(name: impl Into<String>, slots: Slots) -> Self {
		Self {
			name: name.into(),
			slots,
			encounters: Vec::new(),
			fan: 0,
			blc: 0.0,
		}
	}

	/// Slotless chunk standing for a bare symbol (`"fact"`, `"gap-fact"`, ...).
	#[must_use]
	pub fn singleton(name: impl Into<String>) -> Self {
		Self::new(name, Slots::new())
	}

	/// Constant base-level offset for knowledge that should never decay away.
	#[must_use]
	pub fn with_blc(mut self, blc: f64) -> Self {
		self.blc = blc;
		self
	}

	/// Unique name.
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Slot mapping.
	#[must_use]
	pub const fn slots(&self) -> &Slots {
		&self.slots
	}

	/// Mutable slots, for buffer content owned by the caller.
	///
	/// Chunks stored in memory are only handed out by shared reference, so
	/// this cannot rewrite a recorded chunk.
	pub fn slots_mut(&mut self) -> &mut Slots {
		&mut self.slots
	}

	/// Distinct encounter times, in the order they were recorded.
	#[must_use]
	pub fn encounters(&self) -> &[f64] {
		&self.encounters
	}

	/// Number of chunks that referenced this one when they were created.
	#[must_use]
	pub const fn fan(&self) -> u32 {
		self.fan
	}

	/// Base-level constant.
	#[must_use]
	pub const fn blc(&self) -> f64 {
		self.blc
	}

	/// Record an encounter. Re-adding a known time does nothing.
	#[allow(clippy::float_cmp)]
	pub(crate) fn add_encounter(&mut self, time: f64) {
		if !self.encounters.iter().any(|&t| t == time) {
			self.encounters.push(time);
		}
	}

	pub(crate) fn increment_fan(&mut self) {
		self.fan += 1;
	}
}

impl fmt::Display for Chunk {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Chunk {}", self.name)?;
		writeln!(f, "Slots: {}", self.slots)?;
		writeln!(f, "Encounters: {:?}", self.encounters)?;
		writeln!(f, "Fan: {}", self.fan)
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	#[test]
	fn test_encounters_are_distinct() {
		let mut chunk = Chunk::singleton("a");
		chunk.add_encounter(1.0);
		chunk.add_encounter(1.0);
		chunk.add_encounter(2.5);
		assert_eq!(chunk.encounters(), &[1.0, 2.5]);
	}

	#[test]
	fn test_slots_equality_ignores_order() {
		let a = Slots::new().with("type", "fact").with("x", 1);
		let b = Slots::new().with("x", 1.0).with("type", "fact");
		assert_eq!(a, b);

		let c = Slots::new().with("type", "fact").with("x", 2);
		assert_ne!(a, c);

		let d = Slots::new().with("type", "fact");
		assert_ne!(a, d);
	}

	#[test]
	fn test_slots_equality_with_nan() {
		let a = Slots::new().with("x", f64::NAN);
		assert_eq!(a, a.clone());
		assert_ne!(a, Slots::new().with("x", 1));
		assert_eq!(Slots::new().with("x", 0.0), Slots::new().with("x", -0.0));
	}

	#[test]
	fn test_insert_replaces_existing_slot() {
		let mut slots = Slots::new().with("gap", 3);
		let previous = slots.insert("gap", 4);
		assert_eq!(previous, Some(SlotValue::Number(3.0)));
		assert_eq!(slots.len(), 1);
		assert_eq!(slots.get("gap"), Some(&SlotValue::Number(4.0)));
	}

	#[test]
	fn test_refs_only_yield_chunk_names() {
		let slots = Slots::new()
			.with("type", "wait-fact")
			.with("gap", 5)
			.with("wait", SlotValue::Null);
		let refs: Vec<&str> = slots.refs().collect();
		assert_eq!(refs, vec!["wait-fact"]);
	}

	#[test]
	fn test_option_maps_to_null() {
		assert_eq!(SlotValue::from(None::<f64>), SlotValue::Null);
		assert_eq!(SlotValue::from(Some(2.0)), SlotValue::Number(2.0));
	}

	#[test]
	fn test_slots_json_shape() {
		let slots = Slots::new()
			.with("type", "gap-fact")
			.with("gap", 5)
			.with("wait", SlotValue::Null);
		let json = serde_json::to_string(&slots).unwrap();
		assert_eq!(json, r#"{"type":"gap-fact","gap":5.0,"wait":null}"#);

		let back: Slots = serde_json::from_str(&json).unwrap();
		assert_eq!(back, slots);
	}

	#[test]
	fn test_display() {
		let slots = Slots::new().with("type", "fact").with("x", 1);
		assert_eq!(slots.to_string(), "{type: fact, x: 1}");
	}
}
