//! Position markers for the code array, and the resolver that ties them to
//! concrete bytecode offsets.
//!
//! Attributes that point into the code array (`StackMapTable`,
//! `LineNumberTable`, the local variable tables) never store offsets; they
//! store [`Label`]s and leave the offset arithmetic to whoever owns the code
//! array. That's what makes their raw bytes reusable exactly as long as the
//! code array is untouched.

use std::cell::RefCell;
use std::collections::HashMap;
use crate::error::{Error, Result};

/// An opaque marker for a bytecode offset, valid only together with the
/// resolver that created it.
///
/// The `id` has no relation to the offset; it's just a per-code-unit counter.
/// Note that the code length itself is a valid offset, as exclusive range ends
/// point there.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
	pub(crate) id: u16,
}

/// Two-way mapping between [`Label`]s and bytecode offsets for one code unit.
pub trait LabelResolver {
	/// The offset a label stands for.
	///
	/// Fails with [`Error::UnresolvedLabel`] for labels that did not come from
	/// this resolver.
	fn offset_of(&self, label: Label) -> Result<u16>;

	/// The label standing for `offset`, created on first use.
	///
	/// Fails with [`Error::UnresolvedLabel`] for offsets outside the code
	/// array.
	fn label_at(&self, offset: u16) -> Result<Label>;
}

struct LabelTable {
	by_offset: HashMap<u16, Label>,
	/// Indexed by label id.
	offsets: Vec<u16>,
}

/// A [`LabelResolver`] for a code array of a known length.
///
/// Labels are interned on demand, so looking one up from a shared reference
/// mutates interior state. A fully interned resolver is only ever read, but
/// the interning cell keeps this type `!Sync`; share per thread.
pub struct CodeLabels {
	code_length: u16,
	table: RefCell<LabelTable>,
}

impl CodeLabels {
	pub fn new(code_length: u16) -> CodeLabels {
		CodeLabels {
			code_length,
			table: RefCell::new(LabelTable {
				by_offset: HashMap::new(),
				offsets: Vec::new(),
			}),
		}
	}
}

impl LabelResolver for CodeLabels {
	fn offset_of(&self, label: Label) -> Result<u16> {
		self.table.borrow().offsets.get(label.id as usize)
			.copied()
			.ok_or_else(|| Error::UnresolvedLabel(format!("label {} was not created by this code unit", label.id)))
	}

	fn label_at(&self, offset: u16) -> Result<Label> {
		if offset > self.code_length {
			return Err(Error::UnresolvedLabel(
				format!("bytecode offset {offset} out of bounds for code length {}", self.code_length)
			));
		}
		let mut table = self.table.borrow_mut();
		if let Some(&label) = table.by_offset.get(&offset) {
			return Ok(label);
		}
		let id = u16::try_from(table.offsets.len())
			.map_err(|_| Error::UnresolvedLabel("more labels than a code array can have offsets".to_string()))?;
		let label = Label { id };
		table.by_offset.insert(offset, label);
		table.offsets.push(offset);
		Ok(label)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn labels_are_interned_per_offset() {
		let labels = CodeLabels::new(10);
		let a = labels.label_at(4).expect("in bounds");
		let b = labels.label_at(4).expect("in bounds");
		assert_eq!(a, b);
		assert_eq!(labels.offset_of(a).expect("known"), 4);
	}

	#[test]
	fn end_of_code_is_a_valid_offset() {
		let labels = CodeLabels::new(10);
		assert!(labels.label_at(10).is_ok());
		assert!(labels.label_at(11).is_err());
	}

	#[test]
	fn foreign_labels_are_rejected() {
		let labels = CodeLabels::new(10);
		let foreign = Label { id: 7 };
		assert!(matches!(labels.offset_of(foreign), Err(Error::UnresolvedLabel(_))));
	}
}
