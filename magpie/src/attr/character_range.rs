//! The `CharacterRangeTable` attribute `javac` emits under `-Xjcov`, mapping
//! spans of the code array to spans of source characters.
//!
//! The table is only ever accepted when parsing a class file. Well-formed
//! entries come out of a compiler tracking ranges while it assembles code;
//! there is deliberately no `of` constructor, and the attribute set refuses to
//! attach one (see [`crate::set::AttributeSet`]).

use std::fmt::{Debug, Formatter};
use crate::attr::{Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::attribute;
use crate::error::{Error, Result};

/// One row of the character range table.
///
/// Code offsets are raw and inclusive on both ends. Source positions are
/// encoded as `line << 10 + column`, so they order the same way the source
/// text reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterRangeInfo {
	pub start_pc: u16,
	pub end_pc: u16,
	pub character_range_start: u32,
	pub character_range_end: u32,
	pub flags: CharacterRangeFlags,
}

/// The syntactic categories a range can belong to; several may be set at once.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct CharacterRangeFlags {
	pub is_statement: bool,
	pub is_block: bool,
	pub is_assignment: bool,
	pub is_flow_controller: bool,
	pub is_flow_target: bool,
	pub is_invoke: bool,
	pub is_create: bool,
	pub is_branch_true: bool,
	pub is_branch_false: bool,
}

impl Debug for CharacterRangeFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("CharacterRangeFlags { ")?;
		if self.is_statement       { f.write_str("statement ")?; }
		if self.is_block           { f.write_str("block ")?; }
		if self.is_assignment      { f.write_str("assignment ")?; }
		if self.is_flow_controller { f.write_str("flow-controller ")?; }
		if self.is_flow_target     { f.write_str("flow-target ")?; }
		if self.is_invoke          { f.write_str("invoke ")?; }
		if self.is_create          { f.write_str("create ")?; }
		if self.is_branch_true     { f.write_str("branch-true ")?; }
		if self.is_branch_false    { f.write_str("branch-false ")?; }
		f.write_str("}")
	}
}

impl From<u16> for CharacterRangeFlags {
	fn from(value: u16) -> Self {
		CharacterRangeFlags {
			is_statement:       value & 0x0001 != 0,
			is_block:           value & 0x0002 != 0,
			is_assignment:      value & 0x0004 != 0,
			is_flow_controller: value & 0x0008 != 0,
			is_flow_target:     value & 0x0010 != 0,
			is_invoke:          value & 0x0020 != 0,
			is_create:          value & 0x0040 != 0,
			is_branch_true:     value & 0x0080 != 0,
			is_branch_false:    value & 0x0100 != 0,
		}
	}
}

impl From<CharacterRangeFlags> for u16 {
	fn from(value: CharacterRangeFlags) -> Self {
		(if value.is_statement       { 0x0001 } else { 0 }) |
		(if value.is_block           { 0x0002 } else { 0 }) |
		(if value.is_assignment      { 0x0004 } else { 0 }) |
		(if value.is_flow_controller { 0x0008 } else { 0 }) |
		(if value.is_flow_target     { 0x0010 } else { 0 }) |
		(if value.is_invoke          { 0x0020 } else { 0 }) |
		(if value.is_create          { 0x0040 } else { 0 }) |
		(if value.is_branch_true     { 0x0080 } else { 0 }) |
		(if value.is_branch_false    { 0x0100 } else { 0 })
	}
}

/// How two ranges relate in one of the two spaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Nesting {
	Disjoint,
	FirstEnclosesSecond,
	SecondEnclosesFirst,
	/// Partial overlap, or the exact same span.
	Tangled,
}

fn nesting(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> Nesting {
	if a_end < b_start || b_end < a_start {
		Nesting::Disjoint
	} else if a_start <= b_start && b_end <= a_end && (a_start, a_end) != (b_start, b_end) {
		Nesting::FirstEnclosesSecond
	} else if b_start <= a_start && a_end <= b_end && (a_start, a_end) != (b_start, b_end) {
		Nesting::SecondEnclosesFirst
	} else {
		Nesting::Tangled
	}
}

impl CharacterRangeInfo {
	fn code_nesting(&self, other: &CharacterRangeInfo) -> Nesting {
		nesting(self.start_pc as u64, self.end_pc as u64, other.start_pc as u64, other.end_pc as u64)
	}

	fn source_nesting(&self, other: &CharacterRangeInfo) -> Nesting {
		nesting(
			self.character_range_start as u64, self.character_range_end as u64,
			other.character_range_start as u64, other.character_range_end as u64,
		)
	}
}

/// The `CharacterRangeTable` attribute. Entries carry no ordering guarantee;
/// the nesting structure is reconstructed by comparing ranges pairwise.
pub struct CharacterRangeTableAttribute<'a> {
	payload: Payload<'a, Vec<CharacterRangeInfo>>,
}

impl<'a> CharacterRangeTableAttribute<'a> {
	pub(crate) fn bound(bytes: &'a [u8], ctx: ReadContext<'a>) -> CharacterRangeTableAttribute<'a> {
		CharacterRangeTableAttribute { payload: Payload::bound(bytes, ctx) }
	}

	fn get(&self) -> Result<&Vec<CharacterRangeInfo>> {
		self.payload.get(decode_character_range_table)
	}

	pub fn ranges(&self) -> Result<&[CharacterRangeInfo]> {
		Ok(self.get()?.as_slice())
	}

	/// The raw payload, as long as this view is still backed by the buffer it
	/// was read from.
	pub fn raw_bytes(&self) -> Option<&'a [u8]> {
		self.payload.raw()
	}

	/// Checks that the entries form a forest in both spaces at once: any two
	/// ranges must be disjoint, or one must strictly enclose the other, with
	/// the same relation holding for the code offsets and the source
	/// positions.
	pub fn validate_forest(&self) -> Result<()> {
		validate_forest(self.ranges()?)
	}
}

/// Equality is by decoded content, across lifecycles; a view whose payload
/// doesn't decode compares unequal to everything, itself included.
impl<'a, 'b> PartialEq<CharacterRangeTableAttribute<'b>> for CharacterRangeTableAttribute<'a> {
	fn eq(&self, other: &CharacterRangeTableAttribute<'b>) -> bool {
		match (self.get(), other.get()) {
			(Ok(a), Ok(b)) => a == b,
			_ => false,
		}
	}
}

impl<'a> Debug for CharacterRangeTableAttribute<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("CharacterRangeTableAttribute").field(&self.payload).finish()
	}
}

/// The pairwise forest check behind
/// [`CharacterRangeTableAttribute::validate_forest`], usable on any slice of
/// ranges.
pub fn validate_forest(ranges: &[CharacterRangeInfo]) -> Result<()> {
	for (position, a) in ranges.iter().enumerate() {
		if a.start_pc > a.end_pc || a.character_range_start > a.character_range_end {
			return Err(Error::malformed(
				attribute::CHARACTER_RANGE_TABLE,
				format!("entry {position} ends before it starts"),
			));
		}
		for (other_position, b) in ranges.iter().enumerate().skip(position + 1) {
			let code = a.code_nesting(b);
			let source = a.source_nesting(b);
			if code == Nesting::Tangled || source == Nesting::Tangled {
				return Err(Error::malformed(
					attribute::CHARACTER_RANGE_TABLE,
					format!("entries {position} and {other_position} overlap without nesting"),
				));
			}
			if code != source {
				return Err(Error::malformed(
					attribute::CHARACTER_RANGE_TABLE,
					format!("entries {position} and {other_position} nest differently in code and source space"),
				));
			}
		}
	}
	Ok(())
}

fn decode_character_range_table<'a>(bytes: &'a [u8], _ctx: ReadContext<'a>) -> Result<Vec<CharacterRangeInfo>> {
	let mut reader = SliceReader::new(attribute::CHARACTER_RANGE_TABLE, bytes);
	let ranges = reader.read_list(|r| {
		Ok(CharacterRangeInfo {
			start_pc: r.read_u16()?,
			end_pc: r.read_u16()?,
			character_range_start: r.read_u32()?,
			character_range_end: r.read_u32()?,
			flags: r.read_u16()?.into(),
		})
	})?;
	reader.expect_end()?;
	Ok(ranges)
}

pub(crate) fn encode_character_range_table(attr: &CharacterRangeTableAttribute<'_>, sink: &mut Vec<u8>) -> Result<()> {
	let ranges = attr.ranges()?;
	sink.put_u16_count(ranges.len(), "character ranges")?;
	for range in ranges {
		sink.put_u16(range.start_pc);
		sink.put_u16(range.end_pc);
		sink.put_u32(range.character_range_start);
		sink.put_u32(range.character_range_end);
		sink.put_u16(range.flags.into());
	}
	Ok(())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	fn range(start_pc: u16, end_pc: u16, source_start: u32, source_end: u32) -> CharacterRangeInfo {
		CharacterRangeInfo {
			start_pc,
			end_pc,
			character_range_start: source_start,
			character_range_end: source_end,
			flags: CharacterRangeFlags::default(),
		}
	}

	#[test]
	fn flags_round_trip() {
		let flags = CharacterRangeFlags { is_statement: true, is_branch_true: true, ..Default::default() };
		assert_eq!(CharacterRangeFlags::from(u16::from(flags)), flags);
	}

	#[test]
	fn nested_and_disjoint_ranges_pass() {
		let ranges = [
			range(0, 20, (3 << 10) + 0, (8 << 10) + 5),
			range(2, 10, (4 << 10) + 0, (5 << 10) + 9),
			range(12, 19, (6 << 10) + 0, (7 << 10) + 2),
		];
		assert_eq!(validate_forest(&ranges), Ok(()));
	}

	#[test]
	fn partial_overlap_is_rejected() {
		let ranges = [
			range(0, 10, 1 << 10, 5 << 10),
			range(5, 15, 3 << 10, 8 << 10),
		];
		assert!(validate_forest(&ranges).is_err());
	}

	#[test]
	fn inconsistent_spaces_are_rejected() {
		// Nested in code space, disjoint in source space.
		let ranges = [
			range(0, 20, 1 << 10, 2 << 10),
			range(5, 10, 5 << 10, 6 << 10),
		];
		assert!(validate_forest(&ranges).is_err());
	}
}
