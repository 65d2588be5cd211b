//! A direct binary representation of `attribute_info` structures.
//!
//! Use [chapter 4.7 of the Java Virtual Machine Specification](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7)
//! to build attribute bytes by hand. No format checking is done anywhere;
//! writing nonsense is the point — this crate exists so tests can feed a
//! decoder exact payloads, valid or not, without going through the codec
//! under test.
//!
//! ```
//! use raw_attributes::{attribute_table, AttributeInfo, payload};
//!
//! // A `ConstantValue` attribute whose name lives at constant pool index 4
//! // and whose value lives at index 9, inside a one-entry attribute table.
//! let table = attribute_table(&[
//! 	AttributeInfo { name_index: 4, info: payload::constant_value(9) },
//! ]);
//! assert_eq!(table, vec![0, 1, 0, 4, 0, 0, 0, 2, 0, 9]);
//! ```

/// One `attribute_info` structure: the name index and the raw payload. The
/// length item is derived from the payload when writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
	pub name_index: u16,
	pub info: Vec<u8>,
}

impl AttributeInfo {
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = Vec::with_capacity(6 + self.info.len());
		put_u16(&mut bytes, self.name_index);
		put_u32(&mut bytes, self.info.len() as u32);
		bytes.extend_from_slice(&self.info);
		bytes
	}
}

/// An `attributes_count` item followed by the given attributes, as found in
/// class, field, method and `Code` structures.
pub fn attribute_table(attributes: &[AttributeInfo]) -> Vec<u8> {
	let mut bytes = Vec::new();
	put_u16(&mut bytes, attributes.len() as u16);
	for attribute in attributes {
		bytes.extend_from_slice(&attribute.to_bytes());
	}
	bytes
}

fn put_u16(bytes: &mut Vec<u8>, value: u16) {
	bytes.extend_from_slice(&value.to_be_bytes());
}

fn put_u32(bytes: &mut Vec<u8>, value: u32) {
	bytes.extend_from_slice(&value.to_be_bytes());
}

/// Payload builders for the attribute kinds the test suites poke at.
pub mod payload {
	use super::{put_u16, put_u32};

	pub fn constant_value(constantvalue_index: u16) -> Vec<u8> {
		constantvalue_index.to_be_bytes().to_vec()
	}

	pub fn exceptions(exception_index_table: &[u16]) -> Vec<u8> {
		let mut bytes = Vec::new();
		put_u16(&mut bytes, exception_index_table.len() as u16);
		for index in exception_index_table {
			put_u16(&mut bytes, *index);
		}
		bytes
	}

	/// Entries are `(start_pc, line_number)` pairs.
	pub fn line_number_table(line_number_table: &[(u16, u16)]) -> Vec<u8> {
		let mut bytes = Vec::new();
		put_u16(&mut bytes, line_number_table.len() as u16);
		for (start_pc, line_number) in line_number_table {
			put_u16(&mut bytes, *start_pc);
			put_u16(&mut bytes, *line_number);
		}
		bytes
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct CharacterRangeEntry {
		pub start_pc: u16,
		pub end_pc: u16,
		pub character_range_start: u32,
		pub character_range_end: u32,
		pub flags: u16,
	}

	pub fn character_range_table(table: &[CharacterRangeEntry]) -> Vec<u8> {
		let mut bytes = Vec::new();
		put_u16(&mut bytes, table.len() as u16);
		for entry in table {
			put_u16(&mut bytes, entry.start_pc);
			put_u16(&mut bytes, entry.end_pc);
			put_u32(&mut bytes, entry.character_range_start);
			put_u32(&mut bytes, entry.character_range_end);
			put_u16(&mut bytes, entry.flags);
		}
		bytes
	}

	/// A `verification_type_info` union value.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub enum VerificationType {
		Top,
		Integer,
		Float,
		Double,
		Long,
		Null,
		UninitializedThis,
		/// The constant pool index of the class.
		Object(u16),
		/// The offset of the `new` instruction.
		Uninitialized(u16),
	}

	fn put_verification_type(bytes: &mut Vec<u8>, info: VerificationType) {
		match info {
			VerificationType::Top => bytes.push(0),
			VerificationType::Integer => bytes.push(1),
			VerificationType::Float => bytes.push(2),
			VerificationType::Double => bytes.push(3),
			VerificationType::Long => bytes.push(4),
			VerificationType::Null => bytes.push(5),
			VerificationType::UninitializedThis => bytes.push(6),
			VerificationType::Object(cpool_index) => {
				bytes.push(7);
				put_u16(bytes, cpool_index);
			},
			VerificationType::Uninitialized(offset) => {
				bytes.push(8);
				put_u16(bytes, offset);
			},
		}
	}

	/// One `stack_map_frame` in whichever compact form the test wants.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub enum StackMapFrame {
		/// `frame_type` 0-63; the delta is the tag.
		Same { delta: u8 },
		/// `frame_type` 64-127.
		SameLocals1StackItem { delta: u8, stack: VerificationType },
		SameLocals1StackItemExtended { delta: u16, stack: VerificationType },
		/// `frame_type` 251 - k for k in 1..=3.
		Chop { k: u8, delta: u16 },
		SameExtended { delta: u16 },
		/// `frame_type` 251 + locals.len() for 1..=3 appended locals.
		Append { delta: u16, locals: Vec<VerificationType> },
		Full { delta: u16, locals: Vec<VerificationType>, stack: Vec<VerificationType> },
	}

	pub fn stack_map_table(frames: &[StackMapFrame]) -> Vec<u8> {
		let mut bytes = Vec::new();
		put_u16(&mut bytes, frames.len() as u16);
		for frame in frames {
			match frame {
				StackMapFrame::Same { delta } => bytes.push(*delta),
				StackMapFrame::SameLocals1StackItem { delta, stack } => {
					bytes.push(64 + *delta);
					put_verification_type(&mut bytes, *stack);
				},
				StackMapFrame::SameLocals1StackItemExtended { delta, stack } => {
					bytes.push(247);
					put_u16(&mut bytes, *delta);
					put_verification_type(&mut bytes, *stack);
				},
				StackMapFrame::Chop { k, delta } => {
					bytes.push(251 - *k);
					put_u16(&mut bytes, *delta);
				},
				StackMapFrame::SameExtended { delta } => {
					bytes.push(251);
					put_u16(&mut bytes, *delta);
				},
				StackMapFrame::Append { delta, locals } => {
					bytes.push(251 + locals.len() as u8);
					put_u16(&mut bytes, *delta);
					for info in locals {
						put_verification_type(&mut bytes, *info);
					}
				},
				StackMapFrame::Full { delta, locals, stack } => {
					bytes.push(255);
					put_u16(&mut bytes, *delta);
					put_u16(&mut bytes, locals.len() as u16);
					for info in locals {
						put_verification_type(&mut bytes, *info);
					}
					put_u16(&mut bytes, stack.len() as u16);
					for info in stack {
						put_verification_type(&mut bytes, *info);
					}
				},
			}
		}
		bytes
	}

	/// Handlers are `(start_pc, end_pc, handler_pc, catch_type)` rows.
	pub fn code(
		max_stack: u16,
		max_locals: u16,
		code: &[u8],
		exception_table: &[(u16, u16, u16, u16)],
		attributes: &[super::AttributeInfo],
	) -> Vec<u8> {
		let mut bytes = Vec::new();
		put_u16(&mut bytes, max_stack);
		put_u16(&mut bytes, max_locals);
		put_u32(&mut bytes, code.len() as u32);
		bytes.extend_from_slice(code);
		put_u16(&mut bytes, exception_table.len() as u16);
		for (start_pc, end_pc, handler_pc, catch_type) in exception_table {
			put_u16(&mut bytes, *start_pc);
			put_u16(&mut bytes, *end_pc);
			put_u16(&mut bytes, *handler_pc);
			put_u16(&mut bytes, *catch_type);
		}
		bytes.extend_from_slice(&super::attribute_table(attributes));
		bytes
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn attribute_info_layout() {
		let attribute = AttributeInfo { name_index: 7, info: vec![0xAB, 0xCD] };
		assert_eq!(attribute.to_bytes(), vec![0x00, 0x07, 0x00, 0x00, 0x00, 0x02, 0xAB, 0xCD]);
	}

	#[test]
	fn empty_table_is_just_a_count() {
		assert_eq!(attribute_table(&[]), vec![0x00, 0x00]);
	}

	#[test]
	fn stack_map_frames_use_their_tags() {
		let bytes = payload::stack_map_table(&[
			payload::StackMapFrame::Same { delta: 5 },
			payload::StackMapFrame::Chop { k: 2, delta: 10 },
		]);
		assert_eq!(bytes, vec![0x00, 0x02, 5, 249, 0x00, 0x0A]);
	}
}
