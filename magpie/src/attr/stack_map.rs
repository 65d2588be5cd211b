//! The `StackMapTable` attribute and its frame model, see JVMS 4.7.4.
//!
//! On disk, frames come in five compact forms that are all deltas against the
//! previous frame. In memory there is exactly one shape: a target label plus
//! the complete locals and operand stack type lists. Decoding expands every
//! compact form; picking a compact form again is purely an encoder
//! optimization.

use crate::attr::{attribute_payload, require_labels, Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::{attribute, frame, verification_type};
use crate::error::{Error, Result};
use crate::labels::{Label, LabelResolver};
use crate::names::ClassName;
use crate::pool::{ConstantPool, ConstantPoolBuilder};

/// The verifier's abstract value categories, see JVMS 4.7.4.
///
/// Equality is by kind and parameter; the encoding tag numbers are not part
/// of the model. `Long` and `Double` are single entries here even though they
/// take two slots in the local variable array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationType {
	Top,
	Integer,
	Float,
	Double,
	Long,
	Null,
	UninitializedThis,
	/// An instance of the named class.
	Object(ClassName),
	/// A value produced by the `new` instruction at the label, not yet
	/// initialized.
	Uninitialized(Label),
}

/// One stack map frame in its expanded shape.
#[derive(Debug, Clone)]
pub struct StackMapFrameInfo {
	frame_type: u8,
	target: Label,
	locals: Vec<VerificationType>,
	stack: Vec<VerificationType>,
}

impl StackMapFrameInfo {
	/// Builds a frame for the given complete state. Always a full frame;
	/// whether it shrinks to a compact form on write is not this type's
	/// concern.
	pub fn of(target: Label, locals: Vec<VerificationType>, stack: Vec<VerificationType>) -> StackMapFrameInfo {
		StackMapFrameInfo { frame_type: frame::FULL, target, locals, stack }
	}

	/// The compact form this frame was decoded from, `255` for built frames.
	/// An encoding detail; not part of equality.
	pub fn frame_type(&self) -> u8 {
		self.frame_type
	}

	pub fn target(&self) -> Label {
		self.target
	}

	pub fn locals(&self) -> &[VerificationType] {
		&self.locals
	}

	pub fn stack(&self) -> &[VerificationType] {
		&self.stack
	}
}

/// Frames compare by target and expanded state; a decoded `chop_frame` equals
/// the hand-built full frame for the same logical state.
impl PartialEq for StackMapFrameInfo {
	fn eq(&self, other: &Self) -> bool {
		self.target == other.target
			&& self.locals == other.locals
			&& self.stack == other.stack
	}
}

impl Eq for StackMapFrameInfo {}

/// The `StackMapTable` attribute, see JVMS 4.7.4.
pub struct StackMapTableAttribute<'a> {
	payload: Payload<'a, Vec<StackMapFrameInfo>>,
}

attribute_payload!(StackMapTableAttribute, Vec<StackMapFrameInfo>, decode_stack_map_table);

impl StackMapTableAttribute<'static> {
	pub fn of(frames: Vec<StackMapFrameInfo>) -> StackMapTableAttribute<'static> {
		StackMapTableAttribute { payload: Payload::unbound(frames) }
	}
}

impl<'a> StackMapTableAttribute<'a> {
	pub fn frames(&self) -> Result<&[StackMapFrameInfo]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_verification_type(reader: &mut SliceReader<'_>, pool: &dyn ConstantPool, labels: &dyn LabelResolver) -> Result<VerificationType> {
	let tag = reader.read_u8()?;
	let info = match tag {
		verification_type::TOP => VerificationType::Top,
		verification_type::INTEGER => VerificationType::Integer,
		verification_type::FLOAT => VerificationType::Float,
		verification_type::DOUBLE => VerificationType::Double,
		verification_type::LONG => VerificationType::Long,
		verification_type::NULL => VerificationType::Null,
		verification_type::UNINITIALIZED_THIS => VerificationType::UninitializedThis,
		verification_type::OBJECT => VerificationType::Object(pool.class(reader.read_u16()?)?),
		verification_type::UNINITIALIZED => VerificationType::Uninitialized(labels.label_at(reader.read_u16()?)?),
		_ => return Err(reader.malformed(format!("unknown verification_type_info tag {tag}"))),
	};
	Ok(info)
}

fn decode_stack_map_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<StackMapFrameInfo>> {
	let labels = require_labels(ctx, attribute::STACK_MAP_TABLE)?;
	let pool = ctx.pool;
	let mut reader = SliceReader::new(attribute::STACK_MAP_TABLE, bytes);

	// The running locals the compact forms are deltas against, seeded with the
	// method's initial frame. Without that context only full frames and
	// stack-only forms can be meaningfully expanded; chop and append against
	// nothing are malformed input.
	let mut locals: Vec<VerificationType> = ctx.frame_locals.map(<[_]>::to_vec).unwrap_or_default();

	let count = reader.read_u16()?;
	let mut frames = Vec::with_capacity(count as usize);
	let mut offset: u32 = 0;

	for position in 0..count {
		let frame_type = reader.read_u8()?;

		let (delta, stack) = match frame_type {
			0..=frame::SAME_MAX => (frame_type as u16, Vec::new()),
			frame::SAME_LOCALS_1_STACK_ITEM_MIN..=frame::SAME_LOCALS_1_STACK_ITEM_MAX => {
				let delta = (frame_type - frame::SAME_LOCALS_1_STACK_ITEM_MIN) as u16;
				(delta, vec![decode_verification_type(&mut reader, pool, labels)?])
			},
			frame::SAME_LOCALS_1_STACK_ITEM_EXTENDED => {
				let delta = reader.read_u16()?;
				(delta, vec![decode_verification_type(&mut reader, pool, labels)?])
			},
			frame::CHOP_MIN..=frame::CHOP_MAX => {
				let k = (frame::SAME_EXTENDED - frame_type) as usize;
				let delta = reader.read_u16()?;
				if locals.len() < k {
					return Err(reader.malformed(format!("chop_frame removes {k} locals but only {} are live", locals.len())));
				}
				locals.truncate(locals.len() - k);
				(delta, Vec::new())
			},
			frame::SAME_EXTENDED => (reader.read_u16()?, Vec::new()),
			frame::APPEND_MIN..=frame::APPEND_MAX => {
				let k = (frame_type - frame::SAME_EXTENDED) as usize;
				let delta = reader.read_u16()?;
				for _ in 0..k {
					locals.push(decode_verification_type(&mut reader, pool, labels)?);
				}
				(delta, Vec::new())
			},
			frame::FULL => {
				let delta = reader.read_u16()?;
				locals = reader.read_list(|r| decode_verification_type(r, pool, labels))?;
				let stack = reader.read_list(|r| decode_verification_type(r, pool, labels))?;
				(delta, stack)
			},
			_ => return Err(reader.malformed(format!("reserved frame_type {frame_type}"))),
		};

		// The first frame sits at its delta; every later one at
		// `previous + delta + 1`, so two frames can never share an offset.
		offset = if position == 0 { delta as u32 } else { offset + delta as u32 + 1 };
		let target_offset = u16::try_from(offset)
			.map_err(|_| reader.malformed(format!("frame offset {offset} exceeds the code array")))?;

		frames.push(StackMapFrameInfo {
			frame_type,
			target: labels.label_at(target_offset)?,
			locals: locals.clone(),
			stack,
		});
	}

	reader.expect_end()?;
	Ok(frames)
}

fn write_verification_type(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, labels: &dyn LabelResolver, info: &VerificationType) -> Result<()> {
	match info {
		VerificationType::Top => sink.put_u8(verification_type::TOP),
		VerificationType::Integer => sink.put_u8(verification_type::INTEGER),
		VerificationType::Float => sink.put_u8(verification_type::FLOAT),
		VerificationType::Double => sink.put_u8(verification_type::DOUBLE),
		VerificationType::Long => sink.put_u8(verification_type::LONG),
		VerificationType::Null => sink.put_u8(verification_type::NULL),
		VerificationType::UninitializedThis => sink.put_u8(verification_type::UNINITIALIZED_THIS),
		VerificationType::Object(class) => {
			sink.put_u8(verification_type::OBJECT);
			sink.put_u16(pool.put_class(class)?);
		},
		VerificationType::Uninitialized(label) => {
			sink.put_u8(verification_type::UNINITIALIZED);
			sink.put_u16(labels.offset_of(*label)?);
		},
	}
	Ok(())
}

/// Picks the most compact form for each frame against the running previous
/// locals. Without the initial frame locals every frame is written in full,
/// which is always correct, just larger.
pub(crate) fn encode_stack_map_table(
	attr: &StackMapTableAttribute<'_>,
	sink: &mut Vec<u8>,
	pool: &mut dyn ConstantPoolBuilder,
	labels: &dyn LabelResolver,
	frame_locals: Option<&[VerificationType]>,
) -> Result<()> {
	let frames = attr.frames()?;

	let mut ordered: Vec<(u16, &StackMapFrameInfo)> = frames.iter()
		.map(|frame| Ok((labels.offset_of(frame.target)?, frame)))
		.collect::<Result<_>>()?;
	ordered.sort_by_key(|(offset, _)| *offset);

	sink.put_u16_count(ordered.len(), "stack map frames")?;

	let mut previous_locals = frame_locals.map(<[_]>::to_vec);
	let mut previous_offset: Option<u16> = None;

	for (offset, frame) in ordered {
		let delta = match previous_offset {
			None => offset,
			Some(previous) => offset.checked_sub(previous).and_then(|gap| gap.checked_sub(1))
				.ok_or_else(|| Error::malformed(attribute::STACK_MAP_TABLE, format!("two frames at bytecode offset {previous}")))?,
		};
		previous_offset = Some(offset);

		enum Form<'f> {
			Same,
			SameLocals1(&'f VerificationType),
			Chop(u8),
			Append(&'f [VerificationType]),
			Full,
		}

		let form = match &previous_locals {
			Some(previous) if frame.stack.is_empty() && frame.locals == *previous => Form::Same,
			Some(previous) if frame.stack.len() == 1 && frame.locals == *previous => Form::SameLocals1(&frame.stack[0]),
			Some(previous) if frame.stack.is_empty()
				&& frame.locals.len() < previous.len()
				&& previous.len() - frame.locals.len() <= 3
				&& previous[..frame.locals.len()] == frame.locals[..] => {
				Form::Chop((previous.len() - frame.locals.len()) as u8)
			},
			Some(previous) if frame.stack.is_empty()
				&& frame.locals.len() > previous.len()
				&& frame.locals.len() - previous.len() <= 3
				&& frame.locals[..previous.len()] == previous[..] => {
				Form::Append(&frame.locals[previous.len()..])
			},
			_ => Form::Full,
		};

		match form {
			Form::Same if delta <= frame::SAME_MAX as u16 => sink.put_u8(delta as u8),
			Form::Same => {
				sink.put_u8(frame::SAME_EXTENDED);
				sink.put_u16(delta);
			},
			Form::SameLocals1(stack_item) if delta <= frame::SAME_MAX as u16 => {
				sink.put_u8(frame::SAME_LOCALS_1_STACK_ITEM_MIN + delta as u8);
				write_verification_type(sink, pool, labels, stack_item)?;
			},
			Form::SameLocals1(stack_item) => {
				sink.put_u8(frame::SAME_LOCALS_1_STACK_ITEM_EXTENDED);
				sink.put_u16(delta);
				write_verification_type(sink, pool, labels, stack_item)?;
			},
			Form::Chop(k) => {
				sink.put_u8(frame::SAME_EXTENDED - k);
				sink.put_u16(delta);
			},
			Form::Append(appended) => {
				sink.put_u8(frame::SAME_EXTENDED + appended.len() as u8);
				sink.put_u16(delta);
				for info in appended {
					write_verification_type(sink, pool, labels, info)?;
				}
			},
			Form::Full => {
				sink.put_u8(frame::FULL);
				sink.put_u16(delta);
				sink.put_u16_count(frame.locals.len(), "frame locals")?;
				for info in &frame.locals {
					write_verification_type(sink, pool, labels, info)?;
				}
				sink.put_u16_count(frame.stack.len(), "frame stack items")?;
				for info in &frame.stack {
					write_verification_type(sink, pool, labels, info)?;
				}
			},
		}

		previous_locals = Some(frame.locals.clone());
	}

	Ok(())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::labels::CodeLabels;
	use crate::pool::{PoolBuilder, TablePool};
	use super::*;

	#[test]
	fn equality_ignores_the_compact_tag() {
		let labels = CodeLabels::new(10);
		let target = labels.label_at(4).expect("in bounds");

		let built = StackMapFrameInfo::of(target, vec![VerificationType::Integer], Vec::new());
		let mut decoded = built.clone();
		decoded.frame_type = 4;
		assert_eq!(built, decoded);
	}

	#[test]
	fn compaction_round_trips() {
		let labels = CodeLabels::new(100);
		let initial = vec![VerificationType::Integer];

		let frames = vec![
			// same as the initial frame
			StackMapFrameInfo::of(labels.label_at(8).expect("ok"), initial.clone(), Vec::new()),
			// appends a local
			StackMapFrameInfo::of(labels.label_at(20).expect("ok"), vec![VerificationType::Integer, VerificationType::Long], Vec::new()),
			// chops back down
			StackMapFrameInfo::of(labels.label_at(40).expect("ok"), initial.clone(), Vec::new()),
			// one stack item
			StackMapFrameInfo::of(labels.label_at(60).expect("ok"), initial.clone(), vec![VerificationType::Null]),
		];
		let attr = StackMapTableAttribute::of(frames.clone());

		let mut pool = PoolBuilder::new();
		let mut sink = Vec::new();
		encode_stack_map_table(&attr, &mut sink, &mut pool, &labels, Some(&initial)).expect("encodes");

		// same(8), append(20), chop(40), same_locals_1(60): all compact forms
		assert_eq!(sink[2], 8);
		assert_eq!(sink[3], frame::SAME_EXTENDED + 1);
		assert_eq!(sink[7], frame::SAME_EXTENDED - 1);
		assert_eq!(sink[10], frame::SAME_LOCALS_1_STACK_ITEM_MIN + 19);

		let table: TablePool = pool.into_table_pool();
		let ctx = ReadContext::new(&table)
			.with_labels(&labels)
			.with_frame_locals(&initial);
		let decoded = decode_stack_map_table(&sink, ctx).expect("decodes");
		assert_eq!(decoded, frames);
	}
}
