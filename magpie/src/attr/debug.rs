//! The debug information attributes: source names, line numbers, and local
//! variable tables.

use java_string::JavaString;
use crate::attr::{attribute_payload, require_labels, Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::attribute;
use crate::error::{Error, Result};
use crate::labels::{Label, LabelResolver};
use crate::names::FieldDescriptor;
use crate::pool::{ConstantPool, ConstantPoolBuilder};

/// The `SourceFile` attribute, see JVMS 4.7.10.
pub struct SourceFileAttribute<'a> {
	payload: Payload<'a, JavaString>,
}

attribute_payload!(SourceFileAttribute, JavaString, decode_source_file);

impl SourceFileAttribute<'static> {
	pub fn of(source_file: JavaString) -> SourceFileAttribute<'static> {
		SourceFileAttribute { payload: Payload::unbound(source_file) }
	}
}

impl<'a> SourceFileAttribute<'a> {
	pub fn source_file(&self) -> Result<&JavaString> {
		self.get()
	}
}

fn decode_source_file<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<JavaString> {
	let mut reader = SliceReader::new(attribute::SOURCE_FILE, bytes);
	let source_file = ctx.pool.utf8(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(source_file)
}

pub(crate) fn encode_source_file(attr: &SourceFileAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_utf8(attr.source_file()?)?);
	Ok(())
}

/// The `SourceDebugExtension` attribute, see JVMS 4.7.11. The payload is one
/// long modified UTF-8 string with no length prefix of its own.
pub struct SourceDebugExtensionAttribute<'a> {
	payload: Payload<'a, JavaString>,
}

attribute_payload!(SourceDebugExtensionAttribute, JavaString, decode_source_debug_extension);

impl SourceDebugExtensionAttribute<'static> {
	pub fn of(debug_extension: JavaString) -> SourceDebugExtensionAttribute<'static> {
		SourceDebugExtensionAttribute { payload: Payload::unbound(debug_extension) }
	}
}

impl<'a> SourceDebugExtensionAttribute<'a> {
	pub fn debug_extension(&self) -> Result<&JavaString> {
		self.get()
	}
}

fn decode_source_debug_extension<'a>(bytes: &'a [u8], _ctx: ReadContext<'a>) -> Result<JavaString> {
	JavaString::from_modified_utf8(bytes.to_vec())
		.map_err(|_| Error::malformed(attribute::SOURCE_DEBUG_EXTENSION, "payload is not valid modified UTF-8"))
}

pub(crate) fn encode_source_debug_extension(attr: &SourceDebugExtensionAttribute<'_>, sink: &mut Vec<u8>) -> Result<()> {
	sink.put_slice(&attr.debug_extension()?.to_modified_utf8());
	Ok(())
}

/// The `SourceID` attribute `javac` emits for incremental builds; a single
/// Utf8 entry, shaped like `SourceFile`.
pub struct SourceIdAttribute<'a> {
	payload: Payload<'a, JavaString>,
}

attribute_payload!(SourceIdAttribute, JavaString, decode_source_id);

impl SourceIdAttribute<'static> {
	pub fn of(source_id: JavaString) -> SourceIdAttribute<'static> {
		SourceIdAttribute { payload: Payload::unbound(source_id) }
	}
}

impl<'a> SourceIdAttribute<'a> {
	pub fn source_id(&self) -> Result<&JavaString> {
		self.get()
	}
}

fn decode_source_id<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<JavaString> {
	let mut reader = SliceReader::new(attribute::SOURCE_ID, bytes);
	let source_id = ctx.pool.utf8(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(source_id)
}

pub(crate) fn encode_source_id(attr: &SourceIdAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_utf8(attr.source_id()?)?);
	Ok(())
}

/// The `CompilationID` attribute, a single Utf8 entry naming the compilation.
pub struct CompilationIdAttribute<'a> {
	payload: Payload<'a, JavaString>,
}

attribute_payload!(CompilationIdAttribute, JavaString, decode_compilation_id);

impl CompilationIdAttribute<'static> {
	pub fn of(compilation_id: JavaString) -> CompilationIdAttribute<'static> {
		CompilationIdAttribute { payload: Payload::unbound(compilation_id) }
	}
}

impl<'a> CompilationIdAttribute<'a> {
	pub fn compilation_id(&self) -> Result<&JavaString> {
		self.get()
	}
}

fn decode_compilation_id<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<JavaString> {
	let mut reader = SliceReader::new(attribute::COMPILATION_ID, bytes);
	let compilation_id = ctx.pool.utf8(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(compilation_id)
}

pub(crate) fn encode_compilation_id(attr: &CompilationIdAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_utf8(attr.compilation_id()?)?);
	Ok(())
}

/// One entry of the `LineNumberTable` attribute, see JVMS 4.7.12.
#[derive(Debug, Clone, PartialEq)]
pub struct LineNumberInfo {
	pub start: Label,
	pub line_number: u16,
}

/// The `LineNumberTable` attribute, see JVMS 4.7.12. A `Code` attribute may
/// carry several of these.
pub struct LineNumberTableAttribute<'a> {
	payload: Payload<'a, Vec<LineNumberInfo>>,
}

attribute_payload!(LineNumberTableAttribute, Vec<LineNumberInfo>, decode_line_number_table);

impl LineNumberTableAttribute<'static> {
	pub fn of(line_numbers: Vec<LineNumberInfo>) -> LineNumberTableAttribute<'static> {
		LineNumberTableAttribute { payload: Payload::unbound(line_numbers) }
	}
}

impl<'a> LineNumberTableAttribute<'a> {
	pub fn line_numbers(&self) -> Result<&[LineNumberInfo]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_line_number_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<LineNumberInfo>> {
	let labels = require_labels(ctx, attribute::LINE_NUMBER_TABLE)?;
	let mut reader = SliceReader::new(attribute::LINE_NUMBER_TABLE, bytes);
	let line_numbers = reader.read_list(|r| {
		Ok(LineNumberInfo {
			start: labels.label_at(r.read_u16()?)?,
			line_number: r.read_u16()?,
		})
	})?;
	reader.expect_end()?;
	Ok(line_numbers)
}

pub(crate) fn encode_line_number_table(attr: &LineNumberTableAttribute<'_>, sink: &mut Vec<u8>, labels: &dyn LabelResolver) -> Result<()> {
	let line_numbers = attr.line_numbers()?;
	sink.put_u16_count(line_numbers.len(), "line numbers")?;
	for info in line_numbers {
		sink.put_u16(labels.offset_of(info.start)?);
		sink.put_u16(info.line_number);
	}
	Ok(())
}

/// One entry of the `LocalVariableTable` attribute, see JVMS 4.7.13.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableInfo {
	/// Start of the range the variable is live in, inclusive.
	pub start: Label,
	/// End of the range, exclusive.
	pub end: Label,
	pub name: JavaString,
	pub descriptor: FieldDescriptor,
	/// The slot in the local variable array; `long` and `double` also occupy
	/// the following slot.
	pub index: u16,
}

/// The `LocalVariableTable` attribute, see JVMS 4.7.13.
pub struct LocalVariableTableAttribute<'a> {
	payload: Payload<'a, Vec<LocalVariableInfo>>,
}

attribute_payload!(LocalVariableTableAttribute, Vec<LocalVariableInfo>, decode_local_variable_table);

impl LocalVariableTableAttribute<'static> {
	pub fn of(local_variables: Vec<LocalVariableInfo>) -> LocalVariableTableAttribute<'static> {
		LocalVariableTableAttribute { payload: Payload::unbound(local_variables) }
	}
}

impl<'a> LocalVariableTableAttribute<'a> {
	pub fn local_variables(&self) -> Result<&[LocalVariableInfo]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_local_variable_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<LocalVariableInfo>> {
	let labels = require_labels(ctx, attribute::LOCAL_VARIABLE_TABLE)?;
	let mut reader = SliceReader::new(attribute::LOCAL_VARIABLE_TABLE, bytes);
	let local_variables = reader.read_list(|r| {
		let start_pc = r.read_u16()?;
		let length = r.read_u16()?;
		let end_pc = start_pc.checked_add(length)
			.ok_or_else(|| Error::malformed(attribute::LOCAL_VARIABLE_TABLE, "local variable range overflows the code array"))?;
		Ok(LocalVariableInfo {
			start: labels.label_at(start_pc)?,
			end: labels.label_at(end_pc)?,
			name: ctx.pool.utf8(r.read_u16()?)?,
			descriptor: FieldDescriptor::try_from(ctx.pool.utf8(r.read_u16()?)?)?,
			index: r.read_u16()?,
		})
	})?;
	reader.expect_end()?;
	Ok(local_variables)
}

fn range_length(labels: &dyn LabelResolver, start: Label, end: Label) -> Result<(u16, u16)> {
	let start_pc = labels.offset_of(start)?;
	let end_pc = labels.offset_of(end)?;
	let length = end_pc.checked_sub(start_pc)
		.ok_or_else(|| Error::UnresolvedLabel("local variable range ends before it starts".to_string()))?;
	Ok((start_pc, length))
}

pub(crate) fn encode_local_variable_table(attr: &LocalVariableTableAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, labels: &dyn LabelResolver) -> Result<()> {
	let local_variables = attr.local_variables()?;
	sink.put_u16_count(local_variables.len(), "local variables")?;
	for info in local_variables {
		let (start_pc, length) = range_length(labels, info.start, info.end)?;
		sink.put_u16(start_pc);
		sink.put_u16(length);
		sink.put_u16(pool.put_utf8(&info.name)?);
		sink.put_u16(pool.put_utf8(info.descriptor.as_java_str())?);
		sink.put_u16(info.index);
	}
	Ok(())
}

/// One entry of the `LocalVariableTypeTable` attribute, see JVMS 4.7.14.
///
/// This differs from [`LocalVariableInfo`] in carrying a generic signature
/// instead of a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableTypeInfo {
	pub start: Label,
	pub end: Label,
	pub name: JavaString,
	pub signature: JavaString,
	pub index: u16,
}

/// The `LocalVariableTypeTable` attribute, see JVMS 4.7.14.
pub struct LocalVariableTypeTableAttribute<'a> {
	payload: Payload<'a, Vec<LocalVariableTypeInfo>>,
}

attribute_payload!(LocalVariableTypeTableAttribute, Vec<LocalVariableTypeInfo>, decode_local_variable_type_table);

impl LocalVariableTypeTableAttribute<'static> {
	pub fn of(local_variable_types: Vec<LocalVariableTypeInfo>) -> LocalVariableTypeTableAttribute<'static> {
		LocalVariableTypeTableAttribute { payload: Payload::unbound(local_variable_types) }
	}
}

impl<'a> LocalVariableTypeTableAttribute<'a> {
	pub fn local_variable_types(&self) -> Result<&[LocalVariableTypeInfo]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_local_variable_type_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<LocalVariableTypeInfo>> {
	let labels = require_labels(ctx, attribute::LOCAL_VARIABLE_TYPE_TABLE)?;
	let mut reader = SliceReader::new(attribute::LOCAL_VARIABLE_TYPE_TABLE, bytes);
	let local_variable_types = reader.read_list(|r| {
		let start_pc = r.read_u16()?;
		let length = r.read_u16()?;
		let end_pc = start_pc.checked_add(length)
			.ok_or_else(|| Error::malformed(attribute::LOCAL_VARIABLE_TYPE_TABLE, "local variable range overflows the code array"))?;
		Ok(LocalVariableTypeInfo {
			start: labels.label_at(start_pc)?,
			end: labels.label_at(end_pc)?,
			name: ctx.pool.utf8(r.read_u16()?)?,
			signature: ctx.pool.utf8(r.read_u16()?)?,
			index: r.read_u16()?,
		})
	})?;
	reader.expect_end()?;
	Ok(local_variable_types)
}

pub(crate) fn encode_local_variable_type_table(attr: &LocalVariableTypeTableAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, labels: &dyn LabelResolver) -> Result<()> {
	let local_variable_types = attr.local_variable_types()?;
	sink.put_u16_count(local_variable_types.len(), "local variable types")?;
	for info in local_variable_types {
		let (start_pc, length) = range_length(labels, info.start, info.end)?;
		sink.put_u16(start_pc);
		sink.put_u16(length);
		sink.put_u16(pool.put_utf8(&info.name)?);
		sink.put_u16(pool.put_utf8(&info.signature)?);
		sink.put_u16(info.index);
	}
	Ok(())
}
