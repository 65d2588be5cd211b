//! Attributes describing the shape of the class itself: nesting, sealing,
//! enclosing context, and record components.

use std::fmt::{Debug, Formatter};
use java_string::JavaString;
use crate::attr::{attribute_payload, read_attributes_from, Attribute, Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::attribute;
use crate::error::Result;
use crate::names::{ClassName, FieldDescriptor};
use crate::pool::{optional, put_optional, ConstantPool, ConstantPoolBuilder, NameAndTypeEntry};

/// One entry of the `InnerClasses` attribute, see JVMS 4.7.6.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassInfo {
	pub inner_class: ClassName,
	/// Absent for local and anonymous classes.
	pub outer_class: Option<ClassName>,
	/// The simple name; absent for anonymous classes.
	pub inner_name: Option<JavaString>,
	pub flags: InnerClassFlags,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct InnerClassFlags {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
}

impl Debug for InnerClassFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("InnerClassFlags { ")?;
		if self.is_public     { f.write_str("public ")?; }
		if self.is_private    { f.write_str("private ")?; }
		if self.is_protected  { f.write_str("protected ")?; }
		if self.is_static     { f.write_str("static ")?; }
		if self.is_final      { f.write_str("final ")?; }
		if self.is_interface  { f.write_str("interface ")?; }
		if self.is_abstract   { f.write_str("abstract ")?; }
		if self.is_synthetic  { f.write_str("synthetic ")?; }
		if self.is_annotation { f.write_str("annotation ")?; }
		if self.is_enum       { f.write_str("enum ")?; }
		f.write_str("}")
	}
}

impl From<u16> for InnerClassFlags {
	fn from(value: u16) -> Self {
		InnerClassFlags {
			is_public:     value & 0x0001 != 0,
			is_private:    value & 0x0002 != 0,
			is_protected:  value & 0x0004 != 0,
			is_static:     value & 0x0008 != 0,
			is_final:      value & 0x0010 != 0,
			is_interface:  value & 0x0200 != 0,
			is_abstract:   value & 0x0400 != 0,
			is_synthetic:  value & 0x1000 != 0,
			is_annotation: value & 0x2000 != 0,
			is_enum:       value & 0x4000 != 0,
		}
	}
}

impl From<InnerClassFlags> for u16 {
	fn from(value: InnerClassFlags) -> Self {
		(if value.is_public     { 0x0001 } else { 0 }) |
		(if value.is_private    { 0x0002 } else { 0 }) |
		(if value.is_protected  { 0x0004 } else { 0 }) |
		(if value.is_static     { 0x0008 } else { 0 }) |
		(if value.is_final      { 0x0010 } else { 0 }) |
		(if value.is_interface  { 0x0200 } else { 0 }) |
		(if value.is_abstract   { 0x0400 } else { 0 }) |
		(if value.is_synthetic  { 0x1000 } else { 0 }) |
		(if value.is_annotation { 0x2000 } else { 0 }) |
		(if value.is_enum       { 0x4000 } else { 0 })
	}
}

/// The `InnerClasses` attribute, see JVMS 4.7.6.
pub struct InnerClassesAttribute<'a> {
	payload: Payload<'a, Vec<InnerClassInfo>>,
}

attribute_payload!(InnerClassesAttribute, Vec<InnerClassInfo>, decode_inner_classes);

impl InnerClassesAttribute<'static> {
	pub fn of(classes: Vec<InnerClassInfo>) -> InnerClassesAttribute<'static> {
		InnerClassesAttribute { payload: Payload::unbound(classes) }
	}
}

impl<'a> InnerClassesAttribute<'a> {
	pub fn classes(&self) -> Result<&[InnerClassInfo]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_inner_classes<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<InnerClassInfo>> {
	let mut reader = SliceReader::new(attribute::INNER_CLASSES, bytes);
	let classes = reader.read_list(|r| {
		Ok(InnerClassInfo {
			inner_class: ctx.pool.class(r.read_u16()?)?,
			outer_class: optional(ctx.pool, r.read_u16()?, |p, i| p.class(i))?,
			inner_name: optional(ctx.pool, r.read_u16()?, |p, i| p.utf8(i))?,
			flags: r.read_u16()?.into(),
		})
	})?;
	reader.expect_end()?;
	Ok(classes)
}

pub(crate) fn encode_inner_classes(attr: &InnerClassesAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let classes = attr.classes()?;
	sink.put_u16_count(classes.len(), "inner classes")?;
	for info in classes {
		sink.put_u16(pool.put_class(&info.inner_class)?);
		sink.put_u16(put_optional(pool, info.outer_class.as_ref(), |pool, class| pool.put_class(class))?);
		sink.put_u16(put_optional(pool, info.inner_name.as_deref(), |pool, name| pool.put_utf8(name))?);
		sink.put_u16(info.flags.into());
	}
	Ok(())
}

/// The payload of the `EnclosingMethod` attribute, see JVMS 4.7.7.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethodInfo {
	pub class: ClassName,
	/// Absent when the class is not immediately enclosed by a method.
	pub method: Option<NameAndTypeEntry>,
}

/// The `EnclosingMethod` attribute of a local or anonymous class, see
/// JVMS 4.7.7.
pub struct EnclosingMethodAttribute<'a> {
	payload: Payload<'a, EnclosingMethodInfo>,
}

attribute_payload!(EnclosingMethodAttribute, EnclosingMethodInfo, decode_enclosing_method);

impl EnclosingMethodAttribute<'static> {
	pub fn of(info: EnclosingMethodInfo) -> EnclosingMethodAttribute<'static> {
		EnclosingMethodAttribute { payload: Payload::unbound(info) }
	}
}

impl<'a> EnclosingMethodAttribute<'a> {
	pub fn enclosing_method(&self) -> Result<&EnclosingMethodInfo> {
		self.get()
	}
}

fn decode_enclosing_method<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<EnclosingMethodInfo> {
	let mut reader = SliceReader::new(attribute::ENCLOSING_METHOD, bytes);
	let info = EnclosingMethodInfo {
		class: ctx.pool.class(reader.read_u16()?)?,
		method: optional(ctx.pool, reader.read_u16()?, |p, i| p.name_and_type(i))?,
	};
	reader.expect_end()?;
	Ok(info)
}

pub(crate) fn encode_enclosing_method(attr: &EnclosingMethodAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let info = attr.enclosing_method()?;
	sink.put_u16(pool.put_class(&info.class)?);
	sink.put_u16(put_optional(pool, info.method.as_ref(), |pool, method| pool.put_name_and_type(method))?);
	Ok(())
}

/// The `NestHost` attribute, see JVMS 4.7.28.
pub struct NestHostAttribute<'a> {
	payload: Payload<'a, ClassName>,
}

attribute_payload!(NestHostAttribute, ClassName, decode_nest_host);

impl NestHostAttribute<'static> {
	pub fn of(host: ClassName) -> NestHostAttribute<'static> {
		NestHostAttribute { payload: Payload::unbound(host) }
	}
}

impl<'a> NestHostAttribute<'a> {
	pub fn nest_host(&self) -> Result<&ClassName> {
		self.get()
	}
}

fn decode_nest_host<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<ClassName> {
	let mut reader = SliceReader::new(attribute::NEST_HOST, bytes);
	let host = ctx.pool.class(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(host)
}

pub(crate) fn encode_nest_host(attr: &NestHostAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_class(attr.nest_host()?)?);
	Ok(())
}

/// The `NestMembers` attribute, see JVMS 4.7.29.
pub struct NestMembersAttribute<'a> {
	payload: Payload<'a, Vec<ClassName>>,
}

attribute_payload!(NestMembersAttribute, Vec<ClassName>, decode_nest_members);

impl NestMembersAttribute<'static> {
	pub fn of(members: Vec<ClassName>) -> NestMembersAttribute<'static> {
		NestMembersAttribute { payload: Payload::unbound(members) }
	}
}

impl<'a> NestMembersAttribute<'a> {
	pub fn nest_members(&self) -> Result<&[ClassName]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_nest_members<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<ClassName>> {
	let mut reader = SliceReader::new(attribute::NEST_MEMBERS, bytes);
	let members = reader.read_list(|r| ctx.pool.class(r.read_u16()?))?;
	reader.expect_end()?;
	Ok(members)
}

pub(crate) fn encode_nest_members(attr: &NestMembersAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let members = attr.nest_members()?;
	sink.put_u16_count(members.len(), "nest members")?;
	for member in members {
		sink.put_u16(pool.put_class(member)?);
	}
	Ok(())
}

/// The `PermittedSubclasses` attribute of a sealed class, see JVMS 4.7.31.
pub struct PermittedSubclassesAttribute<'a> {
	payload: Payload<'a, Vec<ClassName>>,
}

attribute_payload!(PermittedSubclassesAttribute, Vec<ClassName>, decode_permitted_subclasses);

impl PermittedSubclassesAttribute<'static> {
	pub fn of(subclasses: Vec<ClassName>) -> PermittedSubclassesAttribute<'static> {
		PermittedSubclassesAttribute { payload: Payload::unbound(subclasses) }
	}
}

impl<'a> PermittedSubclassesAttribute<'a> {
	pub fn permitted_subclasses(&self) -> Result<&[ClassName]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_permitted_subclasses<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<ClassName>> {
	let mut reader = SliceReader::new(attribute::PERMITTED_SUBCLASSES, bytes);
	let subclasses = reader.read_list(|r| ctx.pool.class(r.read_u16()?))?;
	reader.expect_end()?;
	Ok(subclasses)
}

pub(crate) fn encode_permitted_subclasses(attr: &PermittedSubclassesAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let subclasses = attr.permitted_subclasses()?;
	sink.put_u16_count(subclasses.len(), "permitted subclasses")?;
	for subclass in subclasses {
		sink.put_u16(pool.put_class(subclass)?);
	}
	Ok(())
}

/// One component of the `Record` attribute, see JVMS 4.7.30.
///
/// A component carries its own attribute table (`Signature`, annotations);
/// those attributes stay individually lazy like any other.
#[derive(Debug)]
pub struct RecordComponentInfo<'a> {
	pub name: JavaString,
	pub descriptor: FieldDescriptor,
	pub attributes: Vec<Attribute<'a>>,
}

impl<'a, 'b> PartialEq<RecordComponentInfo<'b>> for RecordComponentInfo<'a> {
	fn eq(&self, other: &RecordComponentInfo<'b>) -> bool {
		self.name == other.name
			&& self.descriptor == other.descriptor
			&& self.attributes == other.attributes
	}
}

impl<'a> RecordComponentInfo<'a> {
	pub fn new(name: JavaString, descriptor: FieldDescriptor) -> RecordComponentInfo<'a> {
		RecordComponentInfo { name, descriptor, attributes: Vec::new() }
	}
}

/// The `Record` attribute, see JVMS 4.7.30.
pub struct RecordAttribute<'a> {
	payload: Payload<'a, Vec<RecordComponentInfo<'a>>>,
}

impl<'a> RecordAttribute<'a> {
	pub fn of(components: Vec<RecordComponentInfo<'a>>) -> RecordAttribute<'a> {
		RecordAttribute { payload: Payload::unbound(components) }
	}

	pub(crate) fn bound(bytes: &'a [u8], ctx: ReadContext<'a>) -> RecordAttribute<'a> {
		RecordAttribute { payload: Payload::bound(bytes, ctx) }
	}

	fn get(&self) -> Result<&Vec<RecordComponentInfo<'a>>> {
		self.payload.get(decode_record)
	}

	pub fn components(&self) -> Result<&[RecordComponentInfo<'a>]> {
		Ok(self.get()?.as_slice())
	}

	/// The raw payload, as long as this view is still backed by the buffer it
	/// was read from.
	pub fn raw_bytes(&self) -> Option<&'a [u8]> {
		self.payload.raw()
	}
}

/// Equality is by decoded content, across lifecycles; a view whose payload
/// doesn't decode compares unequal to everything, itself included.
impl<'a, 'b> PartialEq<RecordAttribute<'b>> for RecordAttribute<'a> {
	fn eq(&self, other: &RecordAttribute<'b>) -> bool {
		match (self.get(), other.get()) {
			(Ok(a), Ok(b)) => a == b,
			_ => false,
		}
	}
}

impl<'a> Debug for RecordAttribute<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("RecordAttribute").field(&self.payload).finish()
	}
}

fn decode_record<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<RecordComponentInfo<'a>>> {
	let mut reader = SliceReader::new(attribute::RECORD, bytes);
	let count = reader.read_u16()?;
	let mut components = Vec::with_capacity((count as usize).min(64));
	for _ in 0..count {
		let name = reader.read_u16().and_then(|i| ctx.pool.utf8(i))?;
		let descriptor = reader.read_u16().and_then(|i| ctx.pool.utf8(i))?;
		let attributes = read_attributes_from(&mut reader, ctx)?;
		components.push(RecordComponentInfo {
			name,
			descriptor: FieldDescriptor::try_from(descriptor)?,
			attributes,
		});
	}
	reader.expect_end()?;
	Ok(components)
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn inner_class_flags_round_trip() {
		let flags = InnerClassFlags { is_public: true, is_static: true, is_enum: true, ..Default::default() };
		assert_eq!(InnerClassFlags::from(u16::from(flags)), flags);
	}
}
