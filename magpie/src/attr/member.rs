//! Attributes of fields and methods: `ConstantValue`, `Exceptions`,
//! `MethodParameters`, `Signature`, and the two marker attributes.

use std::fmt::{Debug, Formatter};
use java_string::JavaString;
use crate::attr::{attribute_payload, Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::attribute;
use crate::error::Result;
use crate::names::ClassName;
use crate::pool::{put_optional, ConstantPool, ConstantPoolBuilder, ConstantValueEntry};

/// The `ConstantValue` attribute of a `static final` field, see JVMS 4.7.2.
pub struct ConstantValueAttribute<'a> {
	payload: Payload<'a, ConstantValueEntry>,
}

attribute_payload!(ConstantValueAttribute, ConstantValueEntry, decode_constant_value);

impl ConstantValueAttribute<'static> {
	pub fn of(value: ConstantValueEntry) -> ConstantValueAttribute<'static> {
		ConstantValueAttribute { payload: Payload::unbound(value) }
	}
}

impl<'a> ConstantValueAttribute<'a> {
	pub fn value(&self) -> Result<&ConstantValueEntry> {
		self.get()
	}
}

fn decode_constant_value<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<ConstantValueEntry> {
	let mut reader = SliceReader::new(attribute::CONSTANT_VALUE, bytes);
	let value = ctx.pool.constant_value(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(value)
}

pub(crate) fn encode_constant_value(attr: &ConstantValueAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_constant_value(attr.value()?)?);
	Ok(())
}

/// The `Exceptions` attribute listing the checked exceptions a method
/// declares, see JVMS 4.7.5.
pub struct ExceptionsAttribute<'a> {
	payload: Payload<'a, Vec<ClassName>>,
}

attribute_payload!(ExceptionsAttribute, Vec<ClassName>, decode_exceptions);

impl ExceptionsAttribute<'static> {
	pub fn of(exceptions: Vec<ClassName>) -> ExceptionsAttribute<'static> {
		ExceptionsAttribute { payload: Payload::unbound(exceptions) }
	}

	/// Builds the attribute from internal binary names, like
	/// `java/io/IOException`.
	pub fn of_symbols<'s>(symbols: impl IntoIterator<Item = &'s str>) -> Result<ExceptionsAttribute<'static>> {
		let exceptions = symbols.into_iter()
			.map(ClassName::try_from)
			.collect::<Result<Vec<_>>>()?;
		Ok(ExceptionsAttribute::of(exceptions))
	}
}

impl<'a> ExceptionsAttribute<'a> {
	pub fn exceptions(&self) -> Result<&[ClassName]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_exceptions<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<ClassName>> {
	let mut reader = SliceReader::new(attribute::EXCEPTIONS, bytes);
	let exceptions = reader.read_list(|r| ctx.pool.class(r.read_u16()?))?;
	reader.expect_end()?;
	Ok(exceptions)
}

pub(crate) fn encode_exceptions(attr: &ExceptionsAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let exceptions = attr.exceptions()?;
	sink.put_u16_count(exceptions.len(), "declared exceptions")?;
	for exception in exceptions {
		sink.put_u16(pool.put_class(exception)?);
	}
	Ok(())
}

/// One entry of the `MethodParameters` attribute, see JVMS 4.7.24.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameterInfo {
	/// Absent for a formal parameter with no name.
	pub name: Option<JavaString>,
	pub flags: MethodParameterFlags,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct MethodParameterFlags {
	pub is_final: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl Debug for MethodParameterFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("MethodParameterFlags { ")?;
		if self.is_final     { f.write_str("final ")?; }
		if self.is_synthetic { f.write_str("synthetic ")?; }
		if self.is_mandated  { f.write_str("mandated ")?; }
		f.write_str("}")
	}
}

impl From<u16> for MethodParameterFlags {
	fn from(value: u16) -> Self {
		MethodParameterFlags {
			is_final:     value & 0x0010 != 0,
			is_synthetic: value & 0x1000 != 0,
			is_mandated:  value & 0x8000 != 0,
		}
	}
}

impl From<MethodParameterFlags> for u16 {
	fn from(value: MethodParameterFlags) -> Self {
		(if value.is_final     { 0x0010 } else { 0 }) |
		(if value.is_synthetic { 0x1000 } else { 0 }) |
		(if value.is_mandated  { 0x8000 } else { 0 })
	}
}

/// The `MethodParameters` attribute, see JVMS 4.7.24. Note that its count is a
/// single byte.
pub struct MethodParametersAttribute<'a> {
	payload: Payload<'a, Vec<MethodParameterInfo>>,
}

attribute_payload!(MethodParametersAttribute, Vec<MethodParameterInfo>, decode_method_parameters);

impl MethodParametersAttribute<'static> {
	pub fn of(parameters: Vec<MethodParameterInfo>) -> MethodParametersAttribute<'static> {
		MethodParametersAttribute { payload: Payload::unbound(parameters) }
	}
}

impl<'a> MethodParametersAttribute<'a> {
	pub fn parameters(&self) -> Result<&[MethodParameterInfo]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_method_parameters<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<MethodParameterInfo>> {
	let mut reader = SliceReader::new(attribute::METHOD_PARAMETERS, bytes);
	let count = reader.read_u8()?;
	let mut parameters = Vec::with_capacity(count as usize);
	for _ in 0..count {
		let name_index = reader.read_u16()?;
		let name = if name_index == 0 { None } else { Some(ctx.pool.utf8(name_index)?) };
		let flags = reader.read_u16()?.into();
		parameters.push(MethodParameterInfo { name, flags });
	}
	reader.expect_end()?;
	Ok(parameters)
}

pub(crate) fn encode_method_parameters(attr: &MethodParametersAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let parameters = attr.parameters()?;
	let count = u8::try_from(parameters.len())
		.map_err(|_| crate::error::Error::UnsupportedBuilderOperation(
			format!("{} method parameters don't fit in a one byte count", parameters.len())
		))?;
	sink.put_u8(count);
	for parameter in parameters {
		sink.put_u16(put_optional(pool, parameter.name.as_deref(), |pool, name| pool.put_utf8(name))?);
		sink.put_u16(parameter.flags.into());
	}
	Ok(())
}

/// The `Signature` attribute carrying a generic signature string, see
/// JVMS 4.7.9. The signature grammar is not decoded here.
pub struct SignatureAttribute<'a> {
	payload: Payload<'a, JavaString>,
}

attribute_payload!(SignatureAttribute, JavaString, decode_signature);

impl SignatureAttribute<'static> {
	pub fn of(signature: JavaString) -> SignatureAttribute<'static> {
		SignatureAttribute { payload: Payload::unbound(signature) }
	}
}

impl<'a> SignatureAttribute<'a> {
	pub fn signature(&self) -> Result<&JavaString> {
		self.get()
	}
}

fn decode_signature<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<JavaString> {
	let mut reader = SliceReader::new(attribute::SIGNATURE, bytes);
	let signature = ctx.pool.utf8(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(signature)
}

pub(crate) fn encode_signature(attr: &SignatureAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_utf8(attr.signature()?)?);
	Ok(())
}

/// The `Deprecated` marker attribute, see JVMS 4.7.15. It has no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeprecatedAttribute;

/// The `Synthetic` marker attribute, see JVMS 4.7.8. It has no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntheticAttribute;

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::pool::{PoolEntry, TablePool};
	use super::*;

	#[test]
	fn constant_value_decodes_lazily() {
		// Index 1 is a Class entry, not a loadable constant; the mismatch only
		// surfaces once the value is asked for.
		let pool = TablePool::new(vec![
			PoolEntry::Utf8(JavaString::from("Oops")),
			PoolEntry::Class { name_index: 1 },
		]);
		let ctx = ReadContext::new(&pool);

		let attr = ConstantValueAttribute::bound(&[0x00, 0x02], ctx);
		assert!(attr.value().is_err());
	}

	#[test]
	fn of_symbols_checks_names() {
		assert!(ExceptionsAttribute::of_symbols(["java/io/IOException"]).is_ok());
		assert!(ExceptionsAttribute::of_symbols(["java.io.IOException"]).is_err());
	}

	#[test]
	fn method_parameter_flags_round_trip() {
		let flags = MethodParameterFlags { is_final: true, is_synthetic: false, is_mandated: true };
		assert_eq!(MethodParameterFlags::from(u16::from(flags)), flags);
	}
}
