//! The `BootstrapMethods` attribute, see JVMS 4.7.23.
//!
//! This table is not a regular element attribute: it exists because `Dynamic`
//! and `InvokeDynamic` constant pool entries point into it. There is no `of`
//! constructor; on the write side the table falls out of the bootstrap
//! methods the interning pool builder collected
//! ([`PoolBuilder::put_bootstrap_method`][crate::pool::ConstantPoolBuilder::put_bootstrap_method]),
//! and the attribute set refuses to attach one.

use std::fmt::{Debug, Formatter};
use crate::attr::{Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::attribute;
use crate::error::{Error, Result};
use crate::pool::{ConstantPool, ConstantPoolBuilder, LoadableConstant, MethodHandleEntry};

/// One bootstrap method and its static arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethodInfo {
	pub method: MethodHandleEntry,
	pub arguments: Vec<LoadableConstant>,
}

/// The `BootstrapMethods` attribute.
///
/// The entry count is read from the two byte prefix at construction, so
/// [`len`][BootstrapMethodsAttribute::len] never inflates anything; a writer
/// can emit its length header before the entries are ever looked at.
pub struct BootstrapMethodsAttribute<'a> {
	count: u16,
	payload: Payload<'a, Vec<BootstrapMethodInfo>>,
}

impl<'a> BootstrapMethodsAttribute<'a> {
	pub(crate) fn bound(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<BootstrapMethodsAttribute<'a>> {
		let mut reader = SliceReader::new(attribute::BOOTSTRAP_METHODS, bytes);
		let count = reader.read_u16()?;
		Ok(BootstrapMethodsAttribute {
			count,
			payload: Payload::bound(bytes, ctx),
		})
	}

	pub(crate) fn from_methods(methods: Vec<BootstrapMethodInfo>) -> Result<BootstrapMethodsAttribute<'static>> {
		let count = u16::try_from(methods.len())
			.map_err(|_| Error::UnsupportedBuilderOperation("bootstrap method table grew past 65535 entries".to_string()))?;
		Ok(BootstrapMethodsAttribute {
			count,
			payload: Payload::unbound(methods),
		})
	}

	/// The number of bootstrap methods, without decoding any of them.
	pub fn len(&self) -> u16 {
		self.count
	}

	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	pub fn methods(&self) -> Result<&[BootstrapMethodInfo]> {
		Ok(self.payload.get(decode_bootstrap_methods)?.as_slice())
	}

	/// The raw payload, as long as this view is still backed by the buffer it
	/// was read from.
	pub fn raw_bytes(&self) -> Option<&'a [u8]> {
		self.payload.raw()
	}
}

/// Equality is by decoded content, across lifecycles; a view whose payload
/// doesn't decode compares unequal to everything, itself included.
impl<'a, 'b> PartialEq<BootstrapMethodsAttribute<'b>> for BootstrapMethodsAttribute<'a> {
	fn eq(&self, other: &BootstrapMethodsAttribute<'b>) -> bool {
		match (self.methods(), other.methods()) {
			(Ok(a), Ok(b)) => a == b,
			_ => false,
		}
	}
}

impl<'a> Debug for BootstrapMethodsAttribute<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BootstrapMethodsAttribute")
			.field("count", &self.count)
			.field("methods", &self.payload)
			.finish()
	}
}

fn decode_bootstrap_methods<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<BootstrapMethodInfo>> {
	let mut reader = SliceReader::new(attribute::BOOTSTRAP_METHODS, bytes);
	let methods = reader.read_list(|r| {
		Ok(BootstrapMethodInfo {
			method: ctx.pool.method_handle(r.read_u16()?)?,
			arguments: r.read_list(|r| ctx.pool.loadable(r.read_u16()?))?,
		})
	})?;
	reader.expect_end()?;
	Ok(methods)
}

pub(crate) fn encode_bootstrap_methods(attr: &BootstrapMethodsAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let methods = attr.methods()?;
	sink.put_u16_count(methods.len(), "bootstrap methods")?;
	for method in methods {
		sink.put_u16(pool.put_method_handle(&method.method)?);
		sink.put_u16_count(method.arguments.len(), "bootstrap method arguments")?;
		for argument in &method.arguments {
			sink.put_u16(pool.put_loadable(argument)?);
		}
	}
	Ok(())
}
