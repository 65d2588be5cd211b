//! The `Code` attribute, see JVMS 4.7.3.
//!
//! The instruction stream itself is opaque here; decoding bytecode is the job
//! of whoever owns the label resolver. What this type models is the frame
//! sizes, the exception handler table, and the nested attribute table, each
//! decoded independently and on demand.

use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;
use crate::attr::{read_attributes_from, require_labels, Attribute, ReadContext};
use crate::bytes::SliceReader;
use crate::constants::attribute;
use crate::error::{Error, Result};
use crate::labels::Label;
use crate::names::ClassName;
use crate::pool::optional;

/// One exception handler of a `Code` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandlerInfo {
	/// Start of the protected range, inclusive.
	pub start: Label,
	/// End of the protected range, exclusive.
	pub end: Label,
	pub handler: Label,
	/// `None` catches every throwable, as compiled for `finally`.
	pub catch_type: Option<ClassName>,
}

enum CodeInner<'a> {
	Bound {
		ctx: ReadContext<'a>,
		bytes: &'a [u8],
		max_stack: u16,
		max_locals: u16,
		code: &'a [u8],
		/// Payload offset of `exception_table_length`.
		exception_table_offset: usize,
		exception_table: OnceLock<Result<Vec<ExceptionHandlerInfo>>>,
		/// Payload offset of the nested `attributes_count`.
		attributes_offset: usize,
		attributes: OnceLock<Result<Vec<Attribute<'a>>>>,
	},
	Unbound {
		max_stack: u16,
		max_locals: u16,
		code: Vec<u8>,
		exception_table: Vec<ExceptionHandlerInfo>,
		attributes: Vec<Attribute<'a>>,
	},
}

/// The `Code` attribute. The structural offsets are picked up at construction
/// time in O(1); the exception table and the nested attributes are decoded on
/// first access, independently of each other.
pub struct CodeAttribute<'a> {
	inner: CodeInner<'a>,
}

impl<'a> CodeAttribute<'a> {
	pub fn of(
		max_stack: u16,
		max_locals: u16,
		code: Vec<u8>,
		exception_table: Vec<ExceptionHandlerInfo>,
		attributes: Vec<Attribute<'a>>,
	) -> CodeAttribute<'a> {
		CodeAttribute {
			inner: CodeInner::Unbound { max_stack, max_locals, code, exception_table, attributes },
		}
	}

	/// Records the payload layout without decoding anything variable-sized:
	/// the code slice and both table offsets fall out of the length headers.
	pub(crate) fn bound(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<CodeAttribute<'a>> {
		let mut reader = SliceReader::new(attribute::CODE, bytes);
		let max_stack = reader.read_u16()?;
		let max_locals = reader.read_u16()?;
		let code_length = reader.read_u32()? as usize;
		let code = reader.read_slice(code_length)?;

		let exception_table_offset = reader.position();
		let handler_count = reader.read_u16()? as usize;
		reader.read_slice(handler_count.checked_mul(8)
			.ok_or_else(|| Error::malformed(attribute::CODE, "exception table length overflows"))?)?;
		let attributes_offset = reader.position();

		Ok(CodeAttribute {
			inner: CodeInner::Bound {
				ctx,
				bytes,
				max_stack,
				max_locals,
				code,
				exception_table_offset,
				exception_table: OnceLock::new(),
				attributes_offset,
				attributes: OnceLock::new(),
			},
		})
	}

	pub fn max_stack(&self) -> u16 {
		match &self.inner {
			CodeInner::Bound { max_stack, .. } => *max_stack,
			CodeInner::Unbound { max_stack, .. } => *max_stack,
		}
	}

	pub fn max_locals(&self) -> u16 {
		match &self.inner {
			CodeInner::Bound { max_locals, .. } => *max_locals,
			CodeInner::Unbound { max_locals, .. } => *max_locals,
		}
	}

	/// The raw bytecode array.
	pub fn code(&self) -> &[u8] {
		match &self.inner {
			CodeInner::Bound { code, .. } => code,
			CodeInner::Unbound { code, .. } => code,
		}
	}

	pub fn exception_table(&self) -> Result<&[ExceptionHandlerInfo]> {
		match &self.inner {
			CodeInner::Unbound { exception_table, .. } => Ok(exception_table),
			CodeInner::Bound { ctx, bytes, exception_table_offset, exception_table, .. } => {
				let bytes: &'a [u8] = *bytes;
				let result = exception_table.get_or_init(|| decode_exception_table(&bytes[*exception_table_offset..], *ctx));
				match result {
					Ok(handlers) => Ok(handlers),
					Err(error) => Err(error.clone()),
				}
			},
		}
	}

	/// The attribute table nested inside the `Code` payload. Each entry in it
	/// stays lazy on its own.
	pub fn attributes(&self) -> Result<&[Attribute<'a>]> {
		match &self.inner {
			CodeInner::Unbound { attributes, .. } => Ok(attributes),
			CodeInner::Bound { ctx, bytes, attributes_offset, attributes, .. } => {
				let bytes: &'a [u8] = *bytes;
				let result = attributes.get_or_init(|| {
					let mut reader = SliceReader::new(attribute::CODE, &bytes[*attributes_offset..]);
					let attributes = read_attributes_from(&mut reader, *ctx)?;
					reader.expect_end()?;
					Ok(attributes)
				});
				match result {
					Ok(attributes) => Ok(attributes),
					Err(error) => Err(error.clone()),
				}
			},
		}
	}

	/// The raw payload, as long as this view is still backed by the buffer it
	/// was read from.
	pub fn raw_bytes(&self) -> Option<&'a [u8]> {
		match &self.inner {
			CodeInner::Bound { bytes, .. } => Some(*bytes),
			CodeInner::Unbound { .. } => None,
		}
	}
}

fn decode_exception_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<ExceptionHandlerInfo>> {
	let labels = require_labels(ctx, attribute::CODE)?;
	let mut reader = SliceReader::new(attribute::CODE, bytes);
	reader.read_list(|r| {
		Ok(ExceptionHandlerInfo {
			start: labels.label_at(r.read_u16()?)?,
			end: labels.label_at(r.read_u16()?)?,
			handler: labels.label_at(r.read_u16()?)?,
			catch_type: optional(ctx.pool, r.read_u16()?, |p, i| p.class(i))?,
		})
	})
}

/// Equality is by decoded content, across lifecycles; a view whose tables
/// don't decode compares unequal to everything, itself included.
impl<'a, 'b> PartialEq<CodeAttribute<'b>> for CodeAttribute<'a> {
	fn eq(&self, other: &CodeAttribute<'b>) -> bool {
		self.max_stack() == other.max_stack()
			&& self.max_locals() == other.max_locals()
			&& self.code() == other.code()
			&& matches!((self.exception_table(), other.exception_table()), (Ok(a), Ok(b)) if a == b)
			&& matches!((self.attributes(), other.attributes()), (Ok(a), Ok(b)) if a == b)
	}
}

impl<'a> Debug for CodeAttribute<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("CodeAttribute");
		s.field("max_stack", &self.max_stack());
		s.field("max_locals", &self.max_locals());
		s.field("code_length", &self.code().len());
		match &self.inner {
			CodeInner::Unbound { exception_table, attributes, .. } => {
				s.field("exception_table", exception_table);
				s.field("attributes", attributes);
			},
			CodeInner::Bound { exception_table, attributes, .. } => {
				match exception_table.get() {
					Some(decoded) => s.field("exception_table", decoded),
					None => s.field("exception_table", &"<not yet decoded>"),
				};
				match attributes.get() {
					Some(decoded) => s.field("attributes", decoded),
					None => s.field("attributes", &"<not yet decoded>"),
				};
			},
		}
		s.finish()
	}
}
