//! Attribute kinds this crate has no layout for.
//!
//! The payload is carried byte for byte; a read–write cycle reproduces it
//! exactly. Whether those bytes still mean anything after a transform is what
//! the stability classification answers, and for unknown kinds the answer is
//! "only if nothing changed".

use std::borrow::Cow;
use java_string::{JavaStr, JavaString};
use crate::attr::mapper::{AttributeStability, CustomAttributeMeta};

/// An attribute whose kind isn't in the registry.
#[derive(Debug, Clone)]
pub struct UnknownAttribute<'a> {
	name: JavaString,
	bytes: Cow<'a, [u8]>,
	stability: AttributeStability,
	allow_multiple: bool,
}

impl<'a, 'b> PartialEq<UnknownAttribute<'b>> for UnknownAttribute<'a> {
	fn eq(&self, other: &UnknownAttribute<'b>) -> bool {
		self.name == other.name
			&& self.bytes == other.bytes
			&& self.stability == other.stability
			&& self.allow_multiple == other.allow_multiple
	}
}

impl UnknownAttribute<'static> {
	/// An unknown attribute built from owned bytes, for writing kinds this
	/// crate doesn't model. Classified [`AttributeStability::Unstable`].
	pub fn of(name: JavaString, bytes: Vec<u8>) -> UnknownAttribute<'static> {
		UnknownAttribute {
			name,
			bytes: Cow::Owned(bytes),
			stability: AttributeStability::Unstable,
			allow_multiple: false,
		}
	}
}

impl<'a> UnknownAttribute<'a> {
	/// A view over the read buffer. Metadata comes from the caller's custom
	/// mapper entry when one matches the name, and defaults to the most
	/// pessimistic classification otherwise.
	pub(crate) fn bound(name: JavaString, bytes: &'a [u8], meta: Option<&CustomAttributeMeta>) -> UnknownAttribute<'a> {
		UnknownAttribute {
			name,
			bytes: Cow::Borrowed(bytes),
			stability: meta.map(|meta| meta.stability).unwrap_or(AttributeStability::Unstable),
			allow_multiple: meta.map(|meta| meta.allow_multiple).unwrap_or(false),
		}
	}

	pub fn name(&self) -> &JavaStr {
		&self.name
	}

	/// The payload, wherever it lives.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// The raw payload, as long as this view is still backed by the buffer it
	/// was read from.
	pub fn raw_bytes(&self) -> Option<&'a [u8]> {
		match &self.bytes {
			Cow::Borrowed(bytes) => Some(*bytes),
			Cow::Owned(_) => None,
		}
	}

	pub fn stability(&self) -> AttributeStability {
		self.stability
	}

	pub fn allow_multiple(&self) -> bool {
		self.allow_multiple
	}
}
