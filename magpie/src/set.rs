//! The attribute set an element carries while it is being assembled: the
//! multiplicity and placement rules live here.

use java_string::JavaString;
use crate::attr::encode::{encode_attribute_list, EncodeContext};
use crate::attr::mapper::AttachPoints;
use crate::attr::Attribute;
use crate::error::{Error, Result};

/// The kinds of element an attribute table can hang off.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementKind {
	Class,
	Field,
	Method,
	Code,
	RecordComponent,
}

impl ElementKind {
	fn is_allowed(self, attaches_to: AttachPoints) -> bool {
		match self {
			ElementKind::Class => attaches_to.class,
			ElementKind::Field => attaches_to.field,
			ElementKind::Method => attaches_to.method,
			ElementKind::Code => attaches_to.code,
			ElementKind::RecordComponent => attaches_to.record_component,
		}
	}
}

/// The attributes attached to one element under construction.
///
/// Attachment order is kept; for a kind that doesn't allow multiples, the last
/// value supplied wins and earlier ones are forgotten, while the surviving
/// value moves to the end like any fresh attachment.
#[derive(Debug, PartialEq)]
pub struct AttributeSet<'a> {
	element: ElementKind,
	attributes: Vec<Attribute<'a>>,
}

impl<'a> AttributeSet<'a> {
	pub fn new(element: ElementKind) -> AttributeSet<'a> {
		AttributeSet { element, attributes: Vec::new() }
	}

	pub fn element(&self) -> ElementKind {
		self.element
	}

	/// Attaches an attribute, applying the multiplicity and placement rules.
	///
	/// Two kinds are refused outright: a `CharacterRangeTable` is only ever
	/// produced alongside code assembly, and a `BootstrapMethods` table falls
	/// out of constant pool resolution. Handing either in here is a caller
	/// error.
	pub fn attach(&mut self, attribute: Attribute<'a>) -> Result<()> {
		match &attribute {
			Attribute::CharacterRangeTable(_) => {
				return Err(Error::UnsupportedBuilderOperation(
					"a CharacterRangeTable cannot be supplied directly; character ranges are recorded while code is assembled".to_string()
				));
			},
			Attribute::BootstrapMethods(_) => {
				return Err(Error::UnsupportedBuilderOperation(
					"a BootstrapMethods table cannot be supplied directly; it is generated from the constant pool".to_string()
				));
			},
			_ => {},
		}

		if let Some(mapper) = attribute.mapper() {
			if !self.element.is_allowed(mapper.attaches_to) {
				return Err(Error::UnsupportedBuilderOperation(
					format!("a {} attribute cannot be attached to a {:?} element", mapper.name, self.element)
				));
			}
		}

		if !attribute.allow_multiple() {
			let name: JavaString = attribute.name().to_owned();
			self.attributes.retain(|existing| existing.name() != name.as_java_str());
		}
		self.attributes.push(attribute);
		Ok(())
	}

	/// The attached attributes, in occurrence order.
	pub fn attributes(&self) -> &[Attribute<'a>] {
		&self.attributes
	}

	pub fn len(&self) -> usize {
		self.attributes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.attributes.is_empty()
	}

	/// The first attribute a predicate maps to something for, in occurrence
	/// order.
	pub fn find_map<T>(&self, mut predicate: impl FnMut(&Attribute<'a>) -> Option<T>) -> Option<T> {
		self.attributes.iter().find_map(|attribute| predicate(attribute))
	}

	pub fn into_attributes(self) -> Vec<Attribute<'a>> {
		self.attributes
	}

	/// Writes the whole table, count included.
	pub fn encode(&self, sink: &mut Vec<u8>, ctx: &mut EncodeContext<'_>) -> Result<()> {
		encode_attribute_list(&self.attributes, sink, ctx)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::attr::member::{DeprecatedAttribute, ExceptionsAttribute, SignatureAttribute, SyntheticAttribute};
	use super::*;

	#[test]
	fn last_supplied_value_wins() {
		let mut set = AttributeSet::new(ElementKind::Method);
		let v1 = SignatureAttribute::of(JavaString::from("()V"));
		let v2 = SignatureAttribute::of(JavaString::from("(I)V"));
		let v3 = SignatureAttribute::of(JavaString::from("(J)V"));

		set.attach(Attribute::Signature(v1)).expect("method attribute");
		set.attach(Attribute::Deprecated(DeprecatedAttribute)).expect("method attribute");
		set.attach(Attribute::Signature(v2)).expect("method attribute");
		set.attach(Attribute::Signature(v3)).expect("method attribute");

		let signatures: Vec<_> = set.attributes().iter()
			.filter_map(|attribute| match attribute {
				Attribute::Signature(signature) => Some(signature),
				_ => None,
			})
			.collect();
		assert_eq!(signatures.len(), 1);
		assert_eq!(
			signatures[0].signature().expect("unbound"),
			&JavaString::from("(J)V"),
		);
		assert_eq!(set.len(), 2);
	}

	#[test]
	fn wrong_element_is_refused() {
		let mut set = AttributeSet::new(ElementKind::Field);
		let exceptions = ExceptionsAttribute::of_symbols(["java/io/IOException"]).expect("valid names");
		let error = set.attach(Attribute::Exceptions(exceptions)).expect_err("Exceptions is method-only");
		assert!(matches!(error, Error::UnsupportedBuilderOperation(_)));
	}

	#[test]
	fn markers_attach_to_members() {
		let mut set = AttributeSet::new(ElementKind::Field);
		set.attach(Attribute::Synthetic(SyntheticAttribute)).expect("fields can be synthetic");
		assert_eq!(set.len(), 1);
	}
}
