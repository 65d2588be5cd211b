use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The failure categories of this crate.
///
/// The error type is [`Clone`] on purpose: a lazily decoded attribute caches its
/// decode result in a single-assignment cell, and a cached failure is handed out
/// again by cloning on every later accessor call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// The raw bytes of an attribute don't match the layout its kind requires.
	#[error("malformed {name}: {reason}")]
	MalformedAttribute {
		name: String,
		reason: String,
	},

	/// A constant pool index resolved to an entry of a different kind than the
	/// attribute layout calls for, or the index is out of range.
	#[error("constant pool index {index} should be {expected}, found {found}")]
	ConstantPoolTypeMismatch {
		index: u16,
		expected: &'static str,
		found: String,
	},

	/// A label or bytecode offset doesn't belong to the code unit it was used with.
	#[error("unresolved label: {0}")]
	UnresolvedLabel(String),

	/// The builder was asked to do something the class file format has no
	/// sensible answer for, like attaching an attribute to the wrong kind of
	/// element.
	#[error("unsupported builder operation: {0}")]
	UnsupportedBuilderOperation(String),

	/// Reusing the raw bytes of this attribute across the given transform would
	/// produce garbage, and the attribute cannot be re-encoded either.
	#[error("cannot reuse the raw bytes of the {name} attribute across this transform")]
	UnsafeBulkCopy {
		name: String,
	},

	/// A name or descriptor doesn't follow the format required by the
	/// Java Virtual Machine Specification.
	#[error("invalid {what}: {reason}")]
	InvalidName {
		what: &'static str,
		reason: &'static str,
	},
}

impl Error {
	pub(crate) fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Error {
		Error::MalformedAttribute { name: name.into(), reason: reason.into() }
	}
}
