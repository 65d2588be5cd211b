//! Validated newtypes for the symbolic names attributes carry.
//!
//! Attributes never hold constant pool indices; they hold these owned symbolic
//! values instead, so a pool can be renumbered freely on write. The allowed
//! contents follow [JVMS 4.2](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.2)
//! and [JVMS 4.3](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.3).

use std::fmt::{Display, Formatter};
use java_string::{JavaStr, JavaString};
use crate::error::{Error, Result};

macro_rules! make_name_type {
	(
		$( #[$doc:meta] )*
		pub $name:ident;
		is_valid($s:ident) = $check:expr;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub struct $name(JavaString);

		impl $name {
			pub fn as_java_str(&self) -> &JavaStr {
				&self.0
			}

			pub fn into_inner(self) -> JavaString {
				self.0
			}

			/// Checks if a given value may be represented by this type.
			pub fn is_valid($s: &JavaStr) -> bool {
				let result: Result<()> = $check;
				result.is_ok()
			}
		}

		impl TryFrom<JavaString> for $name {
			type Error = Error;

			fn try_from(s: JavaString) -> Result<$name> {
				{
					let $s: &JavaStr = &s;
					let result: Result<()> = $check;
					result?;
				}
				Ok($name(s))
			}
		}

		impl TryFrom<&str> for $name {
			type Error = Error;

			fn try_from(s: &str) -> Result<$name> {
				$name::try_from(JavaString::from(s))
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				self.0.as_str()
					.map_err(|_| std::fmt::Error)
					.and_then(|s| write!(f, "{}", s))
			}
		}
	}
}

fn check_class_name(s: &JavaStr) -> Result<()> {
	let err = |reason| Err(Error::InvalidName { what: "class name", reason });
	if s.is_empty() {
		return err("must not be empty");
	}
	if s.starts_with('[') {
		// Array classes are named by their field descriptor, which we don't
		// re-derive here; the leading `[` is enough to tell them apart.
		return Ok(());
	}
	let mut last_was_slash = true;
	for ch in s.chars() {
		if ch == '.' || ch == ';' || ch == '[' {
			return err("must not contain any of `.`, `;`, `[`");
		}
		if ch == '/' {
			if last_was_slash {
				return err("must consist of `/` separated non-empty parts");
			}
			last_was_slash = true;
		} else {
			last_was_slash = false;
		}
	}
	if last_was_slash {
		return err("must consist of `/` separated non-empty parts");
	}
	Ok(())
}

fn check_unqualified_dotted_name(what: &'static str, s: &JavaStr) -> Result<()> {
	let err = |reason| Err(Error::InvalidName { what, reason });
	if s.is_empty() {
		return err("must not be empty");
	}
	for ch in s.chars() {
		if ch == ';' || ch == '[' || ch == '/' {
			return err("must not contain any of `;`, `[`, `/`");
		}
	}
	Ok(())
}

fn check_package_name(s: &JavaStr) -> Result<()> {
	let err = |reason| Err(Error::InvalidName { what: "package name", reason });
	if s.is_empty() {
		return err("must not be empty");
	}
	for ch in s.chars() {
		if ch == '.' || ch == ';' || ch == '[' {
			return err("must not contain any of `.`, `;`, `[`");
		}
	}
	Ok(())
}

make_name_type!(
	/// A class name in
	/// [internal binary form](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.2.1),
	/// i.e. with the complete package path written out using slashes, like
	/// `java/lang/Thread`. Array classes use their field descriptor, like `[I`.
	pub ClassName;
	is_valid(s) = check_class_name(s);
);

make_name_type!(
	/// The name of a module, in the dotted form of
	/// [JVMS 4.2.3](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.2.3).
	pub ModuleName;
	is_valid(s) = check_unqualified_dotted_name("module name", s);
);

make_name_type!(
	/// The name of a package, in internal form using slashes, like `java/io`.
	pub PackageName;
	is_valid(s) = check_package_name(s);
);

make_name_type!(
	/// A field descriptor like `Ljava/lang/Object;` or `[I`, see
	/// [JVMS 4.3.2](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.3.2).
	///
	/// Only the cheap surface shape is checked here; decoding the component
	/// structure of descriptors is not this crate's job.
	pub FieldDescriptor;
	is_valid(s) = if s.is_empty() {
		Err(Error::InvalidName { what: "field descriptor", reason: "must not be empty" })
	} else {
		Ok(())
	};
);

make_name_type!(
	/// A method descriptor like `(I)V`, see
	/// [JVMS 4.3.3](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.3.3).
	pub MethodDescriptor;
	is_valid(s) = if s.starts_with('(') {
		Ok(())
	} else {
		Err(Error::InvalidName { what: "method descriptor", reason: "must start with `(`" })
	};
);

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn class_names() {
		assert!(ClassName::try_from("java/lang/Thread").is_ok());
		assert!(ClassName::try_from("[Ljava/lang/Object;").is_ok());
		assert!(ClassName::try_from("Simple").is_ok());

		assert!(ClassName::try_from("").is_err());
		assert!(ClassName::try_from("java.lang.Thread").is_err());
		assert!(ClassName::try_from("java//lang").is_err());
		assert!(ClassName::try_from("java/lang/").is_err());
		assert!(ClassName::try_from("/java").is_err());
	}

	#[test]
	fn module_names() {
		assert!(ModuleName::try_from("java.base").is_ok());
		assert!(ModuleName::try_from("java/base").is_err());
	}

	#[test]
	fn descriptors() {
		assert!(FieldDescriptor::try_from("Ljava/io/IOException;").is_ok());
		assert!(MethodDescriptor::try_from("(I)V").is_ok());
		assert!(MethodDescriptor::try_from("I").is_err());
	}

	#[test]
	fn display_uses_source_form() {
		let name = ClassName::try_from("java/io/IOException").expect("valid");
		assert_eq!(name.to_string(), "java/io/IOException");
	}
}
