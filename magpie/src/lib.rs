//! A model of the attributes of
//! [Java class files](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7).
//!
//! Every attribute kind the class file format defines gets its own type, and
//! each value lives in one of two lifecycles behind the same accessors:
//!
//! - **bound** — a view over the byte buffer a class file was read from,
//!   together with the constant pool and label resolver it was read against.
//!   Payloads decode on first access and the result is cached; reading a
//!   class never pays for attributes nobody looks at.
//! - **unbound** — an owned value built through the `of` constructors (or the
//!   [`ModuleAttributeBuilder`][attr::module::ModuleAttributeBuilder]), for
//!   assembling new or transformed class files.
//!
//! The surrounding class file machinery stays outside: the constant pool is
//! consumed through the [`pool::ConstantPool`] and [`pool::ConstantPoolBuilder`]
//! traits, bytecode positions through [`labels::LabelResolver`]. The bundled
//! [`pool::TablePool`], [`pool::PoolBuilder`] and [`labels::CodeLabels`] are
//! complete implementations of those seams.
//!
//! Reading starts at [`read_attribute_list`]; writing goes through
//! [`attr::encode::encode_attribute_list`] with an
//! [`EncodeContext`][attr::encode::EncodeContext], which reuses raw payload
//! bytes whenever the kind's [stability][attr::mapper::AttributeStability]
//! says the transform kept them meaningful, and re-encodes otherwise.

pub mod attr;
pub mod error;
pub mod labels;
pub mod names;
pub mod pool;
pub mod set;

mod bytes;
mod constants;

pub use crate::attr::{read_attribute_list, Attribute, ReadContext};
pub use crate::error::{Error, Result};
