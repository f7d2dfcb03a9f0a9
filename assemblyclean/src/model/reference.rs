//! Possibly-unresolved pointers to entities, possibly in another module.
//!
//! Grounded on the teacher library's `TypeDefOrRef`/`MemberRefParent` coded indices
//! (`raw/indices.rs`) — the idea that a reference is either "a row in this module's
//! tables" or "a name to be resolved against something else" carries over directly;
//! the coded-index *encoding* does not, since that's metadata-table plumbing owned by
//! the external assembly-I/O library (`spec.md` §1).

use std::fmt::{Display, Formatter};

use crate::model::ids::{FieldId, MethodId, TypeId};
use crate::model::{FieldDef, MethodDef, Module, TypeDef};

/// Which kind of declaration a [`GenericParam`] placeholder belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GenericParamOwner {
	Type,
	Method,
}

/// The built-in element types the default-value emitter (`spec.md` §4.4) and the
/// decryption-helper signature test (`spec.md` §4.3.1, "returns `System.String`...
/// two parameters, each of type `System.Byte[]`") both need to recognize without a
/// module lookup. Grounded on the teacher library's `structured/types.rs` `Primitive`
/// enum (same variant set, same `Display` strings).
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
	#[default]
	Void,
	Bool,
	Char,
	Int8,
	UInt8,
	Int16,
	UInt16,
	Int32,
	UInt32,
	Int64,
	UInt64,
	Float,
	Double,
	String,
	IntPtr,
	UIntPtr,
	Object,
	/// Single-dimensional array of `Byte` — the parameter type both decryption-helper
	/// arguments must have.
	ByteArray,
}

impl Display for Primitive {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Primitive::Void => write!(f, "void"),
			Primitive::Bool => write!(f, "bool"),
			Primitive::Char => write!(f, "char"),
			Primitive::Int8 => write!(f, "sbyte"),
			Primitive::UInt8 => write!(f, "byte"),
			Primitive::Int16 => write!(f, "short"),
			Primitive::UInt16 => write!(f, "ushort"),
			Primitive::Int32 => write!(f, "int"),
			Primitive::UInt32 => write!(f, "uint"),
			Primitive::Int64 => write!(f, "long"),
			Primitive::UInt64 => write!(f, "ulong"),
			Primitive::Float => write!(f, "float"),
			Primitive::Double => write!(f, "double"),
			Primitive::String => write!(f, "string"),
			Primitive::IntPtr => write!(f, "System.IntPtr"),
			Primitive::UIntPtr => write!(f, "System.UIntPtr"),
			Primitive::Object => write!(f, "object"),
			Primitive::ByteArray => write!(f, "byte[]"),
		}
	}
}

/// A generic parameter *placeholder* (`!0`, `!!1`, ...), as opposed to a generic
/// *instance* (`List<int>`). `spec.md` §4.1 requires telling these apart: marking a
/// reference to a parameter is a no-op, marking an instance recurses into its parts.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GenericParam {
	pub index: u32,
	pub owner: GenericParamOwner,
	pub constraints: Vec<TypeRefId>,
}

/// Stable small-integer form of a [`TypeRef`], used where a constraint list or a
/// generic-instance argument list needs to own references without the recursive
/// `Box` indirection `TypeRef` itself would require for self-containment.
pub type TypeRefId = Box<TypeRef>;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum TypeRef {
	/// A type defined in this module.
	Def(TypeId),
	/// A built-in element type. Never itself added to a live-types set — primitives
	/// have no `TypeDef` row to mark live or dead — but still a first-class
	/// `TypeRef` so field/parameter/return types don't need an `Option` layer on
	/// top of this enum just to say "it's `int`".
	Primitive(Primitive),
	/// A reference this module cannot (or does not yet) resolve to a local
	/// definition — typically a type in another module, named by its full name.
	Unresolved { full_name: String },
	/// A constructed generic type, e.g. `Container<Foo, Bar>`. Per `spec.md` §4.1,
	/// marking this reference means marking `element` and every entry of
	/// `arguments`, never the instance "as a whole".
	GenericInstance {
		element: Box<TypeRef>,
		arguments: Vec<TypeRef>,
	},
	/// A reference to an *unbound* generic parameter of the enclosing type or
	/// method (`!0`, `!!0`). Marking this is a no-op (`spec.md` §4.1).
	GenericParam { index: u32, owner: GenericParamOwner },
}

impl TypeRef {
	#[inline]
	pub fn def(id: TypeId) -> Self {
		TypeRef::Def(id)
	}

	pub fn unresolved(full_name: impl Into<String>) -> Self {
		TypeRef::Unresolved { full_name: full_name.into() }
	}

	/// Resolves this reference to a local definition. Returns `None` for anything
	/// that isn't a same-module [`TypeRef::Def`] — per `spec.md` §3, resolution
	/// "may fail", and a failure here is ordinary data, never an error.
	pub fn resolve<'m>(&self, module: &'m Module) -> Option<&'m TypeDef> {
		match self {
			TypeRef::Def(id) => module.type_defs.get(id.index()),
			_ => None,
		}
	}

	/// The full-name identity key `spec.md` requires live-sets to be keyed on. For
	/// an unresolved reference this is the name it was recorded with; for a
	/// generic instance it is the *element's* full name (`mark` is what fans the
	/// instance out into its component keys — this accessor only names the
	/// instance itself, for display).
	pub fn full_name(&self, module: &Module) -> String {
		match self {
			TypeRef::Def(id) => module
				.type_defs
				.get(id.index())
				.map(|t| t.full_name(module))
				.unwrap_or_default(),
			TypeRef::Unresolved { full_name } => full_name.clone(),
			TypeRef::GenericInstance { element, .. } => element.full_name(module),
			TypeRef::GenericParam { index, owner } => match owner {
				GenericParamOwner::Type => format!("!{index}"),
				GenericParamOwner::Method => format!("!!{index}"),
			},
			TypeRef::Primitive(p) => p.to_string(),
		}
	}

	/// `true` if this reference names a value type other than an enum -- the one
	/// case the default-value emitter (`spec.md` section 4.4) can't special-case by
	/// matching a primitive or `ldc.i4.0`-for-enum and must instead synthesize a
	/// fresh local and `initobj`.
	pub fn is_non_enum_value_type(&self, module: &Module) -> bool {
		match self {
			TypeRef::Def(_) => self
				.resolve(module)
				.is_some_and(|t| t.is_value_type(module) && !t.is_enum(module)),
			_ => false,
		}
	}
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum MethodRef {
	Def(MethodId),
	Unresolved { full_name: String },
}

impl MethodRef {
	pub fn resolve<'m>(&self, module: &'m Module) -> Option<&'m MethodDef> {
		match self {
			MethodRef::Def(id) => module.method_defs.get(id.index()),
			_ => None,
		}
	}

	pub fn full_name(&self, module: &Module) -> String {
		match self {
			MethodRef::Def(id) => module
				.method_defs
				.get(id.index())
				.map(|m| m.full_name(module))
				.unwrap_or_default(),
			MethodRef::Unresolved { full_name } => full_name.clone(),
		}
	}
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum FieldRef {
	Def(FieldId),
	Unresolved { full_name: String, field_type: Box<TypeRef> },
}

impl FieldRef {
	pub fn resolve<'m>(&self, module: &'m Module) -> Option<&'m FieldDef> {
		match self {
			FieldRef::Def(id) => module.field_defs.get(id.index()),
			_ => None,
		}
	}

	/// The type of the field this reference names — §4.2 marks *only* this, never
	/// the field reference itself ("the field itself is not tracked separately").
	pub fn field_type<'m>(&'m self, module: &'m Module) -> Option<&'m TypeRef> {
		match self {
			FieldRef::Def(id) => module.field_defs.get(id.index()).map(|f| &f.ty),
			FieldRef::Unresolved { field_type, .. } => Some(field_type),
		}
	}
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct CustomAttribute {
	pub attribute_type: TypeRef,
}

impl Display for GenericParamOwner {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			GenericParamOwner::Type => write!(f, "type"),
			GenericParamOwner::Method => write!(f, "method"),
		}
	}
}
