//! The in-memory assembly object model the rest of the crate operates on.
//!
//! `spec.md` §1 assumes "an assembly object model ... already parsed and held in
//! memory"; the external library that would own that model (reading/writing PE
//! files, metadata tables, heaps) is out of scope here, so this module stands in
//! for it with the minimal owned, mutable graph the pipeline's later phases need:
//! types nest, types own methods and fields, methods own bodies, bodies own
//! instructions, and every reference between them can be resolved or, failing
//! that, fall back to a recorded full name.

mod body;
pub mod builder;
mod field;
mod flags;
mod ids;
mod method;
mod module;
mod reference;
mod ty;

pub use body::{Body, ExceptionHandler, Instruction, LocalVar, Opcode, Operand};
pub use field::{EventDef, FieldDef, PropertyDef};
pub use flags::{FieldAttributes, MethodAttributes, TypeAttributes};
pub use ids::{FieldId, FieldIdMap, MethodId, MethodIdMap, TypeId, TypeIdMap};
pub use method::{MethodDef, ParamDef};
pub use module::Module;
pub use reference::{CustomAttribute, FieldRef, GenericParam, GenericParamOwner, MethodRef, Primitive, TypeRef, TypeRefId};
pub use ty::{TypeDef, SYSTEM_ENUM, SYSTEM_VALUE_TYPE};

/// Full name of the attribute the obfuscator (and the compiler before it) stamps
/// on generated types — part of the "always live" disjunction's negative half
/// (`spec.md` §4.2 step 3: "public ... AND not compiler-generated").
pub const COMPILER_GENERATED_ATTRIBUTE: &str = "System.Runtime.CompilerServices.CompilerGeneratedAttribute";
