//! Small helpers for constructing an in-memory [`Module`] by hand — used by the
//! test suites across the crate and by `src/bin/inspect.rs`'s demo assembly.
//! Not part of the object model proper; nothing outside tests and the demo
//! binary depends on this module.

use crate::model::{Body, ExceptionHandler, Instruction, LocalVar, MethodAttributes, MethodDef, MethodId, Module, ParamDef, TypeId, TypeRef};

/// A body with no locals, no exception handlers and `init_locals` unset — the
/// common case for hand-written test fixtures.
pub fn body_with(instructions: Vec<Instruction>) -> Body {
	Body { instructions, locals: Vec::new(), exception_handlers: Vec::new(), init_locals: false }
}

pub fn body_with_locals(instructions: Vec<Instruction>, locals: Vec<LocalVar>, init_locals: bool) -> Body {
	Body { instructions, locals, exception_handlers: Vec::new(), init_locals }
}

#[allow(dead_code)]
pub fn body_with_handlers(instructions: Vec<Instruction>, exception_handlers: Vec<ExceptionHandler>) -> Body {
	Body { instructions, locals: Vec::new(), exception_handlers, init_locals: false }
}

/// Adds a parameterless, `void`-returning method with no body yet attached.
pub fn add_void_method(module: &mut Module, owner: TypeId, name: impl Into<String>, flags: MethodAttributes) -> MethodId {
	module.add_method(
		owner,
		MethodDef {
			declaring_type: owner,
			name: name.into(),
			return_type: TypeRef::Primitive(crate::model::Primitive::Void),
			params: Vec::new(),
			generic_params: Vec::new(),
			flags,
			body: None,
		},
	)
}

/// Adds a method with an explicit return type and parameter list, no body yet
/// attached.
pub fn add_method(
	module: &mut Module,
	owner: TypeId,
	name: impl Into<String>,
	return_type: TypeRef,
	params: Vec<ParamDef>,
	flags: MethodAttributes,
) -> MethodId {
	module.add_method(
		owner,
		MethodDef {
			declaring_type: owner,
			name: name.into(),
			return_type,
			params,
			generic_params: Vec::new(),
			flags,
			body: None,
		},
	)
}
