//! C4: the body invalidator. `spec.md` §4.4: "returns false if the method has no
//! body or is abstract; otherwise clears instructions, exception handlers, and
//! variables, emits a default-value sequence ..., appends `ret`, and returns true."

use std::collections::HashSet;

use crate::codegen::default_value::emit_default_value;
use crate::model::{Instruction, MethodId, Module, Opcode};

/// Invalidates a single method's body in place. Returns `false` (no-op) for
/// abstract methods and methods with no body to invalidate.
pub fn invalidate(module: &mut Module, method_id: MethodId) -> bool {
	let Some(def) = module.method_def(method_id) else { return false };
	if def.flags.is_abstract() || def.body.is_none() {
		return false;
	}
	let return_type = def.return_type.clone();

	let Some(mut body) = module.method_def_mut(method_id).and_then(|d| d.body.take()) else {
		return false;
	};
	body.instructions.clear();
	body.exception_handlers.clear();
	body.locals.clear();
	body.init_locals = false;

	emit_default_value(module, &return_type, &mut body);
	body.instructions.push(Instruction::new(Opcode::ret));

	module.method_def_mut(method_id).unwrap().body = Some(body);
	true
}

/// `spec.md` §4.4: "applied to every method whose full-name is not in
/// live-methods. Counts successes."
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn invalidate_unused(module: &mut Module, live_methods: &HashSet<String>) -> usize {
	let dead: Vec<MethodId> = module
		.method_ids()
		.into_iter()
		.filter(|&id| {
			module
				.method_def(id)
				.is_some_and(|def| !live_methods.contains(&def.full_name(module)))
		})
		.collect();

	dead.into_iter().filter(|&id| invalidate(module, id)).count()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::builder::*;
	use crate::model::*;

	/// `spec.md` §8 scenario 4: a dead method returning `int` is invalidated to
	/// exactly `[ldc.i4.0, ret]`.
	#[test]
	fn int_return_invalidates_to_two_instructions() {
		let mut module = Module::new();
		let ty = module.add_type(TypeDef::new("", "A", TypeAttributes::PUBLIC));
		let method = add_method(&mut module, ty, "Dead", TypeRef::Primitive(Primitive::Int32), Vec::new(), MethodAttributes::PRIVATE);
		module.method_def_mut(method).unwrap().body = Some(body_with(vec![Instruction::new(Opcode::nop)]));

		assert!(invalidate(&mut module, method));
		let body = module.method_def(method).unwrap().body.as_ref().unwrap();
		assert_eq!(body.instructions, vec![Instruction::new(Opcode::ldc_i4_0), Instruction::new(Opcode::ret)]);
		assert!(body.locals.is_empty());
		assert!(body.exception_handlers.is_empty());
	}

	/// `spec.md` §8 scenario 4: a dead method returning a user struct invalidates
	/// to `[ldloca.s L, initobj S, ldloc L, ret]` with `init-locals=true` and one
	/// new local.
	#[test]
	fn struct_return_invalidates_with_new_local() {
		let mut module = Module::new();
		let s = module.add_type(TypeDef::new("", "S", TypeAttributes::PUBLIC));
		module.type_def_mut(s).unwrap().base_type = Some(TypeRef::unresolved(SYSTEM_VALUE_TYPE));
		let ty = module.add_type(TypeDef::new("", "A", TypeAttributes::PUBLIC));
		let method = add_method(&mut module, ty, "Dead", TypeRef::def(s), Vec::new(), MethodAttributes::PRIVATE);
		module.method_def_mut(method).unwrap().body = Some(body_with(vec![Instruction::new(Opcode::nop)]));

		assert!(invalidate(&mut module, method));
		let body = module.method_def(method).unwrap().body.as_ref().unwrap();
		assert!(body.init_locals);
		assert_eq!(body.locals.len(), 1);
		assert_eq!(
			body.instructions,
			vec![
				Instruction::with_operand(Opcode::ldloca_s, Operand::Local(0)),
				Instruction::with_operand(Opcode::initobj, Operand::Type(TypeRef::def(s))),
				Instruction::with_operand(Opcode::ldloc, Operand::Local(0)),
				Instruction::new(Opcode::ret),
			]
		);
	}

	#[test]
	fn abstract_method_is_left_alone() {
		let mut module = Module::new();
		let ty = module.add_type(TypeDef::new("", "A", TypeAttributes::PUBLIC));
		let method = add_method(&mut module, ty, "Dead", TypeRef::Primitive(Primitive::Void), Vec::new(), MethodAttributes::ABSTRACT);
		module.method_def_mut(method).unwrap().body = Some(body_with(vec![Instruction::new(Opcode::nop)]));

		assert!(!invalidate(&mut module, method));
	}

	#[test]
	fn method_with_no_body_is_left_alone() {
		let mut module = Module::new();
		let ty = module.add_type(TypeDef::new("", "A", TypeAttributes::PUBLIC));
		let method = add_method(&mut module, ty, "Extern", TypeRef::Primitive(Primitive::Void), Vec::new(), MethodAttributes::PRIVATE);

		assert!(!invalidate(&mut module, method));
	}
}
