//! C3: the default-value emitter. `spec.md` §4.4 dispatches on the return
//! type's metadata kind; this module is that dispatch table, called by
//! [`crate::codegen::invalidate::invalidate`] after it clears a dead method's body.

use crate::model::{Body, Instruction, Module, Operand, Opcode, Primitive, TypeRef};

fn is_enum(module: &Module, type_ref: &TypeRef) -> bool {
	type_ref.resolve(module).is_some_and(|t| t.is_enum(module))
}

/// Appends the default-value load sequence for `return_type` to `body`, adding
/// a fresh local and setting `init_locals` when the type needs an `initobj`
/// sequence. Emits nothing for `void`. Does **not** append the trailing `ret` —
/// that's `invalidate`'s job, since `void` methods need it too.
pub fn emit_default_value(module: &Module, return_type: &TypeRef, body: &mut Body) {
	use Primitive::*;
	match return_type {
		TypeRef::Primitive(Void) => {}
		TypeRef::Primitive(Bool | Char | Int8 | UInt8 | Int16 | UInt16 | Int32 | UInt32) => {
			body.instructions.push(Instruction::new(Opcode::ldc_i4_0));
		}
		TypeRef::Primitive(Int64 | UInt64) => {
			body.instructions.push(Instruction::with_operand(Opcode::ldc_i8, Operand::Int64(0)));
		}
		TypeRef::Primitive(Float) => {
			body.instructions.push(Instruction::with_operand(Opcode::ldc_r4, Operand::Float32(0.0)));
		}
		TypeRef::Primitive(Double) => {
			body.instructions.push(Instruction::with_operand(Opcode::ldc_r8, Operand::Float64(0.0)));
		}
		TypeRef::Primitive(String | Object | ByteArray) => {
			body.instructions.push(Instruction::new(Opcode::ldnull));
		}
		// `IntPtr`/`UIntPtr` are genuine value types, not reference types -- `spec.md`
		// §4.4 buckets them under "Any other value type" by omission (they're absent
		// from the enumerated primitive list), so they get the same fresh-local
		// `initobj` sequence a user struct gets, never `ldnull`.
		TypeRef::Primitive(IntPtr | UIntPtr) => {
			let local = body.push_new_local(return_type.clone());
			body.init_locals = true;
			body.instructions.push(Instruction::with_operand(Opcode::ldloca_s, Operand::Local(local)));
			body.instructions.push(Instruction::with_operand(Opcode::initobj, Operand::Type(return_type.clone())));
			body.instructions.push(Instruction::with_operand(Opcode::ldloc, Operand::Local(local)));
		}
		_ if is_enum(module, return_type) => {
			body.instructions.push(Instruction::new(Opcode::ldc_i4_0));
		}
		_ if return_type.is_non_enum_value_type(module) => {
			let local = body.push_new_local(return_type.clone());
			body.init_locals = true;
			body.instructions.push(Instruction::with_operand(Opcode::ldloca_s, Operand::Local(local)));
			body.instructions.push(Instruction::with_operand(Opcode::initobj, Operand::Type(return_type.clone())));
			body.instructions.push(Instruction::with_operand(Opcode::ldloc, Operand::Local(local)));
		}
		_ => {
			// Anything else resolves to a reference type (or doesn't resolve at
			// all, in which case treating it as a reference type is the safer
			// default — `ldnull` is valid wherever a non-trivial-value-type
			// sequence would also have been).
			body.instructions.push(Instruction::new(Opcode::ldnull));
		}
	}
}
