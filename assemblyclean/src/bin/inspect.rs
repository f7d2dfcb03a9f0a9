//! A small demonstration binary, not a general frontend -- the command-line
//! tool is out of scope for this crate. Builds a toy module by hand, runs the
//! pipeline against a hand-written root set, and prints the resulting summary.

use std::collections::HashSet;

use assemblyclean::model::builder::{add_method, add_void_method, body_with};
use assemblyclean::model::{
	FieldAttributes, FieldDef, Instruction, MethodAttributes, Module, Opcode, Operand, ParamDef, Primitive, TypeAttributes, TypeDef, TypeRef,
};
use assemblyclean::{clean, CleanOptions};

fn build_demo_module() -> Module {
	let mut module = Module::new();

	let helpers = module.add_type(TypeDef::new("Demo", "Helpers", TypeAttributes::PUBLIC));
	let key_field = module.add_field(
		helpers,
		FieldDef::new("k", TypeRef::Primitive(Primitive::ByteArray), FieldAttributes::STATIC).with_initial_value(vec![0x10, 0x20, 0x30]),
	);
	let data_field = module.add_field(
		helpers,
		FieldDef::new("d", TypeRef::Primitive(Primitive::ByteArray), FieldAttributes::STATIC).with_initial_value(vec![0x48, 0x65, 0x41]),
	);

	let decrypt = add_method(
		&mut module,
		helpers,
		"Decrypt",
		TypeRef::Primitive(Primitive::String),
		vec![
			ParamDef { name: "key".to_string(), ty: TypeRef::Primitive(Primitive::ByteArray) },
			ParamDef { name: "data".to_string(), ty: TypeRef::Primitive(Primitive::ByteArray) },
		],
		MethodAttributes::PUBLIC | MethodAttributes::STATIC,
	);
	module.method_def_mut(decrypt).unwrap().body = Some(body_with(vec![
		Instruction::new(Opcode::ldarg_0),
		Instruction::new(Opcode::ldarg_1),
		Instruction::new(Opcode::xor),
		Instruction::new(Opcode::ret),
	]));

	let program = module.add_type(TypeDef::new("Demo", "Program", TypeAttributes::PUBLIC));
	let main = add_void_method(&mut module, program, "Main", MethodAttributes::PUBLIC | MethodAttributes::STATIC);
	let unused = add_void_method(&mut module, program, "NeverCalled", MethodAttributes::PRIVATE);
	module.method_def_mut(unused).unwrap().body = Some(body_with(vec![Instruction::new(Opcode::ret)]));

	let mut setup = Vec::new();
	for (field, len) in [(key_field, 3), (data_field, 3)] {
		setup.push(Instruction::with_operand(Opcode::ldc_i4_s, Operand::Int32(len)));
		setup.push(Instruction::new(Opcode::newarr));
		setup.push(Instruction::new(Opcode::dup));
		setup.push(Instruction::with_operand(Opcode::ldtoken, Operand::Field(assemblyclean::model::FieldRef::Def(field))));
		setup.push(Instruction::with_operand(
			Opcode::call,
			Operand::Method(assemblyclean::model::MethodRef::Unresolved {
				full_name: "System.Runtime.CompilerServices.RuntimeHelpers::InitializeArray(System.Array, System.RuntimeFieldHandle) : void".to_string(),
			}),
		));
	}
	setup.push(Instruction::with_operand(Opcode::call, Operand::Method(assemblyclean::model::MethodRef::Def(decrypt))));
	setup.push(Instruction::new(Opcode::pop));
	setup.push(Instruction::new(Opcode::ret));
	module.method_def_mut(main).unwrap().body = Some(body_with(setup));

	module
}

fn main() {
	#[cfg(feature = "tracing")]
	tracing_subscriber::fmt::init();

	let mut module = build_demo_module();
	let main_full_name = {
		let program = module.type_ids().into_iter().find(|&id| module.type_def(id).unwrap().name == "Program").unwrap();
		let main = module
			.type_def(program)
			.unwrap()
			.methods
			.iter()
			.copied()
			.find(|&id| module.method_def(id).unwrap().name == "Main")
			.unwrap();
		module.method_def(main).unwrap().full_name(&module)
	};

	let roots: HashSet<String> = [main_full_name].into_iter().collect();
	let summary = clean(&mut module, &roots, &CleanOptions::default());
	println!("{summary:#?}");
}
