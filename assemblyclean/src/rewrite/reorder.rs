//! C7's reorder half. `spec.md` §4.5: "per type with more than one method,
//! partition in a stable pass into two lists (live first, dead after) and
//! rewrite the type's method list only when both partitions are non-empty."

use std::collections::HashSet;

use crate::model::Module;

#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn reorder(module: &mut Module, live_methods: &HashSet<String>) {
	for type_id in module.type_ids() {
		let Some(methods) = module.type_def(type_id).map(|t| t.methods.clone()) else { continue };
		if methods.len() <= 1 {
			continue;
		}

		let mut live = Vec::with_capacity(methods.len());
		let mut dead = Vec::new();
		for method_id in methods {
			let is_live = module.method_def(method_id).is_some_and(|m| live_methods.contains(&m.full_name(module)));
			if is_live {
				live.push(method_id);
			} else {
				dead.push(method_id);
			}
		}

		if live.is_empty() || dead.is_empty() {
			continue;
		}
		live.extend(dead);
		module.type_def_mut(type_id).unwrap().methods = live;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::builder::*;
	use crate::model::*;

	/// `spec.md` §8 scenario 6: `[d1, L1, d2, L2, d3]` becomes `[L1, L2, d1, d2, d3]`.
	#[test]
	fn reorder_is_stable_live_first() {
		let mut module = Module::new();
		let ty = module.add_type(TypeDef::new("", "A", TypeAttributes::PUBLIC));
		let d1 = add_void_method(&mut module, ty, "d1", MethodAttributes::PRIVATE);
		let l1 = add_void_method(&mut module, ty, "L1", MethodAttributes::PRIVATE);
		let d2 = add_void_method(&mut module, ty, "d2", MethodAttributes::PRIVATE);
		let l2 = add_void_method(&mut module, ty, "L2", MethodAttributes::PRIVATE);
		let d3 = add_void_method(&mut module, ty, "d3", MethodAttributes::PRIVATE);

		let live_methods: HashSet<String> =
			[module.method_def(l1).unwrap().full_name(&module), module.method_def(l2).unwrap().full_name(&module)].into_iter().collect();

		reorder(&mut module, &live_methods);

		assert_eq!(module.type_def(ty).unwrap().methods, vec![l1, l2, d1, d2, d3]);
	}

	#[test]
	fn all_live_or_all_dead_leaves_order_untouched() {
		let mut module = Module::new();
		let ty = module.add_type(TypeDef::new("", "A", TypeAttributes::PUBLIC));
		let m1 = add_void_method(&mut module, ty, "m1", MethodAttributes::PRIVATE);
		let m2 = add_void_method(&mut module, ty, "m2", MethodAttributes::PRIVATE);

		reorder(&mut module, &HashSet::new());

		assert_eq!(module.type_def(ty).unwrap().methods, vec![m1, m2]);
	}
}
