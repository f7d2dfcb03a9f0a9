//! Small dense arena indices, one newtype per entity kind.
//!
//! Mirrors the `paste!`-generated per-kind token wrapper family in the teacher
//! library's `raw/indices.rs` (`define_metadata_token!`), but indexes owned `Vec`
//! arenas on `Module` rather than rows of a binary metadata table.

use std::fmt::{Debug, Formatter};

macro_rules! define_entity_ids {
	($($name: ident),* $(,)?) => {
		paste::paste! {
			$(
				#[repr(transparent)]
				#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
				pub struct $name(pub(crate) u32);

				impl $name {
					#[inline]
					pub fn index(self) -> usize {
						self.0 as usize
					}
				}

				impl Debug for $name {
					fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
						write!(f, concat!(stringify!($name), "({})"), self.0)
					}
				}

				impl nohash_hasher::IsEnabled for $name {}
			)*
		}
	};
}

define_entity_ids!(TypeId, MethodId, FieldId);

pub type TypeIdMap<V> = nohash_hasher::IntMap<TypeId, V>;
pub type MethodIdMap<V> = nohash_hasher::IntMap<MethodId, V>;
pub type FieldIdMap<V> = nohash_hasher::IntMap<FieldId, V>;
