use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput};

/// Generates `fn mnemonic(&self) -> &'static str`, one arm per variant, deriving
/// the CIL-assembly spelling from the variant's identifier: trailing underscores
/// (used to dodge a Rust reserved word, e.g. `box_`) are trimmed, then every
/// remaining underscore becomes a `.` (`ldc_i4_s` -> `"ldc.i4.s"`).
pub fn derive(tokens: proc_macro::TokenStream) -> TokenStream {
	let DeriveInput { ident, generics, data, .. } = syn::parse(tokens).unwrap();

	let data = match data {
		Data::Enum(data) => data,
		Data::Union(_) => panic!("Unions are not supported"),
		Data::Struct(_) => panic!("Structs are not supported"),
	};

	if !generics.params.is_empty() {
		panic!("Generics are not supported");
	}

	let arms = data.variants.iter().map(|variant| {
		let variant_name = &variant.ident;
		let mnemonic = to_mnemonic(&variant_name.to_string());
		quote! { Self::#variant_name => #mnemonic, }
	});

	quote! {
		impl #ident {
			pub fn mnemonic(&self) -> &'static str {
				match self {
					#(#arms)*
				}
			}
		}
	}
}

fn to_mnemonic(variant: &str) -> String {
	variant.trim_end_matches('_').replace('_', ".")
}
