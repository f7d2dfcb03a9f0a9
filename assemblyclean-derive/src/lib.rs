mod mnemonic;

use proc_macro::TokenStream;

#[proc_macro_derive(Mnemonic)]
pub fn derive_mnemonic(input: TokenStream) -> TokenStream {
	mnemonic::derive(input).into()
}
