use syn::{parse::Parse, Ident};

use crate::utils::ItemAttr;

#[derive(Debug, Default)]
pub(crate) struct EncodingFieldAttribute {
    pub ignore: bool,
}

impl Parse for EncodingFieldAttribute {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut slf = Self::default();

        loop {
            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "ignore" => {
                    slf.ignore = true;
                }
                _ => return Err(syn::Error::new_spanned(ident, "Unknown attribute value")),
            }
            if !input.peek(syn::Token![,]) {
                break;
            }
            input.parse::<syn::Token![,]>()?;
        }
        Ok(slf)
    }
}

impl ItemAttr for EncodingFieldAttribute {
    fn combine(&mut self, other: Self) {
        self.ignore |= other.ignore;
    }
}
