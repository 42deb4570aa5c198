use proc_macro::TokenStream as TokenStream1;
use quote::ToTokens;

/// This macro is added before a method of a struct that owns a
/// `composition: Composition` field and returns `Result<_, EngineError>`.
/// Use this macro to first check that the composition still holds enough cards
/// to be sampled meaningfully.
///
/// For example, `#[requires_cards(20)]` will make a method first check if
/// `self.composition` has at least 20 cards. If not, the method will return
/// `EngineError::InsufficientShoe` without doing any work.
#[proc_macro_attribute]
pub fn requires_cards(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast: syn::ImplItemFn = match syn::parse(item) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let minimum = attr.to_string();
    if minimum.trim().is_empty() {
        return syn::Error::new(
            ast.sig.ident.span(),
            "requires_cards needs the minimum number of cards, e.g. #[requires_cards(20)]",
        )
        .to_compile_error()
        .into();
    }

    let code = format!(
        r#"
    if self.composition.get_total() < ({minimum}) as u16 {{
        return Err(crate::EngineError::InsufficientShoe {{
            remaining: self.composition.get_total(),
            required: ({minimum}) as u16,
        }});
    }}
"#
    );
    let early_return: TokenStream1 = match code.parse() {
        Ok(tokens) => tokens,
        Err(err) => {
            return syn::Error::new(ast.sig.ident.span(), err.to_string())
                .to_compile_error()
                .into()
        }
    };
    let early_return: syn::Stmt = match syn::parse(early_return) {
        Ok(stmt) => stmt,
        Err(err) => return err.to_compile_error().into(),
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}
