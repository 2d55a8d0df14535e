use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands the `#[folio_runtime::main]` attribute macro.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            input.sig.fn_token,
            "#[folio_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }
    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.ident,
            "#[folio_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let profile = match profile_expr(args) {
        Ok(profile) => profile,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let runtime = ::folio_runtime::build_runtime(&#profile)?;
            runtime.block_on(async move #block)
        }
    }
}

fn profile_expr(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::folio_runtime::RuntimeProfile::default() });
    }

    let ident: Ident = syn::parse2(args)?;
    match ident.to_string().as_str() {
        "server" => Ok(quote! { ::folio_runtime::RuntimeProfile::server() }),
        "cli" => Ok(quote! { ::folio_runtime::RuntimeProfile::cli() }),
        "default" => Ok(quote! { ::folio_runtime::RuntimeProfile::default() }),
        _ => Err(Error::new_spanned(ident, "unknown runtime profile; use server, cli or default")),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
}
