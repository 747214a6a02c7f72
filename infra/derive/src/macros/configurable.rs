use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::ParseStream;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Token, Type};

struct BoundField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    key: LitStr,
    read_only: bool,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let fields = match bound_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error(),
    };

    let config = config_crate();
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bindings = fields.iter().map(|field| binding_tokens(&config, field));

    quote! {
        #[automatically_derived]
        impl #impl_generics #config::Configurable for #name #ty_generics #where_clause {
            fn bindings() -> ::std::vec::Vec<#config::Binding<Self>> {
                ::std::vec![#(#bindings),*]
            }
        }
    }
}

/// Path to the configuration crate as the deriving crate sees it: `lobby-config` when it is a
/// direct dependency, otherwise the re-export of the `lobby` facade.
fn config_crate() -> TokenStream {
    let renamed = |name: String| {
        let ident = Ident::new(&name, Span::call_site());
        quote! { ::#ident }
    };

    match crate_name("lobby-config") {
        Ok(FoundCrate::Itself) => quote! { ::lobby_config },
        Ok(FoundCrate::Name(name)) => renamed(name),
        Err(_) => match crate_name("lobby") {
            Ok(FoundCrate::Name(name)) => {
                let facade = renamed(name);
                quote! { #facade::config }
            },
            Ok(FoundCrate::Itself) => quote! { crate::config },
            Err(_) => quote! { ::lobby_config },
        },
    }
}

fn binding_tokens(config: &TokenStream, field: &BoundField<'_>) -> TokenStream {
    let BoundField { ident, ty, key, read_only } = field;
    let field_name = LitStr::new(&ident.to_string(), ident.span());

    if *read_only {
        quote! { #config::Binding::read_only::<#ty>(#field_name, #key) }
    } else {
        quote! {
            #config::Binding::new::<#ty>(
                #field_name,
                #key,
                |target: &mut Self, value: #ty| target.#ident = value,
            )
        }
    }
}

fn bound_fields(input: &DeriveInput) -> syn::Result<Vec<BoundField<'_>>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Configurable can only be derived for structs"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Configurable requires a struct with named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let mut markers = field.attrs.iter().filter(|attr| attr.path().is_ident("value"));
        let Some(marker) = markers.next() else { continue };
        if let Some(duplicate) = markers.next() {
            return Err(syn::Error::new_spanned(duplicate, "Duplicate `#[value(...)]` marker"));
        }

        let Some(ident) = field.ident.as_ref() else { continue };
        let (key, read_only) = parse_marker(marker)?;
        fields.push(BoundField { ident, ty: &field.ty, key, read_only });
    }

    Ok(fields)
}

/// Parses `#[value("dotted.key")]` or `#[value("dotted.key", read_only)]`.
fn parse_marker(attr: &Attribute) -> syn::Result<(LitStr, bool)> {
    let (key, read_only) = attr.parse_args_with(|input: ParseStream<'_>| {
        let key: LitStr = input.parse()?;
        let mut read_only = false;

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let option: Ident = input.parse()?;
            if option != "read_only" {
                return Err(syn::Error::new_spanned(option, "Unknown option, expected `read_only`"));
            }
            read_only = true;
        }

        Ok((key, read_only))
    })?;

    let path = key.value();
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(syn::Error::new_spanned(
            &key,
            "Configuration key must be a dot-separated path without empty segments",
        ));
    }

    Ok((key, read_only))
}
