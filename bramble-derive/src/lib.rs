//! Procedural macro support for Bramble.
//!
//! `#[derive(Generate)]` equips a struct or enum with a `generate()`
//! constructor returning a `Gen<Self>`. Each field is drawn from a stock
//! generator for the well-known primitive types; fields of other types are
//! expected to derive `Generate` themselves and are generated recursively.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, Result, Type};

/// Derive a `generate()` constructor producing a `Gen<Self>`.
///
/// Struct fields are generated pointwise, each from its own seed
/// substream. Enum variants are chosen uniformly via `Gen::one_of`.
/// Field types without a stock generator must provide their own
/// `generate()` (usually by deriving `Generate` as well), and the type
/// must implement `Clone`.
///
/// # Example
///
/// ```rust,ignore
/// use bramble::*;
/// use bramble_derive::Generate;
///
/// #[derive(Generate, Debug, Clone, PartialEq)]
/// struct Ticket {
///     title: String,
///     priority: u32,
///     resolved: bool,
/// }
///
/// let tree = Ticket::generate().generate(Size::new(10), Seed::from_u64(1));
/// ```
#[proc_macro_derive(Generate)]
pub fn derive_generate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let body = match &input.data {
        Data::Struct(data) => constructor_generator(quote!(Self), &data.fields)?,
        Data::Enum(data) => {
            if data.variants.is_empty() {
                return Err(Error::new_spanned(
                    input,
                    "cannot derive Generate for an enum with no variants",
                ));
            }
            let variant_generators = data
                .variants
                .iter()
                .map(|variant| {
                    let ident = &variant.ident;
                    constructor_generator(quote!(Self::#ident), &variant.fields)
                })
                .collect::<Result<Vec<_>>>()?;
            quote! {
                bramble::Gen::one_of(vec![#(#variant_generators),*])
            }
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "cannot derive Generate for a union",
            ));
        }
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            /// A generator producing arbitrary values of this type.
            pub fn generate() -> bramble::Gen<Self> {
                #body
            }
        }
    })
}

/// Build the generator expression for a single constructor: the struct
/// itself, or one enum variant.
///
/// Dunder names keep the generated bindings clear of the user's field
/// names, which bind directly so named constructors can use field
/// shorthand.
fn constructor_generator(ctor: TokenStream2, fields: &Fields) -> Result<TokenStream2> {
    let mut draws = Vec::new();
    let build;

    match fields {
        Fields::Unit => return Ok(quote! { bramble::Gen::constant(#ctor) }),
        Fields::Named(named) if named.named.is_empty() => {
            return Ok(quote! { bramble::Gen::constant(#ctor {}) });
        }
        Fields::Unnamed(unnamed) if unnamed.unnamed.is_empty() => {
            return Ok(quote! { bramble::Gen::constant(#ctor()) });
        }
        Fields::Named(named) => {
            let mut bindings = Vec::new();
            for field in &named.named {
                let ident = field.ident.clone().ok_or_else(|| {
                    Error::new_spanned(field, "expected a named field")
                })?;
                let source = field_generator(&field.ty);
                draws.push(quote! {
                    let #ident = {
                        let (__draw, __rest) = __rng.split();
                        __rng = __rest;
                        (#source).generate(__size, __draw)?.value.clone()
                    };
                });
                bindings.push(ident);
            }
            build = quote! { #ctor { #(#bindings),* } };
        }
        Fields::Unnamed(unnamed) => {
            let slots: Vec<_> = (0..unnamed.unnamed.len())
                .map(|position| format_ident!("__slot{}", position))
                .collect();
            for (slot, field) in slots.iter().zip(&unnamed.unnamed) {
                let source = field_generator(&field.ty);
                draws.push(quote! {
                    let #slot = {
                        let (__draw, __rest) = __rng.split();
                        __rng = __rest;
                        (#source).generate(__size, __draw)?.value.clone()
                    };
                });
            }
            build = quote! { #ctor(#(#slots),*) };
        }
    }

    Ok(quote! {
        bramble::Gen::new(|__size, __seed| {
            let mut __rng = __seed;
            #(#draws)*
            let __value = #build;
            let _ = __rng;
            Ok(bramble::Tree::singleton(__value))
        })
    })
}

/// Pick a stock generator for the well-known field types.
///
/// Numbers default to a small friendly window: `[-100, 100]` for signed
/// and floating types, `[0, 100]` for unsigned ones. Anything not listed
/// falls through to the type's own `generate()`.
fn field_generator(ty: &Type) -> TokenStream2 {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            match segment.ident.to_string().as_str() {
                "bool" => return quote! { bramble::Gen::bool() },
                "char" => return quote! { bramble::Gen::<char>::ascii_alpha() },
                "String" => return quote! { bramble::Gen::<String>::string() },
                "i64" => return quote! { bramble::Gen::int_range(-100, 100) },
                "f64" => return quote! { bramble::Gen::f64_range(-100.0, 100.0) },
                "f32" => {
                    return quote! { bramble::Gen::f64_range(-100.0, 100.0).map(|x| x as f32) };
                }
                "i8" | "i16" | "i32" | "isize" => {
                    return quote! { bramble::Gen::int_range(-100, 100).map(|x| x as #ty) };
                }
                "u8" | "u16" | "u32" | "u64" | "usize" => {
                    return quote! { bramble::Gen::int_range(0, 100).map(|x| x as #ty) };
                }
                _ => {}
            }
        }
    }
    quote! { <#ty>::generate() }
}
