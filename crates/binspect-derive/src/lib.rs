// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, Fields, Generics, LitInt,
    LitStr, Type,
};

/// Type-level `#[inspect(...)]` options
#[derive(Default)]
struct TypeAttrs {
    name: Option<String>,
    type_id: Option<LitInt>,
    on_save: Option<Expr>,
    on_load: Option<Expr>,
}

/// Field-level `#[inspect(...)]` options
#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    fallback: Option<Expr>,
    invariant: Option<Expr>,
    sync: Option<Expr>,
    skip: bool,
}

fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("inspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("type_id") {
                out.type_id = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("on_save") {
                out.on_save = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("on_load") {
                out.on_load = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("expected `name`, `type_id`, `on_save` or `on_load`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("inspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("fallback") {
                out.fallback = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("invariant") {
                out.invariant = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("sync") {
                out.sync = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else {
                return Err(meta.error(
                    "expected `rename`, `fallback`, `invariant`, `sync` or `skip`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Add `Save + Load + Default` bounds to every type parameter
fn add_codec_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::binspect::Save));
        param.bounds.push(parse_quote!(::binspect::Load));
        param.bounds.push(parse_quote!(::core::default::Default));
    }
    generics
}

/// `HasTypeId` impl when `#[inspect(type_id = N)]` is present
fn type_id_impl(
    ident: &syn::Ident,
    generics: &Generics,
    attrs: &TypeAttrs,
    type_name: &str,
) -> (TokenStream2, TokenStream2) {
    let Some(type_id) = &attrs.type_id else {
        return (quote! {}, quote! {});
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let has_type_id = quote! {
        impl #impl_generics ::binspect::HasTypeId for #ident #ty_generics #where_clause {
            const TYPE_ID: ::binspect::TypeId = #type_id;
            const TYPE_NAME: &'static str = #type_name;
        }
    };
    let const_item = quote! {
        const TYPE_ID: ::binspect::TypeId = #type_id;
    };
    (has_type_id, const_item)
}

/// `#[derive(Inspect)]`: plain object with named fields
///
/// Generates `Inspect`, `Categorized` (`PlainObject`), `Save` and `Load`,
/// plus `HasTypeId` when a `type_id` is given. Fields are visited in
/// declaration order.
///
/// Type attributes: `name = "..."`, `type_id = N`, `on_save = path`,
/// `on_load = path` (callbacks return `()`, `bool` or `binspect::Result<()>`).
///
/// Field attributes: `rename = "..."`, `fallback = expr`, `invariant = path`,
/// `sync = path`, `skip`.
///
/// Example:
/// ```ignore
/// use binspect::Inspect;
///
/// #[derive(Default, Inspect)]
/// #[inspect(name = "sensor", type_id = 210)]
/// struct Sensor {
///     id: u32,
///     #[inspect(fallback = 1.0, invariant = is_finite)]
///     scale: f64,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_inspect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_inspect(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let type_attrs = parse_type_attrs(&input.attrs)?;
    let type_name = type_attrs.name.clone().unwrap_or_else(|| ident.to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => f.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Inspect requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Inspect can only be derived for structs; use Variant for enums",
            ))
        }
    };

    let mut visits = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(member) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let wire_name = attrs.rename.unwrap_or_else(|| member.to_string());
        let ty = &field.ty;

        let mut descriptor = quote! {
            ::binspect::Field::<Self, #ty>::new(
                #wire_name,
                |__obj| &__obj.#member,
                |__obj| &mut __obj.#member,
            )
        };
        if let Some(fallback) = &attrs.fallback {
            descriptor = quote! { #descriptor.with_fallback(#fallback) };
        }
        if let Some(invariant) = &attrs.invariant {
            descriptor = quote! { #descriptor.with_invariant(#invariant) };
        }
        if let Some(sync) = &attrs.sync {
            descriptor = quote! { #descriptor.with_sync(#sync) };
        }
        visits.push(quote! { __visitor.field(#descriptor)?; });
    }

    let on_save = type_attrs.on_save.as_ref().map(|callback| {
        quote! {
            fn on_save(&self) -> ::binspect::Result<()> {
                ::binspect::SetterOutcome::into_result(
                    (#callback)(self),
                    ::binspect::ErrorCode::SaveCallbackFailed,
                    #type_name,
                )
            }
        }
    });
    let on_load = type_attrs.on_load.as_ref().map(|callback| {
        quote! {
            fn on_load(&mut self) -> ::binspect::Result<()> {
                ::binspect::SetterOutcome::into_result(
                    (#callback)(self),
                    ::binspect::ErrorCode::LoadCallbackFailed,
                    #type_name,
                )
            }
        }
    });

    let generics = add_codec_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let (has_type_id, type_id_const) = type_id_impl(ident, &generics, &type_attrs, &type_name);

    Ok(quote! {
        impl #impl_generics ::binspect::Inspect for #ident #ty_generics #where_clause {
            const NAME: &'static str = #type_name;
            #type_id_const

            #[allow(unused_variables)]
            fn fields<__V: ::binspect::FieldVisitor<Self>>(
                __visitor: &mut __V,
            ) -> ::binspect::Result<()> {
                #(#visits)*
                Ok(())
            }

            #on_save
            #on_load
        }

        impl #impl_generics ::binspect::Categorized for #ident #ty_generics #where_clause {
            const CATEGORY: ::binspect::Category = ::binspect::Category::PlainObject;
        }

        impl #impl_generics ::binspect::Save for #ident #ty_generics #where_clause {
            fn save<__S: ::binspect::Serializer + ?Sized>(
                &self,
                f: &mut __S,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::object::save_object(self, f)
            }
        }

        impl #impl_generics ::binspect::Load for #ident #ty_generics #where_clause {
            fn load<__D: ::binspect::Deserializer + ?Sized>(
                &mut self,
                f: &mut __D,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::object::load_object(self, f)
            }
        }

        #has_type_id
    })
}

/// `#[derive(Variant)]`: closed set of alternatives
///
/// Every variant must be a single-field tuple variant whose type implements
/// `HasTypeId`, `Save`, `Load` and `Default`; alternative types must be
/// distinct. Generates `VariantAccess`, `Categorized` (`Variant`), `Save`,
/// `Load` and `Default` (the first alternative, default-constructed).
///
/// Example:
/// ```ignore
/// use binspect::Variant;
///
/// #[derive(Variant)]
/// #[inspect(name = "value")]
/// enum Value {
///     Int(i64),
///     Text(String),
/// }
/// ```
#[proc_macro_derive(Variant, attributes(inspect))]
pub fn derive_variant(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_variant(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_variant(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let type_attrs = parse_type_attrs(&input.attrs)?;
    let type_name = type_attrs.name.clone().unwrap_or_else(|| ident.to_string());

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Variant can only be derived for enums; use Inspect for structs",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Variant requires at least one alternative",
        ));
    }

    let mut alternatives: Vec<(&syn::Ident, &Type)> = Vec::new();
    for variant in &data.variants {
        match &variant.fields {
            Fields::Unnamed(f) if f.unnamed.len() == 1 => {
                alternatives.push((&variant.ident, &f.unnamed[0].ty));
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Variant alternatives must be single-field tuple variants",
                ))
            }
        }
    }

    let allowed: Vec<_> = alternatives
        .iter()
        .map(|(_, ty)| quote! { <#ty as ::binspect::HasTypeId>::TYPE_ID })
        .collect();
    let index_arms: Vec<_> = alternatives
        .iter()
        .enumerate()
        .map(|(index, (name, _))| quote! { Self::#name(_) => #index, })
        .collect();
    let save_arms: Vec<_> = alternatives
        .iter()
        .map(|(name, _)| {
            quote! {
                Self::#name(__value) => ::binspect::inspect::variant::save_alternative(__value, f),
            }
        })
        .collect();
    let load_branches: Vec<_> = alternatives
        .iter()
        .map(|(name, ty)| {
            quote! {
                if type_id == <#ty as ::binspect::HasTypeId>::TYPE_ID {
                    return ::core::result::Result::Ok(::core::option::Option::Some(Self::#name(
                        ::binspect::inspect::variant::load_alternative::<#ty, __D>(f)?,
                    )));
                }
            }
        })
        .collect();
    let (first_name, first_ty) = alternatives[0];

    let generics = add_codec_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let (has_type_id, _) = type_id_impl(ident, &generics, &type_attrs, &type_name);
    // generic variants are checked when first encoded or decoded
    let distinct_check = if input.generics.params.is_empty() {
        quote! {
            const _: () = ::binspect::inspect::variant::assert_distinct_types(
                <#ident as ::binspect::VariantAccess>::ALLOWED_TYPES,
            );
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        #distinct_check

        impl #impl_generics ::binspect::VariantAccess for #ident #ty_generics #where_clause {
            const NAME: &'static str = #type_name;
            const ALLOWED_TYPES: &'static [::binspect::TypeId] = &[#(#allowed),*];

            fn type_index(&self) -> usize {
                match self {
                    #(#index_arms)*
                }
            }

            fn save_active<__S: ::binspect::Serializer + ?Sized>(
                &self,
                f: &mut __S,
            ) -> ::binspect::Result<()> {
                match self {
                    #(#save_arms)*
                }
            }

            fn load_alternative<__D: ::binspect::Deserializer + ?Sized>(
                type_id: ::binspect::TypeId,
                f: &mut __D,
            ) -> ::binspect::Result<::core::option::Option<Self>> {
                #(#load_branches)*
                ::core::result::Result::Ok(::core::option::Option::None)
            }
        }

        impl #impl_generics ::core::default::Default for #ident #ty_generics #where_clause {
            fn default() -> Self {
                Self::#first_name(<#first_ty as ::core::default::Default>::default())
            }
        }

        impl #impl_generics ::binspect::Categorized for #ident #ty_generics #where_clause {
            const CATEGORY: ::binspect::Category = ::binspect::Category::Variant;
        }

        impl #impl_generics ::binspect::Save for #ident #ty_generics #where_clause {
            fn save<__S: ::binspect::Serializer + ?Sized>(
                &self,
                f: &mut __S,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::variant::save_variant(self, f)
            }

            fn save_field<__S: ::binspect::Serializer + ?Sized>(
                &self,
                f: &mut __S,
                name: &str,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::variant::save_variant_field(self, f, name)
            }

            fn save_optional_field<__S: ::binspect::Serializer + ?Sized>(
                value: ::core::option::Option<&Self>,
                f: &mut __S,
                name: &str,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::variant::save_optional_variant_field(value, f, name)
            }
        }

        impl #impl_generics ::binspect::Load for #ident #ty_generics #where_clause {
            fn load<__D: ::binspect::Deserializer + ?Sized>(
                &mut self,
                f: &mut __D,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::variant::load_variant(self, f)
            }

            fn load_field<__D: ::binspect::Deserializer + ?Sized>(
                &mut self,
                f: &mut __D,
                name: &str,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::variant::load_variant_field(self, f, name)
            }

            fn load_optional_field<__D: ::binspect::Deserializer + ?Sized>(
                slot: &mut ::core::option::Option<Self>,
                f: &mut __D,
                name: &str,
            ) -> ::binspect::Result<()> {
                ::binspect::inspect::variant::load_optional_variant_field(slot, f, name)
            }
        }

        #has_type_id
    })
}
