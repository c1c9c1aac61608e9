use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input, spanned::Spanned};

/// Implements `ezsql::Entity` for a struct with named fields.
///
/// Struct attribute: `#[ez_table(name = "...")]` overrides the table name.
/// Field attributes: `#[ez(id)]`, `#[ez(id, generated)]`,
/// `#[ez(column = "...")]`, `#[ez(skip)]`. Exactly one field must carry `id`.
/// Mapped field types implement `ToValue`, `FromValue` and `Default`;
/// skipped fields only need `Default`.
#[proc_macro_derive(EzEntity, attributes(ez_table, ez))]
pub fn derive_ez_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_ez_entity(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct EzFieldOptions {
    id: bool,
    generated: bool,
    skip: bool,
    column: Option<String>,
}

struct EzTableOptions {
    name: Option<String>,
}

struct MappedField {
    ident: Ident,
    options: EzFieldOptions,
}

fn expand_ez_entity(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "EzEntity cannot be derived for generic structs",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "EzEntity can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "EzEntity requires a struct with named fields",
        ));
    };

    let table = parse_ez_table_options(&input.attrs)?;

    let mut mapped = Vec::new();
    let mut skipped = Vec::new();
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let options = parse_ez_field_options(&field.attrs)?;
        if options.skip {
            skipped.push(ident);
        } else {
            mapped.push(MappedField { ident, options });
        }
    }

    let id_count = mapped.iter().filter(|f| f.options.id).count();
    if id_count != 1 {
        let message = if id_count == 0 {
            "EzEntity requires one field marked #[ez(id)]"
        } else {
            "EzEntity allows only one field marked #[ez(id)]"
        };
        return Err(syn::Error::new(struct_name.span(), message));
    }

    let entity_name = struct_name.to_string();
    let table_call = table.name.map(|name| quote!(.table(#name)));

    let field_metas = mapped.iter().map(|field| {
        let name = field.ident.to_string();
        let column = field.options.column.as_ref().map(|c| quote!(.column(#c)));
        let primary_key = field.options.id.then(|| quote!(.primary_key()));
        let generated = field.options.generated.then(|| quote!(.generated()));
        quote! {
            .field(::ezsql::FieldMeta::new(#name) #column #primary_key #generated)
        }
    });

    let to_values = mapped.iter().map(|field| {
        let ident = &field.ident;
        quote!(::ezsql::ToValue::to_value(&self.#ident))
    });

    // Struct literal fields evaluate in written order, so mapped fields pull
    // cells in declaration order.
    let from_values = named.named.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        if skipped.contains(ident) {
            return Some(quote!(#ident: ::core::default::Default::default()));
        }
        let name = ident.to_string();
        Some(quote! {
            #ident: ::ezsql::field_from_cell(#entity_name, #name, cells.next().flatten())
        })
    });

    Ok(quote! {
        impl ::ezsql::Entity for #struct_name {
            fn meta() -> &'static ::ezsql::EntityMeta {
                static META: ::std::sync::OnceLock<::ezsql::EntityMeta> =
                    ::std::sync::OnceLock::new();
                META.get_or_init(|| {
                    ::ezsql::EntityMeta::new(#entity_name)
                        #table_call
                        #(#field_metas)*
                })
            }

            fn to_values(&self) -> ::std::vec::Vec<::ezsql::Value> {
                ::std::vec![#(#to_values),*]
            }

            fn from_values(
                values: ::std::vec::Vec<::std::option::Option<::ezsql::Value>>,
            ) -> Self {
                let mut cells = values.into_iter();
                Self {
                    #(#from_values),*
                }
            }
        }
    })
}

fn parse_ez_field_options(attrs: &[syn::Attribute]) -> syn::Result<EzFieldOptions> {
    let mut options = EzFieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("ez") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                options.id = true;
                return Ok(());
            }

            if meta.path.is_ident("generated") {
                options.generated = true;
                return Ok(());
            }

            if meta.path.is_ident("skip") {
                options.skip = true;
                return Ok(());
            }

            if meta.path.is_ident("column") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.column = Some(lit.value());
                return Ok(());
            }

            Err(meta.error(
                "Unsupported #[ez(...)] option. Supported: id, generated, skip, column = \"...\"",
            ))
        })?;

        if options.skip && (options.id || options.generated || options.column.is_some()) {
            return Err(syn::Error::new(
                attr.span(),
                "#[ez(skip)] cannot be combined with other #[ez(...)] options",
            ));
        }

        if options.generated && !options.id {
            return Err(syn::Error::new(
                attr.span(),
                "#[ez(generated)] is only valid on the #[ez(id)] field",
            ));
        }
    }

    Ok(options)
}

fn parse_ez_table_options(attrs: &[syn::Attribute]) -> syn::Result<EzTableOptions> {
    let mut options = EzTableOptions { name: None };

    for attr in attrs {
        if !attr.path().is_ident("ez_table") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.name = Some(lit.value());
                return Ok(());
            }

            Err(meta.error("Unsupported ez_table attribute. Supported: name = \"...\""))
        })?;
    }

    Ok(options)
}
