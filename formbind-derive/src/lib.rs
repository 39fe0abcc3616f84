//! `#[derive(Record)]` for formbind.
//!
//! Generates the cached record descriptor and the `Field` impl for a struct
//! with named fields:
//!
//! ```rust,ignore
//! #[derive(Default, formbind::Record)]
//! struct Query {
//!     #[form("q")]
//!     text: String,
//!     #[form("page,default=1")]
//!     page: u32,
//!     #[form("since", time_format = "%Y-%m-%d", time_location = "Europe/Paris")]
//!     since: Option<chrono::NaiveDate>,
//!     #[form(skip)]
//!     cache: Vec<u8>,
//!     // no attribute: flattened into the parent form
//!     paging: Paging,
//! }
//! ```
//!
//! Generic structs are rejected: the descriptor is cached in a `static`,
//! which cannot vary with type parameters.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{
    parse_macro_input, spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Lit, LitStr,
    Token,
};

#[proc_macro_derive(Record, attributes(form))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Parsed `#[form(...)]` attributes of one field.
#[derive(Default)]
struct FormAttr {
    tag: Option<String>,
    time_format: Option<String>,
    time_utc: Option<String>,
    time_location: Option<String>,
    skip: bool,
}

fn expand_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "#[derive(Record)] does not support generic structs",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(Error::new(
                input.ident.span(),
                "#[derive(Record)] only supports structs",
            ))
        }
    };

    let fields = match &data.fields {
        Fields::Named(named) => &named.named,
        _ => {
            return Err(Error::new(
                data.fields.span(),
                "#[derive(Record)] requires named fields",
            ))
        }
    };

    let ident = &input.ident;
    let record_name = ident.to_string();

    let mut accessors = Vec::new();
    let mut specs = Vec::new();

    for field in fields {
        let attr = parse_form_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }

        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = field_ident.unraw().to_string();
        let accessor = format_ident!("__formbind_access_{}", field_name);

        accessors.push(quote! {
            fn #accessor(record: &mut #ident) -> &mut dyn ::formbind::Field {
                &mut record.#field_ident
            }
        });

        let tag = attr.tag.map(|v| quote!(.tag(#v)));
        let time_format = attr.time_format.map(|v| quote!(.time_format(#v)));
        let time_utc = attr.time_utc.map(|v| quote!(.time_utc(#v)));
        let time_location = attr.time_location.map(|v| quote!(.time_location(#v)));

        specs.push(quote! {
            .field(
                ::formbind::FieldSpec::new(#field_name, #accessor)
                    #tag #time_format #time_utc #time_location
            )
        });
    }

    Ok(quote! {
        impl ::formbind::Record for #ident {
            fn descriptor() -> &'static ::formbind::RecordDescriptor<Self> {
                static DESCRIPTOR: ::formbind::__private::OnceCell<
                    ::formbind::RecordDescriptor<#ident>,
                > = ::formbind::__private::OnceCell::new();

                DESCRIPTOR.get_or_init(|| {
                    #(#accessors)*

                    ::formbind::RecordDescriptor::builder(#record_name)
                        #(#specs)*
                        .build()
                })
            }
        }

        impl ::formbind::Field for #ident {
            fn category(&self) -> ::formbind::Category {
                ::formbind::Category::Record
            }

            fn view(&mut self) -> ::formbind::View<'_> {
                ::formbind::View::Record(self)
            }
        }
    })
}

fn parse_form_attrs(attrs: &[syn::Attribute]) -> Result<FormAttr, Error> {
    let mut out = FormAttr::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("form")) {
        attr.parse_args_with(|input: ParseStream| parse_form_args(input, &mut out))?;
    }
    Ok(out)
}

fn parse_form_args(input: ParseStream, out: &mut FormAttr) -> syn::Result<()> {
    while !input.is_empty() {
        if input.peek(LitStr) {
            let tag: LitStr = input.parse()?;
            out.tag = Some(tag.value());
        } else {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "skip" => out.skip = true,
                "time_format" => out.time_format = Some(parse_str_value(input)?),
                "time_location" => out.time_location = Some(parse_str_value(input)?),
                "time_utc" => {
                    input.parse::<Token![=]>()?;
                    out.time_utc = Some(match input.parse::<Lit>()? {
                        Lit::Bool(b) => b.value.to_string(),
                        Lit::Str(s) => s.value(),
                        other => {
                            return Err(Error::new(other.span(), "expected a bool or string"))
                        }
                    });
                }
                other => {
                    return Err(Error::new(
                        key.span(),
                        format!("unknown form attribute `{other}`"),
                    ))
                }
            }
        }

        if input.is_empty() {
            break;
        }
        input.parse::<Token![,]>()?;
    }
    Ok(())
}

fn parse_str_value(input: ParseStream) -> syn::Result<String> {
    input.parse::<Token![=]>()?;
    let value: LitStr = input.parse()?;
    Ok(value.value())
}
