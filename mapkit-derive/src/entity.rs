use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{
    DataStruct, DeriveInput, Field, Fields, GenericArgument, LitStr, PathArguments, Result, Type,
};

const COLLECTION_TYPES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
];
const MAP_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];
const TRANSPARENT_TYPES: &[&str] = &["Option", "Box", "Arc", "Rc"];

#[derive(Clone, Copy, PartialEq)]
enum RenameRule {
    Verbatim,
    CamelCase,
    SnakeCase,
}

impl RenameRule {
    fn apply(self, name: &str) -> String {
        match self {
            RenameRule::Verbatim => name.to_string(),
            RenameRule::CamelCase => to_camel_case(name),
            RenameRule::SnakeCase => to_snake_case(name),
        }
    }
}

/// Shape of a field type, mirrored by `mapkit::metadata::TypeRef`.
enum Shape {
    Named(String, Type),
    Collection(Box<Shape>),
    Array(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
}

impl Shape {
    fn type_ref(&self) -> TokenStream2 {
        match self {
            Shape::Named(name, _) => quote! {
                mapkit::metadata::TypeRef::named(#name)
            },
            Shape::Collection(element) => {
                let element = element.type_ref();
                quote! { mapkit::metadata::TypeRef::collection(#element) }
            }
            Shape::Array(component) => {
                let component = component.type_ref();
                quote! { mapkit::metadata::TypeRef::array(#component) }
            }
            Shape::Map(key, value) => {
                let key = key.type_ref();
                let value = value.type_ref();
                quote! { mapkit::metadata::TypeRef::map(#key, #value) }
            }
        }
    }

    /// The named type reached after unwrapping every container.
    fn innermost(&self) -> &Type {
        match self {
            Shape::Named(_, ty) => ty,
            Shape::Collection(inner) | Shape::Array(inner) => inner.innermost(),
            Shape::Map(_, value) => value.innermost(),
        }
    }
}

struct PropertyAttrs {
    name: Option<String>,
    is_id: bool,
    is_transient: bool,
    is_reference: bool,
    is_embedded: bool,
}

pub(crate) fn generate_entity_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let type_name = name.unraw().to_string();
    let mut entity_name = type_name.clone();
    let mut entity_id: Option<String> = None;
    let mut rename_rule = RenameRule::Verbatim;

    for attr in &ast.attrs {
        if attr.path().is_ident("entity") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    entity_name = s.value();
                    Ok(())
                } else if meta.path.is_ident("id") {
                    if entity_id.is_some() {
                        return Err(meta.error("Multiple id attributes are not allowed"));
                    }

                    meta.parse_nested_meta(|meta| {
                        if meta.path.is_ident("field") {
                            let value = meta.value()?;
                            let s: LitStr = value.parse()?;
                            entity_id = Some(s.value());
                            Ok(())
                        } else {
                            Err(meta.error("Unknown id attribute"))
                        }
                    })
                } else if meta.path.is_ident("rename_all") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    rename_rule = match s.value().as_str() {
                        "camelCase" => RenameRule::CamelCase,
                        "snake_case" => RenameRule::SnakeCase,
                        _ => {
                            return Err(syn::Error::new_spanned(
                                &s,
                                "rename_all must be \"camelCase\" or \"snake_case\"",
                            ))
                        }
                    };
                    Ok(())
                } else {
                    Err(meta.error("Unknown entity attribute"))
                }
            })?
        }
    }

    let fields = match &data.fields {
        Fields::Named(named) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                format!(
                    "Cannot derive Entity for '{}': only structs with named fields are supported",
                    type_name
                ),
            ))
        }
    };

    if let Some(ref id_field_name) = entity_id {
        let found = fields.iter().any(|field| {
            field
                .ident
                .as_ref()
                .is_some_and(|ident| ident.unraw() == id_field_name)
        });
        if !found {
            return Err(syn::Error::new_spanned(
                ast,
                format!("Field {} not found in struct", id_field_name),
            ));
        }
    }

    let mut properties = Vec::with_capacity(fields.len());
    let mut related: Vec<Type> = Vec::new();
    let mut id_seen: Option<String> = None;

    for field in fields {
        let attrs = parse_property_attrs(field)?;
        let ident = match &field.ident {
            Some(ident) => ident.unraw().to_string(),
            None => continue,
        };

        let is_id = attrs.is_id || entity_id.as_deref() == Some(ident.as_str());
        if is_id {
            if let Some(existing) = &id_seen {
                return Err(syn::Error::new_spanned(
                    field,
                    format!(
                        "Multiple id fields are not allowed: '{}' and '{}'",
                        existing, ident
                    ),
                ));
            }
            id_seen = Some(ident.clone());
        }

        let property_name = attrs.name.unwrap_or_else(|| rename_rule.apply(&ident));
        let shape = field_shape(&field.ty)?;
        let type_ref = shape.type_ref();

        let mut property = quote! {
            mapkit::metadata::PropertyDescriptor::new(#property_name, #type_ref)
        };
        if is_id {
            property = quote! { #property.id() };
        }
        if attrs.is_reference {
            property = quote! { #property.association() };
        }
        if attrs.is_transient {
            property = quote! { #property.transient() };
        }
        properties.push(property);

        if attrs.is_reference || attrs.is_embedded {
            let target = shape.innermost();
            let key = target.to_token_stream().to_string();
            if !related
                .iter()
                .any(|ty| ty.to_token_stream().to_string() == key)
            {
                related.push(target.clone());
            }
        }
    }

    let register_related_code = if related.is_empty() {
        quote! {
            fn register_related(_registry: &mapkit::metadata::TypeRegistry) -> mapkit::errors::MappingResult<()> {
                Ok(())
            }
        }
    } else {
        quote! {
            fn register_related(registry: &mapkit::metadata::TypeRegistry) -> mapkit::errors::MappingResult<()> {
                #(registry.register::<#related>()?;)*
                Ok(())
            }
        }
    };

    let gen = quote! {
        impl #impl_generics mapkit::metadata::Entity for #name #ty_generics #where_clause {
            fn type_ref() -> mapkit::metadata::TypeRef {
                mapkit::metadata::TypeRef::named(#type_name)
            }

            fn type_descriptor() -> mapkit::errors::MappingResult<mapkit::metadata::TypeDescriptor> {
                mapkit::metadata::TypeDescriptor::builder(#type_name)
                    .entity_name(#entity_name)
                    #(.property(#properties))*
                    .build()
            }

            #register_related_code
        }
    };

    Ok(TokenStream::from(gen))
}

fn parse_property_attrs(field: &Field) -> Result<PropertyAttrs> {
    let mut attrs = PropertyAttrs {
        name: None,
        is_id: false,
        is_transient: false,
        is_reference: false,
        is_embedded: false,
    };

    for attr in &field.attrs {
        if attr.path().is_ident("property") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    attrs.name = Some(s.value());
                    Ok(())
                } else if meta.path.is_ident("id") {
                    attrs.is_id = true;
                    Ok(())
                } else if meta.path.is_ident("transient") {
                    attrs.is_transient = true;
                    Ok(())
                } else if meta.path.is_ident("reference") {
                    attrs.is_reference = true;
                    Ok(())
                } else if meta.path.is_ident("embedded") {
                    attrs.is_embedded = true;
                    Ok(())
                } else {
                    Err(meta.error("Unknown property attribute"))
                }
            })?
        }
    }

    if attrs.is_reference && attrs.is_embedded {
        return Err(syn::Error::new_spanned(
            field,
            "A property cannot be both a reference and embedded",
        ));
    }
    Ok(attrs)
}

fn field_shape(ty: &Type) -> Result<Shape> {
    match ty {
        Type::Array(array) => Ok(Shape::Array(Box::new(field_shape(&array.elem)?))),
        Type::Slice(slice) => Ok(Shape::Array(Box::new(field_shape(&slice.elem)?))),
        Type::Reference(reference) => field_shape(&reference.elem),
        Type::Paren(paren) => field_shape(&paren.elem),
        Type::Group(group) => field_shape(&group.elem),
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return Err(syn::Error::new_spanned(ty, "Unsupported property type"));
            };
            let ident = segment.ident.unraw().to_string();
            let args = generic_types(&segment.arguments);

            if TRANSPARENT_TYPES.contains(&ident.as_str()) && args.len() == 1 {
                field_shape(args[0])
            } else if COLLECTION_TYPES.contains(&ident.as_str()) && !args.is_empty() {
                Ok(Shape::Collection(Box::new(field_shape(args[0])?)))
            } else if MAP_TYPES.contains(&ident.as_str()) && args.len() >= 2 {
                Ok(Shape::Map(
                    Box::new(field_shape(args[0])?),
                    Box::new(field_shape(args[1])?),
                ))
            } else {
                Ok(Shape::Named(ident, ty.clone()))
            }
        }
        _ => Err(syn::Error::new_spanned(
            ty,
            "Unsupported property type, expected a named type, a container or an array",
        )),
    }
}

fn generic_types(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn to_camel_case(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    let mut result = String::from(&name[..name.len() - trimmed.len()]);
    let mut upper = false;
    for c in trimmed.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            result.extend(c.to_uppercase());
            upper = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase() {
            if previous.is_some_and(|p| p.is_lowercase() || p.is_numeric()) {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
        previous = Some(c);
    }
    result
}
