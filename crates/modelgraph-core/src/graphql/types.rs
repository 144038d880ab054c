//! GraphQL type-system building blocks.
//!
//! Object and input object types carry their field lists behind [`Fields`],
//! which may be deferred. A deferred list is computed on first enumeration and
//! cached, so two types can reference each other before either is complete.

use crate::config::{AccessRule, CacheHint};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::{Arc, Weak};

/// Built-in and custom scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `ID`
    Id,
    /// `String`
    String,
    /// `Int`
    Int,
    /// `Float`
    Float,
    /// `Boolean`
    Boolean,
    /// `DateTime` (custom)
    DateTime,
    /// `BigInt` (custom)
    BigInt,
    /// `Decimal` (custom)
    Decimal,
    /// `JSON` (custom)
    Json,
}

impl ScalarType {
    /// GraphQL name of the scalar.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Id => "ID",
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::DateTime => "DateTime",
            ScalarType::BigInt => "BigInt",
            ScalarType::Decimal => "Decimal",
            ScalarType::Json => "JSON",
        }
    }

    /// Whether the scalar needs a `scalar` declaration in SDL.
    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            ScalarType::DateTime | ScalarType::BigInt | ScalarType::Decimal | ScalarType::Json
        )
    }
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Type name.
    pub name: String,
    /// Allowed values, in declaration order.
    pub values: Vec<String>,
    /// Optional description.
    pub description: Option<String>,
}

impl EnumType {
    /// Create an enum type.
    pub fn new(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        }
    }
}

/// A non-owning reference to a named object or input type.
///
/// Named types are owned by the registry's `ModelTypes` or by process-wide
/// statics. Field lists hold only these handles, so types that refer to each
/// other (or to themselves) are freed together with their owner.
pub struct TypeHandle<T> {
    name: String,
    target: Weak<T>,
}

impl<T> Clone for TypeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            target: self.target.clone(),
        }
    }
}

impl<T> TypeHandle<T> {
    /// Name of the referenced type. Available even after it is dropped.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The referenced type, if its owner is still alive.
    pub fn get(&self) -> Result<Arc<T>> {
        self.target.upgrade().ok_or(Error::RegistryUnavailable)
    }
}

impl<T> fmt::Debug for TypeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name).finish()
    }
}

/// Reference to a type, possibly wrapped in list/non-null modifiers.
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// A scalar.
    Scalar(ScalarType),
    /// An enum.
    Enum(Arc<EnumType>),
    /// An output object type.
    Object(TypeHandle<ObjectType>),
    /// An input object type.
    Input(TypeHandle<InputObjectType>),
    /// A list of the inner type.
    List(Box<TypeRef>),
    /// A non-null inner type.
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Wrap in a list.
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wrap in non-null.
    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    /// `[T!]`
    pub fn list_of_non_null(self) -> Self {
        self.non_null().list()
    }

    /// Name of the innermost named type.
    pub fn named(&self) -> &str {
        match self {
            TypeRef::Scalar(s) => s.name(),
            TypeRef::Enum(e) => &e.name,
            TypeRef::Object(o) => o.name(),
            TypeRef::Input(i) => i.name(),
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named(),
        }
    }

    /// Strip list/non-null modifiers.
    pub fn innermost(&self) -> &TypeRef {
        match self {
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.innermost(),
            other => other,
        }
    }

    /// Whether the outermost modifier is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            named => f.write_str(named.named()),
        }
    }
}

impl From<ScalarType> for TypeRef {
    fn from(scalar: ScalarType) -> Self {
        TypeRef::Scalar(scalar)
    }
}

impl From<&Arc<InputObjectType>> for TypeRef {
    fn from(input: &Arc<InputObjectType>) -> Self {
        TypeRef::Input(TypeHandle {
            name: input.name.clone(),
            target: Arc::downgrade(input),
        })
    }
}

impl From<&Arc<ObjectType>> for TypeRef {
    fn from(object: &Arc<ObjectType>) -> Self {
        TypeRef::Object(TypeHandle {
            name: object.name.clone(),
            target: Arc::downgrade(object),
        })
    }
}

impl From<&Arc<EnumType>> for TypeRef {
    fn from(e: &Arc<EnumType>) -> Self {
        TypeRef::Enum(e.clone())
    }
}

/// An input argument (or input object field).
#[derive(Debug, Clone)]
pub struct Arg {
    /// Argument type.
    pub ty: TypeRef,
    /// Default value, printed as a GraphQL literal.
    pub default_value: Option<serde_json::Value>,
    /// Optional description.
    pub description: Option<String>,
}

impl Arg {
    /// Create an argument of the given type.
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            default_value: None,
            description: None,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Where an output field on a model type came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrigin {
    /// Owning model.
    pub model_key: String,
    /// Field that contributed the output field.
    pub field_key: String,
}

/// A field on an output object type.
#[derive(Debug, Clone)]
pub struct OutputField {
    /// Result type.
    pub ty: TypeRef,
    /// Field arguments.
    pub args: IndexMap<String, Arg>,
    /// Optional description.
    pub description: Option<String>,
    /// Cache hint applied when resolving.
    pub cache_hint: Option<CacheHint>,
    /// Read access gate, set when the field is attached to a model type.
    pub read_access: Option<AccessRule>,
    /// Model field this output belongs to.
    pub origin: Option<FieldOrigin>,
}

impl OutputField {
    /// Create an output field of the given type.
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            args: IndexMap::new(),
            description: None,
            cache_hint: None,
            read_access: None,
            origin: None,
        }
    }

    /// Add an argument.
    pub fn with_arg(mut self, name: impl Into<String>, arg: Arg) -> Self {
        self.args.insert(name.into(), arg);
        self
    }

    /// Replace all arguments.
    pub fn with_args(mut self, args: IndexMap<String, Arg>) -> Self {
        self.args = args;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the model field's access gate, origin, and cache hint.
    pub fn gated(
        mut self,
        model_key: &str,
        field_key: &str,
        read_access: AccessRule,
        cache_hint: Option<CacheHint>,
    ) -> Self {
        self.read_access = Some(read_access);
        self.origin = Some(FieldOrigin {
            model_key: model_key.to_string(),
            field_key: field_key.to_string(),
        });
        if cache_hint.is_some() {
            self.cache_hint = cache_hint;
        }
        self
    }
}

/// Produces a field list on demand.
pub type FieldsThunk<T> = Box<dyn Fn() -> Result<IndexMap<String, T>> + Send + Sync>;

/// A field list that is either known up front or computed once on first use.
pub struct Fields<T> {
    cell: OnceCell<IndexMap<String, T>>,
    thunk: Option<FieldsThunk<T>>,
}

impl<T> Fields<T> {
    /// A field list known at construction time.
    pub fn fixed(fields: IndexMap<String, T>) -> Self {
        Self {
            cell: OnceCell::with_value(fields),
            thunk: None,
        }
    }

    /// A field list computed by `thunk` the first time it is read.
    pub fn deferred<F>(thunk: F) -> Self
    where
        F: Fn() -> Result<IndexMap<String, T>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            thunk: Some(Box::new(thunk)),
        }
    }

    /// Enumerate the fields, computing them if needed.
    ///
    /// A failed computation is not cached, so a read that happens before the
    /// registry is populated can be retried afterwards.
    pub fn get(&self) -> Result<&IndexMap<String, T>> {
        self.cell.get_or_try_init(|| match &self.thunk {
            Some(thunk) => {
                let fields = thunk()?;
                tracing::trace!(count = fields.len(), "deferred field list computed");
                Ok(fields)
            }
            None => Ok(IndexMap::new()),
        })
    }

    /// Whether the list has been computed.
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> fmt::Debug for Fields<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(fields) => f
                .debug_struct("Fields")
                .field("keys", &fields.keys().collect::<Vec<_>>())
                .finish(),
            None => f.write_str("Fields(<deferred>)"),
        }
    }
}

/// An output object type.
#[derive(Debug)]
pub struct ObjectType {
    /// Type name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Field list.
    pub fields: Fields<OutputField>,
}

impl ObjectType {
    /// Create an object type.
    pub fn new(name: impl Into<String>, fields: Fields<OutputField>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// An input object type.
#[derive(Debug)]
pub struct InputObjectType {
    /// Type name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Field list.
    pub fields: Fields<Arg>,
}

impl InputObjectType {
    /// Create an input object type.
    pub fn new(name: impl Into<String>, fields: Fields<Arg>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::Scalar(ScalarType::Int).list_of_non_null().non_null();
        assert_eq!(ty.to_string(), "[Int!]!");
        assert_eq!(ty.named(), "Int");
    }

    #[test]
    fn test_deferred_fields_computed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fields: Fields<Arg> = Fields::deferred(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut map = IndexMap::new();
            map.insert("equals".to_string(), Arg::new(ScalarType::String));
            Ok(map)
        });

        assert!(!fields.is_resolved());
        assert_eq!(fields.get().unwrap().len(), 1);
        assert_eq!(fields.get().unwrap().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_thunk_is_retried() {
        let ready = Arc::new(AtomicUsize::new(0));
        let flag = ready.clone();
        let fields: Fields<Arg> = Fields::deferred(move || {
            if flag.load(Ordering::SeqCst) == 0 {
                return Err(Error::RegistryNotReady);
            }
            Ok(IndexMap::new())
        });

        assert!(matches!(fields.get(), Err(Error::RegistryNotReady)));
        ready.store(1, Ordering::SeqCst);
        assert!(fields.get().is_ok());
    }

    #[test]
    fn test_self_referencing_input() {
        let input = Arc::new_cyclic(|weak: &Weak<InputObjectType>| {
            let weak = weak.clone();
            InputObjectType::new(
                "NodeWhereInput",
                Fields::deferred(move || {
                    let this = weak.upgrade().ok_or(Error::RegistryUnavailable)?;
                    let mut map = IndexMap::new();
                    let and = Arg::new(TypeRef::from(&this).list_of_non_null());
                    map.insert("AND".to_string(), and);
                    Ok(map)
                }),
            )
        });

        let fields = input.fields.get().unwrap();
        assert_eq!(fields["AND"].ty.to_string(), "[NodeWhereInput!]");

        // the cached list does not keep its own type alive
        let weak = Arc::downgrade(&input);
        drop(input);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_handle_outlives_target() {
        let input = Arc::new(InputObjectType::new(
            "PostWhereInput",
            Fields::fixed(IndexMap::new()),
        ));
        let ty = TypeRef::from(&input).non_null();
        let TypeRef::Input(handle) = ty.innermost().clone() else {
            panic!("expected an input type");
        };
        assert!(handle.get().is_ok());

        drop(input);
        assert_eq!(ty.to_string(), "PostWhereInput!");
        assert!(matches!(handle.get(), Err(Error::RegistryUnavailable)));
    }
}
