//! Shared scalar filter inputs and the `OrderDirection` enum.
//!
//! These types are identical for every model, so they are built once per
//! process. The statics own them and type references only hold weak handles.

use super::types::{Arg, EnumType, Fields, InputObjectType, ScalarType, TypeRef};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Comparison operators a filter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOps {
    /// `equals`, `in`, `notIn`, `lt`, `lte`, `gt`, `gte`
    Ordered,
    /// `Ordered` plus `contains`, `startsWith`, `endsWith`
    Text,
    /// `equals` only
    Equality,
}

static ORDER_DIRECTION: Lazy<Arc<EnumType>> =
    Lazy::new(|| Arc::new(EnumType::new("OrderDirection", ["asc", "desc"])));

static QUERY_MODE: Lazy<Arc<EnumType>> =
    Lazy::new(|| Arc::new(EnumType::new("QueryMode", ["default", "insensitive"])));

static STRING_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter("StringFilter", ScalarType::String, FilterOps::Text, &NESTED_STRING_FILTER)
});
static NESTED_STRING_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter(
        "NestedStringFilter",
        ScalarType::String,
        FilterOps::Text,
        &NESTED_STRING_FILTER,
    )
});
static STRING_NULLABLE_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter(
        "StringNullableFilter",
        ScalarType::String,
        FilterOps::Text,
        &NESTED_STRING_NULLABLE_FILTER,
    )
});
static NESTED_STRING_NULLABLE_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter(
        "NestedStringNullableFilter",
        ScalarType::String,
        FilterOps::Text,
        &NESTED_STRING_NULLABLE_FILTER,
    )
});

static INT_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter("IntFilter", ScalarType::Int, FilterOps::Ordered, &NESTED_INT_FILTER)
});
static NESTED_INT_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter("NestedIntFilter", ScalarType::Int, FilterOps::Ordered, &NESTED_INT_FILTER)
});
static INT_NULLABLE_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter(
        "IntNullableFilter",
        ScalarType::Int,
        FilterOps::Ordered,
        &NESTED_INT_NULLABLE_FILTER,
    )
});
static NESTED_INT_NULLABLE_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter(
        "NestedIntNullableFilter",
        ScalarType::Int,
        FilterOps::Ordered,
        &NESTED_INT_NULLABLE_FILTER,
    )
});

static BOOLEAN_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter("BooleanFilter", ScalarType::Boolean, FilterOps::Equality, &BOOLEAN_FILTER)
});

static DATETIME_NULLABLE_FILTER: Lazy<Arc<InputObjectType>> = Lazy::new(|| {
    scalar_filter(
        "DateTimeNullableFilter",
        ScalarType::DateTime,
        FilterOps::Ordered,
        &DATETIME_NULLABLE_FILTER,
    )
});

static ID_FILTER: Lazy<Arc<InputObjectType>> =
    Lazy::new(|| scalar_filter("IDFilter", ScalarType::Id, FilterOps::Ordered, &ID_FILTER));

/// Build a filter input whose `not` field refers to `nested`.
///
/// `nested` may be the filter being built; it is only dereferenced when the
/// field list is first enumerated.
fn scalar_filter(
    name: &str,
    scalar: ScalarType,
    ops: FilterOps,
    nested: &'static Lazy<Arc<InputObjectType>>,
) -> Arc<InputObjectType> {
    Arc::new(InputObjectType::new(
        name,
        Fields::deferred(move || {
            let mut fields = IndexMap::new();
            fields.insert("equals".to_string(), Arg::new(scalar));
            if ops != FilterOps::Equality {
                let list = TypeRef::Scalar(scalar).list_of_non_null();
                fields.insert("in".to_string(), Arg::new(list.clone()));
                fields.insert("notIn".to_string(), Arg::new(list));
                for op in ["lt", "lte", "gt", "gte"] {
                    fields.insert(op.to_string(), Arg::new(scalar));
                }
            }
            if ops == FilterOps::Text {
                for op in ["contains", "startsWith", "endsWith"] {
                    fields.insert(op.to_string(), Arg::new(scalar));
                }
                fields.insert("mode".to_string(), Arg::new(query_mode()));
            }
            fields.insert("not".to_string(), Arg::new(Lazy::force(nested)));
            Ok(fields)
        }),
    ))
}

/// `enum OrderDirection { asc desc }`
pub fn order_direction() -> &'static Arc<EnumType> {
    Lazy::force(&ORDER_DIRECTION)
}

/// `enum QueryMode { default insensitive }`
pub fn query_mode() -> &'static Arc<EnumType> {
    Lazy::force(&QUERY_MODE)
}

/// Filter for a `String` scalar.
pub fn string_filter(nullable: bool) -> &'static Arc<InputObjectType> {
    if nullable {
        Lazy::force(&STRING_NULLABLE_FILTER)
    } else {
        Lazy::force(&STRING_FILTER)
    }
}

/// Filter for an `Int` scalar.
pub fn int_filter(nullable: bool) -> &'static Arc<InputObjectType> {
    if nullable {
        Lazy::force(&INT_NULLABLE_FILTER)
    } else {
        Lazy::force(&INT_FILTER)
    }
}

/// Filter for a `Boolean` scalar.
pub fn boolean_filter() -> &'static Arc<InputObjectType> {
    Lazy::force(&BOOLEAN_FILTER)
}

/// Filter for a `DateTime` scalar.
pub fn datetime_filter() -> &'static Arc<InputObjectType> {
    Lazy::force(&DATETIME_NULLABLE_FILTER)
}

/// Filter for the `id` field.
pub fn id_filter() -> &'static Arc<InputObjectType> {
    Lazy::force(&ID_FILTER)
}
