//! GraphQL SDL printing.
//!
//! Only types reachable from the root operations are printed, in the order
//! they are first discovered.

use super::types::{Arg, EnumType, InputObjectType, ObjectType, OutputField, ScalarType, TypeRef};
use crate::error::Result;
use crate::schema::{Registry, RootOperations};
use std::collections::{HashSet, VecDeque};
use std::fmt::Write;
use std::sync::Arc;

enum NamedType {
    Scalar(ScalarType),
    Enum(Arc<EnumType>),
    Object(Arc<ObjectType>),
    Input(Arc<InputObjectType>),
}

#[derive(Default)]
struct Collector {
    seen: HashSet<String>,
    queue: VecDeque<usize>,
    found: Vec<NamedType>,
}

impl Collector {
    fn push(&mut self, name: &str, named: NamedType) {
        if self.seen.insert(name.to_string()) {
            self.queue.push_back(self.found.len());
            self.found.push(named);
        }
    }

    fn visit(&mut self, ty: &TypeRef) -> Result<()> {
        let name = ty.named();
        if self.seen.contains(name) {
            return Ok(());
        }
        let named = match ty.innermost() {
            TypeRef::Scalar(scalar) if !scalar.is_custom() => return Ok(()),
            TypeRef::Scalar(scalar) => NamedType::Scalar(*scalar),
            TypeRef::Enum(e) => NamedType::Enum(e.clone()),
            TypeRef::Object(o) => NamedType::Object(o.get()?),
            TypeRef::Input(i) => NamedType::Input(i.get()?),
            TypeRef::List(_) | TypeRef::NonNull(_) => return Ok(()),
        };
        self.push(name, named);
        Ok(())
    }

    fn visit_object(&mut self, object: &Arc<ObjectType>) {
        self.push(&object.name, NamedType::Object(object.clone()));
    }

    fn drain(&mut self) -> Result<()> {
        while let Some(idx) = self.queue.pop_front() {
            let mut refs = Vec::new();
            match &self.found[idx] {
                NamedType::Object(object) => {
                    for field in object.fields.get()?.values() {
                        refs.push(field.ty.clone());
                        refs.extend(field.args.values().map(|arg| arg.ty.clone()));
                    }
                }
                NamedType::Input(input) => {
                    refs.extend(input.fields.get()?.values().map(|arg| arg.ty.clone()));
                }
                NamedType::Scalar(_) | NamedType::Enum(_) => {}
            }
            for ty in &refs {
                self.visit(ty)?;
            }
        }
        Ok(())
    }
}

/// Print the schema of a registry as GraphQL SDL.
pub fn print_schema(registry: &Registry) -> Result<String> {
    let roots = RootOperations::build(registry);
    let mut collector = Collector::default();
    collector.visit_object(&roots.query);
    if let Some(mutation) = &roots.mutation {
        collector.visit_object(mutation);
    }
    collector.drain()?;

    let mut blocks = Vec::with_capacity(collector.found.len());
    for named in &collector.found {
        blocks.push(match named {
            NamedType::Scalar(scalar) => format!("scalar {}", scalar.name()),
            NamedType::Enum(e) => print_enum(e),
            NamedType::Object(object) => print_object(object)?,
            NamedType::Input(input) => print_input(input)?,
        });
    }
    tracing::debug!(types = blocks.len(), "schema printed");
    Ok(blocks.join("\n\n") + "\n")
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    if let Some(description) = description {
        let _ = writeln!(out, "{indent}\"\"\"");
        for line in description.lines() {
            let _ = writeln!(out, "{indent}{line}");
        }
        let _ = writeln!(out, "{indent}\"\"\"");
    }
}

fn print_enum(e: &EnumType) -> String {
    let mut out = String::new();
    print_description(&mut out, e.description.as_deref(), "");
    let _ = writeln!(out, "enum {} {{", e.name);
    for value in &e.values {
        let _ = writeln!(out, "  {value}");
    }
    out.push('}');
    out
}

fn print_object(object: &ObjectType) -> Result<String> {
    let mut out = String::new();
    print_description(&mut out, object.description.as_deref(), "");
    let _ = writeln!(out, "type {} {{", object.name);
    for (name, field) in object.fields.get()? {
        print_description(&mut out, field.description.as_deref(), "  ");
        let _ = writeln!(out, "  {name}{}: {}", print_args(field), field.ty);
    }
    out.push('}');
    Ok(out)
}

fn print_input(input: &InputObjectType) -> Result<String> {
    let mut out = String::new();
    print_description(&mut out, input.description.as_deref(), "");
    let _ = writeln!(out, "input {} {{", input.name);
    for (name, arg) in input.fields.get()? {
        print_description(&mut out, arg.description.as_deref(), "  ");
        let _ = writeln!(out, "  {}", print_arg(name, arg));
    }
    out.push('}');
    Ok(out)
}

fn print_args(field: &OutputField) -> String {
    if field.args.is_empty() {
        return String::new();
    }
    let args: Vec<String> = field
        .args
        .iter()
        .map(|(name, arg)| print_arg(name, arg))
        .collect();
    format!("({})", args.join(", "))
}

fn print_arg(name: &str, arg: &Arg) -> String {
    match &arg.default_value {
        Some(value) => format!("{name}: {} = {}", arg.ty, graphql_literal(value)),
        None => format!("{name}: {}", arg.ty),
    }
}

/// Render a JSON value as a GraphQL input literal.
pub fn graphql_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(graphql_literal).collect();
            format!("[{}]", items.join(", "))
        }
        serde_json::Value::Object(fields) => {
            if fields.is_empty() {
                return "{}".to_string();
            }
            let fields: Vec<String> = fields
                .iter()
                .map(|(key, value)| format!("{key}: {}", graphql_literal(value)))
                .collect();
            format!("{{ {} }}", fields.join(", "))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graphql_literals() {
        assert_eq!(graphql_literal(&json!({})), "{}");
        assert_eq!(graphql_literal(&json!([])), "[]");
        assert_eq!(graphql_literal(&json!(0)), "0");
        assert_eq!(graphql_literal(&json!("asc")), "\"asc\"");
        assert_eq!(graphql_literal(&json!({ "id": 1 })), "{ id: 1 }");
    }

    #[test]
    fn test_print_arg_with_default() {
        let arg = Arg::new(TypeRef::from(ScalarType::Int).non_null()).with_default(json!(0));
        assert_eq!(print_arg("skip", &arg), "skip: Int! = 0");
    }
}
