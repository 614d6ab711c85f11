//! # Validation/Assignment Engine
//!
//! Recursive descent over a schema descriptor and a raw
//! `serde_json::Value`. Each composite variant validates its children and,
//! on failure, prepends the child's segment to the error route before
//! returning it. Validation is fail-fast: the first failure ends the walk.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Cause, Segment, SettingsError};
use crate::node::{Node, Record};
use crate::number;
use crate::schema::{FieldType, NumberSchema, RecordSchema, Schema, SchemaKind, SelectionSchema, TerminalSchema};
use crate::value::{raw_type_name, PrimitiveKind, Scalar};

/// Validate `raw` against `schema`.
pub(crate) fn construct(schema: &Schema, raw: &Value) -> Result<Node, SettingsError> {
    match schema.kind() {
        SchemaKind::Record(record) => construct_record(schema.name(), record, raw),
        SchemaKind::Sequence(element) => construct_sequence(element, raw),
        SchemaKind::Keyed(element) => construct_keyed(element, raw),
        SchemaKind::Terminal(terminal) => construct_terminal(terminal, raw),
        SchemaKind::Number(number) => construct_number(number, raw),
        SchemaKind::Selection(selection) => construct_selection(selection, raw),
    }
}

fn construct_record(name: &str, schema: &RecordSchema, raw: &Value) -> Result<Node, SettingsError> {
    let Value::Object(values) = raw else {
        return Err(SettingsError::type_mismatch("dict", raw_type_name(raw)));
    };
    let mut fields = Vec::with_capacity(schema.fields().len());
    for (field, ty) in schema.fields() {
        let segment = || Segment::Field(field.clone());
        let value = values
            .get(field)
            .ok_or_else(|| SettingsError::new(Cause::NotFound).within(segment()))?;
        let node = match ty {
            FieldType::Primitive(_) if value.is_null() => Node::Primitive(Scalar::Null),
            FieldType::Primitive(kind) => Node::Primitive(primitive(*kind, value).map_err(|e| e.within(segment()))?),
            FieldType::Schema(nested) => construct(nested, value).map_err(|e| e.within(segment()))?,
        };
        fields.push((field.clone(), node));
    }
    let record = Record::new(name, fields);
    if let Some(check) = schema.consistency() {
        check(&record).map_err(|reason| SettingsError::new(Cause::ConsistencyFailed(reason)))?;
    }
    Ok(Node::Record(record))
}

fn construct_sequence(element: &FieldType, raw: &Value) -> Result<Node, SettingsError> {
    let Value::Array(items) = raw else {
        return Err(SettingsError::type_mismatch("list", raw_type_name(raw)));
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| element_node(element, item).map_err(|e| e.within(Segment::Index(idx))))
        .collect::<Result<Vec<_>, _>>()
        .map(Node::Sequence)
}

fn construct_keyed(element: &FieldType, raw: &Value) -> Result<Node, SettingsError> {
    let Value::Object(entries) = raw else {
        return Err(SettingsError::type_mismatch("dict", raw_type_name(raw)));
    };
    let mut nodes = BTreeMap::new();
    for (key, item) in entries {
        let node = element_node(element, item).map_err(|e| e.within(Segment::Key(key.clone())))?;
        nodes.insert(key.clone(), node);
    }
    Ok(Node::Keyed(nodes))
}

/// Collection elements get no null passthrough.
fn element_node(element: &FieldType, raw: &Value) -> Result<Node, SettingsError> {
    match element {
        FieldType::Primitive(kind) => primitive(*kind, raw).map(Node::Primitive),
        FieldType::Schema(nested) => construct(nested, raw),
    }
}

fn primitive(kind: PrimitiveKind, raw: &Value) -> Result<Scalar, SettingsError> {
    kind.scalar(raw)
        .ok_or_else(|| SettingsError::type_mismatch(kind.name(), raw_type_name(raw)))
}

fn construct_terminal(schema: &TerminalSchema, raw: &Value) -> Result<Node, SettingsError> {
    let value = primitive(schema.kind(), raw)?;
    if let Some(check) = schema.check() {
        check(&value).map_err(|violation| {
            SettingsError::new(Cause::CheckFailed {
                violation,
                value: raw.clone(),
            })
        })?;
    }
    Ok(Node::Terminal(value))
}

fn construct_number(schema: &NumberSchema, raw: &Value) -> Result<Node, SettingsError> {
    let leaf = number::assign(schema.kind(), raw)?;
    if let Some(check) = schema.check() {
        check(leaf.value()).map_err(|violation| {
            SettingsError::new(Cause::CheckFailed {
                violation,
                value: raw.clone(),
            })
        })?;
    }
    Ok(Node::Number(leaf))
}

fn construct_selection(schema: &SelectionSchema, raw: &Value) -> Result<Node, SettingsError> {
    let Value::String(value) = raw else {
        return Err(SettingsError::type_mismatch("str", raw_type_name(raw)));
    };
    if !schema.options().iter().any(|option| option == value) {
        return Err(SettingsError::new(Cause::SelectionInvalid {
            allowed: schema.options().to_vec(),
            value: value.clone(),
        }));
    }
    Ok(Node::Selection(value.clone()))
}
