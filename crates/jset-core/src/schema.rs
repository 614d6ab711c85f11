//! # Schema Descriptors
//!
//! A schema is an explicit, ordered descriptor registered once and shared
//! behind an [`Arc`]. There are six variants:
//!
//! - **Record**: an ordered list of `(field name, field type)` pairs plus
//!   an optional cross-field consistency check.
//! - **Sequence**: a homogeneous ordered list of one element type.
//! - **Keyed**: a homogeneous string-keyed map of one element type.
//! - **Terminal**: one primitive scalar plus an optional value check.
//! - **Number**: a numeric terminal that may also hold an explicit array or
//!   an interpolated range, plus an optional value check.
//! - **Selection**: a string constrained to a declared set of options.
//!
//! Field and element types are a closed union over
//! [`FieldType::Primitive`] and [`FieldType::Schema`], resolved when the
//! descriptor is built rather than on every validation call.
//!
//! Builders return [`SchemaContractError`] when the declaration is missing
//! or malformed. Data errors are only ever raised by
//! [`Schema::validate`] / [`Schema::construct`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::engine;
use crate::error::{CheckViolation, SchemaContractError, SettingsError};
use crate::node::{Node, Record, Settings};
use crate::value::{NumberValue, NumericKind, PrimitiveKind, Scalar};

/// A custom check run on a leaf's value after assignment.
pub type Check<T> = Arc<dyn Fn(&T) -> Result<(), CheckViolation> + Send + Sync>;

/// A cross-field check run on a record after all fields are assigned.
pub type ConsistencyCheck = Arc<dyn Fn(&Record) -> Result<(), String> + Send + Sync>;

/// The declared type of a record field or collection element.
#[derive(Clone)]
pub enum FieldType {
    /// A built-in primitive, checked by instance.
    Primitive(PrimitiveKind),
    /// Another schema, validated recursively.
    Schema(Arc<Schema>),
}

impl FieldType {
    /// Name used in error messages and debug output.
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Schema(schema) => schema.name(),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "Primitive({kind})"),
            Self::Schema(schema) => write!(f, "Schema({})", schema.name()),
        }
    }
}

impl From<PrimitiveKind> for FieldType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<Arc<Schema>> for FieldType {
    fn from(schema: Arc<Schema>) -> Self {
        Self::Schema(schema)
    }
}

impl From<&Arc<Schema>> for FieldType {
    fn from(schema: &Arc<Schema>) -> Self {
        Self::Schema(Arc::clone(schema))
    }
}

/// A registered schema descriptor.
pub struct Schema {
    name: String,
    kind: SchemaKind,
}

/// The variant-specific part of a [`Schema`].
pub enum SchemaKind {
    /// A named bundle of fields.
    Record(RecordSchema),
    /// A homogeneous sequence.
    Sequence(FieldType),
    /// A homogeneous string-keyed collection.
    Keyed(FieldType),
    /// A single primitive scalar.
    Terminal(TerminalSchema),
    /// A numeric scalar, array, or range.
    Number(NumberSchema),
    /// A string from a fixed set.
    Selection(SelectionSchema),
}

/// Fields and consistency check of a record schema.
pub struct RecordSchema {
    fields: Vec<(String, FieldType)>,
    consistency: Option<ConsistencyCheck>,
}

impl RecordSchema {
    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    pub(crate) fn consistency(&self) -> Option<&ConsistencyCheck> {
        self.consistency.as_ref()
    }
}

/// Value type and check of a terminal schema.
pub struct TerminalSchema {
    kind: PrimitiveKind,
    check: Option<Check<Scalar>>,
}

impl TerminalSchema {
    /// The declared value type.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub(crate) fn check(&self) -> Option<&Check<Scalar>> {
        self.check.as_ref()
    }
}

/// Value type and check of a numeric schema.
pub struct NumberSchema {
    kind: NumericKind,
    check: Option<Check<NumberValue>>,
}

impl NumberSchema {
    /// The declared numeric type.
    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub(crate) fn check(&self) -> Option<&Check<NumberValue>> {
        self.check.as_ref()
    }
}

/// Allowed values of a selection schema.
pub struct SelectionSchema {
    options: Vec<String>,
}

impl SelectionSchema {
    /// The allowed values, in declaration order.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl Schema {
    /// Start declaring a record schema.
    pub fn record(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
            consistency: None,
        }
    }

    /// Start declaring a homogeneous sequence schema.
    pub fn sequence(name: impl Into<String>) -> CollectionBuilder {
        CollectionBuilder {
            name: name.into(),
            keyed: false,
            element: None,
        }
    }

    /// Start declaring a homogeneous keyed collection schema.
    pub fn keyed(name: impl Into<String>) -> CollectionBuilder {
        CollectionBuilder {
            name: name.into(),
            keyed: true,
            element: None,
        }
    }

    /// Start declaring a terminal leaf schema.
    pub fn terminal(name: impl Into<String>) -> TerminalBuilder {
        TerminalBuilder {
            name: name.into(),
            kind: None,
            check: None,
        }
    }

    /// Start declaring a numeric leaf schema.
    pub fn number(name: impl Into<String>) -> NumberBuilder {
        NumberBuilder {
            name: name.into(),
            kind: None,
            check: None,
        }
    }

    /// Start declaring a string-selection leaf schema.
    pub fn selection(name: impl Into<String>) -> SelectionBuilder {
        SelectionBuilder {
            name: name.into(),
            options: None,
        }
    }

    /// The schema's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variant-specific descriptor.
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Validate `raw` against this schema, producing a node.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] whose route leads from this schema's
    /// node to the first failing node.
    pub fn construct(&self, raw: &Value) -> Result<Node, SettingsError> {
        engine::construct(self, raw)
    }

    /// Validate `raw` against this schema and retain `raw` alongside the
    /// validated graph.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] on the first validation failure.
    pub fn validate(self: &Arc<Self>, raw: &Value) -> Result<Settings, SettingsError> {
        match self.construct(raw) {
            Ok(root) => Ok(Settings::new(Arc::clone(self), root, raw.clone())),
            Err(err) => {
                tracing::debug!(schema = %self.name, error = %err, "settings validation failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Schema");
        s.field("name", &self.name);
        match &self.kind {
            SchemaKind::Record(record) => s.field("fields", &record.fields),
            SchemaKind::Sequence(element) => s.field("sequence_of", element),
            SchemaKind::Keyed(element) => s.field("keyed_of", element),
            SchemaKind::Terminal(terminal) => s.field("terminal", &terminal.kind),
            SchemaKind::Number(number) => s.field("number", &number.kind),
            SchemaKind::Selection(selection) => s.field("options", &selection.options),
        };
        s.finish()
    }
}

fn check_name(name: &str) -> Result<(), SchemaContractError> {
    if name.is_empty() {
        return Err(SchemaContractError::EmptyName);
    }
    Ok(())
}

fn finish(name: String, kind: SchemaKind) -> Arc<Schema> {
    Arc::new(Schema { name, kind })
}

/// Builder for [`SchemaKind::Record`].
pub struct RecordBuilder {
    name: String,
    fields: Vec<(String, FieldType)>,
    consistency: Option<ConsistencyCheck>,
}

impl RecordBuilder {
    /// Declare the next field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        self.fields.push((name.into(), ty.into()));
        self
    }

    /// Declare a cross-field check run after every field is assigned.
    #[must_use]
    pub fn consistency<F>(mut self, check: F) -> Self
    where
        F: Fn(&Record) -> Result<(), String> + Send + Sync + 'static,
    {
        self.consistency = Some(Arc::new(check));
        self
    }

    /// Register the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaContractError::DuplicateField`] if a field name is
    /// declared twice.
    pub fn build(self) -> Result<Arc<Schema>, SchemaContractError> {
        check_name(&self.name)?;
        let mut seen = HashSet::new();
        for (field, _) in &self.fields {
            if !seen.insert(field.as_str()) {
                return Err(SchemaContractError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.clone(),
                });
            }
        }
        Ok(finish(
            self.name,
            SchemaKind::Record(RecordSchema {
                fields: self.fields,
                consistency: self.consistency,
            }),
        ))
    }
}

/// Builder for [`SchemaKind::Sequence`] and [`SchemaKind::Keyed`].
pub struct CollectionBuilder {
    name: String,
    keyed: bool,
    element: Option<FieldType>,
}

impl CollectionBuilder {
    /// Declare the element type.
    #[must_use]
    pub fn element(mut self, ty: impl Into<FieldType>) -> Self {
        self.element = Some(ty.into());
        self
    }

    /// Register the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaContractError::TypeNotDeclared`] if no element type
    /// was declared.
    pub fn build(self) -> Result<Arc<Schema>, SchemaContractError> {
        check_name(&self.name)?;
        let element = self.element.ok_or_else(|| SchemaContractError::TypeNotDeclared {
            schema: self.name.clone(),
        })?;
        let kind = if self.keyed {
            SchemaKind::Keyed(element)
        } else {
            SchemaKind::Sequence(element)
        };
        Ok(finish(self.name, kind))
    }
}

/// Builder for [`SchemaKind::Terminal`].
pub struct TerminalBuilder {
    name: String,
    kind: Option<PrimitiveKind>,
    check: Option<Check<Scalar>>,
}

impl TerminalBuilder {
    /// Declare the value type.
    #[must_use]
    pub fn value_type(mut self, kind: PrimitiveKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Declare the check run on the assigned value.
    #[must_use]
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Scalar) -> Result<(), CheckViolation> + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(check));
        self
    }

    /// Register the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaContractError::TypeNotDeclared`] if no value type
    /// was declared.
    pub fn build(self) -> Result<Arc<Schema>, SchemaContractError> {
        check_name(&self.name)?;
        let kind = self.kind.ok_or_else(|| SchemaContractError::TypeNotDeclared {
            schema: self.name.clone(),
        })?;
        Ok(finish(
            self.name,
            SchemaKind::Terminal(TerminalSchema {
                kind,
                check: self.check,
            }),
        ))
    }
}

/// Builder for [`SchemaKind::Number`].
pub struct NumberBuilder {
    name: String,
    kind: Option<PrimitiveKind>,
    check: Option<Check<NumberValue>>,
}

impl NumberBuilder {
    /// Declare the value type. Must be [`PrimitiveKind::Integer`] or
    /// [`PrimitiveKind::Float`].
    #[must_use]
    pub fn value_type(mut self, kind: PrimitiveKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Declare the check run on the assigned value. For arrays and ranges
    /// the check sees every sample.
    #[must_use]
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&NumberValue) -> Result<(), CheckViolation> + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(check));
        self
    }

    /// Declare a prebuilt check, such as one from [`crate::bounds`].
    #[must_use]
    pub fn with_check(mut self, check: Check<NumberValue>) -> Self {
        self.check = Some(check);
        self
    }

    /// Register the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaContractError::TypeNotDeclared`] if no value type was
    /// declared, or [`SchemaContractError::TypeMalformed`] if it is not
    /// numeric.
    pub fn build(self) -> Result<Arc<Schema>, SchemaContractError> {
        check_name(&self.name)?;
        let declared = self.kind.ok_or_else(|| SchemaContractError::TypeNotDeclared {
            schema: self.name.clone(),
        })?;
        let kind = declared.numeric().ok_or_else(|| SchemaContractError::TypeMalformed {
            schema: self.name.clone(),
            declared: declared.name().to_string(),
            accepted: "int, float".to_string(),
        })?;
        Ok(finish(
            self.name,
            SchemaKind::Number(NumberSchema {
                kind,
                check: self.check,
            }),
        ))
    }
}

/// Builder for [`SchemaKind::Selection`].
pub struct SelectionBuilder {
    name: String,
    options: Option<Vec<String>>,
}

impl SelectionBuilder {
    /// Declare the allowed values.
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Register the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaContractError::OptionsNotDeclared`] if no options were
    /// declared, or [`SchemaContractError::OptionsMalformed`] if the list is
    /// empty or repeats a value.
    pub fn build(self) -> Result<Arc<Schema>, SchemaContractError> {
        check_name(&self.name)?;
        let options = self.options.ok_or_else(|| SchemaContractError::OptionsNotDeclared {
            schema: self.name.clone(),
        })?;
        let distinct: HashSet<&str> = options.iter().map(String::as_str).collect();
        if options.is_empty() || distinct.len() != options.len() {
            return Err(SchemaContractError::OptionsMalformed { schema: self.name });
        }
        Ok(finish(self.name, SchemaKind::Selection(SelectionSchema { options })))
    }
}
