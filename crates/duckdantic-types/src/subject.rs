//! Subjects — the inputs a structural check runs against.
//!
//! A subject is one of a fixed set of tagged categories: a key/value
//! mapping, a class-like definition, or an instance carrying a reference to
//! its class. Opaque scalars (strings, bytes, numbers) are a fourth tag so
//! that providers can reject them explicitly instead of treating them as
//! structured data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fields::FieldAliasSet;
use crate::typedesc::TypeDesc;

/// Declared field metadata on a class-like definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeDesc,
    /// True when the field has no default.
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "FieldAliasSet::is_empty", default)]
    pub aliases: FieldAliasSet,
}

/// Declared callable on a class-like definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    /// Number of declared parameters.
    pub arity: usize,
}

/// A class-like definition: a named shape of declared fields and methods.
///
/// Instances are normalized through their class, so the class definition is
/// the unit of subject type identity for caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl ClassDef {
    pub fn builder(name: impl Into<String>) -> ClassDefBuilder {
        ClassDefBuilder {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Look up a declared method by exact name.
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Builder for [`ClassDef`] (keeps test fixtures readable).
pub struct ClassDefBuilder {
    name: String,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
}

impl ClassDefBuilder {
    /// Add a required field with no default.
    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            required: true,
            default: None,
            aliases: FieldAliasSet::new(),
        });
        self
    }

    /// Add an optional field with a default value.
    pub fn optional_field(
        mut self,
        name: impl Into<String>,
        ty: TypeDesc,
        default: serde_json::Value,
    ) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            required: false,
            default: Some(default),
            aliases: FieldAliasSet::new(),
        });
        self
    }

    /// Add a field with explicit aliases.
    pub fn aliased_field(
        mut self,
        name: impl Into<String>,
        ty: TypeDesc,
        aliases: FieldAliasSet,
    ) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty,
            required: true,
            default: None,
            aliases,
        });
        self
    }

    /// Add a declared method.
    pub fn method(mut self, name: impl Into<String>, arity: usize) -> Self {
        self.methods.push(MethodDecl {
            name: name.into(),
            arity,
        });
        self
    }

    pub fn build(self) -> Arc<ClassDef> {
        Arc::new(ClassDef {
            name: self.name,
            fields: self.fields,
            methods: self.methods,
        })
    }
}

/// A subject to be normalized and matched.
#[derive(Debug, Clone)]
pub enum Subject {
    /// Key/value mapping (e.g. a deserialized JSON object).
    Mapping(serde_json::Map<String, serde_json::Value>),
    /// Class-like definition; normalized from its declared metadata.
    Class(Arc<ClassDef>),
    /// Instance of a class; normalized by its class, never by a snapshot of
    /// the instance's momentary state.
    Instance {
        class: Arc<ClassDef>,
        value: serde_json::Value,
    },
    /// Opaque scalar (string, bytes, number). No provider accepts these.
    Scalar(serde_json::Value),
}

impl Subject {
    /// Build a subject from a JSON value: objects become mappings,
    /// everything else is an opaque scalar.
    pub fn from_json(value: serde_json::Value) -> Subject {
        match value {
            serde_json::Value::Object(map) => Subject::Mapping(map),
            other => Subject::Scalar(other),
        }
    }

    /// Short tag for error messages and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Subject::Mapping(_) => "mapping",
            Subject::Class(_) => "class",
            Subject::Instance { .. } => "instance",
            Subject::Scalar(_) => "scalar",
        }
    }

    /// The class definition backing this subject, when there is one.
    pub fn class_def(&self) -> Option<&Arc<ClassDef>> {
        match self {
            Subject::Class(class) => Some(class),
            Subject::Instance { class, .. } => Some(class),
            _ => None,
        }
    }
}
