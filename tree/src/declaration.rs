use std::collections::BTreeMap;

use crate::{Token, Value};

/// One emitted resource, owned by exactly one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    resource_type: String,
    properties: BTreeMap<String, Value>,
    depends_on: Vec<Token>,
}

impl Declaration {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: BTreeMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Set a property unless the value is `Null`, which removes it.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Null => {
                self.properties.remove(&name);
            }
            value => {
                self.properties.insert(name, value);
            }
        }
    }

    /// Order this resource after the producer of `token`.
    pub fn depend_on(mut self, token: Token) -> Self {
        self.depends_on.push(token);
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn depends_on(&self) -> &[Token] {
        &self.depends_on
    }
}

/// A document-level input parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDecl {
    pub parameter_type: String,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub allowed_values: Vec<String>,
    pub no_echo: bool,
}

impl ParameterDecl {
    pub fn new(parameter_type: impl Into<String>) -> Self {
        Self {
            parameter_type: parameter_type.into(),
            default: None,
            description: None,
            allowed_values: Vec::new(),
            no_echo: false,
        }
    }
}

/// A document-level output value.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputDecl {
    pub value: Value,
    pub description: Option<String>,
    pub export_name: Option<Value>,
}

impl OutputDecl {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            description: None,
            export_name: None,
        }
    }
}
