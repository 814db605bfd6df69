use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REF: &str = "Ref";
pub const GET_ATT: &str = "Fn::GetAtt";
pub const JOIN: &str = "Fn::Join";

/// Native cross-reference expressions of the target format.
#[derive(Clone, Debug, PartialEq)]
pub enum Intrinsic {
    /// `{"Ref": id}`: a resource's identifier, a parameter's value or a pseudo parameter.
    Ref(String),
    GetAtt {
        logical_id: String,
        attribute: String,
    },
    Join {
        delimiter: String,
        parts: Vec<Value>,
    },
}

impl Intrinsic {
    pub fn reference(target: impl Into<String>) -> Self {
        Self::Ref(target.into())
    }

    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join(parts: Vec<Value>) -> Self {
        Self::Join {
            delimiter: String::new(),
            parts,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match self {
            Self::Ref(target) => {
                map.insert(REF.to_string(), Value::String(target.clone()));
            }
            Self::GetAtt {
                logical_id,
                attribute,
            } => {
                map.insert(
                    GET_ATT.to_string(),
                    Value::Array(vec![
                        Value::String(logical_id.clone()),
                        Value::String(attribute.clone()),
                    ]),
                );
            }
            Self::Join { delimiter, parts } => {
                map.insert(
                    JOIN.to_string(),
                    Value::Array(vec![
                        Value::String(delimiter.clone()),
                        Value::Array(parts.clone()),
                    ]),
                );
            }
        }
        Value::Object(map)
    }

    /// Recognize a single-key intrinsic object. Anything else is plain data.
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        if map.len() != 1 {
            return None;
        }
        let (key, inner) = map.iter().next()?;
        match (key.as_str(), inner) {
            (REF, Value::String(target)) => Some(Self::Ref(target.clone())),
            (GET_ATT, Value::Array(args)) => match args.as_slice() {
                [Value::String(logical_id), Value::String(attribute)] => {
                    Some(Self::get_att(logical_id.clone(), attribute.clone()))
                }
                _ => None,
            },
            (JOIN, Value::Array(args)) => match args.as_slice() {
                [Value::String(delimiter), Value::Array(parts)] => Some(Self::Join {
                    delimiter: delimiter.clone(),
                    parts: parts.clone(),
                }),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Logical IDs referenced by `Ref`/`Fn::GetAtt` anywhere inside `value`.
///
/// Pseudo parameters (`AWS::...`) are not logical IDs and are skipped.
pub fn referenced_ids(value: &Value, out: &mut BTreeSet<String>) {
    match Intrinsic::from_value(value) {
        Some(Intrinsic::Ref(target)) => {
            if !target.contains("::") {
                out.insert(target);
            }
        }
        Some(Intrinsic::GetAtt { logical_id, .. }) => {
            out.insert(logical_id);
        }
        Some(Intrinsic::Join { parts, .. }) => {
            for part in &parts {
                referenced_ids(part, out);
            }
        }
        None => match value {
            Value::Array(items) => items.iter().for_each(|item| referenced_ids(item, out)),
            Value::Object(map) => map.values().for_each(|item| referenced_ids(item, out)),
            _ => {}
        },
    }
}

/// The synthesized document. Section order is construct-tree pre-order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resources: IndexMap<String, Resource>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, Output>,
}

impl Template {
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
            .map(|(id, r)| (id.as_str(), r))
    }

    /// Every logical ID defined in any section, in document order.
    pub fn logical_ids(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .keys()
            .chain(self.resources.keys())
            .chain(self.outputs.keys())
            .map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties: BTreeMap::new(),
            depends_on: Vec::new(),
            metadata: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Logical IDs this resource refers to through properties or `DependsOn`.
    pub fn references(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for value in self.properties.values() {
            referenced_ids(value, &mut out);
        }
        out.extend(self.depends_on.iter().cloned());
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_echo: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Output {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Export {
    pub name: Value,
}
