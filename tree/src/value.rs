use std::{collections::BTreeMap, fmt};

use serde_json::Number;

use crate::Token;

/// Target-format pseudo parameters, available in every template without a producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Pseudo {
    AccountId,
    Partition,
    Region,
    StackId,
    StackName,
    UrlSuffix,
}

impl Pseudo {
    pub fn as_str(self) -> &'static str {
        match self {
            Pseudo::AccountId => "AWS::AccountId",
            Pseudo::Partition => "AWS::Partition",
            Pseudo::Region => "AWS::Region",
            Pseudo::StackId => "AWS::StackId",
            Pseudo::StackName => "AWS::StackName",
            Pseudo::UrlSuffix => "AWS::URLSuffix",
        }
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of a string assembled from literals and late-bound values.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Literal(String),
    Token(Token),
    Pseudo(Pseudo),
}

impl From<&str> for Fragment {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for Fragment {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<Token> for Fragment {
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl From<&Token> for Fragment {
    fn from(value: &Token) -> Self {
        Self::Token(value.clone())
    }
}

impl From<Pseudo> for Fragment {
    fn from(value: Pseudo) -> Self {
        Self::Pseudo(value)
    }
}

/// A declaration property value. May embed tokens anywhere in its structure.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Token(Token),
    Pseudo(Pseudo),
    /// A string built from fragments, kept in authored order.
    Concat(Vec<Fragment>),
}

impl Value {
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a string from fragments.
    ///
    /// Nested concatenations are not needed: a `Concat` fragment list is already flat.
    pub fn concat<F: Into<Fragment>>(fragments: impl IntoIterator<Item = F>) -> Self {
        Self::Concat(fragments.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<Token> for Value {
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl From<&Token> for Value {
    fn from(value: &Token) -> Self {
        Self::Token(value.clone())
    }
}

impl From<Pseudo> for Value {
    fn from(value: Pseudo) -> Self {
        Self::Pseudo(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(value: Vec<V>) -> Self {
        Self::list(value)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
