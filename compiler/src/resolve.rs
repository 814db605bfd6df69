use std::collections::HashMap;

use serde_json::Value as Json;
use tessera_template::Intrinsic;
use tessera_tree::{ConstructPath, Fragment, NodeId, Token, TokenKind, Tree, Value};

use crate::{
    LogicalId,
    error::{DanglingReason, UnresolvableReferenceError, UnresolvableReferences},
};

/// Logical IDs assigned to one node's template entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeAllocation {
    /// One per declaration, in declaration order.
    pub resources: Vec<LogicalId>,
    pub parameter: Option<LogicalId>,
    pub output: Option<LogicalId>,
}

#[derive(Clone, Debug, Default)]
pub struct Allocations {
    nodes: HashMap<NodeId, NodeAllocation>,
}

impl Allocations {
    pub fn get(&self, node: NodeId) -> Option<&NodeAllocation> {
        self.nodes.get(&node)
    }

    pub fn entry(&mut self, node: NodeId) -> &mut NodeAllocation {
        self.nodes.entry(node).or_default()
    }
}

/// Replaces tokens in property values with native expressions.
#[derive(Clone, Copy, Debug)]
pub struct ExpressionResolver<'a> {
    tree: &'a Tree,
    allocations: &'a Allocations,
}

impl<'a> ExpressionResolver<'a> {
    pub fn new(tree: &'a Tree, allocations: &'a Allocations) -> Self {
        Self { tree, allocations }
    }

    /// Resolve `value` as it appears in a declaration owned by `consumer`.
    ///
    /// Reports every dangling token in the value, not only the first.
    pub fn resolve(
        &self,
        consumer: &ConstructPath,
        value: &Value,
    ) -> Result<Json, UnresolvableReferences> {
        let mut errors = Vec::new();
        let resolved = self.resolve_into(consumer, value, &mut errors);
        if errors.is_empty() {
            Ok(resolved)
        } else {
            Err(UnresolvableReferences { errors })
        }
    }

    /// Like [`Self::resolve`], appending failures to `errors` instead of returning them.
    ///
    /// The returned value is only meaningful when nothing was appended.
    pub(crate) fn resolve_into(
        &self,
        consumer: &ConstructPath,
        value: &Value,
        errors: &mut Vec<UnresolvableReferenceError>,
    ) -> Json {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => Json::Number(n.clone()),
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.resolve_into(consumer, item, errors))
                    .collect(),
            ),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_into(consumer, v, errors)))
                    .collect(),
            ),
            Value::Token(token) => self.token_or_record(consumer, token, errors),
            Value::Pseudo(pseudo) => Intrinsic::reference(pseudo.as_str()).to_value(),
            Value::Concat(fragments) => self.concat(consumer, fragments, errors),
        }
    }

    fn concat(
        &self,
        consumer: &ConstructPath,
        fragments: &[Fragment],
        errors: &mut Vec<UnresolvableReferenceError>,
    ) -> Json {
        let parts: Vec<Json> = fragments
            .iter()
            .filter(|fragment| !matches!(fragment, Fragment::Literal(lit) if lit.is_empty()))
            .map(|fragment| match fragment {
                Fragment::Literal(lit) => Json::String(lit.clone()),
                Fragment::Token(token) => self.token_or_record(consumer, token, errors),
                Fragment::Pseudo(pseudo) => Intrinsic::reference(pseudo.as_str()).to_value(),
            })
            .collect();

        if parts.iter().all(Json::is_string) {
            let joined: String = parts.iter().filter_map(Json::as_str).collect();
            return Json::String(joined);
        }
        if let [single] = parts.as_slice() {
            return single.clone();
        }
        Intrinsic::join(parts).to_value()
    }

    fn token_or_record(
        &self,
        consumer: &ConstructPath,
        token: &Token,
        errors: &mut Vec<UnresolvableReferenceError>,
    ) -> Json {
        match self.token(token) {
            Ok(expr) => expr.to_value(),
            Err(reason) => {
                errors.push(dangling(consumer, token, reason));
                Json::Null
            }
        }
    }

    fn token(&self, token: &Token) -> Result<Intrinsic, DanglingReason> {
        match token.kind() {
            TokenKind::IdentifierOf => Ok(Intrinsic::reference(self.resource_id(token)?.as_str())),
            TokenKind::AttributeOf(attribute) => Ok(Intrinsic::get_att(
                self.resource_id(token)?.as_str(),
                attribute.as_str(),
            )),
            TokenKind::ValueOf => {
                let allocation = self.producer(token)?;
                let id = allocation
                    .parameter
                    .as_ref()
                    .ok_or(DanglingReason::NoParameter)?;
                Ok(Intrinsic::reference(id.as_str()))
            }
        }
    }

    /// The logical ID a dependency on `token`'s producer points at.
    pub(crate) fn dependency(
        &self,
        consumer: &ConstructPath,
        token: &Token,
    ) -> Result<LogicalId, UnresolvableReferenceError> {
        self.resource_id(token)
            .cloned()
            .map_err(|reason| dangling(consumer, token, reason))
    }

    fn resource_id(&self, token: &Token) -> Result<&'a LogicalId, DanglingReason> {
        self.producer(token)?
            .resources
            .first()
            .ok_or(DanglingReason::NoResource)
    }

    fn producer(&self, token: &Token) -> Result<&'a NodeAllocation, DanglingReason> {
        if token.origin() != self.tree.id() {
            return Err(DanglingReason::ForeignTree(token.origin()));
        }
        let node = self
            .tree
            .find(token.producer())
            .ok_or(DanglingReason::UnknownProducer)?;
        self.allocations.get(node).ok_or(match token.kind() {
            TokenKind::ValueOf => DanglingReason::NoParameter,
            _ => DanglingReason::NoResource,
        })
    }
}

fn dangling(
    consumer: &ConstructPath,
    token: &Token,
    reason: DanglingReason,
) -> UnresolvableReferenceError {
    UnresolvableReferenceError {
        consumer: consumer.clone(),
        producer: token.producer().clone(),
        token: token.to_string(),
        reason,
    }
}
