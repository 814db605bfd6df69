use tessera_tree::{Declaration, NodeId, Token, TokenKind, Tree, TreeError, Value};

use super::{Integration, Method};
use crate::Kind;

pub const RESOURCE_KIND: &str = "tessera.apigateway.Resource";
pub const RESOURCE_TYPE: &str = "AWS::ApiGateway::Resource";

const PROXY_PATH_PART: &str = "{proxy+}";

/// What every resource and method of one API needs to know about it.
#[derive(Clone, Debug)]
pub(crate) struct ApiContext {
    pub(crate) rest_api_id: Token,
    pub(crate) default_integration: Option<Integration>,
}

/// A path in an API's route table. The API root is the API node itself.
#[derive(Clone, Debug)]
pub struct ApiResource {
    node: NodeId,
    resource_id: Token,
    path: String,
    api: ApiContext,
}

impl ApiResource {
    pub(crate) fn root(node: NodeId, resource_id: Token, api: ApiContext) -> Self {
        Self {
            node,
            resource_id,
            path: "/".to_string(),
            api,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Token for this resource's identifier, as methods and child resources use it.
    pub fn resource_id(&self) -> Token {
        self.resource_id.clone()
    }

    /// The URL path, e.g. `/backend/v2`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn api(&self) -> &ApiContext {
        &self.api
    }

    /// Add a child resource. The construct is named after `path_part`, with characters
    /// reserved in construct names replaced by `_`; `PathPart` keeps the raw segment.
    pub fn add_resource(&self, tree: &mut Tree, path_part: &str) -> Result<Self, TreeError> {
        self.child(tree, &node_name(path_part), path_part)
    }

    /// Add a greedy `{proxy+}` resource, optionally with an `ANY` method using the
    /// API's default integration.
    pub fn add_proxy(&self, tree: &mut Tree, any_method: bool) -> Result<Self, TreeError> {
        let proxy = self.child(tree, "proxy", PROXY_PATH_PART)?;
        if any_method {
            proxy.add_method(tree, "ANY", None)?;
        }
        Ok(proxy)
    }

    /// Add a method. Without an explicit integration the API's default is used, or a
    /// mock when the API has none.
    pub fn add_method(
        &self,
        tree: &mut Tree,
        http_method: &str,
        integration: Option<Integration>,
    ) -> Result<Method, TreeError> {
        Method::new(tree, self, http_method, integration)
    }

    /// Walk `path` segment by segment, reusing existing resources and creating the rest.
    pub fn resource_for_path(&self, tree: &mut Tree, path: &str) -> Result<Self, TreeError> {
        let mut current = self.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current = match tree.child(current.node, &node_name(segment)) {
                Some(existing) if serves(tree, existing, segment) => Self {
                    node: existing,
                    resource_id: tree.token(existing, TokenKind::IdentifierOf)?,
                    path: current.child_path(segment),
                    api: current.api.clone(),
                },
                _ => current.add_resource(tree, segment)?,
            };
        }
        Ok(current)
    }

    fn child(&self, tree: &mut Tree, name: &str, path_part: &str) -> Result<Self, TreeError> {
        let node = tree.attach(self.node, name, Kind(RESOURCE_KIND))?;
        tree.add_resource(
            node,
            Declaration::new(RESOURCE_TYPE)
                .with_property("ParentId", self.resource_id())
                .with_property("PathPart", path_part)
                .with_property("RestApiId", &self.api.rest_api_id),
        )?;

        let path = self.child_path(path_part);
        tracing::trace!(node = %tree.path(node), %path, "declared api resource");
        Ok(Self {
            node,
            resource_id: tree.token(node, TokenKind::IdentifierOf)?,
            path,
            api: self.api.clone(),
        })
    }

    fn child_path(&self, path_part: &str) -> String {
        if self.path == "/" {
            format!("/{path_part}")
        } else {
            format!("{}/{path_part}", self.path)
        }
    }
}

fn node_name(path_part: &str) -> String {
    path_part.replace(['.', '#'], "_")
}

/// Whether `node` is an API resource for exactly `path_part`.
fn serves(tree: &Tree, node: NodeId, path_part: &str) -> bool {
    let node = tree.node(node);
    node.kind() == Some(RESOURCE_KIND)
        && node
            .declarations()
            .first()
            .and_then(|decl| decl.property("PathPart"))
            == Some(&Value::from(path_part))
}
