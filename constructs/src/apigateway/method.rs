use tessera_tree::{Declaration, NodeId, Token, TokenKind, Tree, TreeError};

use super::{ApiResource, Integration};
use crate::Kind;

pub const METHOD_KIND: &str = "tessera.apigateway.Method";
pub const METHOD_TYPE: &str = "AWS::ApiGateway::Method";

#[derive(Clone, Debug)]
pub struct Method {
    node: NodeId,
    http_method: String,
    method_id: Token,
}

impl Method {
    pub(crate) fn new(
        tree: &mut Tree,
        resource: &ApiResource,
        http_method: &str,
        integration: Option<Integration>,
    ) -> Result<Self, TreeError> {
        let http_method = http_method.to_ascii_uppercase();
        let node = tree.attach(resource.node(), &http_method, Kind(METHOD_KIND))?;

        let integration = integration
            .or_else(|| resource.api().default_integration.clone())
            .unwrap_or_else(Integration::mock);
        tree.add_resource(
            node,
            Declaration::new(METHOD_TYPE)
                .with_property("HttpMethod", http_method.as_str())
                .with_property("ResourceId", resource.resource_id())
                .with_property("RestApiId", &resource.api().rest_api_id)
                .with_property("AuthorizationType", "NONE")
                .with_property("Integration", integration.to_value()),
        )?;

        tracing::trace!(
            path = resource.path(),
            method = %http_method,
            integration = integration.integration_type.as_str(),
            "declared method"
        );
        Ok(Self {
            node,
            method_id: tree.token(node, TokenKind::IdentifierOf)?,
            http_method,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    pub fn method_id(&self) -> Token {
        self.method_id.clone()
    }
}
