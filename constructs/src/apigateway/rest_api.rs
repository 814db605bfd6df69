use bon::Builder;
use tessera_tree::{
    Construct, ConstructContext, Declaration, Fragment, NodeId, OutputDecl, Pseudo, Token,
    TokenKind, Tree, TreeError, Value,
};

use super::{ApiResource, Integration, METHOD_KIND, resource::ApiContext};
use crate::{Kind, RESOURCE};

pub const REST_API_KIND: &str = "tessera.apigateway.RestApi";
pub const REST_API_TYPE: &str = "AWS::ApiGateway::RestApi";
pub const DEPLOYMENT_KIND: &str = "tessera.apigateway.Deployment";
pub const DEPLOYMENT_TYPE: &str = "AWS::ApiGateway::Deployment";
pub const STAGE_TYPE: &str = "AWS::ApiGateway::Stage";
pub const DEFAULT_STAGE_NAME: &str = "prod";

#[derive(Builder, Clone, Debug)]
pub struct RestApiProps {
    /// Defaults to the construct name.
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub description: Option<String>,
    /// Create a deployment, a stage and an `Endpoint` output.
    #[builder(default = true)]
    pub deploy: bool,
    #[builder(into, default = DEFAULT_STAGE_NAME.to_string())]
    pub stage_name: String,
    /// Integration used by methods added without one.
    pub default_integration: Option<Integration>,
}

impl Default for RestApiProps {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Clone, Debug)]
pub struct RestApi {
    node: NodeId,
    resource: NodeId,
    rest_api_id: Token,
    root: ApiResource,
    deployment: Option<NodeId>,
    url: Option<Value>,
}

impl RestApi {
    pub fn new(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: RestApiProps,
    ) -> Result<Self, TreeError> {
        Self::attach(tree, scope, id, props, Kind(REST_API_KIND))
    }

    /// Build the API on a node carrying `construct`, so wrappers can add their own checks.
    pub(crate) fn attach(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: RestApiProps,
        construct: impl Construct,
    ) -> Result<Self, TreeError> {
        let node = tree.attach(scope, id, construct)?;
        let resource = tree.scope(node, RESOURCE)?;
        tree.add_resource(
            resource,
            Declaration::new(REST_API_TYPE)
                .with_property("Name", props.name.unwrap_or_else(|| id.to_string()))
                .with_property("Description", props.description.clone()),
        )?;

        let rest_api_id = tree.token(resource, TokenKind::IdentifierOf)?;
        let root = ApiResource::root(
            node,
            tree.token(resource, TokenKind::AttributeOf("RootResourceId".to_string()))?,
            ApiContext {
                rest_api_id: rest_api_id.clone(),
                default_integration: props.default_integration,
            },
        );

        let mut api = Self {
            node,
            resource,
            rest_api_id,
            root,
            deployment: None,
            url: None,
        };
        if props.deploy {
            api.deploy(tree, props.description, &props.stage_name)?;
        }
        Ok(api)
    }

    fn deploy(
        &mut self,
        tree: &mut Tree,
        description: Option<String>,
        stage_name: &str,
    ) -> Result<(), TreeError> {
        let deployment = tree.attach(
            self.node,
            "Deployment",
            Deployment {
                api: self.node,
                rest_api_id: self.rest_api_id.clone(),
                description,
            },
        )?;

        let stage = tree.scope(self.node, "DeploymentStage")?;
        tree.add_resource(
            stage,
            Declaration::new(STAGE_TYPE)
                .with_property("RestApiId", &self.rest_api_id)
                .with_property("DeploymentId", tree.token(deployment, TokenKind::IdentifierOf)?)
                .with_property("StageName", stage_name),
        )?;

        let url = Value::concat([
            Fragment::from("https://"),
            Fragment::from(&self.rest_api_id),
            Fragment::from(".execute-api."),
            Fragment::from(Pseudo::Region),
            Fragment::from("."),
            Fragment::from(Pseudo::UrlSuffix),
            Fragment::from(format!("/{stage_name}/")),
        ]);
        let endpoint = tree.scope(self.node, "Endpoint")?;
        tree.add_output(endpoint, OutputDecl::new(url.clone()))?;

        self.deployment = Some(deployment);
        self.url = Some(url);
        Ok(())
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn resource(&self) -> NodeId {
        self.resource
    }

    pub fn rest_api_id(&self) -> Token {
        self.rest_api_id.clone()
    }

    pub fn root(&self) -> &ApiResource {
        &self.root
    }

    pub fn deployment(&self) -> Option<NodeId> {
        self.deployment
    }

    /// Invoke URL of the deployed stage; `None` when the API is not deployed.
    pub fn url(&self) -> Option<&Value> {
        self.url.as_ref()
    }
}

/// Emitted lazily: it must depend on every method, including ones added after the API.
struct Deployment {
    api: NodeId,
    rest_api_id: Token,
    description: Option<String>,
}

impl Construct for Deployment {
    fn kind(&self) -> &'static str {
        DEPLOYMENT_KIND
    }

    fn declarations(&self, ctx: &ConstructContext<'_>) -> Vec<Declaration> {
        let mut decl = Declaration::new(DEPLOYMENT_TYPE)
            .with_property("RestApiId", &self.rest_api_id)
            .with_property("Description", self.description.clone());
        for method in ctx
            .tree()
            .walk(self.api)
            .filter(|node| node.kind() == Some(METHOD_KIND))
        {
            decl = decl.depend_on(method.token(TokenKind::IdentifierOf));
        }
        vec![decl]
    }
}
