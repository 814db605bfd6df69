use bon::Builder;
use tessera_tree::{Construct, ConstructContext, NodeId, Tree, TreeError, Violation};

use super::{ApiResource, Integration, RestApi, RestApiProps};
use crate::lambda::Function;

pub const LAMBDA_REST_API_KIND: &str = "tessera.apigateway.LambdaRestApi";
pub const DEFAULT_INTEGRATION_OPTION: &str = "options.defaultIntegration";

#[derive(Builder, Clone, Debug)]
pub struct LambdaRestApiProps {
    /// Backs every method that does not bring its own integration.
    pub handler: Function,
    /// When set, a greedy proxy with an `ANY` method is added under this path.
    #[builder(into)]
    pub proxy_path: Option<String>,
    /// Must not carry a default integration; the handler's is used.
    #[builder(default)]
    pub options: RestApiProps,
}

/// A REST API whose default integration is a Lambda function.
#[derive(Clone, Debug)]
pub struct LambdaRestApi {
    api: RestApi,
    proxy: Option<ApiResource>,
}

impl LambdaRestApi {
    /// Build the API. A caller-supplied `options.default_integration` is not an error
    /// here; it fails synthesis with a violation on `options.defaultIntegration`.
    pub fn new(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: LambdaRestApiProps,
    ) -> Result<Self, TreeError> {
        let construct = LambdaRestApiNode {
            explicit_default_integration: props.options.default_integration.is_some(),
        };
        let options = RestApiProps {
            default_integration: Some(Integration::lambda(&props.handler)),
            ..props.options
        };
        let api = RestApi::attach(tree, scope, id, options, construct)?;

        let proxy = match props.proxy_path {
            Some(path) => {
                let parent = api.root().resource_for_path(tree, &path)?;
                Some(parent.add_proxy(tree, true)?)
            }
            None => None,
        };
        Ok(Self { api, proxy })
    }

    pub fn api(&self) -> &RestApi {
        &self.api
    }

    pub fn node(&self) -> NodeId {
        self.api.node()
    }

    pub fn root(&self) -> &ApiResource {
        self.api.root()
    }

    /// The `{proxy+}` resource, when a proxy path was given.
    pub fn proxy(&self) -> Option<&ApiResource> {
        self.proxy.as_ref()
    }
}

struct LambdaRestApiNode {
    explicit_default_integration: bool,
}

impl Construct for LambdaRestApiNode {
    fn kind(&self) -> &'static str {
        LAMBDA_REST_API_KIND
    }

    fn validate(&self, _ctx: &ConstructContext<'_>) -> Vec<Violation> {
        if !self.explicit_default_integration {
            return Vec::new();
        }
        vec![Violation::for_option(
            DEFAULT_INTEGRATION_OPTION,
            format!(
                "Cannot specify \"{DEFAULT_INTEGRATION_OPTION}\" since Lambda integration is \
                 automatically defined"
            ),
        )]
    }
}
