use bon::Builder;
use tessera_tree::{NodeId, ParameterDecl, Token, TokenKind, Tree, TreeError, Value};

/// A document parameter, supplied when the template is deployed.
#[derive(Builder, Clone, Debug)]
pub struct CfnParameterProps {
    #[builder(into, default = "String".to_string())]
    pub parameter_type: String,
    #[builder(into)]
    pub default: Option<Value>,
    #[builder(into)]
    pub description: Option<String>,
    #[builder(default)]
    pub allowed_values: Vec<String>,
    #[builder(default)]
    pub no_echo: bool,
}

#[derive(Clone, Debug)]
pub struct CfnParameter {
    node: NodeId,
    value: Token,
}

impl CfnParameter {
    pub fn new(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: CfnParameterProps,
    ) -> Result<Self, TreeError> {
        let node = tree.scope(scope, id)?;
        tree.add_parameter(
            node,
            ParameterDecl {
                parameter_type: props.parameter_type,
                default: props.default,
                description: props.description,
                allowed_values: props.allowed_values,
                no_echo: props.no_echo,
            },
        )?;
        Ok(Self {
            node,
            value: tree.token(node, TokenKind::ValueOf)?,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The value supplied at deploy time.
    pub fn value(&self) -> Token {
        self.value.clone()
    }
}
