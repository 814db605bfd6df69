use bon::Builder;
use tessera_tree::{Declaration, NodeId, Token, TokenKind, Tree, TreeError, Value};

use crate::{Kind, RESOURCE};

pub const ROLE_KIND: &str = "tessera.iam.Role";
pub const ROLE_TYPE: &str = "AWS::IAM::Role";

#[derive(Builder, Clone, Debug)]
pub struct RoleProps {
    /// Service principal allowed to assume the role, e.g. `lambda.amazonaws.com`.
    #[builder(into)]
    pub assumed_by: String,
    #[builder(default)]
    pub managed_policy_arns: Vec<Value>,
    #[builder(into)]
    pub path: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Role {
    node: NodeId,
    resource: NodeId,
    reference: Token,
    arn: Token,
}

impl Role {
    pub fn new(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: RoleProps,
    ) -> Result<Self, TreeError> {
        let node = tree.attach(scope, id, Kind(ROLE_KIND))?;
        let resource = tree.scope(node, RESOURCE)?;

        let mut decl = Declaration::new(ROLE_TYPE)
            .with_property("AssumeRolePolicyDocument", assume_role_policy(&props.assumed_by))
            .with_property("Path", props.path);
        if !props.managed_policy_arns.is_empty() {
            decl.set_property("ManagedPolicyArns", props.managed_policy_arns);
        }
        tree.add_resource(resource, decl)?;

        tracing::trace!(path = %tree.path(node), principal = %props.assumed_by, "declared role");
        Ok(Self {
            node,
            resource,
            reference: tree.token(resource, TokenKind::IdentifierOf)?,
            arn: tree.token(resource, TokenKind::AttributeOf("Arn".to_string()))?,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn resource(&self) -> NodeId {
        self.resource
    }

    /// The role's name.
    pub fn reference(&self) -> Token {
        self.reference.clone()
    }

    pub fn arn(&self) -> Token {
        self.arn.clone()
    }
}

fn assume_role_policy(service: &str) -> Value {
    Value::map([
        ("Version", Value::from("2012-10-17")),
        (
            "Statement",
            Value::list([Value::map([
                ("Action", Value::from("sts:AssumeRole")),
                ("Effect", Value::from("Allow")),
                ("Principal", Value::map([("Service", service)])),
            ])]),
        ),
    ])
}
