use std::{collections::BTreeMap, fmt};

use bon::Builder;
use tessera_tree::{Declaration, Fragment, NodeId, Pseudo, Token, TokenKind, Tree, TreeError, Value};

use crate::{
    Kind, RESOURCE,
    iam::{Role, RoleProps},
};

pub const FUNCTION_KIND: &str = "tessera.lambda.Function";
pub const FUNCTION_TYPE: &str = "AWS::Lambda::Function";

const SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Runtime {
    NodeJs20,
    NodeJs22,
    Python312,
    Python313,
    Java21,
    ProvidedAl2023,
}

impl Runtime {
    pub fn as_str(self) -> &'static str {
        match self {
            Runtime::NodeJs20 => "nodejs20.x",
            Runtime::NodeJs22 => "nodejs22.x",
            Runtime::Python312 => "python3.12",
            Runtime::Python313 => "python3.13",
            Runtime::Java21 => "java21",
            Runtime::ProvidedAl2023 => "provided.al2023",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the function's code comes from. Packaging is someone else's job.
#[derive(Clone, Debug, PartialEq)]
pub enum Code {
    Inline(String),
    S3 { bucket: Value, key: String },
}

impl Code {
    pub fn inline(source: impl Into<String>) -> Self {
        Self::Inline(source.into())
    }

    pub fn s3(bucket: impl Into<Value>, key: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Code::Inline(source) => Value::map([("ZipFile", source.as_str())]),
            Code::S3 { bucket, key } => Value::map([
                ("S3Bucket", bucket.clone()),
                ("S3Key", Value::from(key.as_str())),
            ]),
        }
    }
}

#[derive(Builder, Clone, Debug)]
pub struct FunctionProps {
    /// Entry point, e.g. `index.handler`.
    #[builder(into)]
    pub handler: String,
    pub runtime: Runtime,
    pub code: Code,
    /// Execution role. A `ServiceRole` child is created when absent.
    pub role: Option<Role>,
    pub timeout_seconds: Option<u32>,
    pub memory_size: Option<u32>,
    #[builder(default)]
    pub environment: BTreeMap<String, Value>,
}

#[derive(Clone, Debug)]
pub struct Function {
    node: NodeId,
    resource: NodeId,
    role: Role,
    arn: Token,
    function_name: Token,
}

impl Function {
    pub fn new(
        tree: &mut Tree,
        scope: NodeId,
        id: &str,
        props: FunctionProps,
    ) -> Result<Self, TreeError> {
        let node = tree.attach(scope, id, Kind(FUNCTION_KIND))?;
        let role = match props.role {
            Some(role) => role,
            None => Role::new(
                tree,
                node,
                "ServiceRole",
                RoleProps::builder()
                    .assumed_by(SERVICE_PRINCIPAL)
                    .managed_policy_arns(vec![basic_execution_policy()])
                    .build(),
            )?,
        };

        let resource = tree.scope(node, RESOURCE)?;
        let mut decl = Declaration::new(FUNCTION_TYPE)
            .with_property("Code", props.code.to_value())
            .with_property("Handler", props.handler)
            .with_property("Runtime", props.runtime.as_str())
            .with_property("Role", role.arn())
            .with_property("Timeout", props.timeout_seconds)
            .with_property("MemorySize", props.memory_size)
            .depend_on(role.reference());
        if !props.environment.is_empty() {
            decl.set_property(
                "Environment",
                Value::map([("Variables", Value::Map(props.environment))]),
            );
        }
        tree.add_resource(resource, decl)?;

        tracing::trace!(path = %tree.path(node), runtime = %props.runtime, "declared function");
        Ok(Self {
            node,
            resource,
            role,
            arn: tree.token(resource, TokenKind::AttributeOf("Arn".to_string()))?,
            function_name: tree.token(resource, TokenKind::IdentifierOf)?,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn resource(&self) -> NodeId {
        self.resource
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn arn(&self) -> Token {
        self.arn.clone()
    }

    pub fn function_name(&self) -> Token {
        self.function_name.clone()
    }
}

fn basic_execution_policy() -> Value {
    Value::concat([
        Fragment::from("arn:"),
        Fragment::from(Pseudo::Partition),
        Fragment::from(":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"),
    ])
}
