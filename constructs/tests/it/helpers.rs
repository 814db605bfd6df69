use std::collections::BTreeSet;

use serde_json::{Value, json};
use tessera_compiler::synthesize;
use tessera_constructs::lambda::{Code, Function, FunctionProps, Runtime};
use tessera_template::{Resource, Template};
use tessera_tree::Tree;

pub const HANDLER: &str = "handlerD35A83A2";
pub const HANDLER_ROLE: &str = "handlerServiceRole1238C31B";

/// A function named `handler` directly under the root.
pub fn handler(tree: &mut Tree) -> Function {
    let root = tree.root();
    Function::new(
        tree,
        root,
        "handler",
        FunctionProps::builder()
            .handler("index.handler")
            .code(Code::inline("boom"))
            .runtime(Runtime::NodeJs20)
            .build(),
    )
    .unwrap()
}

/// Synthesize with default options and check every reference lands on a defined ID.
pub fn synth(tree: &Tree) -> Template {
    let template = synthesize(tree).unwrap().template;
    {
        let defined: BTreeSet<&str> = template.logical_ids().collect();
        for (id, resource) in &template.resources {
            for target in resource.references() {
                assert!(defined.contains(target.as_str()), "{id} refers to undefined {target}");
            }
        }
    }
    template
}

/// Resources of `resource_type` whose properties include every entry of `expected`.
pub fn matching<'a>(
    template: &'a Template,
    resource_type: &'a str,
    expected: &Value,
) -> Vec<(&'a str, &'a Resource)> {
    let expected = expected.as_object().expect("expected properties must be an object");
    template
        .resources_of_type(resource_type)
        .filter(|(_, resource)| {
            expected
                .iter()
                .all(|(name, value)| resource.property(name) == Some(value))
        })
        .collect()
}

pub fn has_resource(template: &Template, resource_type: &str, expected: Value) -> bool {
    !matching(template, resource_type, &expected).is_empty()
}

pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

pub fn lambda_uri(function: &str) -> Value {
    json!({ "Fn::Join": ["", [
        "arn:",
        { "Ref": "AWS::Partition" },
        ":apigateway:",
        { "Ref": "AWS::Region" },
        ":lambda:path/2015-03-31/functions/",
        { "Fn::GetAtt": [function, "Arn"] },
        "/invocations"
    ]] })
}
