use std::collections::BTreeMap;

use serde_json::json;
use tessera_constructs::{
    CfnParameter, CfnParameterProps,
    iam::{ROLE_TYPE, Role, RoleProps},
    lambda::{Code, FUNCTION_TYPE, Function, FunctionProps, Runtime},
};
use tessera_tree::{Tree, Value};

use crate::helpers::{HANDLER, HANDLER_ROLE, handler, reference, synth};

#[test]
fn function_gets_a_service_role_by_default() {
    let mut tree = Tree::new();
    handler(&mut tree);

    let template = synth(&tree);
    assert_eq!(
        serde_json::to_value(&template).unwrap(),
        json!({
            "Resources": {
                HANDLER_ROLE: {
                    "Type": ROLE_TYPE,
                    "Properties": {
                        "AssumeRolePolicyDocument": {
                            "Version": "2012-10-17",
                            "Statement": [{
                                "Action": "sts:AssumeRole",
                                "Effect": "Allow",
                                "Principal": { "Service": "lambda.amazonaws.com" }
                            }]
                        },
                        "ManagedPolicyArns": [{ "Fn::Join": ["", [
                            "arn:",
                            { "Ref": "AWS::Partition" },
                            ":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"
                        ]] }]
                    }
                },
                HANDLER: {
                    "Type": FUNCTION_TYPE,
                    "Properties": {
                        "Code": { "ZipFile": "boom" },
                        "Handler": "index.handler",
                        "Runtime": "nodejs20.x",
                        "Role": { "Fn::GetAtt": [HANDLER_ROLE, "Arn"] }
                    },
                    "DependsOn": [HANDLER_ROLE]
                }
            }
        })
    );
}

#[test]
fn function_uses_a_supplied_role_and_parameterized_code() {
    let mut tree = Tree::new();
    let root = tree.root();
    let bucket = CfnParameter::new(
        &mut tree,
        root,
        "CodeBucket",
        CfnParameterProps::builder().build(),
    )
    .unwrap();
    let role = Role::new(
        &mut tree,
        root,
        "shared-role",
        RoleProps::builder()
            .assumed_by("lambda.amazonaws.com")
            .path("/service/")
            .build(),
    )
    .unwrap();

    let function = Function::new(
        &mut tree,
        root,
        "worker",
        FunctionProps::builder()
            .handler("main")
            .runtime(Runtime::ProvidedAl2023)
            .code(Code::s3(bucket.value(), "worker.zip"))
            .role(role.clone())
            .timeout_seconds(30)
            .environment(BTreeMap::from([(
                "TABLE".to_string(),
                Value::from("orders"),
            )]))
            .build(),
    )
    .unwrap();
    assert!(tree.child(function.node(), "ServiceRole").is_none());

    let template = synth(&tree);
    let (_, resource) = template.resources_of_type(FUNCTION_TYPE).next().unwrap();
    let role_id = template.resources_of_type(ROLE_TYPE).next().unwrap().0;
    assert!(role_id.starts_with("sharedrole"));
    assert_eq!(
        resource.property("Code").unwrap(),
        &json!({ "S3Bucket": reference("CodeBucketED171569"), "S3Key": "worker.zip" })
    );
    assert_eq!(resource.property("Role").unwrap(), &json!({ "Fn::GetAtt": [role_id, "Arn"] }));
    assert_eq!(resource.property("Timeout").unwrap(), &json!(30));
    assert_eq!(resource.property("MemorySize"), None);
    assert_eq!(
        resource.property("Environment").unwrap(),
        &json!({ "Variables": { "TABLE": "orders" } })
    );
    assert_eq!(resource.depends_on, vec![role_id]);
    assert_eq!(template.resources_of_type(ROLE_TYPE).count(), 1);
}
