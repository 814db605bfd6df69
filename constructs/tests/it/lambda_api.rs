use serde_json::json;
use tessera_compiler::{SynthError, ValidationError, synthesize};
use tessera_constructs::apigateway::{
    DEFAULT_INTEGRATION_OPTION, Integration, LambdaRestApi, LambdaRestApiProps, METHOD_TYPE,
    RESOURCE_TYPE, RestApiProps,
};
use tessera_tree::Tree;

use crate::helpers::{HANDLER, handler, has_resource, lambda_uri, matching, reference, synth};

const API: &str = "lambdarestapi022645B6";

#[test]
fn lambda_rest_api_proxies_everything_to_the_handler() {
    let mut tree = Tree::new();
    let handler = handler(&mut tree);
    let root = tree.root();

    let api = LambdaRestApi::new(
        &mut tree,
        root,
        "lambda-rest-api",
        LambdaRestApiProps::builder()
            .handler(handler)
            .proxy_path("/")
            .build(),
    )
    .unwrap();
    assert_eq!(api.proxy().unwrap().path(), "/{proxy+}");

    let template = synth(&tree);
    assert!(has_resource(
        &template,
        RESOURCE_TYPE,
        json!({
            "PathPart": "{proxy+}",
            "ParentId": { "Fn::GetAtt": [API, "RootResourceId"] },
            "RestApiId": reference(API)
        })
    ));

    let methods = matching(&template, METHOD_TYPE, &json!({}));
    assert_eq!(methods.len(), 1);
    let (id, method) = methods[0];
    assert_eq!(id, "lambdarestapiproxyANY7564A734");
    assert_eq!(
        serde_json::to_value(&method.properties).unwrap(),
        json!({
            "HttpMethod": "ANY",
            "ResourceId": reference("lambdarestapiproxyFC1C54D5"),
            "RestApiId": reference(API),
            "AuthorizationType": "NONE",
            "Integration": {
                "IntegrationHttpMethod": "POST",
                "Type": "AWS_PROXY",
                "Uri": lambda_uri(HANDLER)
            }
        })
    );
}

#[test]
fn proxy_path_can_attach_the_proxy_to_any_route() {
    let mut tree = Tree::new();
    let handler = handler(&mut tree);
    let root = tree.root();

    LambdaRestApi::new(
        &mut tree,
        root,
        "lambda-rest-api",
        LambdaRestApiProps::builder()
            .handler(handler)
            .proxy_path("/backend/v2")
            .build(),
    )
    .unwrap();

    let template = synth(&tree);
    assert!(has_resource(
        &template,
        METHOD_TYPE,
        json!({ "ResourceId": reference("lambdarestapibackendv2proxy9E89AAA1") })
    ));
    assert!(has_resource(
        &template,
        RESOURCE_TYPE,
        json!({
            "PathPart": "v2",
            "ParentId": reference("lambdarestapibackend84D6C161")
        })
    ));
    assert!(has_resource(
        &template,
        RESOURCE_TYPE,
        json!({
            "PathPart": "{proxy+}",
            "ParentId": reference("lambdarestapibackendv2FE36D41D")
        })
    ));
}

#[test]
fn without_proxy_path_routes_are_defined_by_the_caller() {
    let mut tree = Tree::new();
    let handler = handler(&mut tree);
    let root = tree.root();

    let api = LambdaRestApi::new(
        &mut tree,
        root,
        "lambda-rest-api",
        LambdaRestApiProps::builder().handler(handler).build(),
    )
    .unwrap();
    assert!(api.proxy().is_none());

    let tasks = api.root().add_resource(&mut tree, "tasks").unwrap();
    tasks.add_method(&mut tree, "GET", None).unwrap();
    tasks.add_method(&mut tree, "POST", None).unwrap();

    let template = synth(&tree);
    assert!(!has_resource(
        &template,
        RESOURCE_TYPE,
        json!({ "PathPart": "{proxy+}" })
    ));
    assert!(has_resource(
        &template,
        RESOURCE_TYPE,
        json!({ "PathPart": "tasks" })
    ));
    for http_method in ["GET", "POST"] {
        assert!(has_resource(
            &template,
            METHOD_TYPE,
            json!({
                "HttpMethod": http_method,
                "ResourceId": reference("lambdarestapitasks3BEBC72B"),
                "Integration": {
                    "IntegrationHttpMethod": "POST",
                    "Type": "AWS_PROXY",
                    "Uri": lambda_uri(HANDLER)
                }
            })
        ));
    }
}

#[test]
fn explicit_default_integration_fails_synthesis() {
    let mut tree = Tree::new();
    let handler = handler(&mut tree);
    let root = tree.root();

    LambdaRestApi::new(
        &mut tree,
        root,
        "lambda-rest-api",
        LambdaRestApiProps::builder()
            .handler(handler)
            .options(
                RestApiProps::builder()
                    .default_integration(Integration::http("https://foo/bar"))
                    .build(),
            )
            .build(),
    )
    .unwrap();

    let err = synthesize(&tree).unwrap_err();
    let SynthError::Validation(ValidationError { failures }) = &err else {
        panic!("expected a validation error, got {err:?}");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path.to_string(), "/lambda-rest-api");
    assert_eq!(failures[0].option.as_deref(), Some(DEFAULT_INTEGRATION_OPTION));
    assert_eq!(
        failures[0].message,
        "Cannot specify \"options.defaultIntegration\" since Lambda integration is \
         automatically defined"
    );
}
