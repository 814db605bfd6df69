use serde_json::json;
use tessera_compiler::{
    reporter::{Reporter, TreeReporter},
    synthesize,
};
use tessera_constructs::apigateway::{
    DEPLOYMENT_TYPE, Integration, METHOD_TYPE, RESOURCE_TYPE, REST_API_TYPE, RestApi, RestApiProps,
    STAGE_TYPE,
};
use tessera_tree::Tree;

use crate::helpers::{has_resource, matching, reference, synth};

const API: &str = "api59108BC9";

fn api(tree: &mut Tree, props: RestApiProps) -> RestApi {
    let root = tree.root();
    RestApi::new(tree, root, "api", props).unwrap()
}

#[test]
fn deployment_depends_on_methods_added_after_the_api() {
    let mut tree = Tree::new();
    let api = api(&mut tree, RestApiProps::default());
    api.root().add_method(&mut tree, "get", None).unwrap();
    let books = api.root().add_resource(&mut tree, "books").unwrap();
    books.add_method(&mut tree, "POST", None).unwrap();

    let template = synth(&tree);
    assert!(has_resource(
        &template,
        REST_API_TYPE,
        json!({ "Name": "api" })
    ));

    let methods: Vec<String> = matching(&template, METHOD_TYPE, &json!({}))
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0], "apiGET99B269BC");

    let deployments = matching(&template, DEPLOYMENT_TYPE, &json!({ "RestApiId": reference(API) }));
    assert_eq!(deployments.len(), 1);
    let (deployment_id, deployment) = deployments[0];
    assert_eq!(deployment.depends_on, methods);

    assert!(has_resource(
        &template,
        STAGE_TYPE,
        json!({
            "RestApiId": reference(API),
            "DeploymentId": reference(deployment_id),
            "StageName": "prod"
        })
    ));

    let url = json!({ "Fn::Join": ["", [
        "https://",
        reference(API),
        ".execute-api.",
        { "Ref": "AWS::Region" },
        ".",
        { "Ref": "AWS::URLSuffix" },
        "/prod/"
    ]] });
    let outputs: Vec<_> = template.outputs.values().map(|output| &output.value).collect();
    assert_eq!(outputs, vec![&url]);
    assert!(api.url().is_some());
}

#[test]
fn undeployed_api_has_no_stage_and_methods_default_to_mock() {
    let mut tree = Tree::new();
    let api = api(
        &mut tree,
        RestApiProps::builder()
            .deploy(false)
            .name("books-api")
            .description("Books")
            .build(),
    );
    api.root().add_method(&mut tree, "GET", None).unwrap();
    assert!(api.url().is_none());
    assert!(api.deployment().is_none());

    let template = synth(&tree);
    assert_eq!(template.resources_of_type(DEPLOYMENT_TYPE).count(), 0);
    assert_eq!(template.resources_of_type(STAGE_TYPE).count(), 0);
    assert!(template.outputs.is_empty());
    assert!(has_resource(
        &template,
        REST_API_TYPE,
        json!({ "Name": "books-api", "Description": "Books" })
    ));
    assert!(has_resource(
        &template,
        METHOD_TYPE,
        json!({ "Integration": { "Type": "MOCK" } })
    ));
}

#[test]
fn explicit_integration_wins_over_the_api_default() {
    let mut tree = Tree::new();
    let api = api(
        &mut tree,
        RestApiProps::builder()
            .default_integration(Integration::http("https://default.example.com"))
            .stage_name("beta")
            .build(),
    );
    let root = api.root();
    root.add_method(&mut tree, "GET", None).unwrap();
    root.add_method(
        &mut tree,
        "PUT",
        Some(Integration::http("https://override.example.com")),
    )
    .unwrap();

    let template = synth(&tree);
    assert!(has_resource(
        &template,
        METHOD_TYPE,
        json!({
            "HttpMethod": "GET",
            "Integration": {
                "Type": "HTTP_PROXY",
                "IntegrationHttpMethod": "GET",
                "Uri": "https://default.example.com"
            }
        })
    ));
    assert!(has_resource(
        &template,
        METHOD_TYPE,
        json!({
            "HttpMethod": "PUT",
            "Integration": {
                "Type": "HTTP_PROXY",
                "IntegrationHttpMethod": "GET",
                "Uri": "https://override.example.com"
            }
        })
    ));
    assert!(has_resource(&template, STAGE_TYPE, json!({ "StageName": "beta" })));
}

#[test]
fn resource_for_path_reuses_existing_routes() {
    let mut tree = Tree::new();
    let api = api(&mut tree, RestApiProps::default());
    let v1 = api.root().resource_for_path(&mut tree, "/v1/books").unwrap();
    let again = api.root().resource_for_path(&mut tree, "v1/books/").unwrap();

    assert_eq!(v1.node(), again.node());
    assert_eq!(again.path(), "/v1/books");
    assert_eq!(v1.resource_id(), again.resource_id());

    let duplicate = api.root().add_resource(&mut tree, "v1");
    assert!(duplicate.is_err());
}

#[test]
fn path_parts_with_reserved_characters_keep_their_text() {
    let mut tree = Tree::new();
    let api = api(&mut tree, RestApiProps::default());
    let versioned = api.root().resource_for_path(&mut tree, "/v1.0/items").unwrap();
    versioned.add_method(&mut tree, "GET", None).unwrap();

    assert_eq!(versioned.path(), "/v1.0/items");
    assert_eq!(tree.path(versioned.node()).to_string(), "/api/v1_0/items");
    let again = api.root().resource_for_path(&mut tree, "v1.0/items").unwrap();
    assert_eq!(again.node(), versioned.node());

    // Same construct name, different route: not reused.
    assert!(api.root().resource_for_path(&mut tree, "/v1_0").is_err());

    let template = synth(&tree);
    assert!(has_resource(&template, RESOURCE_TYPE, json!({ "PathPart": "v1.0" })));
    assert!(has_resource(&template, RESOURCE_TYPE, json!({ "PathPart": "items" })));
}

#[test]
fn tree_report_maps_ids_back_to_constructs() {
    let mut tree = Tree::new();
    let api = api(&mut tree, RestApiProps::default());
    api.root().add_method(&mut tree, "GET", None).unwrap();

    let output = synthesize(&tree).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&TreeReporter.emit(&output).unwrap()).unwrap();

    let api_node = &report["children"][0];
    assert_eq!(api_node["path"], "/api");
    assert_eq!(api_node["kind"], "tessera.apigateway.RestApi");
    assert_eq!(api_node["children"][0]["path"], "/api/Resource");
    assert_eq!(api_node["children"][0]["logical_ids"], json!([API]));
    let get = api_node["children"]
        .as_array()
        .unwrap()
        .iter()
        .find(|child| child["path"] == "/api/GET")
        .unwrap();
    assert_eq!(get["kind"], "tessera.apigateway.Method");
    assert_eq!(get["logical_ids"], json!(["apiGET99B269BC"]));
}
