use serde_json::json;
use tessera_constructs::{
    CfnOutput, CfnOutputProps, CfnParameter, CfnParameterProps,
    apigateway::{RestApi, RestApiProps, STAGE_TYPE},
};
use tessera_tree::{Tree, TreeError, Value};

use crate::helpers::{has_resource, reference, synth};

#[test]
fn parameters_feed_properties_and_outputs_export_values() {
    let mut tree = Tree::new();
    let root = tree.root();
    let stage = CfnParameter::new(
        &mut tree,
        root,
        "Stage",
        CfnParameterProps::builder()
            .default("prod")
            .allowed_values(vec!["prod".to_string(), "beta".to_string()])
            .description("Deployment stage")
            .build(),
    )
    .unwrap();

    let api = RestApi::new(
        &mut tree,
        root,
        "api",
        RestApiProps::builder()
            .stage_name("unused")
            .deploy(false)
            .build(),
    )
    .unwrap();
    CfnOutput::new(
        &mut tree,
        root,
        "ApiUrl",
        CfnOutputProps::builder()
            .value(api.rest_api_id())
            .description("API id")
            .export_name(Value::concat([stage.value()]))
            .build(),
    )
    .unwrap();

    let template = synth(&tree);
    assert_eq!(
        serde_json::to_value(&template.parameters).unwrap(),
        json!({
            "StageDE838855": {
                "Type": "String",
                "Default": "prod",
                "Description": "Deployment stage",
                "AllowedValues": ["prod", "beta"]
            }
        })
    );
    assert_eq!(
        serde_json::to_value(&template.outputs).unwrap(),
        json!({
            "ApiUrlEA4CD328": {
                "Value": reference("api59108BC9"),
                "Description": "API id",
                "Export": { "Name": reference("StageDE838855") }
            }
        })
    );
    assert!(!has_resource(&template, STAGE_TYPE, json!({})));
}

#[test]
fn parameter_names_are_unique_among_siblings() {
    let mut tree = Tree::new();
    let root = tree.root();
    CfnParameter::new(&mut tree, root, "Stage", CfnParameterProps::builder().build()).unwrap();

    let err = CfnParameter::new(&mut tree, root, "Stage", CfnParameterProps::builder().build())
        .unwrap_err();
    assert!(matches!(err, TreeError::DuplicateName(_)), "{err}");
}

#[test]
fn no_echo_parameters_are_marked() {
    let mut tree = Tree::new();
    let root = tree.root();
    CfnParameter::new(
        &mut tree,
        root,
        "Secret",
        CfnParameterProps::builder().no_echo(true).build(),
    )
    .unwrap();

    let template = synth(&tree);
    let parameter = template.parameters.values().next().unwrap();
    assert!(parameter.no_echo);
    assert_eq!(parameter.parameter_type, "String");
}
