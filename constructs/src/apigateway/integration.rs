use std::collections::BTreeMap;

use tessera_tree::{Fragment, Pseudo, Value};

use crate::lambda::Function;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationType {
    Aws,
    AwsProxy,
    Http,
    HttpProxy,
    Mock,
}

impl IntegrationType {
    pub fn as_str(self) -> &'static str {
        match self {
            IntegrationType::Aws => "AWS",
            IntegrationType::AwsProxy => "AWS_PROXY",
            IntegrationType::Http => "HTTP",
            IntegrationType::HttpProxy => "HTTP_PROXY",
            IntegrationType::Mock => "MOCK",
        }
    }
}

/// The backend a method forwards requests to.
#[derive(Clone, Debug, PartialEq)]
pub struct Integration {
    pub integration_type: IntegrationType,
    pub uri: Option<Value>,
    /// Method used to call the backend; unrelated to the method clients call.
    pub integration_http_method: Option<String>,
}

impl Integration {
    pub fn new(integration_type: IntegrationType) -> Self {
        Self {
            integration_type,
            uri: None,
            integration_http_method: None,
        }
    }

    /// Proxy every request to `handler`.
    pub fn lambda(handler: &Function) -> Self {
        let uri = Value::concat([
            Fragment::from("arn:"),
            Fragment::from(Pseudo::Partition),
            Fragment::from(":apigateway:"),
            Fragment::from(Pseudo::Region),
            Fragment::from(":lambda:path/2015-03-31/functions/"),
            Fragment::from(handler.arn()),
            Fragment::from("/invocations"),
        ]);
        Self {
            integration_type: IntegrationType::AwsProxy,
            uri: Some(uri),
            integration_http_method: Some("POST".to_string()),
        }
    }

    /// Proxy every request to `url`.
    pub fn http(url: impl Into<Value>) -> Self {
        Self {
            integration_type: IntegrationType::HttpProxy,
            uri: Some(url.into()),
            integration_http_method: Some("GET".to_string()),
        }
    }

    pub fn mock() -> Self {
        Self::new(IntegrationType::Mock)
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert(
            "Type".to_string(),
            Value::from(self.integration_type.as_str()),
        );
        if let Some(uri) = &self.uri {
            map.insert("Uri".to_string(), uri.clone());
        }
        if let Some(method) = &self.integration_http_method {
            map.insert("IntegrationHttpMethod".to_string(), Value::from(method.as_str()));
        }
        Value::Map(map)
    }
}
