//! REST APIs fronting functions or HTTP backends.

mod integration;
mod lambda_api;
mod method;
mod resource;
mod rest_api;

pub use integration::{Integration, IntegrationType};
pub use lambda_api::{
    DEFAULT_INTEGRATION_OPTION, LAMBDA_REST_API_KIND, LambdaRestApi, LambdaRestApiProps,
};
pub use method::{METHOD_KIND, METHOD_TYPE, Method};
pub use resource::{ApiResource, RESOURCE_KIND, RESOURCE_TYPE};
pub use rest_api::{
    DEFAULT_STAGE_NAME, DEPLOYMENT_KIND, DEPLOYMENT_TYPE, REST_API_KIND, REST_API_TYPE, RestApi,
    RestApiProps, STAGE_TYPE,
};
