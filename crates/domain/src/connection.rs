//! Connection info published to the secrets server.

use serde::{Deserialize, Serialize};

use crate::identity::AccessToken;

/// How to reach this instance: its external URL and a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub url: String,
    pub token: AccessToken,
}

/// Body of `POST /v1/smarthomes/data/{email}`.
#[derive(Debug, Serialize)]
pub struct PublishRequest<'a> {
    pub data: &'a ConnectionInfo,
}
