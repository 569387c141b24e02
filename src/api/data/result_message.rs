use serde::{Deserialize, Serialize};

use crate::api::api_error::ApiError;

#[derive(Serialize, Deserialize)]
pub struct ResultMessage {
    ok: bool,
    message: String,
}

impl ResultMessage {
    pub fn new(ok: bool, message: String) -> Self {
        ResultMessage { ok, message }
    }

    pub fn get_response(&self) -> Result<rouille::Response, ApiError> {
        let j = serde_json::to_string(self).map_err(|err| ApiError::ServerError(err.to_string()))?;
        Ok(rouille::Response::text(j)
            .with_no_cache()
            .with_unique_header("Content-Type", "application/json"))
    }
}
