use serde::{Deserialize, Serialize};

use crate::api::api_error::ApiError;
use crate::db::models::CountryItem;

/// Wire representation of a country record. The id travels as "idCountry"
/// on the wire; the field may be left out of update payloads, where the
/// path id wins anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCountry {
    #[serde(rename = "idCountry", default)]
    pub id: i64,
    pub name: String,
    pub capital: String,
}

impl ApiCountry {
    pub fn get_list_response<I>(list: I) -> Result<rouille::Response, ApiError>
    where
        I: IntoIterator<Item = CountryItem>,
    {
        let list: Vec<ApiCountry> = list.into_iter().map(|item| item.into()).collect();
        let j =
            serde_json::to_string(&list).map_err(|err| ApiError::ServerError(err.to_string()))?;
        Ok(rouille::Response::text(j)
            .with_no_cache()
            .with_unique_header("Content-Type", "application/json"))
    }

    pub fn get_single_response(item: CountryItem) -> Result<rouille::Response, ApiError> {
        let entry: ApiCountry = item.into();
        let j =
            serde_json::to_string(&entry).map_err(|err| ApiError::ServerError(err.to_string()))?;
        Ok(rouille::Response::text(j)
            .with_no_cache()
            .with_unique_header("Content-Type", "application/json"))
    }
}

impl From<CountryItem> for ApiCountry {
    fn from(item: CountryItem) -> Self {
        ApiCountry {
            id: item.id,
            name: item.name,
            capital: item.capital,
        }
    }
}

impl From<ApiCountry> for CountryItem {
    fn from(entry: ApiCountry) -> Self {
        CountryItem {
            id: entry.id,
            name: entry.name,
            capital: entry.capital,
        }
    }
}
