mod api_country;
mod result_message;

pub use self::api_country::ApiCountry;
pub use self::result_message::ResultMessage;
