use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    CountryNotFoundError,
    DuplicateCountryError(i64),
    ValidationError(String),
    ConnectionError(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match *self {
            DbError::CountryNotFoundError => write!(f, "CountryNotFoundError"),
            DbError::DuplicateCountryError(ref id) => {
                write!(f, "DuplicateCountryError '{}'", id)
            }
            DbError::ValidationError(ref v) => write!(f, "ValidationError '{}'", v),
            DbError::ConnectionError(ref v) => write!(f, "ConnectionError '{}'", v),
        }
    }
}

impl Error for DbError {}

impl From<mysql::Error> for DbError {
    fn from(err: mysql::Error) -> Self {
        DbError::ConnectionError(err.to_string())
    }
}
