use crate::db::DbError;

/// A single country record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryItem {
    pub id: i64,
    pub name: String,
    pub capital: String,
}

impl CountryItem {
    pub fn new(id: i64, name: String, capital: String) -> Self {
        CountryItem { id, name, capital }
    }

    /// Field checks shared by all backends, done before anything is written.
    pub fn check(&self) -> Result<(), DbError> {
        if self.id <= 0 {
            return Err(DbError::ValidationError(String::from(
                "'idCountry' must be a positive integer",
            )));
        }
        if self.name.trim().is_empty() {
            return Err(DbError::ValidationError(String::from(
                "'name' must not be empty",
            )));
        }
        if self.capital.trim().is_empty() {
            return Err(DbError::ValidationError(String::from(
                "'capital' must not be empty",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_complete_item() {
        let item = CountryItem::new(1, "France".to_string(), "Paris".to_string());
        assert!(item.check().is_ok());
    }

    #[test]
    fn check_rejects_non_positive_id() {
        let item = CountryItem::new(0, "France".to_string(), "Paris".to_string());
        assert!(matches!(item.check(), Err(DbError::ValidationError(_))));
        let item = CountryItem::new(-3, "France".to_string(), "Paris".to_string());
        assert!(matches!(item.check(), Err(DbError::ValidationError(_))));
    }

    #[test]
    fn check_rejects_blank_fields() {
        let item = CountryItem::new(1, "  ".to_string(), "Paris".to_string());
        assert!(matches!(item.check(), Err(DbError::ValidationError(_))));
        let item = CountryItem::new(1, "France".to_string(), String::new());
        assert!(matches!(item.check(), Err(DbError::ValidationError(_))));
    }
}
