use crate::db::models::CountryItem;
use crate::db::DbError;

/// Storage seam for country records. Backends are injected into the api
/// layer through this trait, which keeps the handlers testable against the
/// in-memory store.
///
/// Implementations must keep whole operations atomic: a reader observes
/// either the pre- or the post-state of a concurrent write, never a partial
/// one.
pub trait DbConnection {
    /// All records in insertion order.
    fn get_countries(&self) -> Result<Vec<CountryItem>, DbError>;
    fn get_country_by_id(&self, id: i64) -> Result<CountryItem, DbError>;
    /// First record with that exact name, in insertion order.
    fn get_country_by_name(&self, name: &str) -> Result<CountryItem, DbError>;
    fn add_country(&self, item: CountryItem) -> Result<CountryItem, DbError>;
    fn update_country(&self, id: i64, name: &str, capital: &str) -> Result<CountryItem, DbError>;
    fn delete_country(&self, id: i64) -> Result<(), DbError>;
    fn get_country_count(&self) -> Result<u64, DbError>;
}
