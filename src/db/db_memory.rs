use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::db::models::CountryItem;
use crate::db::DbConnection;
use crate::db::DbError;

/// Built-in backend keeping all records in process memory. This is the
/// default store and the one the tests run against. A plain Vec keeps the
/// insertion order that list-all promises.
#[derive(Clone)]
pub struct MemoryConnection {
    countries: Arc<Mutex<Vec<CountryItem>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        MemoryConnection {
            countries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<Vec<CountryItem>>, DbError> {
        self.countries
            .lock()
            .map_err(|_| DbError::ConnectionError(String::from("country store mutex poisoned")))
    }
}

impl DbConnection for MemoryConnection {
    fn get_countries(&self) -> Result<Vec<CountryItem>, DbError> {
        let countries = self.lock()?;
        Ok(countries.clone())
    }

    fn get_country_by_id(&self, id: i64) -> Result<CountryItem, DbError> {
        let countries = self.lock()?;
        countries
            .iter()
            .find(|existing| existing.id == id)
            .cloned()
            .ok_or(DbError::CountryNotFoundError)
    }

    fn get_country_by_name(&self, name: &str) -> Result<CountryItem, DbError> {
        let countries = self.lock()?;
        countries
            .iter()
            .find(|existing| existing.name == name)
            .cloned()
            .ok_or(DbError::CountryNotFoundError)
    }

    fn add_country(&self, item: CountryItem) -> Result<CountryItem, DbError> {
        item.check()?;
        let mut countries = self.lock()?;
        if countries.iter().any(|existing| existing.id == item.id) {
            return Err(DbError::DuplicateCountryError(item.id));
        }
        countries.push(item.clone());
        Ok(item)
    }

    fn update_country(&self, id: i64, name: &str, capital: &str) -> Result<CountryItem, DbError> {
        let item = CountryItem::new(id, name.to_string(), capital.to_string());
        item.check()?;
        let mut countries = self.lock()?;
        let slot = countries
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or(DbError::CountryNotFoundError)?;
        // update in place, the record keeps its position in the list
        *slot = item.clone();
        Ok(item)
    }

    fn delete_country(&self, id: i64) -> Result<(), DbError> {
        let mut countries = self.lock()?;
        let position = countries
            .iter()
            .position(|existing| existing.id == id)
            .ok_or(DbError::CountryNotFoundError)?;
        countries.remove(position);
        Ok(())
    }

    fn get_country_count(&self) -> Result<u64, DbError> {
        let countries = self.lock()?;
        Ok(countries.len() as u64)
    }
}
