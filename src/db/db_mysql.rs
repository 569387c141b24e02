use mysql::params;
use mysql::prelude::Queryable;
use mysql::Opts;
use mysql::Pool;
use mysql::PooledConn;

use crate::db::models::CountryItem;
use crate::db::DbConnection;
use crate::db::DbError;

const COLUMNS: &str = "IdCountry,Name,Capital";

/// Relational backend over a single Country table. RecordOrder is a
/// surrogate auto-increment column that preserves insertion order for
/// list-all; IdCountry carries the caller-supplied id under a unique key.
#[derive(Clone)]
pub struct MysqlConnection {
    pool: Pool,
}

impl MysqlConnection {
    pub fn new(connection_str: &str) -> Result<Self, DbError> {
        let opts = Opts::from_url(connection_str)
            .map_err(|err| DbError::ConnectionError(err.to_string()))?;
        let pool = Pool::new(opts)?;
        let connection = MysqlConnection { pool };
        connection.create_schema()?;
        Ok(connection)
    }

    fn conn(&self) -> Result<PooledConn, DbError> {
        Ok(self.pool.get_conn()?)
    }

    fn create_schema(&self) -> Result<(), DbError> {
        let mut conn = self.conn()?;
        conn.query_drop(
            "CREATE TABLE IF NOT EXISTS Country (
                RecordOrder BIGINT NOT NULL AUTO_INCREMENT,
                IdCountry BIGINT NOT NULL,
                Name TEXT NOT NULL,
                Capital TEXT NOT NULL,
                PRIMARY KEY (RecordOrder),
                UNIQUE KEY Unique_IdCountry (IdCountry)
            )",
        )?;
        Ok(())
    }

    fn country_exists(conn: &mut PooledConn, id: i64) -> Result<bool, DbError> {
        let existing: Option<i64> = conn.exec_first(
            "SELECT IdCountry FROM Country WHERE IdCountry=:id",
            params! {"id" => id},
        )?;
        Ok(existing.is_some())
    }
}

impl DbConnection for MysqlConnection {
    fn get_countries(&self) -> Result<Vec<CountryItem>, DbError> {
        let mut conn = self.conn()?;
        let list = conn.query_map(
            format!("SELECT {} FROM Country ORDER BY RecordOrder", COLUMNS),
            |(id, name, capital)| CountryItem { id, name, capital },
        )?;
        Ok(list)
    }

    fn get_country_by_id(&self, id: i64) -> Result<CountryItem, DbError> {
        let mut conn = self.conn()?;
        let row: Option<(i64, String, String)> = conn.exec_first(
            format!("SELECT {} FROM Country WHERE IdCountry=:id", COLUMNS),
            params! {"id" => id},
        )?;
        row.map(|(id, name, capital)| CountryItem { id, name, capital })
            .ok_or(DbError::CountryNotFoundError)
    }

    fn get_country_by_name(&self, name: &str) -> Result<CountryItem, DbError> {
        let mut conn = self.conn()?;
        let row: Option<(i64, String, String)> = conn.exec_first(
            format!(
                "SELECT {} FROM Country WHERE Name=:name ORDER BY RecordOrder LIMIT 1",
                COLUMNS
            ),
            params! {"name" => name},
        )?;
        row.map(|(id, name, capital)| CountryItem { id, name, capital })
            .ok_or(DbError::CountryNotFoundError)
    }

    fn add_country(&self, item: CountryItem) -> Result<CountryItem, DbError> {
        item.check()?;
        let mut conn = self.conn()?;
        if MysqlConnection::country_exists(&mut conn, item.id)? {
            return Err(DbError::DuplicateCountryError(item.id));
        }
        conn.exec_drop(
            "INSERT INTO Country(IdCountry,Name,Capital) VALUES (:id,:name,:capital)",
            params! {
                "id" => item.id,
                "name" => item.name.as_str(),
                "capital" => item.capital.as_str(),
            },
        )?;
        Ok(item)
    }

    fn update_country(&self, id: i64, name: &str, capital: &str) -> Result<CountryItem, DbError> {
        let item = CountryItem::new(id, name.to_string(), capital.to_string());
        item.check()?;
        let mut conn = self.conn()?;
        if !MysqlConnection::country_exists(&mut conn, id)? {
            return Err(DbError::CountryNotFoundError);
        }
        // RecordOrder is untouched, the record keeps its list position
        conn.exec_drop(
            "UPDATE Country SET Name=:name,Capital=:capital WHERE IdCountry=:id",
            params! {
                "id" => id,
                "name" => name,
                "capital" => capital,
            },
        )?;
        Ok(item)
    }

    fn delete_country(&self, id: i64) -> Result<(), DbError> {
        let mut conn = self.conn()?;
        if !MysqlConnection::country_exists(&mut conn, id)? {
            return Err(DbError::CountryNotFoundError);
        }
        conn.exec_drop(
            "DELETE FROM Country WHERE IdCountry=:id",
            params! {"id" => id},
        )?;
        Ok(())
    }

    fn get_country_count(&self) -> Result<u64, DbError> {
        let mut conn = self.conn()?;
        let count: Option<u64> = conn.query_first("SELECT COUNT(*) FROM Country")?;
        Ok(count.unwrap_or(0))
    }
}
