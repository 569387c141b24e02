mod db;
mod db_error;
mod db_memory;
mod db_mysql;

pub mod models;

pub use self::db::DbConnection;
pub use self::db_error::DbError;
pub use self::db_memory::MemoryConnection;
pub use self::db_mysql::MysqlConnection;
