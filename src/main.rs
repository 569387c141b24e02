use log::{debug, info};
use std::error::Error;
use std::process;

mod api;
mod config;
mod db;
mod logger;

use crate::config::Config;
use crate::db::DbConnection;
use crate::db::MemoryConnection;
use crate::db::MysqlConnection;

fn connect(config: &Config) -> Result<Box<dyn DbConnection + Send + Sync>, Box<dyn Error>> {
    if config.connection_string == "memory" {
        info!("Using built-in memory store");
        Ok(Box::new(MemoryConnection::new()))
    } else {
        info!("Connecting to database..");
        Ok(Box::new(MysqlConnection::new(&config.connection_string)?))
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config::load_config()?;
    logger::setup_logger(config.log_level, &config.log_dir)?;
    debug!("Config: {:#?}", config);
    let connection = connect(&config)?;
    api::run(connection, config)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
