mod config_error;

use clap::crate_version;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use std::error::Error;
use std::fs;
use std::path::Path;

pub use config_error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub connection_string: String,
    pub listen_host: String,
    pub listen_port: i32,
    pub log_dir: String,
    pub log_level: usize,
    pub prometheus_exporter: bool,
    pub prometheus_exporter_prefix: String,
    pub threads: usize,
}

fn get_option_string(
    matches: &ArgMatches,
    config: &toml::Value,
    setting_name: &str,
    default_value: String,
) -> Result<String, Box<dyn Error>> {
    let value_from_clap = matches.get_one::<String>(setting_name);
    if let Some(value_from_clap) = value_from_clap {
        return Ok(value_from_clap.clone());
    }

    let setting = config.get(setting_name);
    if let Some(setting) = setting {
        if setting.is_str() {
            let setting_decoded = setting.as_str();
            if let Some(setting_decoded) = setting_decoded {
                return Ok(String::from(setting_decoded));
            }
        } else {
            return Err(Box::new(ConfigError::TypeError(
                setting_name.into(),
                setting.to_string(),
            )));
        }
    }

    Ok(default_value)
}

fn get_option_number(
    matches: &ArgMatches,
    config: &toml::Value,
    setting_name: &str,
    default_value: i64,
) -> Result<i64, Box<dyn Error>> {
    let value_from_clap = matches.get_one::<String>(setting_name);
    if let Some(value_from_clap) = value_from_clap {
        return Ok(value_from_clap.parse()?);
    }

    let setting = config.get(setting_name);
    if let Some(setting) = setting {
        if setting.is_integer() {
            let setting_decoded = setting.as_integer();
            if let Some(setting_decoded) = setting_decoded {
                return Ok(setting_decoded);
            }
        } else {
            return Err(Box::new(ConfigError::TypeError(
                setting_name.into(),
                setting.to_string(),
            )));
        }
    }

    Ok(default_value)
}

fn get_option_number_occurences(
    matches: &ArgMatches,
    config: &toml::Value,
    setting_name: &str,
    default_value: usize,
) -> Result<usize, Box<dyn Error>> {
    let value_from_clap = matches.get_count(setting_name) as usize;
    if value_from_clap > 0 {
        return Ok(value_from_clap);
    }

    let setting = config.get(setting_name);
    if let Some(setting) = setting {
        if setting.is_integer() {
            let setting_decoded = setting.as_integer();
            if let Some(setting_decoded) = setting_decoded {
                return Ok(setting_decoded as usize);
            }
        } else {
            return Err(Box::new(ConfigError::TypeError(
                setting_name.into(),
                setting.to_string(),
            )));
        }
    }

    Ok(default_value)
}

fn get_option_bool(
    matches: &ArgMatches,
    config: &toml::Value,
    setting_name: &str,
    default_value: bool,
) -> Result<bool, Box<dyn Error>> {
    let value_from_clap = matches.get_one::<String>(setting_name);
    if let Some(value_from_clap) = value_from_clap {
        return Ok(value_from_clap.parse()?);
    }

    let setting = config.get(setting_name);
    if let Some(setting) = setting {
        if setting.is_bool() {
            let setting_decoded = setting.as_bool();
            if let Some(setting_decoded) = setting_decoded {
                return Ok(setting_decoded);
            }
        } else {
            return Err(Box::new(ConfigError::TypeError(
                setting_name.into(),
                setting.to_string(),
            )));
        }
    }

    Ok(default_value)
}

pub fn load_config() -> Result<Config, Box<dyn Error>> {
    let matches = Command::new("country-api")
        .version(crate_version!())
        .about("HTTP REST API for a country directory")
        .arg(
            Arg::new("config-file")
                .short('f')
                .long("config-file")
                .value_name("CONFIG-FILE")
                .help("Path to config file")
                .env("CONFIG_FILE")
                .default_value("/etc/countryapi.toml"),
        )
        .arg(
            Arg::new("log-dir")
                .short('l')
                .long("log-dir")
                .value_name("LOG-DIR")
                .help("Path to log dir")
                .env("LOG_DIR"),
        )
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("DATABASE_URL")
                .help("Database connection url, or 'memory' for the built-in store")
                .env("DATABASE_URL"),
        )
        .arg(
            Arg::new("listen-host")
                .long("host")
                .value_name("HOST")
                .help("listening host ip")
                .env("HOST"),
        )
        .arg(
            Arg::new("listen-port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("listening port")
                .env("PORT"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("THREADS")
                .help("concurrent threads used by socket")
                .env("THREADS"),
        )
        .arg(
            Arg::new("prometheus-exporter")
                .short('e')
                .long("prometheus-exporter")
                .value_name("PROMETHEUS_EXPORTER")
                .help("export statistics through a prometheus compatible exporter")
                .env("PROMETHEUS_EXPORTER"),
        )
        .arg(
            Arg::new("prometheus-exporter-prefix")
                .long("prometheus-exporter-prefix")
                .value_name("PROMETHEUS_EXPORTER_PREFIX")
                .help("prefix for all exported values on /metrics")
                .env("PROMETHEUS_EXPORTER_PREFIX"),
        )
        .arg(
            Arg::new("log-level")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("increases the log level. can be specified mutliple times 0..3"),
        )
        .get_matches();

    let config_file_path: String = matches
        .get_one::<String>("config-file")
        .map(|value| value.to_string())
        .unwrap_or_default();

    let config = if Path::new(&config_file_path).exists() {
        let contents = fs::read_to_string(&config_file_path)?;
        toml::from_str::<toml::Value>(&contents)?
    } else {
        toml::Value::Table(toml::Table::new())
    };

    load_config_internal(&matches, &config)
}

fn load_config_internal(
    matches: &ArgMatches,
    config: &toml::Value,
) -> Result<Config, Box<dyn Error>> {
    let connection_string =
        get_option_string(matches, config, "database", String::from("memory"))?;
    let log_dir: String = get_option_string(matches, config, "log-dir", String::from("."))?;
    let listen_host: String =
        get_option_string(matches, config, "listen-host", String::from("127.0.0.1"))?;
    let listen_port: i32 = get_option_number(matches, config, "listen-port", 8080)? as i32;
    let threads: usize = get_option_number(matches, config, "threads", 1)? as usize;
    let log_level: usize = get_option_number_occurences(matches, config, "log-level", 0)?;

    let prometheus_exporter: bool =
        get_option_bool(matches, config, "prometheus-exporter", true)?;
    let prometheus_exporter_prefix: String = get_option_string(
        matches,
        config,
        "prometheus-exporter-prefix",
        String::from("country_api_"),
    )?;

    Ok(Config {
        connection_string,
        listen_host,
        listen_port,
        log_dir,
        log_level,
        prometheus_exporter,
        prometheus_exporter_prefix,
        threads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_command() -> Command {
        Command::new("test")
            .arg(Arg::new("config-file").long("config-file"))
            .arg(Arg::new("log-dir").long("log-dir"))
            .arg(Arg::new("database").long("database"))
            .arg(Arg::new("listen-host").long("host"))
            .arg(Arg::new("listen-port").long("port"))
            .arg(Arg::new("threads").long("threads"))
            .arg(Arg::new("prometheus-exporter").long("prometheus-exporter"))
            .arg(
                Arg::new("prometheus-exporter-prefix").long("prometheus-exporter-prefix"),
            )
            .arg(
                Arg::new("log-level")
                    .short('v')
                    .long("verbose")
                    .action(ArgAction::Count),
            )
    }

    #[test]
    fn defaults_apply_without_cli_or_file() {
        let matches = test_command().get_matches_from(vec!["test"]);
        let config = toml::Value::Table(toml::Table::new());
        let config = load_config_internal(&matches, &config).unwrap();
        assert_eq!(config.connection_string, "memory");
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.threads, 1);
        assert!(config.prometheus_exporter);
    }

    #[test]
    fn file_overrides_defaults() {
        let matches = test_command().get_matches_from(vec!["test"]);
        let config: toml::Value =
            toml::from_str("listen-port = 9000\nprometheus-exporter = false").unwrap();
        let config = load_config_internal(&matches, &config).unwrap();
        assert_eq!(config.listen_port, 9000);
        assert!(!config.prometheus_exporter);
    }

    #[test]
    fn cli_overrides_file() {
        let matches = test_command().get_matches_from(vec!["test", "--port", "7000"]);
        let config: toml::Value = toml::from_str("listen-port = 9000").unwrap();
        let config = load_config_internal(&matches, &config).unwrap();
        assert_eq!(config.listen_port, 7000);
    }

    #[test]
    fn wrong_type_in_file_is_an_error() {
        let matches = test_command().get_matches_from(vec!["test"]);
        let config: toml::Value = toml::from_str("listen-port = \"none\"").unwrap();
        assert!(load_config_internal(&matches, &config).is_err());
    }
}
