pub mod data;

mod api_error;
mod parameters;
mod prometheus_exporter;

use log::{debug, error, info};
use rouille::router;
use rouille::Request;
use rouille::Response;

use std::error::Error;
use std::fs::OpenOptions;
use std::io::prelude::*;

use self::api_error::ApiError;
use self::parameters::RequestParameters;
use self::prometheus_exporter::PrometheusExporter;
use crate::api::data::ApiCountry;
use crate::api::data::ResultMessage;
use crate::config::Config;
use crate::db::DbConnection;

fn add_cors(result: rouille::Response) -> rouille::Response {
    result
        .with_unique_header("Access-Control-Allow-Origin", "*")
        .with_unique_header(
            "Access-Control-Allow-Headers",
            "origin, x-requested-with, content-type",
        )
        .with_unique_header("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE")
}

pub fn run(
    connection: Box<dyn DbConnection + Send + Sync>,
    config: Config,
) -> Result<(), Box<dyn Error>> {
    let listen_str = format!("{}:{}", config.listen_host, config.listen_port);
    info!("Listen on {} with {} threads", listen_str, config.threads);
    let pool_size = Some(config.threads);
    let exporter = PrometheusExporter::new(&config.prometheus_exporter_prefix)?;
    rouille::start_server_with_pool(listen_str, pool_size, move |request| {
        handle_connection(connection.as_ref(), &exporter, request, &config)
    })
}

fn log_to_file(file_name: &str, line: &str) {
    let file = OpenOptions::new()
        .write(true)
        .append(true)
        .create(true)
        .open(file_name);

    match file {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", line) {
                error!("Couldn't write to file: {}", e);
            }
        }
        Err(err) => {
            error!("Could not open log file {}", err);
        }
    }
}

fn handle_connection(
    connection: &dyn DbConnection,
    exporter: &PrometheusExporter,
    request: &rouille::Request,
    config: &Config,
) -> rouille::Response {
    let remote_ip: String = request
        .header("X-Forwarded-For")
        .unwrap_or(&request.remote_addr().ip().to_string())
        .to_string();
    let referer: String = request.header("Referer").unwrap_or("-").to_string();
    let user_agent: String = request.header("User-agent").unwrap_or("-").to_string();

    let now = chrono::Utc::now().format("%d/%m/%Y:%H:%M:%S%.6f");
    let log_dir = config.log_dir.clone();
    let log_ok = |req: &Request, resp: &Response, _elap: std::time::Duration| {
        let line = format!(
            r#"{} - - [{}] "{} {}" {} {} "{}" "{}""#,
            remote_ip,
            now,
            req.method(),
            req.raw_url(),
            resp.status_code,
            0,
            referer,
            user_agent
        );
        debug!("{}", line);
        log_to_file(&format!("{}/access.log", log_dir), &line);
    };
    let log_err = |req: &Request, _elap: std::time::Duration| {
        let line = format!(
            "{} {} Handler panicked: {} {}",
            remote_ip,
            now,
            req.method(),
            req.raw_url()
        );
        debug!("{}", line);
        log_to_file(&format!("{}/error.log", log_dir), &line);
    };
    rouille::log_custom(request, log_ok, log_err, || {
        let (operation, result) = handle_connection_internal(connection, exporter, request, config);
        if let Err(ApiError::ServerError(ref msg)) = result {
            error!("'{}' failed: {}", operation, msg);
        }
        let response = match result {
            Ok(response) => response,
            Err(err) => err.to_response(),
        };
        exporter.count_api_call(operation, response.status_code);
        add_cors(response)
    })
}

fn handle_connection_internal(
    connection: &dyn DbConnection,
    exporter: &PrometheusExporter,
    request: &rouille::Request,
    config: &Config,
) -> (&'static str, Result<Response, ApiError>) {
    router!(request,
        (GET) (/getcountries) => {
            ("get_countries", get_countries(connection))
        },
        (GET) (/getcountries/countryname) => {
            ("get_country_by_name", get_country_by_name(connection, request))
        },
        (GET) (/getcountries/{id: i64}) => {
            ("get_country_by_id", get_country_by_id(connection, id))
        },
        (POST) (/addcountry) => {
            ("add_country", add_country(connection, request))
        },
        (PUT) (/updatecountry/{id: i64}) => {
            ("update_country", update_country(connection, request, id))
        },
        (DELETE) (/deletecountry/{id: i64}) => {
            ("delete_country", delete_country(connection, id))
        },
        (GET) (/metrics) => {
            ("metrics", metrics(connection, exporter, config))
        },
        _ => ("unknown", Err(ApiError::NotFound(String::from("no such endpoint"))))
    )
}

fn read_country_payload(request: &rouille::Request) -> Result<ApiCountry, ApiError> {
    let data = request
        .data()
        .ok_or_else(|| ApiError::BadRequest(String::from("request body missing")))?;
    serde_json::from_reader(data)
        .map_err(|err| ApiError::BadRequest(format!("invalid country payload: {}", err)))
}

fn get_countries(connection: &dyn DbConnection) -> Result<Response, ApiError> {
    ApiCountry::get_list_response(connection.get_countries()?)
}

fn get_country_by_id(connection: &dyn DbConnection, id: i64) -> Result<Response, ApiError> {
    ApiCountry::get_single_response(connection.get_country_by_id(id)?)
}

fn get_country_by_name(
    connection: &dyn DbConnection,
    request: &rouille::Request,
) -> Result<Response, ApiError> {
    let params = RequestParameters::new(request);
    let name = params
        .get_string("name")
        .ok_or_else(|| ApiError::BadRequest(String::from("missing parameter 'name'")))?;
    ApiCountry::get_single_response(connection.get_country_by_name(&name)?)
}

fn add_country(
    connection: &dyn DbConnection,
    request: &rouille::Request,
) -> Result<Response, ApiError> {
    let payload = read_country_payload(request)?;
    let stored = connection.add_country(payload.into())?;
    ApiCountry::get_single_response(stored)
}

fn update_country(
    connection: &dyn DbConnection,
    request: &rouille::Request,
    id: i64,
) -> Result<Response, ApiError> {
    let payload = read_country_payload(request)?;
    let updated = connection.update_country(id, &payload.name, &payload.capital)?;
    ApiCountry::get_single_response(updated)
}

fn delete_country(connection: &dyn DbConnection, id: i64) -> Result<Response, ApiError> {
    connection.delete_country(id)?;
    ResultMessage::new(true, format!("country {} deleted", id)).get_response()
}

fn metrics(
    connection: &dyn DbConnection,
    exporter: &PrometheusExporter,
    config: &Config,
) -> Result<Response, ApiError> {
    if !config.prometheus_exporter {
        return Ok(Response::text("Exporter not enabled!").with_status_code(423));
    }
    exporter.render(connection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryConnection;
    use std::io::Read;

    fn test_config() -> Config {
        Config {
            connection_string: String::from("memory"),
            listen_host: String::from("127.0.0.1"),
            listen_port: 8080,
            log_dir: String::from("."),
            log_level: 0,
            prometheus_exporter: true,
            prometheus_exporter_prefix: String::from("country_api_"),
            threads: 1,
        }
    }

    fn dispatch(
        connection: &MemoryConnection,
        exporter: &PrometheusExporter,
        config: &Config,
        method: &str,
        url: &str,
        body: &str,
    ) -> (u16, String) {
        let request = Request::fake_http(method, url, vec![], body.as_bytes().to_vec());
        let (_operation, result) =
            handle_connection_internal(connection, exporter, &request, config);
        let response = match result {
            Ok(response) => response,
            Err(err) => err.to_response(),
        };
        let status_code = response.status_code;
        let (mut reader, _size) = response.data.into_reader_and_size();
        let mut body = String::new();
        reader.read_to_string(&mut body).unwrap();
        (status_code, body)
    }

    fn test_setup() -> (MemoryConnection, PrometheusExporter, Config) {
        let connection = MemoryConnection::new();
        let exporter = PrometheusExporter::new("country_api_").unwrap();
        (connection, exporter, test_config())
    }

    #[test]
    fn create_then_list_echoes_the_record() {
        let (connection, exporter, config) = test_setup();
        let (status, body) = dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"France","capital":"Paris"}"#,
        );
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"idCountry":1,"name":"France","capital":"Paris"}"#);

        let (status, body) = dispatch(&connection, &exporter, &config, "GET", "/getcountries", "");
        assert_eq!(status, 200);
        assert_eq!(
            body,
            r#"[{"idCountry":1,"name":"France","capital":"Paris"}]"#
        );
    }

    #[test]
    fn list_of_empty_store_is_an_empty_array() {
        let (connection, exporter, config) = test_setup();
        let (status, body) = dispatch(&connection, &exporter, &config, "GET", "/getcountries", "");
        assert_eq!(status, 200);
        assert_eq!(body, "[]");
    }

    #[test]
    fn get_by_id_on_empty_store_is_404() {
        let (connection, exporter, config) = test_setup();
        let (status, body) =
            dispatch(&connection, &exporter, &config, "GET", "/getcountries/99", "");
        assert_eq!(status, 404);
        assert!(body.contains("\"ok\":false"));
    }

    #[test]
    fn update_replaces_the_stored_record() {
        let (connection, exporter, config) = test_setup();
        dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"France","capital":"Paris"}"#,
        );
        let (status, body) = dispatch(
            &connection,
            &exporter,
            &config,
            "PUT",
            "/updatecountry/1",
            r#"{"name":"France","capital":"Lyon"}"#,
        );
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"idCountry":1,"name":"France","capital":"Lyon"}"#);

        let (status, body) =
            dispatch(&connection, &exporter, &config, "GET", "/getcountries/1", "");
        assert_eq!(status, 200);
        assert!(body.contains("\"capital\":\"Lyon\""));
    }

    #[test]
    fn update_of_unknown_id_is_404() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) = dispatch(
            &connection,
            &exporter,
            &config,
            "PUT",
            "/updatecountry/5",
            r#"{"name":"France","capital":"Paris"}"#,
        );
        assert_eq!(status, 404);
    }

    #[test]
    fn delete_then_get_is_404() {
        let (connection, exporter, config) = test_setup();
        dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"France","capital":"Paris"}"#,
        );
        let (status, body) = dispatch(
            &connection,
            &exporter,
            &config,
            "DELETE",
            "/deletecountry/1",
            "",
        );
        assert_eq!(status, 200);
        assert!(body.contains("\"ok\":true"));

        let (status, _body) =
            dispatch(&connection, &exporter, &config, "GET", "/getcountries/1", "");
        assert_eq!(status, 404);
    }

    #[test]
    fn delete_of_unknown_id_is_404() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) = dispatch(
            &connection,
            &exporter,
            &config,
            "DELETE",
            "/deletecountry/1",
            "",
        );
        assert_eq!(status, 404);
    }

    #[test]
    fn get_by_name_finds_the_created_record() {
        let (connection, exporter, config) = test_setup();
        dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"France","capital":"Paris"}"#,
        );
        let (status, body) = dispatch(
            &connection,
            &exporter,
            &config,
            "GET",
            "/getcountries/countryname?name=France",
            "",
        );
        assert_eq!(status, 200);
        assert!(body.contains("\"idCountry\":1"));
    }

    #[test]
    fn get_by_name_of_unknown_name_is_404() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) = dispatch(
            &connection,
            &exporter,
            &config,
            "GET",
            "/getcountries/countryname?name=Atlantis",
            "",
        );
        assert_eq!(status, 404);
    }

    #[test]
    fn get_by_name_without_parameter_is_400() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) = dispatch(
            &connection,
            &exporter,
            &config,
            "GET",
            "/getcountries/countryname",
            "",
        );
        assert_eq!(status, 400);
    }

    #[test]
    fn duplicate_create_is_409() {
        let (connection, exporter, config) = test_setup();
        dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"France","capital":"Paris"}"#,
        );
        let (status, body) = dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"Italy","capital":"Rome"}"#,
        );
        assert_eq!(status, 409);
        assert!(body.contains("already exists"));
    }

    #[test]
    fn malformed_payload_is_400() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) = dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            "{not json",
        );
        assert_eq!(status, 400);
    }

    #[test]
    fn blank_fields_are_400() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) = dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"","capital":"Paris"}"#,
        );
        assert_eq!(status, 400);
    }

    #[test]
    fn unknown_endpoint_is_404() {
        let (connection, exporter, config) = test_setup();
        let (status, _body) =
            dispatch(&connection, &exporter, &config, "GET", "/nosuchpath", "");
        assert_eq!(status, 404);
    }

    #[test]
    fn metrics_report_counters_and_store_size() {
        let (connection, exporter, config) = test_setup();
        dispatch(
            &connection,
            &exporter,
            &config,
            "POST",
            "/addcountry",
            r#"{"idCountry":1,"name":"France","capital":"Paris"}"#,
        );
        exporter.count_api_call("add_country", 200);
        let (status, body) = dispatch(&connection, &exporter, &config, "GET", "/metrics", "");
        assert_eq!(status, 200);
        assert!(body.contains("country_api_countries 1"));
        assert!(body.contains("country_api_api_calls"));
    }

    #[test]
    fn metrics_answer_423_when_disabled() {
        let (connection, exporter, mut config) = test_setup();
        config.prometheus_exporter = false;
        let (status, _body) = dispatch(&connection, &exporter, &config, "GET", "/metrics", "");
        assert_eq!(status, 423);
    }
}
