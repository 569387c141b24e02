use log::trace;
use rouille::Request;
use std::collections::HashMap;
use url::form_urlencoded;

pub struct RequestParameters {
    values: HashMap<String, String>,
}

impl RequestParameters {
    pub fn new(req: &Request) -> Self {
        let mut values = HashMap::new();
        RequestParameters::decode_url_query(req, &mut values);
        RequestParameters { values }
    }

    fn decode_url_query(req: &Request, map: &mut HashMap<String, String>) {
        let iter = form_urlencoded::parse(req.raw_query_string().as_bytes());
        for (key, val) in iter {
            trace!("query parameter '{}' => '{}'", key, val);
            let key = String::from(key);
            if !map.contains_key(&key) {
                map.insert(key, String::from(val));
            }
        }
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.values.get(name).map(|v| String::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parameters_are_decoded() {
        let req = Request::fake_http(
            "GET",
            "/getcountries/countryname?name=C%C3%B4te%20d%27Ivoire",
            vec![],
            vec![],
        );
        let params = RequestParameters::new(&req);
        assert_eq!(
            params.get_string("name"),
            Some("Côte d'Ivoire".to_string())
        );
        assert_eq!(params.get_string("missing"), None);
    }

    #[test]
    fn first_occurrence_of_a_parameter_wins() {
        let req = Request::fake_http("GET", "/x?name=a&name=b", vec![], vec![]);
        let params = RequestParameters::new(&req);
        assert_eq!(params.get_string("name"), Some("a".to_string()));
    }
}
