//! Verify URL construction against JSON test vectors stored in `test-vectors/`.
//!
//! Each case gives a URL, the parameters set in call order, and the exact
//! string `uri()` must produce. Also checks that building a request never
//! touches the transport.

use fast_request::{
    Client, ParamValue, Transport, TransportError, TransportRequest, TransportResponse,
};

/// Transport that fails the test if anything is executed.
struct NoNetwork;

impl Transport for NoNetwork {
    fn execute(
        &self,
        request: &TransportRequest,
        _response: &mut TransportResponse,
    ) -> Result<(), TransportError> {
        panic!("unexpected round trip to {}", request.uri());
    }
}

/// Map a JSON scalar from a vector file onto `ParamValue`.
fn param_value(v: &serde_json::Value) -> ParamValue {
    match v {
        serde_json::Value::String(s) => ParamValue::from(s.as_str()),
        serde_json::Value::Bool(b) => ParamValue::from(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ParamValue::from(i)
            } else if let Some(u) = n.as_u64() {
                ParamValue::from(u)
            } else {
                ParamValue::from(n.as_f64().unwrap())
            }
        }
        other => panic!("unsupported param value: {other}"),
    }
}

#[test]
fn uri_test_vectors() {
    let raw = include_str!("../../test-vectors/uri.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let client = Client::with_transport(NoNetwork);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let url = case["url"].as_str().unwrap();

        let mut req = client.request(url);
        for pair in case["params"].as_array().unwrap() {
            let pair = pair.as_array().unwrap();
            req = req.set_param(pair[0].as_str().unwrap(), param_value(&pair[1]));
        }

        assert_eq!(req.uri(), case["expected"].as_str().unwrap(), "{name}: uri");
        // uri() is pure; asking twice gives the same answer.
        assert_eq!(req.uri(), req.uri(), "{name}: uri is stable");
    }
}
