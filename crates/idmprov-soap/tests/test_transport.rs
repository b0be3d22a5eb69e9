mod common;

use common::resource;
use idmprov_soap::transport::{
    BasicAuth, HttpRequest, HttpTransport, TransportConfig, UreqTransport,
};
use idmprov_soap::{SoapClient, SoapError};
use mockito::{Matcher, Server};

fn transport(username: &str, password: &str) -> UreqTransport {
    UreqTransport::new(
        TransportConfig::builder()
            .auth(BasicAuth::new(username, password))
            .build(),
    )
    .expect("transport")
}

#[test]
fn sends_basic_auth_on_wsdl_fetch_and_call() {
    let mut server = Server::new();
    let endpoint = format!("{}/IDMProv/provisioning/service", server.url());
    let wsdl = resource("idmprov.wsdl").replace(common::ENDPOINT, &endpoint);

    // base64("uaadmin:secret")
    let auth = "Basic dWFhZG1pbjpzZWNyZXQ=";
    let wsdl_mock = server
        .mock("GET", "/IDMProv/provisioning/service")
        .match_query(Matcher::UrlEncoded("wsdl".into(), String::new()))
        .match_header("authorization", auth)
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(wsdl)
        .create();
    let call_mock = server
        .mock("POST", "/IDMProv/provisioning/service")
        .match_header("authorization", auth)
        .match_header("content-type", "text/xml; charset=utf-8")
        .match_header(
            "soapaction",
            "\"http://www.novell.com/provisioning/service/getVersion\"",
        )
        .match_body(Matcher::Regex("getVersionRequest".into()))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=utf-8")
        .with_body(resource("get_version_response.xml"))
        .create();

    let client = SoapClient::new(&format!("{endpoint}?wsdl"), transport("uaadmin", "secret"))
        .expect("WSDL loads");
    let version = client.service().unwrap().call("getVersion").unwrap();

    assert_eq!(version.to_string(), "4.8.7.0100");
    wsdl_mock.assert();
    call_mock.assert();
}

#[test]
fn error_statuses_are_responses() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/wsdl")
        .with_status(401)
        .with_body("Unauthorized")
        .create();

    let response = transport("uaadmin", "wrong")
        .send_request(HttpRequest::get(format!("{}/wsdl", server.url())))
        .unwrap();

    assert_eq!(response.status_code, 401);
    assert_eq!(response.body, "Unauthorized");
    mock.assert();
}

#[test]
fn connection_refused_is_a_transport_error() {
    // Port 9 (discard) on localhost is not expected to be listening.
    let err = transport("uaadmin", "secret")
        .send_request(HttpRequest::get("http://127.0.0.1:9/wsdl"))
        .unwrap_err();
    assert!(matches!(err, SoapError::Transport(_)), "got {err:?}");
}

#[test]
#[tracing_test::traced_test]
fn logs_request_and_response_bodies() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/service")
        .with_status(200)
        .with_body("<ok/>")
        .create();

    let url = format!("{}/service", server.url());
    transport("uaadmin", "secret")
        .send_request(HttpRequest::post(url.clone(), "<ping/>".to_owned()))
        .unwrap();

    assert!(logs_contain(&format!("HTTP Post to {url}")));
    assert!(logs_contain("<ping/>"));
    assert!(logs_contain("HTTP Response from"));
    assert!(logs_contain("<ok/>"));
}
