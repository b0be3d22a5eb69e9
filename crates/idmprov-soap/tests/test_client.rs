mod common;

use common::{ENDPOINT, FakeTransport, ok, resource, status};
use idmprov_soap::transport::Method;
use idmprov_soap::{SoapClient, SoapError, SoapValue};

const WSDL_URL: &str = "http://localhost:8180/IDMProv/provisioning/service?wsdl";

fn client(transport: FakeTransport) -> SoapClient<FakeTransport> {
    SoapClient::new(WSDL_URL, transport).expect("WSDL loads")
}

#[test]
fn lists_operations_and_calls_get_version() {
    let transport = FakeTransport::new()
        .respond(WSDL_URL, ok(resource("idmprov.wsdl")))
        .respond(ENDPOINT, ok(resource("get_version_response.xml")));
    let client = client(transport);

    let service = client.service().unwrap();
    assert_eq!(
        service.operation_names().join(", "),
        "getDefinitions, getProcessesByStatus, getVersion"
    );

    let version = service.call("getVersion").unwrap();
    assert_eq!(version.to_string(), "4.8.7.0100");

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].url, ENDPOINT);
    assert_eq!(
        requests[1].header("SOAPAction"),
        Some("\"http://www.novell.com/provisioning/service/getVersion\"")
    );
    let body = requests[1].body.as_deref().unwrap();
    assert!(body.contains("getVersionRequest"), "{body}");
}

#[test]
fn unknown_operation_sends_nothing() {
    let transport = FakeTransport::new().respond(WSDL_URL, ok(resource("idmprov.wsdl")));
    let client = client(transport);

    let err = client.service().unwrap().call("deleteEverything").unwrap_err();
    assert!(
        matches!(err, SoapError::UnknownOperation(ref name) if name == "deleteEverything"),
        "got {err:?}"
    );
    assert_eq!(client.transport().requests().len(), 1);
}

#[test]
fn fault_is_returned_as_error() {
    let transport = FakeTransport::new()
        .respond(WSDL_URL, ok(resource("idmprov.wsdl")))
        .respond(ENDPOINT, status(500, resource("fault_soap11.xml")));
    let client = client(transport);

    let err = client.service().unwrap().call("getVersion").unwrap_err();
    let SoapError::Fault(fault) = err else {
        panic!("expected a fault, got {err:?}");
    };
    assert_eq!(fault.message, "Authentication failed for user uaadmin");
}

#[test]
fn unreachable_wsdl_fails_construction() {
    let err = SoapClient::new(WSDL_URL, FakeTransport::new()).unwrap_err();
    assert!(
        matches!(err, SoapError::HttpStatus { status: 404, .. }),
        "got {err:?}"
    );
}

#[test]
fn explicit_binding() {
    let transport = FakeTransport::new()
        .respond(WSDL_URL, ok(resource("idmprov.wsdl")))
        .respond(ENDPOINT, ok(resource("get_version_response.xml")));
    let client = client(transport);

    let service = client
        .bind("Provisioning", "IRemoteProvisioningPort")
        .unwrap();
    assert_eq!(service.port().address, ENDPOINT);
    assert_eq!(
        service.call("getVersion").unwrap(),
        SoapValue::Text("4.8.7.0100".to_owned())
    );
}
