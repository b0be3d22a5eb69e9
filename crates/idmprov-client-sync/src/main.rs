mod config;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use idmprov_soap::{SoapClient, UreqTransport};
use tracing::{info, instrument};

use config::{init_logging, Args};

fn main() -> anyhow::Result<()> {
    // Usage errors exit here, before logging or any network activity.
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_level()) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    run_app(&args, &mut std::io::stdout().lock())
}

/// Loads the WSDL, prints the supported operations and the service version.
#[instrument(name = "run_app", level = "info", skip_all, fields(wsdl = %args.wsdl, username = %args.username))]
fn run_app(args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    let transport = UreqTransport::new(args.transport_config())?;

    let client = SoapClient::new(&args.wsdl, transport)
        .with_context(|| format!("failed to load WSDL from {}", args.wsdl))?;
    let service = client.service()?;
    info!(address = %service.port().address, "service bound");

    writeln!(
        out,
        "supported operations: {}",
        service.operation_names().join(", ")
    )?;

    let version = service
        .call("getVersion")
        .context("failed to call getVersion")?;
    writeln!(out, "version: {version}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="http://www.novell.com/provisioning/service"
             targetNamespace="http://www.novell.com/provisioning/service">
  <message name="getVersionRequest"><part name="parameters" element="tns:getVersionRequest"/></message>
  <message name="getVersionResponse"><part name="parameters" element="tns:getVersionResponse"/></message>
  <message name="getTaskCountRequest"><part name="parameters" element="tns:getTaskCountRequest"/></message>
  <message name="getTaskCountResponse"><part name="parameters" element="tns:getTaskCountResponse"/></message>
  <portType name="IRemoteProvisioning">
    <operation name="getVersion">
      <input message="tns:getVersionRequest"/><output message="tns:getVersionResponse"/>
    </operation>
    <operation name="getTaskCount">
      <input message="tns:getTaskCountRequest"/><output message="tns:getTaskCountResponse"/>
    </operation>
  </portType>
  <binding name="IRemoteProvisioningBinding" type="tns:IRemoteProvisioning">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="getVersion">
      <soap:operation soapAction="getVersion"/>
      <input><soap:body use="literal"/></input><output><soap:body use="literal"/></output>
    </operation>
    <operation name="getTaskCount">
      <soap:operation soapAction="getTaskCount"/>
      <input><soap:body use="literal"/></input><output><soap:body use="literal"/></output>
    </operation>
  </binding>
  <service name="Provisioning">
    <port name="IRemoteProvisioningPort" binding="tns:IRemoteProvisioningBinding">
      <soap:address location="{ENDPOINT}"/>
    </port>
  </service>
</definitions>"#;

    const VERSION_RESPONSE: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <ns1:getVersionResponse xmlns:ns1="http://www.novell.com/provisioning/service">
      <ns1:Version>4.8.7</ns1:Version>
    </ns1:getVersionResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

    fn args(wsdl: String, extra: &[&str]) -> Args {
        let mut argv = vec!["idmprov-client-sync", "-w", wsdl.as_str(), "-p", "secret"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn prints_operations_then_version() {
        let mut server = Server::new();
        let endpoint = format!("{}/IDMProv/provisioning/service", server.url());
        // base64("uaadmin:secret")
        let auth = "Basic dWFhZG1pbjpzZWNyZXQ=";

        let wsdl_mock = server
            .mock("GET", "/IDMProv/provisioning/service")
            .match_query(Matcher::Any)
            .match_header("authorization", auth)
            .with_body(WSDL.replace("{ENDPOINT}", &endpoint))
            .create();
        let call_mock = server
            .mock("POST", "/IDMProv/provisioning/service")
            .match_header("authorization", auth)
            .match_header("soapaction", "\"getVersion\"")
            .with_body(VERSION_RESPONSE)
            .create();

        let mut out = Vec::new();
        run_app(&args(format!("{endpoint}?wsdl"), &[]), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "supported operations: getTaskCount, getVersion\nversion: 4.8.7\n"
        );
        wsdl_mock.assert();
        call_mock.assert();
    }

    #[test]
    fn rejected_credentials_print_nothing() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/wsdl")
            .with_status(401)
            .with_body("Unauthorized")
            .create();

        let mut out = Vec::new();
        let err = run_app(&args(format!("{}/wsdl", server.url()), &["-u", "nobody"]), &mut out)
            .unwrap_err();

        assert!(err.to_string().starts_with("failed to load WSDL from"), "{err:#}");
        assert!(out.is_empty());
    }

    #[test]
    fn unreachable_wsdl_prints_nothing() {
        let mut out = Vec::new();
        let err = run_app(&args("http://127.0.0.1:9/service?wsdl".to_owned(), &[]), &mut out)
            .unwrap_err();

        assert!(format!("{err:#}").contains("Transport error"), "{err:#}");
        assert!(out.is_empty());
    }
}
