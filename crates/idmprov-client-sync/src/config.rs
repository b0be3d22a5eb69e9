use clap::{ArgGroup, Parser};
use idmprov_soap::transport::{BasicAuth, TransportConfig};
use tracing::{Level, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, registry::Registry, EnvFilter};

/// Target of the transport's request/response logging; the only namespace the flags raise.
const TRANSPORT_TARGET: &str = "idmprov_soap::transport";

/// Sets up a panic hook so panics end up in the log as well.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("A panic occurred: {}", panic_info);
    }));
}

/// How to access the IDMProv SOAP API over basic-auth HTTP
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("verbosity").args(["verbose", "quiet"])))]
pub struct Args {
    #[arg(short, long, help = "Verbose (debug) logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Silent mode, only log warnings")]
    pub quiet: bool,

    #[arg(short, long, value_name = "URL", help = "WSDL URL")]
    pub wsdl: String,

    #[arg(
        short,
        long,
        default_value = "uaadmin",
        help = "Username, defaults to uaadmin"
    )]
    pub username: String,

    #[arg(short, long, value_name = "PASSWORD", help = "Password")]
    pub password: String,
}

impl Args {
    /// `None` when neither `--verbose` nor `--quiet` was given.
    pub fn log_level(&self) -> Option<Level> {
        if self.verbose {
            Some(Level::DEBUG)
        } else if self.quiet {
            Some(Level::WARN)
        } else {
            None
        }
    }

    pub fn credentials(&self) -> BasicAuth {
        BasicAuth::new(self.username.as_str(), self.password.as_str())
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::builder().auth(self.credentials()).build()
    }
}

/// Filter directives: everything at `warn`, the transport namespace at the chosen level.
pub fn filter_directives(level: Option<Level>) -> String {
    let transport_level = level.unwrap_or(Level::INFO).as_str().to_ascii_lowercase();
    format!("warn,{TRANSPORT_TARGET}={transport_level}")
}

/// One console handler printing `target: message`, filtered by [`filter_directives`].
fn console_subscriber<W>(
    level: Option<Level>,
    writer: W,
) -> anyhow::Result<impl Subscriber + Send + Sync + 'static>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::builder().parse(filter_directives(level))?;

    Ok(Registry::default().with(env_filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_level(false)
            .without_time()
            .with_ansi(false),
    ))
}

/// Installs the console handler on stderr.
pub fn init_logging(level: Option<Level>) -> anyhow::Result<()> {
    setup_panic_hook();

    // Bridge logs from the `log` crate (ureq) to `tracing`
    LogTracer::init().ok();

    tracing::subscriber::set_global_default(console_subscriber(level, std::io::stderr)?)?;

    Ok(())
}
