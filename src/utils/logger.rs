use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line, for log collectors.
    Json,
}

impl LogFormat {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(n) if n.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Both binaries log under their own crate names, so each gets a directive
/// on top of the `warn` fallback for dependencies.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,customer_360=debug,toml_dashboard=debug"
    } else {
        "warn,customer_360=info,toml_dashboard=info"
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    // RUST_LOG 優先
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Logs go to stderr so stdout stays free for the summary and the prompt.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let base = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    let layer = match format {
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
    };

    if tracing_subscriber::registry()
        .with(layer)
        .with(default_filter(verbose))
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, verbose);
}
