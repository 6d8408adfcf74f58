//! Logging setup for the chainup CLI

/// Initialize console logging (INFO default, `RUST_LOG` override)
pub fn init_cli_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
    .init();
}
