use mirrorsync::presentation::cli::CliApp;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let app = CliApp::new();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = if app.verbose() { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!app.no_color())
        .init();

    // Run the CLI application
    let code = app.run().await;
    std::process::exit(code);
}
