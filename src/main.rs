mod cli;

#[tokio::main]
async fn main() {
    if let Err(err) = poundforpound::telemetry::init_telemetry() {
        eprintln!("failed to initialize logging: {err}");
    }

    let config = match cli::run() {
        cli::RunOutcome::Serve(config) => config,
        cli::RunOutcome::Exit(code) => std::process::exit(code),
    };

    if let Err(err) = poundforpound::serve(config).await {
        tracing::error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}
