use std::process::ExitCode;

use aiva_federated::api::customer::RequestOutcome;
use aiva_federated::cache::FileTokenStore;
use aiva_federated::credentials::Credentials;
use aiva_federated::Config;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Checked before touching the cache or the network.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match send_customer_request(&credentials) {
        Ok(RequestOutcome::Accepted) => println!("Success!"),
        Ok(RequestOutcome::Rejected { status_line, body }) => {
            println!("Failed request");
            println!(" Status: {}", status_line);
            println!(" Content: {}", body);
        }
        Err(err) => {
            eprintln!("Exiting; {err:#}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn send_customer_request(credentials: &Credentials) -> anyhow::Result<RequestOutcome> {
    let config = Config::default();
    let mut store = FileTokenStore::new(config.cache_file.clone());

    aiva_federated::run(&config, credentials, &mut store)
        .context("could not send the customer request")
}
