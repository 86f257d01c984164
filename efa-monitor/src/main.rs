use std::process::ExitCode;

use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use efa_monitor::config::{Settings, load_stops};
use efa_monitor::domain::WatchedStop;
use efa_monitor::efa::{EfaClient, MockTransport, Transport};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let stops = match load_stops(&settings.stops_file) {
        Ok(stops) => stops,
        Err(e) => {
            error!(error = %e, "failed to load watched stops");
            return ExitCode::FAILURE;
        }
    };
    if stops.is_empty() {
        warn!(file = %settings.stops_file.display(), "no watched stops configured");
    }

    let failures = match &settings.mock_dir {
        Some(dir) => match MockTransport::from_dir(dir) {
            Ok(transport) => {
                info!(dir = %dir.display(), responses = transport.len(), "using mock responses");
                let client = EfaClient::with_transport(transport, settings.efa.base_url.clone());
                poll(&client, &stops).await
            }
            Err(e) => {
                error!(error = %e, "failed to load mock responses");
                return ExitCode::FAILURE;
            }
        },
        None => match EfaClient::new(settings.efa.clone()) {
            Ok(client) => poll(&client, &stops).await,
            Err(e) => {
                error!(error = %e, "failed to create EFA client");
                return ExitCode::FAILURE;
            }
        },
    };

    if failures > 0 {
        warn!(failures, "some monitors could not be fetched");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Fetch both monitors of every stop once, printing one JSON line each.
///
/// A failed monitor is logged and skipped. Returns the number of failures.
async fn poll<T: Transport>(client: &EfaClient<T>, stops: &[WatchedStop]) -> usize {
    let mut failures = 0;

    for stop in stops {
        match client.departure_monitor(stop).await {
            Ok(monitor) => {
                info!(stop = %stop.name, departures = monitor.len(), "departure monitor");
                emit(json!({ "stop": stop.id, "kind": "departures", "monitor": monitor }));
            }
            Err(e) => {
                warn!(stop = %stop.name, error = %e, "departure monitor failed");
                failures += 1;
            }
        }

        match client.arrival_monitor(stop).await {
            Ok(monitor) => {
                info!(stop = %stop.name, arrivals = monitor.len(), "arrival monitor");
                emit(json!({ "stop": stop.id, "kind": "arrivals", "monitor": monitor }));
            }
            Err(e) => {
                warn!(stop = %stop.name, error = %e, "arrival monitor failed");
                failures += 1;
            }
        }
    }

    failures
}

fn emit(line: serde_json::Value) {
    println!("{line}");
}
