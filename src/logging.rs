use lazy_static::lazy_static;
use std::{env, io};
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};
use tracing_loki::url::Url;
use tracing_loki::BackgroundTaskController;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

const SERVICE_NAME: &str = "freefood";

lazy_static! {
    static ref LOKI_URL: Option<String> = env::var("LOKI_URL").ok();
}

/// Keeps the Loki background task alive for the run; call [`LoggingGuard::shutdown`] before exiting
pub struct LoggingGuard {
    loki: Option<(BackgroundTaskController, JoinHandle<()>)>,
}

impl LoggingGuard {
    /// Flushes pending Loki logs
    pub async fn shutdown(self) {
        if let Some((controller, handle)) = self.loki {
            controller.shutdown().await;

            if let Err(err) = handle.await {
                eprintln!("Loki task failed: {err}");
            }
        }
    }
}

pub async fn setup_logging() -> LoggingGuard {
    let filter = filter::Targets::new()
        .with_target(SERVICE_NAME, Level::TRACE)
        .with_default(Level::WARN);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stdout));

    let Some(base_url) = LOKI_URL.as_ref() else {
        registry.init();
        warn!("Loki URL not provided. Continuing without it.");

        return LoggingGuard { loki: None };
    };

    let base_url: Url = match base_url.parse() {
        Ok(url) => url,
        Err(err) => {
            registry.init();
            warn!("Invalid Loki URL ({err}). Continuing without it.");

            return LoggingGuard { loki: None };
        }
    };

    if reqwest::get(base_url.clone()).await.is_err() {
        registry.init();
        warn!("Couldn't connect to Loki. Continuing without it.");

        return LoggingGuard { loki: None };
    }

    let loki = tracing_loki::builder()
        .label("service", SERVICE_NAME)
        .and_then(|builder| builder.build_controller_url(base_url));

    match loki {
        Ok((layer, controller, task)) => {
            registry.with(layer).init();
            let handle = tokio::spawn(task);

            info!("Loki initialized");

            LoggingGuard {
                loki: Some((controller, handle)),
            }
        }
        Err(err) => {
            registry.init();
            warn!("Failed building Loki layer ({err}). Continuing without it.");

            LoggingGuard { loki: None }
        }
    }
}
