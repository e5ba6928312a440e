use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "trip_planner_backend=debug,tower_http=debug,info",
        Environment::Staging => "trip_planner_backend=debug,tower_http=info,info",
        Environment::Prod => "trip_planner_backend=info,tower_http=info,warn",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the per-environment
/// default filter.
pub fn init_logging(env: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(env).into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    // JSON lines in production, pretty output elsewhere
    if env.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }

    tracing::info!("Logging initialized for {:?} environment", env);
}
