use std::sync::Arc;

use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotline::auth::AdminAllowList;
use hotline::clock::SystemClock;
use hotline::config::Config;
use hotline::forward_store::{ForwardStore, SqliteForwardStore};
use hotline::schedule::{load_schedule, ShiftResolver};
use hotline::state::CallSettings;
use hotline::{api, db, refresh, AppState};

#[derive(Parser)]
#[command(name = "hotline", version, about = "Hotline call-forwarding webhook service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the voice webhooks and refresh the forwarding number periodically (default)
    Serve,
    /// Write the on-call volunteer's number to the store once and exit
    Refresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotline=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let schedule = load_schedule(&config.schedule_path)?;
    let resolver = Arc::new(ShiftResolver::new(schedule, config.shift_hour));

    let db = db::connect(&config.database_url).await?;
    let store: Arc<dyn ForwardStore> = Arc::new(SqliteForwardStore::new(db));
    if store.init_if_absent(&config.default_forward_number).await? {
        info!(forward_number = %config.default_forward_number, "initialized forwarding number");
    }

    let state = Arc::new(AppState {
        store,
        resolver,
        authorizer: Arc::new(AdminAllowList::new(config.admin_numbers.clone())),
        clock: Arc::new(SystemClock),
        call: CallSettings::from_config(&config),
    });

    match cli.command.unwrap_or(Command::Serve) {
        Command::Refresh => {
            refresh::refresh_forward_number(
                &state.resolver,
                state.store.as_ref(),
                &state.call.default_forward_number,
                state.clock.now(),
            )
            .await?;
            Ok(())
        }
        Command::Serve => serve(config, state).await,
    }
}

async fn serve(config: Config, state: Arc<AppState>) -> anyhow::Result<()> {
    info!(
        port = config.port,
        shift_hour = config.shift_hour,
        timezone = state.resolver.tz().name(),
        "hotline starting"
    );

    // Periodic refresh; an administrator override lasts until the next tick.
    tokio::spawn(refresh::run_forward_refresh(
        Arc::clone(&state),
        config.refresh_interval,
    ));

    let app = api::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
