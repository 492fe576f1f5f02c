use parley::config;
use parley::domain::call::{AppSign, CallCredentials};
use parley::domain::user::UserDirectory;
use parley::infrastructure::callkit::{LoggingWidget, WidgetContext};
use parley::infrastructure::permissions::SimulatedPermissions;
use parley::infrastructure::store::{MemoryDirectory, RemoteDirectory};
use parley::interface::flow::AppFlow;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Parley call client");

    // Load configuration
    let config = config::load(None)?;
    info!(
        backend = %config.store.backend,
        user_id = %config.identity.user_id,
        "configuration loaded"
    );

    // Choose the store backend
    let directory: Arc<dyn UserDirectory> = match config.store.backend.as_str() {
        "remote" => Arc::new(RemoteDirectory::connect(&config.store.url).await?),
        _ => Arc::new(MemoryDirectory::new()),
    };

    let permissions = Arc::new(SimulatedPermissions::new());
    let credentials = CallCredentials::new(
        config.callkit.app_id,
        AppSign::parse(&config.callkit.app_sign)?,
    );
    let widget_context = WidgetContext::new(credentials, Arc::new(LoggingWidget::new()));

    let mut flow = AppFlow::new(directory, permissions, widget_context);
    flow.login(&config.identity.user_id).await?;

    // Tail roster updates until Ctrl-C
    let mut updates = flow.roster_updates()?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    // Roster stream ended (store connection lost); keep the
                    // last state and wait for shutdown.
                    info!("roster stream ended");
                    tokio::signal::ctrl_c().await?;
                    break;
                }
                let roster = updates.borrow().clone();
                info!(users = roster.len(), "roster updated");
                for entry in roster.entries() {
                    debug!(user_id = %entry.id, name = %entry.name, "roster entry");
                }
            }
        }
    }

    flow.logout().await;
    info!("shut down cleanly");
    Ok(())
}
