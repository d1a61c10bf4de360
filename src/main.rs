use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Map;
use tracing::debug;

use plugin_update_checker::config::{UpdaterConfig, data_dir, db_path, log_path};
use plugin_update_checker::host::{
    Hook, HookOutput, HookRegistry, HostAdapter, HostEvent, RequestContext, UpdateTransient,
    Updater,
};
use plugin_update_checker::logging::{self, LogTarget};
use plugin_update_checker::update::remote::HttpInfoClient;
use plugin_update_checker::update::sqlite::SqliteStore;
use plugin_update_checker::update::types::ProductEntity;

#[derive(Parser)]
#[command(name = "plugin-update-checker")]
#[command(version, about = "License-gated update checks against a license server")]
struct Cli {
    /// Write JSON logs to stderr instead of the log directory
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Updater configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Product description (JSON)
    #[arg(long)]
    product: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether an update is available
    Check {
        #[command(flatten)]
        target: Target,

        /// Ignore the cached answer
        #[arg(long)]
        force: bool,
    },
    /// Print the product details payload
    Details {
        #[command(flatten)]
        target: Target,
    },
    /// Print the license notice for the product
    Notice {
        #[command(flatten)]
        target: Target,
    },
    /// Remove expired entries from the cache database
    PurgeCache,
}

/// Hook registry for running outside a host: accepts every registration
struct StandaloneHooks;

impl HookRegistry for StandaloneHooks {
    fn supports_hooks(&self) -> bool {
        true
    }

    fn add_hook(&mut self, hook: &Hook, priority: i32, accepted_args: u8) {
        debug!(
            "Standalone hook {} (priority {}, {} args)",
            hook.name(),
            priority,
            accepted_args
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let target = if cli.json_log {
        LogTarget::StderrJson
    } else {
        LogTarget::File(log_path())
    };
    let _guard = logging::init(target)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}

/// What to ask the adapter once the product is loaded
enum Request {
    Check { force: bool },
    Details,
    Notice,
}

async fn run(command: Command) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir())?;
    let store = Arc::new(SqliteStore::new(&db_path())?);

    let (target, request) = match command {
        Command::PurgeCache => {
            let removed = store.purge_expired()?;
            println!("Removed {} expired entries", removed);
            return Ok(());
        }
        Command::Check { target, force } => (target, Request::Check { force }),
        Command::Details { target } => (target, Request::Details),
        Command::Notice { target } => (target, Request::Notice),
    };

    let config = match &target.config {
        Some(path) => UpdaterConfig::from_file(path)?,
        None => UpdaterConfig::default(),
    };
    let product: ProductEntity =
        serde_json::from_str(&std::fs::read_to_string(&target.product)?)?;

    let (event, force_check) = match request {
        Request::Check { force } => {
            let transient = UpdateTransient {
                response: Some(Map::new()),
                ..UpdateTransient::default()
            };
            (HostEvent::UpdateCheck(transient), force)
        }
        Request::Details => (
            HostEvent::PluginDetails {
                action: "plugin_information".to_string(),
                slug: Some(product.slug.clone()),
            },
            false,
        ),
        Request::Notice => (HostEvent::UpdateMessage, false),
    };

    let context = RequestContext {
        force_check,
        environment: config.environment.clone(),
    };
    let updater = Updater {
        product,
        client: Arc::new(HttpInfoClient::new(&config.api)?),
        store,
        config,
    };
    let adapter = HostAdapter::attach(updater, &mut StandaloneHooks)?;

    match adapter.dispatch(event, &context).await {
        HookOutput::Transient(transient) => {
            let update = transient
                .response
                .and_then(|mut response| response.remove(&adapter.product().basename));
            match update {
                Some(update) => println!("{}", serde_json::to_string_pretty(&update)?),
                None => println!("{} is up to date", adapter.product().slug),
            }
        }
        HookOutput::Details(Some(details)) => {
            println!("{}", serde_json::to_string_pretty(&details)?)
        }
        HookOutput::Details(None) => println!("No details available"),
        HookOutput::Notice(notice) if notice.is_silent() => println!("License is valid"),
        HookOutput::Notice(notice) => println!("{}", notice),
    }

    Ok(())
}
