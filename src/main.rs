//! Route matcher CLI.
//!
//! Loads route manifests from a build output directory and answers
//! match queries against them.
//!
//! ```text
//! route-matcher match /blog/hello          first match, as JSON
//! route-matcher match /blog/hello --all    every match, most specific first
//! route-matcher routes                     compiled static/dynamic order
//! route-matcher watch                      reload on manifest change
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use route_matcher::config::watcher::ManifestWatcher;
use route_matcher::config::{load_config, RouterConfig};
use route_matcher::observability::logging::init_logging;
use route_matcher::providers::{self, server_dir};
use route_matcher::routing::i18n::I18nProvider;
use route_matcher::routing::{LocaleContext, MatchOptions, RouteMatch, RouteMatcherManager};

const DEFAULT_CONFIG: &str = "route-matcher.toml";

#[derive(Parser)]
#[command(name = "route-matcher")]
#[command(about = "Match request pathnames against compiled application routes", long_about = None)]
struct Cli {
    /// Configuration file. Defaults are used when the default file is absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `dist_dir` from the configuration.
    #[arg(short, long)]
    dist_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a pathname
    Match {
        pathname: String,

        /// Print every match instead of the first
        #[arg(long)]
        all: bool,

        /// Only match the route with exactly this pathname
        #[arg(long)]
        output: Option<String>,

        /// Locale the request resolved to. A matching locale prefix is removed
        /// from the pathname when i18n is configured.
        #[arg(long)]
        locale: Option<String>,
    },
    /// Print the compiled routes
    Routes,
    /// Reload whenever the manifests change
    Watch,
}

#[derive(Serialize)]
struct RoutesReport<'a> {
    version: u64,
    #[serde(rename = "static")]
    static_routes: Vec<&'a str>,
    dynamic: Vec<&'a str>,
    duplicates: BTreeMap<&'a str, Vec<&'a str>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = read_config(cli.config.as_deref())?;
    if let Some(dist_dir) = cli.dist_dir {
        config.dist_dir = dist_dir;
    }
    init_logging(&config.observability);

    tracing::info!(
        dist_dir = ?config.dist_dir,
        i18n = config.i18n.is_some(),
        "Configuration loaded"
    );

    let set = providers::from_config(&config);
    let manager = RouteMatcherManager::with_normalizer(set.normalizer);
    manager.push(set.providers);
    manager.load().await?;

    match cli.command {
        Commands::Match {
            pathname,
            all,
            output,
            locale,
        } => {
            let mut options = MatchOptions::default();
            if let Some(output) = output {
                options = options.with_output(output);
            }
            if let Some(locale) = locale {
                let context = match &config.i18n {
                    Some(i18n) => I18nProvider::new(i18n).context_for(&locale, &pathname),
                    None => LocaleContext {
                        locale,
                        inferred_from_default: false,
                        pathname: pathname.clone(),
                    },
                };
                options = options.with_locale(context);
            }

            if all {
                let matches = manager
                    .match_all(&pathname, &options)?
                    .collect::<Result<Vec<RouteMatch>, _>>()?;
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                let found = manager.match_route(&pathname, &options)?;
                println!("{}", serde_json::to_string_pretty(&found)?);
            }
        }
        Commands::Routes => {
            let snapshot = manager.snapshot();
            let report = RoutesReport {
                version: snapshot.version(),
                static_routes: snapshot
                    .static_matchers()
                    .iter()
                    .map(|m| m.identity())
                    .collect(),
                dynamic: snapshot
                    .dynamic_matchers()
                    .iter()
                    .map(|m| m.identity())
                    .collect(),
                duplicates: snapshot
                    .duplicates()
                    .iter()
                    .map(|(pathname, matchers)| {
                        let pages: Vec<&str> = matchers
                            .iter()
                            .map(|m| m.definition().page.as_str())
                            .collect();
                        (pathname.as_str(), pages)
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Watch => watch(&config, &manager).await?,
    }

    Ok(())
}

fn read_config(path: Option<&Path>) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(load_config(Path::new(DEFAULT_CONFIG))?),
        None => Ok(RouterConfig::default()),
    }
}

async fn watch(
    config: &RouterConfig,
    manager: &RouteMatcherManager,
) -> Result<(), Box<dyn std::error::Error>> {
    if !config.watch.enabled {
        return Err("watching is disabled by watch.enabled = false".into());
    }

    let debounce = Duration::from_millis(config.watch.debounce_ms);
    let (watcher, mut triggers) = ManifestWatcher::new(
        &server_dir(config),
        Duration::from_secs(config.watch.poll_interval_secs),
    );
    let _watcher = watcher.run()?;

    loop {
        tokio::select! {
            Some(()) = triggers.recv() => {
                tokio::time::sleep(debounce).await;
                while triggers.try_recv().is_ok() {}

                // Failures are logged by the manager; the previous routes stay live.
                if manager.force_reload().await.is_ok() {
                    let snapshot = manager.snapshot();
                    tracing::info!(
                        version = snapshot.version(),
                        matchers = snapshot.matchers().len(),
                        "Routes reloaded"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, stopping watcher");
                break;
            }
        }
    }

    Ok(())
}
