//! `cachectl` - a small demo binary exercising a single named
//! [`ttl_cache_core::Table`] end to end: admission, lookup, deletion, and
//! introspection, all against a table handed out by a process-wide
//! [`ttl_cache_core::TableRegistry`].

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use ttl_cache_core::cli::{Cli, Command};
use ttl_cache_core::config::CacheConfig;
use ttl_cache_core::{CacheError, TableRegistry, setup_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("failed to set up tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match CacheConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let table_config = config.tables.get(&cli.table).cloned().unwrap_or_default();
    info!(table = %cli.table, cleanup_interval = ?table_config.cleanup_interval, "starting cachectl");

    let registry: Arc<TableRegistry<String, String>> = Arc::new(TableRegistry::new());
    let table = registry.lookup_or_create_with_cleanup(&cli.table, table_config.cleanup_interval);

    match cli.command {
        Command::Set {
            key,
            value,
            life_span,
        } => {
            table.set(key, life_span, value);
            ExitCode::SUCCESS
        }
        Command::Add {
            key,
            value,
            life_span,
        } => {
            if table.add(key, life_span, value) {
                println!("admitted");
                ExitCode::SUCCESS
            } else {
                println!("already present");
                ExitCode::FAILURE
            }
        }
        Command::Get { key } => match table.get(&key) {
            Ok(entry) => {
                println!("{}", entry.value().map_or("<null>", String::as_str));
                ExitCode::SUCCESS
            }
            Err(CacheError::KeyNotFound) => {
                println!("not found");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("get failed: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Exists { key } => {
            let exists = table.exists(&key);
            println!("{exists}");
            if exists { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Command::Delete { key } => match table.delete(&key) {
            Ok(()) => ExitCode::SUCCESS,
            Err(CacheError::KeyNotFound) => {
                println!("not found");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("delete failed: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Count => {
            println!("{}", table.count());
            ExitCode::SUCCESS
        }
        Command::MostAccessed { n } => {
            let report: Vec<_> = table
                .most_accessed(n)
                .into_iter()
                .map(|e| (e.key().clone(), e.access_count()))
                .collect();
            match serde_yaml::to_string(&report) {
                Ok(rendered) => {
                    print!("{rendered}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("failed to render report: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
