// apps/secretsctl/src/main.rs

use std::collections::HashMap;
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::ExposeSecret;
use secrets::{providers, KeyPath, Operation, SecretsConfig, SecretsError, SecretsProvider};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit code for wiring mistakes: unknown provider, bad credentials, unsupported operation
const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let provider_name = matches
        .get_one::<String>("provider")
        .map(String::as_str)
        .unwrap_or(providers::CLOUDFLARE_WORKERS_SECRET);

    let config = SecretsConfig::from_env();
    let provider = match providers::from_name(provider_name, &config) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Failed to initialize provider {provider_name}: {e}");
            process::exit(EXIT_CONFIG);
        }
    };
    info!(provider = provider.name(), "Provider ready");

    if let Err(e) = run(provider.as_ref(), &matches).await {
        error!(error = %e, "Operation failed");
        eprintln!("{e}");
        process::exit(if e.is_capability_error() { EXIT_CONFIG } else { 1 });
    }
}

fn key_path_args() -> [Arg; 4] {
    [
        Arg::new("source")
            .long("source")
            .help("Backend resource the secret belongs to (e.g. the Worker script name)"),
        Arg::new("path")
            .long("path")
            .help("Logical path of the secret"),
        Arg::new("env")
            .long("env")
            .help("Secret name"),
        Arg::new("field")
            .long("field")
            .help("Backend specific field name, overrides --env"),
    ]
}

fn cli() -> Command {
    Command::new("secretsctl")
        .about("Write, read and delete secrets through a named provider")
        .subcommand_required(true)
        .arg(
            Arg::new("provider")
                .long("provider")
                .global(true)
                .help("Provider name"),
        )
        .subcommand(
            Command::new("put")
                .about("Create or overwrite one secret")
                .args(key_path_args())
                .arg(Arg::new("value").required(true)),
        )
        .subcommand(
            Command::new("put-mapping")
                .about("Create or overwrite KEY=VALUE pairs under --path")
                .args(key_path_args())
                .arg(
                    Arg::new("pairs")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(parse_pair),
                ),
        )
        .subcommand(Command::new("get").about("Read one secret").args(key_path_args()))
        .subcommand(
            Command::new("get-mapping")
                .about("Read every secret under --path")
                .args(key_path_args()),
        )
        .subcommand(Command::new("delete").about("Remove one secret").args(key_path_args()))
        .subcommand(
            Command::new("delete-mapping")
                .about("Remove every secret under --path")
                .args(key_path_args()),
        )
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

fn key_path(matches: &ArgMatches) -> KeyPath {
    let arg = |name: &str| matches.get_one::<String>(name).cloned().unwrap_or_default();
    KeyPath {
        path: arg("path"),
        env: arg("env"),
        field: arg("field"),
        source: arg("source"),
    }
}

fn operation_for(command: &str) -> Option<Operation> {
    match command {
        "put" => Some(Operation::Put),
        "put-mapping" => Some(Operation::PutMapping),
        "get" => Some(Operation::Get),
        "get-mapping" => Some(Operation::GetMapping),
        "delete" => Some(Operation::Delete),
        "delete-mapping" => Some(Operation::DeleteMapping),
        _ => None,
    }
}

async fn run(provider: &dyn SecretsProvider, matches: &ArgMatches) -> Result<(), SecretsError> {
    let Some((command, sub)) = matches.subcommand() else {
        return Ok(());
    };
    let path = key_path(sub);

    let operation = operation_for(command)
        .ok_or_else(|| SecretsError::InvalidConfig(format!("Unknown command: {command}")))?;
    provider
        .capability(operation)
        .ensure(provider.name(), operation)?;

    match operation {
        Operation::Put => {
            let value = sub.get_one::<String>("value").cloned().unwrap_or_default();
            provider.put(&path, &value).await?;
            println!("Secret written.");
        }
        Operation::PutMapping => {
            let mapping: HashMap<String, String> = sub
                .get_many::<(String, String)>("pairs")
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            provider.put_mapping(&path, &mapping).await?;
            println!("{} secrets written.", mapping.len());
        }
        Operation::Get => {
            let entry = provider.get(&path).await?;
            println!("{}={}", entry.key, entry.value.expose_secret());
        }
        Operation::GetMapping => {
            for entry in provider.get_mapping(&path).await? {
                println!("{}={}", entry.key, entry.value.expose_secret());
            }
        }
        Operation::Delete => {
            provider.delete(&path).await?;
            println!("Secret deleted.");
        }
        Operation::DeleteMapping => {
            provider.delete_mapping(&path).await?;
            println!("Secrets deleted.");
        }
    }
    Ok(())
}
