use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use datadog_provider::{
    Provider, ProviderConfig, ResourceState, RetryPolicy, StateFile, TrackedResource, checks,
    naming, resources,
};

#[derive(Parser, Debug)]
#[command(name = "datadog-provider")]
#[command(about = "Manage Datadog resources from Terraform-style state and verify convergence")]
struct Args {
    /// API URL, e.g. https://api.datadoghq.eu/ (defaults to DD_HOST or US1)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Skip credential validation on startup
    #[arg(long, global = true)]
    no_validate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the configured API and APP keys
    Validate,

    /// List supported resource types
    Types,

    /// Read one resource and print its state
    Read { resource_type: String, id: String },

    /// Create a resource from a JSON attributes file ("-" for stdin)
    Create {
        resource_type: String,
        #[arg(short, long)]
        attributes: PathBuf,
    },

    /// Update a resource from a JSON state file carrying its id
    Update {
        resource_type: String,
        #[arg(short, long)]
        attributes: PathBuf,
    },

    /// Delete a resource
    Delete { resource_type: String, id: String },

    /// Verify every managed resource in a state file exists
    CheckExists {
        #[arg(short, long, default_value = "terraform.tfstate")]
        state: PathBuf,

        /// Only check resources of this type
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
    },

    /// Verify every managed resource in a state file has been destroyed
    CheckDestroyed {
        #[arg(short, long, default_value = "terraform.tfstate")]
        state: PathBuf,

        /// Only check resources of this type
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,

        /// Polls per resource before giving up
        #[arg(long, default_value_t = 10)]
        attempts: u32,

        /// Seconds between polls
        #[arg(long, default_value_t = 2)]
        delay: u64,
    },

    /// Print a unique entity name for an acceptance run
    UniqueName { test_name: String },
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn load_resources(path: &Path, resource_type: Option<&str>) -> Result<Vec<TrackedResource>> {
    let state = StateFile::load(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(match resource_type {
        Some(t) => state.resources_of_type(t),
        None => state.root_module_resources(),
    })
}

fn print_state(state: &ResourceState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&state.to_flat_value())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging with LOG_LEVEL environment variable
    // Default to "warn" if not set (only warnings and errors)
    if env::var("RUST_LOG").is_err() {
        // SAFETY: runs before the runtime spawns any other task
        unsafe {
            env::set_var(
                "RUST_LOG",
                env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            )
        };
    }
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Types => {
            for name in resources::supported_types() {
                println!("{}", name);
            }
        }
        Command::UniqueName { test_name } => {
            println!("{}", naming::unique_entity_name(&test_name));
        }
        command => run(command, args.api_url, args.no_validate).await?,
    }

    Ok(())
}

async fn run(command: Command, api_url: Option<String>, no_validate: bool) -> Result<()> {
    let mut config = ProviderConfig::from_env()?;
    if api_url.is_some() {
        config.api_url = api_url;
    }
    if no_validate {
        config.validate = false;
    }

    let provider = Provider::configure(&config).await?;

    match command {
        Command::Validate => {
            if !provider.client().validate().await? {
                bail!("credentials are not valid");
            }
            println!("valid");
        }
        Command::Read { resource_type, id } => match provider.read(&resource_type, &id).await? {
            Some(state) => print_state(&state)?,
            None => bail!("{} {} does not exist", resource_type, id),
        },
        Command::Create {
            resource_type,
            attributes,
        } => {
            let state = ResourceState::from_value(read_json(&attributes)?)?;
            print_state(&provider.create(&resource_type, &state).await?)?;
        }
        Command::Update {
            resource_type,
            attributes,
        } => {
            let state = ResourceState::from_value(read_json(&attributes)?)?;
            print_state(&provider.update(&resource_type, &state).await?)?;
        }
        Command::Delete { resource_type, id } => {
            provider.delete(&resource_type, &id).await?;
        }
        Command::CheckExists {
            state,
            resource_type,
        } => {
            let tracked = load_resources(&state, resource_type.as_deref())?;
            checks::check_exists(&provider, &tracked).await?;
            println!("{} resource(s) exist", tracked.len());
        }
        Command::CheckDestroyed {
            state,
            resource_type,
            attempts,
            delay,
        } => {
            let tracked = load_resources(&state, resource_type.as_deref())?;
            let policy = RetryPolicy::new(attempts, Duration::from_secs(delay));
            checks::check_destroyed(&provider, &tracked, policy).await?;
            println!("{} resource(s) destroyed", tracked.len());
        }
        Command::Types | Command::UniqueName { .. } => {}
    }

    Ok(())
}
