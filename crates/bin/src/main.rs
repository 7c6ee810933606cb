//! `shr`, the sherry command-line client.

mod cli;
mod commands;
mod output;
mod prompt;

use clap::Parser;
use sherry::api::HttpApi;
use sherry::registry::{self, RegistryStore};
use tracing_subscriber::EnvFilter;

use cli::{AuthCommands, Cli, Commands, FolderCommands, ServiceCommands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sherry=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> sherry::Result<()> {
    let dir = registry::resolve_config_dir(cli.config.as_deref())?;
    let mut registry = RegistryStore::load(&dir)?;
    tracing::debug!(dir = %dir.display(), "registry loaded");

    // Commands that never talk to the service must not require a usable API
    // URL, so the client is only constructed in the arms that need it.
    match &cli.command {
        Commands::Auth(command) => match command {
            AuthCommands::Register(args) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::auth::register(&mut registry, &api, args).await
            }
            AuthCommands::Login(args) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::auth::login(&mut registry, &api, args).await
            }
            AuthCommands::List => {
                commands::auth::list(&registry);
                Ok(())
            }
            AuthCommands::Default(args) => commands::auth::default(&mut registry, args).await,
        },
        Commands::Folder(command) => match command {
            FolderCommands::Create(args) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::folder::create(&mut registry, &api, args).await
            }
            FolderCommands::Get(args) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::folder::get(&mut registry, &api, args).await
            }
            FolderCommands::Show(args) => commands::folder::show(&registry, args),
            FolderCommands::List(args) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::folder::list(&registry, &api, args).await
            }
            FolderCommands::Update(args) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::folder::update(&mut registry, &api, args).await
            }
            FolderCommands::Unwatch(args) => commands::folder::unwatch(&mut registry, args).await,
            FolderCommands::Permission(command) => {
                let api = HttpApi::new(registry.api_url())?;
                commands::folder::permission(&mut registry, &api, command).await
            }
        },
        Commands::Service(command) => match command {
            ServiceCommands::Start(args) => commands::service::start(&mut registry, args.yes).await,
            ServiceCommands::Stop => commands::service::stop(&mut registry).await,
        },
    }
}
