//! HomeVoice CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use home_voice::cli::{
    app::{
        load_merged_config, run_device_add, run_inputs, run_listen, run_say, run_sequence_add,
        run_service_word, run_settings, run_state, run_toggle, EXIT_ERROR,
    },
    args::{Cli, Commands, DeviceAction, SpecialAction},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use home_voice::domain::config::AppConfig;
use home_voice::infrastructure::XdgConfigStore;

/// Environment variable holding the log filter
const LOG_ENV: &str = "HOME_VOICE_LOG";

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = if verbose {
        match "home_voice=debug".parse::<Directive>() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    } else {
        filter
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    // Config commands work on the file alone
    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Commands::Inputs => return run_inputs(),
        other => other,
    };

    let cli_config = AppConfig {
        server_url: cli.server,
        ..Default::default()
    };
    let config = load_merged_config(cli_config).await;
    tracing::debug!(server = %config.server_url_or_default(), "configuration loaded");

    match command {
        Commands::Listen {
            input,
            save,
            device,
        } => run_listen(&config, input, save, device).await,
        Commands::Say { text } => run_say(&config, &text).await,
        Commands::State => run_state(&config).await,
        Commands::Toggle { id, state } => run_toggle(&config, &id, state.is_on()).await,
        Commands::Device {
            action:
                DeviceAction::Add {
                    device_type,
                    name,
                    on,
                },
        } => run_device_add(&config, device_type, name.as_deref(), on).await,
        Commands::Settings(args) => run_settings(&config, args.into()).await,
        Commands::Special { action } => match action {
            SpecialAction::Word { word } => run_service_word(&config, &word).await,
            SpecialAction::Sequence {
                name,
                steps,
                description,
            } => run_sequence_add(&config, &name, &steps, &description).await,
        },
        Commands::Config { .. } | Commands::Inputs => ExitCode::SUCCESS,
    }
}
