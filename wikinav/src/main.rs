use commands::command_argument_builder;
use wikinav::handlers::{
    handle_index, handle_lightbox, handle_resolve, handle_search, handle_ui,
};
use tracing::debug;
use wikinav::init_logging;
use wikinav_core::config;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // The terminal UI owns the screen, so it gets no stderr subscriber.
    if !matches!(chosen_command.subcommand(), Some(("ui", _))) {
        init_logging(verbose);
    }

    let config_path =
        config::config_path(chosen_command.get_one::<String>("config").map(String::as_str));
    let cfg = match config::load(&config_path) {
        Ok(cfg) => {
            debug!("Using config {}", config_path.display());
            cfg
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let result = match chosen_command.subcommand() {
        Some(("search", primary_command)) => handle_search(primary_command, &cfg, quiet).await,
        Some(("resolve", primary_command)) => handle_resolve(primary_command, &cfg, quiet).await,
        Some(("ui", primary_command)) => handle_ui(primary_command, &cfg).await,
        Some(("lightbox", primary_command)) => handle_lightbox(primary_command, &cfg),
        Some(("index", primary_command)) => handle_index(primary_command, &cfg, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
