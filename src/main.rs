//! CLI entry point for themekeeper.

mod app;
mod cli;

use clap::Parser;
use themekeeper::ambient::PlatformAmbient;
use themekeeper::render::{RenderSink, Renderer};
use themekeeper::ThemeController;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `themekeeper=debug`).
const LOG_FILTER_ENV: &str = "THEMEKEEPER_LOG";

fn main() {
    let args = cli::Args::parse();
    init_tracing();

    let renderer = Renderer::new(!args.no_color);

    // One controller for the whole process, passed down explicitly.
    let mut controller = match ThemeController::open_default(args.settings.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            renderer.error(&e.to_string());
            std::process::exit(1);
        }
    };

    match args.command.unwrap_or(cli::Command::Show) {
        cli::Command::Show => {
            print!(
                "{}",
                app::theme::show_home(&controller, &PlatformAmbient, renderer.color())
            );
        }
        cli::Command::List => {
            print!("{}", app::theme::show_list(&controller, renderer.color()));
        }
        cli::Command::Set { theme } => {
            let location = controller.store().path().to_path_buf();
            if let Err(msg) =
                app::theme::handle_set(&renderer, &mut controller, Some(&location), &theme)
            {
                renderer.error(&msg);
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
