mod commands;
mod terminal;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::{error, warn};

use commands::CommandLine;
use mtune_common::cancel::CancelToken;
use terminal::{logging, print};

#[tokio::main]
async fn main() {
    let cli = match CommandLine::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            std::process::exit(0);
        }
        Err(err) => {
            // Usage errors exit 1, not clap's default 2.
            let _ = err.print();
            std::process::exit(1);
        }
    };

    logging::init();
    print::banner(cli.no_banner);

    if !is_root::is_root() {
        warn!("not running as root; applying an MTU will likely fail");
    }

    let cancel = CancelToken::new();
    spawn_signal_listener(cancel.clone());

    if let Err(err) = commands::optimize::run(cli, cancel).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn spawn_signal_listener(cancel: CancelToken) {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        warn!("interrupt received, finishing the current step");
        cancel.cancel();
    });
}

async fn wait_for_shutdown() {
    use tokio::signal::unix::{SignalKind, signal};

    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        Err(_) => {
            let _ = ctrl_c.await;
        }
    }
}
