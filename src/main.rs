mod cli;
mod utils;

use std::io::stdout;
use std::process::exit;
use std::str::FromStr;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::CliCommand::RENDER;
use crate::cli::{build_cli, CliCommand, RenderCmd, StoreCmd};
use crate::utils::rewrite_message;
use gallery_loader::{render_gallery, GalleryLoader, HttpStore, LoadState, RenderOptions};

type GenError = Box<dyn std::error::Error>;
static PAGE_TITLE: &str = "Gallery";
static LIST_LIMIT: usize = 100;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli();
    let store = StoreCmd::build(&matches)
        .map_err(GenError::from)
        .and_then(|c| HttpStore::new(&c.server, c.timeout).map_err(GenError::from))
        .unwrap_or_else(|err| {
            eprintln!("Failed to create store client due to error = {}", err);
            exit(1);
        });

    let cmd = CliCommand::from_str(matches.subcommand_name().unwrap_or_else(|| {
        eprintln!("No command was provided, run `gallery help` to learn more");
        exit(1);
    }));

    let result = match cmd {
        Ok(CliCommand::RENDER) => {
            match matches.subcommand_matches(RENDER.to_str()).map(RenderCmd::build) {
                Some(Ok(c)) => render(store, c).await,
                Some(Err(err)) => Err(GenError::from(err)),
                None => Err(GenError::from("missing render arguments")),
            }
        }
        Ok(CliCommand::LIST) => list(store).await,
        Err(invalid_cmd) => Err(GenError::from(invalid_cmd)),
    };

    match result {
        Ok(true) => exit(0),
        Ok(false) => exit(1),
        Err(err) => {
            eprintln!("❌  Failed due to error='{}'", err);
            exit(1);
        }
    }
}

/// Runs one load cycle and writes the page. `Ok(false)` when the gallery
/// rendered its error message.
async fn render(store: HttpStore, cmd: RenderCmd) -> Result<bool, GenError> {
    debug!(?cmd, server = %store.base(), "rendering gallery");
    let options = RenderOptions {
        output: cmd.output,
        container_id: cmd.container_id,
        title: PAGE_TITLE.to_owned(),
        probe: cmd.probe,
        concurrency: cmd.concurrency,
    };

    let mut out = stdout();
    let outcome = render_gallery(&store, &options, |done, total| {
        if let Err(err) = rewrite_message(&mut out, &format!("Probed {} / {} images", done, total)) {
            debug!(error = %err, "failed to draw progress");
        }
    })
    .await?;
    if outcome.probe.is_some() {
        println!();
    }

    match &outcome.state {
        LoadState::Rendered(items) => println!("🖼  rendered {} images", items.len()),
        LoadState::Empty => println!("No images uploaded yet"),
        LoadState::Failed { message } => eprintln!("{}", message),
        LoadState::Loading => {}
    }
    if let Some(report) = outcome.probe {
        println!("{} loaded, {} failed to load", report.loaded, report.failed);
    }
    println!("wrote {}", outcome.output.display());

    Ok(outcome.succeeded())
}

async fn list(store: HttpStore) -> Result<bool, GenError> {
    let paths = GalleryLoader::new(store).fetch().await?;
    println!("📚 found {} files:", paths.len());

    let to_print = if paths.len() > LIST_LIMIT {
        println!("Too many files to print, first {} will be printed", LIST_LIMIT);
        &paths[0..LIST_LIMIT]
    } else {
        &paths[..]
    };
    to_print.iter().for_each(|p| println!("\t{}", p));

    Ok(true)
}
