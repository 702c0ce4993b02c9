use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{value_t, App, AppSettings, Arg, ArgMatches, SubCommand};

use gallery_loader::loader::DEFAULT_CONTAINER_ID;

static VERSION: &str = "0.1.0";
static AUTHOR: &str = "apmaros";
static DESCRIPTION: &str = "Renders the image gallery of a file server";
const RENDER: &str = "render";
const LIST: &str = "list";
pub(crate) const SERVER: &str = "server";
const SERVER_SHORT: &str = "s";
pub(crate) const TIMEOUT: &str = "timeout";
const TIMEOUT_SHORT: &str = "t";
pub(crate) const OUTPUT: &str = "output";
const OUTPUT_SHORT: &str = "o";
pub(crate) const CONTAINER: &str = "container";
const CONTAINER_SHORT: &str = "c";
pub(crate) const PROBE: &str = "probe";
const PROBE_SHORT: &str = "p";
pub(crate) const CONCURRENCY: &str = "concurrency";

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("gallery")
        .version(VERSION)
        .author(AUTHOR)
        .about(DESCRIPTION)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name(SERVER)
            .short(SERVER_SHORT)
            .long(SERVER)
            .takes_value(true)
            .default_value("http://127.0.0.1:8080")
            .help("Base url of the server exposing /list"))
        .arg(Arg::with_name(TIMEOUT)
            .short(TIMEOUT_SHORT)
            .long(TIMEOUT)
            .takes_value(true)
            .default_value("10")
            .help("Request timeout in seconds"))
        .subcommand(SubCommand::with_name(RENDER)
            .about("Loads the gallery and writes it as an html page")
            .arg(Arg::with_name(OUTPUT)
                .short(OUTPUT_SHORT)
                .long(OUTPUT)
                .takes_value(true)
                .default_value("gallery.html")
                .help("File the rendered page is written to"))
            .arg(Arg::with_name(CONTAINER)
                .short(CONTAINER_SHORT)
                .long(CONTAINER)
                .takes_value(true)
                .default_value(DEFAULT_CONTAINER_ID)
                .help("Id of the gallery container element"))
            .arg(Arg::with_name(PROBE)
                .short(PROBE_SHORT)
                .long(PROBE)
                .takes_value(false)
                .help("Requests every image and marks the ones that fail to load"))
            .arg(Arg::with_name(CONCURRENCY)
                .long(CONCURRENCY)
                .takes_value(true)
                .default_value("8")
                .help("Images probed at the same time")))
        .subcommand(SubCommand::with_name(LIST)
            .about("Prints the file paths returned by /list"))
}

pub(crate) fn build_cli<'a>() -> ArgMatches<'a> {
    app().get_matches()
}

#[derive(Debug, PartialEq)]
pub(crate) enum CliCommand {
    RENDER,
    LIST,
}

impl FromStr for CliCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            RENDER => Ok(Self::RENDER),
            LIST => Ok(Self::LIST),
            other => Err(format!("Command {} was not recognised", other)),
        }
    }
}

impl CliCommand {
    pub(crate) fn to_str(&self) -> &str {
        match self {
            CliCommand::RENDER => RENDER,
            CliCommand::LIST => LIST,
        }
    }
}

/// Settings shared by every command.
#[derive(Debug)]
pub(crate) struct StoreCmd {
    pub(crate) server: String,
    pub(crate) timeout: Duration,
}

impl StoreCmd {
    pub(crate) fn build(matches: &ArgMatches) -> Result<Self, clap::Error> {
        // has a default, safe to read
        let server = matches.value_of(SERVER).unwrap_or_default().to_owned();
        let timeout = Duration::from_secs(value_t!(matches, TIMEOUT, u64)?);

        Ok(StoreCmd { server, timeout })
    }
}

#[derive(Debug)]
pub(crate) struct RenderCmd {
    pub(crate) output: PathBuf,
    pub(crate) container_id: String,
    pub(crate) probe: bool,
    pub(crate) concurrency: usize,
}

impl RenderCmd {
    pub(crate) fn build(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let output = PathBuf::from(matches.value_of(OUTPUT).unwrap_or_default());
        let container_id = matches.value_of(CONTAINER).unwrap_or_default().to_owned();
        let probe = matches.is_present(PROBE);
        let concurrency = value_t!(matches, CONCURRENCY, usize)?;

        Ok(RenderCmd { output, container_id, probe, concurrency })
    }
}
