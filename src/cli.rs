//! Command-line interface for the `stix_req` binary.
//!
//! Positional arguments are interpreted by count:
//! - none: print usage and exit with status 1,
//! - exactly two: `METHOD URL`,
//! - anything else: the first one is the URL and the method is GET.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::client::{ClientConfig, HttpClient};
use crate::http::{FormArgs, Headers, HttpResponse, Method, get_headers};

/// Issue a single GET or POST request and print the response.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stix_req",
    version,
    about,
    override_usage = "stix_req [OPTIONS] [GET/POST] [URL]"
)]
pub struct Cli {
    /// Form argument sent with the request (repeatable, kept in order)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub data: Vec<(String, String)>,

    /// Print the response header lines before the body
    #[arg(short, long)]
    pub include: bool,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the User-Agent header
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// `URL`, or `METHOD URL`
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub method: Method,
    pub url: &'a str,
}

impl Cli {
    /// Resolves the positional arguments, or `None` when there are none.
    pub fn invocation(&self) -> Option<Invocation<'_>> {
        match self.args.as_slice() {
            [] => None,
            [command, url] => Some(Invocation {
                method: Method::from_command(command),
                url: url.as_str(),
            }),
            [url, ..] => Some(Invocation {
                method: Method::Get,
                url: url.as_str(),
            }),
        }
    }

    /// The argument set built from `--data`, or `None` if none was given.
    pub fn form_args(&self) -> Option<FormArgs> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().cloned().collect())
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::default();
        match &self.user_agent {
            Some(ua) => config.user_agent(ua.as_str()),
            None => config,
        }
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

/// Installs a stderr `tracing` subscriber. `RUST_LOG` overrides `-v`.
pub fn init_logging(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    response: &'a HttpResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Vec<HeaderField<'a>>>,
}

#[derive(Serialize)]
struct HeaderField<'a> {
    name: &'a str,
    value: &'a str,
}

/// Formats raw response text the way the CLI prints it.
pub fn render(cli: &Cli, raw: &str) -> Result<String> {
    let response = HttpResponse::parse(raw).context("failed to parse response")?;

    if cli.json {
        let headers = if cli.include {
            Some(Headers::parse_block(raw).context("failed to parse response headers")?)
        } else {
            None
        };
        let output = JsonOutput {
            response: &response,
            headers: headers.as_ref().map(|h| {
                h.iter()
                    .map(|(name, value)| HeaderField { name, value })
                    .collect()
            }),
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    if cli.include {
        let mut out = String::new();
        for line in get_headers(raw)? {
            out.push_str(&String::from_utf8_lossy(&line));
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&response.to_string());
        return Ok(out);
    }

    Ok(response.to_string())
}

/// Runs the request described by `cli` and returns the text to print.
pub fn run(cli: &Cli, invocation: &Invocation<'_>) -> Result<String> {
    let client = HttpClient::with_config(cli.client_config());
    let args = cli.form_args();
    let raw = client
        .exchange(invocation.method, invocation.url, args.as_ref())
        .with_context(|| format!("{} {} failed", invocation.method, invocation.url))?;
    render(cli, &raw)
}
