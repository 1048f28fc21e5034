use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::Input;
use serde_json::Value;

use crate::config::{self, AppleMusicConfig, TOKEN_ENV};
use crate::models::{LoadResult, LoadType};
use crate::sources::applemusic::client::HttpTransport;
use crate::sources::applemusic::{resource, AppleMusic, SOURCE_NAME};
use crate::sources::{NoMatches, ResolveRequest, ResolverChain};

#[derive(Parser)]
#[command(name = "amresolve", about = "Resolve Apple Music searches and URLs into playable tracks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a search term or catalog URL
    Resolve {
        /// Search term or https://music.apple.com/... URL
        query: String,
        /// Source the query is addressed to
        #[arg(long, default_value = SOURCE_NAME)]
        source: String,
        /// Requester context copied into every track (JSON or plain text)
        #[arg(long)]
        requester: Option<String>,
        /// Print the raw result envelope as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a URL is classified
    Check {
        url: String,
    },
    /// Configure storefront, token and artwork size
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve {
            query,
            source,
            requester,
            json,
        } => cmd_resolve(&query, &source, requester.as_deref(), json),
        Commands::Check { url } => cmd_check(&url),
        Commands::Config => cmd_config(),
    }
}

fn parse_requester(raw: Option<&str>) -> Value {
    match raw {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
        None => Value::Null,
    }
}

fn cmd_resolve(query: &str, source: &str, requester: Option<&str>, json: bool) -> Result<()> {
    let cfg = config::load_config();
    let token = cfg.applemusic.token().with_context(|| {
        format!("Apple Music token is not set. Run 'amresolve config' or set {TOKEN_ENV}.")
    })?;

    let transport = HttpTransport::new()?;
    let apple = AppleMusic::new(&cfg.applemusic.options(), &token, Box::new(transport))
        .context("Run 'amresolve config' to set a storefront")?;

    let mut chain = ResolverChain::new(Box::new(NoMatches));
    chain.register(Box::new(apple));
    log::debug!("Resolver chain: {:?}", chain.names());

    let request = ResolveRequest::new(query, source, parse_requester(requester));
    let result = chain.resolve(&request);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &LoadResult) {
    match result.load_type {
        LoadType::LoadFailed => {
            let message = result
                .exception
                .as_ref()
                .map(|e| e.message.as_str())
                .unwrap_or_default();
            println!("Load failed: {message}");
            return;
        }
        LoadType::NoMatches => {
            println!("No matches.");
            return;
        }
        _ => {}
    }

    if let Some(name) = &result.playlist_info.name {
        println!("{name}");
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Title", "Author", "Length", "URI"]);
    for (i, track) in result.tracks.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&track.info.title),
            Cell::new(&track.info.author),
            Cell::new(track.display_length()),
            Cell::new(&track.info.uri),
        ]);
    }

    println!("{table}");
    println!("\n{} tracks", result.tracks.len());
}

fn cmd_check(url: &str) -> Result<()> {
    match resource::parse(url) {
        Some(reference) => println!("{} {}", reference.kind, reference.id),
        None if resource::check(url) => println!("Apple Music URL without a resource id"),
        None => println!("Not an Apple Music URL, it would be treated as a search term"),
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();
    let current = cfg.applemusic.clone();

    println!("Apple Music settings\n");

    let storefront_code: String = Input::new()
        .with_prompt("Storefront code")
        .with_initial_text(current.storefront_code.clone().unwrap_or_else(|| "us".to_string()))
        .interact_text()?;

    let token: String = Input::new()
        .with_prompt("Developer token")
        .with_initial_text(current.token.clone().unwrap_or_default())
        .interact_text()?;

    let image_width: u32 = Input::new()
        .with_prompt("Artwork width")
        .default(current.image_width.unwrap_or(900))
        .interact_text()?;

    let image_height: u32 = Input::new()
        .with_prompt("Artwork height")
        .default(current.image_height.unwrap_or(500))
        .interact_text()?;

    cfg.applemusic = AppleMusicConfig {
        storefront_code: Some(storefront_code.trim().to_string()),
        token: Some(token.trim().to_string()),
        image_width: Some(image_width),
        image_height: Some(image_height),
        default_source: current.default_source,
    };

    config::save_config(&cfg)?;
    println!("\nSettings saved.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requester_json_or_text() {
        assert_eq!(parse_requester(Some(r#"{"id":"42"}"#)), json!({ "id": "42" }));
        assert_eq!(parse_requester(Some("alice")), json!("alice"));
        assert_eq!(parse_requester(None), Value::Null);
    }

    #[test]
    fn test_resolve_defaults_to_applemusic_source() {
        let cli = Cli::parse_from(["amresolve", "resolve", "never gonna give you up"]);
        match cli.command {
            Commands::Resolve { query, source, json, .. } => {
                assert_eq!(query, "never gonna give you up");
                assert_eq!(source, "applemusic");
                assert!(!json);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_verbose_is_counted() {
        let cli = Cli::parse_from(["amresolve", "-vv", "check", "x"]);
        assert_eq!(cli.verbose, 2);
    }
}
