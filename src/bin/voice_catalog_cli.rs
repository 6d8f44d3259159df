//! voice-catalog-cli — 音色列表刷新与预览音频下载的命令行工具
//!
//! Usage:
//!   voice-catalog-cli refresh [--api-key <key>] [--filter <scope>]   Refresh and print the voice list
//!   voice-catalog-cli preview <voice> [--out <path>]                 Download a voice's preview sample
//!
//! Both commands accept `--base-url <url>` and `--config <path>`.

use anyhow::{anyhow, bail, Context};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use voice_catalog::events::TracingEventSink;
use voice_catalog::{CatalogConfig, Credential, VoiceCatalogClient, VoiceFilter};

/// Keyring user / env prefix used when `--api-key` is absent.
const PROVIDER_ID: &str = "minimax";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "refresh" => cmd_refresh(&args[2..]).await,
        "preview" => cmd_preview(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"voice-catalog-cli — 音色目录命令行工具

USAGE:
    voice-catalog-cli <COMMAND> [OPTIONS]

COMMANDS:
    refresh [--api-key <key>] [--filter <scope>]   Refresh and print the voice list
    preview <voice> [--out <path>]                 Download a preview sample
    version                                        Show version information
    help                                           Show this help message

OPTIONS:
    --base-url <url>      Backend base URL (default http://127.0.0.1:8188)
    --config <path>       YAML configuration file
    --filter <scope>      all | system | voice_cloning | voice_generation

ENVIRONMENT:
    MINIMAX_API_KEY       API key used when --api-key is absent
    VOICE_CATALOG_*       Configuration overrides (see the config module)
    RUST_LOG              Log filter (default info)"#
    );
}

fn cmd_version() {
    println!("voice-catalog-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

fn build_client(args: &[String]) -> anyhow::Result<VoiceCatalogClient> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => CatalogConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => CatalogConfig::default(),
    };
    config.apply_env()?;
    if let Some(url) = flag_value(args, "--base-url") {
        config.base_url = url.to_string();
    }

    let client = VoiceCatalogClient::builder()
        .config(config)
        .event_sink(Arc::new(TracingEventSink::new("cli")))
        .build()?;
    Ok(client)
}

async fn cmd_refresh(args: &[String]) -> anyhow::Result<()> {
    let credential = match flag_value(args, "--api-key") {
        Some(key) => Credential::new(key),
        None => Credential::from_keyring_or_env(PROVIDER_ID).ok_or_else(|| {
            anyhow!("no API key: pass --api-key or set {}_API_KEY", PROVIDER_ID.to_uppercase())
        })?,
    };
    let filter = flag_value(args, "--filter")
        .map(str::parse::<VoiceFilter>)
        .transpose()?;

    let client = build_client(args)?;
    let voices = client.refresh_voices(&credential, filter).await?;

    for voice in voices.iter() {
        println!("{voice}");
    }
    eprintln!(
        "{} voices; selected: {}",
        voices.len(),
        client.selected_voice().as_deref().unwrap_or("<none>")
    );
    client.dispose().await;
    Ok(())
}

async fn cmd_preview(args: &[String]) -> anyhow::Result<()> {
    let Some(voice) = positional(args) else {
        bail!("usage: voice-catalog-cli preview <voice> [--out <path>]");
    };

    let client = build_client(args)?;
    let Some(audio) = client.load_preview(voice).await? else {
        bail!("voice name must not be empty");
    };

    let out = flag_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("preview.{}", audio.format.extension())));
    tokio::fs::write(&out, &audio.data)
        .await
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "wrote {} ({} bytes, {})",
        out.display(),
        audio.len(),
        audio.mime_type()
    );
    client.dispose().await;
    Ok(())
}
