// src/config.rs
//! Command-line surface and environment-derived settings.
//!
//! Credentials only ever come from the environment (a `.env` file in the
//! working directory is loaded first). Each command resolves just the
//! settings it needs, so `extract` works without speech or storage keys.

use crate::chunking::WritePolicy;
use crate::constants::{DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE, OPENAI_SPEECH_URL};
use crate::error::AppError;
use crate::types::{ApiKey, Secret, ValidatedUrl};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a page's text, flat for speech or as markdown
    Extract(ExtractArgs),
    /// Turn to-do blocks into bulleted list items
    Checkboxes(MutationArgs),
    /// Turn quote blocks into paragraphs
    Quotes(MutationArgs),
    /// Find and replace text in blocks (case-sensitive, no word boundaries)
    Replace(ReplaceArgs),
    /// Preview a find and replace without changing anything
    #[command(name = "dry-run")]
    DryRun(ReplaceArgs),
    /// Report level-1 headings, optionally demoting them
    #[command(name = "audit-h1")]
    AuditH1(AuditArgs),
    /// Synthesize speech for pages and link the audio
    Narrate(NarrateArgs),
    /// Export a database to markdown, JSON, a manifest and a CSV sheet
    Pull(PullArgs),
    /// Push media links recorded in sidecar files back to pages
    Sync(SyncArgs),
    /// Check credentials and connectivity against one page
    Test(TestArgs),
}

/// Which pages to operate on. Neither flag means every shared page.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Page URL or ID
    #[arg(long)]
    pub page: Option<String>,

    /// Database URL or ID; every row is processed
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MutationArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Count matches without changing anything
    #[arg(short = 'd', long, default_value_t = false)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,

    /// Log per-block warnings at debug level only
    #[arg(long, default_value_t = false)]
    pub silent: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Page URL or ID
    pub page: String,

    /// Structured markdown instead of flat speech text
    #[arg(long, default_value_t = false)]
    pub markdown: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReplaceArgs {
    /// Text to search for
    #[arg(short = 's', long)]
    pub search: String,

    /// Replacement text
    #[arg(short = 'r', long)]
    pub replace: String,

    #[command(flatten)]
    pub mutation: MutationArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Convert every level-1 heading to level 2
    #[arg(long, default_value_t = false)]
    pub demote: bool,

    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NarrateArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Stop after this many pages have been narrated
    #[arg(long)]
    pub batch: Option<usize>,

    /// Also store the MP3 as base64 in Content64 fields
    #[arg(long, default_value_t = false)]
    pub store_base64: bool,

    /// Write <slug>.media.json sidecars into this directory
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Content64 field position written at reduced size (repeatable)
    #[arg(long = "fragile-field")]
    pub fragile_fields: Vec<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct PullArgs {
    /// Database URL or ID
    #[arg(long)]
    pub database: String,

    /// Export directory
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Directory holding manifest.json and *.media.json sidecars
    #[arg(long)]
    pub dir: PathBuf,

    /// Show what would be written without changing pages
    #[arg(short = 'd', long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TestArgs {
    /// Page URL or ID
    pub page: String,
}

/// Loads `.env` from the working directory if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
    }
}

/// Reads a process environment variable, treating empty as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key).ok_or_else(|| {
        AppError::MissingConfiguration(format!("{} environment variable not set", key))
    })
}

/// Notion credentials.
#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub api_key: ApiKey,
}

impl NotionSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = ApiKey::new(required(&lookup, "NOTION_API_KEY")?)?;
        Ok(Self { api_key })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(process_env)
    }
}

/// OpenAI speech endpoint settings.
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub api_key: Secret,
    pub model: String,
    pub voice: String,
    pub endpoint: String,
}

impl SpeechSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = Secret::new(required(&lookup, "OPENAI_API_KEY")?, "OPENAI_API_KEY")?;
        Ok(Self {
            api_key,
            model: lookup("OPENAI_TTS_MODEL").unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            voice: lookup("OPENAI_TTS_VOICE").unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
            endpoint: OPENAI_SPEECH_URL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(process_env)
    }
}

/// R2 bucket credentials and public URL.
#[derive(Debug, Clone)]
pub struct ObjectStoreSettings {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: Secret,
    pub bucket: String,
    /// Base URL objects are served from; the S3 endpoint when unset.
    pub public_base_url: Option<ValidatedUrl>,
}

impl ObjectStoreSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let public_base_url = lookup("R2_PUBLIC_URL")
            .map(|url| ValidatedUrl::parse(&url))
            .transpose()?;
        Ok(Self {
            account_id: required(&lookup, "R2_ACCOUNT_ID")?,
            access_key_id: required(&lookup, "R2_ACCESS_KEY_ID")?,
            secret_access_key: Secret::new(
                required(&lookup, "R2_SECRET_ACCESS_KEY")?,
                "R2_SECRET_ACCESS_KEY",
            )?,
            bucket: required(&lookup, "R2_BUCKET_NAME")?,
            public_base_url,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(process_env)
    }
}

impl NarrateArgs {
    pub fn write_policy(&self) -> WritePolicy {
        WritePolicy::default().with_fragile_fields(self.fragile_fields.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn notion_key_is_required_and_validated() {
        assert!(matches!(
            NotionSettings::from_lookup(lookup(&[])),
            Err(AppError::MissingConfiguration(_))
        ));
        assert!(NotionSettings::from_lookup(lookup(&[("NOTION_API_KEY", "bogus")])).is_err());
        assert!(NotionSettings::from_lookup(lookup(&[(
            "NOTION_API_KEY",
            "ntn_1234567890abcdefghij"
        )]))
        .is_ok());
    }

    #[test]
    fn speech_defaults() {
        let settings = SpeechSettings::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(settings.model, "tts-1");
        assert_eq!(settings.voice, "alloy");

        let settings = SpeechSettings::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_TTS_VOICE", "nova"),
        ]))
        .unwrap();
        assert_eq!(settings.voice, "nova");
    }

    #[test]
    fn object_store_settings() {
        let full = [
            ("R2_ACCOUNT_ID", "acct"),
            ("R2_ACCESS_KEY_ID", "key"),
            ("R2_SECRET_ACCESS_KEY", "secret"),
            ("R2_BUCKET_NAME", "media"),
        ];
        let settings = ObjectStoreSettings::from_lookup(lookup(&full)).unwrap();
        assert!(settings.public_base_url.is_none());

        assert!(ObjectStoreSettings::from_lookup(lookup(&full[..3])).is_err());

        let mut with_bad_url = full.to_vec();
        with_bad_url.push(("R2_PUBLIC_URL", "ftp://nope"));
        assert!(ObjectStoreSettings::from_lookup(lookup(&with_bad_url)).is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = CommandLineInput::parse_from([
            "notion-ops",
            "replace",
            "-s",
            "foo",
            "-r",
            "bar",
            "--page",
            "1234567890abcdef1234567890abcdef",
            "-d",
        ]);
        match cli.command {
            Command::Replace(args) => {
                assert_eq!(args.search, "foo");
                assert!(args.mutation.dry_run);
                assert!(args.mutation.scope.page.is_some());
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = CommandLineInput::parse_from([
            "notion-ops",
            "narrate",
            "--fragile-field",
            "3",
            "--fragile-field",
            "5",
            "--batch",
            "2",
        ]);
        match cli.command {
            Command::Narrate(args) => {
                assert_eq!(args.fragile_fields, vec![3, 5]);
                assert_eq!(args.batch, Some(2));
                assert!(args.write_policy().is_fragile(5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
