// src/commands/mod.rs
//! One entry point per subcommand. Each returns a [`RunReport`] so the
//! binary can always print a summary.

pub mod confirm;
pub mod export;
pub mod extract;
pub mod narrate;
pub mod transforms;

use crate::api::NotionHttpClient;
use crate::config::{Command, NotionSettings, ObjectStoreSettings, SpeechSettings};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::report::RunReport;
use crate::speech::OpenAiSpeechClient;
use crate::storage::R2ObjectStore;
use crate::transform::{Substitution, TransformOptions, TypeConversion};

pub use narrate::Narrator;
pub use transforms::{run_audit, run_transform, PageTransform};

/// Resolves the settings `command` needs, builds the clients and runs it.
pub async fn run(command: Command) -> Result<RunReport, AppError> {
    let notion = NotionSettings::from_env()?;
    let repo = NotionHttpClient::new(&notion.api_key)?;
    let retry = RetryPolicy::default();

    match command {
        Command::Extract(args) => extract::extract(&repo, &args, &retry).await,
        Command::Test(args) => extract::check(&repo, &args, &retry).await,
        Command::Checkboxes(args) => {
            run_transform(
                &repo,
                "checkboxes",
                &PageTransform::Convert(TypeConversion::CHECKBOXES),
                &args,
                TransformOptions::default(),
            )
            .await
        }
        Command::Quotes(args) => {
            run_transform(
                &repo,
                "quotes",
                &PageTransform::Convert(TypeConversion::QUOTES),
                &args,
                TransformOptions::default(),
            )
            .await
        }
        Command::Replace(args) => {
            let substitution = Substitution::new(args.search, args.replace)?;
            run_transform(
                &repo,
                "replace",
                &PageTransform::Replace(substitution),
                &args.mutation,
                TransformOptions::default(),
            )
            .await
        }
        Command::DryRun(mut args) => {
            args.mutation.dry_run = true;
            let substitution = Substitution::new(args.search, args.replace)?;
            run_transform(
                &repo,
                "dry-run",
                &PageTransform::Replace(substitution),
                &args.mutation,
                TransformOptions::default(),
            )
            .await
        }
        Command::AuditH1(args) => run_audit(&repo, &args, TransformOptions::default()).await,
        Command::Narrate(args) => {
            let speech = OpenAiSpeechClient::new(SpeechSettings::from_env()?)?;
            let store = R2ObjectStore::new(ObjectStoreSettings::from_env()?)?;
            Narrator {
                repo: &repo,
                speech: &speech,
                store: &store,
                retry,
            }
            .run(&args)
            .await
        }
        Command::Pull(args) => export::pull(&repo, &args, &retry).await,
        Command::Sync(args) => export::sync(&repo, &args, &retry).await,
    }
}
