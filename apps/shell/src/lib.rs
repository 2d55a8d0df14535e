//! Commands behind the `folio` CLI: render a frontend shell against a live API, or show the plan
//! it would apply.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_customize::http::HttpSettingsSource;
use folio_customize::{HtmlDocument, InjectionPlan, SettingsSource, apply, compute_plan, load_settings, presets};
use folio_domain::settings::SettingsDocument;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Render Folio site customization into an HTML shell")]
pub struct Cli {
    /// Log level for diagnostics written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply the live settings to a shell document.
    Render {
        #[command(flatten)]
        source: SourceArgs,
        /// HTML shell to customize.
        #[arg(long)]
        shell: PathBuf,
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the injection plan as JSON.
    Plan {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Base URL of the Folio API, e.g. `http://localhost:5000`.
    #[arg(long)]
    pub api: String,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
    /// Plan over an empty defaults table instead of the built-in theme.
    #[arg(long)]
    pub no_preset: bool,
}

impl SourceArgs {
    fn defaults(&self) -> SettingsDocument {
        if self.no_preset { SettingsDocument::new() } else { presets::neon_pulse() }
    }

    async fn plan(&self) -> Result<InjectionPlan> {
        let source = HttpSettingsSource::with_timeout(&self.api, Duration::from_secs(self.timeout))
            .context("Failed to build the settings client")?;
        Ok(plan_from(&source, &self.defaults()).await)
    }
}

/// Reads the settings (an empty document on failure) and plans over `defaults`.
pub async fn plan_from<S: SettingsSource>(source: &S, defaults: &SettingsDocument) -> InjectionPlan {
    let settings = load_settings(source).await;
    compute_plan(&settings, defaults)
}

/// Applies `plan` to the shell source and returns the rendered page.
#[must_use]
pub fn render(shell: &str, plan: &InjectionPlan) -> String {
    let mut page = HtmlDocument::parse(shell);
    apply(&mut page, plan);
    page.render()
}

/// Runs a parsed command, returning what should be written to stdout.
///
/// # Errors
/// Fails when the shell cannot be read, the output cannot be written, or the HTTP client
/// cannot be built. An unreachable API is not an error.
pub async fn execute(command: Command) -> Result<Option<String>> {
    match command {
        Command::Render { source, shell, out } => {
            let shell_source = tokio::fs::read_to_string(&shell)
                .await
                .with_context(|| format!("Failed to read shell {}", shell.display()))?;
            let plan = source.plan().await?;
            let page = render(&shell_source, &plan);

            match out {
                Some(out) => {
                    tokio::fs::write(&out, page).await.with_context(|| format!("Failed to write {}", out.display()))?;
                    info!(blocks = plan.len(), out = %out.display(), "Shell rendered");
                    Ok(None)
                },
                None => Ok(Some(page)),
            }
        },
        Command::Plan { source } => {
            let plan = source.plan().await?;
            Ok(Some(serde_json::to_string_pretty(&plan).context("Failed to encode plan")?))
        },
    }
}
