//! Upload artifacts listed in the project configuration

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;
use hoist_core::{
    run_batch, BatchObserver, BatchOptions, BatchReport, ContractApi, ContractEntry,
    ContractFailure, Error, FailurePolicy, NetworkId, PreparedUpload, Principal, Project,
    ProjectSlug, RenameRequest, RenameResponse, UploadOutcome, UploadRequest, UploadResponse,
};

use crate::client::TenderlyClient;
use crate::config::{load_projects, AuthConfig, PROJECTS_CONFIG};

/// Upload every configured artifact and apply display names
#[derive(Args)]
pub struct UploadCommand {
    /// Project configuration file (.yml, .yaml, .json or .toml)
    #[arg(short, long, default_value = PROJECTS_CONFIG)]
    pub config: PathBuf,

    /// Only upload the named project (repeatable)
    #[arg(short, long = "project")]
    pub projects: Vec<String>,

    /// Keep going after a contract fails instead of stopping the batch
    #[arg(long)]
    pub continue_on_error: bool,

    /// Write verification documents and show what would be uploaded, without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

impl UploadCommand {
    pub async fn run(self) -> Result<()> {
        let projects = load_projects(&self.config)?.select(&self.projects)?;

        if projects.contract_count() == 0 {
            println!(
                "{} No contracts configured in {}",
                style("⚠").yellow(),
                self.config.display()
            );
            return Ok(());
        }

        let options = BatchOptions {
            policy: if self.continue_on_error {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
            dry_run: self.dry_run,
        };

        let mut observer = ConsoleObserver {
            dry_run: self.dry_run,
        };

        let report = if self.dry_run {
            println!(
                "{} Dry run, nothing will be sent to the API",
                style("ℹ").blue()
            );
            run_batch(&OfflineApi, &projects, &options, &mut observer).await
        } else {
            let auth = AuthConfig::load()?;
            let client = TenderlyClient::new(&auth)?;

            let principal = client.who_am_i().await?;
            println!(
                "{} Connected as {}",
                style("✓").green(),
                style(&principal).cyan()
            );

            run_batch(&client, &projects, &options, &mut observer).await
        };

        summarize(&report, self.dry_run)
    }
}

/// Prints progress lines as the batch advances
struct ConsoleObserver {
    dry_run: bool,
}

impl BatchObserver for ConsoleObserver {
    fn project_started(&mut self, name: &str, project: &Project) {
        println!();
        println!(
            "{} Project {} ({} on network {})",
            style("→").blue(),
            style(name).cyan().bold(),
            project.slug,
            project.network
        );
    }

    fn contract_started(&mut self, entry: &ContractEntry) {
        println!(
            "{} Uploading {}",
            style("→").blue(),
            style(entry.path.display()).cyan()
        );
    }

    fn contract_prepared(&mut self, _entry: &ContractEntry, prepared: &PreparedUpload) {
        let target = prepared
            .request
            .deployed_contracts()
            .filter_map(|c| c.contract_name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "   {} {} source file(s), target {} at {}",
            style("*").dim(),
            prepared.request.contracts.len(),
            style(if target.is_empty() { "<none>" } else { target.as_str() }).cyan(),
            style(&prepared.address).yellow()
        );

        if let Some(path) = &prepared.verification_path {
            println!(
                "   {} Verification input written to {}",
                style("*").dim(),
                path.display()
            );
        }

        if self.dry_run {
            println!("   {} Skipped upload (dry run)", style("-").dim());
        }
    }

    fn contract_uploaded(&mut self, _entry: &ContractEntry, outcome: &UploadOutcome) {
        let contracts = outcome
            .contracts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("   {} Contract uploaded: [{}]", style("✓").green(), contracts);

        if let Some(name) = &outcome.renamed_to {
            println!(
                "   {} Contract renamed to {}",
                style("✓").green(),
                style(name).cyan()
            );
        }
    }

    fn contract_failed(&mut self, failure: &ContractFailure) {
        println!(
            "   {} Failed while {}: {}",
            style("✗").red(),
            failure.stage,
            failure.error
        );
    }
}

fn summarize(report: &BatchReport, dry_run: bool) -> Result<()> {
    println!();
    println!("{}", outcome_line(report, dry_run));

    if report.skipped > 0 {
        println!(
            "{} {} contract(s) not processed",
            style("!").yellow(),
            report.skipped
        );
    }

    if report.is_success() {
        return Ok(());
    }

    let failures = report
        .failed
        .iter()
        .map(|f| format!("  {} {}", style("✗").red(), f))
        .collect::<Vec<_>>()
        .join("\n");

    Err(eyre!(
        "{} contract(s) failed:\n{}",
        report.failed.len(),
        failures
    ))
}

/// Count line for the end of a run; only a clean run gets the success mark
fn outcome_line(report: &BatchReport, dry_run: bool) -> String {
    let counts = if dry_run {
        format!("{} contract(s) prepared", report.succeeded.len())
    } else {
        format!(
            "{} contract(s) uploaded, {} renamed",
            report.uploaded(),
            report.renamed()
        )
    };

    if report.is_success() {
        format!("{} {}", style("✓").green().bold(), counts)
    } else {
        format!("{} {}", style("⚠").yellow(), counts)
    }
}

/// Stand-in API for dry runs; the batch never calls it because uploads are skipped
struct OfflineApi;

#[async_trait]
impl ContractApi for OfflineApi {
    async fn who_am_i(&self) -> hoist_core::Result<Principal> {
        Err(offline())
    }

    async fn upload_contracts(
        &self,
        _request: &UploadRequest,
        _project: &ProjectSlug,
    ) -> hoist_core::Result<UploadResponse> {
        Err(offline())
    }

    async fn rename_contract(
        &self,
        _request: &RenameRequest,
        _project: &ProjectSlug,
        _network_id: &NetworkId,
        _address: &str,
    ) -> hoist_core::Result<RenameResponse> {
        Err(offline())
    }
}

fn offline() -> Error {
    Error::RemoteTransport("dry run, API calls are disabled".to_string())
}
