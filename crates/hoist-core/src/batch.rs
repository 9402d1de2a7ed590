//! Batch driver
//!
//! Runs every contract entry of every project, one at a time, in project-name order.
//! Each entry goes through
//! `ReadingArtifact -> Decoding -> BuildingPayload -> Uploading -> Renaming -> Done`;
//! any error stops that entry at the stage it reached. What happens to the rest of the
//! batch is decided by the [`FailurePolicy`].

use std::fmt;
use std::path::PathBuf;

use crate::api::ContractApi;
use crate::error::Error;
use crate::project::{ContractEntry, Project, ProjectsConfig};
use crate::types::{NetworkId, ProjectSlug, Stage};
use crate::upload::{prepare_upload, PreparedUpload, UploadOutcome, Uploader};

/// What to do with the remaining entries once one has failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the whole batch at the first failure
    #[default]
    Abort,
    /// Report the failure and move on to the next entry
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub policy: FailurePolicy,
    /// Prepare uploads and write verification documents without calling the API
    pub dry_run: bool,
}

/// Progress hooks, all optional
pub trait BatchObserver {
    fn project_started(&mut self, _name: &str, _project: &Project) {}

    fn contract_started(&mut self, _entry: &ContractEntry) {}

    fn contract_prepared(&mut self, _entry: &ContractEntry, _prepared: &PreparedUpload) {}

    fn contract_uploaded(&mut self, _entry: &ContractEntry, _outcome: &UploadOutcome) {}

    fn contract_failed(&mut self, _failure: &ContractFailure) {}
}

impl BatchObserver for () {}

/// A contract entry that did not make it to [`Stage::Done`]
#[derive(Debug)]
pub struct ContractFailure {
    pub project: String,
    pub slug: ProjectSlug,
    pub network_id: NetworkId,
    pub artifact: PathBuf,
    pub stage: Stage,
    pub error: Error,
}

impl fmt::Display for ContractFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (project {}, network {}) failed while {}: {}",
            self.artifact.display(),
            self.project,
            self.network_id,
            self.stage,
            self.error
        )
    }
}

#[derive(Debug)]
pub struct ContractSuccess {
    pub project: String,
    pub artifact: PathBuf,
    pub prepared: PreparedUpload,
    /// `None` on dry runs
    pub outcome: Option<UploadOutcome>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<ContractSuccess>,
    pub failed: Vec<ContractFailure>,
    /// Entries left unprocessed because the batch stopped early
    pub skipped: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn uploaded(&self) -> usize {
        self.succeeded.iter().filter(|s| s.outcome.is_some()).count()
    }

    pub fn renamed(&self) -> usize {
        self.succeeded
            .iter()
            .filter(|s| {
                s.outcome
                    .as_ref()
                    .is_some_and(|o| o.renamed_to.is_some())
            })
            .count()
    }
}

/// Process every entry of `config` according to `options`
pub async fn run_batch<A, O>(
    api: &A,
    config: &ProjectsConfig,
    options: &BatchOptions,
    observer: &mut O,
) -> BatchReport
where
    A: ContractApi + ?Sized,
    O: BatchObserver + ?Sized,
{
    let uploader = Uploader::new(api);
    let mut report = BatchReport::default();
    let mut remaining = config.contract_count();

    for (name, project) in &config.projects {
        observer.project_started(name, project);

        for entry in &project.contracts {
            remaining -= 1;
            observer.contract_started(entry);

            match process_contract(&uploader, entry, project, options, observer).await {
                Ok((prepared, outcome)) => {
                    report.succeeded.push(ContractSuccess {
                        project: name.clone(),
                        artifact: entry.path.clone(),
                        prepared,
                        outcome,
                    });
                }
                Err((stage, error)) => {
                    let failure = ContractFailure {
                        project: name.clone(),
                        slug: project.slug.clone(),
                        network_id: project.network.clone(),
                        artifact: entry.path.clone(),
                        stage,
                        error,
                    };
                    tracing::error!(code = failure.error.code(), "{}", failure);
                    observer.contract_failed(&failure);
                    report.failed.push(failure);

                    if options.policy == FailurePolicy::Abort {
                        report.skipped = remaining;
                        return report;
                    }
                }
            }
        }
    }

    report
}

async fn process_contract<A, O>(
    uploader: &Uploader<'_, A>,
    entry: &ContractEntry,
    project: &Project,
    options: &BatchOptions,
    observer: &mut O,
) -> Result<(PreparedUpload, Option<UploadOutcome>), (Stage, Error)>
where
    A: ContractApi + ?Sized,
    O: BatchObserver + ?Sized,
{
    let mut stage = Stage::ReadingArtifact;

    let prepared =
        prepare_upload(entry, &project.network, &mut stage).map_err(|e| (stage, e))?;
    observer.contract_prepared(entry, &prepared);

    if options.dry_run {
        return Ok((prepared, None));
    }

    let outcome = uploader
        .upload_contract(
            &prepared,
            entry.display_name(),
            &project.slug,
            &project.network,
            &mut stage,
        )
        .await
        .map_err(|e| (stage, e))?;
    observer.contract_uploaded(entry, &outcome);

    Ok((prepared, Some(outcome)))
}
