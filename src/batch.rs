//! Concurrent extraction over many PNG files.
//!
//! Each input is decoded, extracted and written on tokio's blocking pool;
//! a semaphore bounds how many jobs run at once. Jobs share nothing but the
//! adapter, so results are identical to extracting the files one by one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use feature_channels::ChannelMode;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::adapter::BufferAdapter;
use crate::error::BatchError;
use crate::io::{self, OutputFormat};

/// One input file and the directory its planes go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

/// What a successful job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub planes: usize,
    pub height: usize,
    pub width: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub job: BatchJob,
    pub result: Result<JobSummary, BatchError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub mode: ChannelMode,
    pub format: OutputFormat,
    pub workers: usize,
}

/// Assign every input a sub-directory of `root` named after its file stem.
///
/// Repeated stems get a `-1`, `-2`, ... suffix in input order.
pub fn plan_jobs(inputs: &[PathBuf], root: &Path) -> Vec<BatchJob> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let mut name = stem.clone();
            let mut suffix = 1;
            while !taken.insert(name.clone()) {
                name = format!("{stem}-{suffix}");
                suffix += 1;
            }
            BatchJob {
                input: input.clone(),
                output_dir: root.join(name),
            }
        })
        .collect()
}

/// Decode `input`, extract its planes and write them to `output_dir`.
pub fn extract_to_dir(
    adapter: &BufferAdapter,
    input: &Path,
    output_dir: &Path,
    mode: ChannelMode,
    format: OutputFormat,
) -> Result<JobSummary, BatchError> {
    let rgb = io::read_png(input)?;
    let features = adapter.run_image(rgb.view(), mode.is_full())?;
    let (planes, height, width) = features.dim();

    let files = match format {
        OutputFormat::Png => io::write_plane_pngs(output_dir, features.view())?,
        OutputFormat::Raw => {
            io::write_raw(output_dir, features.view(), mode)?;
            vec![output_dir.join(io::RAW_FILE), output_dir.join(io::SIDECAR_FILE)]
        }
    };
    Ok(JobSummary {
        planes,
        height,
        width,
        files,
    })
}

/// Run `jobs` with at most `options.workers` in flight.
///
/// Outcomes are returned in job order; a failing job does not stop the
/// others.
pub async fn run_batch(
    jobs: Vec<BatchJob>,
    options: BatchOptions,
    adapter: BufferAdapter,
) -> Vec<JobOutcome> {
    let semaphore = Arc::new(Semaphore::new(options.workers.max(1)));
    let adapter = Arc::new(adapter);
    let mut set = JoinSet::new();

    for (index, job) in jobs.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let adapter = Arc::clone(&adapter);
        set.spawn(async move {
            let result = run_job(&semaphore, adapter, &job, options).await;
            match &result {
                Ok(summary) => tracing::info!(
                    input = %job.input.display(),
                    planes = summary.planes,
                    height = summary.height,
                    width = summary.width,
                    "Extracted features"
                ),
                Err(e) => tracing::warn!(%e, input = %job.input.display(), "Extraction failed"),
            }
            (index, JobOutcome { job, result })
        });
    }

    let mut outcomes = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!(%e, "Batch task aborted"),
        }
    }
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

async fn run_job(
    semaphore: &Semaphore,
    adapter: Arc<BufferAdapter>,
    job: &BatchJob,
    options: BatchOptions,
) -> Result<JobSummary, BatchError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| BatchError::Task(e.to_string()))?;
    let input = job.input.clone();
    let output_dir = job.output_dir.clone();

    tokio::task::spawn_blocking(move || {
        extract_to_dir(&adapter, &input, &output_dir, options.mode, options.format)
    })
    .await
    .map_err(|e| BatchError::Task(e.to_string()))?
}
