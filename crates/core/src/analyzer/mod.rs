//! Video-understanding collaborator.
//!
//! The service itself is behind [`VideoUnderstanding`]; [`VideoAnalyzer`]
//! owns the workflow around it: upload, wait for the file to become active,
//! then ask for the creative analysis with a bounded number of retries.

pub mod gemini;
pub mod prompt;
pub mod source;

use std::{
    fmt,
    path::PathBuf,
    time::{Duration, Instant},
};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    cache::{get_analysis_path, get_cache_dir_in, load_cached_analysis, save_analysis},
    config::AnalyzerConfig,
    error::{AdLabelError, Result},
    types::{AnalysisRecord, Report},
};

pub use gemini::GeminiClient;
pub use prompt::ANALYSIS_PROMPT;
pub use source::{LoadedVideo, VideoSource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileState::Processing => "PROCESSING",
            FileState::Active => "ACTIVE",
            FileState::Failed => "FAILED",
            FileState::Unspecified => "STATE_UNSPECIFIED",
        };
        f.write_str(s)
    }
}

/// A video held by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub name: String,
    pub uri: String,
    pub mime_type: String,
    pub state: FileState,
}

/// Raw model output: either text or the reason the prompt was blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: Option<String>,
    pub block_reason: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait VideoUnderstanding {
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, display_name: &str)
    -> Result<RemoteFile>;
    async fn get_file(&self, name: &str) -> Result<RemoteFile>;
    async fn generate(&self, file: &RemoteFile, prompt: &str) -> Result<Generation>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Completed videos served from the analysis cache.
    pub cached: usize,
    pub records: Vec<AnalysisRecord>,
}

/// Progress of one video in a batch.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Started { label: &'a str },
    Cached { label: &'a str },
    Completed { label: &'a str, elapsed: Duration },
    Failed { label: &'a str, error: &'a AdLabelError },
}

pub struct VideoAnalyzer<S> {
    service: S,
    config: AnalyzerConfig,
    http: Client,
    cache_root: Option<PathBuf>,
    force: bool,
}

impl<S: VideoUnderstanding> VideoAnalyzer<S> {
    pub fn new(service: S, config: AnalyzerConfig) -> Self {
        Self {
            service,
            config,
            http: Client::new(),
            cache_root: None,
            force: false,
        }
    }

    /// Reuse and store raw analyses under `root`. With `force`, cached text
    /// is ignored but fresh results are still written.
    pub fn with_cache(mut self, root: impl Into<PathBuf>, force: bool) -> Self {
        self.cache_root = Some(root.into());
        self.force = force;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Poll until the file is `ACTIVE`.
    ///
    /// A `FAILED` state ends the wait at once. Poll errors are retried until
    /// the attempts run out. If the file is still processing after the last
    /// attempt, the last seen state is returned and generation goes ahead.
    pub async fn wait_for_file_ready(&self, name: &str) -> Result<RemoteFile> {
        let attempts = self.config.max_poll_attempts;
        let mut last: Option<Result<RemoteFile>> = None;

        for attempt in 1..=attempts {
            match self.service.get_file(name).await {
                Ok(file) => match file.state {
                    FileState::Active => {
                        info!(file = name, attempt, "file is ready");
                        return Ok(file);
                    }
                    FileState::Failed => {
                        return Err(AdLabelError::FileProcessingFailed {
                            name: name.to_string(),
                            state: file.state.to_string(),
                        });
                    }
                    state => {
                        debug!(file = name, attempt, attempts, %state, "file still processing");
                        last = Some(Ok(file));
                    }
                },
                Err(e) => {
                    warn!(file = name, attempt, attempts, error = %e, "file status check failed");
                    last = Some(Err(e));
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        match last {
            Some(Ok(file)) => {
                warn!(file = name, state = %file.state, "file not active after polling, proceeding anyway");
                Ok(file)
            }
            _ => Err(AdLabelError::FileNeverReady {
                name: name.to_string(),
                attempts,
            }),
        }
    }

    async fn generate_once(&self, file: &RemoteFile) -> Result<String> {
        let generation = self.service.generate(file, ANALYSIS_PROMPT).await?;
        if let Some(reason) = generation.block_reason {
            return Err(AdLabelError::ContentBlocked { reason });
        }
        generation
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(AdLabelError::EmptyResponse)
    }

    /// Ask for the analysis, retrying with exponential backoff.
    pub async fn generate_with_retry(&self, file: &RemoteFile) -> Result<String> {
        let attempts = self.config.max_retries;
        let mut last_reason = String::from("no attempts made");

        for attempt in 1..=attempts {
            match self.generate_once(file).await {
                Ok(text) => {
                    info!(file = %file.name, attempt, "analysis generated");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(file = %file.name, attempt, attempts, error = %e, "generation attempt failed");
                    last_reason = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_delay(attempt)).await;
                    }
                }
            }
        }

        Err(AdLabelError::AnalysisFailed {
            attempts,
            reason: last_reason,
        })
    }

    pub async fn analyze(&self, source: &VideoSource) -> Result<Report> {
        let video = source.load(&self.http, self.config.max_video_bytes).await?;
        info!(video = %video.label, bytes = video.bytes.len(), "uploading video");

        let uploaded = self
            .service
            .upload(video.bytes, video.mime_type, &video.label)
            .await?;
        let ready = self.wait_for_file_ready(&uploaded.name).await?;
        let file = if ready.uri.is_empty() { uploaded } else { ready };

        let raw_text = self.generate_with_retry(&file).await?;
        Ok(Report::new(video.label, raw_text))
    }

    /// Like [`analyze`](Self::analyze), but goes through the analysis cache
    /// when one is configured. Returns the report and whether it was cached.
    pub async fn analyze_cached(&self, source: &VideoSource) -> Result<(Report, bool)> {
        let Some(root) = &self.cache_root else {
            return Ok((self.analyze(source).await?, false));
        };
        let path = get_analysis_path(&get_cache_dir_in(root, &source.cache_key()), &self.config.model);

        if !self.force {
            if let Some(raw_text) = load_cached_analysis(&path).await? {
                return Ok((Report::new(source.label(), raw_text), true));
            }
        }

        let report = self.analyze(source).await?;
        save_analysis(&path, &report.raw_text).await?;
        Ok((report, false))
    }

    /// Analyze videos one after another. A failure is recorded against its
    /// video and the batch moves on.
    pub async fn analyze_batch(&self, sources: &[VideoSource]) -> BatchSummary {
        self.analyze_batch_with(sources, |_| {}).await
    }

    /// [`analyze_batch`](Self::analyze_batch) reporting each video's progress
    /// to `on_event`.
    pub async fn analyze_batch_with<F>(&self, sources: &[VideoSource], mut on_event: F) -> BatchSummary
    where
        F: FnMut(BatchEvent<'_>),
    {
        let mut records = Vec::with_capacity(sources.len());
        let mut cached = 0;

        for source in sources {
            let label = source.label();
            on_event(BatchEvent::Started { label: &label });
            let started = Instant::now();

            let record = match self.analyze_cached(source).await {
                Ok((report, true)) => {
                    cached += 1;
                    on_event(BatchEvent::Cached { label: &label });
                    report.into()
                }
                Ok((report, false)) => {
                    on_event(BatchEvent::Completed {
                        label: &label,
                        elapsed: started.elapsed(),
                    });
                    report.into()
                }
                Err(e) => {
                    warn!(video = %label, error = %e, "video analysis failed");
                    on_event(BatchEvent::Failed {
                        label: &label,
                        error: &e,
                    });
                    AnalysisRecord::failed(label, e.to_string())
                }
            };
            records.push(record);
        }

        let completed = records.iter().filter(|r| r.raw_text().is_some()).count();
        BatchSummary {
            total: sources.len(),
            completed,
            failed: sources.len() - completed,
            cached,
            records,
        }
    }
}
