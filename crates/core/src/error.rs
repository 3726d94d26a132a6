use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdLabelError {
    #[error("Invalid export input: {reason}")]
    InvalidInputShape { reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("Unsupported video type for {path}. Only mp4, mov, avi and webm are allowed")]
    UnsupportedVideoType { path: PathBuf },

    #[error("Video is {size} bytes, limit is {limit} bytes")]
    VideoTooLarge { size: u64, limit: u64 },

    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("File upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("File processing failed for {name}: {state}")]
    FileProcessingFailed { name: String, state: String },

    #[error("File {name} never became ready after {attempts} attempts")]
    FileNeverReady { name: String, attempts: u32 },

    #[error("Content blocked: {reason}")]
    ContentBlocked { reason: String },

    #[error("No analysis text received from the model")]
    EmptyResponse,

    #[error("All {attempts} attempts failed. Last error: {reason}")]
    AnalysisFailed { attempts: u32, reason: String },

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl AdLabelError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInputShape {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdLabelError>;
