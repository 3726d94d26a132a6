use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;

use crate::error::{AdLabelError, Result};

pub const DEFAULT_VIDEO_NAME: &str = "video.mp4";
pub const DEFAULT_MIME_TYPE: &str = "video/mp4";

/// Where a video to analyze comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Path(PathBuf),
    Url(String),
}

/// Video bytes ready for upload.
#[derive(Debug, Clone)]
pub struct LoadedVideo {
    pub label: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

fn url_file_name(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query.rsplit('/').next().unwrap_or("")
}

impl VideoSource {
    /// `http(s)://` arguments are URLs, anything else is a local path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            VideoSource::Url(arg.to_string())
        } else {
            VideoSource::Path(PathBuf::from(arg))
        }
    }

    /// File name used to identify the video in reports and exports.
    pub fn label(&self) -> String {
        let name = match self {
            VideoSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            VideoSource::Url(url) => url_file_name(url).to_string(),
        };
        if name.is_empty() {
            DEFAULT_VIDEO_NAME.to_string()
        } else {
            name
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            VideoSource::Path(path) => std::path::absolute(path)
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string(),
            VideoSource::Url(url) => url.clone(),
        }
    }

    /// Local files must have a known video extension. URLs often do not, so
    /// they fall back to mp4.
    pub fn mime_type(&self) -> Result<&'static str> {
        match self {
            VideoSource::Path(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(mime_type_for_extension)
                .ok_or_else(|| AdLabelError::UnsupportedVideoType { path: path.clone() }),
            VideoSource::Url(url) => Ok(Path::new(url_file_name(url))
                .extension()
                .and_then(|e| e.to_str())
                .and_then(mime_type_for_extension)
                .unwrap_or(DEFAULT_MIME_TYPE)),
        }
    }

    pub async fn load(&self, http: &Client, max_bytes: u64) -> Result<LoadedVideo> {
        let mime_type = self.mime_type()?;
        let bytes = match self {
            VideoSource::Path(path) => {
                let size = fs::metadata(path).await?.len();
                check_size(size, max_bytes)?;
                fs::read(path).await?
            }
            VideoSource::Url(url) => {
                let response = http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AdLabelError::DownloadFailed {
                        url: url.clone(),
                        reason: format!("server responded {}", status),
                    });
                }
                if let Some(size) = response.content_length() {
                    check_size(size, max_bytes)?;
                }
                let bytes = response.bytes().await?;
                check_size(bytes.len() as u64, max_bytes)?;
                bytes.to_vec()
            }
        };

        Ok(LoadedVideo {
            label: self.label(),
            mime_type,
            bytes,
        })
    }
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(AdLabelError::VideoTooLarge { size, limit });
    }
    Ok(())
}
