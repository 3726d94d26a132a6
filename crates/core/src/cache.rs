use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::debug;

use crate::error::Result;

/// Get the cache directory for a given video source (path or URL)
pub fn get_cache_dir(source: &str) -> PathBuf {
    get_cache_dir_in(&get_root_cache_dir(), source)
}

pub fn get_cache_dir_in(root: &Path, source: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    root.join(hasher.finish().to_string())
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("adlabel")
}

/// Get the path for a cached analysis (model aware)
pub fn get_analysis_path(cache_dir: &Path, model: &str) -> PathBuf {
    let model: String = model
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    cache_dir.join(format!("analysis_{}.txt", model))
}

pub async fn load_cached_analysis(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => {
            debug!(path = %path.display(), "analysis cache hit");
            Ok(Some(text))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn save_analysis(path: &Path, raw_text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, raw_text).await?;
    Ok(())
}
