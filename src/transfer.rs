use crate::config::HarvestConfig;
use crate::error::{FetchError, TransferError};
use crate::fetchers::http::{build_client, parse_http_url, request_error, send};
use crate::utils::safe_filename;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Suffix of a download that is still being streamed
const PARTIAL_EXTENSION: &str = ".part";

/// What is being downloaded; picks the fallback name and the timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    File,
}

impl MediaKind {
    fn default_stem(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::File => "file",
        }
    }

    fn default_ext(self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
            MediaKind::File => "bin",
        }
    }
}

/// A file sitting in the download directory
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedFile {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
    pub size_mb: f64,
    pub modified: DateTime<Local>,
    pub extension: String,
}

/// Streams remote media into a download directory
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    dir: PathBuf,
    image_timeout: Duration,
    download_timeout: Duration,
}

impl Downloader {
    /// Images use the page timeout; videos and files the longer download timeout
    pub fn from_config(config: &HarvestConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(&config.user_agent, config.download_timeout())?,
            dir: config.download_dir.clone(),
            image_timeout: config.page_timeout(),
            download_timeout: config.download_timeout(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn timeout_for(&self, kind: MediaKind) -> Duration {
        match kind {
            MediaKind::Image => self.image_timeout,
            MediaKind::Video | MediaKind::File => self.download_timeout,
        }
    }

    /// Downloads `url` and returns the path it was written to
    pub async fn download(
        &self,
        url: &str,
        kind: MediaKind,
        index: usize,
    ) -> Result<PathBuf, TransferError> {
        let target = parse_http_url(url)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| TransferError::io(&self.dir, e))?;

        let stem = format!("{}_{}", kind.default_stem(), index);
        let path = self
            .dir
            .join(safe_filename(url, &stem, kind.default_ext(), Local::now()));

        ::log::info!("Downloading {} to {}", url, path.display());

        // per-request timeout covers the body as well as the headers
        let request = self.client.get(target).timeout(self.timeout_for(kind));
        let mut response = send(request, url).await?;

        let mut partial = path.clone().into_os_string();
        partial.push(PARTIAL_EXTENSION);
        let partial = PathBuf::from(partial);
        let written = match stream_to_file(&mut response, &partial, url).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(remove) = fs::remove_file(&partial).await {
                    ::log::warn!("Could not remove {}: {}", partial.display(), remove);
                }
                return Err(e);
            }
        };
        fs::rename(&partial, &path)
            .await
            .map_err(|e| TransferError::io(&path, e))?;

        ::log::debug!("Wrote {} bytes to {}", written, path.display());
        Ok(path)
    }

    /// Files in the download directory, newest first
    pub async fn list(&self) -> Result<Vec<DownloadedFile>, TransferError> {
        let mut files = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(TransferError::io(&self.dir, e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TransferError::io(&self.dir, e))?
        {
            let path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| TransferError::io(&path, e))?;
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push(DownloadedFile {
                filename: entry.file_name().to_string_lossy().into_owned(),
                extension: path
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy()))
                    .unwrap_or_default(),
                size: metadata.len(),
                size_mb: (metadata.len() as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
                modified: DateTime::<Local>::from(modified),
                path,
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(files)
    }

    /// Removes downloads at least `max_age` old; returns how many
    pub async fn cleanup(&self, max_age: Duration) -> Result<usize, TransferError> {
        let now = SystemTime::now();
        let mut removed = 0;

        for file in self.list().await? {
            let age = now
                .duration_since(SystemTime::from(file.modified))
                .unwrap_or_default();
            if age >= max_age {
                fs::remove_file(&file.path)
                    .await
                    .map_err(|e| TransferError::io(&file.path, e))?;
                ::log::debug!("Removed stale download {}", file.path.display());
                removed += 1;
            }
        }

        if removed > 0 {
            ::log::info!("Removed {} stale downloads from {}", removed, self.dir.display());
        }
        Ok(removed)
    }
}

/// Streams the response body into `path`, returning the byte count
async fn stream_to_file(
    response: &mut reqwest::Response,
    path: &Path,
    url: &str,
) -> Result<usize, TransferError> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| TransferError::io(path, e))?;

    let mut written = 0usize;
    while let Some(chunk) = response.chunk().await.map_err(|e| request_error(url, e))? {
        file.write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(path, e))?;
        written += chunk.len();
    }
    file.flush().await.map_err(|e| TransferError::io(path, e))?;

    Ok(written)
}
