//! Local saving of exported documents

use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TRANSIENT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Destination for a finished export
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Persist `payload` under `filename`, returning where it landed
    async fn save(&self, filename: &str, payload: Vec<u8>) -> io::Result<PathBuf>;
}

/// Saves exports into a directory.
///
/// The payload goes to a transient `.part` file that is renamed into place,
/// so a failed save leaves nothing behind. Existing files are never replaced:
/// a `-2`, `-3` … suffix is added instead.
#[derive(Debug, Clone)]
pub struct FileSystemDownloads {
    dir: PathBuf,
}

impl FileSystemDownloads {
    pub fn new(dir: PathBuf) -> Self {
        FileSystemDownloads { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for FileSystemDownloads {
    async fn save(&self, filename: &str, payload: Vec<u8>) -> io::Result<PathBuf> {
        let dir = self.dir.clone();
        let filename = filename.to_string();

        tokio::task::spawn_blocking(move || save_blocking(&dir, &filename, &payload))
            .await
            .map_err(io::Error::other)?
    }
}

fn save_blocking(dir: &Path, filename: &str, payload: &[u8]) -> io::Result<PathBuf> {
    if Path::new(filename).file_name().and_then(|n| n.to_str()) != Some(filename) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("export filename must not contain a path: {}", filename),
        ));
    }

    fs::create_dir_all(dir)?;

    let target = reserve_target(dir, filename)?;
    let transient = dir.join(format!(
        ".{}.part-{}-{}",
        filename,
        std::process::id(),
        TRANSIENT_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let result = fs::write(&transient, payload).and_then(|_| fs::rename(&transient, &target));
    if let Err(e) = result {
        let _ = fs::remove_file(&transient);
        let _ = fs::remove_file(&target);
        return Err(e);
    }

    Ok(target)
}

/// Claim the first free name among `name.ext`, `name-2.ext`, `name-3.ext` …
fn reserve_target(dir: &Path, filename: &str) -> io::Result<PathBuf> {
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    for attempt in 1u32.. {
        let candidate = match (attempt, extension) {
            (1, _) => filename.to_string(),
            (n, Some(ext)) => format!("{}-{}.{}", stem, n, ext),
            (n, None) => format!("{}-{}", stem, n),
        };
        let path = dir.join(candidate);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::other("no free export filename"))
}
