//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei media e le operazioni sicure sui file.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di file media, potando le directory escluse
//!   (backup, .git, node_modules, dist, build, .next)
//! - Discovery dei file di testo per la riscrittura dei riferimenti
//! - Backup dell'originale (copia che preserva la struttura) prima di ogni
//!   trasformazione
//! - Persistenza atomica dei candidati: l'output viene scritto in un tempfile
//!   nella directory di destinazione e rinominato solo a trasformazione
//!   accettata, mai un file parziale al path originale
//! - Formattazione human-readable delle dimensioni
//!
//! ## Esempio:
//! ```ignore
//! let assets = FileManager::find_media_assets(&base)?;
//! for asset in &assets {
//!     println!("{} ({})", asset.path.display(), FileManager::format_size(asset.size_bytes));
//! }
//! ```

use crate::config::{BACKUP_DIR, EXCLUDE_DIRS};
use crate::media::{self, MediaAsset, MediaKind};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use walkdir::{DirEntry, WalkDir};

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    fn is_excluded_dir(entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| EXCLUDE_DIRS.contains(&name))
                .unwrap_or(false)
    }

    /// Find all supported media files under a directory, skipping excluded
    /// directories and anything whose metadata cannot be read.
    pub fn find_media_assets(base: &Path) -> Result<Vec<MediaAsset>> {
        let mut assets = Vec::new();

        for entry in WalkDir::new(base)
            .into_iter()
            .filter_entry(|e| !Self::is_excluded_dir(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if let Some(kind) = MediaKind::from_path(path) {
                match entry.metadata() {
                    Ok(meta) => assets.push(MediaAsset::new(path.to_path_buf(), kind, meta.len())),
                    Err(_) => continue,
                }
            }
        }

        Ok(assets)
    }

    /// Find all text files eligible for reference rewriting
    pub fn find_text_files(base: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(base)
            .into_iter()
            .filter_entry(|e| !Self::is_excluded_dir(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if media::is_text_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }

        Ok(files)
    }

    /// Copy a file into the backup directory, preserving its position in the
    /// tree. Must complete before the transform may overwrite the original.
    pub async fn backup_original(path: &Path, base: &Path) -> Result<PathBuf> {
        let relative = path.strip_prefix(base).unwrap_or_else(|_| {
            Path::new(path.file_name().unwrap_or(path.as_os_str()))
        });
        let backup_path = base.join(BACKUP_DIR).join(relative);

        if let Some(parent) = backup_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(path, &backup_path).await?;

        Ok(backup_path)
    }

    /// Create a candidate output file in the same directory as the final
    /// destination, so the later rename is atomic.
    pub fn candidate_file(dest: &Path, suffix: &str) -> Result<NamedTempFile> {
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let candidate = tempfile::Builder::new()
            .prefix(".optimizing-")
            .suffix(suffix)
            .tempfile_in(dir)?;
        Ok(candidate)
    }

    /// Atomically move an accepted candidate over its destination. Dropping
    /// the candidate instead discards it without touching the destination.
    pub fn persist_candidate(candidate: NamedTempFile, dest: &Path) -> Result<()> {
        candidate.persist(dest)?;
        Ok(())
    }

    /// Current size of a file on disk
    pub async fn file_size(path: &Path) -> Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn touch(path: &Path, bytes: usize) {
        if let Some(parent) = path.parent() {
            std_fs::create_dir_all(parent).unwrap();
        }
        std_fs::write(path, vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn test_find_media_assets_prunes_excluded_dirs() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        touch(&base.join("img/photo.jpg"), 10);
        touch(&base.join("media/clip.mp4"), 20);
        touch(&base.join("notes.txt"), 5);
        touch(&base.join("node_modules/pkg/asset.png"), 10);
        touch(&base.join(BACKUP_DIR).join("photo.jpg"), 10);

        let mut assets = FileManager::find_media_assets(base).unwrap();
        assets.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(assets.len(), 2);
        assert!(assets[0].path.ends_with("img/photo.jpg"));
        assert_eq!(assets[0].kind, MediaKind::RasterImage);
        assert!(assets[1].path.ends_with("media/clip.mp4"));
        assert_eq!(assets[1].size_bytes, 20);
    }

    #[test]
    fn test_find_text_files() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        touch(&base.join("index.html"), 10);
        touch(&base.join("js/app.js"), 10);
        touch(&base.join("dist/bundle.js"), 10);
        touch(&base.join("photo.jpg"), 10);

        let mut files = FileManager::find_text_files(base).unwrap();
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("index.html"));
        assert!(files[1].ends_with("js/app.js"));
    }

    #[tokio::test]
    async fn test_backup_preserves_tree_structure() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        let original = base.join("img/deep/photo.jpg");
        touch(&original, 42);

        let backup = FileManager::backup_original(&original, base).await.unwrap();

        assert!(backup.ends_with("backup_originals/img/deep/photo.jpg"));
        assert_eq!(std_fs::read(&backup).unwrap().len(), 42);
        // original untouched
        assert_eq!(std_fs::read(&original).unwrap().len(), 42);
    }

    #[test]
    fn test_persist_candidate_replaces_atomically() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("photo.jpg");
        touch(&dest, 100);

        let candidate = FileManager::candidate_file(&dest, ".jpg").unwrap();
        std_fs::write(candidate.path(), vec![1u8; 40]).unwrap();
        FileManager::persist_candidate(candidate, &dest).unwrap();

        assert_eq!(std_fs::read(&dest).unwrap().len(), 40);
    }

    #[test]
    fn test_discarded_candidate_leaves_destination_alone() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("photo.jpg");
        touch(&dest, 100);

        {
            let candidate = FileManager::candidate_file(&dest, ".jpg").unwrap();
            std_fs::write(candidate.path(), vec![1u8; 400]).unwrap();
            // dropped without persist: the larger candidate disappears
        }

        assert_eq!(std_fs::read(&dest).unwrap().len(), 100);
        assert_eq!(std_fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.0 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
