//! # Reference Rewriting Module
//!
//! Dopo una conversione GIF il file cambia nome (`loop.gif` -> `loop.mp4`),
//! quindi i riferimenti testuali del sito vanno aggiornati. Questo modulo
//! riscrive i basename vecchi con quelli nuovi in ogni `.html`/`.js`/`.css`
//! sotto la base, con lo stesso pruning delle directory escluse usato dalla
//! scansione media. File non UTF-8 o illeggibili vengono saltati.

use crate::file_manager::FileManager;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rewrite textual references according to an old-path -> new-path mapping.
/// Only basenames are replaced, matching how site assets are referenced.
/// Returns the list of files actually modified.
pub async fn rewrite_references(
    base: &Path,
    mapping: &HashMap<PathBuf, PathBuf>,
) -> Result<Vec<PathBuf>> {
    let by_name: Vec<(String, String)> = mapping
        .iter()
        .filter_map(|(old, new)| {
            let old_name = old.file_name()?.to_str()?.to_string();
            let new_name = new.file_name()?.to_str()?.to_string();
            Some((old_name, new_name))
        })
        .collect();

    let mut modified = Vec::new();
    if by_name.is_empty() {
        return Ok(modified);
    }

    for file in FileManager::find_text_files(base)? {
        let data = match tokio::fs::read_to_string(&file).await {
            Ok(data) => data,
            Err(_) => continue,
        };

        let mut updated = data.clone();
        for (old_name, new_name) in &by_name {
            updated = updated.replace(old_name.as_str(), new_name.as_str());
        }

        if updated != data {
            tokio::fs::write(&file, updated).await?;
            debug!("Updated references in {}", file.display());
            modified.push(file);
        }
    }

    Ok(modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rewrites_basenames_in_text_files() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::write(
            base.join("index.html"),
            "<img src=\"media/loop.gif\"> <a href=\"loop.gif\">",
        )
        .unwrap();
        fs::write(base.join("style.css"), "body { color: red; }").unwrap();

        let mut mapping = HashMap::new();
        mapping.insert(
            PathBuf::from("/site/media/loop.gif"),
            PathBuf::from("/site/media/loop.mp4"),
        );

        let modified = rewrite_references(base, &mapping).await.unwrap();

        assert_eq!(modified.len(), 1);
        assert!(modified[0].ends_with("index.html"));
        let html = fs::read_to_string(base.join("index.html")).unwrap();
        assert_eq!(html, "<img src=\"media/loop.mp4\"> <a href=\"loop.mp4\">");
        // untouched file keeps its content
        let css = fs::read_to_string(base.join("style.css")).unwrap();
        assert_eq!(css, "body { color: red; }");
    }

    #[tokio::test]
    async fn test_empty_mapping_touches_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "loop.gif").unwrap();

        let modified = rewrite_references(temp.path(), &HashMap::new())
            .await
            .unwrap();
        assert!(modified.is_empty());
        assert_eq!(
            fs::read_to_string(temp.path().join("index.html")).unwrap(),
            "loop.gif"
        );
    }
}
