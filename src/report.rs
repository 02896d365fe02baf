//! # Report Rendering Module
//!
//! Stampa il riepilogo pre-run e la tabella finale dei risultati su stdout.
//! In modalità `--json` niente di tutto questo viene emesso: lo stdout
//! appartiene allo stream di eventi di `json_output`.

use crate::config::{Thresholds, BACKUP_DIR};
use crate::file_manager::FileManager;
use crate::media::Analysis;
use crate::policy::TransformOutcome;
use crate::progress::RunTotals;
use std::path::Path;

/// Pre-run analysis summary, shown before asking to proceed
pub fn print_analysis(analysis: &Analysis, thresholds: &Thresholds) {
    println!();
    println!("=== Analysis Summary ===");
    println!("Total media files: {}", analysis.total());
    println!(
        "Images: {:<5} | Heavy: {}",
        analysis.images, analysis.heavy_images
    );
    println!(
        "Videos: {:<5} | Heavy: {}",
        analysis.videos, analysis.heavy_videos
    );
    println!(
        "GIFs:   {:<5} | Heavy: {}",
        analysis.gifs, analysis.heavy_gifs
    );
    println!();
    println!(
        "Heavy thresholds: images >= {}, webp/avif >= {}, gif >= {}, video >= {}",
        FileManager::format_size(thresholds.raster_image_cutoff),
        FileManager::format_size(thresholds.web_image_cutoff),
        FileManager::format_size(thresholds.gif_cutoff),
        FileManager::format_size(thresholds.video_cutoff),
    );
    println!(
        "Ideal targets: images <= {}, videos <= {}",
        FileManager::format_size(thresholds.ideal_image_bytes),
        FileManager::format_size(thresholds.ideal_video_bytes),
    );
    println!();
}

/// Final per-file table, sorted by the caller, paths relative to the base
pub fn print_table(outcomes: &[TransformOutcome], base: &Path) {
    if outcomes.is_empty() {
        return;
    }

    let rows: Vec<[String; 6]> = outcomes
        .iter()
        .map(|o| {
            let rel = o.path.strip_prefix(base).unwrap_or(&o.path);
            [
                rel.display().to_string(),
                o.action.label().to_string(),
                FileManager::format_size(o.original_bytes),
                FileManager::format_size(o.new_bytes),
                format!("{:.1}%", o.reduction_percent()),
                o.note.clone(),
            ]
        })
        .collect();

    let header = ["File", "Action", "Original", "Optimized", "Reduction", "Note"];
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    println!();
    println!("=== Optimization Summary ===");
    print_row(&header.map(String::from), &widths);
    let total_width: usize = widths.iter().sum::<usize>() + (widths.len() - 1) * 2;
    println!("{}", "-".repeat(total_width));
    for row in &rows {
        print_row(row, &widths);
    }
}

fn print_row(cells: &[String; 6], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let pad = widths[i].saturating_sub(cell.chars().count());
        line.push_str(cell);
        line.push_str(&" ".repeat(pad));
        if i + 1 < cells.len() {
            line.push_str("  ");
        }
    }
    println!("{}", line.trim_end());
}

/// Closing totals for the run
pub fn print_run_summary(totals: &RunTotals, text_files_updated: usize, dry_run: bool) {
    println!();
    println!("=== Run Summary ===");
    println!("Total files processed: {}", totals.files_processed);
    println!(
        "Overall reduction: {:.1} % ({} saved)",
        totals.overall_reduction_percent(),
        FileManager::format_size(totals.total_bytes_saved()),
    );
    if dry_run {
        println!("Dry run: no files were modified");
    } else {
        println!("Backups saved in: {}/", BACKUP_DIR);
    }
    println!("Text files updated: {}", text_files_updated);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_print_table_handles_paths_outside_base() {
        // Must not panic when an outcome path does not live under base
        let outcomes = vec![TransformOutcome::compressed(
            PathBuf::from("/elsewhere/a.jpg"),
            1_000,
            500,
            "q=85",
        )];
        print_table(&outcomes, Path::new("/site"));
    }

    #[test]
    fn test_print_empty_table_is_a_noop() {
        print_table(&[], Path::new("/site"));
    }
}
