//! # Interactive Prompt Module
//!
//! Domande su stdin per i parametri non fissati da flag CLI: conferma,
//! intensità di compressione, formato di conversione GIF, riscrittura dei
//! riferimenti. Ogni prompt rilegge finché l'input non è valido.

use crate::config::GifTarget;
use crate::params::Intensity;
use anyhow::Result;
use std::io::{self, BufRead, Write};

fn read_line(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Yes/no confirmation; anything other than `y`/`Y` is a no
pub fn confirm(question: &str) -> Result<bool> {
    let answer = read_line(&format!("{} (y/n): ", question))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

/// Ask for the compression intensity until a valid 1-5 value is entered
pub fn ask_intensity() -> Result<Intensity> {
    loop {
        let answer = read_line("Enter compression intensity (1-5): ")?;
        if let Ok(level) = answer.parse::<u8>() {
            if let Ok(intensity) = Intensity::new(level) {
                return Ok(intensity);
            }
        }
        println!("Enter a number between 1 and 5.");
    }
}

/// Ask what to do with heavy GIFs
pub fn ask_gif_target() -> Result<GifTarget> {
    println!();
    println!("Convert GIFs to:");
    println!(" 1) MP4");
    println!(" 2) WebM");
    println!(" 3) Skip");
    loop {
        let answer = read_line("Select [1/2/3]: ")?;
        match answer.as_str() {
            "1" => return Ok(GifTarget::Mp4),
            "2" => return Ok(GifTarget::Webm),
            "3" => return Ok(GifTarget::Skip),
            _ => println!("Enter 1, 2 or 3."),
        }
    }
}
