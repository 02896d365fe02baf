//! # Platform-specific utilities
//!
//! Questo modulo centralizza la gestione cross-platform dei comandi esterni
//! (ffmpeg, cwebp) e il caching della loro disponibilità: ogni tool viene
//! sondato al massimo una volta per run, così un encoder mancante non viene
//! ricontrollato per ogni singolo file.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Platform-specific command manager with cached availability probes
pub struct PlatformCommands {
    commands: HashMap<&'static str, &'static str>,
    which_command: &'static str,
    availability: Mutex<HashMap<&'static str, bool>>,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn new() -> Self {
        let (commands, which_command) = if cfg!(windows) {
            let mut commands = HashMap::new();
            commands.insert("ffmpeg", "ffmpeg.exe");
            commands.insert("cwebp", "cwebp.exe");
            (commands, "where")
        } else {
            let mut commands = HashMap::new();
            commands.insert("ffmpeg", "ffmpeg");
            commands.insert("cwebp", "cwebp");
            (commands, "which")
        };

        Self {
            commands,
            which_command,
            availability: Mutex::new(HashMap::new()),
        }
    }

    /// Get the platform-specific command name
    pub fn get_command(&self, base_name: &'static str) -> &'static str {
        self.commands.get(base_name).copied().unwrap_or(base_name)
    }

    /// Check if a command is available, probing the system at most once per
    /// tool for the lifetime of the process.
    pub async fn is_command_available(&self, base_name: &'static str) -> bool {
        if let Some(&known) = self.availability.lock().unwrap().get(base_name) {
            return known;
        }

        let command_name = self.get_command(base_name);
        let result = tokio::process::Command::new(self.which_command)
            .arg(command_name)
            .output()
            .await;

        let available = match result {
            Ok(output) => output.status.success(),
            Err(_) => false,
        };

        self.availability
            .lock()
            .unwrap()
            .insert(base_name, available);
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_commands() {
        let platform = PlatformCommands::instance();

        let ffmpeg = platform.get_command("ffmpeg");
        assert!(!ffmpeg.is_empty());
        // unknown tools fall through to their own name
        assert_eq!(platform.get_command("frobnicate"), "frobnicate");
    }

    #[tokio::test]
    async fn test_probe_is_cached() {
        let platform = PlatformCommands::instance();

        let first = platform.is_command_available("cwebp").await;
        let second = platform.is_command_available("cwebp").await;
        assert_eq!(first, second);
        assert!(platform
            .availability
            .lock()
            .unwrap()
            .contains_key("cwebp"));
    }
}
