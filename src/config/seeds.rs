use crate::config::types::Config;
use crate::ConfigError;
use std::path::Path;

/// Parses seed URLs from seed-file content
///
/// One URL per line. Lines are trimmed; blank lines and lines starting with
/// `#` are skipped. Seeds are returned in file order and are not validated
/// here.
pub fn parse_seeds(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Loads seed URLs from a file
///
/// # Arguments
///
/// * `path` - Path to the seed file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The seed URLs in file order
/// * `Err(ConfigError)` - The file could not be read
pub fn load_seeds(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let seeds = parse_seeds(&content);
    tracing::info!("Loaded {} seed URLs from {}", seeds.len(), path.display());
    Ok(seeds)
}

impl Config {
    /// Collects all configured seeds: the seed file first, then inline URLs
    pub fn seed_urls(&self) -> Result<Vec<String>, ConfigError> {
        let mut seeds = match &self.seeds.file {
            Some(file) => load_seeds(Path::new(file))?,
            None => Vec::new(),
        };
        seeds.extend(self.seeds.urls.iter().cloned());
        Ok(seeds)
    }
}
