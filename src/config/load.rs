use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::QuiltConfig;

/// A parsed config file together with the directory it was read from.
///
/// Relative paths inside the config are resolved against `config_dir`.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: QuiltConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: QuiltConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Expand the configured inputs into concrete paths.
    ///
    /// Glob matches are sorted so repeated runs add sprites in the same
    /// order; literal paths are kept as written.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            let full = self.config_dir.join(pattern);

            if !is_glob_pattern(pattern) {
                results.push(full);
                continue;
            }

            let mut matches = glob::glob(&full.to_string_lossy())
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("failed to read glob entry: {}", pattern))?;
            matches.sort();
            results.extend(matches);
        }

        Ok(results)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("sprites/**/*.png"));
        assert!(is_glob_pattern("sprite?.png"));
        assert!(is_glob_pattern("sprite[0-9].png"));
        assert!(!is_glob_pattern("sprite.png"));
        assert!(!is_glob_pattern("sprites/hero.png"));
    }

    #[test]
    fn test_load_resolves_relative_to_config() {
        let dir = std::env::temp_dir().join(format!("quilt-config-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("art")).unwrap();
        std::fs::write(dir.join("art").join("b.png"), b"").unwrap();
        std::fs::write(dir.join("art").join("a.png"), b"").unwrap();
        let config_path = dir.join("atlas.quilt");
        std::fs::write(
            &config_path,
            r#"{ "input": ["art/*.png", "extra/hero.png"], "output_dir": "out", "size": 256 }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&config_path).unwrap();
        let inputs = loaded.resolve_inputs().unwrap();

        assert_eq!(loaded.config.size, 256);
        assert_eq!(
            inputs,
            vec![
                dir.join("art").join("a.png"),
                dir.join("art").join("b.png"),
                dir.join("extra/hero.png"),
            ]
        );
        assert_eq!(loaded.resolve_output_dir(), dir.join("out"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let path = std::env::temp_dir().join(format!("quilt-bad-{}.quilt", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = LoadedConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
        let _ = std::fs::remove_file(&path);
    }
}
