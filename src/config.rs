/*! Run configuration.

The configuration is a JSON file. Keys keep the names used by the rest of the corpus tooling
(`wikiFolder`, `outputFolder`, `useOnlyAbstract`…).

```json
{
    "wikiFolder": "/data/wiki/extracted",
    "outputFolder": "/data/wiki/wsd",
    "python_path": "/usr/bin/python3",
    "script": "disambiguate.py",
    "data_path": "/data/wsd/data",
    "weights": ["/data/wsd/model_weights_wsd0"],
    "concurrent_threads": 8,
    "batch_size": 100,
    "useOnlyAbstract": false,
    "excludeWrite": false,
    "useCompression": true
}
```
!*/
use std::{fs::File, io::BufReader, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::processing::SENTENCE_THRESHOLD;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// How input paths are distributed among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheduling {
    /// Workers claim files one at a time from a shared bounded queue.
    #[default]
    Queue,
    /// Paths are split once into contiguous chunks, one per worker.
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the input archives, searched recursively.
    #[serde(rename = "wikiFolder")]
    pub wiki_folder: PathBuf,

    /// Root of the mirrored output tree.
    #[serde(rename = "outputFolder")]
    pub output_folder: PathBuf,

    /// Disambiguator executable. Batches are written without disambiguation if unset.
    #[serde(default)]
    pub python_path: Option<PathBuf>,

    /// Script passed as first argument to `python_path`.
    #[serde(default)]
    pub script: Option<PathBuf>,

    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Model weights, either a single path or a list of paths.
    #[serde(default, deserialize_with = "one_or_many")]
    pub weights: Vec<String>,

    #[serde(default = "default_threads")]
    pub concurrent_threads: usize,

    /// Maximum number of sentences sent at once to the disambiguator.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(rename = "useOnlyAbstract", default)]
    pub use_only_abstract: bool,

    /// Process everything but do not write any output.
    #[serde(rename = "excludeWrite", default)]
    pub exclude_write: bool,

    /// Compress output files with the format of their input archive.
    #[serde(rename = "useCompression", default)]
    pub use_compression: bool,

    /// Only files with this extension are processed.
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    #[serde(default = "default_sentence_threshold")]
    pub sentence_threshold: usize,

    #[serde(default)]
    pub scheduling: Scheduling,

    /// Global processing time limit, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_threads() -> usize {
    1
}

fn default_batch_size() -> usize {
    100
}

fn default_archive_extension() -> String {
    "bz2".to_string()
}

fn default_sentence_threshold() -> usize {
    SENTENCE_THRESHOLD
}

fn default_timeout_secs() -> u64 {
    // 10 days
    10 * 24 * 3600
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(w) => vec![w],
        OneOrMany::Many(ws) => ws,
    })
}

impl Config {
    /// Load and validate the configuration file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let f = File::open(path)
            .map_err(|e| Error::Config(format!("could not open {:?}: {}", path, e)))?;
        let config: Config = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| Error::Config(format!("could not parse {:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that can't be checked by deserialization.
    pub fn validate(&self) -> Result<(), Error> {
        if self.concurrent_threads == 0 {
            return Err(Error::Config(
                "concurrent_threads must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if self.sentence_threshold == 0 {
            return Err(Error::Config(
                "sentence_threshold must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Minimal configuration with default values.
    pub fn new(wiki_folder: PathBuf, output_folder: PathBuf) -> Self {
        Self {
            wiki_folder,
            output_folder,
            python_path: None,
            script: None,
            data_path: None,
            weights: Vec::new(),
            concurrent_threads: default_threads(),
            batch_size: default_batch_size(),
            use_only_abstract: false,
            exclude_write: false,
            use_compression: false,
            archive_extension: default_archive_extension(),
            sentence_threshold: default_sentence_threshold(),
            scheduling: Scheduling::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn defaults() {
        let config: Config =
            serde_json::from_str(r#"{"wikiFolder": "wiki", "outputFolder": "out"}"#).unwrap();

        assert_eq!(config.concurrent_threads, 1);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.sentence_threshold, 150);
        assert_eq!(config.archive_extension, "bz2");
        assert_eq!(config.scheduling, Scheduling::Queue);
        assert_eq!(config.timeout(), Duration::from_secs(864_000));
        assert!(config.python_path.is_none());
        assert!(config.weights.is_empty());
        assert!(!config.use_only_abstract && !config.exclude_write && !config.use_compression);
    }

    #[test]
    fn full() {
        let config: Config = serde_json::from_str(
            r#"{
                "wikiFolder": "wiki",
                "outputFolder": "out",
                "python_path": "/usr/bin/python3",
                "data_path": "data",
                "weights": "model_weights",
                "concurrent_threads": 8,
                "batch_size": 10,
                "useOnlyAbstract": true,
                "excludeWrite": true,
                "useCompression": true,
                "scheduling": "static"
            }"#,
        )
        .unwrap();

        assert_eq!(config.weights, vec!["model_weights"]);
        assert_eq!(config.concurrent_threads, 8);
        assert!(config.use_only_abstract && config.exclude_write && config.use_compression);
        assert_eq!(config.scheduling, Scheduling::Static);
    }

    #[test]
    fn from_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"wikiFolder": "wiki", "outputFolder": "out", "weights": ["a", "b"]}}"#
        )
        .unwrap();

        let config = Config::from_path(f.path()).unwrap();
        assert_eq!(config.weights, vec!["a", "b"]);
    }

    #[test]
    fn invalid() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"wikiFolder": "wiki", "outputFolder": "out", "concurrent_threads": 0}}"#
        )
        .unwrap();
        assert!(matches!(Config::from_path(f.path()), Err(Error::Config(_))));

        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"outputFolder": "out"}}"#).unwrap();
        assert!(matches!(Config::from_path(f.path()), Err(Error::Config(_))));

        assert!(matches!(
            Config::from_path(Path::new("no/such/config.json")),
            Err(Error::Config(_))
        ));
    }
}
