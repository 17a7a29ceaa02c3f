//! Named-profile persistence.
//!
//! The profile document is a YAML mapping from provider name to provider
//! config. Entries other than the one being written keep their source text,
//! so rewriting the document does not disturb them.

use crate::error::{Error, Result};
use crate::provider::ProviderConfig;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the profile document inside the config root.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// In-memory profile document.
///
/// Keeps the text it was parsed from. Writing an entry splices only that
/// entry's top-level block, so the other entries keep their comments and
/// quoting. Text that cannot be spliced safely falls back to a canonical
/// re-serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDocument {
    entries: Mapping,
    source: Option<String>,
}

impl ProfileDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document. Empty input is an empty document.
    ///
    /// Scalar keys are normalized to strings, so `456:` and `'456':` name the
    /// same provider.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let entries = parse_entries(content)?;
        Ok(Self {
            entries,
            source: Some(content.to_string()),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        match &self.source {
            Some(source) => Ok(source.clone()),
            None => Ok(serde_yaml::to_string(&self.entries)?),
        }
    }

    /// Insert or replace the entry keyed by `config.provider_name`.
    pub fn set(&mut self, config: &ProviderConfig) -> Result<()> {
        let key = Value::String(config.provider_name.clone());
        let value = serde_yaml::to_value(config)?;

        let mut single = Mapping::new();
        single.insert(key.clone(), value.clone());
        let block = serde_yaml::to_string(&single)?;

        self.entries.insert(key, value);

        let spliced = self
            .source
            .as_deref()
            .and_then(|source| splice_entry(source, &config.provider_name, &block))
            .filter(|text| parse_entries(text).is_ok_and(|parsed| parsed == self.entries));
        if self.source.is_some() && spliced.is_none() {
            debug!(provider = %config.provider_name, "Rewriting config in canonical form");
        }
        self.source = spliced;
        Ok(())
    }

    /// Decode one entry.
    pub fn get(&self, name: &str) -> Result<Option<ProviderConfig>> {
        let Some(value) = self.entries.get(name) else {
            return Ok(None);
        };
        let mut config: ProviderConfig = serde_yaml::from_value(value.clone())?;
        config.provider_name = name.to_string();
        Ok(Some(config))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all entries, in document order.
    pub fn provider_names(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter_map(|key| key.as_str().map(str::to_string))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(content: &str) -> std::result::Result<Mapping, String> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let raw = match serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())? {
        Value::Null => return Ok(Mapping::new()),
        Value::Mapping(raw) => raw,
        _ => return Err("top level must be a mapping of provider names".to_string()),
    };

    let mut entries = Mapping::new();
    for (key, value) in raw {
        let name = scalar_key(&key)
            .ok_or_else(|| format!("provider name must be a scalar, got {:?}", key))?;
        if entries.insert(Value::String(name.clone()), value).is_some() {
            warn!(provider = %name, "Duplicate provider name, keeping the last entry");
        }
    }
    Ok(entries)
}

fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Replace the top-level block for `name` in `source` with `block`, or append
/// `block` when there is none. Returns `None` when the text is not a plain
/// block mapping this can edit safely.
fn splice_entry(source: &str, name: &str, block: &str) -> Option<String> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    if lines
        .iter()
        .any(|line| line.starts_with("---") || line.starts_with("...") || line.starts_with('%'))
    {
        return None;
    }

    // Column-0 `- ` lines are sequence items of the entry above them.
    let is_top_level = |line: &str| {
        !line.trim().is_empty() && !line.starts_with([' ', '\t', '#']) && !line.starts_with("- ")
    };
    let starts: Vec<usize> = (0..lines.len()).filter(|&i| is_top_level(lines[i])).collect();

    let mut matches = starts
        .iter()
        .copied()
        .filter(|&i| top_level_key(lines[i]).as_deref() == Some(name));
    let Some(start) = matches.next() else {
        let mut out = source.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(block);
        return Some(out);
    };
    if matches.next().is_some() {
        return None;
    }

    let next = starts
        .iter()
        .copied()
        .find(|&i| i > start)
        .unwrap_or(lines.len());
    // Blank lines and column-0 comments before the next key stay with the next key.
    let mut end = next;
    while end > start + 1 && (lines[end - 1].trim().is_empty() || lines[end - 1].starts_with('#')) {
        end -= 1;
    }

    let mut out = String::with_capacity(source.len() + block.len());
    lines[..start].iter().for_each(|line| out.push_str(line));
    out.push_str(block);
    lines[end..].iter().for_each(|line| out.push_str(line));
    Some(out)
}

fn top_level_key(line: &str) -> Option<String> {
    match serde_yaml::from_str::<Value>(line).ok()? {
        Value::Mapping(mapping) if mapping.len() == 1 => {
            mapping.keys().next().and_then(scalar_key)
        }
        _ => None,
    }
}

/// Owns the profile document at a fixed path for the duration of a session.
pub struct ProfileStore {
    path: PathBuf,
    document: ProfileDocument,
}

impl ProfileStore {
    /// Open the store under `config_root`, loading any existing document.
    pub fn open(config_root: impl AsRef<Path>) -> Result<Self> {
        let path = config_root.as_ref().join(CONFIG_FILE_NAME);
        let document = Self::load(&path)?;
        Ok(Self { path, document })
    }

    /// Read the document at `path`. A missing file is an empty document.
    pub fn load(path: &Path) -> Result<ProfileDocument> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file yet");
                return Ok(ProfileDocument::default());
            }
            Err(err) => {
                return Err(Error::Document {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
            }
        };

        ProfileDocument::parse(&content).map_err(|message| Error::Document {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document file is currently on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    /// Insert or replace an entry in memory. Nothing is written until [`persist`](Self::persist).
    pub fn set(&mut self, config: &ProviderConfig) -> Result<()> {
        self.document.set(config)
    }

    pub fn get(&self, name: &str) -> Result<ProviderConfig> {
        self.document
            .get(name)?
            .ok_or_else(|| Error::ProviderNotFound(name.to_string()))
    }

    /// Write the whole document, replacing the previous file atomically.
    pub fn persist(&self) -> Result<()> {
        let content = self.document.to_yaml()?;
        write_atomic(&self.path, content.as_bytes()).map_err(|source| Error::Persistence {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), providers = self.document.len(), "Saved config");
        Ok(())
    }
}

/// Write to a temp file beside `path`, then rename over it.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    create_config_dir(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn create_config_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}
