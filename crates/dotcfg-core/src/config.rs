use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path as FsPath, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::copy::deep_copy;
use crate::error::{ConfigError, Result};
use crate::model::Node;
use crate::path::Path;
use crate::{edit, flatten, json};

/// A config tree plus the file it persists to.
///
/// All mutation happens in memory; nothing reaches disk until [`Config::save`].
/// A `Config` is meant for one caller at a time and does no locking.
///
/// ```
/// use dotcfg_core::{Composite, Config, Node};
///
/// let mut cfg = Config::new(
///     Composite::new()
///         .field("Name", Node::string(""))
///         .field("AnInt", Node::int(0)),
/// );
/// cfg.set("AnInt", "42").unwrap();
/// assert_eq!(cfg.get("AnInt").unwrap(), "42");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    root: Node,
    file: Option<PathBuf>,
}

impl Config {
    pub fn new(root: impl Into<Node>) -> Self {
        Self {
            root: root.into(),
            file: None,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Direct access to the tree, bypassing path addressing.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn get(&self, path: &str) -> Result<String> {
        let path = Path::parse(path)?;
        edit::get_by_path(&self.root, &path)
    }

    /// Assigns `value` at `path`; an empty `value` on a map entry or sequence
    /// element deletes it. Either the whole change applies or none of it does.
    pub fn set(&mut self, path: &str, value: &str) -> Result<()> {
        let path = Path::parse(path)?;
        edit::set_by_path(&mut self.root, &path, value)?;
        debug!(%path, "set");
        Ok(())
    }

    /// Non-empty leaf values keyed by path.
    pub fn list(&self) -> BTreeMap<String, String> {
        flatten::list(&self.root)
    }

    pub fn keys(&self) -> Vec<String> {
        flatten::keys(&self.root)
    }

    pub fn dump(&self) -> Result<String> {
        json::to_pretty_string(&self.root)
    }

    /// Independent copy of the current tree.
    pub fn snapshot(&self) -> Node {
        deep_copy(&self.root)
    }

    pub fn restore(&mut self, snapshot: Node) {
        self.root = snapshot;
    }

    /// Deserializes the current tree into a caller-defined serde type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::to_value(&self.root)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn file(&self) -> Option<&FsPath> {
        self.file.as_deref()
    }

    /// Binds the backing file and loads it right away if it exists. A missing
    /// file is fine; the first save creates it.
    pub fn set_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let exists = path.exists();
        info!(path = %path.display(), exists, "binding config file");
        self.file = Some(path);
        if exists {
            self.load()?;
        }
        Ok(())
    }

    /// Replaces the tree with the bound file's contents, merged onto the
    /// current shape. On any error the tree is left as it was.
    pub fn load(&mut self) -> Result<()> {
        let path = self.file.as_ref().ok_or(ConfigError::NoFileBound)?;
        let data = fs::read(path).map_err(|source| ConfigError::FileRead {
            path: path.clone(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_slice(&data).map_err(|e| ConfigError::StructuralParse {
                location: path.display().to_string(),
                message: e.to_string(),
            })?;
        let mut staged = deep_copy(&self.root);
        json::merge(&mut staged, &value)?;
        self.root = staged;
        info!(path = %path.display(), "loaded config");
        Ok(())
    }

    /// Writes the pretty JSON form to the bound file, readable by the owner only.
    /// The write goes through a sibling temp file and a rename.
    pub fn save(&self) -> Result<()> {
        let path = self.file.as_ref().ok_or(ConfigError::MissingFile)?;
        let data = self.dump()?;
        write_private(path, data.as_bytes()).map_err(|source| ConfigError::FileWrite {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = data.len(), "saved config");
        Ok(())
    }
}

fn write_private(path: &FsPath, data: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    let result = write_then_rename(&tmp, path, data);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(tmp: &FsPath, path: &FsPath, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    {
        let mut file = options.open(tmp)?;
        // `mode` only applies on creation; a leftover temp file keeps its bits.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(tmp, path)
}
