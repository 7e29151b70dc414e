use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{ConfigError, Environment, Predicate, Result};

/// A top-level element of a roslaunch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchEntry {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

impl LaunchEntry {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Parsed `if` guard, if the entry has one.
    pub fn guard(&self) -> Result<Option<Predicate>> {
        self.attribute("if").map(Predicate::from_attribute).transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDescription {
    path: PathBuf,
    entries: Vec<LaunchEntry>,
}

impl LaunchDescription {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    /// Parses launch XML. `path` is only used in error messages.
    pub fn parse(path: impl AsRef<Path>, xml: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut depth = 0_usize;
        let mut entries = Vec::new();
        loop {
            match reader.read_event().map_err(|error| xml_error(path, error))? {
                Event::Start(element) => {
                    if depth == 1 {
                        entries.push(read_entry(&reader, &element, path)?);
                    }
                    depth += 1;
                }
                Event::Empty(element) => {
                    if depth == 1 {
                        entries.push(read_entry(&reader, &element, path)?);
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LaunchEntry] {
        &self.entries
    }

    /// First guarded entry accepted by `filter` whose guard holds in `environment`.
    /// Entries without an `if` guard are never selected.
    pub fn first_match(
        &self,
        environment: &Environment,
        filter: impl Fn(&LaunchEntry) -> bool,
    ) -> Result<Option<&LaunchEntry>> {
        for entry in self.entries.iter().filter(|entry| filter(entry)) {
            let Some(guard) = entry.guard()? else {
                continue;
            };
            if guard.evaluate(environment)? {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

fn read_entry(reader: &Reader<&[u8]>, element: &BytesStart<'_>, path: &Path) -> Result<LaunchEntry> {
    let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let mut attributes = BTreeMap::new();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|error| xml_error(path, error))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(|error| xml_error(path, error))?;
        attributes.insert(key, value.into_owned());
    }
    Ok(LaunchEntry { tag, attributes })
}

fn xml_error(path: &Path, error: impl Display) -> ConfigError {
    ConfigError::Xml {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
