//! Flag catalogue.
//!
//! Flags are named, ordered color lists. The catalogue maps flag names to
//! flags and aliases to flag names. A built-in catalogue is embedded in the
//! binary; further catalogues in the same TOML format can be merged on top.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Deserialize;

use crate::color::{Color, parse_color};

/// TOML source of the built-in catalogue.
const BUILTIN: &str = include_str!("flags.toml");

/// Environment variable naming an extra catalogue file.
pub const CATALOGUE_ENV: &str = "PRIDECAT_CATALOGUE";

/// Name of the flag used when none is selected.
pub const DEFAULT_FLAG: &str = "lgbt";

/// A named, ordered sequence of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    /// Canonical name, selected with `--<name>`.
    pub name: String,
    /// Colors in stripe order, never empty.
    pub colors: Vec<Color>,
    /// Human readable description shown by `--help`.
    pub description: String,
}

/// On-disk layout of a catalogue.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogueFile {
    #[serde(default)]
    flags: BTreeMap<String, FlagEntry>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlagEntry {
    description: String,
    colors: Vec<String>,
}

/// Read-only lookup of flags by name or alias.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    flags: BTreeMap<String, Flag>,
    aliases: BTreeMap<String, String>,
}

impl Catalogue {
    /// The catalogue compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN).context("Invalid built-in flag catalogue")
    }

    /// The built-in catalogue, with the file named by `PRIDECAT_CATALOGUE`
    /// merged on top when that variable is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the extra catalogue cannot be loaded or merged.
    pub fn from_environment() -> Result<Self> {
        let mut catalogue = Self::builtin()?;
        if let Some(path) = env::var_os(CATALOGUE_ENV) {
            debug!("merging flag catalogue {}", Path::new(&path).display());
            catalogue.merge(Self::load(Path::new(&path))?)?;
        }
        Ok(catalogue)
    }

    /// Load a catalogue from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalogue.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read flag catalogue {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid flag catalogue {}", path.display()))
    }

    /// Parse a catalogue from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse, a color is invalid,
    /// a flag has no colors or an alias points at an unknown flag.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: CatalogueFile = toml::from_str(text).context("Failed to parse TOML")?;

        let mut flags = BTreeMap::new();
        for (name, entry) in file.flags {
            let colors = entry
                .colors
                .iter()
                .map(|color| parse_color(color))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Invalid color in flag '{name}'"))?;
            flags.insert(
                name.clone(),
                Flag {
                    name,
                    colors,
                    description: entry.description,
                },
            );
        }

        let catalogue = Self {
            flags,
            aliases: file.aliases,
        };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Merge `other` on top of this catalogue.
    ///
    /// Flags of `other` replace flags of the same name, and an alias of this
    /// catalogue is dropped when `other` defines a flag with that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged catalogue is inconsistent; this
    /// catalogue is then left unchanged.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        let mut merged = self.clone();
        for (name, flag) in other.flags {
            merged.aliases.remove(&name);
            merged.flags.insert(name, flag);
        }
        merged.aliases.extend(other.aliases);
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    /// Look up a flag by canonical name or alias.
    #[must_use]
    pub fn resolve(&self, ident: &str) -> Option<&Flag> {
        let name = self.aliases.get(ident).map_or(ident, String::as_str);
        self.flags.get(name)
    }

    /// Look up a flag by canonical name only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// All flags, ordered by name.
    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Aliases resolving to the flag `name`, ordered by alias.
    pub fn aliases_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.aliases
            .iter()
            .filter(move |&(_, target)| target == name)
            .map(|(alias, _)| alias.as_str())
    }

    fn validate(&self) -> Result<()> {
        if let Some(flag) = self.flags.values().find(|flag| flag.colors.is_empty()) {
            return Err(anyhow!("Flag '{}' has no colors", flag.name));
        }
        if let Some((alias, target)) = self
            .aliases
            .iter()
            .find(|&(_, target)| !self.flags.contains_key(target))
        {
            return Err(anyhow!("Alias '{alias}' points at unknown flag '{target}'"));
        }
        // aliases resolve first, so an alias named like a flag would hide it
        if let Some(alias) = self.aliases.keys().find(|alias| self.flags.contains_key(*alias)) {
            return Err(anyhow!("Alias '{alias}' shadows the flag of the same name"));
        }
        Ok(())
    }
}
