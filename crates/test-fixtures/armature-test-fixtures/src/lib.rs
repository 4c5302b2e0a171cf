//! JSON fixtures shared by the armature crates' tests and benches.
//!
//! `fixtures/manifest.json` at the workspace root maps fixture names to
//! files, grouped into animations and skeletons.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: BTreeMap<String, String>,
    skeletons: BTreeMap<String, String>,
}

#[derive(Clone, Copy)]
enum Section {
    Animations,
    Skeletons,
}

impl Section {
    fn entries(self) -> &'static BTreeMap<String, String> {
        match self {
            Section::Animations => &MANIFEST.animations,
            Section::Skeletons => &MANIFEST.skeletons,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::Animations => "animation",
            Section::Skeletons => "skeleton",
        }
    }

    fn keys(self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("unknown {} fixture '{name}'", self.label()))?;
        Ok(fixtures_root().join(rel))
    }

    fn json(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read fixture at {}", path.display()))
    }

    fn load<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {} fixture '{name}'", self.label()))
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

pub mod animations {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::Animations.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Section::Animations.json(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Section::Animations.load(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Section::Animations.path(name)
    }
}

pub mod skeletons {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::Skeletons.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Section::Skeletons.json(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Section::Skeletons.load(name)
    }
}
