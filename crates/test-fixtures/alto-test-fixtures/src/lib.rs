//! Page fixtures shared by the motion crates' tests.
//!
//! Each page is a node tree mirroring the marked markup of the landing site,
//! with measured rects so scroll triggers can be exercised without a browser.

use std::collections::HashMap;
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
    pages: HashMap<String, PageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        viewport: Option<f32>,
    },
}

impl PageEntry {
    fn as_path(&self) -> &str {
        match self {
            PageEntry::Path(path) => path,
            PageEntry::Detailed { path, .. } => path,
        }
    }

    fn viewport(&self) -> Option<f32> {
        match self {
            PageEntry::Path(_) => None,
            PageEntry::Detailed { viewport, .. } => *viewport,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod pages {
    use super::*;

    /// Viewport height used when a page entry does not declare one.
    pub const DEFAULT_VIEWPORT: f32 = 900.0;

    pub fn keys() -> Vec<String> {
        MANIFEST.pages.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.pages, "page", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.pages, "page", name)?;
        super::load_json(entry.as_path())
    }

    pub fn viewport_height(name: &str) -> Result<f32> {
        let entry = lookup(&MANIFEST.pages, "page", name)?;
        Ok(entry.viewport().unwrap_or(DEFAULT_VIEWPORT))
    }
}
