// Copyright (C) Brian G. Milnes 2025

//! Common test utilities for integration tests

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch source tree in a temporary directory
pub struct TestTree {
    pub dir: TempDir,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        Ok(TestTree {
            dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).context(format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path(rel);
        fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))
    }

    /// Names of all entries in a directory, sorted
    pub fn entries(&self, rel: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(self.path(rel))?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<_, _>>()?;
        names.sort();
        Ok(names)
    }
}
