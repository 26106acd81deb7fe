//! Fixtures
//!
//! YAML-backed sample catalogs for tests and demos that should not depend on
//! a running menu service.

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::menu::MenuItem;

/// Fixture parsing errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

#[derive(Debug, Deserialize)]
struct MenuFixture {
    menu: Vec<MenuItem>,
}

/// Load a menu catalog from a YAML fixture file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_menu(path: impl AsRef<Path>) -> Result<Vec<MenuItem>, FixtureError> {
    let contents = fs::read_to_string(path)?;
    let fixture: MenuFixture = serde_norway::from_str(&contents)?;

    Ok(fixture.menu)
}

/// The built-in sample catalog.
///
/// # Errors
///
/// Returns an error if the embedded fixture fails to parse.
pub fn sample_menu() -> Result<Vec<MenuItem>, FixtureError> {
    let fixture: MenuFixture = serde_norway::from_str(include_str!("../fixtures/menu.yaml"))?;

    Ok(fixture.menu)
}
