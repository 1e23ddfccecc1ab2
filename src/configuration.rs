//! Defines a struct that holds the tunable numerical settings of atomspec.

use crate::error::Result;
use crate::maths::SecantOptions;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AtomSpecConfiguration {
    /// Settings of the secant search used for magic wavelengths.
    pub root_finding: SecantOptions,
}

impl AtomSpecConfiguration {
    /// Reads a configuration from YAML. Missing fields take their default values.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        AtomSpecConfiguration::from_yaml_str(&contents)
    }
}
