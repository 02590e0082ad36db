//! The tools catalog: every action name and its argument schema.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canonical::ArgKind;

use super::DatasetError;

/// One declared input argument of a tool action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    pub kind: ArgKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub input_args: Vec<ArgSpec>,
}

/// Catalog of tool actions, keyed by action name.
///
/// Embedded in the dataset under `actions_catalog`, or loadable from a
/// standalone `tools_description.json` with the same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolsCatalog {
    actions: BTreeMap<String, ToolSpec>,
}

impl ToolsCatalog {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub fn contains(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Declared arguments, in call order.
    pub fn input_args(&self, action: &str) -> Option<&[ArgSpec]> {
        self.actions.get(action).map(|spec| spec.input_args.as_slice())
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
