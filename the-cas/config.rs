//! TOML type system descriptions.
//!
//! ```toml
//! [[types]]
//! name = "demo.Token"
//! supertype = "uima.tcas.Annotation"   # optional, this is the default
//! description = "A word or punctuation mark"
//!
//! [priorities]
//! order = ["demo.Sentence", "demo.Token"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::types::{
  ANNOTATION,
  TypeSystemError,
  TypeTree,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSystemDescription {
  #[serde(default)]
  pub types:      Vec<TypeDescription>,
  #[serde(default)]
  pub priorities: PriorityList,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDescription {
  pub name:        String,
  #[serde(default = "default_supertype")]
  pub supertype:   String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorityList {
  #[serde(default)]
  pub order: Vec<String>,
}

fn default_supertype() -> String {
  ANNOTATION.to_string()
}

impl TypeSystemDescription {
  pub fn from_toml_str(contents: &str) -> Result<Self, TypeSystemError> {
    Ok(toml::from_str(contents)?)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TypeSystemError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_toml_str(&contents)
  }
}

impl TypeTree {
  pub fn from_description(description: TypeSystemDescription) -> Result<Self, TypeSystemError> {
    description
      .types
      .into_iter()
      .fold(TypeTree::builder(), |builder, ty| {
        builder.declare_with_description(ty.name, ty.supertype, ty.description)
      })
      .priorities(description.priorities.order)
      .build()
  }

  pub fn from_toml_str(contents: &str) -> Result<Self, TypeSystemError> {
    Self::from_description(TypeSystemDescription::from_toml_str(contents)?)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TypeSystemError> {
    Self::from_description(TypeSystemDescription::from_path(path)?)
  }
}
