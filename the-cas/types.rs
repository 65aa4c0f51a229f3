//! Type system: the subsumption oracle used by every span query.
//!
//! Types form a single-inheritance tree rooted at [`TOP`]. A type subsumes
//! itself and all of its (transitive) subtypes. Annotation types are the types
//! subsumed by [`ANNOTATION`].
//!
//! [`TypeSystem`] is the interface the query engine consumes. [`TypeTree`] is
//! the concrete implementation, built with a [`TypeTreeBuilder`] or loaded from
//! a TOML description (see [`crate::config`]).

use std::{
  collections::HashMap,
  fmt,
};

use smallvec::{
  SmallVec,
  smallvec,
};
use thiserror::Error;

pub const TOP: &str = "uima.cas.TOP";
pub const ANNOTATION_BASE: &str = "uima.cas.AnnotationBase";
pub const ANNOTATION: &str = "uima.tcas.Annotation";
pub const DOCUMENT_ANNOTATION: &str = "uima.tcas.DocumentAnnotation";

/// Short names accepted by [`TypeSystem::resolve`] for built-in types.
const BUILTIN_ALIASES: &[(&str, &str)] = &[("TOP", TOP), ("Annotation", ANNOTATION)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
  pub const fn new(id: u32) -> Self {
    Self(id)
  }

  pub const fn get(self) -> u32 {
    self.0
  }

  fn index(self) -> usize {
    self.0 as usize
  }
}

impl fmt::Display for TypeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "type#{}", self.0)
  }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TypeError {
  #[error("undeclared type [{0}]")]
  Undeclared(String),
  #[error("type [{0}] is not an annotation type")]
  NotAnnotationType(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TypeSystemError {
  #[error("type [{0}] is declared more than once")]
  Duplicate(String),
  #[error("type [{name}] extends undeclared type [{supertype}]")]
  UnknownSupertype { name: String, supertype: String },
  #[error("inheritance cycle involving [{0}]")]
  Cycle(String),
  #[error("failed to parse type system description: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("failed to read type system description: {0}")]
  Io(#[from] std::io::Error),
}

/// The subsumption oracle.
pub trait TypeSystem {
  /// `true` if `ty` is `ancestor` or one of its subtypes.
  fn subsumes(&self, ancestor: TypeId, ty: TypeId) -> bool;

  fn type_by_name(&self, name: &str) -> Option<TypeId>;

  /// Name of a declared type, `None` for ids this system does not know.
  fn type_name(&self, ty: TypeId) -> Option<&str>;

  fn top_type(&self) -> TypeId;

  fn annotation_type(&self) -> TypeId;

  /// Engine type priority, lower ranks sort first among equal spans.
  fn priority(&self, _ty: TypeId) -> Option<usize> {
    None
  }

  /// Resolves a full type name, or the short alias of a built-in type.
  fn resolve(&self, name: &str) -> Result<TypeId, TypeError> {
    let full = BUILTIN_ALIASES
      .iter()
      .find_map(|(alias, full)| (*alias == name).then_some(*full))
      .unwrap_or(name);
    self
      .type_by_name(full)
      .ok_or_else(|| TypeError::Undeclared(name.to_string()))
  }

  fn is_annotation_type(&self, ty: TypeId) -> bool {
    self.subsumes(self.annotation_type(), ty)
  }

  /// Fails unless `ty` is declared here and is an annotation type.
  fn check_annotation_type(&self, ty: TypeId) -> Result<(), TypeError> {
    let Some(name) = self.type_name(ty) else {
      return Err(TypeError::Undeclared(ty.to_string()));
    };
    if self.is_annotation_type(ty) {
      Ok(())
    } else {
      Err(TypeError::NotAnnotationType(name.to_string()))
    }
  }

  fn resolve_annotation_type(&self, name: &str) -> Result<TypeId, TypeError> {
    let ty = self.resolve(name)?;
    self.check_annotation_type(ty)?;
    Ok(ty)
  }
}

#[derive(Debug, Clone)]
struct TypeInfo {
  name:        String,
  supertype:   Option<TypeId>,
  description: Option<String>,
  /// Self first, then the supertype chain up to TOP.
  ancestors:   SmallVec<[TypeId; 8]>,
}

/// Single-inheritance type system.
#[derive(Debug, Clone)]
pub struct TypeTree {
  types:      Vec<TypeInfo>,
  by_name:    HashMap<String, TypeId>,
  priorities: HashMap<TypeId, usize>,
  top:        TypeId,
  annotation: TypeId,
}

impl TypeTree {
  pub fn builder() -> TypeTreeBuilder {
    TypeTreeBuilder::default()
  }

  /// A type system holding only the built-in types.
  pub fn builtin() -> Self {
    let mut tree = Self {
      types:      Vec::new(),
      by_name:    HashMap::new(),
      priorities: HashMap::new(),
      top:        TypeId::new(0),
      annotation: TypeId::new(0),
    };
    let top = tree.insert(TOP, None, None);
    let base = tree.insert(ANNOTATION_BASE, Some(top), None);
    let annotation = tree.insert(ANNOTATION, Some(base), None);
    tree.insert(DOCUMENT_ANNOTATION, Some(annotation), None);
    tree.top = top;
    tree.annotation = annotation;
    tree
  }

  fn insert(
    &mut self,
    name: &str,
    supertype: Option<TypeId>,
    description: Option<String>,
  ) -> TypeId {
    let id = TypeId::new(self.types.len() as u32);
    let mut ancestors: SmallVec<[TypeId; 8]> = smallvec![id];
    if let Some(supertype) = supertype {
      ancestors.extend_from_slice(&self.types[supertype.index()].ancestors);
    }
    self.types.push(TypeInfo {
      name: name.to_string(),
      supertype,
      description,
      ancestors,
    });
    self.by_name.insert(name.to_string(), id);
    id
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  pub fn supertype(&self, ty: TypeId) -> Option<TypeId> {
    self.types.get(ty.index()).and_then(|info| info.supertype)
  }

  pub fn description(&self, ty: TypeId) -> Option<&str> {
    self
      .types
      .get(ty.index())
      .and_then(|info| info.description.as_deref())
  }

  /// Direct subtypes of `ty`, in declaration order.
  pub fn subtypes(&self, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
    self
      .types
      .iter()
      .enumerate()
      .filter(move |(_, info)| info.supertype == Some(ty))
      .map(|(idx, _)| TypeId::new(idx as u32))
  }

  pub fn iter(&self) -> impl Iterator<Item = (TypeId, &str)> + '_ {
    self
      .types
      .iter()
      .enumerate()
      .map(|(idx, info)| (TypeId::new(idx as u32), info.name.as_str()))
  }
}

impl Default for TypeTree {
  fn default() -> Self {
    Self::builtin()
  }
}

impl TypeSystem for TypeTree {
  fn subsumes(&self, ancestor: TypeId, ty: TypeId) -> bool {
    self
      .types
      .get(ty.index())
      .is_some_and(|info| info.ancestors.contains(&ancestor))
  }

  fn type_by_name(&self, name: &str) -> Option<TypeId> {
    self.by_name.get(name).copied()
  }

  fn type_name(&self, ty: TypeId) -> Option<&str> {
    self.types.get(ty.index()).map(|info| info.name.as_str())
  }

  fn top_type(&self) -> TypeId {
    self.top
  }

  fn annotation_type(&self) -> TypeId {
    self.annotation
  }

  fn priority(&self, ty: TypeId) -> Option<usize> {
    self.priorities.get(&ty).copied()
  }
}

#[derive(Debug, Clone)]
struct Declaration {
  name:        String,
  supertype:   String,
  description: Option<String>,
}

/// Collects type declarations in any order and resolves them on [`build`].
///
/// [`build`]: TypeTreeBuilder::build
#[derive(Debug, Clone, Default)]
pub struct TypeTreeBuilder {
  declarations: Vec<Declaration>,
  priorities:   Vec<String>,
}

impl TypeTreeBuilder {
  pub fn declare(self, name: impl Into<String>, supertype: impl Into<String>) -> Self {
    self.declare_with_description(name, supertype, None)
  }

  pub fn declare_with_description(
    mut self,
    name: impl Into<String>,
    supertype: impl Into<String>,
    description: Option<String>,
  ) -> Self {
    self.declarations.push(Declaration {
      name: name.into(),
      supertype: supertype.into(),
      description,
    });
    self
  }

  /// Type priority order, highest priority first. Types not listed have no
  /// priority and sort after the listed ones.
  pub fn priorities<I, S>(mut self, order: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.priorities = order.into_iter().map(Into::into).collect();
    self
  }

  pub fn build(self) -> Result<TypeTree, TypeSystemError> {
    let mut tree = TypeTree::builtin();

    let mut pending = Vec::with_capacity(self.declarations.len());
    for decl in self.declarations {
      let seen = tree.by_name.contains_key(&decl.name)
        || pending.iter().any(|d: &Declaration| d.name == decl.name);
      if seen {
        return Err(TypeSystemError::Duplicate(decl.name));
      }
      pending.push(decl);
    }

    for decl in &pending {
      let known = tree.by_name.contains_key(&decl.supertype)
        || pending.iter().any(|d| d.name == decl.supertype);
      if !known {
        return Err(TypeSystemError::UnknownSupertype {
          name:      decl.name.clone(),
          supertype: decl.supertype.clone(),
        });
      }
    }

    // Declarations may reference supertypes declared later in the list.
    while !pending.is_empty() {
      let before = pending.len();
      pending.retain(|decl| match tree.type_by_name(&decl.supertype) {
        Some(supertype) => {
          tree.insert(&decl.name, Some(supertype), decl.description.clone());
          false
        },
        None => true,
      });
      if pending.len() == before {
        return Err(TypeSystemError::Cycle(pending[0].name.clone()));
      }
    }

    let mut rank = 0;
    for name in &self.priorities {
      match tree.type_by_name(name) {
        Some(ty) if !tree.priorities.contains_key(&ty) => {
          tree.priorities.insert(ty, rank);
          rank += 1;
        },
        Some(_) => tracing::warn!("type [{name}] listed twice in priority order, keeping first"),
        None => tracing::warn!("ignoring undeclared type [{name}] in priority order"),
      }
    }

    Ok(tree)
  }
}
