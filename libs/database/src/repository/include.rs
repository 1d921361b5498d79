use async_trait::async_trait;
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait};
use std::collections::BTreeMap;

use super::{RepositoryError, RepositoryResult};

/// Relation paths to eager-load, e.g. `"Category"` or `"Products, Products.Category"`.
///
/// Paths are comma-separated; nested relations are dot-separated. Each node holds the
/// paths requested below it, so an entity only needs to resolve its own direct relations
/// and hand [`IncludePaths::nested`] to the related entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludePaths {
    children: BTreeMap<String, IncludePaths>,
}

impl IncludePaths {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn parse(paths: &str) -> Self {
        let mut root = Self::default();
        for path in paths.split(',') {
            let mut node = &mut root;
            for segment in path.split('.').map(str::trim).filter(|s| !s.is_empty()) {
                node = node.children.entry(segment.to_string()).or_default();
            }
        }
        root
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.children.contains_key(relation)
    }

    /// Paths requested beneath `relation`, if `relation` itself was requested.
    pub fn nested(&self, relation: &str) -> Option<&IncludePaths> {
        self.children.get(relation)
    }

    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Fails on the first requested relation that is not in `known`.
    pub fn ensure_known(&self, known: &[&str]) -> RepositoryResult<()> {
        match self.relations().find(|name| !known.contains(name)) {
            Some(name) => Err(RepositoryError::UnknownInclude(name.to_string())),
            None => Ok(()),
        }
    }
}

impl From<&str> for IncludePaths {
    fn from(paths: &str) -> Self {
        Self::parse(paths)
    }
}

/// An entity the generic repository can read and stage writes for.
#[async_trait]
pub trait RepositoryEntity: EntityTrait + 'static {
    /// Active model used for inserts, full-record updates and deletes.
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + 'static;

    /// Row as handed to callers, with optional navigation properties.
    type Record: Send;

    /// Primary key rendered for logs and conflict errors.
    fn key_of(model: &Self::Model) -> String;

    /// Converts fetched rows into records, loading the relations named in `include`.
    async fn load(
        db: &DatabaseConnection,
        rows: Vec<Self::Model>,
        include: &IncludePaths,
    ) -> RepositoryResult<Vec<Self::Record>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_relation() {
        let include = IncludePaths::parse("Category");
        assert!(include.contains("Category"));
        assert!(include.nested("Category").unwrap().is_empty());
    }

    #[test]
    fn test_parse_nested_and_multiple_paths() {
        let include = IncludePaths::parse("Products.Category, Products , Author");
        let relations: Vec<_> = include.relations().collect();
        assert_eq!(relations, vec!["Author", "Products"]);

        let products = include.nested("Products").unwrap();
        assert!(products.contains("Category"));
    }

    #[test]
    fn test_parse_ignores_empty_segments() {
        assert!(IncludePaths::parse("").is_empty());
        assert!(IncludePaths::parse(" , . ,").is_empty());
        assert_eq!(IncludePaths::parse("Category."), IncludePaths::parse("Category"));
    }

    #[test]
    fn test_ensure_known_reports_first_unknown() {
        let include = IncludePaths::parse("Category, Publisher");
        match include.ensure_known(&["Category"]) {
            Err(RepositoryError::UnknownInclude(name)) => assert_eq!(name, "Publisher"),
            other => panic!("expected unknown include, got {other:?}"),
        }
        assert!(IncludePaths::parse("Category").ensure_known(&["Category"]).is_ok());
    }
}
