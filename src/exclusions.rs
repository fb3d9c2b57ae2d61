//! Named groups of categories that can be excluded from insights.
//!
//! The groups are deployment configuration, e.g. `"housing"` maps to the
//! guids of the rent and utilities categories. Requests refer to groups by
//! name and the engine only ever sees the resolved guids.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use serde::Deserialize;

use crate::Error;

/// A table from exclusion group name to category guids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ExclusionGroups(BTreeMap<String, Vec<String>>);

impl ExclusionGroups {
    /// Create the table from group names and their category guids.
    pub fn new(groups: BTreeMap<String, Vec<String>>) -> Self {
        Self(groups)
    }

    /// Parse a JSON object such as `{"housing": ["<guid>", "<guid>"]}`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidExclusionConfig] if `json` is not an object of string arrays.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|error| Error::InvalidExclusionConfig(error.to_string()))
    }

    /// Read and parse the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Io] if the file cannot be read, or
    /// [Error::InvalidExclusionConfig] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path)
            .map_err(|error| Error::Io(format!("{}: {error}", path.display())))?;

        Self::from_json(&json)
    }

    /// The configured group names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Collect the category guids of every group in `names`.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownExclusionGroup] for the first name that is not configured.
    pub fn resolve<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<HashSet<String>, Error> {
        let mut guids = HashSet::new();

        for name in names {
            let group = self
                .0
                .get(name)
                .ok_or_else(|| Error::UnknownExclusionGroup(name.to_owned()))?;

            guids.extend(group.iter().cloned());
        }

        Ok(guids)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, path::Path};

    use crate::Error;

    use super::ExclusionGroups;

    fn groups() -> ExclusionGroups {
        ExclusionGroups::from_json(
            r#"{
                "gifts": ["gift-guid", "pets-guid"],
                "housing": ["rent-guid", "utilities-guid"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_union_of_groups() {
        let guids = groups().resolve(["gifts", "housing"]).unwrap();

        let want: HashSet<String> = ["gift-guid", "pets-guid", "rent-guid", "utilities-guid"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(guids, want);
    }

    #[test]
    fn resolving_no_groups_excludes_nothing() {
        let guids = groups().resolve([]).unwrap();

        assert!(guids.is_empty());
    }

    #[test]
    fn rejects_unknown_group() {
        let result = groups().resolve(["housing", "investment"]);

        assert_eq!(
            result,
            Err(Error::UnknownExclusionGroup("investment".to_owned()))
        );
    }

    #[test]
    fn lists_group_names_alphabetically() {
        let groups = groups();

        let names: Vec<_> = groups.names().collect();

        assert_eq!(names, vec!["gifts", "housing"]);
    }

    #[test]
    fn rejects_malformed_json() {
        let result = ExclusionGroups::from_json(r#"{"gifts": "not-a-list"}"#);

        assert!(matches!(result, Err(Error::InvalidExclusionConfig(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = ExclusionGroups::load(Path::new("/definitely/not/here.json"));

        assert!(matches!(result, Err(Error::Io(_))));
    }
}
