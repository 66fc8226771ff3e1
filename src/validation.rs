use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;

use log::debug;
use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;
use crate::repository::users::ProfileUpdate;

const BUILTIN_SKILLS: &str = include_str!("../data/skills.json");

static BUILTIN_CATALOG: Lazy<Result<SkillCatalog, String>> =
    Lazy::new(|| SkillCatalog::from_json(BUILTIN_SKILLS).map_err(|e| e.to_string()));

/// Allow-list of skill tags a profile may carry. Matching is exact.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    skills: HashSet<String>,
}

impl SkillCatalog {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let skills: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::from_iter(skills))
    }

    pub fn builtin() -> io::Result<Self> {
        BUILTIN_CATALOG
            .clone()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Built-in catalog unless a JSON file overrides it.
    pub fn load(path: Option<&str>) -> io::Result<Self> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                Self::from_json(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
            None => Self::builtin(),
        }
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Split a comma-separated skill string and keep only known skills.
    /// Unknown entries are dropped without error.
    pub fn filter(&self, raw: &str) -> Vec<String> {
        split_list(raw)
            .into_iter()
            .filter(|s| self.contains(s))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            skills: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileEditRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 200))]
    pub tagline: Option<String>,
    #[validate(length(max = 1000))]
    pub skills: String,
    #[validate(length(max = 1000))]
    pub interests: String,
    #[validate(length(max = 100))]
    pub linkedin: Option<String>,
    #[validate(length(max = 100))]
    pub github: Option<String>,
    #[validate(length(max = 100))]
    pub twitter: Option<String>,
    #[validate(length(max = 100))]
    pub facebook: Option<String>,
}

impl ProfileEditRequest {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|e| {
            debug!("profile edit rejected: {}", e);
            AppError::invalid_input()
        })
    }

    /// Handles keyed by platform, blank ones left out.
    pub fn socmed(&self) -> BTreeMap<String, String> {
        [
            ("facebook", &self.facebook),
            ("linkedin", &self.linkedin),
            ("github", &self.github),
            ("twitter", &self.twitter),
        ]
        .into_iter()
        .filter_map(|(platform, handle)| {
            let handle = handle.as_deref()?.trim();
            (!handle.is_empty()).then(|| (platform.to_string(), handle.to_string()))
        })
        .collect()
    }

    pub fn into_update(self, catalog: &SkillCatalog) -> ProfileUpdate {
        let socmed = self.socmed();
        ProfileUpdate {
            skills: catalog.filter(&self.skills),
            interests: split_list(&self.interests),
            name: self.name,
            tagline: self.tagline,
            socmed,
        }
    }
}

/// Comma-separated list to trimmed entries, empties and repeats included.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(skills: &str) -> ProfileEditRequest {
        ProfileEditRequest {
            name: "Alice".to_string(),
            tagline: Some("ships things".to_string()),
            skills: skills.to_string(),
            interests: " hiking ,  , chess".to_string(),
            linkedin: Some("".to_string()),
            github: Some("alice".to_string()),
            twitter: None,
            facebook: Some("   ".to_string()),
        }
    }

    #[test]
    fn unknown_skills_are_dropped() {
        let catalog: SkillCatalog = ["Go", "Python"].into_iter().collect();
        assert_eq!(catalog.filter("Go, Nonsense, Python"), vec!["Go", "Python"]);
    }

    #[test]
    fn skill_matching_is_case_sensitive() {
        let catalog: SkillCatalog = ["Go"].into_iter().collect();
        assert!(catalog.filter("go, GO").is_empty());
    }

    #[test]
    fn interests_are_trimmed_not_filtered() {
        assert_eq!(
            split_list(" hiking ,  , chess,hiking"),
            vec!["hiking", "", "chess", "hiking"]
        );
        assert_eq!(split_list("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn blank_handles_are_omitted() {
        let socmed = request("").socmed();
        assert_eq!(socmed.len(), 1);
        assert_eq!(socmed.get("github").map(String::as_str), Some("alice"));
    }

    #[test]
    fn update_carries_filtered_fields() {
        let catalog: SkillCatalog = ["Rust"].into_iter().collect();
        let update = request("Rust, Cobol").into_update(&catalog);
        assert_eq!(update.name, "Alice");
        assert_eq!(update.skills, vec!["Rust"]);
        assert_eq!(update.interests, vec!["hiking", "", "chess"]);
    }

    #[test]
    fn empty_name_fails_validation() {
        let mut req = request("Go");
        req.name = String::new();
        assert!(matches!(req.check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn long_tagline_fails_validation() {
        let mut req = request("Go");
        req.tagline = Some("x".repeat(201));
        assert!(req.check().is_err());
        req.tagline = None;
        assert!(req.check().is_ok());
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = SkillCatalog::builtin().unwrap();
        assert!(catalog.len() > 10);
        assert!(catalog.contains("Go"));
        assert!(catalog.contains("Python"));
    }

    #[test]
    fn malformed_catalog_json_is_an_error() {
        assert!(SkillCatalog::from_json("{\"Go\": true}").is_err());
        assert!(SkillCatalog::from_json("[\"Go\",").is_err());
    }

    #[test]
    fn missing_override_file_is_an_error() {
        assert!(SkillCatalog::load(Some("/definitely/not/here.json")).is_err());
        assert!(SkillCatalog::load(None).is_ok());
    }
}
