//! TOML test catalog loader.
//!
//! Loads the read-only set of test variants from TOML files and directories,
//! and validates them.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, TestVariant};

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    variants: Vec<TomlVariant>,
}

#[derive(Debug, Deserialize)]
struct TomlVariant {
    id: String,
    name: String,
    grade: u32,
    subject: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    text: String,
    #[serde(default)]
    answer: String,
}

/// The read-only set of test variants.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    variants: Vec<TestVariant>,
}

impl Catalog {
    pub fn new(variants: Vec<TestVariant>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[TestVariant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Look up a variant by id. The first match wins if ids repeat.
    pub fn get(&self, id: &str) -> Option<&TestVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Variants grouped by (grade, subject), in grade then subject order.
    pub fn grouped(&self) -> Vec<VariantGroup<'_>> {
        let mut groups: BTreeMap<(u32, &str), Vec<&TestVariant>> = BTreeMap::new();
        for variant in &self.variants {
            groups
                .entry((variant.grade, variant.subject.as_str()))
                .or_default()
                .push(variant);
        }
        groups
            .into_iter()
            .map(|((grade, subject), variants)| VariantGroup {
                grade,
                subject,
                variants,
            })
            .collect()
    }
}

/// Variants sharing a grade and subject.
#[derive(Debug, Clone)]
pub struct VariantGroup<'a> {
    pub grade: u32,
    pub subject: &'a str,
    pub variants: Vec<&'a TestVariant>,
}

impl VariantGroup<'_> {
    /// Display label, e.g. "5 grade - Mathematics".
    pub fn label(&self) -> String {
        format!("{} grade - {}", self.grade, self.subject)
    }
}

/// Parse a single TOML file into its variants.
pub fn parse_catalog(path: &Path) -> Result<Vec<TestVariant>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into variants (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Vec<TestVariant>> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let variants = parsed
        .variants
        .into_iter()
        .map(|v| TestVariant {
            id: v.id,
            name: v.name,
            grade: v.grade,
            subject: v.subject,
            description: v.description,
            questions: v
                .questions
                .into_iter()
                .map(|q| Question {
                    id: q.id,
                    text: q.text,
                    answer: q.answer,
                })
                .collect(),
        })
        .collect();

    Ok(variants)
}

/// Recursively load all `.toml` catalog files from a directory.
///
/// Files are visited in name order so lookups are deterministic.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<TestVariant>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let mut variants = Vec::new();
    for path in paths {
        if path.is_dir() {
            variants.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(found) => variants.extend(found),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(variants)
}

/// Load a catalog from a single file or a directory of files.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let variants = if path.is_dir() {
        load_catalog_directory(path)?
    } else {
        parse_catalog(path)?
    };
    tracing::debug!("loaded {} test variant(s) from {}", variants.len(), path.display());
    Ok(Catalog::new(variants))
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The variant ID (if applicable).
    pub variant_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for variant in catalog.variants() {
        if !seen_ids.insert(variant.id.as_str()) {
            warnings.push(ValidationWarning {
                variant_id: Some(variant.id.clone()),
                message: format!("duplicate variant ID: {}", variant.id),
            });
        }
    }

    for variant in catalog.variants() {
        let warn = |message: String| ValidationWarning {
            variant_id: Some(variant.id.clone()),
            message,
        };

        if variant.questions.is_empty() {
            warnings.push(warn("variant has no questions".into()));
        }

        let mut seen_questions = HashSet::new();
        for question in &variant.questions {
            if !seen_questions.insert(question.id) {
                warnings.push(warn(format!("duplicate question ID: {}", question.id)));
            }
            if question.text.trim().is_empty() {
                warnings.push(warn(format!("question {} has empty text", question.id)));
            }
            if question.answer.trim().is_empty() {
                warnings.push(warn(format!(
                    "question {} has no expected answer",
                    question.id
                )));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[variants]]
id = "math-5-v1"
name = "Variant 1"
grade = 5
subject = "Mathematics"

[[variants.questions]]
id = 1
text = "2 + 2 = ?"
answer = "4"

[[variants.questions]]
id = 2
text = "7 * 8 = ?"
answer = "56"

[[variants]]
id = "geo-6-v1"
name = "Variant 1"
grade = 6
subject = "Geography"

[[variants.questions]]
id = 1
text = "Capital of France?"
answer = "Paris"
"#;

    #[test]
    fn parse_valid_toml() {
        let variants = parse_catalog_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].id, "math-5-v1");
        assert_eq!(variants[0].questions.len(), 2);
        assert_eq!(variants[0].questions[1].answer, "56");
        assert!(variants[0].description.is_empty());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_catalog_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn parse_missing_required_field() {
        let toml = r#"
[[variants]]
id = "x"
name = "No grade"
subject = "Math"
"#;
        assert!(parse_catalog_str(toml, &PathBuf::from("x.toml")).is_err());
    }

    #[test]
    fn get_and_group() {
        let catalog = Catalog::new(parse_catalog_str(VALID_TOML, &PathBuf::from("t.toml")).unwrap());
        assert_eq!(catalog.get("geo-6-v1").unwrap().subject, "Geography");
        assert!(catalog.get("missing").is_none());

        let groups = catalog.grouped();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label(), "5 grade - Mathematics");
        assert_eq!(groups[1].variants[0].id, "geo-6-v1");
    }

    #[test]
    fn validate_reports_problems() {
        let toml = r#"
[[variants]]
id = "dup"
name = "First"
grade = 5
subject = "Math"

[[variants.questions]]
id = 1
text = "Q"
answer = ""

[[variants.questions]]
id = 1
text = " "
answer = "A"

[[variants]]
id = "dup"
name = "Second"
grade = 5
subject = "Math"
"#;
        let catalog = Catalog::new(parse_catalog_str(toml, &PathBuf::from("t.toml")).unwrap());
        let messages: Vec<_> = validate_catalog(&catalog)
            .into_iter()
            .map(|w| w.message)
            .collect();
        assert!(messages.iter().any(|m| m.contains("duplicate variant ID")));
        assert!(messages.iter().any(|m| m.contains("duplicate question ID")));
        assert!(messages.iter().any(|m| m.contains("no expected answer")));
        assert!(messages.iter().any(|m| m.contains("empty text")));
        assert!(messages.iter().any(|m| m.contains("no questions")));
    }

    #[test]
    fn valid_catalog_has_no_warnings() {
        let catalog = Catalog::new(parse_catalog_str(VALID_TOML, &PathBuf::from("t.toml")).unwrap());
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/bad.toml"), "not [toml").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_catalog(Path::new("/definitely/not/here.toml")).is_err());
    }
}
