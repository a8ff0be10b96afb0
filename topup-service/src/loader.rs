// Dataset Loader
// Reads the users and companies JSON files into memory

use crate::error::LoadError;
use crate::models::Company;

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Loader for the two input datasets
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load raw user records from a JSON array file
    ///
    /// Records are kept as raw JSON so that field-level problems are left to
    /// the validator instead of failing the whole file.
    pub fn load_users<P: AsRef<Path>>(path: P) -> Result<Vec<Value>, LoadError> {
        let path = path.as_ref();
        let content = Self::read(path)?;
        Self::parse_array(&content, path)
    }

    /// Load companies from a JSON array file
    pub fn load_companies<P: AsRef<Path>>(path: P) -> Result<Vec<Company>, LoadError> {
        let path = path.as_ref();
        let content = Self::read(path)?;
        Self::parse_companies(&content, path)
    }

    /// Parse a top-level JSON array; `path` is only used for error reporting
    pub fn parse_array(content: &str, path: &Path) -> Result<Vec<Value>, LoadError> {
        let value: Value = serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Array(items) => Ok(items),
            other => Err(LoadError::NotAnArray {
                path: path.to_path_buf(),
                found: json_kind(&other),
            }),
        }
    }

    /// Parse a companies document
    pub fn parse_companies(content: &str, path: &Path) -> Result<Vec<Company>, LoadError> {
        Self::parse_array(content, path)?
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|source| LoadError::InvalidCompany {
                    path: path.to_path_buf(),
                    index,
                    source,
                })
            })
            .collect()
    }

    fn read(path: &Path) -> Result<String, LoadError> {
        tracing::debug!(path = %path.display(), "reading dataset");
        fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Human-readable name of a JSON value's kind
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    #[test]
    fn test_parse_array() {
        let items = DatasetLoader::parse_array(r#"[{"id": 1}, {"id": 2}]"#, Path::new("users.json"))
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], 2);
    }

    #[test]
    fn test_parse_empty_array() {
        let items = DatasetLoader::parse_array("[]", Path::new("users.json")).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = DatasetLoader::parse_array(r#"{"id": 1}"#, Path::new("users.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotAnArray { found: "an object", .. }));
    }

    #[test]
    fn test_parse_reports_malformed_json() {
        let err = DatasetLoader::parse_array("[{\"id\": 1,", Path::new("users.json")).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("users.json"));
    }

    #[test]
    fn test_parse_companies() {
        let companies = DatasetLoader::parse_companies(
            r#"[{"id": 2, "name": "Beta", "top_up": 5}, {"id": 1, "name": "Alpha", "top_up": -1}]"#,
            Path::new("companies.json"),
        )
        .unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Beta");
        assert_eq!(companies[1].top_up, -1.0);
    }

    #[test]
    fn test_parse_companies_accepts_integral_float_id() {
        let companies = DatasetLoader::parse_companies(
            r#"[{"id": 10.0, "name": "Acme", "top_up": 3}]"#,
            Path::new("companies.json"),
        )
        .unwrap();
        assert_eq!(companies[0].id, 10);
    }

    #[test]
    fn test_parse_companies_names_bad_index() {
        let err = DatasetLoader::parse_companies(
            r#"[{"id": 1, "name": "Alpha", "top_up": 5}, {"id": "two", "name": "Beta", "top_up": 5}]"#,
            Path::new("companies.json"),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidCompany { index: 1, .. }));
    }

    #[test]
    fn test_load_users_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("users.json");
        fs::write(&path, r#"[{"id": 1, "first_name": "Ada"}]"#).unwrap();

        let users = DatasetLoader::load_users(&path).unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = DatasetLoader::load_companies(temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
