//! Seed dataset ingestion.
//!
//! The division lists originate from a bundled JSON document of nested
//! provinces, cities and regions. This module parses and validates that
//! document and flattens it into the three ordered lists the store holds.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{City, Province, Region};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset contains no provinces")]
    Empty,

    #[error("invalid dataset entry: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct ProvinceNode {
    code: String,
    name: String,
    #[serde(default)]
    cities: Vec<CityNode>,
}

#[derive(Debug, Deserialize)]
struct CityNode {
    code: String,
    name: String,
    #[serde(default)]
    regions: Vec<RegionNode>,
}

#[derive(Debug, Deserialize)]
struct RegionNode {
    code: String,
    name: String,
}

/// A parsed and validated seed document.
#[derive(Debug)]
pub struct DivisionTree {
    provinces: Vec<ProvinceNode>,
}

impl DivisionTree {
    /// Parse a seed document from a JSON string.
    pub fn from_json_str(contents: &str) -> Result<Self, DatasetError> {
        let provinces: Vec<ProvinceNode> = serde_json::from_str(contents)?;
        let tree = Self { provinces };
        tree.validate()?;
        Ok(tree)
    }

    /// Read and parse a seed document from disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = Self::from_json_str(&contents)?;
        debug!(
            path = %path.display(),
            provinces = tree.provinces.len(),
            "loaded division dataset"
        );
        Ok(tree)
    }

    /// Reject documents the picker cannot work with: no provinces at all,
    /// blank codes or names, or a division code appearing twice.
    fn validate(&self) -> Result<(), DatasetError> {
        if self.provinces.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let check = |code: &str, name: &str| -> Result<(), DatasetError> {
            if code.trim().is_empty() {
                return Err(DatasetError::Invalid(format!("blank code for '{}'", name)));
            }
            if name.trim().is_empty() {
                return Err(DatasetError::Invalid(format!("blank name for code {}", code)));
            }
            Ok(())
        };

        for province in &self.provinces {
            check(&province.code, &province.name)?;
            for city in &province.cities {
                check(&city.code, &city.name)?;
                for region in &city.regions {
                    check(&region.code, &region.name)?;
                }
            }
        }

        // Codes must be unique across all three levels
        for province in &self.provinces {
            for code in std::iter::once(province.code.as_str())
                .chain(province.cities.iter().flat_map(|c| {
                    std::iter::once(c.code.as_str())
                        .chain(c.regions.iter().map(|r| r.code.as_str()))
                }))
            {
                if !seen.insert(code) {
                    return Err(DatasetError::Invalid(format!("duplicate code {}", code)));
                }
            }
        }

        Ok(())
    }

    /// Flatten into the three ordered lists, assigning parent links.
    /// Document order is preserved at every level.
    pub fn flatten(&self) -> (Vec<Province>, Vec<City>, Vec<Region>) {
        let mut provinces = Vec::with_capacity(self.provinces.len());
        let mut cities = Vec::new();
        let mut regions = Vec::new();

        for p in &self.provinces {
            provinces.push(Province {
                code: p.code.clone(),
                name: p.name.clone(),
            });
            for c in &p.cities {
                cities.push(City {
                    code: c.code.clone(),
                    name: c.name.clone(),
                    province_code: p.code.clone(),
                });
                for r in &c.regions {
                    regions.push(Region {
                        code: r.code.clone(),
                        name: r.name.clone(),
                        city_code: c.code.clone(),
                    });
                }
            }
        }

        (provinces, cities, regions)
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "code": "110000", "name": "北京市", "cities": [
            { "code": "110100", "name": "北京市", "regions": [
                { "code": "110101", "name": "东城区" },
                { "code": "110102", "name": "西城区" }
            ] }
        ] },
        { "code": "440000", "name": "广东省", "cities": [
            { "code": "440100", "name": "广州市", "regions": [
                { "code": "440106", "name": "天河区" }
            ] },
            { "code": "440300", "name": "深圳市", "regions": [] }
        ] }
    ]"#;

    #[test]
    fn test_flatten_preserves_order_and_links() {
        let tree = DivisionTree::from_json_str(SAMPLE).unwrap();
        let (provinces, cities, regions) = tree.flatten();

        assert_eq!(provinces.len(), 2);
        assert_eq!(provinces[0].name, "北京市");
        assert_eq!(provinces[1].name, "广东省");

        assert_eq!(cities.len(), 3);
        assert_eq!(cities[1].code, "440100");
        assert_eq!(cities[1].province_code, "440000");
        assert_eq!(cities[2].name, "深圳市");

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].name, "东城区");
        assert_eq!(regions[0].city_code, "110100");
        assert_eq!(regions[2].city_code, "440100");
    }

    #[test]
    fn test_city_without_regions_is_legal() {
        let tree = DivisionTree::from_json_str(SAMPLE).unwrap();
        let (_, cities, regions) = tree.flatten();
        let shenzhen = cities.iter().find(|c| c.name == "深圳市").unwrap();
        assert!(!regions.iter().any(|r| r.city_code == shenzhen.code));
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = DivisionTree::from_json_str("[]").unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = DivisionTree::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
    }

    #[test]
    fn test_blank_code_rejected() {
        let doc = r#"[ { "code": " ", "name": "北京市", "cities": [] } ]"#;
        let err = DivisionTree::from_json_str(doc).unwrap_err();
        assert!(matches!(err, DatasetError::Invalid(_)));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let doc = r#"[
            { "code": "110000", "name": "北京市", "cities": [] },
            { "code": "110000", "name": "天津市", "cities": [] }
        ]"#;
        let err = DivisionTree::from_json_str(doc).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("duplicate code 110000"), "{}", message);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DivisionTree::load(Path::new("/nonexistent/divisions.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
    }
}
