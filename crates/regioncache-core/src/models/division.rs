use serde::{Deserialize, Serialize};

/// A top-level administrative division (省/直辖市).
///
/// `code` is the GB/T 2260 division code, e.g. `110000` for Beijing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub code: String,
    pub name: String,
}

/// A prefecture-level city. Belongs to exactly one province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub code: String,
    pub name: String,
    pub province_code: String,
}

/// A county-level region (区/县). Belongs to exactly one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub city_code: String,
}

impl Province {
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

impl City {
    /// Municipalities repeat the province name at the city level
    /// (e.g. 北京市 / 北京市). Collapse those for display.
    pub fn display_name<'a>(&'a self, province: &Province) -> &'a str {
        if self.name == province.name {
            ""
        } else {
            &self.name
        }
    }
}

/// A completed pick, one record from each level with the links resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub province: Province,
    pub city: City,
    pub region: Region,
}

impl Selection {
    /// Full display form, e.g. "广东省 广州市 天河区".
    /// Municipality city names that repeat the province are skipped.
    pub fn display(&self) -> String {
        let city = self.city.display_name(&self.province);
        if city.is_empty() {
            format!("{} {}", self.province.name, self.region.name)
        } else {
            format!("{} {} {}", self.province.name, city, self.region.name)
        }
    }

    /// The code triple, suitable for persisting in config.
    pub fn saved(&self) -> SavedSelection {
        SavedSelection {
            province_code: self.province.code.clone(),
            city_code: self.city.code.clone(),
            region_code: self.region.code.clone(),
        }
    }
}

/// Code triple of the last confirmed pick, stored in config so the
/// picker can restore its cursors on the next launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSelection {
    pub province_code: String,
    pub city_code: String,
    pub region_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Selection {
        Selection {
            province: Province {
                code: "440000".to_string(),
                name: "广东省".to_string(),
            },
            city: City {
                code: "440100".to_string(),
                name: "广州市".to_string(),
                province_code: "440000".to_string(),
            },
            region: Region {
                code: "440106".to_string(),
                name: "天河区".to_string(),
                city_code: "440100".to_string(),
            },
        }
    }

    #[test]
    fn test_selection_display() {
        assert_eq!(sample().display(), "广东省 广州市 天河区");
    }

    #[test]
    fn test_selection_display_municipality() {
        let sel = Selection {
            province: Province {
                code: "110000".to_string(),
                name: "北京市".to_string(),
            },
            city: City {
                code: "110100".to_string(),
                name: "北京市".to_string(),
                province_code: "110000".to_string(),
            },
            region: Region {
                code: "110101".to_string(),
                name: "东城区".to_string(),
                city_code: "110100".to_string(),
            },
        };
        // City name repeats the province, so it is collapsed
        assert_eq!(sel.display(), "北京市 东城区");
    }

    #[test]
    fn test_selection_saved() {
        let saved = sample().saved();
        assert_eq!(saved.province_code, "440000");
        assert_eq!(saved.city_code, "440100");
        assert_eq!(saved.region_code, "440106");
    }
}
