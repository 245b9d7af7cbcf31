//! The division store.
//!
//! Holds the three ordered division lists in memory and persists each one
//! as its own timestamped JSON file in the store's data directory. The
//! store is a plain value: the application constructs one at startup and
//! passes it to whatever needs the lists. Callers get read-only views;
//! mutation goes through the explicit replace methods.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::dataset::DivisionTree;
use crate::models::{City, Province, Region, Selection};

/// File name for each stored list (".json" appended).
const PROVINCES_LIST: &str = "provinces";
const CITIES_LIST: &str = "cities";
const REGIONS_LIST: &str = "regions";

/// On-disk envelope for a stored list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredList<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

impl<T> StoredList<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew (negative ages) as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

pub struct RegionStore {
    data_dir: PathBuf,
    provinces: Vec<Province>,
    cities: Vec<City>,
    regions: Vec<Region>,
}

impl RegionStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self {
            data_dir,
            provinces: Vec::new(),
            cities: Vec::new(),
            regions: Vec::new(),
        })
    }

    fn list_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    fn load_list<T: DeserializeOwned>(&self, name: &str) -> Result<Option<StoredList<T>>> {
        let path = self.list_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read list file: {}", name))?;

        let stored: StoredList<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse list file: {}", name))?;

        Ok(Some(stored))
    }

    fn save_list<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let stored = StoredList::new(data);
        let path = self.list_path(name);
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write list file: {}", name))?;
        Ok(())
    }

    // ===== Read-only views =====

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    // ===== Mutation =====

    pub fn set_provinces(&mut self, provinces: Vec<Province>) {
        self.provinces = provinces;
    }

    pub fn set_cities(&mut self, cities: Vec<City>) {
        self.cities = cities;
    }

    pub fn set_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    /// Replace all three lists from a parsed seed document.
    pub fn populate(&mut self, tree: &DivisionTree) {
        let (provinces, cities, regions) = tree.flatten();
        debug!(
            provinces = provinces.len(),
            cities = cities.len(),
            regions = regions.len(),
            "populating store from dataset"
        );
        self.provinces = provinces;
        self.cities = cities;
        self.regions = regions;
    }

    // ===== Persistence =====

    pub fn write_provinces(&self) -> Result<()> {
        self.save_list(PROVINCES_LIST, &self.provinces)
    }

    /// Load the province list from disk. Returns false (leaving the
    /// in-memory list untouched) when nothing has been written yet.
    pub fn read_provinces(&mut self) -> Result<bool> {
        match self.load_list::<Vec<Province>>(PROVINCES_LIST)? {
            Some(stored) => {
                self.provinces = stored.data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn write_cities(&self) -> Result<()> {
        self.save_list(CITIES_LIST, &self.cities)
    }

    pub fn read_cities(&mut self) -> Result<bool> {
        match self.load_list::<Vec<City>>(CITIES_LIST)? {
            Some(stored) => {
                self.cities = stored.data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn write_regions(&self) -> Result<()> {
        self.save_list(REGIONS_LIST, &self.regions)
    }

    pub fn read_regions(&mut self) -> Result<bool> {
        match self.load_list::<Vec<Region>>(REGIONS_LIST)? {
            Some(stored) => {
                self.regions = stored.data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist all three lists.
    pub fn write_all(&self) -> Result<()> {
        self.write_provinces()?;
        self.write_cities()?;
        self.write_regions()?;
        Ok(())
    }

    /// Load all three lists. Returns true only when every list was
    /// present on disk; lists without a file keep their in-memory state.
    pub fn read_all(&mut self) -> Result<bool> {
        let provinces = self.read_provinces()?;
        let cities = self.read_cities()?;
        let regions = self.read_regions()?;
        Ok(provinces && cities && regions)
    }

    // ===== Hierarchy queries =====

    pub fn cities_of(&self, province_code: &str) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.province_code == province_code)
            .collect()
    }

    pub fn regions_of(&self, city_code: &str) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| r.city_code == city_code)
            .collect()
    }

    pub fn province_by_code(&self, code: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.code == code)
    }

    pub fn city_by_code(&self, code: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.code == code)
    }

    pub fn region_by_code(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Resolve a code triple into a full selection. Returns None when a
    /// code is unknown or the records do not chain parent-to-child.
    pub fn selection(
        &self,
        province_code: &str,
        city_code: &str,
        region_code: &str,
    ) -> Option<Selection> {
        let province = self.province_by_code(province_code)?;
        let city = self.city_by_code(city_code)?;
        let region = self.region_by_code(region_code)?;

        if city.province_code != province.code || region.city_code != city.code {
            return None;
        }

        Some(Selection {
            province: province.clone(),
            city: city.clone(),
            region: region.clone(),
        })
    }

    // ===== Stored-list ages =====

    /// Helper to load a stored list for age display without failing.
    fn load_age<T: DeserializeOwned>(&self, name: &str) -> Option<String> {
        match self.load_list::<T>(name) {
            Ok(Some(stored)) => Some(stored.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(list = name, error = %e, "Failed to load list for age display");
                None
            }
        }
    }

    pub fn list_ages(&self) -> ListAges {
        ListAges {
            provinces: self.load_age::<Vec<Province>>(PROVINCES_LIST),
            cities: self.load_age::<Vec<City>>(CITIES_LIST),
            regions: self.load_age::<Vec<Region>>(REGIONS_LIST),
        }
    }
}

#[derive(Debug, Default)]
pub struct ListAges {
    pub provinces: Option<String>,
    pub cities: Option<String>,
    pub regions: Option<String>,
}

impl ListAges {
    /// Age string for the status bar. The lists are written together, so
    /// any one of them stands in for the set.
    pub fn last_updated(&self) -> String {
        let ages = [&self.provinces, &self.cities, &self.regions];

        for a in ages.iter().copied().flatten() {
            return a.clone();
        }

        "never".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

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
            { "code": "440300", "name": "深圳市", "regions": [
                { "code": "440305", "name": "南山区" }
            ] }
        ] }
    ]"#;

    fn seeded_store(dir: &TempDir) -> RegionStore {
        let mut store = RegionStore::new(dir.path().to_path_buf()).unwrap();
        let tree = DivisionTree::from_json_str(SAMPLE).unwrap();
        store.populate(&tree);
        store
    }

    #[test]
    fn test_stored_list_age_display_just_now() {
        let stored = StoredList::new(vec![1, 2, 3]);
        assert_eq!(stored.age_display(), "just now");
    }

    #[test]
    fn test_stored_list_age_display_old() {
        let mut stored = StoredList::new(vec![1]);
        stored.saved_at = Utc::now() - Duration::minutes(90);
        assert_eq!(stored.age_display(), "1h ago");

        stored.saved_at = Utc::now() - Duration::days(3);
        assert_eq!(stored.age_display(), "3d ago");
    }

    #[test]
    fn test_round_trip_preserves_lists_and_order() {
        let dir = TempDir::new().unwrap();
        let store = {
            let store = seeded_store(&dir);
            store.write_all().unwrap();
            store
        };

        let mut reloaded = RegionStore::new(dir.path().to_path_buf()).unwrap();
        assert!(reloaded.read_all().unwrap());

        assert_eq!(reloaded.provinces(), store.provinces());
        assert_eq!(reloaded.cities(), store.cities());
        assert_eq!(reloaded.regions(), store.regions());

        // Dataset document order survives the round trip
        assert_eq!(reloaded.provinces()[0].name, "北京市");
        assert_eq!(reloaded.regions()[0].name, "东城区");
    }

    #[test]
    fn test_read_missing_lists_returns_false() {
        let dir = TempDir::new().unwrap();
        let mut store = RegionStore::new(dir.path().to_path_buf()).unwrap();

        assert!(!store.read_provinces().unwrap());
        assert!(!store.read_all().unwrap());
        assert!(store.provinces().is_empty());
    }

    #[test]
    fn test_read_partial_store() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);
        store.write_provinces().unwrap();
        store.write_cities().unwrap();
        // regions never written

        let mut reloaded = RegionStore::new(dir.path().to_path_buf()).unwrap();
        assert!(!reloaded.read_all().unwrap());
        assert_eq!(reloaded.provinces().len(), 2);
        assert_eq!(reloaded.cities().len(), 3);
        assert!(reloaded.regions().is_empty());
    }

    #[test]
    fn test_read_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("provinces.json"), "not json at all").unwrap();

        let mut store = RegionStore::new(dir.path().to_path_buf()).unwrap();
        let err = store.read_provinces().unwrap_err();
        assert!(err.to_string().contains("Failed to parse list file"));
    }

    #[test]
    fn test_cascade_queries() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);

        let cities = store.cities_of("440000");
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].name, "广州市");

        let regions = store.regions_of("440300");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "南山区");

        assert!(store.cities_of("999999").is_empty());
    }

    #[test]
    fn test_selection_resolution() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);

        let sel = store.selection("440000", "440100", "440106").unwrap();
        assert_eq!(sel.display(), "广东省 广州市 天河区");

        // Region exists but belongs to a different city
        assert!(store.selection("440000", "440100", "440305").is_none());
        // Unknown code
        assert!(store.selection("440000", "440100", "000000").is_none());
    }

    #[test]
    fn test_explicit_mutation_replaces_view() {
        let dir = TempDir::new().unwrap();
        let mut store = seeded_store(&dir);

        store.set_provinces(vec![Province {
            code: "310000".to_string(),
            name: "上海市".to_string(),
        }]);
        assert_eq!(store.provinces().len(), 1);
        assert_eq!(store.provinces()[0].name, "上海市");
    }

    #[test]
    fn test_list_ages() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir);

        assert_eq!(store.list_ages().last_updated(), "never");

        store.write_all().unwrap();
        let ages = store.list_ages();
        assert_eq!(ages.provinces.as_deref(), Some("just now"));
        assert_eq!(ages.last_updated(), "just now");
    }
}
