//! Application state management for the regioncache picker.
//!
//! Holds the division store, the per-pane cursors, the active filter and
//! the UI state, and translates navigation into cursor movement across
//! the province → city → region cascade.

use anyhow::Result;
use tracing::{info, warn};

use regioncache_core::{City, Config, ListAges, Province, Region, RegionStore, Selection};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the pane filter input.
/// Division names are short; 32 chars is more than any of them.
pub const MAX_FILTER_LENGTH: usize = 32;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// The three picker panes, focused left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Province,
    City,
    Region,
}

impl Level {
    pub fn title(&self) -> &'static str {
        match self {
            Level::Province => "Province",
            Level::City => "City",
            Level::Region => "Region",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Filtering,
    ShowingHelp,
    Quitting,
}

pub struct App {
    pub store: RegionStore,
    pub config: Config,
    pub state: AppState,
    pub level: Level,
    pub province_cursor: usize,
    pub city_cursor: usize,
    pub region_cursor: usize,
    pub filter: String,
    pub status_message: Option<String>,
    pub list_ages: ListAges,
}

/// Case-insensitive substring match for pane filtering.
fn matches_filter(name: &str, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&filter.to_lowercase())
}

impl App {
    pub fn new(config: Config, store: RegionStore) -> Self {
        let list_ages = store.list_ages();
        let mut app = Self {
            store,
            config,
            state: AppState::Normal,
            level: Level::Province,
            province_cursor: 0,
            city_cursor: 0,
            region_cursor: 0,
            filter: String::new(),
            status_message: None,
            list_ages,
        };
        app.restore_last_selection();
        app
    }

    // ===== Visible lists =====

    fn filter_for(&self, level: Level) -> &str {
        if self.level == level {
            &self.filter
        } else {
            ""
        }
    }

    pub fn visible_provinces(&self) -> Vec<&Province> {
        let filter = self.filter_for(Level::Province);
        self.store
            .provinces()
            .iter()
            .filter(|p| matches_filter(&p.name, filter))
            .collect()
    }

    pub fn visible_cities(&self) -> Vec<&City> {
        let Some(province) = self.selected_province() else {
            return Vec::new();
        };
        let filter = self.filter_for(Level::City);
        self.store
            .cities_of(&province.code)
            .into_iter()
            .filter(|c| matches_filter(&c.name, filter))
            .collect()
    }

    pub fn visible_regions(&self) -> Vec<&Region> {
        let Some(city) = self.selected_city() else {
            return Vec::new();
        };
        let filter = self.filter_for(Level::Region);
        self.store
            .regions_of(&city.code)
            .into_iter()
            .filter(|r| matches_filter(&r.name, filter))
            .collect()
    }

    pub fn selected_province(&self) -> Option<&Province> {
        let filter = self.filter_for(Level::Province);
        self.store
            .provinces()
            .iter()
            .filter(|p| matches_filter(&p.name, filter))
            .nth(self.province_cursor)
    }

    pub fn selected_city(&self) -> Option<&City> {
        let province = self.selected_province()?;
        let filter = self.filter_for(Level::City);
        self.store
            .cities_of(&province.code)
            .into_iter()
            .filter(|c| matches_filter(&c.name, filter))
            .nth(self.city_cursor)
    }

    pub fn selected_region(&self) -> Option<&Region> {
        let city = self.selected_city()?;
        let filter = self.filter_for(Level::Region);
        self.store
            .regions_of(&city.code)
            .into_iter()
            .filter(|r| matches_filter(&r.name, filter))
            .nth(self.region_cursor)
    }

    /// The pick under the cursors, when all three panes have one.
    pub fn current_selection(&self) -> Option<Selection> {
        Some(Selection {
            province: self.selected_province()?.clone(),
            city: self.selected_city()?.clone(),
            region: self.selected_region()?.clone(),
        })
    }

    // ===== Navigation =====

    fn focused_len(&self) -> usize {
        match self.level {
            Level::Province => self.visible_provinces().len(),
            Level::City => self.visible_cities().len(),
            Level::Region => self.visible_regions().len(),
        }
    }

    fn focused_cursor_mut(&mut self) -> &mut usize {
        match self.level {
            Level::Province => &mut self.province_cursor,
            Level::City => &mut self.city_cursor,
            Level::Region => &mut self.region_cursor,
        }
    }

    pub fn focused_cursor(&self) -> usize {
        match self.level {
            Level::Province => self.province_cursor,
            Level::City => self.city_cursor,
            Level::Region => self.region_cursor,
        }
    }

    pub fn move_down(&mut self, step: usize) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let cursor = self.focused_cursor_mut();
        *cursor = (*cursor + step).min(len - 1);
        self.reset_children();
    }

    pub fn move_up(&mut self, step: usize) {
        let cursor = self.focused_cursor_mut();
        *cursor = cursor.saturating_sub(step);
        self.reset_children();
    }

    /// Moving a parent cursor invalidates the child cursors.
    fn reset_children(&mut self) {
        match self.level {
            Level::Province => {
                self.city_cursor = 0;
                self.region_cursor = 0;
            }
            Level::City => {
                self.region_cursor = 0;
            }
            Level::Region => {}
        }
    }

    /// Move focus one pane to the right. On the region pane this is a
    /// confirm instead (handled by the caller).
    pub fn descend(&mut self) {
        let next = match self.level {
            Level::Province => Level::City,
            Level::City => Level::Region,
            Level::Region => return,
        };
        let target_len = match next {
            Level::City => self.visible_cities().len(),
            Level::Region => self.visible_regions().len(),
            Level::Province => unreachable!(),
        };
        if target_len == 0 {
            self.status_message = Some(format!("No entries under this {}", self.level.title().to_lowercase()));
            return;
        }
        self.anchor_cursor();
        self.filter.clear();
        self.level = next;
    }

    /// Move focus one pane to the left.
    pub fn ascend(&mut self) {
        self.anchor_cursor();
        self.filter.clear();
        self.level = match self.level {
            Level::Province => Level::Province,
            Level::City => Level::Province,
            Level::Region => Level::City,
        };
    }

    /// The focused cursor indexes the filtered list. Before the filter is
    /// dropped on a pane change, translate it to the unfiltered index of
    /// the same record so the selection does not jump.
    fn anchor_cursor(&mut self) {
        if self.filter.is_empty() {
            return;
        }
        match self.level {
            Level::Province => {
                let code = self.selected_province().map(|p| p.code.clone());
                if let Some(code) = code {
                    if let Some(idx) = self.store.provinces().iter().position(|p| p.code == code) {
                        self.province_cursor = idx;
                    }
                }
            }
            Level::City => {
                let codes = self
                    .selected_city()
                    .map(|c| (c.province_code.clone(), c.code.clone()));
                if let Some((province_code, code)) = codes {
                    if let Some(idx) = self
                        .store
                        .cities_of(&province_code)
                        .iter()
                        .position(|c| c.code == code)
                    {
                        self.city_cursor = idx;
                    }
                }
            }
            Level::Region => {
                let codes = self
                    .selected_region()
                    .map(|r| (r.city_code.clone(), r.code.clone()));
                if let Some((city_code, code)) = codes {
                    if let Some(idx) = self
                        .store
                        .regions_of(&city_code)
                        .iter()
                        .position(|r| r.code == code)
                    {
                        self.region_cursor = idx;
                    }
                }
            }
        }
    }

    // ===== Filtering =====

    pub fn start_filter(&mut self) {
        self.state = AppState::Filtering;
        self.filter.clear();
        *self.focused_cursor_mut() = 0;
        self.reset_children();
    }

    pub fn push_filter_char(&mut self, c: char) {
        if self.filter.chars().count() >= MAX_FILTER_LENGTH {
            return;
        }
        self.filter.push(c);
        *self.focused_cursor_mut() = 0;
        self.reset_children();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        *self.focused_cursor_mut() = 0;
        self.reset_children();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        *self.focused_cursor_mut() = 0;
        self.reset_children();
    }

    // ===== Actions =====

    /// Confirm the current pick: remember it in config and persist.
    pub fn confirm(&mut self) -> Result<()> {
        let Some(selection) = self.current_selection() else {
            self.status_message = Some("Nothing to select here".to_string());
            return Ok(());
        };

        self.config.last_selection = Some(selection.saved());
        match self.config.save() {
            Ok(()) => {
                info!(selection = %selection.display(), "selection saved");
                self.status_message = Some(format!("Saved: {}", selection.display()));
            }
            Err(e) => {
                warn!(error = %e, "failed to save config");
                self.status_message = Some(format!("Failed to save selection: {}", e));
            }
        }
        Ok(())
    }

    /// Re-read the division lists from disk.
    pub fn reload(&mut self) {
        match self.store.read_all() {
            Ok(true) => {
                self.status_message = Some("Reloaded division lists from disk".to_string());
            }
            Ok(false) => {
                self.status_message = Some("Some lists have never been written".to_string());
            }
            Err(e) => {
                warn!(error = %e, "failed to reload lists");
                self.status_message = Some(format!("Reload failed: {}", e));
            }
        }
        self.level = Level::Province;
        self.province_cursor = 0;
        self.city_cursor = 0;
        self.region_cursor = 0;
        self.filter.clear();
        self.list_ages = self.store.list_ages();
    }

    /// Position the cursors on the selection stored in config, when it
    /// still resolves against the current lists.
    fn restore_last_selection(&mut self) {
        let Some(saved) = self.config.last_selection.clone() else {
            return;
        };
        let Some(selection) = self.store.selection(
            &saved.province_code,
            &saved.city_code,
            &saved.region_code,
        ) else {
            return;
        };

        let province_idx = self
            .store
            .provinces()
            .iter()
            .position(|p| p.code == saved.province_code);
        let city_idx = self
            .store
            .cities_of(&saved.province_code)
            .iter()
            .position(|c| c.code == saved.city_code);
        let region_idx = self
            .store
            .regions_of(&saved.city_code)
            .iter()
            .position(|r| r.code == saved.region_code);

        if let (Some(p), Some(c), Some(r)) = (province_idx, city_idx, region_idx) {
            self.province_cursor = p;
            self.city_cursor = c;
            self.region_cursor = r;
            self.status_message = Some(format!("Last pick: {}", selection.display()));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
