//! In-process engine for the region hierarchy.
//!
//! Holds every table in one map set behind a single [`RwLock`], so each
//! operation is atomic. There are no database foreign keys here: parent
//! existence is checked on every write and cascading deletes walk the
//! hierarchy explicitly, removing each level's descendants before the
//! level itself.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wilayah_core::features::regions::{MemoryRegionStore, RegionService};
//!
//! let service = RegionService::new(Arc::new(MemoryRegionStore::new()));
//! ```

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::RegionCountsDto;
use crate::features::regions::models::{District, Province, Regency, Village};
use crate::features::regions::stores::RegionStore;

#[derive(Debug, Default)]
struct Tables {
    provinces: HashMap<Uuid, Province>,
    regencies: HashMap<Uuid, Regency>,
    districts: HashMap<Uuid, District>,
    villages: HashMap<Uuid, Village>,
}

impl Tables {
    fn require_province(&self, id: Uuid) -> Result<()> {
        if self.provinces.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::ReferentialIntegrity(
                "Referenced province does not exist".to_string(),
            ))
        }
    }

    fn require_regency(&self, id: Uuid) -> Result<()> {
        if self.regencies.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::ReferentialIntegrity(
                "Referenced regency does not exist".to_string(),
            ))
        }
    }

    fn require_district(&self, id: Uuid) -> Result<()> {
        if self.districts.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::ReferentialIntegrity(
                "Referenced district does not exist".to_string(),
            ))
        }
    }

    fn remove_provinces(&mut self, ids: &HashSet<Uuid>) {
        let regencies = self
            .regencies
            .values()
            .filter(|r| ids.contains(&r.province_id))
            .map(|r| r.id)
            .collect::<HashSet<_>>();
        self.remove_regencies(&regencies);
        self.provinces.retain(|id, _| !ids.contains(id));
    }

    fn remove_regencies(&mut self, ids: &HashSet<Uuid>) {
        let districts = self
            .districts
            .values()
            .filter(|d| ids.contains(&d.regency_id))
            .map(|d| d.id)
            .collect::<HashSet<_>>();
        self.remove_districts(&districts);
        self.regencies.retain(|id, _| !ids.contains(id));
    }

    fn remove_districts(&mut self, ids: &HashSet<Uuid>) {
        self.villages.retain(|_, v| !ids.contains(&v.district_id));
        self.districts.retain(|id, _| !ids.contains(id));
    }

    fn counts(&self) -> RegionCountsDto {
        RegionCountsDto {
            provinces: self.provinces.len() as i64,
            regencies: self.regencies.len() as i64,
            districts: self.districts.len() as i64,
            villages: self.villages.len() as i64,
        }
    }
}

fn name_matches(name: &str, search: Option<&str>) -> bool {
    match search {
        Some(term) => name.to_lowercase().contains(&term.to_lowercase()),
        None => true,
    }
}

/// Sort key shared by every region level: name, then id.
trait SortKey {
    fn sort_key(&self) -> (&str, Uuid);
}

impl SortKey for Province {
    fn sort_key(&self) -> (&str, Uuid) {
        (&self.name, self.id)
    }
}

impl SortKey for Regency {
    fn sort_key(&self) -> (&str, Uuid) {
        (&self.name, self.id)
    }
}

impl SortKey for District {
    fn sort_key(&self) -> (&str, Uuid) {
        (&self.name, self.id)
    }
}

impl SortKey for Village {
    fn sort_key(&self) -> (&str, Uuid) {
        (&self.name, self.id)
    }
}

fn sorted<T: SortKey>(mut rows: Vec<T>) -> Vec<T> {
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    rows
}

#[derive(Debug, Clone, Copy)]
enum Level {
    Province,
    Regency,
    District,
    Village,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Province => "province",
            Level::Regency => "regency",
            Level::District => "district",
            Level::Village => "village",
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryRegionStore {
    tables: RwLock<Tables>,
}

impl MemoryRegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn delete_cascading(&self, level: Level, id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.counts();
        let ids = HashSet::from([id]);

        let found = match level {
            Level::Province if tables.provinces.contains_key(&id) => {
                tables.remove_provinces(&ids);
                true
            }
            Level::Regency if tables.regencies.contains_key(&id) => {
                tables.remove_regencies(&ids);
                true
            }
            Level::District if tables.districts.contains_key(&id) => {
                tables.remove_districts(&ids);
                true
            }
            Level::Village => tables.villages.remove(&id).is_some(),
            _ => false,
        };

        if found {
            let after = tables.counts();
            tracing::debug!(
                "Cascade from {} {} removed {} regencies, {} districts, {} villages",
                level.as_str(),
                id,
                before.regencies - after.regencies,
                before.districts - after.districts,
                before.villages - after.villages
            );
        }
        found
    }
}

#[async_trait]
impl RegionStore for MemoryRegionStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    // ==================== Province ====================

    async fn insert_province(&self, name: &str) -> Result<Province> {
        let province = Province {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let mut tables = self.tables.write().await;
        tables.provinces.insert(province.id, province.clone());
        Ok(province)
    }

    async fn find_province(&self, id: Uuid) -> Result<Option<Province>> {
        Ok(self.tables.read().await.provinces.get(&id).cloned())
    }

    async fn list_provinces(&self, search: Option<&str>) -> Result<Vec<Province>> {
        let tables = self.tables.read().await;
        let rows = tables
            .provinces
            .values()
            .filter(|p| name_matches(&p.name, search))
            .cloned()
            .collect::<Vec<_>>();
        Ok(sorted(rows))
    }

    async fn rename_province(&self, id: Uuid, name: &str) -> Result<Option<Province>> {
        let mut tables = self.tables.write().await;
        Ok(tables.provinces.get_mut(&id).map(|p| {
            p.name = name.to_string();
            p.clone()
        }))
    }

    async fn delete_province(&self, id: Uuid) -> Result<bool> {
        Ok(self.delete_cascading(Level::Province, id).await)
    }

    // ==================== Regency ====================

    async fn insert_regency(&self, name: &str, province_id: Uuid) -> Result<Regency> {
        let mut tables = self.tables.write().await;
        tables.require_province(province_id)?;

        let regency = Regency {
            id: Uuid::now_v7(),
            name: name.to_string(),
            province_id,
            created_at: Utc::now(),
        };
        tables.regencies.insert(regency.id, regency.clone());
        Ok(regency)
    }

    async fn find_regency(&self, id: Uuid) -> Result<Option<Regency>> {
        Ok(self.tables.read().await.regencies.get(&id).cloned())
    }

    async fn list_regencies(
        &self,
        province_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Regency>> {
        let tables = self.tables.read().await;
        let rows = tables
            .regencies
            .values()
            .filter(|r| r.province_id == province_id && name_matches(&r.name, search))
            .cloned()
            .collect::<Vec<_>>();
        Ok(sorted(rows))
    }

    async fn search_regencies(&self, term: &str, limit: usize) -> Result<Vec<Regency>> {
        let tables = self.tables.read().await;
        let rows = tables
            .regencies
            .values()
            .filter(|r| name_matches(&r.name, Some(term)))
            .cloned()
            .collect::<Vec<_>>();
        let mut rows = sorted(rows);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn rename_regency(&self, id: Uuid, name: &str) -> Result<Option<Regency>> {
        let mut tables = self.tables.write().await;
        Ok(tables.regencies.get_mut(&id).map(|r| {
            r.name = name.to_string();
            r.clone()
        }))
    }

    async fn reparent_regency(&self, id: Uuid, province_id: Uuid) -> Result<Option<Regency>> {
        let mut tables = self.tables.write().await;
        if !tables.regencies.contains_key(&id) {
            return Ok(None);
        }
        tables.require_province(province_id)?;

        Ok(tables.regencies.get_mut(&id).map(|r| {
            r.province_id = province_id;
            r.clone()
        }))
    }

    async fn delete_regency(&self, id: Uuid) -> Result<bool> {
        Ok(self.delete_cascading(Level::Regency, id).await)
    }

    // ==================== District ====================

    async fn insert_district(&self, name: &str, regency_id: Uuid) -> Result<District> {
        let mut tables = self.tables.write().await;
        tables.require_regency(regency_id)?;

        let district = District {
            id: Uuid::now_v7(),
            name: name.to_string(),
            regency_id,
            created_at: Utc::now(),
        };
        tables.districts.insert(district.id, district.clone());
        Ok(district)
    }

    async fn find_district(&self, id: Uuid) -> Result<Option<District>> {
        Ok(self.tables.read().await.districts.get(&id).cloned())
    }

    async fn list_districts(
        &self,
        regency_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<District>> {
        let tables = self.tables.read().await;
        let rows = tables
            .districts
            .values()
            .filter(|d| d.regency_id == regency_id && name_matches(&d.name, search))
            .cloned()
            .collect::<Vec<_>>();
        Ok(sorted(rows))
    }

    async fn search_districts(&self, term: &str, limit: usize) -> Result<Vec<District>> {
        let tables = self.tables.read().await;
        let rows = tables
            .districts
            .values()
            .filter(|d| name_matches(&d.name, Some(term)))
            .cloned()
            .collect::<Vec<_>>();
        let mut rows = sorted(rows);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn rename_district(&self, id: Uuid, name: &str) -> Result<Option<District>> {
        let mut tables = self.tables.write().await;
        Ok(tables.districts.get_mut(&id).map(|d| {
            d.name = name.to_string();
            d.clone()
        }))
    }

    async fn reparent_district(&self, id: Uuid, regency_id: Uuid) -> Result<Option<District>> {
        let mut tables = self.tables.write().await;
        if !tables.districts.contains_key(&id) {
            return Ok(None);
        }
        tables.require_regency(regency_id)?;

        Ok(tables.districts.get_mut(&id).map(|d| {
            d.regency_id = regency_id;
            d.clone()
        }))
    }

    async fn delete_district(&self, id: Uuid) -> Result<bool> {
        Ok(self.delete_cascading(Level::District, id).await)
    }

    // ==================== Village ====================

    async fn insert_village(&self, name: &str, district_id: Uuid) -> Result<Village> {
        let mut tables = self.tables.write().await;
        tables.require_district(district_id)?;

        let village = Village {
            id: Uuid::now_v7(),
            name: name.to_string(),
            district_id,
            created_at: Utc::now(),
        };
        tables.villages.insert(village.id, village.clone());
        Ok(village)
    }

    async fn find_village(&self, id: Uuid) -> Result<Option<Village>> {
        Ok(self.tables.read().await.villages.get(&id).cloned())
    }

    async fn list_villages(
        &self,
        district_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Village>> {
        let tables = self.tables.read().await;
        let rows = tables
            .villages
            .values()
            .filter(|v| v.district_id == district_id && name_matches(&v.name, search))
            .cloned()
            .collect::<Vec<_>>();
        Ok(sorted(rows))
    }

    async fn search_villages(&self, term: &str, limit: usize) -> Result<Vec<Village>> {
        let tables = self.tables.read().await;
        let rows = tables
            .villages
            .values()
            .filter(|v| name_matches(&v.name, Some(term)))
            .cloned()
            .collect::<Vec<_>>();
        let mut rows = sorted(rows);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn rename_village(&self, id: Uuid, name: &str) -> Result<Option<Village>> {
        let mut tables = self.tables.write().await;
        Ok(tables.villages.get_mut(&id).map(|v| {
            v.name = name.to_string();
            v.clone()
        }))
    }

    async fn reparent_village(&self, id: Uuid, district_id: Uuid) -> Result<Option<Village>> {
        let mut tables = self.tables.write().await;
        if !tables.villages.contains_key(&id) {
            return Ok(None);
        }
        tables.require_district(district_id)?;

        Ok(tables.villages.get_mut(&id).map(|v| {
            v.district_id = district_id;
            v.clone()
        }))
    }

    async fn delete_village(&self, id: Uuid) -> Result<bool> {
        Ok(self.delete_cascading(Level::Village, id).await)
    }

    // ==================== Summary ====================

    async fn count_regions(&self) -> Result<RegionCountsDto> {
        Ok(self.tables.read().await.counts())
    }
}
