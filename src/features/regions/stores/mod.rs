//! Storage engines for the region hierarchy.
//!
//! [`RegionStore`] is the boundary between [`RegionService`] and whatever
//! holds the durable records. An engine must:
//!
//! - assign the identifier and creation time of every new record,
//! - reject writes whose parent reference does not resolve with
//!   [`AppError::ReferentialIntegrity`],
//! - cascade deletes through every level below the deleted record,
//! - apply each operation atomically.
//!
//! Lookups that miss return `None` (or `false` for deletes); the service turns
//! those into [`AppError::NotFound`].
//!
//! [`RegionService`]: crate::features::regions::RegionService
//! [`AppError::ReferentialIntegrity`]: crate::core::error::AppError::ReferentialIntegrity
//! [`AppError::NotFound`]: crate::core::error::AppError::NotFound

mod memory_store;
mod postgres_store;

pub use memory_store::MemoryRegionStore;
pub use postgres_store::PgRegionStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::regions::dtos::RegionCountsDto;
use crate::features::regions::models::{District, Province, Regency, Village};

#[async_trait]
pub trait RegionStore: Send + Sync {
    /// Engine name used in logs
    fn name(&self) -> &'static str;

    // ==================== Province ====================

    async fn insert_province(&self, name: &str) -> Result<Province>;

    async fn find_province(&self, id: Uuid) -> Result<Option<Province>>;

    async fn list_provinces(&self, search: Option<&str>) -> Result<Vec<Province>>;

    async fn rename_province(&self, id: Uuid, name: &str) -> Result<Option<Province>>;

    /// Delete a province with all of its regencies, districts and villages
    async fn delete_province(&self, id: Uuid) -> Result<bool>;

    // ==================== Regency ====================

    async fn insert_regency(&self, name: &str, province_id: Uuid) -> Result<Regency>;

    async fn find_regency(&self, id: Uuid) -> Result<Option<Regency>>;

    async fn list_regencies(&self, province_id: Uuid, search: Option<&str>)
        -> Result<Vec<Regency>>;

    async fn search_regencies(&self, term: &str, limit: usize) -> Result<Vec<Regency>>;

    async fn rename_regency(&self, id: Uuid, name: &str) -> Result<Option<Regency>>;

    async fn reparent_regency(&self, id: Uuid, province_id: Uuid) -> Result<Option<Regency>>;

    async fn delete_regency(&self, id: Uuid) -> Result<bool>;

    // ==================== District ====================

    async fn insert_district(&self, name: &str, regency_id: Uuid) -> Result<District>;

    async fn find_district(&self, id: Uuid) -> Result<Option<District>>;

    async fn list_districts(&self, regency_id: Uuid, search: Option<&str>)
        -> Result<Vec<District>>;

    async fn search_districts(&self, term: &str, limit: usize) -> Result<Vec<District>>;

    async fn rename_district(&self, id: Uuid, name: &str) -> Result<Option<District>>;

    async fn reparent_district(&self, id: Uuid, regency_id: Uuid) -> Result<Option<District>>;

    async fn delete_district(&self, id: Uuid) -> Result<bool>;

    // ==================== Village ====================

    async fn insert_village(&self, name: &str, district_id: Uuid) -> Result<Village>;

    async fn find_village(&self, id: Uuid) -> Result<Option<Village>>;

    async fn list_villages(&self, district_id: Uuid, search: Option<&str>)
        -> Result<Vec<Village>>;

    async fn search_villages(&self, term: &str, limit: usize) -> Result<Vec<Village>>;

    async fn rename_village(&self, id: Uuid, name: &str) -> Result<Option<Village>>;

    async fn reparent_village(&self, id: Uuid, district_id: Uuid) -> Result<Option<Village>>;

    async fn delete_village(&self, id: Uuid) -> Result<bool>;

    // ==================== Summary ====================

    async fn count_regions(&self) -> Result<RegionCountsDto>;
}
