use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::{
    CreateDistrictDto, CreateProvinceDto, CreateRegencyDto, CreateVillageDto, RegionCountsDto,
    RenameRegionDto,
};
use crate::features::regions::models::{District, Province, Regency, Village};
use crate::features::regions::stores::{PgRegionStore, RegionStore};
use crate::shared::constants::SEARCH_RESULT_LIMIT;

/// Treat an empty search filter as no filter
fn search_filter(search: Option<&str>) -> Option<&str> {
    search.filter(|term| !term.is_empty())
}

fn required_search_term(search: &str) -> Result<&str> {
    if search.is_empty() {
        return Err(AppError::Validation(
            "Search parameter 'search' is required".to_string(),
        ));
    }
    Ok(search)
}

/// Service for managing Indonesian administrative regions
pub struct RegionService {
    store: Arc<dyn RegionStore>,
}

impl RegionService {
    pub fn new(store: Arc<dyn RegionStore>) -> Self {
        Self { store }
    }

    /// Service backed by the Postgres region tables
    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgRegionStore::new(pool)))
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Number of stored regions per level
    pub async fn count_regions(&self) -> Result<RegionCountsDto> {
        self.store.count_regions().await
    }

    // ==================== Province Methods ====================

    pub async fn create_province(&self, dto: CreateProvinceDto) -> Result<Province> {
        dto.validate()?;
        // `required` validation guarantees the name is present
        let name = dto.name.unwrap_or_default();
        let province = self.store.insert_province(&name).await?;

        tracing::info!("Province created: id={}, name={}", province.id, province.name);
        Ok(province)
    }

    /// Get a province by its id
    pub async fn get_province(&self, id: Uuid) -> Result<Province> {
        self.store
            .find_province(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Province with id '{}' not found", id)))
    }

    /// List all provinces with optional search
    pub async fn list_provinces(&self, search: Option<&str>) -> Result<Vec<Province>> {
        self.store.list_provinces(search_filter(search)).await
    }

    pub async fn rename_province(&self, id: Uuid, dto: RenameRegionDto) -> Result<Province> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let province = self
            .store
            .rename_province(id, &name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Province with id '{}' not found", id)))?;

        tracing::info!("Province renamed: id={}, name={}", province.id, province.name);
        Ok(province)
    }

    /// Delete a province together with its regencies, districts and villages
    pub async fn delete_province(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_province(id).await? {
            return Err(AppError::NotFound(format!(
                "Province with id '{}' not found",
                id
            )));
        }

        tracing::info!("Province deleted with descendants: id={}", id);
        Ok(())
    }

    // ==================== Regency Methods ====================

    pub async fn create_regency(&self, dto: CreateRegencyDto) -> Result<Regency> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let regency = self.store.insert_regency(&name, dto.province_id).await?;

        tracing::info!(
            "Regency created: id={}, name={}, province_id={}",
            regency.id,
            regency.name,
            regency.province_id
        );
        Ok(regency)
    }

    /// Get a regency by its id
    pub async fn get_regency(&self, id: Uuid) -> Result<Regency> {
        self.store
            .find_regency(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Regency with id '{}' not found", id)))
    }

    /// List all regencies in a province with optional search
    pub async fn list_regencies_by_province(
        &self,
        province_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Regency>> {
        // First verify the province exists
        let province = self.get_province(province_id).await?;

        self.store
            .list_regencies(province.id, search_filter(search))
            .await
    }

    /// Search regencies across all provinces
    pub async fn search_regencies(&self, search: &str) -> Result<Vec<Regency>> {
        let term = required_search_term(search)?;
        self.store.search_regencies(term, SEARCH_RESULT_LIMIT).await
    }

    pub async fn rename_regency(&self, id: Uuid, dto: RenameRegionDto) -> Result<Regency> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let regency = self
            .store
            .rename_regency(id, &name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Regency with id '{}' not found", id)))?;

        tracing::info!("Regency renamed: id={}, name={}", regency.id, regency.name);
        Ok(regency)
    }

    /// Move a regency under another province
    pub async fn reparent_regency(&self, id: Uuid, province_id: Uuid) -> Result<Regency> {
        let regency = self
            .store
            .reparent_regency(id, province_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Regency with id '{}' not found", id)))?;

        tracing::info!(
            "Regency reparented: id={}, province_id={}",
            regency.id,
            regency.province_id
        );
        Ok(regency)
    }

    /// Delete a regency together with its districts and villages
    pub async fn delete_regency(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_regency(id).await? {
            return Err(AppError::NotFound(format!(
                "Regency with id '{}' not found",
                id
            )));
        }

        tracing::info!("Regency deleted with descendants: id={}", id);
        Ok(())
    }

    // ==================== District Methods ====================

    pub async fn create_district(&self, dto: CreateDistrictDto) -> Result<District> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let district = self.store.insert_district(&name, dto.regency_id).await?;

        tracing::info!(
            "District created: id={}, name={}, regency_id={}",
            district.id,
            district.name,
            district.regency_id
        );
        Ok(district)
    }

    /// Get a district by its id
    pub async fn get_district(&self, id: Uuid) -> Result<District> {
        self.store
            .find_district(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("District with id '{}' not found", id)))
    }

    /// List all districts in a regency with optional search
    pub async fn list_districts_by_regency(
        &self,
        regency_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<District>> {
        // First verify the regency exists
        let regency = self.get_regency(regency_id).await?;

        self.store
            .list_districts(regency.id, search_filter(search))
            .await
    }

    /// Search districts across all regencies
    pub async fn search_districts(&self, search: &str) -> Result<Vec<District>> {
        let term = required_search_term(search)?;
        self.store.search_districts(term, SEARCH_RESULT_LIMIT).await
    }

    pub async fn rename_district(&self, id: Uuid, dto: RenameRegionDto) -> Result<District> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let district = self
            .store
            .rename_district(id, &name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("District with id '{}' not found", id)))?;

        tracing::info!("District renamed: id={}, name={}", district.id, district.name);
        Ok(district)
    }

    /// Move a district under another regency
    pub async fn reparent_district(&self, id: Uuid, regency_id: Uuid) -> Result<District> {
        let district = self
            .store
            .reparent_district(id, regency_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("District with id '{}' not found", id)))?;

        tracing::info!(
            "District reparented: id={}, regency_id={}",
            district.id,
            district.regency_id
        );
        Ok(district)
    }

    /// Delete a district together with its villages
    pub async fn delete_district(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_district(id).await? {
            return Err(AppError::NotFound(format!(
                "District with id '{}' not found",
                id
            )));
        }

        tracing::info!("District deleted with descendants: id={}", id);
        Ok(())
    }

    // ==================== Village Methods ====================

    pub async fn create_village(&self, dto: CreateVillageDto) -> Result<Village> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let village = self.store.insert_village(&name, dto.district_id).await?;

        tracing::info!(
            "Village created: id={}, name={}, district_id={}",
            village.id,
            village.name,
            village.district_id
        );
        Ok(village)
    }

    /// Get a village by its id
    pub async fn get_village(&self, id: Uuid) -> Result<Village> {
        self.store
            .find_village(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Village with id '{}' not found", id)))
    }

    /// List all villages in a district with optional search
    pub async fn list_villages_by_district(
        &self,
        district_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Village>> {
        // First verify the district exists
        let district = self.get_district(district_id).await?;

        self.store
            .list_villages(district.id, search_filter(search))
            .await
    }

    /// Search villages across all districts
    pub async fn search_villages(&self, search: &str) -> Result<Vec<Village>> {
        let term = required_search_term(search)?;
        self.store.search_villages(term, SEARCH_RESULT_LIMIT).await
    }

    pub async fn rename_village(&self, id: Uuid, dto: RenameRegionDto) -> Result<Village> {
        dto.validate()?;
        let name = dto.name.unwrap_or_default();
        let village = self
            .store
            .rename_village(id, &name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Village with id '{}' not found", id)))?;

        tracing::info!("Village renamed: id={}, name={}", village.id, village.name);
        Ok(village)
    }

    /// Move a village under another district
    pub async fn reparent_village(&self, id: Uuid, district_id: Uuid) -> Result<Village> {
        let village = self
            .store
            .reparent_village(id, district_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Village with id '{}' not found", id)))?;

        tracing::info!(
            "Village reparented: id={}, district_id={}",
            village.id,
            village.district_id
        );
        Ok(village)
    }

    pub async fn delete_village(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_village(id).await? {
            return Err(AppError::NotFound(format!(
                "Village with id '{}' not found",
                id
            )));
        }

        tracing::info!("Village deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::NAME_MAX_LENGTH;
    use crate::shared::test_helpers::{
        district_dto, memory_region_service, province_dto, regency_dto, seed_hierarchy,
        village_dto,
    };

    fn rename(name: &str) -> RenameRegionDto {
        RenameRegionDto {
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_display_string_is_name() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;

        assert_eq!(seeded.province.to_string(), seeded.province.name);
        assert_eq!(seeded.regency.to_string(), seeded.regency.name);
        assert_eq!(seeded.district.to_string(), seeded.district.name);
        assert_eq!(seeded.village.to_string(), seeded.village.name);
    }

    #[tokio::test]
    async fn test_create_child_requires_existing_parent() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        let missing = Uuid::now_v7();

        let regency = service.create_regency(regency_dto(missing)).await;
        assert!(matches!(regency, Err(AppError::ReferentialIntegrity(_))));
        let district = service.create_district(district_dto(missing)).await;
        assert!(matches!(district, Err(AppError::ReferentialIntegrity(_))));
        let village = service.create_village(village_dto(missing)).await;
        assert!(matches!(village, Err(AppError::ReferentialIntegrity(_))));

        let regency = service
            .create_regency(regency_dto(seeded.province.id))
            .await
            .unwrap();
        assert_eq!(regency.province_id, seeded.province.id);

        let counts = service.count_regions().await.unwrap();
        assert_eq!(
            counts,
            RegionCountsDto {
                provinces: 1,
                regencies: 2,
                districts: 1,
                villages: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_delete_province_cascades_through_every_level() {
        let service = memory_region_service();
        let province = service.create_province(province_dto()).await.unwrap();
        let r1 = service
            .create_regency(regency_dto(province.id))
            .await
            .unwrap();
        let r2 = service
            .create_regency(regency_dto(province.id))
            .await
            .unwrap();
        let d1 = service.create_district(district_dto(r1.id)).await.unwrap();
        let v1 = service.create_village(village_dto(d1.id)).await.unwrap();
        let other = seed_hierarchy(&service).await;

        service.delete_province(province.id).await.unwrap();

        assert!(matches!(
            service.get_province(province.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_regency(r1.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_regency(r2.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_district(d1.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_village(v1.id).await,
            Err(AppError::NotFound(_))
        ));

        // Unrelated hierarchy is untouched
        assert_eq!(service.get_village(other.village.id).await.unwrap(), other.village);
        let counts = service.count_regions().await.unwrap();
        assert_eq!(counts.provinces, 1);
        assert_eq!(counts.regencies, 1);
        assert_eq!(counts.districts, 1);
        assert_eq!(counts.villages, 1);
    }

    #[tokio::test]
    async fn test_delete_regency_keeps_parent_and_siblings() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        let sibling = service
            .create_regency(regency_dto(seeded.province.id))
            .await
            .unwrap();

        service.delete_regency(seeded.regency.id).await.unwrap();

        assert!(service.get_province(seeded.province.id).await.is_ok());
        assert!(service.get_district(seeded.district.id).await.is_err());
        assert!(service.get_village(seeded.village.id).await.is_err());
        let remaining = service
            .list_regencies_by_province(seeded.province.id, None)
            .await
            .unwrap();
        assert_eq!(remaining, vec![sibling]);
    }

    #[tokio::test]
    async fn test_rename_changes_only_name() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;

        let renamed = service
            .rename_regency(seeded.regency.id, rename("Kota Surakarta"))
            .await
            .unwrap();

        assert_eq!(renamed.id, seeded.regency.id);
        assert_eq!(renamed.name, "Kota Surakarta");
        assert_eq!(renamed.province_id, seeded.regency.province_id);
        assert_eq!(renamed.created_at, seeded.regency.created_at);

        let children = service
            .list_districts_by_regency(seeded.regency.id, None)
            .await
            .unwrap();
        assert_eq!(children, vec![seeded.district]);
    }

    #[tokio::test]
    async fn test_create_village_under_deleted_district_fails() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;

        service.delete_district(seeded.district.id).await.unwrap();

        let result = service.create_village(village_dto(seeded.district.id)).await;
        assert!(matches!(result, Err(AppError::ReferentialIntegrity(_))));
    }

    #[tokio::test]
    async fn test_name_length_bound_on_every_level() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        let exact = "x".repeat(NAME_MAX_LENGTH);
        let over = "x".repeat(NAME_MAX_LENGTH + 1);

        let province = service
            .create_province(CreateProvinceDto {
                name: Some(exact.clone()),
            })
            .await
            .unwrap();
        assert_eq!(province.name.chars().count(), 200);

        let result = service
            .create_province(CreateProvinceDto {
                name: Some(over.clone()),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service
            .create_regency(CreateRegencyDto {
                name: Some(over.clone()),
                province_id: seeded.province.id,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service
            .create_district(CreateDistrictDto {
                name: Some(over.clone()),
                regency_id: seeded.regency.id,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service
            .create_village(CreateVillageDto {
                name: Some(over.clone()),
                district_id: seeded.district.id,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service
            .rename_village(seeded.village.id, rename(&over))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        let village = service
            .rename_village(seeded.village.id, rename(&exact))
            .await
            .unwrap();
        assert_eq!(village.name, exact);
    }

    #[tokio::test]
    async fn test_validation_runs_before_integrity_check() {
        let service = memory_region_service();

        let result = service
            .create_regency(CreateRegencyDto {
                name: None,
                province_id: Uuid::now_v7(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_absent_name_creates_nothing() {
        let service = memory_region_service();

        let result = service.create_province(CreateProvinceDto { name: None }).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(
            service.count_regions().await.unwrap(),
            RegionCountsDto::default()
        );
    }

    #[tokio::test]
    async fn test_empty_name_is_allowed() {
        let service = memory_region_service();
        let province = service
            .create_province(CreateProvinceDto {
                name: Some(String::new()),
            })
            .await
            .unwrap();

        assert_eq!(province.to_string(), "");
    }

    #[tokio::test]
    async fn test_list_children_of_childless_province_is_empty() {
        let service = memory_region_service();
        let province = service.create_province(province_dto()).await.unwrap();

        let regencies = service
            .list_regencies_by_province(province.id, None)
            .await
            .unwrap();
        assert!(regencies.is_empty());
    }

    #[tokio::test]
    async fn test_list_children_of_missing_parent_is_not_found() {
        let service = memory_region_service();

        let result = service.list_villages_by_district(Uuid::now_v7(), None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reparent_moves_subtree() {
        let service = memory_region_service();
        let source = seed_hierarchy(&service).await;
        let target = service.create_province(province_dto()).await.unwrap();

        let moved = service
            .reparent_regency(source.regency.id, target.id)
            .await
            .unwrap();
        assert_eq!(moved.province_id, target.id);
        assert_eq!(moved.name, source.regency.name);

        let under_source = service
            .list_regencies_by_province(source.province.id, None)
            .await
            .unwrap();
        assert!(under_source.is_empty());

        // Deleting the new parent takes the moved subtree with it
        service.delete_province(target.id).await.unwrap();
        assert!(service.get_village(source.village.id).await.is_err());
        assert!(service.get_province(source.province.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_reparent_to_missing_parent_leaves_record_unchanged() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;

        let result = service
            .reparent_village(seeded.village.id, Uuid::now_v7())
            .await;
        assert!(matches!(result, Err(AppError::ReferentialIntegrity(_))));

        let village = service.get_village(seeded.village.id).await.unwrap();
        assert_eq!(village, seeded.village);
    }

    #[tokio::test]
    async fn test_operations_on_missing_records_are_not_found() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        let missing = Uuid::now_v7();

        assert!(matches!(
            service.rename_province(missing, rename("Bali")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.reparent_district(missing, seeded.regency.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_village(missing).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_regency(missing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sibling_names_need_not_be_unique() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        let dto = || CreateDistrictDto {
            name: Some("Kota Baru".to_string()),
            regency_id: seeded.regency.id,
        };

        let first = service.create_district(dto()).await.unwrap();
        let second = service.create_district(dto()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_parents() {
        let service = memory_region_service();
        let a = seed_hierarchy(&service).await;
        let b = seed_hierarchy(&service).await;
        service
            .rename_village(a.village.id, rename("Desa Sukamaju"))
            .await
            .unwrap();
        service
            .rename_village(b.village.id, rename("Kelurahan SUKAMAJU Timur"))
            .await
            .unwrap();

        let found = service.search_villages("sukamaju").await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a.village.id));
        assert!(ids.contains(&b.village.id));
    }

    #[tokio::test]
    async fn test_search_requires_term() {
        let service = memory_region_service();

        assert!(matches!(
            service.search_regencies("").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_search_is_capped() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        for i in 0..SEARCH_RESULT_LIMIT + 5 {
            service
                .create_district(CreateDistrictDto {
                    name: Some(format!("Kecamatan {}", i)),
                    regency_id: seeded.regency.id,
                })
                .await
                .unwrap();
        }

        let found = service.search_districts("kecamatan").await.unwrap();
        assert_eq!(found.len(), SEARCH_RESULT_LIMIT);
    }

    #[tokio::test]
    async fn test_list_filter_and_empty_filter() {
        let service = memory_region_service();
        let seeded = seed_hierarchy(&service).await;
        let extra = service
            .create_regency(CreateRegencyDto {
                name: Some("Kabupaten Gunungkidul".to_string()),
                province_id: seeded.province.id,
            })
            .await
            .unwrap();

        let filtered = service
            .list_regencies_by_province(seeded.province.id, Some("GUNUNG"))
            .await
            .unwrap();
        assert_eq!(filtered, vec![extra]);

        let unfiltered = service
            .list_regencies_by_province(seeded.province.id, Some(""))
            .await
            .unwrap();
        assert_eq!(unfiltered.len(), 2);
    }

    #[test]
    fn test_store_name_blocking() {
        let service = memory_region_service();
        let counts = tokio_test::block_on(service.count_regions()).unwrap();

        assert_eq!(service.store_name(), "memory");
        assert_eq!(counts, RegionCountsDto::default());
    }
}
