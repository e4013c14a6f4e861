#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use fake::{
    faker::address::en::{CityName, StateName, StreetName},
    Fake,
};

#[cfg(test)]
use crate::features::regions::dtos::{
    CreateDistrictDto, CreateProvinceDto, CreateRegencyDto, CreateVillageDto,
};
#[cfg(test)]
use crate::features::regions::models::{District, Province, Regency, Village};
#[cfg(test)]
use crate::features::regions::{MemoryRegionStore, RegionService};

/// One record per level, each the child of the previous one
#[cfg(test)]
pub struct SeededHierarchy {
    pub province: Province,
    pub regency: Regency,
    pub district: District,
    pub village: Village,
}

#[cfg(test)]
pub fn memory_region_service() -> RegionService {
    RegionService::new(Arc::new(MemoryRegionStore::new()))
}

#[cfg(test)]
pub fn province_dto() -> CreateProvinceDto {
    CreateProvinceDto {
        name: Some(StateName().fake()),
    }
}

#[cfg(test)]
pub fn regency_dto(province_id: uuid::Uuid) -> CreateRegencyDto {
    CreateRegencyDto {
        name: Some(CityName().fake()),
        province_id,
    }
}

#[cfg(test)]
pub fn district_dto(regency_id: uuid::Uuid) -> CreateDistrictDto {
    CreateDistrictDto {
        name: Some(StreetName().fake()),
        regency_id,
    }
}

#[cfg(test)]
pub fn village_dto(district_id: uuid::Uuid) -> CreateVillageDto {
    CreateVillageDto {
        name: Some(StreetName().fake()),
        district_id,
    }
}

#[cfg(test)]
pub async fn seed_hierarchy(service: &RegionService) -> SeededHierarchy {
    let province = service.create_province(province_dto()).await.unwrap();
    let regency = service
        .create_regency(regency_dto(province.id))
        .await
        .unwrap();
    let district = service
        .create_district(district_dto(regency.id))
        .await
        .unwrap();
    let village = service
        .create_village(village_dto(district.id))
        .await
        .unwrap();

    SeededHierarchy {
        province,
        regency,
        district,
        village,
    }
}
