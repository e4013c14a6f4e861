use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::features::regions::models::{District, Province, Regency, Village};

// ==================== Write DTOs ====================

/// Request DTO for creating a province
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvinceDto {
    #[validate(
        required(message = "Name is required"),
        length(max = 200, message = "Name must not exceed 200 characters")
    )]
    pub name: Option<String>,
}

/// Request DTO for creating a regency under a province
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegencyDto {
    #[validate(
        required(message = "Name is required"),
        length(max = 200, message = "Name must not exceed 200 characters")
    )]
    pub name: Option<String>,
    pub province_id: Uuid,
}

/// Request DTO for creating a district under a regency
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDistrictDto {
    #[validate(
        required(message = "Name is required"),
        length(max = 200, message = "Name must not exceed 200 characters")
    )]
    pub name: Option<String>,
    pub regency_id: Uuid,
}

/// Request DTO for creating a village under a district
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVillageDto {
    #[validate(
        required(message = "Name is required"),
        length(max = 200, message = "Name must not exceed 200 characters")
    )]
    pub name: Option<String>,
    pub district_id: Uuid,
}

/// Request DTO for renaming a region at any level
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameRegionDto {
    #[validate(
        required(message = "Name is required"),
        length(max = 200, message = "Name must not exceed 200 characters")
    )]
    pub name: Option<String>,
}

// ==================== Response DTOs ====================

/// Response DTO for province data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceResponseDto {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Province> for ProvinceResponseDto {
    fn from(province: Province) -> Self {
        Self {
            id: province.id,
            name: province.name,
            created_at: province.created_at,
        }
    }
}

/// Response DTO for regency data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegencyResponseDto {
    pub id: Uuid,
    pub name: String,
    pub province_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Regency> for RegencyResponseDto {
    fn from(regency: Regency) -> Self {
        Self {
            id: regency.id,
            name: regency.name,
            province_id: regency.province_id,
            created_at: regency.created_at,
        }
    }
}

/// Response DTO for district data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponseDto {
    pub id: Uuid,
    pub name: String,
    pub regency_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<District> for DistrictResponseDto {
    fn from(district: District) -> Self {
        Self {
            id: district.id,
            name: district.name,
            regency_id: district.regency_id,
            created_at: district.created_at,
        }
    }
}

/// Response DTO for village data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageResponseDto {
    pub id: Uuid,
    pub name: String,
    pub district_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Village> for VillageResponseDto {
    fn from(village: Village) -> Self {
        Self {
            id: village.id,
            name: village.name,
            district_id: village.district_id,
            created_at: village.created_at,
        }
    }
}

/// Number of stored regions per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCountsDto {
    pub provinces: i64,
    pub regencies: i64,
    pub districts: i64,
    pub villages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bound() {
        let exact = CreateProvinceDto {
            name: Some("a".repeat(200)),
        };
        let over = CreateProvinceDto {
            name: Some("a".repeat(201)),
        };

        assert!(exact.validate().is_ok());
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        // 200 characters, 400 bytes
        let dto = RenameRegionDto {
            name: Some("é".repeat(200)),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let dto = CreateVillageDto {
            name: None,
            district_id: Uuid::now_v7(),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_empty_name_is_accepted() {
        let dto = CreateRegencyDto {
            name: Some(String::new()),
            province_id: Uuid::now_v7(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_deserializes_camel_case() {
        let district_id = Uuid::now_v7();
        let json = serde_json::json!({ "name": "Caturtunggal", "districtId": district_id });

        let dto: CreateVillageDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.name.as_deref(), Some("Caturtunggal"));
        assert_eq!(dto.district_id, district_id);
    }

    #[test]
    fn test_absent_name_deserializes_to_none() {
        let json = serde_json::json!({ "provinceId": Uuid::now_v7() });
        let dto: CreateRegencyDto = serde_json::from_value(json).unwrap();
        assert!(dto.name.is_none());
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_response_dto_serializes_parent_reference() {
        let regency = Regency {
            id: Uuid::now_v7(),
            name: "Kabupaten Sleman".to_string(),
            province_id: Uuid::now_v7(),
            created_at: Utc::now(),
        };
        let province_id = regency.province_id;

        let value = serde_json::to_value(RegencyResponseDto::from(regency)).unwrap();
        assert_eq!(value["name"], "Kabupaten Sleman");
        assert_eq!(value["provinceId"], province_id.to_string());
        assert!(value.get("createdAt").is_some());
    }
}
