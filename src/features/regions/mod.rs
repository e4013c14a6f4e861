//! Indonesian administrative regions (wilayah) feature.
//!
//! Four record types wired by strict parent references:
//!
//! - Level 1: Provinces (Provinsi), the root
//! - Level 2: Regencies/Cities (Kabupaten/Kota), each in one province
//! - Level 3: Districts (Kecamatan), each in one regency
//! - Level 4: Villages (Kelurahan/Desa), each in one district
//!
//! ## Operations
//!
//! | Operation | Province | Regency | District | Village |
//! |-----------|----------|---------|----------|---------|
//! | Create | `create_province` | `create_regency` | `create_district` | `create_village` |
//! | Get by id | `get_province` | `get_regency` | `get_district` | `get_village` |
//! | List children of parent | `list_provinces` | `list_regencies_by_province` | `list_districts_by_regency` | `list_villages_by_district` |
//! | Search across parents | - | `search_regencies` | `search_districts` | `search_villages` |
//! | Rename | `rename_province` | `rename_regency` | `rename_district` | `rename_village` |
//! | Reparent | - | `reparent_regency` | `reparent_district` | `reparent_village` |
//! | Delete (cascading) | `delete_province` | `delete_regency` | `delete_district` | `delete_village` |
//!
//! Each record's `Display` output is its name.

pub mod dtos;
pub mod models;
pub mod services;
pub mod stores;

pub use services::RegionService;
pub use stores::{MemoryRegionStore, PgRegionStore, RegionStore};
