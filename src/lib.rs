//! Indonesian administrative region hierarchy: provinces, regencies,
//! districts and villages, with referential integrity and cascading deletes.

pub mod core;
pub mod features;
pub mod shared;
