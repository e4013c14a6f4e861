use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_write_error, AppError, Result};
use crate::features::regions::dtos::RegionCountsDto;
use crate::features::regions::models::{District, Province, Regency, Village};
use crate::features::regions::stores::RegionStore;

/// PostgreSQL engine backed by the tables in [`crate::core::database::SCHEMA`].
///
/// Foreign keys and `ON DELETE CASCADE` are enforced by the database itself.
pub struct PgRegionStore {
    pool: PgPool,
}

impl PgRegionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build a case-insensitive `LIKE` pattern that matches `term` literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn read_error(context: &str, e: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", context, e);
    AppError::Database(e)
}

#[async_trait]
impl RegionStore for PgRegionStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    // ==================== Province ====================

    async fn insert_province(&self, name: &str) -> Result<Province> {
        sqlx::query_as::<_, Province>(
            r#"
            INSERT INTO provinces (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "province"))
    }

    async fn find_province(&self, id: Uuid) -> Result<Option<Province>> {
        sqlx::query_as::<_, Province>(
            r#"
            SELECT id, name, created_at
            FROM provinces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(&format!("fetch province {}", id), e))
    }

    async fn list_provinces(&self, search: Option<&str>) -> Result<Vec<Province>> {
        match search {
            Some(term) => {
                sqlx::query_as::<_, Province>(
                    r#"
                    SELECT id, name, created_at
                    FROM provinces
                    WHERE LOWER(name) LIKE $1
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Province>(
                    r#"
                    SELECT id, name, created_at
                    FROM provinces
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| read_error("fetch provinces", e))
    }

    async fn rename_province(&self, id: Uuid, name: &str) -> Result<Option<Province>> {
        sqlx::query_as::<_, Province>(
            r#"
            UPDATE provinces
            SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "province"))
    }

    async fn delete_province(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM provinces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_write_error(e, "province"))?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== Regency ====================

    async fn insert_regency(&self, name: &str, province_id: Uuid) -> Result<Regency> {
        sqlx::query_as::<_, Regency>(
            r#"
            INSERT INTO regencies (name, province_id)
            VALUES ($1, $2)
            RETURNING id, name, province_id, created_at
            "#,
        )
        .bind(name)
        .bind(province_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "province"))
    }

    async fn find_regency(&self, id: Uuid) -> Result<Option<Regency>> {
        sqlx::query_as::<_, Regency>(
            r#"
            SELECT id, name, province_id, created_at
            FROM regencies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(&format!("fetch regency {}", id), e))
    }

    async fn list_regencies(
        &self,
        province_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Regency>> {
        match search {
            Some(term) => {
                sqlx::query_as::<_, Regency>(
                    r#"
                    SELECT id, name, province_id, created_at
                    FROM regencies
                    WHERE province_id = $1 AND LOWER(name) LIKE $2
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(province_id)
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Regency>(
                    r#"
                    SELECT id, name, province_id, created_at
                    FROM regencies
                    WHERE province_id = $1
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(province_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| read_error(&format!("fetch regencies for province {}", province_id), e))
    }

    async fn search_regencies(&self, term: &str, limit: usize) -> Result<Vec<Regency>> {
        sqlx::query_as::<_, Regency>(
            r#"
            SELECT id, name, province_id, created_at
            FROM regencies
            WHERE LOWER(name) LIKE $1
            ORDER BY name ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(term))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error("search regencies", e))
    }

    async fn rename_regency(&self, id: Uuid, name: &str) -> Result<Option<Regency>> {
        sqlx::query_as::<_, Regency>(
            r#"
            UPDATE regencies
            SET name = $1
            WHERE id = $2
            RETURNING id, name, province_id, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "province"))
    }

    async fn reparent_regency(&self, id: Uuid, province_id: Uuid) -> Result<Option<Regency>> {
        sqlx::query_as::<_, Regency>(
            r#"
            UPDATE regencies
            SET province_id = $1
            WHERE id = $2
            RETURNING id, name, province_id, created_at
            "#,
        )
        .bind(province_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "province"))
    }

    async fn delete_regency(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM regencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_write_error(e, "regency"))?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== District ====================

    async fn insert_district(&self, name: &str, regency_id: Uuid) -> Result<District> {
        sqlx::query_as::<_, District>(
            r#"
            INSERT INTO districts (name, regency_id)
            VALUES ($1, $2)
            RETURNING id, name, regency_id, created_at
            "#,
        )
        .bind(name)
        .bind(regency_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "regency"))
    }

    async fn find_district(&self, id: Uuid) -> Result<Option<District>> {
        sqlx::query_as::<_, District>(
            r#"
            SELECT id, name, regency_id, created_at
            FROM districts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(&format!("fetch district {}", id), e))
    }

    async fn list_districts(
        &self,
        regency_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<District>> {
        match search {
            Some(term) => {
                sqlx::query_as::<_, District>(
                    r#"
                    SELECT id, name, regency_id, created_at
                    FROM districts
                    WHERE regency_id = $1 AND LOWER(name) LIKE $2
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(regency_id)
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, District>(
                    r#"
                    SELECT id, name, regency_id, created_at
                    FROM districts
                    WHERE regency_id = $1
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(regency_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| read_error(&format!("fetch districts for regency {}", regency_id), e))
    }

    async fn search_districts(&self, term: &str, limit: usize) -> Result<Vec<District>> {
        sqlx::query_as::<_, District>(
            r#"
            SELECT id, name, regency_id, created_at
            FROM districts
            WHERE LOWER(name) LIKE $1
            ORDER BY name ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(term))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error("search districts", e))
    }

    async fn rename_district(&self, id: Uuid, name: &str) -> Result<Option<District>> {
        sqlx::query_as::<_, District>(
            r#"
            UPDATE districts
            SET name = $1
            WHERE id = $2
            RETURNING id, name, regency_id, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "regency"))
    }

    async fn reparent_district(&self, id: Uuid, regency_id: Uuid) -> Result<Option<District>> {
        sqlx::query_as::<_, District>(
            r#"
            UPDATE districts
            SET regency_id = $1
            WHERE id = $2
            RETURNING id, name, regency_id, created_at
            "#,
        )
        .bind(regency_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "regency"))
    }

    async fn delete_district(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM districts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_write_error(e, "district"))?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== Village ====================

    async fn insert_village(&self, name: &str, district_id: Uuid) -> Result<Village> {
        sqlx::query_as::<_, Village>(
            r#"
            INSERT INTO villages (name, district_id)
            VALUES ($1, $2)
            RETURNING id, name, district_id, created_at
            "#,
        )
        .bind(name)
        .bind(district_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "district"))
    }

    async fn find_village(&self, id: Uuid) -> Result<Option<Village>> {
        sqlx::query_as::<_, Village>(
            r#"
            SELECT id, name, district_id, created_at
            FROM villages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error(&format!("fetch village {}", id), e))
    }

    async fn list_villages(
        &self,
        district_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Village>> {
        match search {
            Some(term) => {
                sqlx::query_as::<_, Village>(
                    r#"
                    SELECT id, name, district_id, created_at
                    FROM villages
                    WHERE district_id = $1 AND LOWER(name) LIKE $2
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(district_id)
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Village>(
                    r#"
                    SELECT id, name, district_id, created_at
                    FROM villages
                    WHERE district_id = $1
                    ORDER BY name ASC, id ASC
                    "#,
                )
                .bind(district_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| read_error(&format!("fetch villages for district {}", district_id), e))
    }

    async fn search_villages(&self, term: &str, limit: usize) -> Result<Vec<Village>> {
        sqlx::query_as::<_, Village>(
            r#"
            SELECT id, name, district_id, created_at
            FROM villages
            WHERE LOWER(name) LIKE $1
            ORDER BY name ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(term))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| read_error("search villages", e))
    }

    async fn rename_village(&self, id: Uuid, name: &str) -> Result<Option<Village>> {
        sqlx::query_as::<_, Village>(
            r#"
            UPDATE villages
            SET name = $1
            WHERE id = $2
            RETURNING id, name, district_id, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "district"))
    }

    async fn reparent_village(&self, id: Uuid, district_id: Uuid) -> Result<Option<Village>> {
        sqlx::query_as::<_, Village>(
            r#"
            UPDATE villages
            SET district_id = $1
            WHERE id = $2
            RETURNING id, name, district_id, created_at
            "#,
        )
        .bind(district_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| handle_write_error(e, "district"))
    }

    async fn delete_village(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM villages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_write_error(e, "village"))?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== Summary ====================

    async fn count_regions(&self) -> Result<RegionCountsDto> {
        let (provinces, regencies, districts, villages) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM provinces),
                    (SELECT COUNT(*) FROM regencies),
                    (SELECT COUNT(*) FROM districts),
                    (SELECT COUNT(*) FROM villages)
                "#,
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("count regions", e))?;

        Ok(RegionCountsDto {
            provinces,
            regencies,
            districts,
            villages,
        })
    }
}
