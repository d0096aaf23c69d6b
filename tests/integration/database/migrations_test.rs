//! Migration and constraint tests
//!
//! These go straight to the pool so they exercise the schema rather than
//! the handlers in front of it.

#[cfg(feature = "ssr")]
mod tests {
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use crate::common::TestDatabase;
    use license_inventory::shared::timestamp;

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let db = TestDatabase::new().await;

        let mut tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%'",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        tables.sort();

        assert_eq!(tables, vec!["applications", "license_users", "licenses", "users"]);
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = TestDatabase::new().await;
        let now = timestamp::now();

        let result = sqlx::query(
            "INSERT INTO licenses (id, application_id, renewal_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4())
        .bind(Uuid::new_v4())
        .bind(now.date_naive())
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await;

        assert!(result.is_err(), "license without application was accepted");
        assert_eq!(db.count_rows("licenses").await, 0);
    }

    #[tokio::test]
    async fn test_license_count_cannot_go_negative() {
        let db = TestDatabase::new().await;
        let now = timestamp::now();
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO applications (id, name, link, created_at, updated_at) VALUES (?, 'Figma', 'https://figma.com', ?, ?)",
        )
        .bind(id)
        .bind(now)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        let result = sqlx::query(
            "UPDATE applications SET license_associations = license_associations - 1 WHERE id = ?",
        )
        .bind(id)
        .execute(db.pool())
        .await;

        assert!(result.is_err());
        assert_eq!(db.license_associations(id).await, 0);
    }

    #[tokio::test]
    async fn test_user_names_are_unique() {
        let db = TestDatabase::new().await;
        let now = timestamp::now();

        for expect_ok in [true, false] {
            let result = sqlx::query("INSERT INTO users (id, name, created_at) VALUES (?, 'Ada', ?)")
                .bind(Uuid::new_v4())
                .bind(now)
                .execute(db.pool())
                .await;
            assert_eq!(result.is_ok(), expect_ok);
        }
    }
}
