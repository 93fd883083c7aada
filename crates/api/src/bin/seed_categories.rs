//! Administrative CLI: load the category tree from a delimited seed file.
//!
//! Usage: seed_categories <path> [--dry-run] [--update]
//!
//! The file is expected to have a header row with columns
//! `name, slug, parent_slug, icon` (`parent_slug` and `icon` may be empty).
//! Rows are applied in file order, so a child row must appear after its
//! parent. The whole file is applied in one transaction: any row failure
//! aborts the run and nothing is written.

use std::collections::HashMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, serde::Deserialize)]
struct SeedRow {
    name: String,
    slug: String,
    #[serde(default)]
    parent_slug: String,
    #[serde(default)]
    icon: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_categories=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let update = args.iter().any(|a| a == "--update");
    let path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .unwrap_or_else(|| panic!("usage: seed_categories <path> [--dry-run] [--update]"));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .unwrap_or_else(|e| panic!("failed to open seed file {path}: {e}"));

    let rows: Vec<SeedRow> = reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| panic!("failed to parse seed file {path}: {e}"));

    tracing::info!(rows = rows.len(), path, "loaded seed file");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&database_url)
        .await
        .expect("failed to create database pool");

    let mut tx = pool
        .begin()
        .await
        .expect("failed to start seeding transaction");

    let mut slug_to_id: HashMap<String, i32> = HashMap::new();
    let mut created = 0usize;
    let mut updated = 0usize;
    let mut skipped = 0usize;

    for row in &rows {
        let parent_id: Option<i32> = if row.parent_slug.is_empty() {
            None
        } else if let Some(&id) = slug_to_id.get(&row.parent_slug) {
            Some(id)
        } else {
            let found: Option<(i32,)> =
                sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
                    .bind(&row.parent_slug)
                    .fetch_optional(&mut *tx)
                    .await
                    .expect("lookup of parent slug failed");

            Some(found.unwrap_or_else(|| {
                panic!(
                    "row for slug '{}' references unknown parent_slug '{}' (parents must precede children in the file)",
                    row.slug, row.parent_slug
                )
            }).0)
        };

        let icon: Option<&str> = if row.icon.is_empty() {
            None
        } else {
            Some(row.icon.as_str())
        };

        let existing: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM categories WHERE slug = $1")
                .bind(&row.slug)
                .fetch_optional(&mut *tx)
                .await
                .expect("lookup of existing slug failed");

        let category_id = match existing {
            Some((id,)) if update => {
                sqlx::query(
                    r#"
                    UPDATE categories
                    SET name = $2, parent_id = COALESCE($3, parent_id), icon = $4
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&row.name)
                .bind(parent_id)
                .bind(icon)
                .execute(&mut *tx)
                .await
                .unwrap_or_else(|e| panic!("failed to update category '{}': {e}", row.slug));
                updated += 1;
                id
            }
            Some((id,)) => {
                skipped += 1;
                id
            }
            None => {
                let (id,): (i32,) = sqlx::query_as(
                    r#"
                    INSERT INTO categories (slug, name, parent_id, icon)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&row.slug)
                .bind(&row.name)
                .bind(parent_id)
                .bind(icon)
                .fetch_one(&mut *tx)
                .await
                .unwrap_or_else(|e| panic!("failed to create category '{}': {e}", row.slug));
                created += 1;
                id
            }
        };

        slug_to_id.insert(row.slug.clone(), category_id);
    }

    if dry_run {
        tx.rollback().await.expect("rollback failed");
        tracing::info!(created, updated, skipped, "dry run: no changes committed");
    } else {
        tx.commit().await.expect("commit failed");
        tracing::info!(created, updated, skipped, "category seed applied");
    }
}
