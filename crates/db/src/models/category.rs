use serde::{Deserialize, Serialize};
use shared::types::CategoryId;
use sqlx::FromRow;

/// Category database model. Forms a tree via nullable `parent_id`;
/// acyclicity is enforced at insert/update time by
/// [`crate::repositories::CategoryRepository`] walking ancestors, since
/// Postgres has no native cycle-prevention constraint for self-referencing
/// trees.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub slug: String,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub icon: Option<String>,
}
