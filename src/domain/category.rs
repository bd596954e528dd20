//! Category Aggregate
//!
//! Subcategories are child categories through `parent_id`, a single-table
//! shape. A category cannot be deleted while products still reference it;
//! that boundary is enforced at the handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) description: Option<String>,
    pub(crate) parent_id: Option<Uuid>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Category {
    pub fn create(name: impl Into<String>, description: Option<String>, parent_id: Option<Uuid>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            description,
            parent_id,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn slug(&self) -> &str { &self.slug }
    pub fn parent_id(&self) -> Option<Uuid> { self.parent_id }

    pub fn update(&mut self, name: impl Into<String>, description: Option<String>, parent_id: Option<Uuid>) {
        let name = name.into();
        self.slug = slugify(&name);
        self.name = name;
        self.description = description;
        self.parent_id = parent_id;
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
