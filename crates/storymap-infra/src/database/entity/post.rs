//! Post entity for SeaORM.
//!
//! The location is stored as two double columns; radius queries prefilter
//! on a bounding box and apply exact haversine distance in the repository.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use storymap_core::domain::GeoPoint;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub lng: f64,
    pub lat: f64,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub image: Option<String>,
    pub is_pending: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for storymap_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            location: GeoPoint {
                lng: model.lng,
                lat: model.lat,
            },
            country: model.country,
            country_code: model.country_code,
            image: model.image,
            is_pending: model.is_pending,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<storymap_core::domain::Post> for ActiveModel {
    fn from(post: storymap_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            lng: Set(post.location.lng),
            lat: Set(post.location.lat),
            country: Set(post.country),
            country_code: Set(post.country_code),
            image: Set(post.image),
            is_pending: Set(post.is_pending),
            created_at: Set(post.created_at.into()),
        }
    }
}
