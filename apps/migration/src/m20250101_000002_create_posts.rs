use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(uuid(Posts::Id).primary_key())
                    .col(uuid(Posts::AuthorId))
                    .col(string(Posts::Title))
                    .col(text(Posts::Content))
                    .col(double(Posts::Lng))
                    .col(double(Posts::Lat))
                    .col(string_null(Posts::Country))
                    .col(string_null(Posts::CountryCode))
                    .col(string_null(Posts::Image))
                    .col(boolean(Posts::IsPending).default(true))
                    .col(timestamp_with_time_zone(Posts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Moderation queue scans
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_is_pending")
                    .table(Posts::Table)
                    .col(Posts::IsPending)
                    .to_owned(),
            )
            .await?;

        // Bounding-box prefilter for radius search
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_lat_lng")
                    .table(Posts::Table)
                    .col(Posts::Lat)
                    .col(Posts::Lng)
                    .to_owned(),
            )
            .await?;

        // Country aggregation and backfill lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_country")
                    .table(Posts::Table)
                    .col(Posts::Country)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    Lng,
    Lat,
    Country,
    CountryCode,
    Image,
    IsPending,
    CreatedAt,
}
