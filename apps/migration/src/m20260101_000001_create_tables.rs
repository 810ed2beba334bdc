use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Credentials::UserId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Credentials::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Credentials::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Credentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_credentials")
                            .from(Users::Table, Users::Id)
                            .to(Credentials::Table, Credentials::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Posts::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_author_created")
                    .table(Posts::Table)
                    .col(Posts::AuthorId)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContentBlocks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContentBlocks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ContentBlocks::PostId).uuid().not_null())
                    .col(ColumnDef::new(ContentBlocks::BlockType).string_len(16).not_null())
                    .col(ColumnDef::new(ContentBlocks::TextContent).text().null())
                    .col(ColumnDef::new(ContentBlocks::ImageUrl).string().null())
                    .col(ColumnDef::new(ContentBlocks::Position).integer().not_null())
                    .check(Expr::cust(
                        "(block_type = 'text' AND text_content IS NOT NULL AND image_url IS NULL) \
                         OR (block_type = 'image' AND image_url IS NOT NULL AND text_content IS NULL)",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_blocks_post")
                            .from(ContentBlocks::Table, ContentBlocks::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One block per slot; positions are always 1..=N.
        manager
            .create_index(
                Index::create()
                    .name("uq_content_blocks_post_position")
                    .table(ContentBlocks::Table)
                    .col(ContentBlocks::PostId)
                    .col(ContentBlocks::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookmarks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookmarks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookmarks::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookmarks::PostId).uuid().not_null())
                    .col(
                        ColumnDef::new(Bookmarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookmarks_user")
                            .from(Bookmarks::Table, Bookmarks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookmarks_post")
                            .from(Bookmarks::Table, Bookmarks::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookmarks_user")
                    .table(Bookmarks::Table)
                    .col(Bookmarks::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookmarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentBlocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Credentials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Credentials {
    Table,
    UserId,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    AuthorId,
    Published,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ContentBlocks {
    Table,
    Id,
    PostId,
    BlockType,
    TextContent,
    ImageUrl,
    Position,
}

#[derive(DeriveIden)]
enum Bookmarks {
    Table,
    Id,
    UserId,
    PostId,
    CreatedAt,
}
