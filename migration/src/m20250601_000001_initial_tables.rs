use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 total_views 表（单行计数器）
        manager
            .create_table(
                Table::create()
                    .table(TotalViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TotalViews::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TotalViews::LastUpdateDate).date().not_null())
                    .col(
                        ColumnDef::new(TotalViews::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 page_views 表
        manager
            .create_table(
                Table::create()
                    .table(PageViews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageViews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PageViews::PageName).string().not_null())
                    .col(ColumnDef::new(PageViews::Category).string().not_null())
                    .col(
                        ColumnDef::new(PageViews::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PageViews::LastViewedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // (page_name, category) 唯一，upsert 依赖此索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_page_views_name_category")
                    .table(PageViews::Table)
                    .col(PageViews::PageName)
                    .col(PageViews::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 visitors 表（枚举列不做取值约束）
        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visitors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visitors::VisitorType).string().not_null())
                    .col(ColumnDef::new(Visitors::StayDuration).string().not_null())
                    .col(ColumnDef::new(Visitors::AgeBracket).string().not_null())
                    .col(ColumnDef::new(Visitors::InterestType).string().not_null())
                    .col(
                        ColumnDef::new(Visitors::VisitedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(VISITED_AT_INDEX)
                    .table(Visitors::Table)
                    .col(Visitors::VisitedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(VISITED_AT_INDEX).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_page_views_name_category")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Visitors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PageViews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TotalViews::Table).to_owned())
            .await
    }
}

const VISITED_AT_INDEX: &str = "idx_visitors_visited_at";

#[derive(DeriveIden)]
enum TotalViews {
    #[sea_orm(iden = "total_views")]
    Table,
    Id,
    LastUpdateDate,
    ViewCount,
}

#[derive(DeriveIden)]
enum PageViews {
    #[sea_orm(iden = "page_views")]
    Table,
    Id,
    PageName,
    Category,
    ViewCount,
    LastViewedAt,
}

#[derive(DeriveIden)]
enum Visitors {
    #[sea_orm(iden = "visitors")]
    Table,
    Id,
    VisitorType,
    StayDuration,
    AgeBracket,
    InterestType,
    VisitedAt,
}
