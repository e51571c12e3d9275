use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240321_000001_create_sales_data_table::Migration)]
    }
}

mod m20240321_000001_create_sales_data_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240321_000001_create_sales_data_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Amount columns hold 10 integer digits and 2 fractional digits
            manager
                .create_table(
                    Table::create()
                        .table(SalesData::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesData::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(SalesData::ProductName)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::Q1Sales)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::Q2Sales)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::Q3Sales)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::Q4Sales)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::Target)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesData::UpdatedAt)
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
                        .name("idx_sales_data_product_name")
                        .table(SalesData::Table)
                        .col(SalesData::ProductName)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SalesData::Table).if_exists().to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum SalesData {
        Table,
        Id,
        ProductName,
        #[sea_orm(iden = "q1_sales")]
        Q1Sales,
        #[sea_orm(iden = "q2_sales")]
        Q2Sales,
        #[sea_orm(iden = "q3_sales")]
        Q3Sales,
        #[sea_orm(iden = "q4_sales")]
        Q4Sales,
        Target,
        CreatedAt,
        UpdatedAt,
    }
}
