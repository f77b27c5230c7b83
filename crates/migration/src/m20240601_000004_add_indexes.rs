use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // User: filter by status on login/authentication
        manager
            .create_index(
                Index::create()
                    .name("idx_user_status")
                    .table(User::Table)
                    .col(User::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Product: admin listing by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_product_created_by")
                    .table(Product::Table)
                    .col(Product::CreatedBy)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_created_by").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_status").table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User { Table, Status }

#[derive(DeriveIden)]
enum Product { Table, CreatedBy }
