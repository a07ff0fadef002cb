use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Strategies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Strategies::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Strategies::Name).string().not_null())
                    .col(ColumnDef::new(Strategies::StrategyType).string().null())
                    .col(ColumnDef::new(Strategies::EntryCondition).text().null())
                    .col(ColumnDef::new(Strategies::ExitCondition).text().null())
                    .col(ColumnDef::new(Strategies::StopLoss).double().null())
                    .col(ColumnDef::new(Strategies::StopProfit).double().null())
                    .col(ColumnDef::new(Strategies::RiskLevel).string().null())
                    .col(ColumnDef::new(Strategies::Scenario).text().null())
                    .col(ColumnDef::new(Strategies::Keywords).json().null())
                    .col(ColumnDef::new(Strategies::Notes).text().null())
                    .col(ColumnDef::new(Strategies::CreatedAt).timestamp().null())
                    .col(ColumnDef::new(Strategies::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Strategies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Strategies {
    Table,
    Id,
    Name,
    StrategyType,
    EntryCondition,
    ExitCondition,
    StopLoss,
    StopProfit,
    RiskLevel,
    Scenario,
    Keywords,
    Notes,
    CreatedAt,
    UpdatedAt,
}
