use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Trade journal; money fields are derived at write time
        manager
            .create_table(
                Table::create()
                    .table(Trades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trades::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trades::Code).string().not_null())
                    .col(ColumnDef::new(Trades::Name).string().null())
                    .col(ColumnDef::new(Trades::TradeType).string().null())
                    .col(ColumnDef::new(Trades::BuyDate).string().null())
                    .col(ColumnDef::new(Trades::BuyPrice).double().null())
                    .col(ColumnDef::new(Trades::SellDate).string().null())
                    .col(ColumnDef::new(Trades::SellPrice).double().null())
                    .col(ColumnDef::new(Trades::Shares).big_integer().null())
                    .col(ColumnDef::new(Trades::TotalCost).double().null())
                    .col(ColumnDef::new(Trades::TotalRevenue).double().null())
                    .col(ColumnDef::new(Trades::ProfitLoss).double().null())
                    .col(ColumnDef::new(Trades::ProfitLossPct).double().null())
                    .col(ColumnDef::new(Trades::HoldingDays).big_integer().null())
                    .col(ColumnDef::new(Trades::EntryStrategyId).string().null())
                    .col(ColumnDef::new(Trades::EntryReason).text().null())
                    .col(ColumnDef::new(Trades::ExitStrategyId).string().null())
                    .col(ColumnDef::new(Trades::ExitReason).text().null())
                    .col(ColumnDef::new(Trades::Result).string().null())
                    .col(ColumnDef::new(Trades::SuccessReason).text().null())
                    .col(ColumnDef::new(Trades::FailureReason).text().null())
                    .col(ColumnDef::new(Trades::Improvement).text().null())
                    .col(ColumnDef::new(Trades::Discipline).string().null())
                    .col(ColumnDef::new(Trades::DisciplineScore).integer().null())
                    .col(ColumnDef::new(Trades::Tags).string().null())
                    .col(ColumnDef::new(Trades::Notes).text().null())
                    .col(ColumnDef::new(Trades::CreatedAt).timestamp().null())
                    .col(ColumnDef::new(Trades::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trades_code")
                    .table(Trades::Table)
                    .col(Trades::Code)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trades_buy_date")
                    .table(Trades::Table)
                    .col(Trades::BuyDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trades::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Trades {
    Table,
    Id,
    Code,
    Name,
    TradeType,
    BuyDate,
    BuyPrice,
    SellDate,
    SellPrice,
    Shares,
    TotalCost,
    TotalRevenue,
    ProfitLoss,
    ProfitLossPct,
    HoldingDays,
    EntryStrategyId,
    EntryReason,
    ExitStrategyId,
    ExitReason,
    Result,
    SuccessReason,
    FailureReason,
    Improvement,
    Discipline,
    DisciplineScore,
    Tags,
    Notes,
    CreatedAt,
    UpdatedAt,
}
