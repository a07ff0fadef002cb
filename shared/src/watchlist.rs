//! Watchlist management

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::entity::watchlist;
use crate::models::{WatchForm, WatchUpdate};

pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<watchlist::Model>, DbErr> {
    watchlist::Entity::find()
        .order_by_asc(watchlist::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get(db: &DatabaseConnection, code: &str) -> Result<Option<watchlist::Model>, DbErr> {
    watchlist::Entity::find_by_id(code).one(db).await
}

/// Insert or replace the watch entry for `form.code`.
pub async fn upsert(db: &DatabaseConnection, form: WatchForm) -> Result<(), DbErr> {
    let existing = get(db, &form.code).await?;

    let mut item = watchlist::ActiveModel {
        code: ActiveValue::Set(form.code),
        name: ActiveValue::Set(form.name),
        target_price: ActiveValue::Set(form.target_price),
        reason: ActiveValue::Set(form.reason),
        industry: ActiveValue::Set(form.industry),
        created_at: ActiveValue::Set(Some(Utc::now())),
    };

    match existing {
        Some(current) => {
            item.created_at = ActiveValue::Set(current.created_at);
            watchlist::Entity::update(item).exec(db).await?;
        }
        None => {
            watchlist::Entity::insert(item).exec(db).await?;
        }
    }
    Ok(())
}

/// Apply a partial update; `false` when the code is unknown.
pub async fn update(
    db: &DatabaseConnection,
    code: &str,
    update: WatchUpdate,
) -> Result<bool, DbErr> {
    let Some(current) = get(db, code).await? else {
        return Ok(false);
    };

    let mut item: watchlist::ActiveModel = current.into();
    if let Some(name) = update.name {
        item.name = ActiveValue::Set(name);
    }
    if update.target_price.is_some() {
        item.target_price = ActiveValue::Set(update.target_price);
    }
    if update.reason.is_some() {
        item.reason = ActiveValue::Set(update.reason);
    }
    if update.industry.is_some() {
        item.industry = ActiveValue::Set(update.industry);
    }

    watchlist::Entity::update(item).exec(db).await?;
    Ok(true)
}

/// Remove a watch entry; `false` when the code is unknown.
pub async fn remove(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
    let result = watchlist::Entity::delete_by_id(code).exec(db).await?;
    Ok(result.rows_affected > 0)
}
