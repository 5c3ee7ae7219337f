use crate::{
    error::{ParseError, ServiceError},
    types::TokenHolderBalance,
};
use entity::token_holders::{ActiveModel, Column, Entity, Model};
use sea_orm::{
    prelude::{BigDecimal, Expr},
    sea_query::OnConflict,
    ActiveValue::NotSet,
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, Iterable, Statement,
};

/// Refreshes the holder rows for a token. Each backfill run overwrites the
/// stale balance for `(token_address, account_id)` pairs it saw again and
/// inserts the pairs it saw for the first time.
pub async fn upsert_many<C>(db: &C, holders: Vec<TokenHolderBalance>) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if holders.is_empty() {
        return Ok(());
    }

    let holders = holders
        .into_iter()
        .map(|holder| {
            let model: Model = holder.try_into()?;
            let mut active: ActiveModel = model.into();
            active.updated_at = NotSet;
            Ok(active)
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Entity::insert_many(holders)
        .on_conflict(
            OnConflict::columns([Column::TokenAddress, Column::AccountId])
                .update_columns(non_primary_columns())
                .value(Column::UpdatedAt, Expr::current_timestamp())
                .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(())
}

#[derive(Debug, FromQueryResult)]
pub struct TokenBalance {
    pub balance: BigDecimal,
    pub decimals: i32,
}

pub async fn find_balance<C>(
    db: &C,
    account_id: &str,
    token_address: &str,
) -> Result<Option<TokenBalance>, DbErr>
where
    C: ConnectionTrait,
{
    TokenBalance::find_by_statement(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"SELECT balance, decimals FROM token_holders WHERE account_id = $1 AND token_address = $2"#,
        [account_id.into(), token_address.into()],
    ))
    .one(db)
    .await
}

fn non_primary_columns() -> impl Iterator<Item = Column> {
    Column::iter().filter(|col| {
        !matches!(
            col,
            Column::TokenAddress | Column::AccountId | Column::UpdatedAt
        )
    })
}
