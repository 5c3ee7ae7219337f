use crate::{
    error::ServiceError,
    types::{ContractType, VerifiedContract},
};
use entity::verified_contracts::{ActiveModel, Column, Entity, Model};
use sea_orm::{
    prelude::Expr, sea_query::OnConflict, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    EntityTrait, Iterable, QueryFilter, QueryOrder,
};

/// Writes the canonical record for an address. A re-verification replaces
/// the previous record wholesale, so the table always reflects the latest
/// successful submission.
pub async fn upsert<C>(db: &C, contract: VerifiedContract) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let model: Model = contract.try_into()?;
    let mut active: ActiveModel = model.into();
    active.verified_at = NotSet;

    Entity::insert(active)
        .on_conflict(
            OnConflict::column(Column::Address)
                .update_columns(non_primary_columns())
                .value(Column::VerifiedAt, Expr::current_timestamp())
                .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(())
}

pub async fn find_by_address<C>(
    db: &C,
    address: &str,
) -> Result<Option<VerifiedContract>, ServiceError>
where
    C: ConnectionTrait,
{
    let model = Entity::find_by_id(address).one(db).await?;
    model
        .map(VerifiedContract::try_from)
        .transpose()
        .map_err(Into::into)
}

pub async fn list_erc20_tokens<C>(db: &C) -> Result<Vec<VerifiedContract>, ServiceError>
where
    C: ConnectionTrait,
{
    let models = Entity::find()
        .filter(Column::ContractType.eq(ContractType::Erc20.to_string()))
        .order_by_desc(Column::VerifiedAt)
        .all(db)
        .await?;
    models
        .into_iter()
        .map(|model| VerifiedContract::try_from(model).map_err(Into::into))
        .collect()
}

fn non_primary_columns() -> impl Iterator<Item = Column> {
    Column::iter().filter(|col| !matches!(col, Column::Address | Column::VerifiedAt))
}
