use crate::types::EvmAccount;
use entity::accounts::{Column, Entity};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

/// Lists the accounts holding a registered EVM address, the candidate set
/// for token holder backfills.
pub async fn list_with_evm_address<C>(db: &C) -> Result<Vec<EvmAccount>, DbErr>
where
    C: ConnectionTrait,
{
    let accounts = Entity::find()
        .filter(Column::EvmAddress.is_not_null())
        .order_by_asc(Column::AccountId)
        .all(db)
        .await?;

    Ok(accounts
        .into_iter()
        .filter_map(|model| {
            let evm_address = model.evm_address?;
            Some(EvmAccount {
                account_id: model.account_id,
                evm_address,
            })
        })
        .collect())
}
