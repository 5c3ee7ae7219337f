use entity::contracts::Entity;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

/// Reads the deployed bytecode recorded by the chain crawler. The pipeline
/// never writes to this table.
pub async fn find_deployed_bytecode<C>(db: &C, address: &str) -> Result<Option<String>, DbErr>
where
    C: ConnectionTrait,
{
    let contract = Entity::find_by_id(address).one(db).await?;
    Ok(contract.map(|model| model.deployed_bytecode))
}
