use crate::types::VerificationRequest;
use entity::verification_requests::{ActiveModel, Column, Entity, Model};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Appends one audit row per verification attempt. Rows are never updated
/// or deleted, so the full submission history stays queryable.
pub async fn insert<C>(
    db: &C,
    request: &VerificationRequest,
    success: bool,
    message: &str,
) -> Result<Model, DbErr>
where
    C: ConnectionTrait,
{
    let active = ActiveModel {
        address: Set(request.address.clone()),
        name: Set(request.name.clone()),
        filename: Set(request.filename.clone()),
        source: Set(request.source.clone()),
        runs: Set(request.runs as i32),
        optimization: Set(request.optimization),
        compiler_version: Set(request.compiler_version.clone()),
        args: Set(request.arguments.clone()),
        target: Set(request.target.clone()),
        success: Set(success),
        message: Set(message.to_string()),
        ..Default::default()
    };
    active.insert(db).await
}

pub async fn find_by_address<C>(db: &C, address: &str) -> Result<Vec<Model>, DbErr>
where
    C: ConnectionTrait,
{
    Entity::find()
        .filter(Column::Address.eq(address))
        .order_by_asc(Column::Id)
        .all(db)
        .await
}

/// A contract counts as verified once at least one attempt for its address
/// succeeded, regardless of later failed resubmissions.
pub async fn is_verified<C>(db: &C, address: &str) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let successes = Entity::find()
        .filter(Column::Address.eq(address))
        .filter(Column::Success.eq(true))
        .count(db)
        .await?;
    Ok(successes > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::init_db, verifier::SUCCESS_MESSAGE};
    use pretty_assertions::assert_eq;

    fn request(address: &str) -> VerificationRequest {
        VerificationRequest {
            address: address.to_string(),
            name: "Main".to_string(),
            filename: "Main.sol".to_string(),
            source: "contract Main {}".to_string(),
            runs: 200,
            optimization: true,
            compiler_version: "v0.8.20+commit.a1b79de6".to_string(),
            arguments: "[]".to_string(),
            target: "london".to_string(),
        }
    }

    #[tokio::test]
    async fn every_attempt_gets_its_own_row() {
        let db = init_db("repository_requests_append").await;
        let request = request("0x00000000000000000000000000000000000000aa");

        let first = insert(db.client().as_ref(), &request, false, "compilation failed")
            .await
            .unwrap();
        let second = insert(db.client().as_ref(), &request, true, SUCCESS_MESSAGE)
            .await
            .unwrap();
        assert!(second.id > first.id);

        let rows = find_by_address(db.client().as_ref(), &request.address)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].message, "compilation failed");
        assert!(!rows[0].success);
        assert_eq!(rows[1].message, SUCCESS_MESSAGE);
        assert!(rows[1].success);
    }

    #[tokio::test]
    async fn failed_attempts_alone_do_not_mark_the_address_verified() {
        let db = init_db("repository_requests_status").await;
        let request = request("0x00000000000000000000000000000000000000ab");

        insert(db.client().as_ref(), &request, false, "bytecode mismatch")
            .await
            .unwrap();
        assert!(!is_verified(db.client().as_ref(), &request.address)
            .await
            .unwrap());

        insert(db.client().as_ref(), &request, true, SUCCESS_MESSAGE)
            .await
            .unwrap();
        assert!(is_verified(db.client().as_ref(), &request.address)
            .await
            .unwrap());

        // later failures do not revoke the status
        insert(db.client().as_ref(), &request, false, "bytecode mismatch")
            .await
            .unwrap();
        assert!(is_verified(db.client().as_ref(), &request.address)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn rows_are_scoped_to_their_address() {
        let db = init_db("repository_requests_scoped").await;
        insert(
            db.client().as_ref(),
            &request("0x00000000000000000000000000000000000000aa"),
            true,
            SUCCESS_MESSAGE,
        )
        .await
        .unwrap();

        let rows = find_by_address(
            db.client().as_ref(),
            "0x00000000000000000000000000000000000000ab",
        )
        .await
        .unwrap();
        assert!(rows.is_empty());
        assert!(!is_verified(
            db.client().as_ref(),
            "0x00000000000000000000000000000000000000ab"
        )
        .await
        .unwrap());
    }
}
