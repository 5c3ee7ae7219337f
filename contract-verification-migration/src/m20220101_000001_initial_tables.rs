use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE TABLE "contracts" (
                "address" varchar PRIMARY KEY,
                "deployed_bytecode" text NOT NULL,
                "created_at" timestamp NOT NULL DEFAULT now()
            );

            CREATE TABLE "accounts" (
                "account_id" varchar PRIMARY KEY,
                "evm_address" varchar,
                "created_at" timestamp NOT NULL DEFAULT now()
            );

            CREATE INDEX accounts_evm_address_index ON accounts (evm_address) WHERE evm_address IS NOT NULL;

            CREATE TABLE "verification_requests" (
                "id" bigserial PRIMARY KEY,
                "address" varchar NOT NULL,
                "name" varchar NOT NULL,
                "filename" varchar NOT NULL,
                "source" text NOT NULL,
                "runs" integer NOT NULL,
                "optimization" boolean NOT NULL,
                "compiler_version" varchar NOT NULL,
                "args" text NOT NULL,
                "target" varchar NOT NULL,
                "success" boolean NOT NULL,
                "message" text NOT NULL,
                "created_at" timestamp NOT NULL DEFAULT now()
            );

            CREATE INDEX verification_requests_address_index ON verification_requests (address);

            CREATE TABLE "verified_contracts" (
                "address" varchar PRIMARY KEY,
                "name" varchar NOT NULL,
                "filename" varchar NOT NULL,
                "source" text NOT NULL,
                "optimization" boolean NOT NULL,
                "compiler_version" varchar NOT NULL,
                "compiled_abi" jsonb NOT NULL,
                "args" text NOT NULL,
                "runs" integer NOT NULL,
                "target" varchar NOT NULL,
                "contract_type" varchar NOT NULL DEFAULT 'other',
                "token_data" jsonb,
                "verified_at" timestamp NOT NULL DEFAULT now()
            );

            CREATE INDEX verified_contracts_contract_type_index ON verified_contracts (contract_type);

            CREATE TABLE "token_holders" (
                "token_address" varchar NOT NULL,
                "account_id" varchar NOT NULL,
                "evm_address" varchar NOT NULL,
                "balance" numeric(78, 0) NOT NULL,
                "decimals" integer NOT NULL,
                "updated_at" timestamp NOT NULL DEFAULT now(),
                PRIMARY KEY ("token_address", "account_id")
            );

            COMMENT ON TABLE "contracts" IS 'Deployed contracts discovered by the chain crawler, read-only for the verification pipeline';

            COMMENT ON TABLE "accounts" IS 'Known accounts with their optional EVM address, read-only for the verification pipeline';

            COMMENT ON TABLE "verification_requests" IS 'Append-only audit log of verification attempts, both successful and rejected';

            COMMENT ON TABLE "verified_contracts" IS 'Canonical record of the latest successful verification per contract address';

            COMMENT ON TABLE "token_holders" IS 'Point-in-time ERC-20 balance snapshots collected after successful token verifications'
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP TABLE "token_holders";
            DROP TABLE "verified_contracts";
            DROP TABLE "verification_requests";
            DROP TABLE "accounts";
            DROP TABLE "contracts"
        "#;
        crate::from_sql(manager, sql).await
    }
}
