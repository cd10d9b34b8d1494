//! Row-level security on the ledger tables.
//!
//! Every ledger query runs in a transaction that sets
//! `app.current_owner_id`; the policies confine reads and writes to that
//! owner's rows. FORCE makes them apply to the table owner as well.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(RLS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_RLS_SQL).await?;
        Ok(())
    }
}

// NULLIF: a pooled connection reports '' once a SET LOCAL has expired.
const RLS_SQL: &str = r"
ALTER TABLE customers ENABLE ROW LEVEL SECURITY;
ALTER TABLE transactions ENABLE ROW LEVEL SECURITY;
ALTER TABLE payments ENABLE ROW LEVEL SECURITY;

ALTER TABLE customers FORCE ROW LEVEL SECURITY;
ALTER TABLE transactions FORCE ROW LEVEL SECURITY;
ALTER TABLE payments FORCE ROW LEVEL SECURITY;

CREATE POLICY owner_isolation ON customers
    USING (admin_id = NULLIF(current_setting('app.current_owner_id', true), '')::UUID)
    WITH CHECK (admin_id = NULLIF(current_setting('app.current_owner_id', true), '')::UUID);

CREATE POLICY owner_isolation ON transactions
    USING (admin_id = NULLIF(current_setting('app.current_owner_id', true), '')::UUID)
    WITH CHECK (admin_id = NULLIF(current_setting('app.current_owner_id', true), '')::UUID);

CREATE POLICY owner_isolation ON payments
    USING (admin_id = NULLIF(current_setting('app.current_owner_id', true), '')::UUID)
    WITH CHECK (admin_id = NULLIF(current_setting('app.current_owner_id', true), '')::UUID);
";

const DROP_RLS_SQL: &str = r"
DROP POLICY IF EXISTS owner_isolation ON payments;
DROP POLICY IF EXISTS owner_isolation ON transactions;
DROP POLICY IF EXISTS owner_isolation ON customers;

ALTER TABLE payments NO FORCE ROW LEVEL SECURITY;
ALTER TABLE transactions NO FORCE ROW LEVEL SECURITY;
ALTER TABLE customers NO FORCE ROW LEVEL SECURITY;

ALTER TABLE payments DISABLE ROW LEVEL SECURITY;
ALTER TABLE transactions DISABLE ROW LEVEL SECURITY;
ALTER TABLE customers DISABLE ROW LEVEL SECURITY;
";
