use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::customers::repo_types::{Account, Customer, CustomerRow};
use crate::error::AppError;

const SELECT_CUSTOMER: &str = r#"
    SELECT c.id, c.name, c.surnames, c.phone,
           a.id AS account_id, a.email, a.password_hash
    FROM customers c
    JOIN accounts a ON a.id = c.account_id
    WHERE c.id = $1
"#;

/// Entry point to customer persistence.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Read outside of any transaction.
    async fn find(&self, id: i64) -> Result<Option<Customer>, AppError>;

    /// Open a unit of work. Dropping it without `commit` discards its writes.
    async fn begin(&self) -> Result<Box<dyn CustomerUnitOfWork>, AppError>;
}

/// Reads and writes that become visible together on `commit`.
#[async_trait]
pub trait CustomerUnitOfWork: Send {
    async fn find_customer(&mut self, id: i64) -> Result<Option<Customer>, AppError>;

    async fn email_exists(&mut self, email: &str) -> Result<bool, AppError>;

    async fn save_account(&mut self, account: &Account) -> Result<(), AppError>;

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgCustomerStore {
    db: PgPool,
}

impl PgCustomerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn find(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(SELECT_CUSTOMER)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn begin(&self) -> Result<Box<dyn CustomerUnitOfWork>, AppError> {
        let tx = self.db.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CustomerUnitOfWork for PgUnitOfWork {
    async fn find_customer(&mut self, id: i64) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(SELECT_CUSTOMER)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn email_exists(&mut self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn save_account(&mut self, account: &Account) -> Result<(), AppError> {
        let res = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, password_hash = $3
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .execute(&mut *self.tx)
        .await;

        match res {
            Ok(done) => {
                debug!(account_id = account.id, rows = done.rows_affected(), "account saved");
                Ok(())
            }
            // lost a race with a concurrent update claiming the same email
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::invalid_argument("email already in use"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), AppError> {
        let done = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, surnames = $3, phone = $4
            WHERE id = $1
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.surnames)
        .bind(&customer.phone)
        .execute(&mut *self.tx)
        .await?;
        debug!(customer_id = customer.id, rows = done.rows_affected(), "customer saved");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
