use serde::Serialize;
use sqlx::FromRow;

/// Credential-bearing record linked 1:1 to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // never plaintext, never exposed
}

/// Customer record together with the account it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub surnames: String,
    pub phone: String,
    pub account: Account,
}

/// Flat row of `customers JOIN accounts`.
#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub surnames: String,
    pub phone: String,
    pub account_id: i64,
    pub email: String,
    pub password_hash: String,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            surnames: r.surnames,
            phone: r.phone,
            account: Account {
                id: r.account_id,
                email: r.email,
                password_hash: r.password_hash,
            },
        }
    }
}
