use serde::{Deserialize, Deserializer, Serialize};

use crate::customers::repo_types::{Account, Customer};

/// State of one field in a partial update.
///
/// `Missing` means the key was absent, `Null` means it was sent as JSON
/// `null`. Only `Value` is ever applied today; keeping `Null` separate lets a
/// "clear this field" rule be added without changing the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Overwrite `target` when a value was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Value(v) = self {
            *target = v;
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Request body for `PUT /customers/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCustomerRequest {
    pub name: Patch<String>,
    pub surnames: Patch<String>,
    pub phone: Patch<String>,
    pub account: Patch<AccountPatch>,
}

/// Nested account section of an update.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccountPatch {
    pub email: Patch<String>,
    pub password: Patch<String>,
}

/// Public part of the account returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub email: String,
}

/// Customer representation returned by every customer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerView {
    pub id: i64,
    pub name: String,
    pub surnames: String,
    pub phone: String,
    pub account: AccountView,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
        }
    }
}

impl From<Customer> for CustomerView {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            surnames: c.surnames,
            phone: c.phone,
            account: c.account.into(),
        }
    }
}
