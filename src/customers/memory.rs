//! In-process `CustomerStore` used by the test suite.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::customers::repo::{CustomerStore, CustomerUnitOfWork};
use crate::customers::repo_types::{Account, Customer};
use crate::error::AppError;

#[derive(Debug, Clone)]
struct CustomerRecord {
    name: String,
    surnames: String,
    phone: String,
    account_id: i64,
}

#[derive(Default)]
struct Inner {
    customers: HashMap<i64, CustomerRecord>,
    accounts: HashMap<i64, Account>,
    account_writes: usize,
    customer_writes: usize,
    email_checks: usize,
    fail_customer_save: bool,
}

impl Inner {
    fn customer(&self, id: i64) -> Option<Customer> {
        let record = self.customers.get(&id)?;
        let account = self.accounts.get(&record.account_id)?.clone();
        Some(Customer {
            id,
            name: record.name.clone(),
            surnames: record.surnames.clone(),
            phone: record.phone.clone(),
            account,
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCustomerStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryCustomerStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    pub fn insert(&self, customer: Customer) {
        let mut inner = self.lock();
        inner.customers.insert(
            customer.id,
            CustomerRecord {
                name: customer.name,
                surnames: customer.surnames,
                phone: customer.phone,
                account_id: customer.account.id,
            },
        );
        inner.accounts.insert(customer.account.id, customer.account);
    }

    pub fn customer(&self, id: i64) -> Option<Customer> {
        self.lock().customer(id)
    }

    /// Committed account writes.
    pub fn account_writes(&self) -> usize {
        self.lock().account_writes
    }

    /// Committed customer writes.
    pub fn customer_writes(&self) -> usize {
        self.lock().customer_writes
    }

    pub fn email_checks(&self) -> usize {
        self.lock().email_checks
    }

    /// Make every subsequent `save_customer` fail.
    pub fn fail_customer_saves(&self) {
        self.lock().fail_customer_save = true;
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find(&self, id: i64) -> Result<Option<Customer>, AppError> {
        Ok(self.customer(id))
    }

    async fn begin(&self) -> Result<Box<dyn CustomerUnitOfWork>, AppError> {
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            accounts: Vec::new(),
            customers: Vec::new(),
        }))
    }
}

struct MemoryUnitOfWork {
    store: InMemoryCustomerStore,
    accounts: Vec<Account>,
    customers: Vec<Customer>,
}

#[async_trait]
impl CustomerUnitOfWork for MemoryUnitOfWork {
    async fn find_customer(&mut self, id: i64) -> Result<Option<Customer>, AppError> {
        Ok(self.store.customer(id))
    }

    async fn email_exists(&mut self, email: &str) -> Result<bool, AppError> {
        let mut inner = self.store.lock();
        inner.email_checks += 1;
        Ok(inner.accounts.values().any(|a| a.email == email))
    }

    async fn save_account(&mut self, account: &Account) -> Result<(), AppError> {
        let inner = self.store.lock();
        let taken = inner
            .accounts
            .values()
            .any(|a| a.id != account.id && a.email == account.email);
        if taken {
            return Err(AppError::invalid_argument("email already in use"));
        }
        drop(inner);
        self.accounts.push(account.clone());
        Ok(())
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), AppError> {
        if self.store.lock().fail_customer_save {
            return Err(anyhow::anyhow!("customer save failed").into());
        }
        self.customers.push(customer.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let this = *self;
        let mut inner = this.store.lock();
        for account in this.accounts {
            inner.account_writes += 1;
            inner.accounts.insert(account.id, account);
        }
        for customer in this.customers {
            inner.customer_writes += 1;
            inner.customers.insert(
                customer.id,
                CustomerRecord {
                    name: customer.name,
                    surnames: customer.surnames,
                    phone: customer.phone,
                    account_id: customer.account.id,
                },
            );
        }
        Ok(())
    }
}
