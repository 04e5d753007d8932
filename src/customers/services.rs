use tracing::{debug, info, instrument, warn};

use crate::customers::dto::{AccountPatch, CustomerView, UpdateCustomerRequest};
use crate::customers::password::PasswordPolicy;
use crate::customers::repo::{CustomerStore, CustomerUnitOfWork};
use crate::customers::repo_types::Account;
use crate::error::AppError;

#[instrument(skip(store))]
pub async fn get_customer(store: &dyn CustomerStore, id: i64) -> Result<CustomerView, AppError> {
    let customer = store.find(id).await?.ok_or_else(|| {
        warn!(customer_id = id, "customer not found");
        AppError::not_found(format!("Customer {id} not found"))
    })?;
    Ok(customer.into())
}

/// Apply a partial update to a customer and, when present, its account.
///
/// Both saves go through one unit of work: an error at any step drops it and
/// nothing staged becomes visible.
#[instrument(skip(store, policy, payload))]
pub async fn update_customer(
    store: &dyn CustomerStore,
    policy: &PasswordPolicy,
    id: i64,
    payload: UpdateCustomerRequest,
) -> Result<CustomerView, AppError> {
    let mut uow = store.begin().await?;

    let mut customer = uow.find_customer(id).await?.ok_or_else(|| {
        warn!(customer_id = id, "customer not found");
        AppError::not_found(format!("Customer {id} not found"))
    })?;

    payload.name.apply_to(&mut customer.name);
    payload.surnames.apply_to(&mut customer.surnames);
    payload.phone.apply_to(&mut customer.phone);

    if let Some(section) = payload.account.into_value() {
        apply_account_patch(uow.as_mut(), policy, &mut customer.account, section).await?;
        uow.save_account(&customer.account).await?;
    }

    uow.save_customer(&customer).await?;
    uow.commit().await?;

    info!(customer_id = customer.id, account_id = customer.account.id, "customer updated");
    Ok(customer.into())
}

async fn apply_account_patch(
    uow: &mut dyn CustomerUnitOfWork,
    policy: &PasswordPolicy,
    account: &mut Account,
    patch: AccountPatch,
) -> Result<(), AppError> {
    // compared and stored exactly as submitted, like the unique index
    if let Some(email) = patch.email.into_value() {
        if email != account.email {
            if email.trim().is_empty() {
                return Err(AppError::invalid_argument("Email must not be blank"));
            }
            if uow.email_exists(&email).await? {
                warn!(account_id = account.id, email = %email, "email already in use");
                return Err(AppError::invalid_argument("Email already in use"));
            }
            debug!(account_id = account.id, email = %email, "account email changed");
            account.email = email;
        }
    }

    if let Some(password) = patch.password.into_value().filter(|p| !p.is_empty()) {
        account.password_hash = policy.credential_for(&password)?;
    }

    Ok(())
}
