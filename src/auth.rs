use anyhow::{bail, Context, Result};
use sqlx::PgPool;

use crate::db;
use crate::models::Account;

/// What an authenticated account may read. Staff roles see everything,
/// student accounts only their own report card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    Full,
    StudentSelf(String),
}

impl AccessScope {
    pub fn for_account(account: &Account) -> Result<AccessScope> {
        if !account.is_active {
            bail!("account {} is deactivated", account.username);
        }
        if account.role.is_staff() {
            Ok(AccessScope::Full)
        } else {
            // Student accounts log in with their LRN as username.
            Ok(AccessScope::StudentSelf(account.username.clone()))
        }
    }

    pub fn allows_student(&self, lrn: &str) -> bool {
        match self {
            AccessScope::Full => true,
            AccessScope::StudentSelf(own) => own == lrn,
        }
    }

    pub fn require_full(&self) -> Result<()> {
        match self {
            AccessScope::Full => Ok(()),
            AccessScope::StudentSelf(_) => bail!("this operation requires a staff account"),
        }
    }
}

// TODO: replace the plaintext comparison once accounts store salted hashes.
pub fn verify_login(account: &Account, password: &str) -> Result<()> {
    if account.password != password {
        bail!("invalid credentials");
    }
    if !account.is_active {
        bail!("account {} is deactivated", account.username);
    }
    Ok(())
}

pub async fn resolve_scope(pool: &PgPool, acting_as: Option<&str>) -> Result<AccessScope> {
    match acting_as {
        None => Ok(AccessScope::Full),
        Some(username) => {
            let account = db::accounts::find_by_username(pool, username)
                .await?
                .with_context(|| format!("no account named {username}"))?;
            AccessScope::for_account(&account)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use uuid::Uuid;

    fn account(username: &str, role: Role, is_active: bool) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@school.com"),
            password: "secret".to_string(),
            role,
            is_active,
        }
    }

    #[test]
    fn staff_roles_get_full_scope() {
        for role in [Role::Superadmin, Role::Admin, Role::Teacher] {
            let scope = AccessScope::for_account(&account("staff", role, true)).unwrap();
            assert_eq!(scope, AccessScope::Full);
        }
    }

    #[test]
    fn student_scope_is_limited_to_own_lrn() {
        let scope = AccessScope::for_account(&account("123456789012", Role::User, true)).unwrap();
        assert!(scope.allows_student("123456789012"));
        assert!(!scope.allows_student("210987654321"));
        assert!(scope.require_full().is_err());
    }

    #[test]
    fn deactivated_accounts_get_no_scope() {
        assert!(AccessScope::for_account(&account("gone", Role::Admin, false)).is_err());
    }

    #[test]
    fn login_rejects_wrong_password() {
        let acct = account("ana", Role::Teacher, true);
        assert!(verify_login(&acct, "secret").is_ok());
        assert!(verify_login(&acct, "Secret").is_err());
    }

    #[test]
    fn login_rejects_deactivated_account() {
        let acct = account("ana", Role::Teacher, false);
        assert!(verify_login(&acct, "secret").is_err());
    }
}
