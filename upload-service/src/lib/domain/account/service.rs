use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::PasswordHashing;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::CreateAccountCommand;
use crate::account::models::NewAccount;
use crate::account::models::PasswordPolicy;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR, PH = PasswordHasher>
where
    AR: AccountRepository,
    PH: PasswordHashing,
{
    repository: Arc<AR>,
    password_hasher: PH,
    password_policy: PasswordPolicy,
    /// Hash verified against when a login names no account, so unknown
    /// usernames cost the same as wrong passwords.
    decoy_hash: OnceLock<Option<String>>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

impl<AR, PH> AccountService<AR, PH>
where
    AR: AccountRepository,
    PH: PasswordHashing,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `password_hasher` - Hashing primitive for stored passwords
    /// * `password_policy` - Rules applied before a password is hashed
    pub fn new(repository: Arc<AR>, password_hasher: PH, password_policy: PasswordPolicy) -> Self {
        Self {
            repository,
            password_hasher,
            password_policy,
            decoy_hash: OnceLock::new(),
        }
    }

    fn verify_against_decoy(&self, candidate: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        if let Some(hash) = decoy {
            let _ = self.password_hasher.verify(candidate, hash);
        }
    }
}

#[async_trait]
impl<AR, PH> AccountServicePort for AccountService<AR, PH>
where
    AR: AccountRepository,
    PH: PasswordHashing,
{
    async fn create_account(
        &self,
        command: CreateAccountCommand,
    ) -> Result<Account, AccountError> {
        self.password_policy.check(&command.password)?;

        let password_hash = self.password_hasher.hash(&command.password)?;

        let account = NewAccount {
            username: command.username,
            password_hash,
            created_at: Utc::now(),
        };

        let created = self.repository.create(account).await?;

        tracing::info!(
            account_id = %created.id,
            username = %created.username,
            "Account created"
        );

        Ok(created)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Account, AccountError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(AccountError::NotFoundByUsername(username.to_string()))
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.as_i64()))
    }

    fn verify_password(&self, account: &Account, candidate: &str) -> bool {
        match self
            .password_hasher
            .verify(candidate, &account.password_hash)
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(
                    account_id = %account.id,
                    "Stored password hash could not be verified: {}",
                    e
                );
                false
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        let username = Username::new(username.to_string())
            .map_err(|_| AccountError::InvalidCredentials)?;

        let account = match self.find_by_username(&username).await {
            Ok(account) => account,
            Err(AccountError::NotFoundByUsername(_)) => {
                self.verify_against_decoy(password);
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self.verify_password(&account, password) {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordError;
    use mockall::mock;

    use super::*;
    use crate::account::errors::PasswordPolicyError;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError>;
        }
    }

    mock! {
        pub TestPasswordHasher {}

        impl PasswordHashing for TestPasswordHasher {
            fn hash(&self, password: &str) -> Result<String, PasswordError>;
            fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
        }
    }

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn stored_account(hasher: &PasswordHasher, name: &str, password: &str) -> Account {
        Account {
            id: AccountId(1),
            username: username(name),
            password_hash: hasher.hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn persisted(account: NewAccount) -> Account {
        Account {
            id: AccountId(1),
            username: account.username,
            password_hash: account.password_hash,
            created_at: account.created_at,
        }
    }

    #[tokio::test]
    async fn test_create_account_success() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_create()
            .withf(|account| {
                account.username.as_str() == "alice"
                    && account.password_hash.starts_with("$argon2id")
                    && !account.password_hash.contains("secret1")
            })
            .times(1)
            .returning(|account| Ok(persisted(account)));

        let service = AccountService::new(
            Arc::new(repository),
            cheap_hasher(),
            PasswordPolicy::default(),
        );

        let command = CreateAccountCommand::new(username("alice"), "secret1".to_string());
        let account = service.create_account(command).await.unwrap();

        assert_eq!(account.id, AccountId(1));
        assert_eq!(account.username.as_str(), "alice");
        assert!(service.verify_password(&account, "secret1"));
    }

    #[tokio::test]
    async fn test_create_account_short_password_never_touches_storage() {
        let mut repository = MockTestAccountRepository::new();
        repository.expect_create().times(0);

        let service = AccountService::new(
            Arc::new(repository),
            cheap_hasher(),
            PasswordPolicy::default(),
        );

        let command = CreateAccountCommand::new(username("alice"), "short".to_string());
        let result = service.create_account(command).await;

        assert!(matches!(
            result,
            Err(AccountError::InvalidPassword(PasswordPolicyError::TooShort {
                min: 6,
                actual: 5
            }))
        ));
    }

    #[tokio::test]
    async fn test_create_account_duplicate_username() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|account| {
                Err(AccountError::DuplicateUsername(
                    account.username.as_str().to_string(),
                ))
            });

        let service = AccountService::new(
            Arc::new(repository),
            cheap_hasher(),
            PasswordPolicy::default(),
        );

        let command = CreateAccountCommand::new(username("alice"), "secret1".to_string());
        let result = service.create_account(command).await;

        assert!(matches!(result, Err(AccountError::DuplicateUsername(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_create_account_hashing_failure() {
        let mut repository = MockTestAccountRepository::new();
        repository.expect_create().times(0);

        let mut hasher = MockTestPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Err(PasswordError::HashingFailed("out of memory".to_string())));

        let service =
            AccountService::new(Arc::new(repository), hasher, PasswordPolicy::default());

        let command = CreateAccountCommand::new(username("alice"), "secret1".to_string());
        let result = service.create_account(command).await;

        assert!(matches!(result, Err(AccountError::Password(_))));
    }

    #[tokio::test]
    async fn test_find_by_username_not_found() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(
            Arc::new(repository),
            cheap_hasher(),
            PasswordPolicy::default(),
        );

        let result = service.find_by_username(&username("ghost")).await;

        assert!(matches!(result, Err(AccountError::NotFoundByUsername(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(
            Arc::new(repository),
            cheap_hasher(),
            PasswordPolicy::default(),
        );

        let result = service.find_by_id(&AccountId(42)).await;

        assert!(matches!(result, Err(AccountError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let hasher = cheap_hasher();
        let account = stored_account(&hasher, "alice", "secret1");

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(repository), hasher, PasswordPolicy::default());

        let account = service.login("alice", "secret1").await.unwrap();
        assert_eq!(account.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_are_indistinguishable() {
        let hasher = cheap_hasher();
        let account = stored_account(&hasher, "alice", "secret1");

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |username| {
                if username.as_str() == "alice" {
                    Ok(Some(account.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AccountService::new(Arc::new(repository), hasher, PasswordPolicy::default());

        let wrong_password = service.login("alice", "wrongpass").await;
        let unknown_user = service.login("bob", "secret1").await;
        let empty_user = service.login("", "secret1").await;

        assert!(matches!(wrong_password, Err(AccountError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AccountError::InvalidCredentials)));
        assert!(matches!(empty_user, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_still_runs_verification() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .times(2)
            .returning(|_| Ok(None));

        let mut hasher = MockTestPasswordHasher::new();
        // Decoy hash is computed once and reused.
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Ok("$argon2id$decoy".to_string()));
        hasher
            .expect_verify()
            .withf(|password, hash| password == "secret1" && hash == "$argon2id$decoy")
            .times(2)
            .returning(|_, _| Ok(false));

        let service =
            AccountService::new(Arc::new(repository), hasher, PasswordPolicy::default());

        let first = service.login("ghost", "secret1").await;
        let second = service.login("ghost", "secret1").await;

        assert!(matches!(first, Err(AccountError::InvalidCredentials)));
        assert!(matches!(second, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_propagates_storage_errors() {
        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Err(AccountError::DatabaseError("connection lost".to_string())));

        let service = AccountService::new(
            Arc::new(repository),
            cheap_hasher(),
            PasswordPolicy::default(),
        );

        let result = service.login("alice", "secret1").await;

        assert!(matches!(result, Err(AccountError::DatabaseError(_))));
    }

    #[test]
    fn test_verify_password_with_corrupt_hash_is_false() {
        let service = AccountService::new(
            Arc::new(MockTestAccountRepository::new()),
            cheap_hasher(),
            PasswordPolicy::default(),
        );
        let account = Account {
            id: AccountId(1),
            username: username("alice"),
            password_hash: "not-a-phc-string".to_string(),
            created_at: Utc::now(),
        };

        assert!(!service.verify_password(&account, "secret1"));
    }
}
