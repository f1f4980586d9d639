//! Email and password authentication for the dashboard.

use std::sync::Arc;

use serde_json::json;
use validator::Validate;

use crate::application::forms::Credentials;
use crate::application::services::session_service::SessionService;
use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Identifier of the email and password credential provider.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG_MESSAGE: &str = "Something went wrong.";

/// Sign-in wiring assembled once at startup.
///
/// The user lookup is injected separately as the [`UserRepository`] handed to
/// [`AuthService::new`].
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Credential provider accepted by [`AuthService::sign_in`].
    pub provider_id: String,
    /// Page unauthenticated visitors are sent to.
    pub sign_in_page: String,
    /// Default destination after a successful sign-in.
    pub home_page: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider_id: CREDENTIALS_PROVIDER.to_string(),
            sign_in_page: "/login".to_string(),
            home_page: "/dashboard/invoices".to_string(),
        }
    }
}

/// Sign-in failures that are reported to the user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Shape, lookup or password check rejected the credentials.
    #[error("credentials sign-in rejected")]
    CredentialsSignin,
    /// The credential callback itself failed (store or hash errors).
    #[error("credential callback failed: {0}")]
    CallbackFailed(String),
    /// No provider is registered under the requested id.
    #[error("unknown credential provider: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Generic message shown on the login page. Never reveals which field was wrong.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CredentialsSignin => INVALID_CREDENTIALS_MESSAGE,
            Self::CallbackFailed(_) | Self::Configuration(_) => SOMETHING_WENT_WRONG_MESSAGE,
        }
    }
}

/// Failure of [`AuthService::sign_in`].
#[derive(Debug)]
pub enum SignInError {
    Auth(AuthError),
    /// Anything outside the authentication taxonomy; propagated, never shown.
    Unexpected(AppError),
}

/// A verified user with a freshly minted session.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub session: String,
    pub redirect_to: String,
}

/// Result of a login form submission.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    SignedIn(SignedIn),
    Denied(&'static str),
}

/// Authenticates dashboard users against stored bcrypt hashes.
pub struct AuthService<U: UserRepository + ?Sized> {
    users: Arc<U>,
    sessions: Arc<SessionService>,
    config: AuthConfig,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - lookup used by the credentials provider
    /// - `sessions` - session manager that receives verified users
    /// - `config` - provider and page configuration
    pub fn new(users: Arc<U>, sessions: Arc<SessionService>, config: AuthConfig) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Credentials provider callback.
    ///
    /// Returns `Ok(None)` when the credentials are malformed, the email is unknown or
    /// the password does not match. Malformed credentials never reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lookup fails or the stored hash can't be
    /// checked.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<Option<User>, AppError> {
        if credentials.validate().is_err() {
            tracing::info!("Invalid credentials");
            return Ok(None);
        }

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            tracing::info!("Invalid credentials");
            return Ok(None);
        };

        let password = credentials.password.clone();
        let hash = user.password.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                AppError::internal("Password check aborted", json!({ "reason": e.to_string() }))
            })?
            .map_err(|e| {
                AppError::internal("Password check failed", json!({ "reason": e.to_string() }))
            })?;

        if matches {
            Ok(Some(user))
        } else {
            tracing::info!("Invalid credentials");
            Ok(None)
        }
    }

    /// Signs a user in through the named provider.
    ///
    /// # Errors
    ///
    /// - [`SignInError::Auth`] with [`AuthError::Configuration`] for an unknown provider
    /// - [`SignInError::Auth`] with [`AuthError::CredentialsSignin`] when the
    ///   provider denies the credentials
    /// - [`SignInError::Auth`] with [`AuthError::CallbackFailed`] when the provider errors
    /// - [`SignInError::Unexpected`] when the session can't be issued
    pub async fn sign_in(
        &self,
        provider: &str,
        credentials: &Credentials,
    ) -> Result<SignedIn, SignInError> {
        if provider != self.config.provider_id {
            return Err(SignInError::Auth(AuthError::Configuration(
                provider.to_string(),
            )));
        }

        let user = match self.authorize(credentials).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(SignInError::Auth(AuthError::CredentialsSignin)),
            Err(e) => {
                tracing::error!("Failed to authorize credentials: {}", e);
                return Err(SignInError::Auth(AuthError::CallbackFailed(e.to_string())));
            }
        };

        let session = self
            .sessions
            .issue(&user)
            .map_err(SignInError::Unexpected)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignedIn {
            redirect_to: self.redirect_target(credentials.redirect_to.as_deref()),
            user,
            session,
        })
    }

    /// Handles a login form submission.
    ///
    /// # Errors
    ///
    /// Only unexpected failures are returned; authentication failures become
    /// [`LoginOutcome::Denied`] with a generic message.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<LoginOutcome, AppError> {
        match self.sign_in(CREDENTIALS_PROVIDER, credentials).await {
            Ok(signed_in) => Ok(LoginOutcome::SignedIn(signed_in)),
            Err(SignInError::Auth(e)) => Ok(LoginOutcome::Denied(e.user_message())),
            Err(SignInError::Unexpected(e)) => Err(e),
        }
    }

    /// Accepts only local absolute paths as post-login targets.
    fn redirect_target(&self, requested: Option<&str>) -> String {
        match requested {
            Some(path)
                if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
            {
                path.to_string()
            }
            _ => self.config.home_page.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;

    const PASSWORD: &str = "123456";

    fn stored_user() -> User {
        User {
            id: "410544b2-4001-4271-9855-fec4b6a6442a".to_string(),
            name: "User".to_string(),
            email: "user@nextmail.com".to_string(),
            password: bcrypt::hash(PASSWORD, 4).unwrap(),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
            redirect_to: None,
        }
    }

    fn service(repo: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(
            Arc::new(repo),
            Arc::new(SessionService::new("test-secret".to_string(), 3600)),
            AuthConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repo = MockUserRepository::new();
        let user = stored_user();
        repo.expect_find_by_email()
            .withf(|email| email == "user@nextmail.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repo);
        let outcome = service
            .authenticate(&credentials("user@nextmail.com", PASSWORD))
            .await
            .unwrap();

        let signed_in = match outcome {
            LoginOutcome::SignedIn(signed_in) => signed_in,
            LoginOutcome::Denied(message) => panic!("expected sign-in, got {message}"),
        };
        assert_eq!(signed_in.user.email, "user@nextmail.com");
        assert_eq!(signed_in.redirect_to, "/dashboard/invoices");

        let claims = service.sessions().verify(&signed_in.session).unwrap();
        assert_eq!(claims.user_id, signed_in.user.id);
    }

    #[tokio::test]
    async fn test_short_password_denied_without_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);

        let outcome = service(repo)
            .authenticate(&credentials("a@b.com", "short"))
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Denied(INVALID_CREDENTIALS_MESSAGE)));
    }

    #[tokio::test]
    async fn test_malformed_email_denied_without_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);

        let outcome = service(repo)
            .authenticate(&credentials("not-an-email", "long-enough"))
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Denied(INVALID_CREDENTIALS_MESSAGE)));
    }

    #[tokio::test]
    async fn test_unknown_user_gets_same_message_as_wrong_password() {
        let mut unknown_repo = MockUserRepository::new();
        unknown_repo
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let mut known_repo = MockUserRepository::new();
        let user = stored_user();
        known_repo
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let unknown = service(unknown_repo)
            .authenticate(&credentials("nobody@nextmail.com", PASSWORD))
            .await
            .unwrap();
        let wrong_password = service(known_repo)
            .authenticate(&credentials("user@nextmail.com", "wrong-password"))
            .await
            .unwrap();

        assert!(matches!(unknown, LoginOutcome::Denied(INVALID_CREDENTIALS_MESSAGE)));
        assert!(matches!(
            wrong_password,
            LoginOutcome::Denied(INVALID_CREDENTIALS_MESSAGE)
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_something_went_wrong() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let outcome = service(repo)
            .authenticate(&credentials("user@nextmail.com", PASSWORD))
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Denied(SOMETHING_WENT_WRONG_MESSAGE)));
    }

    #[tokio::test]
    async fn test_corrupt_hash_is_something_went_wrong() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).returning(|_| {
            Ok(Some(User {
                password: "not-a-bcrypt-hash".to_string(),
                ..stored_user()
            }))
        });

        let outcome = service(repo)
            .authenticate(&credentials("user@nextmail.com", PASSWORD))
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Denied(SOMETHING_WENT_WRONG_MESSAGE)));
    }

    #[tokio::test]
    async fn test_unknown_provider_is_configuration_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);

        let result = service(repo)
            .sign_in("github", &credentials("user@nextmail.com", PASSWORD))
            .await;

        assert!(matches!(
            result,
            Err(SignInError::Auth(AuthError::Configuration(_)))
        ));
    }

    #[test]
    fn test_redirect_target_only_accepts_local_paths() {
        let service = service(MockUserRepository::new());

        assert_eq!(
            service.redirect_target(Some("/dashboard/invoices/create")),
            "/dashboard/invoices/create"
        );
        assert_eq!(
            service.redirect_target(Some("https://evil.example")),
            "/dashboard/invoices"
        );
        assert_eq!(
            service.redirect_target(Some("//evil.example")),
            "/dashboard/invoices"
        );
        assert_eq!(service.redirect_target(None), "/dashboard/invoices");
    }
}
