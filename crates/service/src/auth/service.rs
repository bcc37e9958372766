use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use models::admin_user;

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession, Claims};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create an admin user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("doc-secret-0123456789", 12));
    /// let input = RegisterInput { email: "Admin@Batik.test".into(), name: "Admin".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "admin@batik.test");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let email = admin_user::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let name = admin_user::validate_name(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&email, &name).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, "admin_registered");
        Ok(user)
    }

    /// Check the password and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("doc-secret-0123456789", 12));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@batik.test".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@batik.test".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@batik.test");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_ascii_lowercase();
        let user = self.repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let (token, claims) = token::issue_token(&user, &self.cfg.jwt_secret, self.cfg.token_ttl_hours)?;
        info!(user_id = %user.id, "admin_logged_in");
        Ok(AuthSession { user, token, expires_at: claims.exp })
    }

    /// Validate a bearer/cookie token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        token::verify_token(token, &self.cfg.jwt_secret)
    }

    /// The user a valid token belongs to; tokens of deleted users are rejected.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify(token)?;
        self.repo.find_user_by_id(claims.uid).await?.ok_or(AuthError::Unauthorized)
    }

    /// Create the first admin when none exists yet. Returns the created user.
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> Result<Option<AuthUser>, AuthError> {
        if self.repo.count_users().await? > 0 {
            return Ok(None);
        }
        let user = self
            .register(RegisterInput { email: email.to_string(), name: "Administrator".into(), password: password.to_string() })
            .await?;
        info!(user_id = %user.id, "bootstrap admin created");
        Ok(Some(user))
    }
}
