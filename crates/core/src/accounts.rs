//! Accounts and the signed-in session
//!
//! Exactly one identity is active per running client. It is set up by
//! [`Accounts::restore`], [`Accounts::login`] or [`Accounts::register`] and
//! torn down by [`Accounts::logout`]; callers pass the current user
//! explicitly to whatever needs it.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::directory::Directory;
use crate::error::{Error, Result, ValidationError};
use crate::models::User;
use crate::storage::{DocumentRepository, SESSION_KEY};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

const INVALID_CREDENTIALS: &str = "Invalid credentials or node not found.";

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::Authentication(format!("Failed to hash password: {e}")))
}

/// Check `password` against a stored PHC string
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed_hash = match PasswordHash::new(stored) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "Invalid stored password hash");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern"))
}

/// `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Shared strength and confirmation rules
fn check_new_password(password: &str, confirmation: &str) -> std::result::Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Fields of the sign-up form
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    /// Falls back to the username when blank
    pub real_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Check the form in display order, stopping at the first problem
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        check_new_password(&self.password, &self.confirm_password)
    }
}

/// Owner of the `current_session` document
pub struct Accounts<R: DocumentRepository> {
    repo: R,
    current: Option<User>,
}

impl<R: DocumentRepository> Accounts<R> {
    /// Pick up the identity persisted by a previous run, if any
    #[instrument(skip(repo))]
    pub fn restore(repo: R) -> Self {
        let current = match repo.load_json::<User>(SESSION_KEY) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Could not read session, starting signed out");
                None
            }
        };
        if let Some(user) = &current {
            info!(username = %user.username, "Session restored");
        }
        Self { repo, current }
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Sign in by username or email.
    ///
    /// Accounts with a stored hash must present the matching password; seeded
    /// demo accounts without one sign in by identifier alone.
    #[instrument(skip(self, directory, password))]
    pub fn login<D: DocumentRepository>(
        &mut self,
        directory: &Directory<D>,
        identifier: &str,
        password: &str,
    ) -> Result<User> {
        let identifier = identifier.trim();
        let user = directory
            .find_by_identifier(identifier)
            .ok_or_else(|| Error::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if let Some(stored) = &user.password_hash {
            if !verify_password(password, stored) {
                debug!("Password rejected");
                return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
            }
        }

        let user = user.clone();
        info!(username = %user.username, "Signed in");
        self.begin(user.clone());
        Ok(user)
    }

    /// Create a NORMAL account and sign it in
    #[instrument(skip(self, directory, form), fields(username = %form.username))]
    pub fn register<D: DocumentRepository>(
        &mut self,
        directory: &mut Directory<D>,
        form: &RegistrationForm,
    ) -> Result<User> {
        form.validate()?;

        let username = form.username.trim().to_string();
        if directory.find_by_username(&username).is_some() {
            return Err(ValidationError::UsernameTaken(username).into());
        }

        let real_name = match form.real_name.trim() {
            "" => username.clone(),
            name => name.to_string(),
        };
        let mut user = User::new(username, real_name).with_email(form.email.trim().to_string());
        user.password_hash = Some(hash_password(&form.password)?);

        directory.insert(user.clone())?;
        info!(user_id = %user.id, "Registered");
        self.begin(user.clone());
        Ok(user)
    }

    /// End the session and forget it on disk
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            info!(username = %user.username, "Signed out");
        }
        if let Err(e) = self.repo.delete_document(SESSION_KEY) {
            warn!(error = %e, "Failed to clear session");
        }
    }

    /// Replace the signed-in user's password
    #[instrument(skip_all)]
    pub fn change_password<D: DocumentRepository>(
        &mut self,
        directory: &mut Directory<D>,
        old: &str,
        new: &str,
        confirmation: &str,
    ) -> Result<()> {
        let user = self
            .current
            .as_ref()
            .ok_or_else(|| Error::Authentication("Not signed in".to_string()))?;

        // Mismatch is reported before strength
        if new != confirmation {
            return Err(ValidationError::PasswordMismatch.into());
        }
        check_new_password(new, confirmation)?;

        let record = directory
            .find_by_id(&user.id)
            .ok_or_else(|| Error::NotFound(format!("user {}", user.id)))?;
        if let Some(stored) = &record.password_hash {
            if !verify_password(old, stored) {
                return Err(Error::Authentication("Current password is incorrect.".to_string()));
            }
        }

        let hash = hash_password(new)?;
        let user_id = user.id.clone();
        directory.set_password_hash(&user_id, hash)?;
        self.refresh(directory);
        Ok(())
    }

    /// Re-read the signed-in user from the directory after a profile edit.
    ///
    /// Signs out if the record was deleted.
    pub fn refresh<D: DocumentRepository>(&mut self, directory: &Directory<D>) {
        let Some(id) = self.current.as_ref().map(|u| u.id.clone()) else {
            return;
        };
        match directory.find_by_id(&id) {
            Some(user) => self.begin(user.clone()),
            None => {
                warn!(user_id = %id, "Signed-in user no longer exists");
                self.logout();
            }
        }
    }

    fn begin(&mut self, user: User) {
        if let Err(e) = self.repo.save_json(SESSION_KEY, &user) {
            warn!(error = %e, "Failed to persist session");
        }
        self.current = Some(user);
    }
}
