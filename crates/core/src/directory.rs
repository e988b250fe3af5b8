//! User directory
//!
//! The full user list lives in memory and is rewritten to `users_db` after
//! every change. Role changes go through guarded operations here rather than
//! being left to whichever form happens to edit a user.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::error::{Error, Result, ValidationError};
use crate::invariants::assert_directory_invariants;
use crate::models::{
    Activity, Certification, Education, Experience, Gender, Post, PrivacySettings, ResearchNote,
    User, UserRole,
};
use crate::permissions::{PermissionMatrix, PlatformAction};
use crate::seed::seed_users;
use crate::storage::{DocumentRepository, USERS_KEY};

/// Partial edit of a user record; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub affiliation: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<UserRole>,
    pub expertise: Option<Vec<String>>,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub medium: Option<String>,
    pub privacy_settings: Option<PrivacySettings>,
}

impl UserUpdate {
    fn apply(self, user: &mut User) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.real_name {
            user.real_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.phone_number {
            user.phone_number = v;
        }
        if let Some(v) = self.affiliation {
            user.affiliation = v;
        }
        if let Some(v) = self.job_title {
            user.job_title = Some(v);
        }
        if let Some(v) = self.company_name {
            user.company_name = Some(v);
        }
        if let Some(v) = self.gender {
            user.gender = v;
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = self.expertise {
            user.expertise = v;
        }
        if let Some(v) = self.bio {
            user.bio = v;
        }
        if let Some(v) = self.linkedin {
            user.linkedin = Some(v);
        }
        if let Some(v) = self.github {
            user.github = Some(v);
        }
        if let Some(v) = self.medium {
            user.medium = Some(v);
        }
        if let Some(v) = self.privacy_settings {
            user.privacy_settings = v;
        }
    }
}

/// Profile list a sub-item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Experience,
    Education,
    Certification,
    Post,
    ResearchNote,
}

/// New account created from the admin panel
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub real_name: String,
    pub email: String,
    /// NORMAL when unset
    pub role: Option<UserRole>,
}

pub struct Directory<R: DocumentRepository> {
    repo: R,
    users: Vec<User>,
}

impl<R: DocumentRepository> Directory<R> {
    /// Restore `users_db`, or seed it with the admin and demo accounts
    #[instrument(skip(repo, admin))]
    pub fn initialize(repo: R, admin: &AdminConfig) -> Result<Self> {
        let restored = match repo.load_json::<Vec<User>>(USERS_KEY) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Could not read users, using seed data");
                None
            }
        };

        let directory = match restored {
            Some(users) => {
                info!(count = users.len(), "Restored users");
                Self { repo, users }
            }
            None => {
                let directory = Self {
                    repo,
                    users: seed_users(admin)?,
                };
                info!(count = directory.users.len(), "Seeded users");
                directory.persist();
                directory
            }
        };
        Ok(directory)
    }

    // ---- lookups ----

    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Case-insensitive substring match on username or real name.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&User> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.users
            .iter()
            .filter(|u| {
                u.username.to_lowercase().contains(&needle)
                    || u.real_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Exact, case-sensitive username match
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Username or email, as typed on the sign-in form
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&User> {
        if identifier.is_empty() {
            return None;
        }
        self.users
            .iter()
            .find(|u| u.username == identifier || u.email == identifier)
    }

    /// Head count per role, every role present
    pub fn role_counts(&self) -> BTreeMap<UserRole, usize> {
        let mut counts: BTreeMap<UserRole, usize> =
            UserRole::all().iter().map(|r| (*r, 0)).collect();
        for user in &self.users {
            *counts.entry(user.role).or_default() += 1;
        }
        counts
    }

    /// Illustrative activity log, the same for every user
    pub fn activities(&self, _user_id: &str) -> Vec<Activity> {
        Activity::illustrative_log()
    }

    // ---- self service ----

    /// Apply `patch` to the actor's own record. The role cannot be changed.
    #[instrument(skip(self, actor, patch), fields(user_id = %actor.id))]
    pub fn update_profile(&mut self, actor: &User, patch: UserUpdate) -> Result<User> {
        let target = self.get(&actor.id)?;
        if let Some(role) = patch.role {
            if !PermissionMatrix::can_change_role(actor, target, role) {
                return Err(Error::PermissionDenied("Cannot change your own role".to_string()));
            }
        }
        self.apply_update(&actor.id, patch)
    }

    pub fn add_experience(&mut self, actor: &User, mut item: Experience) -> Result<String> {
        item.id = new_item_id();
        let id = item.id.clone();
        self.modify(&actor.id, |u| u.experiences.push(item))?;
        Ok(id)
    }

    pub fn add_education(&mut self, actor: &User, mut item: Education) -> Result<String> {
        item.id = new_item_id();
        let id = item.id.clone();
        self.modify(&actor.id, |u| u.education.push(item))?;
        Ok(id)
    }

    pub fn add_certification(&mut self, actor: &User, mut item: Certification) -> Result<String> {
        item.id = new_item_id();
        let id = item.id.clone();
        self.modify(&actor.id, |u| u.certifications.push(item))?;
        Ok(id)
    }

    pub fn add_post(&mut self, actor: &User, mut item: Post) -> Result<String> {
        item.id = new_item_id();
        let id = item.id.clone();
        self.modify(&actor.id, |u| u.posts.push(item))?;
        Ok(id)
    }

    pub fn add_research_note(&mut self, actor: &User, mut item: ResearchNote) -> Result<String> {
        item.id = new_item_id();
        let id = item.id.clone();
        self.modify(&actor.id, |u| u.research_notes.push(item))?;
        Ok(id)
    }

    /// Drop one sub-item; `false` when no item had that id
    pub fn remove_item(&mut self, actor: &User, section: ProfileSection, item_id: &str) -> Result<bool> {
        self.modify(&actor.id, |u| {
            let before = section_len(u, section);
            match section {
                ProfileSection::Experience => u.experiences.retain(|i| i.id != item_id),
                ProfileSection::Education => u.education.retain(|i| i.id != item_id),
                ProfileSection::Certification => u.certifications.retain(|i| i.id != item_id),
                ProfileSection::Post => u.posts.retain(|i| i.id != item_id),
                ProfileSection::ResearchNote => u.research_notes.retain(|i| i.id != item_id),
            }
            section_len(u, section) != before
        })
    }

    /// Store an uploaded image as the avatar, returning its data URL
    pub fn set_avatar(&mut self, actor: &User, bytes: &[u8], mime: &str) -> Result<String> {
        let url = data_url(bytes, mime);
        let stored = url.clone();
        self.modify(&actor.id, |u| u.avatar = Some(stored))?;
        Ok(url)
    }

    /// Store an uploaded image as the profile banner, returning its data URL
    pub fn set_banner(&mut self, actor: &User, bytes: &[u8], mime: &str) -> Result<String> {
        let url = data_url(bytes, mime);
        let stored = url.clone();
        self.modify(&actor.id, |u| u.banner = Some(stored))?;
        Ok(url)
    }

    // ---- admin panel ----

    /// Edit any user. An ADMIN target keeps its role.
    #[instrument(skip(self, actor, patch), fields(actor = %actor.id))]
    pub fn admin_update(&mut self, actor: &User, target_id: &str, patch: UserUpdate) -> Result<User> {
        require_admin(actor)?;
        let target = self.get(target_id)?;
        if let Some(role) = patch.role {
            if !PermissionMatrix::can_change_role(actor, target, role) {
                return Err(Error::PermissionDenied(format!(
                    "Role of {} cannot be changed",
                    target.username
                )));
            }
        }
        self.apply_update(target_id, patch)
    }

    #[instrument(skip(self, actor, new_user), fields(actor = %actor.id, username = %new_user.username))]
    pub fn admin_create(&mut self, actor: &User, new_user: NewUser) -> Result<User> {
        require_admin(actor)?;

        let username = new_user.username.trim().to_string();
        if username.is_empty() {
            return Err(ValidationError::MissingUsername.into());
        }
        let real_name = match new_user.real_name.trim() {
            "" => username.clone(),
            name => name.to_string(),
        };
        let user = User::new(username, real_name)
            .with_role(new_user.role.unwrap_or_default())
            .with_email(new_user.email.trim().to_string());

        self.insert(user.clone())?;
        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Remove a user; the last ADMIN can never be removed
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub fn admin_delete(&mut self, actor: &User, target_id: &str) -> Result<User> {
        require_admin(actor)?;
        let target = self.get(target_id)?;

        let admins = self.users.iter().filter(|u| u.is_admin()).count();
        if target.is_admin() && admins <= 1 {
            return Err(Error::InvalidOperation(
                "Cannot remove the last administrator".to_string(),
            ));
        }

        let index = self
            .users
            .iter()
            .position(|u| u.id == target_id)
            .ok_or_else(|| Error::NotFound(format!("user {target_id}")))?;
        let removed = self.users.remove(index);
        info!(username = %removed.username, "User removed");
        self.persist();
        Ok(removed)
    }

    // ---- crate internals ----

    /// Append a new user, keeping usernames unique
    pub(crate) fn insert(&mut self, user: User) -> Result<()> {
        if self.find_by_username(&user.username).is_some() {
            return Err(ValidationError::UsernameTaken(user.username).into());
        }
        self.users.push(user);
        assert_directory_invariants(&self.users);
        self.persist();
        Ok(())
    }

    pub(crate) fn set_password_hash(&mut self, user_id: &str, hash: String) -> Result<()> {
        self.modify(user_id, |u| u.password_hash = Some(hash))
    }

    fn get(&self, id: &str) -> Result<&User> {
        self.find_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("user {id}")))
    }

    fn apply_update(&mut self, target_id: &str, patch: UserUpdate) -> Result<User> {
        if let Some(name) = &patch.username {
            let taken = self
                .users
                .iter()
                .any(|u| u.username == *name && u.id != target_id);
            if name.trim().is_empty() {
                return Err(ValidationError::MissingUsername.into());
            }
            if taken {
                return Err(ValidationError::UsernameTaken(name.clone()).into());
            }
        }
        self.modify(target_id, |u| {
            patch.apply(u);
            u.clone()
        })
    }

    /// Run `f` on one record and persist
    fn modify<T>(&mut self, id: &str, f: impl FnOnce(&mut User) -> T) -> Result<T> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        let out = f(user);
        self.persist();
        Ok(out)
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save_json(USERS_KEY, &self.users) {
            warn!(error = %e, "Failed to persist users");
        }
    }
}

fn require_admin(actor: &User) -> Result<()> {
    if PermissionMatrix::can_access(Some(actor), PlatformAction::ManageUsers) {
        Ok(())
    } else {
        Err(Error::PermissionDenied("Administrator access required".to_string()))
    }
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

fn section_len(user: &User, section: ProfileSection) -> usize {
    match section {
        ProfileSection::Experience => user.experiences.len(),
        ProfileSection::Education => user.education.len(),
        ProfileSection::Certification => user.certifications.len(),
        ProfileSection::Post => user.posts.len(),
        ProfileSection::ResearchNote => user.research_notes.len(),
    }
}

fn data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
