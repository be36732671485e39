use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    repository::{
        config::CoreConfig,
        settings::{SettingsFile, Target},
        store::{FileStore, Store, StoreError},
    },
};

pub mod config;
pub mod entities;
pub mod settings;
pub mod store;

pub use entities::{Instruction, Profile, ProfileId};

/// Key under which the profile collection is stored.
pub const PROFILES_KEY: &str = "profiles";

/// Central access point for all persistent data.
///
/// The [`Repository`] owns the profile collection in the key-value [`Store`] and the
/// configuration [`Target`] that profiles are applied to. Every mutation reads the whole
/// collection, changes it and writes it back in a single update.
#[derive(Clone, Debug)]
pub struct Repository {
    store: Store,
    target: Target,
    settings_section: String,
    instructions_key: String,
}

impl Repository {
    /// Open the file backed store and settings described by `cfg`.
    pub fn open(cfg: &CoreConfig) -> Result<Self> {
        let store_path = cfg.store_path().map_err(|err| Error::storage("open", err))?;
        let settings_path = cfg
            .settings_path()
            .map_err(|err| Error::storage("open", err))?;

        let store = Store::new(FileStore::new(store_path));
        let target = Target::new(SettingsFile::new(settings_path));

        Self::with_backends(store, target, cfg)
    }

    /// Build a repository on top of any store and target.
    pub fn with_backends(store: Store, target: Target, cfg: &CoreConfig) -> Result<Self> {
        store
            .write()
            .set_keys_for_sync(&[PROFILES_KEY])
            .map_err(|err| Error::storage("setKeysForSync", err))?;
        info!("Enabled cross-device sync for profiles");

        Ok(Self {
            store,
            target,
            settings_section: cfg.settings_section.clone(),
            instructions_key: cfg.instructions_key.clone(),
        })
    }

    // Profiles

    /// Every stored profile, in insertion order.
    pub fn profiles(&self) -> Result<Vec<Profile>> {
        self.read_profiles()
            .map_err(|err| Error::storage("getProfiles", err))
    }

    /// Look up a profile by id. Returns `None` when it doesn't exist.
    pub fn profile(&self, id: &ProfileId) -> Result<Option<Profile>> {
        let profile = self.profiles()?.into_iter().find(|p| &p.id == id);
        if profile.is_none() {
            warn!("Profile not found with ID: {id}");
        }

        Ok(profile)
    }

    /// Create and persist a new profile.
    pub fn create_profile(
        &self,
        name: &str,
        description: &str,
        instructions: Vec<Instruction>,
    ) -> Result<Profile> {
        self.try_create_profile(name, description, instructions)
            .map_err(|err| err.or_wrap(|reason| Error::Save { reason }))
    }

    fn try_create_profile(
        &self,
        name: &str,
        description: &str,
        instructions: Vec<Instruction>,
    ) -> Result<Profile> {
        validate_name(name)?;

        let profile = Profile::new(name, description, instructions);

        let mut profiles = self.profiles()?;
        profiles.push(profile.clone());
        self.write_profiles(&profiles, "saveProfile")?;

        info!("Saved profile \"{}\" (ID: {})", profile.name, profile.id);

        Ok(profile)
    }

    /// Replace the stored profile with the same id as `profile`.
    ///
    /// Name, description and instructions are replaced wholesale. `updated_at` is refreshed,
    /// both in storage and on `profile`.
    pub fn update_profile(&self, profile: &mut Profile) -> Result<()> {
        self.try_update_profile(profile)
            .map_err(|err| err.or_wrap(|reason| Error::Save { reason }))
    }

    fn try_update_profile(&self, profile: &mut Profile) -> Result<()> {
        validate_name(&profile.name)?;

        let mut profiles = self.profiles()?;
        let Some(stored) = profiles.iter_mut().find(|p| p.id == profile.id) else {
            return Err(Error::not_found(&profile.id));
        };

        profile.created_at = stored.created_at;
        profile.updated_at = chrono::Utc::now();
        *stored = profile.clone();

        self.write_profiles(&profiles, "updateProfile")?;

        info!("Updated profile \"{}\" (ID: {})", profile.name, profile.id);

        Ok(())
    }

    /// Remove the profile with the given id.
    pub fn delete_profile(&self, id: &ProfileId) -> Result<()> {
        self.try_delete_profile(id)
            .map_err(|err| err.or_wrap(|reason| Error::storage("deleteProfile", reason)))
    }

    fn try_delete_profile(&self, id: &ProfileId) -> Result<()> {
        let mut profiles = self.profiles()?;
        let Some(position) = profiles.iter().position(|p| &p.id == id) else {
            return Err(Error::not_found(id));
        };

        let removed = profiles.remove(position);
        self.write_profiles(&profiles, "deleteProfile")?;

        info!("Deleted profile \"{}\" (ID: {id})", removed.name);

        Ok(())
    }

    // Applying

    /// Overwrite the assistant's instructions with those of the stored profile `id`.
    pub fn apply_profile(&self, id: &ProfileId) -> Result<()> {
        let profile = self
            .profile(id)
            .map_err(|err| self.application_error(id.as_str(), err))?
            .ok_or_else(|| Error::not_found(id))?;

        self.write_instructions(&profile.instructions)
            .map_err(|err| self.application_error(id.as_str(), err))?;

        info!("Applied profile \"{}\" (ID: {id})", profile.name);

        Ok(())
    }

    /// Overwrite the assistant's instructions without going through a stored profile.
    pub fn apply_instructions(&self, instructions: &[Instruction]) -> Result<()> {
        self.write_instructions(instructions)
            .map_err(|err| self.application_error("applyInstructions", err))?;

        info!("Applied instructions (count: {})", instructions.len());

        Ok(())
    }

    /// The instructions currently set in the configuration target.
    pub fn applied_instructions(&self) -> Result<Vec<Instruction>> {
        let value = self
            .target
            .read()
            .get(&self.settings_section, &self.instructions_key)
            .map_err(|err| Error::storage("getInstructions", err))?;

        match value {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|err| Error::storage("getInstructions", err)),
        }
    }

    fn write_instructions(&self, instructions: &[Instruction]) -> Result<()> {
        let value = serde_json::to_value(instructions)
            .map_err(|err| Error::storage("encodeInstructions", err))?;

        debug!(
            "Writing {} instruction(s) to {}.{}",
            instructions.len(),
            self.settings_section,
            self.instructions_key
        );

        self.target
            .write()
            .update(&self.settings_section, &self.instructions_key, value)
            .map_err(|err| Error::storage("updateConfiguration", err))
    }

    fn application_error(&self, target: &str, err: Error) -> Error {
        err.or_wrap(|reason| Error::Application {
            target: target.to_string(),
            reason,
        })
    }

    // Storage

    fn read_profiles(&self) -> std::result::Result<Vec<Profile>, StoreError> {
        let Some(value) = self.store.read().get(PROFILES_KEY)? else {
            return Ok(Vec::new());
        };

        if !value.is_array() {
            return Err(StoreError::Shape {
                key: PROFILES_KEY.into(),
                reason: "expected an array of profiles".into(),
            });
        }

        value
            .try_into::<Vec<Profile>>()
            .map_err(|err| StoreError::Shape {
                key: PROFILES_KEY.into(),
                reason: err.to_string(),
            })
    }

    fn write_profiles(&self, profiles: &[Profile], operation: &str) -> Result<()> {
        let value = toml::Value::try_from(profiles)
            .map_err(|err| Error::storage(operation, StoreError::from(err)))?;

        self.store
            .write()
            .update(PROFILES_KEY, value)
            .map_err(|err| Error::storage(operation, err))
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory store and configuration
    /// target.
    pub(crate) fn mock() -> Self {
        Self::with_backends(Store::in_memory(), Target::in_memory(), &CoreConfig::mock())
            .expect("in-memory backends cannot fail")
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &Store {
        &self.store
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Profile name is required"));
    }

    Ok(())
}
