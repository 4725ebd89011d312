//! Per-subscription preference store
//!
//! Reads never fail: a key that was never written, or whose stored value no
//! longer matches its declared type, reads as its default. Defaults are
//! resolved at read time, so region-dependent defaults follow the current
//! policy.
//!
//! Writes keep the dependency table: storing `false` under a parent key also
//! stores `false` under each of its children, and a failed child write puts
//! back everything the call wrote.

use cellbroadcast_core::{Shared, SubscriptionId};
use std::collections::HashMap;

use crate::config::RegionPolicy;
use crate::error::SettingsResult;
use crate::keys::{children_of, PrefValue, PreferenceKey};
use crate::persistence::PreferenceBackend;

/// Lazily evaluated default
pub type DefaultProvider = Box<dyn Fn() -> PrefValue>;

/// Keys written by one [`PreferenceStore::set`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Written {
    /// Whether the key itself was written
    pub changed: bool,
    /// Dependent keys forced false, in write order
    pub cascaded: Vec<PreferenceKey>,
}

impl Written {
    /// True when nothing was stored
    pub fn is_empty(&self) -> bool {
        !self.changed && self.cascaded.is_empty()
    }
}

/// Typed facade over a persistence backend
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    policy: Shared<RegionPolicy>,
    providers: HashMap<PreferenceKey, DefaultProvider>,
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn PreferenceBackend>, policy: Shared<RegionPolicy>) -> Self {
        Self {
            backend,
            policy,
            providers: HashMap::new(),
        }
    }

    /// Region policy used for defaults
    pub fn policy(&self) -> &Shared<RegionPolicy> {
        &self.policy
    }

    /// Override the default of `key` with a provider evaluated on every read
    /// that finds no stored value
    pub fn declare_default(&mut self, key: PreferenceKey, provider: DefaultProvider) {
        self.providers.insert(key, provider);
    }

    /// Effective stored-or-default value
    pub fn get(&self, key: PreferenceKey, subscription: Option<SubscriptionId>) -> PrefValue {
        match self.stored(key, subscription) {
            Some(value) => value,
            None => self.default_for(key),
        }
    }

    /// Stored value of the declared type, if one exists
    pub fn stored(
        &self,
        key: PreferenceKey,
        subscription: Option<SubscriptionId>,
    ) -> Option<PrefValue> {
        let storage_key = key.storage_key(subscription);
        let value = self.backend.read(&storage_key)?;

        if key.spec().kind.accepts(&value) {
            Some(value)
        } else {
            tracing::warn!(
                "ignoring stored value '{}' for {}: wrong type",
                value,
                storage_key
            );
            None
        }
    }

    /// Declared default of `key`
    pub fn default_for(&self, key: PreferenceKey) -> PrefValue {
        let spec = key.spec();

        if let Some(provider) = self.providers.get(&key) {
            let value = provider();
            if spec.kind.accepts(&value) {
                return value;
            }
            tracing::warn!("default provider for {} returned '{}', ignoring", key, value);
        }

        spec.default.resolve(&self.policy.borrow())
    }

    /// Validate and persist one value, then force its dependents false
    ///
    /// A value equal to the stored one is not written again. A rejected or
    /// failed write leaves every previous value readable.
    pub fn set(
        &mut self,
        key: PreferenceKey,
        subscription: Option<SubscriptionId>,
        value: PrefValue,
    ) -> SettingsResult<Written> {
        let value = key.spec().kind.coerce(key, value)?;

        let prior = self.stored(key, subscription);
        let changed = prior.as_ref() != Some(&value);
        if changed {
            self.write(key, subscription, value.clone())?;
        }

        let mut written = Written {
            changed,
            cascaded: Vec::new(),
        };
        if value != PrefValue::Bool(false) {
            return Ok(written);
        }

        let mut undo: Vec<(PreferenceKey, Option<PrefValue>)> = Vec::new();
        let mut pending: Vec<PreferenceKey> = children_of(key).collect();
        let mut next = 0;

        while let Some(&child) = pending.get(next) {
            next += 1;
            let child_prior = self.stored(child, subscription);
            if child_prior != Some(PrefValue::Bool(false)) {
                if let Err(e) = self.write(child, subscription, PrefValue::Bool(false)) {
                    tracing::warn!("cascade {} -> {} failed: {}", key, child, e);
                    for (written_key, written_prior) in undo.into_iter().rev() {
                        self.rollback(written_key, subscription, written_prior);
                    }
                    if changed {
                        self.rollback(key, subscription, prior);
                    }
                    return Err(e);
                }
                undo.push((child, child_prior));
                written.cascaded.push(child);
            }
            for grandchild in children_of(child) {
                if !pending.contains(&grandchild) {
                    pending.push(grandchild);
                }
            }
        }

        Ok(written)
    }

    fn write(
        &mut self,
        key: PreferenceKey,
        subscription: Option<SubscriptionId>,
        value: PrefValue,
    ) -> SettingsResult<()> {
        let storage_key = key.storage_key(subscription);
        self.backend.write(&storage_key, value)?;
        tracing::debug!("stored {}", storage_key);
        Ok(())
    }

    /// Put back a value captured with [`stored`](Self::stored)
    ///
    /// `None` removes the entry so the key reads as its default again.
    fn restore(
        &mut self,
        key: PreferenceKey,
        subscription: Option<SubscriptionId>,
        prior: Option<PrefValue>,
    ) -> SettingsResult<()> {
        let storage_key = key.storage_key(subscription);
        match prior {
            Some(value) => self.backend.write(&storage_key, value)?,
            None => self.backend.remove(&storage_key)?,
        }
        Ok(())
    }

    fn rollback(
        &mut self,
        key: PreferenceKey,
        subscription: Option<SubscriptionId>,
        prior: Option<PrefValue>,
    ) {
        if let Err(e) = self.restore(key, subscription, prior) {
            tracing::error!("rollback of {} failed: {}", key.storage_key(subscription), e);
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("policy", &self.policy.borrow())
            .field("providers", &self.providers.len())
            .finish_non_exhaustive()
    }
}
