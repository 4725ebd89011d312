//! Settings Controller
//!
//! Applies user edits for the active subscription: type validation, the
//! dependent-preference cascade, persistence and, for radio-affecting keys,
//! a reconfiguration trigger. Also answers the presentation layer's
//! questions about which controls exist and whether they are enabled.

use cellbroadcast_core::{
    AppEvent, ConfigCommand, SettingsEvent, Shared, SharedBus, SubscriptionId, TelephonyInfo,
};
use cellbroadcast_receiver::ReconfigurationTrigger;
use serde::Serialize;

use crate::error::{SettingsError, SettingsResult};
use crate::keys::{parents_of, PrefValue, PreferenceKey, Scope};
use crate::store::{PreferenceStore, Written};
use crate::visibility::{Environment, SettingsSurface};

/// Presentation state of one control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub key: PreferenceKey,
    pub value: PrefValue,
    pub enabled: bool,
}

/// Result of an applied edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub key: PreferenceKey,
    /// `None` for device-global keys
    pub subscription: Option<SubscriptionId>,
    pub value: PrefValue,
    /// Whether the edited key itself was written
    pub changed: bool,
    /// Dependent keys forced false by this edit
    pub cascaded: Vec<PreferenceKey>,
    /// Command issued for a radio-affecting edit
    pub command: Option<ConfigCommand>,
}

/// Controller for per-subscription alert settings
pub struct SettingsController {
    store: PreferenceStore,
    trigger: Shared<ReconfigurationTrigger>,
    bus: SharedBus,
    /// One surface per SIM slot, indexed by slot
    surfaces: Vec<SettingsSurface>,
    active: SubscriptionId,
}

impl SettingsController {
    /// Create a controller with one settings surface per SIM slot
    ///
    /// The default subscription starts active.
    pub fn new(
        store: PreferenceStore,
        trigger: Shared<ReconfigurationTrigger>,
        bus: SharedBus,
        telephony: &dyn TelephonyInfo,
        developer_settings_enabled: bool,
    ) -> Self {
        let policy = store.policy().borrow().clone();
        let surfaces: Vec<_> = (0..telephony.phone_count().max(1))
            .map(SubscriptionId)
            .map(|sub| {
                let env = Environment::probe(telephony, &policy, developer_settings_enabled, sub);
                SettingsSurface::build(&env, sub)
            })
            .collect();

        let default = telephony.default_subscription();
        let active = if (default.slot() as usize) < surfaces.len() {
            default
        } else {
            tracing::warn!("default subscription {} out of range, using SUB1", default);
            SubscriptionId(0)
        };

        Self {
            store,
            trigger,
            bus,
            surfaces,
            active,
        }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PreferenceStore {
        &mut self.store
    }

    pub fn active_subscription(&self) -> SubscriptionId {
        self.active
    }

    /// Number of SIM slots with a settings surface
    pub fn subscription_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Switch the active subscription
    pub fn select_subscription(&mut self, subscription: SubscriptionId) -> SettingsResult<()> {
        self.surface_for(subscription)?;
        if subscription != self.active {
            tracing::debug!("active subscription {} -> {}", self.active, subscription);
        }
        self.active = subscription;
        self.bus
            .publish(AppEvent::Settings(SettingsEvent::SubscriptionSelected {
                subscription,
            }))
            .ok();
        Ok(())
    }

    /// Surface of the active subscription
    pub fn surface(&self) -> &SettingsSurface {
        &self.surfaces[self.active.slot() as usize]
    }

    pub fn surface_for(&self, subscription: SubscriptionId) -> SettingsResult<&SettingsSurface> {
        self.surfaces
            .get(subscription.slot() as usize)
            .ok_or(SettingsError::UnknownSubscription(subscription))
    }

    /// Effective value of `key` for the active subscription
    pub fn value(&self, key: PreferenceKey) -> PrefValue {
        self.value_for(self.active, key)
    }

    /// Effective value of `key` for `subscription`
    ///
    /// A dependent key reads false while any of its parents is false.
    pub fn value_for(&self, subscription: SubscriptionId, key: PreferenceKey) -> PrefValue {
        if self.gated(subscription, key) {
            return PrefValue::Bool(false);
        }
        self.store.get(key, Some(subscription))
    }

    fn gated(&self, subscription: SubscriptionId, key: PreferenceKey) -> bool {
        parents_of(key).any(|parent| {
            self.value_for(subscription, parent).as_bool() == Some(false)
        })
    }

    fn presidential_forced(&self, key: PreferenceKey) -> bool {
        key == PreferenceKey::EnableCmasPresidentialAlerts
            && self.store.policy().borrow().show_presidential_alert
    }

    /// Presentation state of `key` on the active surface
    pub fn control(&self, key: PreferenceKey) -> SettingsResult<ControlState> {
        self.control_for(self.active, key)
    }

    pub fn control_for(
        &self,
        subscription: SubscriptionId,
        key: PreferenceKey,
    ) -> SettingsResult<ControlState> {
        if !self.surface_for(subscription)?.is_exposed(key) {
            return Err(SettingsError::NotExposed {
                key: key.as_str().to_string(),
                subscription,
            });
        }

        // Presidential alerts cannot be opted out of in some regions
        if self.presidential_forced(key) {
            return Ok(ControlState {
                key,
                value: PrefValue::Bool(true),
                enabled: false,
            });
        }

        Ok(ControlState {
            key,
            value: self.value_for(subscription, key),
            enabled: !self.gated(subscription, key),
        })
    }

    /// All exposed controls of the active surface in presentation order
    pub fn controls(&self) -> Vec<ControlState> {
        self.surface()
            .keys()
            .iter()
            .filter_map(|key| self.control(*key).ok())
            .collect()
    }

    /// Apply a user edit on the active subscription
    pub fn edit(&mut self, key: PreferenceKey, value: PrefValue) -> SettingsResult<EditOutcome> {
        self.edit_for(self.active, key, value)
    }

    /// Apply a user edit on `subscription`
    ///
    /// Nothing changes when the edit is rejected or any write fails,
    /// including the writes that force dependent keys false.
    pub fn edit_for(
        &mut self,
        subscription: SubscriptionId,
        key: PreferenceKey,
        value: PrefValue,
    ) -> SettingsResult<EditOutcome> {
        let control = self.control_for(subscription, key)?;
        if !control.enabled {
            return Err(SettingsError::ControlDisabled {
                key: key.as_str().to_string(),
            });
        }

        let spec = key.spec();
        let value = spec.kind.coerce(key, value)?;
        let sub = Some(subscription);

        let written = self.store.set(key, sub, value.clone())?;
        let radio_changed = spec.radio_affecting && !written.is_empty();
        let Written { changed, cascaded } = written;

        let scope_sub = match spec.scope {
            Scope::PerSubscription => sub,
            Scope::Global => None,
        };

        if changed {
            self.publish_change(key, scope_sub, &value);
        }
        for child in &cascaded {
            self.publish_change(*child, sub, &PrefValue::Bool(false));
        }

        let command = if radio_changed {
            Some(self.trigger.borrow_mut().on_preference_changed(subscription))
        } else {
            None
        };

        tracing::debug!(
            "edit {} = {} on {}: changed={} cascaded={}",
            key,
            value,
            subscription,
            changed,
            cascaded.len()
        );

        Ok(EditOutcome {
            key,
            subscription: scope_sub,
            value,
            changed,
            cascaded,
            command,
        })
    }

    fn publish_change(
        &self,
        key: PreferenceKey,
        subscription: Option<SubscriptionId>,
        value: &PrefValue,
    ) {
        self.bus
            .publish(AppEvent::Settings(SettingsEvent::PreferenceChanged {
                key: key.as_str().to_string(),
                subscription,
                value: value.to_string(),
            }))
            .ok();
    }
}

impl std::fmt::Debug for SettingsController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsController")
            .field("active", &self.active)
            .field("surfaces", &self.surfaces.len())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
