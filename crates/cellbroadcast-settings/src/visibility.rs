//! Conditional visibility of settings
//!
//! Which categories and keys a subscription's settings surface exposes is a
//! function of developer mode, the region policy and SIM country. A key is
//! exposed when both its own rule and its category's rule hold.

use cellbroadcast_core::{SubscriptionId, TelephonyInfo};
use serde::Serialize;

use crate::config::RegionPolicy;
use crate::keys::{Category, PreferenceKey};

/// Inputs the visibility rules read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub developer_settings_enabled: bool,
    pub policy: RegionPolicy,
    /// SIM country of the surface's subscription
    pub sim_country: Option<String>,
    /// SIM country of the default subscription
    pub default_sim_country: Option<String>,
}

impl Environment {
    /// Capture the inputs for `subscription` from the telephony collaborator
    pub fn probe(
        telephony: &dyn TelephonyInfo,
        policy: &RegionPolicy,
        developer_settings_enabled: bool,
        subscription: SubscriptionId,
    ) -> Self {
        Self {
            developer_settings_enabled,
            policy: policy.clone(),
            sim_country: telephony.sim_country_iso_for(subscription),
            default_sim_country: telephony.sim_country_iso(),
        }
    }

    fn etws_visible(&self) -> bool {
        self.developer_settings_enabled || self.policy.show_etws_settings
    }

    fn sim_in(&self, countries: &[&str]) -> bool {
        self.sim_country
            .as_deref()
            .is_some_and(|country| countries.contains(&country))
    }

    /// Whether the category is shown
    pub fn category_visible(&self, category: Category) -> bool {
        match category {
            Category::AlertSettings => true,
            Category::Etws => self.etws_visible(),
            Category::Brazil => {
                self.policy.show_brazil_settings
                    || self.policy.show_india_settings
                    || self.sim_in(&["br", "in"])
            }
            // Reads the default subscription's country, not this surface's
            Category::India => {
                self.policy.show_india_settings
                    || self.default_sim_country.as_deref() == Some("in")
            }
            Category::Developer => self.developer_settings_enabled,
        }
    }

    /// Whether the key's own rule holds, ignoring its category
    pub fn key_rule(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::EnableEmergencyAlerts => {
                self.etws_visible() && !self.policy.remove_turn_on_notification
            }
            PreferenceKey::AlertSoundDuration | PreferenceKey::EnableAlertSpeech => {
                self.etws_visible()
            }
            PreferenceKey::AlertReminderInterval => !self.policy.remove_alert_reminder,
            PreferenceKey::EnableCmasExtremeThreatAlerts
            | PreferenceKey::EnableCmasSevereThreatAlerts
            | PreferenceKey::EnableCmasAmberAlerts => self.policy.show_cmas_settings,
            PreferenceKey::EnableAlertTone => self.policy.alert_tone_enabled,
            _ => true,
        }
    }

    /// Whether the key is exposed
    pub fn key_visible(&self, key: PreferenceKey) -> bool {
        self.category_visible(key.spec().category) && self.key_rule(key)
    }
}

/// Settings items exposed for one subscription
///
/// Evaluated once at construction; later changes to the inputs need a new
/// surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSurface {
    subscription: SubscriptionId,
    categories: Vec<Category>,
    keys: Vec<PreferenceKey>,
}

impl SettingsSurface {
    pub fn build(env: &Environment, subscription: SubscriptionId) -> Self {
        let categories: Vec<_> = Category::ALL
            .into_iter()
            .filter(|category| env.category_visible(*category))
            .collect();
        let keys: Vec<_> = PreferenceKey::ALL
            .into_iter()
            .filter(|key| env.key_visible(*key))
            .collect();

        tracing::debug!(
            "{} surface: {} categories, {} keys",
            subscription,
            categories.len(),
            keys.len()
        );

        Self {
            subscription,
            categories,
            keys,
        }
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    pub fn is_exposed(&self, key: PreferenceKey) -> bool {
        self.keys.contains(&key)
    }

    /// Exposed keys in presentation order
    pub fn keys(&self) -> &[PreferenceKey] {
        &self.keys
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbroadcast_core::StaticTelephony;

    fn env() -> Environment {
        Environment {
            developer_settings_enabled: false,
            policy: RegionPolicy::default(),
            sim_country: None,
            default_sim_country: None,
        }
    }

    #[test]
    fn test_default_environment() {
        let env = env();
        let surface = SettingsSurface::build(&env, SubscriptionId(0));

        assert_eq!(surface.categories(), &[Category::AlertSettings]);
        assert!(surface.is_exposed(PreferenceKey::EnableCmasExtremeThreatAlerts));
        assert!(surface.is_exposed(PreferenceKey::AlertReminderInterval));
        assert!(surface.is_exposed(PreferenceKey::EnableCmasPresidentialAlerts));
        assert!(!surface.is_exposed(PreferenceKey::EnableEmergencyAlerts));
        assert!(!surface.is_exposed(PreferenceKey::AlertSoundDuration));
        assert!(!surface.is_exposed(PreferenceKey::EnableAlertTone));
        assert!(!surface.is_exposed(PreferenceKey::EnableChannel50Alerts));
        assert!(!surface.is_exposed(PreferenceKey::ShowCmasOptOutDialog));
    }

    #[test]
    fn test_developer_mode_exposes_etws_and_developer_items() {
        let env = Environment {
            developer_settings_enabled: true,
            ..env()
        };

        assert!(env.key_visible(PreferenceKey::EnableEmergencyAlerts));
        assert!(env.key_visible(PreferenceKey::AlertSoundDuration));
        assert!(env.key_visible(PreferenceKey::EnableEtwsTestAlerts));
        assert!(env.key_visible(PreferenceKey::EnableCmasTestAlerts));
        assert!(env.key_visible(PreferenceKey::ShowCmasOptOutDialog));
    }

    #[test]
    fn test_policy_removals() {
        let mut env = env();
        env.policy.show_etws_settings = true;
        env.policy.remove_turn_on_notification = true;
        env.policy.remove_alert_reminder = true;
        env.policy.show_cmas_settings = false;

        assert!(!env.key_visible(PreferenceKey::EnableEmergencyAlerts));
        assert!(env.key_visible(PreferenceKey::EnableAlertSpeech));
        assert!(!env.key_visible(PreferenceKey::AlertReminderInterval));
        assert!(!env.key_visible(PreferenceKey::EnableCmasSevereThreatAlerts));
        assert!(env.key_visible(PreferenceKey::EnableCmasPresidentialAlerts));
    }

    #[test]
    fn test_alert_tone_policy_exposes_tone() {
        let mut env = env();
        env.policy.alert_tone_enabled = true;

        assert!(env.key_visible(PreferenceKey::EnableAlertTone));
        let surface = SettingsSurface::build(&env, SubscriptionId(1));
        assert!(surface.is_exposed(PreferenceKey::EnableAlertTone));
    }

    #[test]
    fn test_brazil_category_follows_subscription_country() {
        let mut env = env();
        env.sim_country = Some("br".to_string());
        assert!(env.key_visible(PreferenceKey::EnableChannel50Alerts));
        assert!(!env.key_visible(PreferenceKey::EnableChannel60Alerts));

        env.sim_country = Some("in".to_string());
        assert!(env.key_visible(PreferenceKey::EnableChannel50Alerts));
    }

    #[test]
    fn test_india_category_follows_default_country() {
        let telephony = StaticTelephony::new()
            .with_phone_count(2)
            .with_default_slot(0)
            .with_sim_country(0, "us")
            .with_sim_country(1, "in");
        let policy = RegionPolicy::default();

        // The Indian SIM sees channel 50 but not channel 60
        let second = Environment::probe(&telephony, &policy, false, SubscriptionId(1));
        assert!(second.key_visible(PreferenceKey::EnableChannel50Alerts));
        assert!(!second.key_visible(PreferenceKey::EnableChannel60Alerts));

        let telephony = telephony.with_default_slot(1);
        let first = Environment::probe(&telephony, &policy, false, SubscriptionId(0));
        assert!(!first.key_visible(PreferenceKey::EnableChannel50Alerts));
        assert!(first.key_visible(PreferenceKey::EnableChannel60Alerts));
    }

    #[test]
    fn test_india_policy_shows_both_regional_categories() {
        let mut env = env();
        env.policy.show_india_settings = true;
        let surface = SettingsSurface::build(&env, SubscriptionId(0));

        assert!(surface.categories().contains(&Category::Brazil));
        assert!(surface.categories().contains(&Category::India));
        assert!(surface.is_exposed(PreferenceKey::EnableChannel60Alerts));
    }
}
