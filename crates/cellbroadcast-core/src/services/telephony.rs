//! Telephony collaborator.

use serde::{Deserialize, Serialize};

use crate::data::{PhoneType, SubscriptionId};
use crate::error::TelephonyError;

/// Read-only view of the telephony stack
pub trait TelephonyInfo {
    /// Phone type of the active radio
    fn active_phone_type(&self) -> Result<PhoneType, TelephonyError>;

    /// Number of SIM slots on the device
    fn phone_count(&self) -> u32;

    /// Slot of the default SMS subscription
    fn default_subscription(&self) -> SubscriptionId;

    /// SIM country (ISO 3166 alpha-2, lowercase) of the default subscription
    fn sim_country_iso(&self) -> Option<String> {
        self.sim_country_iso_for(self.default_subscription())
    }

    /// SIM country (ISO 3166 alpha-2, lowercase) of one subscription
    fn sim_country_iso_for(&self, subscription: SubscriptionId) -> Option<String>;
}

/// Telephony backed by fixed configuration values
///
/// Used by the binary (values come from the config file) and by tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticTelephony {
    /// Reported phone type; `None` simulates an unreachable phone service
    pub phone_type: Option<PhoneType>,
    /// Number of SIM slots
    pub phone_count: u32,
    /// Default SMS slot
    pub default_slot: u32,
    /// SIM country per slot; empty entries mean no SIM
    pub sim_countries: Vec<String>,
}

impl Default for StaticTelephony {
    fn default() -> Self {
        Self {
            phone_type: Some(PhoneType::Gsm),
            phone_count: 1,
            default_slot: 0,
            sim_countries: Vec::new(),
        }
    }
}

impl StaticTelephony {
    /// Create a single-slot GSM telephony
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reported phone type
    pub fn with_phone_type(mut self, phone_type: PhoneType) -> Self {
        self.phone_type = Some(phone_type);
        self
    }

    /// Make phone type queries fail
    pub fn unavailable(mut self) -> Self {
        self.phone_type = None;
        self
    }

    /// Set the slot count
    pub fn with_phone_count(mut self, phone_count: u32) -> Self {
        self.phone_count = phone_count;
        self
    }

    /// Set the default SMS slot
    pub fn with_default_slot(mut self, slot: u32) -> Self {
        self.default_slot = slot;
        self
    }

    /// Set the SIM country of one slot
    pub fn with_sim_country(mut self, slot: u32, country: &str) -> Self {
        let index = slot as usize;
        if self.sim_countries.len() <= index {
            self.sim_countries.resize(index + 1, String::new());
        }
        self.sim_countries[index] = country.to_lowercase();
        self
    }
}

impl TelephonyInfo for StaticTelephony {
    fn active_phone_type(&self) -> Result<PhoneType, TelephonyError> {
        self.phone_type
            .ok_or_else(|| TelephonyError::ServiceUnavailable {
                service: "phone".to_string(),
            })
    }

    fn phone_count(&self) -> u32 {
        self.phone_count
    }

    fn default_subscription(&self) -> SubscriptionId {
        SubscriptionId(self.default_slot)
    }

    fn sim_country_iso_for(&self, subscription: SubscriptionId) -> Option<String> {
        self.sim_countries
            .get(subscription.slot() as usize)
            .filter(|country| !country.is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_defaults() {
        let telephony = StaticTelephony::new();
        assert_eq!(telephony.active_phone_type(), Ok(PhoneType::Gsm));
        assert_eq!(telephony.phone_count(), 1);
        assert_eq!(telephony.default_subscription(), SubscriptionId(0));
        assert_eq!(telephony.sim_country_iso(), None);
    }

    #[test]
    fn test_unavailable_phone_service() {
        let telephony = StaticTelephony::new().unavailable();
        assert!(matches!(
            telephony.active_phone_type(),
            Err(TelephonyError::ServiceUnavailable { .. })
        ));
    }

    #[test]
    fn test_country_lookup_per_slot() {
        let telephony = StaticTelephony::new()
            .with_phone_count(2)
            .with_default_slot(1)
            .with_sim_country(0, "BR")
            .with_sim_country(1, "in");

        assert_eq!(
            telephony.sim_country_iso_for(SubscriptionId(0)).as_deref(),
            Some("br")
        );
        assert_eq!(telephony.sim_country_iso().as_deref(), Some("in"));
        assert_eq!(telephony.sim_country_iso_for(SubscriptionId(5)), None);
    }
}
