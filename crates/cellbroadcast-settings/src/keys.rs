//! Preference key table
//!
//! Every alert preference is declared here once, with its value type, scope,
//! whether a change requires reprogramming the radio, its default and the
//! settings category it is shown under.

use cellbroadcast_core::SubscriptionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::RegionPolicy;
use crate::error::SettingsError;

/// Declared alert preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreferenceKey {
    EnableEmergencyAlerts,
    AlertSoundDuration,
    AlertReminderInterval,
    EnableAlertVibrate,
    EnableAlertSpeech,
    EnableAlertTone,
    EnableCmasPresidentialAlerts,
    EnableCmasExtremeThreatAlerts,
    EnableCmasSevereThreatAlerts,
    EnableCmasAmberAlerts,
    EnableEtwsTestAlerts,
    EnableCmasTestAlerts,
    EnableChannel50Alerts,
    EnableChannel60Alerts,
    ShowCmasOptOutDialog,
}

const SOUND_DURATIONS: &[&str] = &["2", "4", "5", "6", "8", "10"];
const REMINDER_INTERVALS: &[&str] = &["0", "1", "2", "15"];

impl PreferenceKey {
    /// All keys in presentation order
    pub const ALL: [PreferenceKey; 15] = [
        Self::EnableEmergencyAlerts,
        Self::AlertSoundDuration,
        Self::AlertReminderInterval,
        Self::EnableAlertVibrate,
        Self::EnableAlertSpeech,
        Self::EnableAlertTone,
        Self::EnableCmasPresidentialAlerts,
        Self::EnableCmasExtremeThreatAlerts,
        Self::EnableCmasSevereThreatAlerts,
        Self::EnableCmasAmberAlerts,
        Self::EnableEtwsTestAlerts,
        Self::EnableCmasTestAlerts,
        Self::EnableChannel50Alerts,
        Self::EnableChannel60Alerts,
        Self::ShowCmasOptOutDialog,
    ];

    /// Logical key name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnableEmergencyAlerts => "enable_emergency_alerts",
            Self::AlertSoundDuration => "alert_sound_duration",
            Self::AlertReminderInterval => "alert_reminder_interval",
            Self::EnableAlertVibrate => "enable_alert_vibrate",
            Self::EnableAlertSpeech => "enable_alert_speech",
            Self::EnableAlertTone => "enable_alert_tone",
            Self::EnableCmasPresidentialAlerts => "enable_cmas_presidential_alerts",
            Self::EnableCmasExtremeThreatAlerts => "enable_cmas_extreme_threat_alerts",
            Self::EnableCmasSevereThreatAlerts => "enable_cmas_severe_threat_alerts",
            Self::EnableCmasAmberAlerts => "enable_cmas_amber_alerts",
            Self::EnableEtwsTestAlerts => "enable_etws_test_alerts",
            Self::EnableCmasTestAlerts => "enable_cmas_test_alerts",
            Self::EnableChannel50Alerts => "enable_channel_50_alerts",
            Self::EnableChannel60Alerts => "enable_channel_60_alerts",
            Self::ShowCmasOptOutDialog => "show_cmas_opt_out_dialog",
        }
    }

    /// Declaration for this key
    pub fn spec(&self) -> KeySpec {
        use DefaultValue::{Bool, Choice, Policy};
        use Scope::{Global, PerSubscription};

        let boolean = ValueKind::Boolean;
        match self {
            Self::EnableEmergencyAlerts => {
                KeySpec::new(boolean, PerSubscription, true, Bool(true), Category::AlertSettings)
            }
            Self::AlertSoundDuration => KeySpec::new(
                ValueKind::Choice(SOUND_DURATIONS),
                PerSubscription,
                false,
                Choice("4"),
                Category::AlertSettings,
            ),
            Self::AlertReminderInterval => KeySpec::new(
                ValueKind::Choice(REMINDER_INTERVALS),
                PerSubscription,
                false,
                Choice("0"),
                Category::AlertSettings,
            ),
            Self::EnableAlertVibrate | Self::EnableAlertSpeech | Self::EnableAlertTone => {
                KeySpec::new(boolean, PerSubscription, false, Bool(true), Category::AlertSettings)
            }
            Self::EnableCmasPresidentialAlerts
            | Self::EnableCmasExtremeThreatAlerts
            | Self::EnableCmasSevereThreatAlerts
            | Self::EnableCmasAmberAlerts => {
                KeySpec::new(boolean, PerSubscription, true, Bool(true), Category::AlertSettings)
            }
            Self::EnableEtwsTestAlerts => {
                KeySpec::new(boolean, PerSubscription, true, Bool(false), Category::Etws)
            }
            Self::EnableCmasTestAlerts => {
                KeySpec::new(boolean, PerSubscription, true, Bool(false), Category::Developer)
            }
            Self::EnableChannel50Alerts => KeySpec::new(
                boolean,
                PerSubscription,
                true,
                Policy(|policy| policy.default_channel_50_enabled),
                Category::Brazil,
            ),
            Self::EnableChannel60Alerts => KeySpec::new(
                boolean,
                PerSubscription,
                true,
                Policy(|policy| policy.default_channel_60_enabled),
                Category::India,
            ),
            Self::ShowCmasOptOutDialog => {
                KeySpec::new(boolean, Global, false, Bool(true), Category::Developer)
            }
        }
    }

    /// Name under which the value is stored
    ///
    /// Per-subscription keys carry the slot digit as a suffix. Global keys,
    /// and per-subscription keys read without a subscription, use the bare
    /// name.
    pub fn storage_key(&self, subscription: Option<SubscriptionId>) -> String {
        match (self.spec().scope, subscription) {
            (Scope::PerSubscription, Some(sub)) => format!("{}{}", self.as_str(), sub.slot()),
            _ => self.as_str().to_string(),
        }
    }

    /// Whether a change requires reprogramming the radio
    pub fn is_radio_affecting(&self) -> bool {
        self.spec().radio_affecting
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PreferenceKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// Declared value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    /// One of a fixed list of string values
    Choice(&'static [&'static str]),
}

impl ValueKind {
    /// Whether `value` is acceptable for this type
    pub fn accepts(&self, value: &PrefValue) -> bool {
        match (self, value) {
            (ValueKind::Boolean, PrefValue::Bool(_)) => true,
            (ValueKind::Choice(options), PrefValue::Choice(choice)) => {
                options.contains(&choice.as_str())
            }
            _ => false,
        }
    }

    /// Convert `value` to this type, rejecting anything out of range
    ///
    /// Boolean keys also accept the strings `"true"` and `"false"`.
    pub fn coerce(&self, key: PreferenceKey, value: PrefValue) -> Result<PrefValue, SettingsError> {
        let value = match (self, value) {
            (ValueKind::Boolean, PrefValue::Choice(text)) => match text.as_str() {
                "true" => PrefValue::Bool(true),
                "false" => PrefValue::Bool(false),
                _ => PrefValue::Choice(text),
            },
            (_, value) => value,
        };

        if self.accepts(&value) {
            return Ok(value);
        }

        let reason = match self {
            ValueKind::Boolean => format!("expected a boolean, got '{}'", value),
            ValueKind::Choice(options) => {
                format!("'{}' is not one of {}", value, options.join(", "))
            }
        };
        Err(SettingsError::InvalidSetting {
            key: key.as_str().to_string(),
            reason,
        })
    }
}

/// Whether a key is namespaced by subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    PerSubscription,
    Global,
}

/// Declared default
#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Bool(bool),
    Choice(&'static str),
    /// Read from the region policy at lookup time
    Policy(fn(&RegionPolicy) -> bool),
}

impl DefaultValue {
    pub fn resolve(&self, policy: &RegionPolicy) -> PrefValue {
        match self {
            DefaultValue::Bool(value) => PrefValue::Bool(*value),
            DefaultValue::Choice(value) => PrefValue::Choice((*value).to_string()),
            DefaultValue::Policy(read) => PrefValue::Bool(read(policy)),
        }
    }
}

/// Settings screen grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AlertSettings,
    Etws,
    Brazil,
    India,
    Developer,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::AlertSettings,
        Category::Etws,
        Category::Brazil,
        Category::India,
        Category::Developer,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::AlertSettings => write!(f, "Alert settings"),
            Category::Etws => write!(f, "ETWS"),
            Category::Brazil => write!(f, "Brazil"),
            Category::India => write!(f, "India"),
            Category::Developer => write!(f, "Developer options"),
        }
    }
}

/// Declaration of one key
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub kind: ValueKind,
    pub scope: Scope,
    pub radio_affecting: bool,
    pub default: DefaultValue,
    pub category: Category,
}

impl KeySpec {
    const fn new(
        kind: ValueKind,
        scope: Scope,
        radio_affecting: bool,
        default: DefaultValue,
        category: Category,
    ) -> Self {
        Self {
            kind,
            scope,
            radio_affecting,
            default,
            category,
        }
    }
}

/// A preference value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Choice(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(value) => Some(*value),
            PrefValue::Choice(_) => None,
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(value) => write!(f, "{}", value),
            PrefValue::Choice(value) => f.write_str(value),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(value: bool) -> Self {
        PrefValue::Bool(value)
    }
}

impl From<&str> for PrefValue {
    fn from(value: &str) -> Self {
        PrefValue::Choice(value.to_string())
    }
}

/// A child preference gated on a parent
///
/// The child is forced false and its control disabled whenever the parent is
/// false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub parent: PreferenceKey,
    pub child: PreferenceKey,
}

/// Declared parent/child pairs
pub const DEPENDENCIES: &[Dependency] = &[Dependency {
    parent: PreferenceKey::EnableCmasExtremeThreatAlerts,
    child: PreferenceKey::EnableCmasSevereThreatAlerts,
}];

/// Keys gated on `parent`
pub fn children_of(parent: PreferenceKey) -> impl Iterator<Item = PreferenceKey> {
    DEPENDENCIES
        .iter()
        .filter(move |dep| dep.parent == parent)
        .map(|dep| dep.child)
}

/// Keys that gate `child`
pub fn parents_of(child: PreferenceKey) -> impl Iterator<Item = PreferenceKey> {
    DEPENDENCIES
        .iter()
        .filter(move |dep| dep.child == child)
        .map(|dep| dep.parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in PreferenceKey::ALL {
            assert_eq!(key.as_str().parse::<PreferenceKey>().ok(), Some(key));
        }
        assert!(matches!(
            "enable_everything".parse::<PreferenceKey>(),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_storage_key_format() {
        let key = PreferenceKey::EnableCmasExtremeThreatAlerts;
        assert_eq!(
            key.storage_key(Some(SubscriptionId(1))),
            "enable_cmas_extreme_threat_alerts1"
        );
        assert_eq!(key.storage_key(None), "enable_cmas_extreme_threat_alerts");

        let global = PreferenceKey::ShowCmasOptOutDialog;
        assert_eq!(
            global.storage_key(Some(SubscriptionId(1))),
            "show_cmas_opt_out_dialog"
        );
    }

    #[test]
    fn test_radio_affecting_keys() {
        let radio: Vec<_> = PreferenceKey::ALL
            .into_iter()
            .filter(PreferenceKey::is_radio_affecting)
            .collect();
        assert_eq!(radio.len(), 9);
        assert!(!PreferenceKey::AlertSoundDuration.is_radio_affecting());
        assert!(!PreferenceKey::ShowCmasOptOutDialog.is_radio_affecting());
        assert!(PreferenceKey::EnableChannel60Alerts.is_radio_affecting());
    }

    #[test]
    fn test_choice_coercion() {
        let kind = PreferenceKey::AlertSoundDuration.spec().kind;
        assert_eq!(
            kind.coerce(PreferenceKey::AlertSoundDuration, "10".into()).ok(),
            Some(PrefValue::Choice("10".to_string()))
        );

        let err = kind
            .coerce(PreferenceKey::AlertSoundDuration, "3".into())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid setting 'alert_sound_duration': '3' is not one of 2, 4, 5, 6, 8, 10"
        );
        assert!(kind
            .coerce(PreferenceKey::AlertSoundDuration, true.into())
            .is_err());
    }

    #[test]
    fn test_boolean_coercion_accepts_strings() {
        let key = PreferenceKey::EnableAlertVibrate;
        let kind = key.spec().kind;
        assert_eq!(kind.coerce(key, "false".into()).ok(), Some(PrefValue::Bool(false)));
        assert!(kind.coerce(key, "yes".into()).is_err());
    }

    #[test]
    fn test_policy_defaults() {
        let mut policy = RegionPolicy::default();
        let default = PreferenceKey::EnableChannel50Alerts.spec().default;
        assert_eq!(default.resolve(&policy), PrefValue::Bool(false));

        policy.default_channel_50_enabled = true;
        assert_eq!(default.resolve(&policy), PrefValue::Bool(true));
    }

    #[test]
    fn test_dependency_lookup() {
        let children: Vec<_> = children_of(PreferenceKey::EnableCmasExtremeThreatAlerts).collect();
        assert_eq!(children, vec![PreferenceKey::EnableCmasSevereThreatAlerts]);

        let parents: Vec<_> = parents_of(PreferenceKey::EnableCmasSevereThreatAlerts).collect();
        assert_eq!(parents, vec![PreferenceKey::EnableCmasExtremeThreatAlerts]);

        assert_eq!(children_of(PreferenceKey::EnableCmasAmberAlerts).count(), 0);
    }

    #[test]
    fn test_pref_value_json_shape() {
        assert_eq!(serde_json::to_string(&PrefValue::Bool(true)).ok().as_deref(), Some("true"));
        let parsed: PrefValue = serde_json::from_str("\"15\"").expect("parse");
        assert_eq!(parsed, PrefValue::Choice("15".to_string()));
    }
}
