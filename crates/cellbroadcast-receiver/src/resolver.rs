//! Carrier technology resolution
//!
//! Picks the configuration command variant from the active radio technology.

use cellbroadcast_core::{ChannelVariant, TelephonyInfo};
use std::rc::Rc;

/// Resolves which channel set applies to the active radio
#[derive(Clone)]
pub struct CarrierTechnologyResolver {
    telephony: Rc<dyn TelephonyInfo>,
}

impl CarrierTechnologyResolver {
    /// Create a resolver backed by a telephony collaborator
    pub fn new(telephony: Rc<dyn TelephonyInfo>) -> Self {
        Self { telephony }
    }

    /// Resolve the channel variant for the active phone type
    ///
    /// Never fails: an unavailable or failing telephony service resolves to
    /// [`ChannelVariant::Gsm`].
    pub fn resolve(&self) -> ChannelVariant {
        match self.telephony.active_phone_type() {
            Ok(phone_type) => ChannelVariant::from(phone_type),
            Err(e) => {
                tracing::warn!("active phone type query failed, assuming GSM: {}", e);
                ChannelVariant::Gsm
            }
        }
    }
}

impl std::fmt::Debug for CarrierTechnologyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierTechnologyResolver").finish_non_exhaustive()
    }
}
