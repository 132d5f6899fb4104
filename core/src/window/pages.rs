//! Config pages that can be exported and imported on their own

use lmeter_types::{BarConfig, GeneralConfig, VisibilityConfig, VisibilitySettings};
use serde::{Deserialize, Serialize};

use crate::codec::{Bindable, KnownType};

/// One settings page of a meter window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ConfigPage {
    #[serde(rename = "lmeter.generalconfig")]
    General(GeneralConfig),
    #[serde(rename = "lmeter.barconfig")]
    Bars(BarConfig),
    #[serde(rename = "lmeter.visibilitysettings")]
    Visibility(VisibilitySettings),
    /// Only ever imported; converted on the way in
    #[serde(rename = "lmeter.visibilityconfig")]
    LegacyVisibility(VisibilityConfig),
}

impl ConfigPage {
    pub fn title(&self) -> &'static str {
        match self {
            ConfigPage::General(_) => "General",
            ConfigPage::Bars(_) => "Bars",
            ConfigPage::Visibility(_) | ConfigPage::LegacyVisibility(_) => "Visibility",
        }
    }
}

impl Bindable for ConfigPage {
    fn bound_type(&self) -> KnownType {
        match self {
            ConfigPage::General(_) => KnownType::GeneralPage,
            ConfigPage::Bars(_) => KnownType::BarPage,
            ConfigPage::Visibility(_) => KnownType::VisibilityPage,
            ConfigPage::LegacyVisibility(_) => KnownType::LegacyVisibilityPage,
        }
    }

    fn accepts(ty: KnownType) -> bool {
        ty.is_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, CodecError};
    use lmeter_types::{AppConfig, MeterDataType};

    #[test]
    fn pages_round_trip_through_codec() {
        let page = ConfigPage::General(GeneralConfig {
            data_type: MeterDataType::DamageTaken,
            lock: true,
            ..Default::default()
        });
        let blob = codec::encode(&page).unwrap();
        assert_eq!(codec::decode::<ConfigPage>(&blob).unwrap(), page);
    }

    #[test]
    fn plain_page_blob_decodes_as_config_page() {
        let blob = codec::encode(&BarConfig {
            bar_count: 3,
            ..Default::default()
        })
        .unwrap();
        let page = codec::decode::<ConfigPage>(&blob).unwrap();
        assert!(matches!(page, ConfigPage::Bars(bars) if bars.bar_count == 3));
    }

    #[test]
    fn non_page_blob_is_rejected() {
        let blob = codec::encode(&AppConfig::default()).unwrap();
        assert!(matches!(
            codec::decode::<ConfigPage>(&blob),
            Err(CodecError::TypeMismatch { .. })
        ));
    }
}
