//! Type binder for encoded settings
//!
//! Encoded settings name their root type in a `"$type"` entry. Names are
//! resolved through a fixed allow-list instead of anything dynamic: every
//! bindable type has one canonical short name, any number of legacy aliases
//! (types that were renamed or moved keep loading) and its qualified Rust
//! path. A name outside the list is a `TypeLoad` error.
//!
//! Qualified names may carry a trailing `", <module>"` part as written by
//! older exporters; it is ignored.

use phf::phf_map;

use super::CodecError;

/// Allow-listed settings types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownType {
    AppConfig,
    FeedConfig,
    MeterWindow,
    GeneralPage,
    BarPage,
    VisibilityPage,
    LegacyVisibilityPage,
}

impl KnownType {
    pub const ALL: [KnownType; 7] = [
        KnownType::AppConfig,
        KnownType::FeedConfig,
        KnownType::MeterWindow,
        KnownType::GeneralPage,
        KnownType::BarPage,
        KnownType::VisibilityPage,
        KnownType::LegacyVisibilityPage,
    ];

    /// Name written by the encoder
    pub const fn canonical_name(&self) -> &'static str {
        match self {
            KnownType::AppConfig => "lmeter.appconfig",
            KnownType::FeedConfig => "lmeter.feedconfig",
            KnownType::MeterWindow => "lmeter.meterwindow",
            KnownType::GeneralPage => "lmeter.generalconfig",
            KnownType::BarPage => "lmeter.barconfig",
            KnownType::VisibilityPage => "lmeter.visibilitysettings",
            KnownType::LegacyVisibilityPage => "lmeter.visibilityconfig",
        }
    }

    /// Fully qualified Rust path of the bound type
    pub const fn qualified_name(&self) -> &'static str {
        match self {
            KnownType::AppConfig => "lmeter_types::AppConfig",
            KnownType::FeedConfig => "lmeter_types::FeedConfig",
            KnownType::MeterWindow => "lmeter_types::MeterWindowConfig",
            KnownType::GeneralPage => "lmeter_types::GeneralConfig",
            KnownType::BarPage => "lmeter_types::BarConfig",
            KnownType::VisibilityPage => "lmeter_types::VisibilitySettings",
            KnownType::LegacyVisibilityPage => "lmeter_types::VisibilityConfig",
        }
    }

    /// Types that can be exported and imported as a single config page
    pub const fn is_page(&self) -> bool {
        matches!(
            self,
            KnownType::GeneralPage
                | KnownType::BarPage
                | KnownType::VisibilityPage
                | KnownType::LegacyVisibilityPage
        )
    }
}

/// Canonical names and legacy aliases, lower case
static SHORT_NAMES: phf::Map<&'static str, KnownType> = phf_map! {
    "lmeter.appconfig" => KnownType::AppConfig,
    "lmeter.feedconfig" => KnownType::FeedConfig,
    "lmeter.meterwindow" => KnownType::MeterWindow,
    "lmeter.generalconfig" => KnownType::GeneralPage,
    "lmeter.barconfig" => KnownType::BarPage,
    "lmeter.visibilitysettings" => KnownType::VisibilityPage,
    "lmeter.visibilityconfig" => KnownType::LegacyVisibilityPage,
    // Renamed or moved in earlier releases
    "lmeter.config.lmeterconfig" => KnownType::AppConfig,
    "lmeter.act.actconfig" => KnownType::FeedConfig,
    "lmeter.meter.meterwindow" => KnownType::MeterWindow,
    "lmeter.config.generalconfig" => KnownType::GeneralPage,
    "lmeter.config.barconfig" => KnownType::BarPage,
    "lmeter.config.visibilityconfig2" => KnownType::VisibilityPage,
    "lmeter.config.visibilityconfig" => KnownType::LegacyVisibilityPage,
};

/// Qualified Rust paths, lower case
static QUALIFIED_NAMES: phf::Map<&'static str, KnownType> = phf_map! {
    "lmeter_types::appconfig" => KnownType::AppConfig,
    "lmeter_types::feedconfig" => KnownType::FeedConfig,
    "lmeter_types::meterwindowconfig" => KnownType::MeterWindow,
    "lmeter_types::generalconfig" => KnownType::GeneralPage,
    "lmeter_types::barconfig" => KnownType::BarPage,
    "lmeter_types::visibilitysettings" => KnownType::VisibilityPage,
    "lmeter_types::visibilityconfig" => KnownType::LegacyVisibilityPage,
};

/// Maps type names to allow-listed types and back
pub struct TypeBinder;

impl TypeBinder {
    pub fn bind_to_name(ty: KnownType) -> &'static str {
        ty.canonical_name()
    }

    pub fn bind_to_type(name: &str) -> Result<KnownType, CodecError> {
        let lowered = name.trim().to_lowercase();
        if let Some(ty) = SHORT_NAMES.get(lowered.as_str()) {
            return Ok(*ty);
        }

        let qualified = lowered.split(',').next().unwrap_or_default().trim();
        QUALIFIED_NAMES
            .get(qualified)
            .copied()
            .ok_or_else(|| CodecError::TypeLoad {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for ty in KnownType::ALL {
            let name = TypeBinder::bind_to_name(ty);
            assert_eq!(TypeBinder::bind_to_type(name).unwrap(), ty);
        }
    }

    #[test]
    fn qualified_names_resolve() {
        for ty in KnownType::ALL {
            assert_eq!(TypeBinder::bind_to_type(ty.qualified_name()).unwrap(), ty);
        }
    }

    #[test]
    fn lookup_ignores_case_and_module_suffix() {
        assert_eq!(
            TypeBinder::bind_to_type("LMeter.Act.ActConfig").unwrap(),
            KnownType::FeedConfig
        );
        assert_eq!(
            TypeBinder::bind_to_type("lmeter_types::BarConfig, lmeter-types 0.1.0").unwrap(),
            KnownType::BarPage
        );
    }

    #[test]
    fn unknown_name_is_type_load_error() {
        let err = TypeBinder::bind_to_type("System.Diagnostics.Process, System").unwrap_err();
        assert!(matches!(err, CodecError::TypeLoad { name } if name.starts_with("System.")));
    }
}
