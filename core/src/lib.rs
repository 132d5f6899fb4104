pub mod codec;
pub mod context;
pub mod feed;
pub mod manager;
pub mod ranking;
pub mod scope;
pub mod visibility;
pub mod window;

// Re-exports for convenience
pub use lmeter_types as types;

pub use codec::{Bindable, CodecError, KnownType, TypeBinder, export_string, import_string};
pub use context::{ConfigError, ConfigStore, convert_old_configs};
pub use feed::{CombatFeed, Combatant, EncounterFeed, EncounterInfo, LIVE_EVENT, Snapshot};
pub use manager::{
    Clipboard, FontAtlas, FrameSink, MemoryClipboard, MeterManager, NoFonts, Notification,
};
pub use ranking::{BarList, RankCache, RankedCombatant, RankedView};
pub use scope::{ResourceScope, ScopedResource};
pub use visibility::{
    CustomJobEditor, GameEnvironment, JobListError, VisibilityContext, is_visible,
};
pub use window::{
    ClipRect, ClipRects, ConfigPage, MenuAction, MenuEntry, MeterFrame, MeterWindow, NoClipping,
    WindowState,
};
