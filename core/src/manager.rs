//! Meter window manager
//!
//! Owns every meter window plus the persisted settings around them, and
//! connects them to the host: drawing, context menu actions, clipboard
//! import/export and saving.

use std::fmt;

use lmeter_types::{AppConfig, FeedConfig, MeterWindowConfig};
use tracing::{debug, error, info};

use crate::codec;
use crate::context::{ConfigError, ConfigStore, convert_old_configs, convert_old_window};
use crate::feed::{CombatFeed, LIVE_EVENT};
use crate::scope::{ResourceScope, ScopedResource};
use crate::visibility::GameEnvironment;
use crate::window::{ClipRects, ConfigPage, MenuAction, MeterFrame, MeterWindow};

// ─────────────────────────────────────────────────────────────────────────────
// Host Collaborators
// ─────────────────────────────────────────────────────────────────────────────

/// Receives finished frames for drawing
pub trait FrameSink {
    fn draw_frame(&mut self, frame: &MeterFrame);
}

/// Fonts loaded by the host, looked up by key
pub trait FontAtlas {
    fn font(&self, key: &str) -> Option<&dyn ScopedResource>;
}

/// Host without custom fonts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFonts;

impl FontAtlas for NoFonts {
    fn font(&self, _key: &str) -> Option<&dyn ScopedResource> {
        None
    }
}

pub trait Clipboard {
    fn set_text(&mut self, text: String);
    fn text(&self) -> Option<String>;
}

/// Process-local clipboard
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }
}

/// Transient on-screen message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Info(message) | Notification::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

const EXPORTED: &str = "Export string copied to clipboard.";
const EXPORT_FAILED: &str = "Failed to Export!";
const IMPORT_FAILED: &str = "Failed to Import!";

// ─────────────────────────────────────────────────────────────────────────────
// Meter Manager
// ─────────────────────────────────────────────────────────────────────────────

pub struct MeterManager {
    store: ConfigStore,
    feed: FeedConfig,
    meters: Vec<MeterWindow>,
    /// Window whose settings are open, by id
    configuring: Option<u64>,
}

impl MeterManager {
    /// Load settings from `store`, converting legacy visibility pages
    pub fn load(store: ConfigStore) -> Self {
        let mut config = store.load();
        let converted = convert_old_configs(&mut config);

        let manager = Self::from_config(store, config);
        if converted > 0 {
            manager.save().ok();
        }
        manager
    }

    pub fn from_config(store: ConfigStore, config: AppConfig) -> Self {
        Self {
            store,
            feed: config.feed,
            meters: config
                .meters
                .into_iter()
                .map(MeterWindow::from_config)
                .collect(),
            configuring: None,
        }
    }

    /// Current settings as persisted
    pub fn config(&self) -> AppConfig {
        AppConfig {
            meters: self.meters.iter().map(|m| m.config.clone()).collect(),
            feed: self.feed.clone(),
        }
    }

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed
    }

    pub fn feed_config_mut(&mut self) -> &mut FeedConfig {
        &mut self.feed
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.store
            .save(&self.config())
            .inspect(|()| debug!(path = %self.store.path().display(), "Saved configuration"))
            .inspect_err(|e| {
                error!(error = %e, source = ?std::error::Error::source(e), "Failed to save configuration")
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Meter List
    // ─────────────────────────────────────────────────────────────────────────

    pub fn meters(&self) -> &[MeterWindow] {
        &self.meters
    }

    pub fn meter(&self, name: &str) -> Option<&MeterWindow> {
        self.meters.iter().find(|m| m.name() == name)
    }

    pub fn meter_mut(&mut self, name: &str) -> Option<&mut MeterWindow> {
        self.meters.iter_mut().find(|m| m.name() == name)
    }

    pub fn add_meter(&mut self, name: &str) -> Result<&mut MeterWindow, &'static str> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Meter name cannot be empty");
        }
        if self.meter(name).is_some() {
            return Err("A meter with that name already exists");
        }

        info!(name, "Added meter");
        Ok(self.push_meter(MeterWindowConfig::new(name)))
    }

    pub fn remove_meter(&mut self, name: &str) -> Result<MeterWindow, &'static str> {
        let index = self
            .meters
            .iter()
            .position(|m| m.name() == name)
            .ok_or("Meter not found")?;

        let removed = self.meters.remove(index);
        if self.configuring == Some(removed.id()) {
            self.configuring = None;
        }
        info!(name, "Removed meter");
        Ok(removed)
    }

    fn push_meter(&mut self, config: MeterWindowConfig) -> &mut MeterWindow {
        let index = self.meters.len();
        self.meters.push(MeterWindow::from_config(config));
        &mut self.meters[index]
    }

    /// `name`, or `name (n)` for the first free `n`
    fn unique_name(&self, name: &str) -> String {
        if self.meter(name).is_none() {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| self.meter(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data And Menus
    // ─────────────────────────────────────────────────────────────────────────

    /// Drop all feed history and return every window to live data
    pub fn clear(&mut self, feed: &mut dyn CombatFeed) {
        feed.clear();
        for meter in &mut self.meters {
            meter.select_event(LIVE_EVENT);
        }
        info!("Cleared combat data");
    }

    pub fn handle_menu(
        &mut self,
        name: &str,
        action: MenuAction,
        feed: &mut dyn CombatFeed,
    ) -> Result<(), &'static str> {
        let meter = self.meter_mut(name).ok_or("Meter not found")?;
        match action {
            MenuAction::Current => meter.select_event(LIVE_EVENT),
            MenuAction::Event(index) => {
                if index >= feed.past_events().len() {
                    return Err("Event not found");
                }
                let index = i32::try_from(index).map_err(|_| "Event not found")?;
                meter.select_event(index);
            }
            MenuAction::Clear => self.clear(feed),
            MenuAction::Configure => self.configuring = Some(meter.id()),
        }
        Ok(())
    }

    /// Window whose settings are open
    pub fn configuring(&self) -> Option<&MeterWindow> {
        let id = self.configuring?;
        self.meters.iter().find(|m| m.id() == id)
    }

    pub fn close_configuration(&mut self) {
        self.configuring = None;
    }

    /// Produce and hand over a frame for every visible window. Returns the
    /// number of frames drawn.
    pub fn draw(
        &mut self,
        env: &dyn GameEnvironment,
        feed: &dyn CombatFeed,
        clip: &dyn ClipRects,
        fonts: &dyn FontAtlas,
        sink: &mut dyn FrameSink,
        origin: [f32; 2],
    ) -> usize {
        let mut drawn = 0;
        for meter in &mut self.meters {
            let _font = ResourceScope::enter(fonts.font(&meter.config.bars.font_key));
            if let Some(frame) = meter.frame(env, feed, clip, origin) {
                sink.draw_frame(&frame);
                drawn += 1;
            }
        }
        drawn
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Import / Export
    // ─────────────────────────────────────────────────────────────────────────

    fn export(blob: Option<String>, clipboard: &mut dyn Clipboard) -> Notification {
        match blob {
            Some(blob) => {
                clipboard.set_text(blob);
                Notification::Info(EXPORTED.to_string())
            }
            None => Notification::Error(EXPORT_FAILED.to_string()),
        }
    }

    pub fn export_meter(&self, name: &str, clipboard: &mut dyn Clipboard) -> Notification {
        let blob = self
            .meter(name)
            .and_then(|m| codec::export_string(&m.config));
        Self::export(blob, clipboard)
    }

    /// Export one settings page (`General`, `Bars` or `Visibility`)
    pub fn export_page(
        &self,
        name: &str,
        page: &str,
        clipboard: &mut dyn Clipboard,
    ) -> Notification {
        let blob = self
            .meter(name)
            .and_then(|m| m.page(page))
            .and_then(|page| codec::export_string(&page));
        Self::export(blob, clipboard)
    }

    /// Add a meter from an export string. Legacy visibility settings are
    /// converted and a clashing name gets a numeric suffix.
    pub fn import_meter(&mut self, blob: &str) -> Notification {
        let Some(mut config) = codec::import_string::<MeterWindowConfig>(blob) else {
            return Notification::Error(IMPORT_FAILED.to_string());
        };

        if convert_old_window(&mut config) {
            debug!(name = %config.name, "Converted legacy visibility settings on import");
        }

        config.name = self.unique_name(&config.name);
        let name = config.name.clone();
        self.push_meter(config);
        info!(name = %name, "Imported meter");
        Notification::Info(format!("Imported meter '{name}'."))
    }

    pub fn import_page(&mut self, name: &str, blob: &str) -> Notification {
        let Some(meter) = self.meter_mut(name) else {
            return Notification::Error(IMPORT_FAILED.to_string());
        };
        let Some(page) = codec::import_string::<ConfigPage>(blob) else {
            return Notification::Error(IMPORT_FAILED.to_string());
        };

        let title = page.title();
        meter.import_page(page);
        info!(meter = name, page = title, "Imported config page");
        Notification::Info(format!("Imported {title} page."))
    }
}
