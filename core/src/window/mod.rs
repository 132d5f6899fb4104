//! Meter window controller
//!
//! A [`MeterWindow`] turns the feed into one frame of bars per render pass:
//!
//! 1. gate on visibility (skipped in preview) and occlusion
//! 2. follow combat start back to live data when configured
//! 3. resolve the selected snapshot (live, historical or preview)
//! 4. rank through the window's cache and prepare the visible bars
//!
//! Drawing itself belongs to the host; the frame is plain data.

mod pages;

#[cfg(test)]
mod window_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lmeter_types::{MeterDataType, MeterWindowConfig};
use tracing::debug;

use crate::feed::{CombatFeed, LIVE_EVENT, Snapshot};
use crate::ranking::{BarList, BarOptions, LOCAL_PLAYER_PLACEHOLDER, RankCache, prepare_bars};
use crate::visibility::{GameEnvironment, VisibilityContext, settings_visible};

pub use pages::ConfigPage;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

// ─────────────────────────────────────────────────────────────────────────────
// Collaborators
// ─────────────────────────────────────────────────────────────────────────────

/// Screen rectangle, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

/// Occlusion queries against other opaque host windows
pub trait ClipRects {
    /// A rect covering part of the area, if any
    fn clip_rect_for_area(&self, position: [f32; 2], size: [f32; 2]) -> Option<ClipRect>;
}

/// Nothing ever covers the meter
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipping;

impl ClipRects for NoClipping {
    fn clip_rect_for_area(&self, _position: [f32; 2], _size: [f32; 2]) -> Option<ClipRect> {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Output
// ─────────────────────────────────────────────────────────────────────────────

/// What a window is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Live,
    HistoricalEvent(usize),
    Preview,
}

/// Everything the host needs to draw one window for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MeterFrame {
    pub window_id: u64,
    pub name: String,
    /// Encounter title and "mm:ss" duration for the header
    pub title: Option<String>,
    pub duration: Option<String>,
    pub data_type: MeterDataType,
    pub bars: BarList,
    /// Absolute screen position (origin plus configured offset)
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub font_key: String,
    pub preview: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Context Menu
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Current,
    /// Index into the feed's past events
    Event(usize),
    Clear,
    Configure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub action: MenuAction,
}

impl MenuEntry {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Meter Window
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MeterWindow {
    id: u64,
    pub config: MeterWindowConfig,
    event_index: i32,
    scroll: i32,
    preview_event: Option<Arc<Snapshot>>,
    last_frame_was_preview: bool,
    last_frame_was_combat: bool,
    cache: RankCache,
}

impl MeterWindow {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(MeterWindowConfig::new(name))
    }

    pub fn from_config(config: MeterWindowConfig) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            config,
            event_index: LIVE_EVENT,
            scroll: 0,
            preview_event: None,
            last_frame_was_preview: false,
            last_frame_was_combat: false,
            cache: RankCache::new(),
        }
    }

    /// Process-unique identifier, stable for the window's lifetime
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn event_index(&self) -> i32 {
        self.event_index
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    pub fn state(&self) -> WindowState {
        if self.config.general.preview {
            return WindowState::Preview;
        }
        match usize::try_from(self.event_index) {
            Ok(index) => WindowState::HistoricalEvent(index),
            Err(_) => WindowState::Live,
        }
    }

    /// Show `index` (`LIVE_EVENT` for live data) from the top
    pub fn select_event(&mut self, index: i32) {
        debug!(window = %self.config.name, index, "Selected event");
        self.event_index = index;
        self.scroll = 0;
        self.cache.invalidate();
    }

    /// Drop the ranking cache
    pub fn clear(&mut self) {
        self.cache.invalidate();
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.config.general.preview = preview;
    }

    /// Positive deltas scroll towards rank 1
    pub fn on_mouse_wheel(&mut self, delta: i32) {
        self.scroll = self.scroll.saturating_sub(delta);
    }

    pub fn has_cached_view(&self) -> bool {
        self.cache.is_warm()
    }

    /// Produce this frame's bars, or `None` when the window is hidden or covered
    pub fn frame(
        &mut self,
        env: &dyn GameEnvironment,
        feed: &dyn CombatFeed,
        clip: &dyn ClipRects,
        origin: [f32; 2],
    ) -> Option<MeterFrame> {
        let combat = env.in_combat();
        let combat_started = combat && !self.last_frame_was_combat;
        self.last_frame_was_combat = combat;
        if combat_started
            && self.config.general.return_to_current
            && self.event_index != LIVE_EVENT
        {
            self.select_event(LIVE_EVENT);
        }

        let preview = self.config.general.preview;
        if !preview {
            let ctx = VisibilityContext::capture(env, feed.status());
            if !settings_visible(&self.config.visibility2, &ctx) {
                return None;
            }
        }

        let offset = self.config.general.position;
        let position = [origin[0] + offset[0], origin[1] + offset[1]];
        let size = self.config.general.size;
        if self.config.visibility2.should_clip
            && clip.clip_rect_for_area(position, size).is_some()
        {
            return None;
        }

        if preview && !self.last_frame_was_preview {
            self.preview_event = Some(Arc::new(Snapshot::preview()));
        } else if !preview {
            self.preview_event = None;
        }

        let snapshot = if preview {
            self.preview_event.clone()
        } else {
            feed.event(self.event_index)
        };

        let data_type = self.config.general.data_type;
        let bars = match &snapshot {
            Some(snapshot) if !snapshot.combatants.is_empty() => {
                let local_name = env
                    .local_player_name()
                    .unwrap_or_else(|| LOCAL_PLAYER_PLACEHOLDER.to_string());
                let options = BarOptions {
                    bar_count: self.config.bars.bar_count,
                    always_show_self: self.config.bars.always_show_self,
                    use_character_name: self.config.bars.use_character_name,
                    local_player_name: &local_name,
                };
                let view = self.cache.rank(snapshot, data_type, preview);
                let bars = prepare_bars(&view, self.scroll, &options);
                self.scroll = i32::try_from(bars.scroll).unwrap_or(i32::MAX);
                bars
            }
            _ => BarList::default(),
        };

        self.last_frame_was_preview = preview;

        let encounter = snapshot.as_ref().and_then(|s| s.encounter.as_ref());
        Some(MeterFrame {
            window_id: self.id,
            name: self.config.name.clone(),
            title: encounter.map(|e| e.title.clone()),
            duration: encounter.map(|e| e.duration_label()),
            data_type,
            bars,
            position,
            size,
            font_key: self.config.bars.font_key.clone(),
            preview,
        })
    }

    /// Context menu entries: current data, past events newest first, then
    /// clear and configure
    pub fn menu_entries(&self, feed: &dyn CombatFeed) -> Vec<MenuEntry> {
        let past = feed.past_events();
        let mut entries = Vec::with_capacity(past.len() + 3);
        entries.push(MenuEntry::new("Current Data", MenuAction::Current));

        for (index, event) in past.iter().enumerate().rev() {
            let label = match &event.encounter {
                Some(encounter) => format!("{} - {}", encounter.duration_label(), encounter.title),
                None => format!("00:00 - Encounter {}", index + 1),
            };
            entries.push(MenuEntry::new(label, MenuAction::Event(index)));
        }

        entries.push(MenuEntry::new("Clear Data", MenuAction::Clear));
        entries.push(MenuEntry::new("Configure", MenuAction::Configure));
        entries
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Config Pages
    // ─────────────────────────────────────────────────────────────────────────

    pub fn pages(&self) -> Vec<ConfigPage> {
        vec![
            ConfigPage::General(self.config.general.clone()),
            ConfigPage::Bars(self.config.bars.clone()),
            ConfigPage::Visibility(self.config.visibility2.clone()),
        ]
    }

    pub fn page(&self, title: &str) -> Option<ConfigPage> {
        self.pages()
            .into_iter()
            .find(|page| page.title().eq_ignore_ascii_case(title))
    }

    /// Replace the matching page. A legacy visibility page is converted into
    /// the current format.
    pub fn import_page(&mut self, page: ConfigPage) {
        match page {
            ConfigPage::General(general) => self.config.general = general,
            ConfigPage::Bars(bars) => self.config.bars = bars,
            ConfigPage::Visibility(settings) => self.config.visibility2 = settings,
            ConfigPage::LegacyVisibility(legacy) => {
                self.config.visibility2.set_old_config(&legacy);
                self.config.visibility = legacy;
            }
        }
        self.cache.invalidate();
    }
}
