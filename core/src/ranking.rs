//! Combatant ranking and per-window rank cache
//!
//! Ranking runs once per rendered frame, but the feed changes far less often
//! than that. `RankCache` keeps the sorted view for the last
//! (snapshot timestamp, metric) pair and hands the same `Arc` back until either
//! changes. Per-frame adjustments (scroll clamp, keeping the local player in
//! view, rank labels, name substitution) are applied to a working copy in
//! [`prepare_bars`] so the cached order is never disturbed.

use std::sync::Arc;

use chrono::NaiveDateTime;
use lmeter_types::MeterDataType;

use crate::feed::{Combatant, Snapshot};

/// Name the feed uses for the local player before it knows the character name
pub const LOCAL_PLAYER_PLACEHOLDER: &str = "YOU";

/// Working copy of a combatant with display-only annotations
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCombatant {
    pub combatant: Combatant,
    /// Metric value the list was sorted by
    pub value: f64,
    /// 1-based rank label, filled for visible bars only
    pub rank: String,
    pub name_overwrite: Option<String>,
}

impl RankedCombatant {
    fn new(combatant: &Combatant, data_type: MeterDataType) -> Self {
        Self {
            value: combatant.value(data_type),
            combatant: combatant.clone(),
            rank: String::new(),
            name_overwrite: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name_overwrite
            .as_deref()
            .unwrap_or(&self.combatant.name)
    }

    fn is_local_player(&self, local_player_name: &str) -> bool {
        let name = &self.combatant.name;
        name.contains(LOCAL_PLAYER_PLACEHOLDER)
            || (!local_player_name.is_empty() && name.contains(local_player_name))
    }
}

pub type RankedView = Arc<Vec<RankedCombatant>>;

/// Sorted view of the last ranked snapshot
#[derive(Debug, Default)]
pub struct RankCache {
    key: Option<(NaiveDateTime, MeterDataType)>,
    view: RankedView,
}

impl RankCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank `snapshot` by `data_type`, reusing the cached view when the
    /// snapshot timestamp and metric are unchanged. Preview data is always
    /// re-ranked.
    pub fn rank(&mut self, snapshot: &Snapshot, data_type: MeterDataType, preview: bool) -> RankedView {
        let key = (snapshot.timestamp, data_type);
        if !preview && self.key == Some(key) {
            return Arc::clone(&self.view);
        }

        let mut ranked: Vec<RankedCombatant> = snapshot
            .combatants
            .values()
            .map(|c| RankedCombatant::new(c, data_type))
            .collect();
        // Exact ties come out in no particular order
        ranked.sort_unstable_by(|a, b| b.value.total_cmp(&a.value));

        self.key = Some(key);
        self.view = Arc::new(ranked);
        Arc::clone(&self.view)
    }

    pub fn is_cached(&self, timestamp: NaiveDateTime, data_type: MeterDataType) -> bool {
        self.key == Some((timestamp, data_type))
    }

    /// Whether any view is cached
    pub fn is_warm(&self) -> bool {
        self.key.is_some()
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.view = RankedView::default();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Preparation
// ─────────────────────────────────────────────────────────────────────────────

/// Per-window bar options for one frame
#[derive(Debug, Clone, Copy)]
pub struct BarOptions<'a> {
    pub bar_count: usize,
    pub always_show_self: bool,
    pub use_character_name: bool,
    pub local_player_name: &'a str,
}

/// Bars ready for layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarList {
    /// Visible bars, top to bottom
    pub bars: Vec<RankedCombatant>,
    /// Value of the rank 1 combatant, for bar scaling
    pub top: f64,
    /// Clamped scroll offset the bars start at
    pub scroll: usize,
    /// Number of ranked combatants
    pub total: usize,
}

/// Clamp a scroll offset to `[0, max(0, total - bar_count)]`
pub fn clamp_scroll(scroll: i32, total: usize, bar_count: usize) -> usize {
    let max = total.saturating_sub(bar_count);
    usize::try_from(scroll).map_or(0, |s| s.min(max))
}

/// Move the local player into the window of `bar_count` rows starting at
/// `scroll`, landing on the nearest edge. Other entries keep their relative
/// order.
pub fn move_player_into_view(
    list: &mut Vec<RankedCombatant>,
    scroll: usize,
    bar_count: usize,
    local_player_name: &str,
) {
    if bar_count == 0 {
        return;
    }
    let Some(old_index) = list
        .iter()
        .position(|c| c.is_local_player(local_player_name))
    else {
        return;
    };

    let new_index = old_index
        .clamp(scroll, scroll + bar_count - 1)
        .min(list.len() - 1);
    if new_index == old_index {
        return;
    }

    let player = list.remove(old_index);
    list.insert(new_index, player);
}

/// Substitute the placeholder with the character name, or clear a stale
/// substitution once the option is off.
pub fn update_player_name(
    entry: &mut RankedCombatant,
    use_character_name: bool,
    local_player_name: &str,
) {
    if use_character_name && entry.combatant.name.contains(LOCAL_PLAYER_PLACEHOLDER) {
        entry.name_overwrite = Some(local_player_name.to_string());
    } else if !use_character_name && entry.name_overwrite.is_some() {
        entry.name_overwrite = None;
    }
}

/// Build the visible bar list from a ranked view
pub fn prepare_bars(view: &[RankedCombatant], scroll: i32, options: &BarOptions<'_>) -> BarList {
    let Some(first) = view.first() else {
        return BarList::default();
    };

    let total = view.len();
    let top = first.value;
    let scroll = clamp_scroll(scroll, total, options.bar_count);

    let mut working = view.to_vec();
    if options.always_show_self && total > options.bar_count {
        move_player_into_view(
            &mut working,
            scroll,
            options.bar_count,
            options.local_player_name,
        );
    }

    let end = (scroll + options.bar_count).min(total);
    let bars = working
        .drain(scroll..end)
        .enumerate()
        .map(|(offset, mut entry)| {
            entry.rank = (scroll + offset + 1).to_string();
            update_player_name(
                &mut entry,
                options.use_character_name,
                options.local_player_name,
            );
            entry
        })
        .collect();

    BarList {
        bars,
        top,
        scroll,
        total,
    }
}
