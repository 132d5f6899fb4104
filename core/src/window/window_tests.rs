//! Frame state machine tests
//!
//! Drives meter windows against an in-memory feed and a scripted environment.

use chrono::{NaiveDate, NaiveDateTime};
use lmeter_types::{
    Job, MeterDataType, VisibilityConfig, VisibilityOption, VisibilityRules,
};

use super::*;
use crate::feed::{Combatant, EncounterFeed, EncounterInfo};

#[derive(Debug, Default)]
struct TestEnv {
    in_combat: bool,
    in_pvp: bool,
    player: Option<String>,
}

impl GameEnvironment for TestEnv {
    fn in_combat(&self) -> bool {
        self.in_combat
    }
    fn in_duty(&self) -> bool {
        false
    }
    fn is_performing(&self) -> bool {
        false
    }
    fn in_pvp(&self) -> bool {
        self.in_pvp
    }
    fn in_golden_saucer(&self) -> bool {
        false
    }
    fn in_field_operation(&self) -> bool {
        false
    }
    fn local_player_name(&self) -> Option<String> {
        self.player.clone()
    }
    fn job(&self) -> Job {
        Job::Sam
    }
}

struct Covered;

impl ClipRects for Covered {
    fn clip_rect_for_area(&self, position: [f32; 2], size: [f32; 2]) -> Option<ClipRect> {
        Some(ClipRect {
            min: position,
            max: [position[0] + size[0], position[1] + size[1]],
        })
    }
}

fn at(secs: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(20, 0, secs)
        .unwrap()
}

/// Snapshot with `count` combatants, damage descending from `count * 100`
fn roster(secs: u32, count: usize) -> Snapshot {
    (0..count).fold(Snapshot::new(at(secs)), |snapshot, i| {
        snapshot.with_combatant(
            Combatant::new(format!("Player {i}"), Job::War)
                .with_damage(((count - i) * 100) as f64)
                .with_healing((i * 10) as f64),
        )
    })
}

fn names(frame: &MeterFrame) -> Vec<&str> {
    frame.bars.bars.iter().map(|b| b.display_name()).collect()
}

fn ranks(frame: &MeterFrame) -> Vec<&str> {
    frame.bars.bars.iter().map(|b| b.rank.as_str()).collect()
}

#[test]
fn live_frame_ranks_feed_snapshot() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3).with_encounter(EncounterInfo::new("Striking Dummy", 75)));
    let mut window = MeterWindow::new("Damage");

    let frame = window
        .frame(&TestEnv::default(), &feed, &NoClipping, [0.0, 0.0])
        .unwrap();

    assert_eq!(names(&frame), ["Player 0", "Player 1", "Player 2"]);
    assert_eq!(ranks(&frame), ["1", "2", "3"]);
    assert_eq!(frame.bars.top, 300.0);
    assert_eq!(frame.title.as_deref(), Some("Striking Dummy"));
    assert_eq!(frame.duration.as_deref(), Some("01:15"));
    assert_eq!(window.state(), WindowState::Live);
}

#[test]
fn metric_selects_sort_key() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3));
    let mut window = MeterWindow::new("Healing");
    window.config.general.data_type = MeterDataType::Healing;

    let frame = window
        .frame(&TestEnv::default(), &feed, &NoClipping, [0.0, 0.0])
        .unwrap();
    assert_eq!(names(&frame), ["Player 2", "Player 1", "Player 0"]);
    assert_eq!(frame.bars.top, 20.0);
}

#[test]
fn empty_feed_still_draws_frame() {
    let feed = EncounterFeed::default();
    let mut window = MeterWindow::new("Damage");
    let frame = window
        .frame(&TestEnv::default(), &feed, &NoClipping, [0.0, 0.0])
        .unwrap();
    assert!(frame.bars.bars.is_empty());
    assert_eq!(frame.title, None);
    assert!(!window.has_cached_view());
}

#[test]
fn frame_position_is_offset_from_origin() {
    let feed = EncounterFeed::default();
    let mut window = MeterWindow::new("Damage");
    window.config.general.position = [10.0, 20.0];
    let frame = window
        .frame(&TestEnv::default(), &feed, &NoClipping, [100.0, 200.0])
        .unwrap();
    assert_eq!(frame.position, [110.0, 220.0]);
    assert_eq!(frame.size, window.config.general.size);
}

#[test]
fn hidden_window_produces_no_frame() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3));
    let mut window = MeterWindow::new("Damage");
    window.config.visibility2.options.push(VisibilityOption {
        name: "No PvP".to_string(),
        rules: VisibilityRules {
            hide_in_pvp: true,
            ..Default::default()
        },
    });

    let pvp = TestEnv {
        in_pvp: true,
        ..Default::default()
    };
    assert!(window.frame(&pvp, &feed, &NoClipping, [0.0, 0.0]).is_none());
    assert!(window
        .frame(&TestEnv::default(), &feed, &NoClipping, [0.0, 0.0])
        .is_some());
}

#[test]
fn preview_bypasses_visibility() {
    let feed = EncounterFeed::default();
    let mut window = MeterWindow::new("Damage");
    window.config.visibility2.options.push(VisibilityOption {
        name: "Hidden".to_string(),
        rules: VisibilityRules {
            always_hide: true,
            ..Default::default()
        },
    });
    assert!(window
        .frame(&TestEnv::default(), &feed, &NoClipping, [0.0, 0.0])
        .is_none());

    window.set_preview(true);
    let frame = window
        .frame(&TestEnv::default(), &feed, &NoClipping, [0.0, 0.0])
        .unwrap();
    assert!(frame.preview);
    assert_eq!(window.state(), WindowState::Preview);
}

#[test]
fn covered_window_is_skipped_only_when_clipping() {
    let feed = EncounterFeed::default();
    let mut window = MeterWindow::new("Damage");
    assert!(window
        .frame(&TestEnv::default(), &feed, &Covered, [0.0, 0.0])
        .is_none());

    window.config.visibility2.should_clip = false;
    assert!(window
        .frame(&TestEnv::default(), &feed, &Covered, [0.0, 0.0])
        .is_some());
}

#[test]
fn cache_survives_frames_until_snapshot_changes() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3));
    let mut window = MeterWindow::new("Damage");
    let env = TestEnv::default();

    let first = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert!(window.has_cached_view());
    let second = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(first, second);

    feed.publish(roster(1, 4));
    let third = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(third.bars.total, 4);

    window.clear();
    assert!(!window.has_cached_view());
}

#[test]
fn select_event_resets_scroll_and_cache() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 12));
    feed.end_encounter();
    feed.publish(roster(5, 3));

    let mut window = MeterWindow::new("Damage");
    let env = TestEnv::default();
    window.frame(&env, &feed, &NoClipping, [0.0, 0.0]);
    window.on_mouse_wheel(-2);

    window.select_event(0);
    assert_eq!(window.scroll(), 0);
    assert!(!window.has_cached_view());
    assert_eq!(window.state(), WindowState::HistoricalEvent(0));

    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(frame.bars.total, 12);
}

#[test]
fn scroll_is_clamped_and_written_back() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 12));
    let mut window = MeterWindow::new("Damage");
    let env = TestEnv::default();

    window.on_mouse_wheel(-10);
    assert_eq!(window.scroll(), 10);
    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(frame.bars.scroll, 4);
    assert_eq!(window.scroll(), 4);
    assert_eq!(ranks(&frame), ["5", "6", "7", "8", "9", "10", "11", "12"]);

    window.on_mouse_wheel(20);
    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(window.scroll(), 0);
    assert_eq!(frame.bars.bars[0].rank, "1");
}

#[test]
fn combat_start_returns_to_live() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3));
    feed.end_encounter();
    feed.publish(roster(9, 2));

    let mut window = MeterWindow::new("Damage");
    window.select_event(0);

    let mut env = TestEnv::default();
    window.frame(&env, &feed, &NoClipping, [0.0, 0.0]);
    assert_eq!(window.event_index(), 0);

    env.in_combat = true;
    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(window.event_index(), LIVE_EVENT);
    assert_eq!(frame.bars.total, 2);

    // Only the rising edge counts
    window.select_event(0);
    window.frame(&env, &feed, &NoClipping, [0.0, 0.0]);
    assert_eq!(window.event_index(), 0);
}

#[test]
fn combat_start_returns_to_live_for_window_hidden_out_of_combat() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3));
    feed.end_encounter();
    feed.publish(roster(9, 2));

    let mut window = MeterWindow::new("Damage");
    window.config.visibility2.options.push(VisibilityOption {
        name: "Combat only".to_string(),
        rules: VisibilityRules {
            hide_outside_combat: true,
            ..Default::default()
        },
    });
    window.select_event(0);

    let mut env = TestEnv::default();
    assert!(window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).is_none());
    assert_eq!(window.event_index(), 0);

    env.in_combat = true;
    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(window.event_index(), LIVE_EVENT);
    assert_eq!(frame.bars.total, 2);
}

#[test]
fn combat_start_keeps_selection_without_return_to_current() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 3));
    feed.end_encounter();

    let mut window = MeterWindow::new("Damage");
    window.config.general.return_to_current = false;
    window.select_event(0);

    let env = TestEnv {
        in_combat: true,
        ..Default::default()
    };
    window.frame(&env, &feed, &NoClipping, [0.0, 0.0]);
    assert_eq!(window.state(), WindowState::HistoricalEvent(0));
}

#[test]
fn preview_snapshot_is_regenerated_on_rising_edge() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 2));
    let mut window = MeterWindow::new("Damage");
    let env = TestEnv::default();

    window.set_preview(true);
    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(frame.bars.total, 10);
    assert_eq!(frame.bars.bars.len(), window.config.bars.bar_count);
    let first = window.preview_event.clone().unwrap();

    window.frame(&env, &feed, &NoClipping, [0.0, 0.0]);
    assert!(Arc::ptr_eq(&first, window.preview_event.as_ref().unwrap()));

    window.set_preview(false);
    let live = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(live.bars.total, 2);
    assert!(window.preview_event.is_none());

    window.set_preview(true);
    window.frame(&env, &feed, &NoClipping, [0.0, 0.0]);
    assert!(!Arc::ptr_eq(&first, window.preview_event.as_ref().unwrap()));
}

#[test]
fn local_player_kept_in_view_and_renamed() {
    let mut feed = EncounterFeed::default();
    let snapshot = roster(0, 11).with_combatant(Combatant::new("YOU", Job::Sam).with_damage(1.0));
    feed.publish(snapshot);

    let mut window = MeterWindow::new("Damage");
    window.config.bars.always_show_self = true;
    window.config.bars.use_character_name = true;
    let env = TestEnv {
        player: Some("Alice Liddell".to_string()),
        ..Default::default()
    };

    let frame = window.frame(&env, &feed, &NoClipping, [0.0, 0.0]).unwrap();
    assert_eq!(frame.bars.bars.len(), 8);
    let last = frame.bars.bars.last().unwrap();
    assert_eq!(last.combatant.name, "YOU");
    assert_eq!(last.display_name(), "Alice Liddell");
    assert_eq!(last.rank, "8");
}

#[test]
fn menu_lists_events_newest_first() {
    let mut feed = EncounterFeed::default();
    feed.publish(roster(0, 1).with_encounter(EncounterInfo::new("Trash", 42)));
    feed.end_encounter();
    feed.publish(roster(1, 1).with_encounter(EncounterInfo::new("Boss", 605)));
    feed.end_encounter();

    let window = MeterWindow::new("Damage");
    let entries = window.menu_entries(&feed);
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(
        labels,
        ["Current Data", "10:05 - Boss", "00:42 - Trash", "Clear Data", "Configure"]
    );
    assert_eq!(entries[1].action, MenuAction::Event(1));
    assert_eq!(entries[2].action, MenuAction::Event(0));
}

#[test]
fn import_page_replaces_matching_page() {
    let mut window = MeterWindow::new("Damage");
    let mut bars = window.config.bars.clone();
    bars.bar_count = 3;
    window.import_page(ConfigPage::Bars(bars));
    assert_eq!(window.config.bars.bar_count, 3);
    assert_eq!(window.pages().len(), 3);
    assert!(matches!(window.page("bars"), Some(ConfigPage::Bars(b)) if b.bar_count == 3));
}

#[test]
fn legacy_visibility_page_is_converted() {
    let mut window = MeterWindow::new("Damage");
    let legacy = VisibilityConfig {
        rules: VisibilityRules {
            hide_outside_combat: true,
            ..Default::default()
        },
        should_clip: false,
    };
    window.import_page(ConfigPage::LegacyVisibility(legacy));

    let settings = &window.config.visibility2;
    assert!(settings.initialized);
    assert!(!settings.should_clip);
    assert_eq!(settings.options.len(), 1);
    assert!(settings.options[0].rules.hide_outside_combat);
}

#[test]
fn window_ids_are_unique() {
    let a = MeterWindow::new("a");
    let b = MeterWindow::new("a");
    assert_ne!(a.id(), b.id());
}
