use lmeter_core::types::{ConnectionStatus, Job};
use lmeter_core::{
    ClipRect, ClipRects, ConfigStore, EncounterFeed, GameEnvironment, MemoryClipboard,
    MeterManager,
};

/// Game state set by hand from the shell
#[derive(Debug, Clone, Default)]
pub struct ScriptedEnvironment {
    pub in_combat: bool,
    pub in_duty: bool,
    pub performing: bool,
    pub in_pvp: bool,
    pub in_golden_saucer: bool,
    pub in_field_operation: bool,
    pub player_name: Option<String>,
    pub job: Job,
}

impl GameEnvironment for ScriptedEnvironment {
    fn in_combat(&self) -> bool {
        self.in_combat
    }

    fn in_duty(&self) -> bool {
        self.in_duty
    }

    fn is_performing(&self) -> bool {
        self.performing
    }

    fn in_pvp(&self) -> bool {
        self.in_pvp
    }

    fn in_golden_saucer(&self) -> bool {
        self.in_golden_saucer
    }

    fn in_field_operation(&self) -> bool {
        self.in_field_operation
    }

    fn local_player_name(&self) -> Option<String> {
        self.player_name.clone()
    }

    fn job(&self) -> Job {
        self.job
    }
}

/// Opaque host windows covering parts of the screen
#[derive(Debug, Clone, Default)]
pub struct Occluders {
    pub rects: Vec<ClipRect>,
}

impl ClipRects for Occluders {
    fn clip_rect_for_area(&self, position: [f32; 2], size: [f32; 2]) -> Option<ClipRect> {
        let max = [position[0] + size[0], position[1] + size[1]];
        self.rects
            .iter()
            .find(|r| {
                r.min[0] < max[0] && position[0] < r.max[0] && r.min[1] < max[1] && position[1] < r.max[1]
            })
            .copied()
    }
}

/// Holds all state for the shell session.
pub struct CliContext {
    pub manager: MeterManager,
    pub feed: EncounterFeed,
    pub env: ScriptedEnvironment,
    pub occluders: Occluders,
    pub clipboard: MemoryClipboard,
    /// Number of snapshots published, used to stamp demo data
    pub published: u32,
}

impl CliContext {
    pub fn new(store: ConfigStore) -> Self {
        let manager = MeterManager::load(store);
        let mut feed = EncounterFeed::new(manager.feed_config().history_size);
        feed.set_status(ConnectionStatus::Connected);

        Self {
            manager,
            feed,
            env: ScriptedEnvironment::default(),
            occluders: Occluders::default(),
            clipboard: MemoryClipboard::default(),
            published: 0,
        }
    }
}
