//! Immutable combat snapshots
//!
//! A snapshot is one timestamped view of every tracked combatant. The feed
//! hands them out behind `Arc` and replaces them wholesale; nothing in the
//! core writes to a snapshot once it has been published.

use chrono::NaiveDateTime;
use hashbrown::HashMap;
use lmeter_types::{Job, MeterDataType};

/// One tracked participant
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub name: String,
    pub job: Job,
    pub damage_total: Option<f64>,
    pub effective_healing: Option<f64>,
    pub damage_taken: Option<f64>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, job: Job) -> Self {
        Self {
            name: name.into(),
            job,
            damage_total: None,
            effective_healing: None,
            damage_taken: None,
        }
    }

    pub fn with_damage(mut self, value: f64) -> Self {
        self.damage_total = Some(value);
        self
    }

    pub fn with_healing(mut self, value: f64) -> Self {
        self.effective_healing = Some(value);
        self
    }

    pub fn with_damage_taken(mut self, value: f64) -> Self {
        self.damage_taken = Some(value);
        self
    }

    /// Value of the selected metric. Missing values and unknown selectors read as 0.
    pub fn value(&self, data_type: MeterDataType) -> f64 {
        match data_type {
            MeterDataType::Damage => self.damage_total,
            MeterDataType::Healing => self.effective_healing,
            MeterDataType::DamageTaken => self.damage_taken,
            MeterDataType::Unknown => None,
        }
        .unwrap_or(0.0)
    }
}

/// Encounter metadata shown in the header and the history menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterInfo {
    pub title: String,
    pub duration_secs: u64,
}

impl EncounterInfo {
    pub fn new(title: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            title: title.into(),
            duration_secs,
        }
    }

    /// Duration as "mm:ss"
    pub fn duration_label(&self) -> String {
        format!("{:02}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }
}

/// Timestamped combat metrics for all combatants at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub encounter: Option<EncounterInfo>,
    pub combatants: HashMap<String, Combatant>,
}

impl Snapshot {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            encounter: None,
            combatants: HashMap::new(),
        }
    }

    pub fn with_encounter(mut self, encounter: EncounterInfo) -> Self {
        self.encounter = Some(encounter);
        self
    }

    /// Add a combatant, keyed by name (a later entry with the same name wins)
    pub fn with_combatant(mut self, combatant: Combatant) -> Self {
        self.combatants.insert(combatant.name.clone(), combatant);
        self
    }

    /// Synthetic demo data for preview mode, stamped with the current time.
    pub fn preview() -> Self {
        const ROSTER: [(&str, Job, f64, f64, f64); 10] = [
            ("Thancred Waters", Job::Gnb, 412_880.0, 38_120.0, 291_004.0),
            ("YOU", Job::Sam, 988_412.0, 12_044.0, 88_310.0),
            ("Y'shtola Rhul", Job::Blm, 1_032_775.0, 9_410.0, 61_925.0),
            ("Alphinaud Leveilleur", Job::Sge, 301_559.0, 702_118.0, 70_442.0),
            ("Alisaie Leveilleur", Job::Rdm, 857_090.0, 64_221.0, 80_117.0),
            ("Urianger Augurelt", Job::Ast, 288_674.0, 655_903.0, 59_806.0),
            ("G'raha Tia", Job::Brd, 764_339.0, 21_570.0, 66_731.0),
            ("Estinien Varlineau", Job::Drg, 921_406.0, 0.0, 102_588.0),
            ("Krile Baldesion", Job::Pct, 845_012.0, 4_880.0, 49_377.0),
            ("Lyse Hext", Job::Mnk, 890_247.0, 7_902.0, 93_650.0),
        ];

        let now = chrono::Local::now().naive_local();
        ROSTER.iter().fold(
            Snapshot::new(now).with_encounter(EncounterInfo::new("Preview", 281)),
            |snapshot, &(name, job, damage, healing, taken)| {
                snapshot.with_combatant(
                    Combatant::new(name, job)
                        .with_damage(damage)
                        .with_healing(healing)
                        .with_damage_taken(taken),
                )
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_selects_metric() {
        let c = Combatant::new("A", Job::War)
            .with_damage(10.0)
            .with_healing(20.0)
            .with_damage_taken(30.0);
        assert_eq!(c.value(MeterDataType::Damage), 10.0);
        assert_eq!(c.value(MeterDataType::Healing), 20.0);
        assert_eq!(c.value(MeterDataType::DamageTaken), 30.0);
    }

    #[test]
    fn missing_or_unknown_metric_reads_zero() {
        let c = Combatant::new("A", Job::War).with_damage(10.0);
        assert_eq!(c.value(MeterDataType::Healing), 0.0);
        assert_eq!(c.value(MeterDataType::Unknown), 0.0);
    }

    #[test]
    fn duration_label_formats_minutes_and_seconds() {
        assert_eq!(EncounterInfo::new("x", 281).duration_label(), "04:41");
        assert_eq!(EncounterInfo::new("x", 5).duration_label(), "00:05");
    }

    #[test]
    fn preview_contains_local_player_placeholder() {
        let snapshot = Snapshot::preview();
        assert_eq!(snapshot.combatants.len(), 10);
        assert!(snapshot.combatants.contains_key("YOU"));
    }
}
