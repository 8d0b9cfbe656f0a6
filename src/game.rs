//! Game state as seen by the HUD
//!
//! Everything is read through [`GameStateProvider`] as owned snapshots, so an
//! entity can vanish between two calls in the same frame. Callers treat a
//! `None` as "skip this sub-element".

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Healer,
    Dps,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Job {
    Paladin,
    Warrior,
    WhiteMage,
    Scholar,
    Machinist,
    Ninja,
    Dragoon,
    BlackMage,
    Other,
}

impl Job {
    pub fn role(self) -> Role {
        match self {
            Job::Paladin | Job::Warrior => Role::Tank,
            Job::WhiteMage | Job::Scholar => Role::Healer,
            Job::Machinist | Job::Ninja | Job::Dragoon | Job::BlackMage => Role::Dps,
            Job::Other => Role::Other,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Job::Paladin => "PLD",
            Job::Warrior => "WAR",
            Job::WhiteMage => "WHM",
            Job::Scholar => "SCH",
            Job::Machinist => "MCH",
            Job::Ninja => "NIN",
            Job::Dragoon => "DRG",
            Job::BlackMage => "BLM",
            Job::Other => "---",
        }
    }
}

/// A character or NPC at the moment it was read
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub job: Job,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
}

impl EntitySnapshot {
    pub fn health_ratio(&self) -> f32 {
        self.hp as f32 / self.max_hp.max(1) as f32
    }
}

/// One row of the game's own enemy list
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyListEntry {
    pub id: EntityId,
    /// Marker letter assigned by the game, if any
    pub letter: Option<char>,
    /// 0 = no enmity, higher = closer to the top of the enmity list
    pub enmity_level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub name: String,
    /// Seconds left, 0 for permanent effects
    pub remaining: f32,
    pub stacks: u8,
    pub is_debuff: bool,
}

/// Per-job gauge payloads
#[derive(Debug, Clone, PartialEq)]
pub enum JobGauge {
    Machinist {
        heat: u8,
        battery: u8,
        /// Seconds, 0 when not overheated
        overheat_remaining: f32,
    },
    Ninja {
        ninki: u8,
        huton_remaining: f32,
    },
    Dragoon {
        blood_remaining: f32,
        /// Eyes of the dragon, 0..=2
        eyes: u8,
    },
}

impl JobGauge {
    pub fn job(&self) -> Job {
        match self {
            JobGauge::Machinist { .. } => Job::Machinist,
            JobGauge::Ninja { .. } => Job::Ninja,
            JobGauge::Dragoon { .. } => Job::Dragoon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimitBreakState {
    pub active: bool,
    /// Number of bars (levels) available
    pub max_level: u32,
    /// Units in one bar
    pub bar_units: u32,
    /// Units filled across all bars
    pub current: u32,
}

impl LimitBreakState {
    pub fn level(&self) -> u32 {
        if self.bar_units == 0 {
            return 0;
        }
        (self.current / self.bar_units).min(self.max_level)
    }

    pub fn total_units(&self) -> u32 {
        self.max_level * self.bar_units
    }
}

/// Read access to game state plus the few targeting commands the HUD issues
pub trait GameStateProvider {
    fn local_player(&self) -> Option<EntitySnapshot>;
    fn target(&self) -> Option<EntitySnapshot>;
    fn soft_target(&self) -> Option<EntitySnapshot>;
    fn focus_target(&self) -> Option<EntitySnapshot>;
    /// The target of `entity`, if it has one
    fn target_of(&self, entity: EntityId) -> Option<EntitySnapshot>;
    fn party_members(&self) -> Vec<EntitySnapshot>;
    fn enemy_list_entries(&self) -> Vec<EnemyListEntry>;
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;
    fn job_gauge(&self, job: Job) -> Option<JobGauge>;
    fn statuses(&self, entity: EntityId) -> Vec<StatusEffect>;
    fn limit_break(&self) -> LimitBreakState;

    fn set_target(&mut self, entity: EntityId);
    fn clear_target(&mut self);
    /// Mouse-over target used by the game's own targeting macros
    fn set_mouseover(&mut self, entity: Option<EntityId>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert_eq!(Job::Warrior.role(), Role::Tank);
        assert_eq!(Job::Scholar.role(), Role::Healer);
        assert_eq!(Job::Ninja.role(), Role::Dps);
        assert_eq!(Job::Other.role(), Role::Other);
    }

    #[test]
    fn test_limit_break_level() {
        let lb = LimitBreakState {
            active: true,
            max_level: 3,
            bar_units: 10_000,
            current: 25_000,
        };
        assert_eq!(lb.level(), 2);
        assert_eq!(lb.total_units(), 30_000);
        assert_eq!(LimitBreakState::default().level(), 0);
    }

    #[test]
    fn test_health_ratio_handles_zero_max() {
        let e = EntitySnapshot {
            id: EntityId(1),
            name: "Dummy".into(),
            job: Job::Other,
            level: 1,
            hp: 0,
            max_hp: 0,
        };
        assert_eq!(e.health_ratio(), 0.0);
    }
}
