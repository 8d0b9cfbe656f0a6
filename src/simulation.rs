//! In-process game state
//!
//! Backs the preview host and the tests. `demo` builds a small encounter and
//! `tick` keeps it moving so bars animate.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::game::{
    EnemyListEntry, EntitySnapshot, GameStateProvider, Job, JobGauge, LimitBreakState, StatusEffect,
};
use crate::types::EntityId;

#[derive(Debug)]
pub struct SimulatedGame {
    pub player: Option<EntityId>,
    pub target: Option<EntityId>,
    pub soft_target: Option<EntityId>,
    pub focus: Option<EntityId>,
    pub entities: BTreeMap<EntityId, EntitySnapshot>,
    pub targets_of: BTreeMap<EntityId, EntityId>,
    pub party: Vec<EntityId>,
    pub enemies: Vec<EnemyListEntry>,
    pub gauges: Vec<JobGauge>,
    pub statuses: BTreeMap<EntityId, Vec<StatusEffect>>,
    pub limit_break: LimitBreakState,
    pub mouseover: Option<EntityId>,
    /// Every `set_mouseover` call, oldest first
    pub mouseover_calls: Vec<Option<EntityId>>,
    /// Every `set_target` call, oldest first
    pub target_calls: Vec<EntityId>,
    rng: StdRng,
}

impl Default for SimulatedGame {
    fn default() -> Self {
        Self {
            player: None,
            target: None,
            soft_target: None,
            focus: None,
            entities: BTreeMap::new(),
            targets_of: BTreeMap::new(),
            party: Vec::new(),
            enemies: Vec::new(),
            gauges: Vec::new(),
            statuses: BTreeMap::new(),
            limit_break: LimitBreakState::default(),
            mouseover: None,
            mouseover_calls: Vec::new(),
            target_calls: Vec::new(),
            rng: StdRng::seed_from_u64(0),
        }
    }
}

fn snapshot(id: u64, name: &str, job: Job, hp: u32, max_hp: u32) -> EntitySnapshot {
    EntitySnapshot {
        id: EntityId(id),
        name: name.to_string(),
        job,
        level: 90,
        hp,
        max_hp,
    }
}

impl SimulatedGame {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::default()
        }
    }

    pub fn add_entity(&mut self, entity: EntitySnapshot) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    /// A light party fighting three enemies
    pub fn demo(seed: u64) -> Self {
        let mut game = Self::with_seed(seed);

        let party = [
            snapshot(1, "Alisaie Leveilleur", Job::Machinist, 61_000, 74_000),
            snapshot(2, "Thancred Waters", Job::Warrior, 98_000, 112_000),
            snapshot(3, "Y'shtola Rhul", Job::WhiteMage, 58_000, 66_000),
            snapshot(4, "Estinien Varlineau", Job::Dragoon, 40_000, 79_000),
        ];
        for member in party {
            let id = game.add_entity(member);
            game.party.push(id);
        }
        game.player = Some(EntityId(1));

        let enemies = [
            snapshot(100, "Striking Dummy", Job::Other, 900_000, 1_000_000),
            snapshot(101, "Forgiven Gossip", Job::Other, 120_000, 300_000),
            snapshot(102, "Forgiven Rebellion", Job::Other, 280_000, 300_000),
        ];
        for (i, enemy) in enemies.into_iter().enumerate() {
            let id = game.add_entity(enemy);
            game.enemies.push(EnemyListEntry {
                id,
                letter: None,
                enmity_level: 3u8.saturating_sub(i as u8),
            });
        }
        game.target = Some(EntityId(100));
        game.focus = Some(EntityId(101));
        game.targets_of.insert(EntityId(100), EntityId(2));

        game.gauges = vec![
            JobGauge::Machinist {
                heat: 45,
                battery: 70,
                overheat_remaining: 0.0,
            },
            JobGauge::Dragoon {
                blood_remaining: 22.0,
                eyes: 1,
            },
        ];
        game.statuses.insert(
            EntityId(100),
            vec![
                StatusEffect {
                    name: "Bioblaster".into(),
                    remaining: 12.0,
                    stacks: 0,
                    is_debuff: true,
                },
                StatusEffect {
                    name: "Vulnerability Up".into(),
                    remaining: 0.0,
                    stacks: 2,
                    is_debuff: true,
                },
            ],
        );
        game.limit_break = LimitBreakState {
            active: true,
            max_level: 3,
            bar_units: 10_000,
            current: 13_500,
        };
        game
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            let roll: f32 = self.rng.r#gen();
            if let Some(entity) = self.entities.get_mut(&id) {
                let swing = (entity.max_hp as f32 * 0.05 * dt * (roll - 0.45) * 10.0) as i64;
                let hp = (entity.hp as i64 + swing).clamp(1, entity.max_hp as i64);
                entity.hp = hp as u32;
            }
        }

        for gauge in &mut self.gauges {
            match gauge {
                JobGauge::Machinist {
                    heat,
                    battery,
                    overheat_remaining,
                } => {
                    *heat = heat.saturating_add(1).min(100);
                    if *heat >= 100 {
                        *heat = 0;
                        *overheat_remaining = 8.0;
                    }
                    *overheat_remaining = (*overheat_remaining - dt).max(0.0);
                    *battery = ((*battery as f32 + dt * 3.0) as u8).min(100);
                }
                JobGauge::Ninja {
                    ninki,
                    huton_remaining,
                } => {
                    *ninki = ninki.saturating_add(1).min(100);
                    *huton_remaining = (*huton_remaining - dt).max(0.0);
                }
                JobGauge::Dragoon { blood_remaining, eyes } => {
                    *blood_remaining = (*blood_remaining - dt).max(0.0);
                    if *blood_remaining == 0.0 {
                        *blood_remaining = 30.0;
                        *eyes = (*eyes + 1) % 3;
                    }
                }
            }
        }

        let lb = &mut self.limit_break;
        lb.current = (lb.current + (dt * 400.0) as u32) % (lb.total_units() + 1);
    }
}

impl GameStateProvider for SimulatedGame {
    fn local_player(&self) -> Option<EntitySnapshot> {
        self.player.and_then(|id| self.entity(id))
    }

    fn target(&self) -> Option<EntitySnapshot> {
        self.target.and_then(|id| self.entity(id))
    }

    fn soft_target(&self) -> Option<EntitySnapshot> {
        self.soft_target.and_then(|id| self.entity(id))
    }

    fn focus_target(&self) -> Option<EntitySnapshot> {
        self.focus.and_then(|id| self.entity(id))
    }

    fn target_of(&self, entity: EntityId) -> Option<EntitySnapshot> {
        self.targets_of.get(&entity).and_then(|id| self.entity(*id))
    }

    fn party_members(&self) -> Vec<EntitySnapshot> {
        self.party.iter().filter_map(|id| self.entity(*id)).collect()
    }

    fn enemy_list_entries(&self) -> Vec<EnemyListEntry> {
        self.enemies.clone()
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).cloned()
    }

    fn job_gauge(&self, job: Job) -> Option<JobGauge> {
        self.gauges.iter().find(|g| g.job() == job).cloned()
    }

    fn statuses(&self, entity: EntityId) -> Vec<StatusEffect> {
        self.statuses.get(&entity).cloned().unwrap_or_default()
    }

    fn limit_break(&self) -> LimitBreakState {
        self.limit_break
    }

    fn set_target(&mut self, entity: EntityId) {
        debug!(entity = ?entity, "set target");
        self.target = Some(entity);
        self.target_calls.push(entity);
    }

    fn clear_target(&mut self) {
        self.target = None;
    }

    fn set_mouseover(&mut self, entity: Option<EntityId>) {
        self.mouseover = entity;
        self.mouseover_calls.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_consistent() {
        let game = SimulatedGame::demo(1);
        assert_eq!(game.local_player().map(|p| p.job), Some(Job::Machinist));
        assert_eq!(game.party_members().len(), 4);
        assert_eq!(game.target_of(EntityId(100)).map(|e| e.id), Some(EntityId(2)));
        assert!(game.job_gauge(Job::Machinist).is_some());
        assert!(game.job_gauge(Job::Ninja).is_none());
    }

    #[test]
    fn test_tick_keeps_values_in_range() {
        let mut game = SimulatedGame::demo(9);
        for _ in 0..500 {
            game.tick(0.1);
        }
        for entity in game.entities.values() {
            assert!(entity.hp >= 1 && entity.hp <= entity.max_hp);
        }
        assert!(game.limit_break.current <= game.limit_break.total_units());
    }

    #[test]
    fn test_missing_entities_are_none() {
        let mut game = SimulatedGame::demo(1);
        game.target = Some(EntityId(999));
        assert!(game.target().is_none());
        game.clear_target();
        assert!(game.target.is_none());
    }
}
