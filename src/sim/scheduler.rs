//! Spawn scheduler
//!
//! Owns the active pulpits (oldest first), decides when and where the next
//! one appears, and evicts the oldest once the active limit is exceeded.
//! Only the oldest pulpit gates spawning, so the check is O(1) per tick.

use std::collections::VecDeque;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::pulpit::{Pulpit, PulpitId, PulpitTransition};
use super::state::GameEvent;
use crate::config::{PlatformConfig, SpawnThreshold, SpawnerConfig};
use crate::{GridDir, grid_neighbor};

/// Spawn scheduler and active set for one run
#[derive(Debug, Clone)]
pub struct Scheduler {
    platform: PlatformConfig,
    spawner: SpawnerConfig,
    /// Active pulpits in spawn order (oldest first)
    active: VecDeque<Pulpit>,
    last_position: Vec3,
    rng: Pcg32,
    run: u32,
    next_index: u32,
}

impl Scheduler {
    pub fn new(platform: PlatformConfig, spawner: SpawnerConfig, run: u32, seed: u64) -> Self {
        Self {
            last_position: spawner.origin,
            active: VecDeque::with_capacity(spawner.max_active + 1),
            platform,
            spawner,
            rng: Pcg32::seed_from_u64(seed),
            run,
            next_index: 0,
        }
    }

    /// Spawn the first pulpit of the run at the configured origin
    pub fn spawn_initial(&mut self, events: &mut Vec<GameEvent>) -> PulpitId {
        if !self.active.is_empty() {
            log::warn!("spawn_initial with {} pulpits still active, evicting", self.active.len());
            self.evict_down_to(0, events);
        }
        let origin = self.spawner.origin;
        self.spawn_at(origin, events)
    }

    /// Count every pulpit down, reporting collapse and destruction
    pub fn advance(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        for pulpit in self.active.iter_mut() {
            match pulpit.tick(dt) {
                Some(PulpitTransition::Collapsing) => {
                    events.push(GameEvent::PulpitCollapsing { id: pulpit.id });
                }
                Some(PulpitTransition::Destroyed) => {
                    events.push(GameEvent::PulpitDestroyed {
                        id: pulpit.id,
                        evicted: false,
                    });
                }
                None => {}
            }
        }
    }

    /// Prune destroyed pulpits, then spawn next to the last one if the
    /// oldest pulpit is running out. Returns the id of a new pulpit, if any.
    pub fn tick(&mut self, events: &mut Vec<GameEvent>) -> Option<PulpitId> {
        self.prune();

        let oldest_remaining = self.active.front()?.remaining_time();

        // Random thresholds are re-drawn every tick, even when the set is full
        let threshold = self.spawn_threshold();
        log::trace!(
            "Oldest pulpit has {:.3}s left, threshold {:.3}s",
            oldest_remaining,
            threshold
        );

        if oldest_remaining <= threshold && self.active.len() < self.spawner.max_active {
            Some(self.spawn_adjacent(events))
        } else {
            None
        }
    }

    /// Spawn a pulpit one grid step from the last spawn, in a random
    /// cardinal direction, then evict the oldest pulpits over the limit
    pub fn spawn_adjacent(&mut self, events: &mut Vec<GameEvent>) -> PulpitId {
        let dir = GridDir::ALL[self.rng.random_range(0..GridDir::ALL.len())];
        let position = grid_neighbor(self.last_position, dir, self.spawner.grid_spacing);
        let id = self.spawn_at(position, events);
        self.evict_down_to(self.spawner.max_active, events);
        id
    }

    /// Destroy the oldest pulpits until at most `limit` remain
    fn evict_down_to(&mut self, limit: usize, events: &mut Vec<GameEvent>) {
        while self.active.len() > limit {
            let Some(mut evicted) = self.active.pop_front() else {
                break;
            };
            let was_destroyed = evicted.is_destroyed();
            evicted.destroy();
            log::debug!("Evicted pulpit {} (stepped: {})", evicted.id, evicted.is_stepped());
            if !was_destroyed {
                events.push(GameEvent::PulpitDestroyed {
                    id: evicted.id,
                    evicted: true,
                });
            }
        }
    }

    /// Drop pulpits whose destruction has completed. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.active.len();
        self.active.retain(|p| !p.is_destroyed());
        before - self.active.len()
    }

    /// Derive a seed for the next run from this run's RNG stream
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    fn spawn_at(&mut self, position: Vec3, events: &mut Vec<GameEvent>) -> PulpitId {
        let id = PulpitId {
            run: self.run,
            index: self.next_index,
        };
        self.next_index += 1;

        let lifetime = self.draw_lifetime();
        let pulpit = Pulpit::spawn(id, position, lifetime, self.spawner.scale_up_duration);
        self.active.push_back(pulpit);
        self.last_position = position;

        log::debug!("Spawned pulpit {} at {} with lifetime {:.2}s", id, position, lifetime);
        events.push(GameEvent::PulpitSpawned {
            id,
            position,
            lifetime,
        });
        id
    }

    fn draw_lifetime(&mut self) -> f32 {
        self.rng
            .random_range(self.platform.min_lifetime..=self.platform.max_lifetime)
    }

    fn spawn_threshold(&mut self) -> f32 {
        match self.platform.spawn_threshold {
            SpawnThreshold::Random => self.draw_lifetime(),
            SpawnThreshold::Fixed(x) => x,
        }
    }

    pub fn find(&self, id: PulpitId) -> Option<&Pulpit> {
        self.active.iter().find(|p| p.id == id)
    }

    pub fn find_mut(&mut self, id: PulpitId) -> Option<&mut Pulpit> {
        self.active.iter_mut().find(|p| p.id == id)
    }

    pub fn oldest(&self) -> Option<&Pulpit> {
        self.active.front()
    }

    pub fn newest(&self) -> Option<&Pulpit> {
        self.active.back()
    }

    /// Active pulpits, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Pulpit> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn last_position(&self) -> Vec3 {
        self.last_position
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn platform_config(&self) -> &PlatformConfig {
        &self.platform
    }

    pub fn spawner_config(&self) -> &SpawnerConfig {
        &self.spawner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scheduler(min: f32, max: f32, threshold: f32, max_active: usize, seed: u64) -> Scheduler {
        let platform = PlatformConfig::new(min, max, threshold).unwrap();
        let spawner = SpawnerConfig {
            max_active,
            ..Default::default()
        };
        Scheduler::new(platform, spawner, 0, seed)
    }

    fn adjacent_cells(from: Vec3, spacing: f32) -> Vec<Vec3> {
        GridDir::ALL
            .iter()
            .map(|&d| grid_neighbor(from, d, spacing))
            .collect()
    }

    #[test]
    fn test_spawn_initial_at_origin() {
        let mut s = scheduler(2.0, 4.0, 0.0, 2, 1);
        let mut events = Vec::new();
        let id = s.spawn_initial(&mut events);

        assert_eq!(s.len(), 1);
        assert_eq!(s.last_position(), Vec3::ZERO);
        let p = s.find(id).unwrap();
        assert_eq!(p.position, Vec3::ZERO);
        assert!((2.0..=4.0).contains(&p.lifetime()));
        assert!(matches!(events[0], GameEvent::PulpitSpawned { id: e, .. } if e == id));
    }

    #[test]
    fn test_no_spawn_while_oldest_fresh() {
        // Fixed threshold well below the lifetime
        let mut s = scheduler(5.0, 5.0, 1.0, 2, 7);
        let mut events = Vec::new();
        s.spawn_initial(&mut events);

        s.advance(3.0, &mut events);
        assert_eq!(s.tick(&mut events), None);
        assert_eq!(s.len(), 1);

        s.advance(1.0, &mut events);
        let id = s.tick(&mut events).unwrap();
        assert_eq!(s.len(), 2);
        let p = s.find(id).unwrap();
        assert!(adjacent_cells(Vec3::ZERO, 9.0).contains(&p.position));
        assert_eq!(s.last_position(), p.position);
    }

    #[test]
    fn test_full_set_blocks_spawn() {
        let mut s = scheduler(5.0, 5.0, 10.0, 2, 3);
        let mut events = Vec::new();
        s.spawn_initial(&mut events);
        assert!(s.tick(&mut events).is_some());
        assert_eq!(s.len(), 2);
        assert_eq!(s.tick(&mut events), None);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_spawn_adjacent_evicts_oldest() {
        let mut s = scheduler(5.0, 5.0, 0.0, 2, 11);
        let mut events = Vec::new();
        let first = s.spawn_initial(&mut events);
        let second = s.spawn_adjacent(&mut events);
        let third = s.spawn_adjacent(&mut events);

        assert_eq!(s.len(), 2);
        assert!(s.find(first).is_none());
        assert_eq!(s.oldest().unwrap().id, second);
        assert_eq!(s.newest().unwrap().id, third);
        assert!(events.contains(&GameEvent::PulpitDestroyed {
            id: first,
            evicted: true
        }));
    }

    #[test]
    fn test_iter_runs_both_ways() {
        let mut s = scheduler(5.0, 5.0, 0.0, 3, 13);
        let mut events = Vec::new();
        let first = s.spawn_initial(&mut events);
        let second = s.spawn_adjacent(&mut events);
        let third = s.spawn_adjacent(&mut events);

        let oldest_first: Vec<PulpitId> = s.iter().map(|p| p.id).collect();
        let newest_first: Vec<PulpitId> = s.iter().rev().map(|p| p.id).collect();
        assert_eq!(oldest_first, vec![first, second, third]);
        assert_eq!(newest_first, vec![third, second, first]);
    }

    #[test]
    fn test_spawn_initial_evicts_leftovers() {
        let mut s = scheduler(5.0, 5.0, 0.0, 2, 17);
        let mut events = Vec::new();
        let first = s.spawn_initial(&mut events);
        let second = s.spawn_adjacent(&mut events);

        let mut events = Vec::new();
        let fresh = s.spawn_initial(&mut events);

        assert_eq!(s.len(), 1);
        assert_eq!(s.oldest().unwrap().id, fresh);
        assert_eq!(s.last_position(), Vec3::ZERO);
        assert_eq!(
            &events[..2],
            &[
                GameEvent::PulpitDestroyed {
                    id: first,
                    evicted: true
                },
                GameEvent::PulpitDestroyed {
                    id: second,
                    evicted: true
                },
            ]
        );
    }

    #[test]
    fn test_destroyed_pulpits_pruned() {
        let mut s = scheduler(1.0, 1.0, 0.5, 1, 5);
        let mut events = Vec::new();
        let first = s.spawn_initial(&mut events);

        // Collapse then finish the shrink
        s.advance(0.8, &mut events);
        s.advance(1.0, &mut events);
        assert!(s.find(first).unwrap().is_destroyed());

        // Prune leaves the set empty, nothing to gate on
        assert_eq!(s.tick(&mut events), None);
        assert!(s.is_empty());
        assert!(events.contains(&GameEvent::PulpitCollapsing { id: first }));
        assert!(events.contains(&GameEvent::PulpitDestroyed {
            id: first,
            evicted: false
        }));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = scheduler(2.0, 4.0, 0.0, 3, 42);
        let mut b = scheduler(2.0, 4.0, 0.0, 3, 42);
        let mut ea = Vec::new();
        let mut eb = Vec::new();
        a.spawn_initial(&mut ea);
        b.spawn_initial(&mut eb);
        for _ in 0..600 {
            a.advance(1.0 / 60.0, &mut ea);
            a.tick(&mut ea);
            b.advance(1.0 / 60.0, &mut eb);
            b.tick(&mut eb);
        }
        assert_eq!(ea, eb);
    }

    proptest! {
        #[test]
        fn prop_lifetimes_within_bounds(
            min in 0.5f32..10.0,
            extra in 0.0f32..10.0,
            seed in any::<u64>(),
        ) {
            let max = min + extra;
            let mut s = scheduler(min, max, 0.0, 4, seed);
            let mut events = Vec::new();
            s.spawn_initial(&mut events);
            for _ in 0..20 {
                s.spawn_adjacent(&mut events);
            }
            for event in &events {
                if let GameEvent::PulpitSpawned { lifetime, .. } = event {
                    prop_assert!(*lifetime >= min && *lifetime <= max);
                }
            }
        }

        #[test]
        fn prop_active_set_bounded(
            max_active in 1usize..5,
            steps in proptest::collection::vec(0.0f32..0.5, 1..300),
            seed in any::<u64>(),
        ) {
            let mut s = scheduler(1.0, 3.0, 0.0, max_active, seed);
            let mut events = Vec::new();
            s.spawn_initial(&mut events);
            for dt in steps {
                s.advance(dt, &mut events);
                s.tick(&mut events);
                prop_assert!(s.len() <= max_active);
            }
        }

        #[test]
        fn prop_eviction_is_oldest_first(
            max_active in 1usize..4,
            spawns in 1usize..12,
            seed in any::<u64>(),
        ) {
            let mut s = scheduler(5.0, 6.0, 0.0, max_active, seed);
            let mut events = Vec::new();
            s.spawn_initial(&mut events);
            for _ in 0..spawns {
                let before: Vec<PulpitId> = s.iter().map(|p| p.id).collect();
                let mut spawn_events = Vec::new();
                s.spawn_adjacent(&mut spawn_events);
                prop_assert!(s.len() <= max_active);

                let evicted: Vec<PulpitId> = spawn_events
                    .iter()
                    .filter_map(|e| match e {
                        GameEvent::PulpitDestroyed { id, evicted: true } => Some(*id),
                        _ => None,
                    })
                    .collect();
                prop_assert_eq!(&evicted[..], &before[..evicted.len()]);

                let order: Vec<PulpitId> = s.iter().map(|p| p.id).collect();
                let mut sorted = order.clone();
                sorted.sort();
                prop_assert_eq!(order, sorted);
            }
        }

        #[test]
        fn prop_spawns_are_adjacent(seed in any::<u64>()) {
            let mut s = scheduler(5.0, 6.0, 0.0, 2, seed);
            let mut events = Vec::new();
            s.spawn_initial(&mut events);
            for _ in 0..10 {
                let from = s.last_position();
                let id = s.spawn_adjacent(&mut events);
                let pos = s.find(id).unwrap().position;
                prop_assert!(adjacent_cells(from, 9.0).contains(&pos));
            }
        }
    }
}
