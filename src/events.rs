use std::collections::VecDeque;

use glam::Vec3;

use crate::player::PlayerClass;

/// Simulation events routed through the orchestrator so that combat actions
/// and score/UI reactions never hold direct references to each other.
/// Ordering is the push order within a tick, which makes the coupling
/// deterministic and testable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    PlayerAttack {
        position: Vec3,
        direction: Vec3,
        range: f32,
        angle: f32,
        damage: f32,
        class: PlayerClass,
    },
    EnemyDied {
        position: Vec3,
        score_value: u32,
    },
}

#[derive(Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_pop_in_push_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::EnemyDied {
            position: Vec3::ZERO,
            score_value: 1,
        });
        queue.push(GameEvent::EnemyDied {
            position: Vec3::X,
            score_value: 2,
        });
        assert_eq!(queue.len(), 2);
        match queue.pop() {
            Some(GameEvent::EnemyDied { score_value, .. }) => assert_eq!(score_value, 1),
            other => panic!("unexpected event: {other:?}"),
        }
        match queue.pop() {
            Some(GameEvent::EnemyDied { score_value, .. }) => assert_eq!(score_value, 2),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }
}
