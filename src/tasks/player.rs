// TiltSense — Player Task
//
// Downstream consumer of the command queue: slides the player along a
// bounded lane, one `speed` step per command.

use std::sync::mpsc::Receiver;

use crate::config::LANE_WIDTH;
use crate::events::{Direction, DirectionalCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    position: u16,
}

impl Player {
    /// Starts in the middle of the lane.
    pub fn new() -> Self {
        Self {
            position: LANE_WIDTH / 2,
        }
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    /// Apply one command, clamped to `0..=LANE_WIDTH`.  Returns the new position.
    pub fn apply(&mut self, command: DirectionalCommand) -> u16 {
        let step = u16::from(command.speed);
        self.position = match command.direction {
            Direction::Left => self.position.saturating_sub(step),
            Direction::Right => self.position.saturating_add(step).min(LANE_WIDTH),
            Direction::Center => self.position,
        };
        self.position
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

pub fn player_task(command_rx: Receiver<DirectionalCommand>) {
    log::info!("Player task started");

    let mut player = Player::new();

    loop {
        // Block until the classifier sends a command.
        let command = match command_rx.recv() {
            Ok(c) => c,
            Err(_) => {
                log::warn!("Command queue closed — exiting player task");
                return;
            }
        };

        let before = player.position();
        let after = player.apply(command);
        if before != after && (after == 0 || after == LANE_WIDTH) {
            log::info!("Player reached lane edge at {}", after);
        }
        log::debug!("Player {:?} → {}", command.direction, after);
    }
}
