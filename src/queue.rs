// TiltSense — Downstream Command Queue
//
// Bounded FIFO between the classifier and the player task.  Sends block for
// as long as the queue is full; that stall is the pipeline's flow control.

use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender};

use crate::events::DirectionalCommand;

/// The consumer side of the queue has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed(pub DirectionalCommand);

impl fmt::Display for QueueClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command queue closed, dropped {:?}", self.0)
    }
}

impl std::error::Error for QueueClosed {}

pub trait CommandQueue: Send {
    /// Enqueue at the back, waiting without timeout for free space.
    fn send_blocking(&self, command: DirectionalCommand) -> Result<(), QueueClosed>;
}

impl CommandQueue for SyncSender<DirectionalCommand> {
    fn send_blocking(&self, command: DirectionalCommand) -> Result<(), QueueClosed> {
        self.send(command).map_err(|e| QueueClosed(e.0))
    }
}

/// Bounded queue holding at most `depth` commands.
pub fn command_queue(depth: usize) -> (SyncSender<DirectionalCommand>, Receiver<DirectionalCommand>) {
    mpsc::sync_channel(depth)
}
