// TiltSense — tilt sensor to player-command pipeline
//
//   sampler task ──trigger──▶ ADC ──complete──▶ capture handler
//                                                   │ latest reading + data-ready
//                                                   ▼
//   player task ◀──bounded queue── classifier task

pub mod config;
pub mod drivers;
pub mod events;
pub mod isr;
pub mod notify;
pub mod pipeline;
pub mod queue;
pub mod shared;
pub mod stats;
pub mod tasks;
