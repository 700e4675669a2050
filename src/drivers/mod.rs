#[cfg(target_os = "espidf")]
pub mod adc;
pub mod frontend;
pub mod sim;
