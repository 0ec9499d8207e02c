mod log_publisher;
mod redpanda;

pub use log_publisher::LogEventPublisher;
pub use redpanda::{RedpandaClient, RedpandaEventPublisher};
