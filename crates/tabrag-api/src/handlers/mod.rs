mod ask;
mod health;

pub use ask::handle_ask;
pub use health::health_check;
