pub mod account_status;
pub mod availability;
pub mod order_priority;
pub mod order_status;
pub mod stage_status;

pub use account_status::AccountStatus;
pub use availability::Availability;
pub use order_priority::OrderPriority;
pub use order_status::OrderStatus;
pub use stage_status::StageStatus;
