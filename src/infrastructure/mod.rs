pub mod dto;
pub mod planner;
pub mod pusher;
pub mod speech;
pub mod store;
