pub mod config;
pub mod menu;
pub mod model;
pub mod msg;
pub mod render;
pub mod store;

pub use config::Config;
pub use msg::{Msg, StoreEvent};
pub use store::AppStore;
