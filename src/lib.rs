pub mod cmd;
pub mod conf;
mod global;
pub use global::*;
mod probe;
pub use probe::*;
mod store;
pub use store::*;
