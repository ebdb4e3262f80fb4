mod core;

pub use self::core::{execute, run};
