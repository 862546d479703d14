pub mod mysql;

pub use mysql::*;
