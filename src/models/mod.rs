pub mod chat;
pub mod post;
pub mod user;

pub use chat::*;
pub use post::*;
pub use user::*;
