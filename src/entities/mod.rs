pub mod chat;
pub mod comment;
pub mod follow;
pub mod message;
pub mod post;
pub mod post_like;
pub mod user;
