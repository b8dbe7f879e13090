pub mod auth;
pub mod category;
pub mod comment;
pub mod post;
pub mod project;
pub mod search;
pub mod shared;
pub mod tag;
