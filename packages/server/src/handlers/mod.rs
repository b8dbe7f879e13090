pub mod auth;
pub mod category;
pub mod comment;
pub mod plugin;
pub mod post;
pub mod project;
pub mod search;
pub mod tag;
pub mod user;
