pub mod category;
pub mod comment;
pub mod post;
pub mod post_tag;
pub mod post_view;
pub mod project;
pub mod tag;
pub mod user;
