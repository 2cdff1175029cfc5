//! HTTP 请求处理器

pub mod badge;
pub mod oauth;
pub mod quest;
pub mod submission;
pub mod user;
