//! 中间件模块

pub mod auth;

pub use auth::{AdminUser, CurrentUser, StaffUser, auth_middleware};
