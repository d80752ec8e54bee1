//! Data models

mod appointment;
mod business;
mod notification;
mod service;
mod session;
mod team;

pub use appointment::*;
pub use business::*;
pub use notification::*;
pub use service::*;
pub use session::*;
pub use team::*;
