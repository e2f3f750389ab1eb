//! 徽章引擎领域模型
//!
//! 徽章目录、用户快照、获得记录与书单

pub mod award;
pub mod badge;
pub mod book;
pub mod user;

pub use award::{AwardRecord, NewAwardRecord};
pub use badge::Badge;
pub use book::{BookStatus, UserBook};
pub use user::UserSnapshot;
