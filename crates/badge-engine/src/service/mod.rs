//! 服务层

pub mod check_service;
pub mod dto;

pub use check_service::BadgeCheckService;
pub use dto::{AwardEarnedResponse, AwardFailure, AwardedBadge, CheckEarnedResponse};
