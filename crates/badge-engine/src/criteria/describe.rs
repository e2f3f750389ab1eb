//! 条件的用户可读描述

use super::{CriteriaKind, ParsedCriteria};

/// 生成展示给用户的条件描述
pub fn describe(criteria: &str) -> String {
    describe_condition(criteria, ParsedCriteria::parse(criteria).as_ref())
}

/// 按已解析的条件生成描述，空条件与无法识别的条件分别给出固定文案
pub(crate) fn describe_condition(criteria: &str, condition: Option<&ParsedCriteria>) -> String {
    if criteria.trim().is_empty() {
        return "Условие не указано".to_string();
    }
    match condition {
        Some(parsed) => describe_parsed(parsed),
        None => "Неизвестное условие".to_string(),
    }
}

fn describe_parsed(parsed: &ParsedCriteria) -> String {
    let n = parsed.threshold;
    match parsed.kind {
        CriteriaKind::Registration => "Регистрация в приложении".to_string(),
        CriteriaKind::BooksRead if n == 1 => "Прочтение первой книги".to_string(),
        CriteriaKind::BooksRead => format!("Прочтение {} книг", n),
        CriteriaKind::Referral if n == 1 => "Приглашение друга".to_string(),
        CriteriaKind::Referral => format!("Приглашение {} друзей", n),
        CriteriaKind::StreakDays => format!("Чтение {} дней подряд", n),
        CriteriaKind::YearGoalPercentage => format!("Достижение {}% годовой цели", n),
    }
}
