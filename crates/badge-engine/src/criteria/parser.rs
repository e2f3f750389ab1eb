//! 条件字符串解析

use std::sync::LazyLock;

use regex::Regex;

use super::{CriteriaKind, ParsedCriteria};

/// `<prefix>_<N>`，仅 ASCII 数字
static THRESHOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(read|referral|streak|goal)_([0-9]+)$").unwrap());

/// 按严格语法解析条件字符串
///
/// 先转小写并去除首尾空白；内部空白、未知前缀、非数字后缀、
/// 超出 u32 范围的阈值都视为无法解析。
pub(super) fn parse(criteria: &str) -> Option<ParsedCriteria> {
    let normalized = criteria.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if normalized == CriteriaKind::Registration.prefix() {
        return Some(ParsedCriteria::registration());
    }

    let captures = THRESHOLD_PATTERN.captures(&normalized)?;
    let kind = match &captures[1] {
        "read" => CriteriaKind::BooksRead,
        "referral" => CriteriaKind::Referral,
        "streak" => CriteriaKind::StreakDays,
        "goal" => CriteriaKind::YearGoalPercentage,
        _ => return None,
    };
    let threshold = captures[2].parse::<u32>().ok()?;

    Some(ParsedCriteria::new(kind, threshold))
}

/// 条件字符串是否可被严格语法识别
pub fn is_valid(criteria: &str) -> bool {
    parse(criteria).is_some()
}

/// 兼容旧版自由文本条件的解析
///
/// 先尝试严格语法，失败后识别早期徽章数据中的俄语描述。
/// 仅用于进度展示；发放路径只认严格语法。
pub fn parse_lenient(criteria: &str) -> Option<ParsedCriteria> {
    if let Some(parsed) = parse(criteria) {
        return Some(parsed);
    }

    let lower = criteria.to_lowercase();

    if lower.contains("первой книги") || lower.contains("первую книгу") {
        return Some(ParsedCriteria::books_read(1));
    }
    for count in [10, 20, 50] {
        if lower.contains(&format!("{} книг", count)) {
            return Some(ParsedCriteria::books_read(count));
        }
    }
    if lower.contains("регистрация") {
        return Some(ParsedCriteria::registration());
    }
    if lower.contains("друга") || lower.contains("приглашение") {
        return Some(ParsedCriteria::referral(1));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registration() {
        assert_eq!(parse("registration"), Some(ParsedCriteria::registration()));
        assert_eq!(parse("  Registration\n"), Some(ParsedCriteria::registration()));
    }

    #[test]
    fn test_parse_threshold_kinds() {
        assert_eq!(parse("read_10"), Some(ParsedCriteria::books_read(10)));
        assert_eq!(parse("referral_1"), Some(ParsedCriteria::referral(1)));
        assert_eq!(parse("streak_7"), Some(ParsedCriteria::streak_days(7)));
        assert_eq!(parse("goal_100"), Some(ParsedCriteria::year_goal_percentage(100)));
        assert_eq!(parse("READ_5"), Some(ParsedCriteria::books_read(5)));
        assert_eq!(parse("\tgoal_50 "), Some(ParsedCriteria::year_goal_percentage(50)));
        assert_eq!(parse("read_0"), Some(ParsedCriteria::books_read(0)));
        assert_eq!(parse("read_007"), Some(ParsedCriteria::books_read(7)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "   ",
            "read",
            "read_",
            "read_ 1",
            "read _1",
            "read_1a",
            "read_-1",
            "read_1.5",
            "reading_1",
            "books_10",
            "registration_1",
            "registrations",
            "read_10 read_20",
            "read_٣",
            "read_99999999999",
        ] {
            assert_eq!(parse(input), None, "{:?} should not parse", input);
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("streak_30"));
        assert!(!is_valid("Прочтение первой книги"));
    }

    #[test]
    fn test_parse_lenient_prefers_strict() {
        assert_eq!(parse_lenient("read_20"), Some(ParsedCriteria::books_read(20)));
    }

    #[test]
    fn test_parse_lenient_legacy_text() {
        assert_eq!(
            parse_lenient("Прочтение первой книги"),
            Some(ParsedCriteria::books_read(1))
        );
        assert_eq!(
            parse_lenient("Прочитай первую книгу"),
            Some(ParsedCriteria::books_read(1))
        );
        assert_eq!(
            parse_lenient("Прочтение 10 книг"),
            Some(ParsedCriteria::books_read(10))
        );
        assert_eq!(
            parse_lenient("Прочтение 50 книг"),
            Some(ParsedCriteria::books_read(50))
        );
        assert_eq!(
            parse_lenient("Регистрация в приложении"),
            Some(ParsedCriteria::registration())
        );
        assert_eq!(
            parse_lenient("Пригласи друга"),
            Some(ParsedCriteria::referral(1))
        );
        assert_eq!(parse_lenient("что-то другое"), None);
    }
}
