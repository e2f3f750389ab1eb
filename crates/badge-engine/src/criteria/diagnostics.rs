//! 只记录一次的告警

use dashmap::DashSet;

/// 按 key 去重的告警闸门
///
/// 同一进程内每个 key 只放行一次，用于无法解析的条件字符串、
/// 年度目标为 0 等可能在每次评估时重复出现的问题
#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: DashSet<String>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// 首次出现返回 true
    pub fn first_time(&self, key: &str) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
