//! 条件解析与评估性能基准测试
//!
//! 覆盖严格解析、兼容旧版文本的解析、单条评估以及整面徽章墙的进度计算。

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::HashSet;
use std::hint::black_box;

use badge_engine::{
    Badge, ConditionEvaluator, ParsedCriteria, UserSnapshot, badge_progress, default_catalog,
    parse_lenient, presets,
};

fn create_snapshot() -> UserSnapshot {
    UserSnapshot::new("bench-user")
        .with_books_read(15)
        .with_streak(8)
        .with_year_goal(20)
}

/// 条件解析基准
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for criteria in ["registration", "read_10", "goal_100", "  STREAK_30  ", "read_ten"] {
        group.bench_with_input(BenchmarkId::new("strict", criteria), &criteria, |b, s| {
            b.iter(|| ParsedCriteria::parse(black_box(s)))
        });
    }

    for criteria in ["read_10", "Прочтение 20 книг", "Приглашение друга", "совсем другое"] {
        group.bench_with_input(BenchmarkId::new("lenient", criteria), &criteria, |b, s| {
            b.iter(|| parse_lenient(black_box(s)))
        });
    }

    group.finish();
}

/// 单条评估基准
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let snapshot = create_snapshot();

    for preset in presets::ALL {
        let condition = ParsedCriteria::parse(preset);
        group.bench_with_input(BenchmarkId::from_parameter(preset), &condition, |b, c| {
            b.iter(|| ConditionEvaluator::evaluate(black_box(c.as_ref()), black_box(&snapshot)))
        });
    }

    group.finish();
}

/// 徽章墙进度基准
fn bench_badge_wall(c: &mut Criterion) {
    let mut group = c.benchmark_group("badge_wall");
    let snapshot = create_snapshot();
    let held: HashSet<String> = ["badge-registration".to_string()].into_iter().collect();

    for size in [6usize, 60, 600] {
        let badges: Vec<Badge> = default_catalog().into_iter().cycle().take(size).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &badges, |b, badges| {
            b.iter(|| badge_progress(black_box(badges), black_box(&snapshot), black_box(&held)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_evaluate, bench_badge_wall);
criterion_main!(benches);
