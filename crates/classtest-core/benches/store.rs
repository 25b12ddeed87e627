use std::collections::BTreeMap;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use classtest_core::model::Submission;
use classtest_core::statistics::student_stats;
use classtest_core::storage::MemoryStorage;
use classtest_core::store::SubmissionStore;

fn make_submission(student: usize, variant: usize) -> Submission {
    let answers: BTreeMap<u32, String> = (1..=10).map(|q| (q, format!("answer {q}"))).collect();
    Submission::new(
        format!("student-{student}"),
        format!("v{variant}"),
        answers,
        Utc::now(),
    )
}

fn populated_store(students: usize, variants: usize) -> SubmissionStore<MemoryStorage> {
    let mut store = SubmissionStore::load(MemoryStorage::new()).unwrap();
    for s in 0..students {
        for v in 0..variants {
            store.record(make_submission(s, v)).unwrap();
        }
    }
    store
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    group.bench_function("replace_in_500", |b| {
        b.iter_batched(
            || populated_store(100, 5),
            |mut store| store.record(black_box(make_submission(50, 2))).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("insert_into_500", |b| {
        b.iter_batched(
            || populated_store(100, 5),
            |mut store| store.record(black_box(make_submission(500, 0))).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_grade(c: &mut Criterion) {
    c.bench_function("grade_in_500", |b| {
        b.iter_batched(
            || populated_store(100, 5),
            |mut store| {
                store
                    .grade(black_box("student-99"), black_box("v4"), 40, "teacher")
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_load(c: &mut Criterion) {
    let json = populated_store(100, 5).into_storage().contents().unwrap();
    c.bench_function("load_500", |b| {
        b.iter(|| SubmissionStore::load(MemoryStorage::with_contents(black_box(json.clone()))).unwrap())
    });
}

fn bench_stats(c: &mut Criterion) {
    let store = populated_store(100, 5);
    c.bench_function("student_stats_500", |b| {
        b.iter(|| student_stats(black_box(store.submissions())))
    });
}

criterion_group!(benches, bench_record, bench_grade, bench_load, bench_stats);
criterion_main!(benches);
