use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;
use slimsgraph::{
    Field, JoinStep, MemoryRecordStore, RecordGraph, Row, Snapshot, SqliteRecordStore,
    join::add_roots, join_foreign_table,
};

const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);
const STEPS_PER_RUN: i64 = 8;

fn run(pk: i64) -> Row {
    Row::new("ExperimentRun", pk, vec![Field::new("xprn_pk", json!(pk))])
}

fn step(pk: i64, run: i64) -> Row {
    Row::new(
        "ExperimentRunStep",
        pk,
        vec![
            Field::new("xprs_pk", json!(pk)),
            Field::new("xprs_fk_experimentRun", json!(run)),
            Field::new("xprs_name", json!(format!("step {pk}"))),
        ],
    )
}

fn dataset(runs: i64) -> (Vec<Row>, Vec<Row>) {
    let run_rows: Vec<Row> = (1..=runs).map(run).collect();
    let step_rows = (1..=runs)
        .flat_map(|r| (0..STEPS_PER_RUN).map(move |s| step(r * 100 + s, r)))
        .collect();
    (run_rows, step_rows)
}

fn run_to_steps() -> JoinStep {
    JoinStep::new("ExperimentRun", "ExperimentRunStep", "xprs_fk_experimentRun").via("xprn_pk")
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_runs_to_steps");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for runs in [10_i64, 100, 500] {
        let (run_rows, step_rows) = dataset(runs);

        let mut memory = MemoryRecordStore::new();
        let mut sqlite = SqliteRecordStore::open_in_memory().expect("sqlite");
        sqlite.set_statement_cache_capacity(64);
        let snapshot = Snapshot {
            records: step_rows.clone(),
            ..Snapshot::default()
        };
        sqlite.import_snapshot(&snapshot).expect("import");
        for row in step_rows {
            memory.insert(row);
        }

        let step = run_to_steps();
        group.bench_with_input(BenchmarkId::new("memory", runs), &run_rows, |b, inputs| {
            b.iter(|| {
                let mut graph = RecordGraph::new();
                add_roots(&mut graph, inputs);
                memory.clear_queries();
                join_foreign_table(&memory, &step, inputs, Some(&mut graph)).expect("join")
            });
        });
        group.bench_with_input(BenchmarkId::new("sqlite", runs), &run_rows, |b, inputs| {
            b.iter(|| {
                let mut graph = RecordGraph::new();
                add_roots(&mut graph, inputs);
                join_foreign_table(&sqlite, &step, inputs, Some(&mut graph)).expect("join")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_join);
criterion_main!(benches);
