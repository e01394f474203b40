use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taskboard_cache::{QueryCache, QueryValue};
use taskboard_dnd::{DragKind, Reconciler};
use taskboard_model::{Board, List};

fn board_cache(lists: usize, tasks_per_list: usize) -> QueryCache {
    let list_ids: Vec<String> = (0..lists).map(|i| format!("L{i}")).collect();
    let mut cache = QueryCache::new();
    cache.insert(QueryValue::Board(
        Board::new("B", "Bench", "u1").with_lists(list_ids.clone()),
    ));
    for (i, id) in list_ids.iter().enumerate() {
        let tasks = (0..tasks_per_list).map(|t| format!("T{i}-{t}"));
        cache.insert(QueryValue::List(
            List::new(id.as_str(), id.as_str(), "B").with_tasks(tasks),
        ));
    }
    cache
}

fn preview_same_list(c: &mut Criterion) {
    let reconciler = Reconciler::new("B");

    c.bench_function("preview_same_list", |b| {
        let mut cache = board_cache(10, 50);
        b.iter(|| {
            reconciler.preview(&mut cache, DragKind::Task, black_box("T0-0"), black_box("T0-49"));
            reconciler.preview(&mut cache, DragKind::Task, black_box("T0-0"), black_box("T0-1"));
        })
    });
}

fn preview_cross_list(c: &mut Criterion) {
    let reconciler = Reconciler::new("B");

    c.bench_function("preview_cross_list", |b| {
        let mut cache = board_cache(10, 50);
        b.iter(|| {
            reconciler.preview(&mut cache, DragKind::Task, black_box("T0-0"), black_box("L9"));
            reconciler.preview(&mut cache, DragKind::Task, black_box("T0-0"), black_box("T0-1"));
        })
    });
}

fn preview_list_move(c: &mut Criterion) {
    let reconciler = Reconciler::new("B");

    c.bench_function("preview_list_move", |b| {
        let mut cache = board_cache(40, 0);
        b.iter(|| {
            reconciler.preview(&mut cache, DragKind::List, black_box("L0"), black_box("L39"));
            reconciler.preview(&mut cache, DragKind::List, black_box("L0"), black_box("L1"));
        })
    });
}

criterion_group!(benches, preview_same_list, preview_cross_list, preview_list_move);
criterion_main!(benches);
