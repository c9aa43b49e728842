//! Fans cell solving out over a fixed worker pool.

use crate::layout::GridSize;
use crate::progress::ProgressSink;
use crate::solver::{Canvas, CellResult, CellTask, Solver};
use crate::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

/// Every cell of `grid`, farthest from the center first.
///
/// Distance is elliptical (`dx²/aspect + dy²·aspect`) so it is round in
/// screen space; ties go to the lower `(col, row)`.
pub fn ordered_tasks(grid: GridSize, aspect: f64) -> Vec<CellTask> {
    let (cx, cy) = (grid.cols as f64 / 2.0, grid.rows as f64 / 2.0);
    let distance = |t: &CellTask| {
        let dx = t.col as f64 - cx;
        let dy = t.row as f64 - cy;
        dx * dx / aspect + dy * dy * aspect
    };

    let mut tasks: Vec<CellTask> = (0..grid.rows)
        .flat_map(|row| (0..grid.cols).map(move |col| CellTask { col, row }))
        .collect();
    tasks.sort_by(|a, b| {
        distance(b)
            .total_cmp(&distance(a))
            .then_with(|| (a.col, a.row).cmp(&(b.col, b.row)))
    });
    tasks
}

/// Solve every cell with `threads` workers and collect results by grid index.
///
/// Workers pull from the pre-ordered queue; a single aggregator on the calling
/// thread blits each finished cell into `canvas` and reports progress, so the
/// returned grid does not depend on completion order.
pub fn run<'a>(
    solver: &Solver<'a>,
    grid: GridSize,
    aspect: f64,
    threads: usize,
    canvas: &mut Canvas,
    cell_size: (usize, usize),
    progress: &dyn ProgressSink,
) -> Result<Vec<Option<CellResult<'a>>>> {
    let tasks = ordered_tasks(grid, aspect);
    let total = tasks.len();
    let mut results: Vec<Option<CellResult<'a>>> = vec![None; total];

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("ansipaint-worker-{i}"))
        .build()?;

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(CellTask, Option<CellResult<'a>>)>();

    pool.in_place_scope(|s| {
        for _ in 0..threads.max(1) {
            let tx = tx.clone();
            let (tasks, next) = (&tasks, &next);
            s.spawn(move |_| {
                while let Some(&task) = tasks.get(next.fetch_add(1, Ordering::Relaxed)) {
                    if tx.send((task, solver.solve(task))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        for (done, (task, result)) in rx.iter().enumerate() {
            if let Some(cell) = &result {
                canvas.blit(cell, cell_size);
            }
            results[task.row * grid.cols + task.col] = result;
            progress.report((done + 1) as f32 / total as f32);
        }
    });

    Ok(results)
}
