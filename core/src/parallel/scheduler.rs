//! Work scheduling

use crate::error::*;
use crossbeam_channel::Sender;
use indicatif::ProgressBar;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Number of units a worker processes between progress messages.
const PROGRESS_GRANULARITY: u64 = 1024;

/// Default number of units per batch for `TimeScheduler`.
pub const DEFAULT_TIME_BATCH: u64 = 4096;

/// A single unit of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    /// Global unit index.
    pub index: u64,

    /// Pixel the unit belongs to, if the scheduler assigns pixels.
    pub pixel_index: Option<usize>,

    /// Sample index within the pixel, or the global index otherwise.
    pub sample_index: u64,
}

/// Distributes work units to a pool of worker threads.
pub trait Scheduler: Send + Sync {
    /// Returns the total number of units, if known in advance.
    fn len(&self) -> Option<u64>;

    /// Runs the workers to completion. Each worker creates its private state
    /// with `init` and processes its units with `process`. Returns the number
    /// of processed units and the worker states in worker id order.
    ///
    /// * `threads`  - Number of worker threads.
    /// * `progress` - Progress bar ticked by the dispatching thread.
    /// * `init`     - Creates the state of a worker given its id.
    /// * `process`  - Processes a unit.
    fn run_workers<S, G, F>(
        &self,
        threads: usize,
        progress: &ProgressBar,
        init: G,
        process: F,
    ) -> Result<(u64, Vec<S>)>
    where
        S: Send,
        G: Fn(usize) -> S + Sync,
        F: Fn(&mut S, WorkUnit) + Sync;

    /// Runs a stateless callback for each unit and returns the number of
    /// processed units.
    ///
    /// * `threads` - Number of worker threads.
    /// * `process` - Called with each unit and the worker id.
    fn run<F>(&self, threads: usize, process: F) -> Result<u64>
    where
        F: Fn(WorkUnit, usize) + Sync,
    {
        self.run_workers(threads, &ProgressBar::hidden(), |id| id, |id, unit| process(unit, *id))
            .map(|(processed, _)| processed)
    }
}

/// Processes a fixed total number of units. Each worker receives one
/// contiguous block of unit indices.
#[derive(Copy, Clone, Debug)]
pub struct SampleScheduler {
    /// Total number of units.
    pub samples: u64,
}

impl SampleScheduler {
    /// Create a new `SampleScheduler`.
    ///
    /// * `samples` - Total number of units.
    pub fn new(samples: u64) -> Result<Self> {
        if samples == 0 {
            return Err(RenderError::InvalidBudget);
        }
        Ok(Self { samples })
    }
}

impl Scheduler for SampleScheduler {
    fn len(&self) -> Option<u64> {
        Some(self.samples)
    }

    fn run_workers<S, G, F>(
        &self,
        threads: usize,
        progress: &ProgressBar,
        init: G,
        process: F,
    ) -> Result<(u64, Vec<S>)>
    where
        S: Send,
        G: Fn(usize) -> S + Sync,
        F: Fn(&mut S, WorkUnit) + Sync,
    {
        let threads = threads.max(1);
        spawn_workers(threads, progress, init, |id, state, tx| {
            let mut reporter = ProgressReporter::new(tx);
            for index in partition(self.samples, threads, id) {
                process(
                    state,
                    WorkUnit {
                        index,
                        pixel_index: None,
                        sample_index: index,
                    },
                );
                reporter.tick();
            }
            reporter.finish()
        })
    }
}

/// Processes a fixed number of samples for every pixel.
#[derive(Copy, Clone, Debug)]
pub struct SppScheduler {
    /// Image width.
    pub width: usize,

    /// Image height.
    pub height: usize,

    /// Samples per pixel.
    pub spp: u64,
}

impl SppScheduler {
    /// Create a new `SppScheduler`.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    /// * `spp`    - Samples per pixel.
    pub fn new(width: usize, height: usize, spp: u64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidFilmSize { width, height });
        }
        if spp == 0 {
            return Err(RenderError::InvalidBudget);
        }
        Ok(Self { width, height, spp })
    }
}

impl Scheduler for SppScheduler {
    fn len(&self) -> Option<u64> {
        Some((self.width * self.height) as u64 * self.spp)
    }

    fn run_workers<S, G, F>(
        &self,
        threads: usize,
        progress: &ProgressBar,
        init: G,
        process: F,
    ) -> Result<(u64, Vec<S>)>
    where
        S: Send,
        G: Fn(usize) -> S + Sync,
        F: Fn(&mut S, WorkUnit) + Sync,
    {
        let threads = threads.max(1);
        let total = (self.width * self.height) as u64 * self.spp;
        spawn_workers(threads, progress, init, |id, state, tx| {
            let mut reporter = ProgressReporter::new(tx);
            for index in partition(total, threads, id) {
                process(
                    state,
                    WorkUnit {
                        index,
                        pixel_index: Some((index / self.spp) as usize),
                        sample_index: index % self.spp,
                    },
                );
                reporter.tick();
            }
            reporter.finish()
        })
    }
}

/// Processes units in batches until a wall clock budget elapses. The number of
/// processed units depends on timing, so results are not reproducible.
#[derive(Copy, Clone, Debug)]
pub struct TimeScheduler {
    /// Time budget.
    pub duration: Duration,

    /// Units per batch.
    pub batch: u64,
}

impl TimeScheduler {
    /// Create a new `TimeScheduler`.
    ///
    /// * `duration` - Time budget.
    pub fn new(duration: Duration) -> Result<Self> {
        if duration.is_zero() {
            return Err(RenderError::InvalidBudget);
        }
        Ok(Self {
            duration,
            batch: DEFAULT_TIME_BATCH,
        })
    }
}

impl Scheduler for TimeScheduler {
    fn len(&self) -> Option<u64> {
        None
    }

    fn run_workers<S, G, F>(
        &self,
        threads: usize,
        progress: &ProgressBar,
        init: G,
        process: F,
    ) -> Result<(u64, Vec<S>)>
    where
        S: Send,
        G: Fn(usize) -> S + Sync,
        F: Fn(&mut S, WorkUnit) + Sync,
    {
        let start = Instant::now();
        let next_batch = AtomicU64::new(0);
        let batch = self.batch.max(1);

        spawn_workers(threads.max(1), progress, init, |_id, state, tx| {
            let mut reporter = ProgressReporter::new(tx);
            while start.elapsed() < self.duration {
                let b = next_batch.fetch_add(1, Ordering::Relaxed);
                for index in b * batch..(b + 1) * batch {
                    process(
                        state,
                        WorkUnit {
                            index,
                            pixel_index: None,
                            sample_index: index,
                        },
                    );
                    reporter.tick();
                }
            }
            reporter.finish()
        })
    }
}

/// Returns the contiguous block of unit indices owned by a worker.
///
/// * `total`   - Total number of units.
/// * `threads` - Number of workers.
/// * `id`      - Worker id.
fn partition(total: u64, threads: usize, id: usize) -> Range<u64> {
    let threads = threads as u64;
    let id = id as u64;
    let begin = total * id / threads;
    let end = total * (id + 1) / threads;
    begin..end
}

/// Counts processed units and periodically sends them to the dispatching
/// thread.
struct ProgressReporter<'a> {
    tx: &'a Sender<u64>,
    processed: u64,
    pending: u64,
}

impl<'a> ProgressReporter<'a> {
    fn new(tx: &'a Sender<u64>) -> Self {
        Self {
            tx,
            processed: 0,
            pending: 0,
        }
    }

    fn tick(&mut self) {
        self.processed += 1;
        self.pending += 1;
        if self.pending == PROGRESS_GRANULARITY {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending > 0 {
            // The receiver only disappears once all workers are joined.
            self.tx.send(self.pending).ok();
            self.pending = 0;
        }
    }

    /// Sends the remaining count and returns the processed total.
    fn finish(mut self) -> u64 {
        self.flush();
        self.processed
    }
}

/// Spawns one scoped thread per worker, ticks the progress bar from the
/// calling thread and joins the workers in id order.
///
/// * `threads`  - Number of workers.
/// * `progress` - Progress bar.
/// * `init`     - Creates the state of a worker.
/// * `body`     - Worker loop returning the number of processed units.
fn spawn_workers<S, G, B>(threads: usize, progress: &ProgressBar, init: G, body: B) -> Result<(u64, Vec<S>)>
where
    S: Send,
    G: Fn(usize) -> S + Sync,
    B: Fn(usize, &mut S, &Sender<u64>) -> u64 + Sync,
{
    thread::scope(|scope| {
        let (tx, rx) = crossbeam_channel::bounded::<u64>(threads * 4);

        // Spawn worker threads.
        let handles: Vec<_> = (0..threads)
            .map(|id| {
                let tx = tx.clone();
                let init = &init;
                let body = &body;
                scope.spawn(move || {
                    let mut state = init(id);
                    let processed = body(id, &mut state, &tx);
                    (processed, state)
                })
            })
            .collect();
        drop(tx); // Drop extra since we've cloned one for each worker.

        for n in rx.iter() {
            progress.inc(n);
        }

        let mut processed = 0;
        let mut states = Vec::with_capacity(threads);
        for (id, handle) in handles.into_iter().enumerate() {
            let (n, state) = handle
                .join()
                .map_err(|_| RenderError::Worker(format!("worker {id} panicked")))?;
            processed += n;
            states.push(state);
        }

        debug!("{threads} workers processed {processed} units");
        Ok((processed, states))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn partition_covers_range() {
        let total = 103;
        let mut covered = Vec::new();
        for id in 0..4 {
            covered.extend(partition(total, 4, id));
        }
        assert_eq!(covered, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn sample_scheduler_processes_each_unit_once() {
        let scheduler = SampleScheduler::new(1000).unwrap();
        let seen = Mutex::new(vec![0_u32; 1000]);
        let processed = scheduler
            .run(3, |unit, _| {
                seen.lock().unwrap()[unit.index as usize] += 1;
            })
            .unwrap();
        assert_eq!(processed, 1000);
        assert!(seen.into_inner().unwrap().iter().all(|&n| n == 1));
    }

    #[test]
    fn spp_scheduler_assigns_pixels() {
        let scheduler = SppScheduler::new(2, 3, 4).unwrap();
        let (processed, states) = scheduler
            .run_workers(2, &ProgressBar::hidden(), |_| Vec::new(), |units: &mut Vec<WorkUnit>, unit| {
                units.push(unit)
            })
            .unwrap();
        assert_eq!(processed, 24);
        let units: Vec<WorkUnit> = states.into_iter().flatten().collect();
        assert_eq!(units.len(), 24);
        for unit in units {
            assert_eq!(unit.pixel_index, Some((unit.index / 4) as usize));
            assert_eq!(unit.sample_index, unit.index % 4);
        }
    }

    #[test]
    fn worker_states_are_in_id_order() {
        let scheduler = SampleScheduler::new(10).unwrap();
        let (_, states) = scheduler
            .run_workers(4, &ProgressBar::hidden(), |id| (id, 0), |state: &mut (usize, u32), _| {
                state.1 += 1
            })
            .unwrap();
        let ids: Vec<usize> = states.iter().map(|s| s.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(states.iter().map(|s| s.1).sum::<u32>(), 10);
    }

    #[test]
    fn time_scheduler_stops() {
        let mut scheduler = TimeScheduler::new(Duration::from_millis(20)).unwrap();
        scheduler.batch = 16;
        let processed = scheduler.run(2, |_, _| {}).unwrap();
        assert!(processed > 0);
        assert_eq!(processed % 16, 0);
    }

    #[test]
    fn empty_budgets_are_rejected() {
        assert!(matches!(SampleScheduler::new(0), Err(RenderError::InvalidBudget)));
        assert!(matches!(SppScheduler::new(4, 4, 0), Err(RenderError::InvalidBudget)));
        assert!(TimeScheduler::new(Duration::ZERO).is_err());
    }
}
