use crate::explorer::SearchStats;
use std::{
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

/// Result of exploring one root branch
pub trait Outcome: Send {
    fn reward(&self) -> u64;
    fn stats(&self) -> SearchStats;
    fn set_stats(&mut self, stats: SearchStats);
}

pub type BranchResult<R> = (usize, R);

/// Explore independent root branches on `workers` threads and keep the best.
///
/// Branches are dealt round-robin to the workers. Each worker sends one
/// `(branch index, outcome)` message per branch. Ties on reward go to the
/// lowest branch index, so the winner does not depend on the worker count.
/// Statistics of every branch are merged into the returned outcome.
pub fn explore_in_parallel<B, R, F>(branches: &[B], workers: usize, job: F) -> Option<R>
where
    B: Sync,
    R: Outcome,
    F: Fn(&B) -> R + Sync,
{
    let workers = workers.clamp(1, branches.len().max(1));
    let (sender, receiver) = channel::<BranchResult<R>>();
    thread::scope(|scope| {
        for worker in 0..workers {
            let sender: Sender<BranchResult<R>> = sender.clone();
            let job = &job;
            scope.spawn(move || {
                for (index, branch) in branches
                    .iter()
                    .enumerate()
                    .skip(worker)
                    .step_by(workers)
                {
                    tracing::trace!(worker, branch = index, "exploring branch");
                    // the collector only hangs up once every worker is done
                    if sender.send((index, job(branch))).is_err() {
                        break;
                    }
                }
            });
        }
        // drop our own handle, or the collector would wait forever
        drop(sender);
        collect_all(&receiver)
    })
}

/// Reduce every message until all the senders are gone
pub fn collect_all<R: Outcome>(receiver: &Receiver<BranchResult<R>>) -> Option<R> {
    let mut stats = SearchStats::default();
    let mut best: Option<BranchResult<R>> = None;
    for (index, outcome) in receiver.iter() {
        stats.merge(outcome.stats());
        best = match best {
            Some((best_index, best_outcome))
                if best_outcome.reward() > outcome.reward()
                    || (best_outcome.reward() == outcome.reward() && best_index < index) =>
            {
                Some((best_index, best_outcome))
            }
            _ => Some((index, outcome)),
        };
    }
    best.map(|(_, mut outcome)| {
        outcome.set_stats(stats);
        outcome
    })
}
