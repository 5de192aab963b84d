use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

use flowplan::explorer::SearchStats;
use flowplan::threads::{collect_all, explore_in_parallel, Outcome};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tagged {
    tag: &'static str,
    reward: u64,
    stats: SearchStats,
}

impl Tagged {
    fn new(tag: &'static str, reward: u64) -> Self {
        Tagged {
            tag,
            reward,
            stats: SearchStats {
                branches: 1,
                pruned: reward % 2,
            },
        }
    }
}

impl Outcome for Tagged {
    fn reward(&self) -> u64 {
        self.reward
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }

    fn set_stats(&mut self, stats: SearchStats) {
        self.stats = stats;
    }
}

#[test]
fn collect_all_waits_for_every_sender() {
    let (sender, receiver) = channel();
    let late = sender.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        late.send((1, Tagged::new("late", 9))).unwrap();
    });
    sender.send((0, Tagged::new("early", 3))).unwrap();
    drop(sender);

    let best = collect_all(&receiver).unwrap();
    handle.join().unwrap();

    assert_eq!(best.tag, "late");
    assert_eq!(
        best.stats,
        SearchStats {
            branches: 2,
            pruned: 2,
        }
    );
}

#[test]
fn collect_all_breaks_ties_on_branch_index() {
    let (sender, receiver) = channel();
    sender.send((2, Tagged::new("third", 7))).unwrap();
    sender.send((0, Tagged::new("first", 7))).unwrap();
    sender.send((1, Tagged::new("second", 4))).unwrap();
    drop(sender);

    assert_eq!(collect_all(&receiver).unwrap().tag, "first");
}

#[test]
fn collect_all_without_messages() {
    let (sender, receiver) = channel::<(usize, Tagged)>();
    drop(sender);
    assert_eq!(collect_all(&receiver), None);
}

#[test]
fn explore_in_parallel_independent_of_workers() {
    let branches: Vec<u64> = vec![5, 17, 3, 17, 11, 2, 8];
    for workers in 0..10 {
        let best = explore_in_parallel(&branches, workers, |&reward| Tagged::new("branch", reward))
            .unwrap();
        assert_eq!(best.reward, 17);
        assert_eq!(best.stats.branches, branches.len() as u64);
    }
}

#[test]
fn explore_in_parallel_keeps_lowest_index() {
    let branches: Vec<(&'static str, u64)> = vec![("a", 1), ("b", 6), ("c", 6), ("d", 6)];
    for workers in 1..5 {
        let best = explore_in_parallel(&branches, workers, |&(tag, reward)| {
            Tagged::new(tag, reward)
        })
        .unwrap();
        assert_eq!(best.tag, "b");
    }
}

#[test]
fn explore_in_parallel_without_branches() {
    let branches: Vec<u64> = Vec::new();
    assert_eq!(
        explore_in_parallel(&branches, 4, |&reward| Tagged::new("none", reward)),
        None
    );
}
