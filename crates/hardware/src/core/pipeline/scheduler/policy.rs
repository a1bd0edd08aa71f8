//! Warp-group selection policies.
//!
//! A policy sees one flag per warp-group (`true` when the group may issue this
//! cycle) and names the group to fetch from. It is told when a group has
//! finished its lane pair, so it can rotate at the right moment.

use crate::config::IssuePolicy;

/// Chooses which ready warp-group issues next.
pub trait SchedulePolicy {
    /// Picks a group among those flagged ready.
    ///
    /// # Arguments
    ///
    /// * `ready` - One entry per warp-group.
    ///
    /// # Returns
    ///
    /// The selected group index, or `None` when no group is ready.
    fn select(&mut self, ready: &[bool]) -> Option<usize>;

    /// Called after `group` issued its last lane at the current PC.
    fn advance(&mut self, group: usize);

    /// Short name for traces.
    fn name(&self) -> &'static str;
}

/// Rotates through groups, trying each at most once per selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundRobin {
    next: usize,
}

impl SchedulePolicy for RoundRobin {
    fn select(&mut self, ready: &[bool]) -> Option<usize> {
        let n = ready.len();
        (0..n).map(|i| (self.next + i) % n).find(|&g| ready[g])
    }

    fn advance(&mut self, group: usize) {
        self.next = group + 1;
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

/// Greedy-then-oldest: stays on the current group while it is ready, then
/// falls back to the lowest-numbered ready group.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyThenOldest {
    current: Option<usize>,
}

impl SchedulePolicy for GreedyThenOldest {
    fn select(&mut self, ready: &[bool]) -> Option<usize> {
        let pick = self
            .current
            .filter(|&g| ready.get(g).copied().unwrap_or(false))
            .or_else(|| ready.iter().position(|&r| r));
        self.current = pick;
        pick
    }

    fn advance(&mut self, _group: usize) {}

    fn name(&self) -> &'static str {
        "gto"
    }
}

/// Builds the policy named by the configuration.
pub fn build(kind: IssuePolicy) -> Box<dyn SchedulePolicy> {
    match kind {
        IssuePolicy::RoundRobin => Box::new(RoundRobin::default()),
        IssuePolicy::GreedyThenOldest => Box::new(GreedyThenOldest::default()),
    }
}
