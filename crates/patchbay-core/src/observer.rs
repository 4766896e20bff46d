//! Topology notifications for the visualization layer.
//!
//! After every compile the patch hands each registered [`TopologyObserver`]
//! the ordered connection list and the per-connection failures of that
//! compile. Delivery is fire-and-forget: observers cannot fail a compile and
//! their return value is ignored.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::graph::compiler::CompileFailure;
use crate::graph::connection::Connection;

/// What an observer sees after one compile.
#[derive(Clone, Copy, Debug)]
pub struct TopologyUpdate<'a> {
    /// Connections in insertion order.
    pub connections: &'a [Connection],
    /// Connections skipped by the compile that just ran.
    pub failures: &'a [CompileFailure],
}

/// Receives the connection list after each compile.
pub trait TopologyObserver: Send {
    /// Called once per compile, after replay.
    fn topology_changed(&mut self, update: &TopologyUpdate<'_>);
}

impl<F> TopologyObserver for F
where
    F: FnMut(&TopologyUpdate<'_>) + Send,
{
    fn topology_changed(&mut self, update: &TopologyUpdate<'_>) {
        self(update);
    }
}

/// An owned copy of one [`TopologyUpdate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyEvent {
    /// Connections in insertion order.
    pub connections: Vec<Connection>,
    /// Connections skipped by that compile.
    pub failures: Vec<CompileFailure>,
}

/// Observer that keeps every update it receives.
///
/// Clones share the same log, so one clone can be registered with a patch
/// while another is read from elsewhere.
#[derive(Clone, Debug, Default)]
pub struct TopologyLog {
    events: Arc<Mutex<Vec<TopologyEvent>>>,
}

impl TopologyLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of updates received.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Most recent update, if any.
    pub fn last(&self) -> Option<TopologyEvent> {
        self.events.lock().last().cloned()
    }

    /// Removes and returns every update received so far.
    pub fn take(&self) -> Vec<TopologyEvent> {
        core::mem::take(&mut *self.events.lock())
    }
}

impl TopologyObserver for TopologyLog {
    fn topology_changed(&mut self, update: &TopologyUpdate<'_>) {
        self.events.lock().push(TopologyEvent {
            connections: update.connections.to_vec(),
            failures: update.failures.to_vec(),
        });
    }
}
