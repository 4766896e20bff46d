//! Thread-safe patch handle for multi-threaded hosts.
//!
//! [`SharedPatch`] keeps the [`Patch`] and its engine binding behind a single
//! `parking_lot::Mutex`. Every edit recompiles while the lock is still held, so
//! teardown and replay are atomic to other threads: [`SharedPatch::list`]
//! observes either the list before an edit or the list after it, never a
//! half-rebuilt binding.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::binding::EngineBinding;
use crate::graph::compiler::CompileReport;
use crate::graph::connection::Connection;
use crate::graph::module::ModuleId;
use crate::graph::patch::{Patch, PatchError};
use crate::graph::snapshot::PatchSnapshot;
use crate::schema::ModuleSchema;

struct Session<B> {
    patch: Patch,
    binding: B,
    last_report: CompileReport,
}

impl<B: EngineBinding> Session<B> {
    fn recompile(&mut self) -> CompileReport {
        self.last_report = self.patch.compile(&mut self.binding);
        self.last_report.clone()
    }
}

/// Patch and binding shared between threads.
///
/// Clones are cheap and refer to the same patch.
pub struct SharedPatch<B> {
    inner: Arc<Mutex<Session<B>>>,
}

impl<B> Clone for SharedPatch<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: EngineBinding> SharedPatch<B> {
    /// Takes ownership of `patch` and `binding` and compiles once.
    pub fn new(patch: Patch, binding: B) -> Self {
        let mut session = Session {
            patch,
            binding,
            last_report: CompileReport::default(),
        };
        session.recompile();
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Adds a connection and recompiles. Nothing changes on rejection.
    pub fn propose_connection(&self, source: &str, target: &str) -> Result<Connection, PatchError> {
        let mut session = self.inner.lock();
        let connection = session.patch.propose_connection(source, target)?.clone();
        session.recompile();
        Ok(connection)
    }

    /// Removes a connection and recompiles if anything was removed.
    pub fn remove_connection(&self, source: &str, target: &str) -> Result<bool, PatchError> {
        let mut session = self.inner.lock();
        let removed = session.patch.remove_connection(source, target)?;
        if removed {
            session.recompile();
        }
        Ok(removed)
    }

    /// Adds a module, tells the binding, and recompiles.
    pub fn add_module(
        &self,
        id: impl Into<ModuleId>,
        schema: &'static ModuleSchema,
    ) -> Result<(), PatchError> {
        let mut session = self.inner.lock();
        let Session { patch, binding, .. } = &mut *session;
        let instance = patch.add_module(id, schema)?;
        binding.module_added(instance);
        session.recompile();
        Ok(())
    }

    /// Removes a module with its connections, tells the binding, and
    /// recompiles. Returns how many connections were purged.
    pub fn remove_module(&self, id: &ModuleId) -> Result<usize, PatchError> {
        let mut session = self.inner.lock();
        let purged = session.patch.remove_module(id)?;
        session.binding.module_removed(id);
        session.recompile();
        Ok(purged)
    }

    /// Connections in insertion order.
    pub fn list(&self) -> Vec<Connection> {
        self.inner.lock().patch.list().to_vec()
    }

    /// Captures the patch for export.
    pub fn snapshot(&self) -> PatchSnapshot {
        self.inner.lock().patch.snapshot()
    }

    /// Forces a full rebuild.
    pub fn compile(&self) -> CompileReport {
        self.inner.lock().recompile()
    }

    /// Report of the most recent compile.
    pub fn last_report(&self) -> CompileReport {
        self.inner.lock().last_report.clone()
    }

    /// Runs `f` against the binding while the lock is held.
    pub fn with_binding<R>(&self, f: impl FnOnce(&B) -> R) -> R {
        f(&self.inner.lock().binding)
    }

    /// Runs `f` against the patch while the lock is held.
    pub fn with_patch<R>(&self, f: impl FnOnce(&Patch) -> R) -> R {
        f(&self.inner.lock().patch)
    }
}
