//! Step observer trait for monitoring simulation progress.

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after all nodes have been integrated for a substep.
    fn on_integrate(&mut self, _substep: usize) {}

    /// Called after each distance constraint pass.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called after the collision pass with the number of contacts resolved.
    fn on_collisions(&mut self, _contacts: usize) {}

    /// Called when a frame update is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
