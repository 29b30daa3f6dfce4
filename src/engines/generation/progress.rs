/// Observer for the generational search loop
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64);
}

/// No-op callback for callers that only want the final ranking
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64) {}
}

/// Callback that reports progress through the `log` facade
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("generation {} starting", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        log::info!(
            "generation {} complete, best fitness {:.4}",
            generation + 1,
            best_fitness
        );
    }
}
