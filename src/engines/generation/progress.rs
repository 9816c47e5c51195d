use super::evolution_engine::{GenerationStats, ProgressCallback};
use super::individual::ScoredIndividual;

pub struct NoopProgressCallback;

impl ProgressCallback for NoopProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _stats: &GenerationStats) {}
    fn on_new_best(&mut self, _generation: usize, _best: &ScoredIndividual) {}
}

/// Reports progress through the `log` facade.
pub struct LogProgressCallback {
    total_generations: usize,
}

impl LogProgressCallback {
    pub fn new(total_generations: usize) -> Self {
        Self { total_generations }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {}/{} starting...", generation + 1, self.total_generations);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        log::info!(
            "Generation {}/{} complete. Best: {:.2}, Mean: {:.2}, Best ever: {:.2}",
            stats.generation + 1,
            self.total_generations,
            stats.best_fitness,
            stats.mean_fitness,
            stats.best_ever_fitness
        );
    }

    fn on_new_best(&mut self, generation: usize, best: &ScoredIndividual) {
        log::debug!(
            "Generation {}: short={} long={} fitness={:.2}",
            generation + 1,
            best.individual.short_period,
            best.individual.long_period,
            best.fitness
        );
    }
}

// For IPC communication with a UI thread
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationStats),
    NewBest { generation: usize, best: ScoredIndividual },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete(*stats));
    }

    fn on_new_best(&mut self, generation: usize, best: &ScoredIndividual) {
        let _ = self.sender.send(ProgressMessage::NewBest {
            generation,
            best: *best,
        });
    }
}
