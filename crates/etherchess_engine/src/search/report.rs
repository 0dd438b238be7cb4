//! Search result sinks
//!
//! The driver pushes one [`SearchStats`] per completed iteration, then the
//! final move, into a [`SearchReporter`]. Front ends pick a sink: the CLI
//! prints through [`LogReporter`], the engine facade forwards events over a
//! channel with [`ChannelReporter`] so a control thread can watch a running
//! search.

use std::fmt;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::score::Score;

/// Statistics of one completed iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u32,
    /// Deepest ply reached in a PV node, relative to the root
    pub sel_depth: u32,
    pub millis: u64,
    pub nodes: u64,
    pub score: Score,
    /// Principal variation in long algebraic notation
    pub pv: Vec<String>,
    pub hash_permille: u32,
}

impl SearchStats {
    /// Nodes per second, 0 if no time has passed
    pub fn nps(&self) -> u64 {
        if self.millis == 0 {
            0
        } else {
            self.nodes * 1000 / self.millis
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {} seldepth {} time {} nodes {} nps {} score {} hashfull {}",
            self.depth,
            self.sel_depth,
            self.millis,
            self.nodes,
            self.nps(),
            self.score,
            self.hash_permille
        )?;
        if !self.pv.is_empty() {
            write!(f, " pv {}", self.pv.join(" "))?;
        }
        Ok(())
    }
}

/// Receives search progress and results
pub trait SearchReporter: Send {
    fn stats(&mut self, stats: &SearchStats);

    /// Final move, `None` when the position has no legal moves.
    fn best_move(&mut self, mv: Option<&str>);

    /// Free-form diagnostics
    fn info(&mut self, _message: &str) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl SearchReporter for NoopReporter {
    fn stats(&mut self, _stats: &SearchStats) {}

    fn best_move(&mut self, _mv: Option<&str>) {}
}

/// Writes everything to the `tracing` log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl SearchReporter for LogReporter {
    fn stats(&mut self, stats: &SearchStats) {
        info!("info {stats}");
    }

    fn best_move(&mut self, mv: Option<&str>) {
        info!("bestmove {}", mv.unwrap_or("(none)"));
    }

    fn info(&mut self, message: &str) {
        info!("info string {message}");
    }
}

/// One message from a running search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SearchEvent {
    Stats(SearchStats),
    BestMove(Option<String>),
    Info(String),
}

/// Forwards events over a channel. A dropped receiver is not an error, the
/// search simply runs on unobserved.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<SearchEvent>,
}

impl ChannelReporter {
    pub fn new(sender: Sender<SearchEvent>) -> Self {
        ChannelReporter { sender }
    }

    fn send(&self, event: SearchEvent) {
        if self.sender.send(event).is_err() {
            debug!("search event receiver disconnected");
        }
    }
}

impl SearchReporter for ChannelReporter {
    fn stats(&mut self, stats: &SearchStats) {
        self.send(SearchEvent::Stats(stats.clone()));
    }

    fn best_move(&mut self, mv: Option<&str>) {
        self.send(SearchEvent::BestMove(mv.map(str::to_string)));
    }

    fn info(&mut self, message: &str) {
        self.send(SearchEvent::Info(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchStats {
        SearchStats {
            depth: 3,
            sel_depth: 5,
            millis: 20,
            nodes: 1000,
            score: Score::Centipawns(15),
            pv: vec!["e2e4".to_string(), "e7e5".to_string()],
            hash_permille: 2,
        }
    }

    #[test]
    fn test_stats_line() {
        assert_eq!(
            sample().to_string(),
            "depth 3 seldepth 5 time 20 nodes 1000 nps 50000 score cp 15 hashfull 2 pv e2e4 e7e5"
        );
    }

    #[test]
    fn test_nps_without_elapsed_time() {
        let stats = SearchStats {
            millis: 0,
            ..sample()
        };
        assert_eq!(stats.nps(), 0);
    }

    #[test]
    fn test_channel_reporter_forwards_events() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut reporter = ChannelReporter::new(sender);
        reporter.stats(&sample());
        reporter.info("hello");
        reporter.best_move(Some("e2e4"));
        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SearchEvent::Stats(sample()),
                SearchEvent::Info("hello".to_string()),
                SearchEvent::BestMove(Some("e2e4".to_string())),
            ]
        );
    }

    #[test]
    fn test_disconnected_channel_is_ignored() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        drop(receiver);
        let mut reporter = ChannelReporter::new(sender);
        reporter.best_move(None);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(SearchEvent::BestMove(Some("e2e4".to_string()))).unwrap();
        assert_eq!(json["event"], "best_move");
        assert_eq!(json["data"], "e2e4");
        let json = serde_json::to_value(SearchEvent::Stats(sample())).unwrap();
        assert_eq!(json["data"]["score"]["kind"], "centipawns");
        assert_eq!(json["data"]["score"]["value"], 15);
    }
}
