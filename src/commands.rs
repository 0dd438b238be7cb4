//! Subcommand implementations
//!
//! Output goes to the writer passed in, logs go through `tracing`, so the
//! binary can pipe results while tests capture them in a buffer.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use etherchess_engine::constants::DEFAULT_HASH_MIB;
use etherchess_engine::perft::MAX_PERFT_DEPTH;
use etherchess_engine::utils::{format_count, millis};
use etherchess_engine::{
    parse_fen, parse_lan, to_fen, to_lan, AlwaysReplaceTable, Board, ChannelReporter, Engine,
    EngineOptions, Evaluation, GameStatus, MaterialEvaluation, NoopTable, Perft,
    PieceSquareEvaluation, SearchEvent, SearchParams, SearchStats, Table,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{
    BenchArgs, Command, EngineArgs, EvalKind, PerftArgs, PositionArgs, SearchArgs, SelfplayArgs,
};

/// Positions used by `bench`: the start position plus the usual perft
/// suite, which between them cover castling, en passant and promotions.
pub const BENCH_POSITIONS: [&str; 5] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

pub fn run(command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Perft(args) => perft(&args, out),
        Command::Divide(args) => divide(&args, out),
        Command::Search(args) => search(&args, out),
        Command::Selfplay(args) => selfplay(&args, out),
        Command::Bench(args) => bench(&args, out),
    }
}

/// Board after `position.moves` were played from `position.fen`.
pub fn load_board(position: &PositionArgs) -> Result<Board> {
    let mut board = match &position.fen {
        Some(fen) => parse_fen(fen).with_context(|| format!("invalid FEN {fen:?}"))?,
        None => Board::startpos(),
    };
    for text in &position.moves {
        let mv = parse_lan(&board, text)
            .with_context(|| format!("cannot play {text:?} in {}", to_fen(&board)))?;
        mv.apply(&mut board);
    }
    debug!("position\n{}", board.to_board_string());
    Ok(board)
}

#[derive(Debug, Serialize)]
struct PerftReport {
    fen: String,
    depth: u32,
    nodes: u64,
    millis: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    divide: Vec<DivideLine>,
}

#[derive(Debug, Serialize)]
struct DivideLine {
    #[serde(rename = "move")]
    mv: String,
    nodes: u64,
}

fn count_nodes<T: Table>(
    mut perft: Perft<T>,
    board: &Board,
    depth: u32,
    split: bool,
) -> (u64, Vec<DivideLine>) {
    if !split {
        return (perft.perft(board, depth), Vec::new());
    }
    let lines: Vec<DivideLine> = perft
        .divide(board, depth)
        .into_iter()
        .map(|(mv, nodes)| DivideLine {
            mv: to_lan(mv, board.is_white()),
            nodes,
        })
        .collect();
    (lines.iter().map(|line| line.nodes).sum(), lines)
}

fn perft_report(args: &PerftArgs, split: bool) -> Result<PerftReport> {
    ensure!(
        args.depth <= MAX_PERFT_DEPTH,
        "perft depth {} exceeds {MAX_PERFT_DEPTH}",
        args.depth
    );
    let board = load_board(&args.position)?;
    let start = Instant::now();
    let (nodes, divide) = if args.hash == 0 {
        count_nodes(Perft::new(NoopTable), &board, args.depth, split)
    } else {
        let table = AlwaysReplaceTable::with_size_mib(args.hash)
            .with_context(|| format!("cannot allocate a {} MiB table", args.hash))?;
        count_nodes(Perft::new(table), &board, args.depth, split)
    };
    let millis = millis(start.elapsed());
    debug!(depth = args.depth, nodes, millis, "perft done");
    Ok(PerftReport {
        fen: to_fen(&board),
        depth: args.depth,
        nodes,
        millis,
        divide,
    })
}

fn nodes_per_second(nodes: u64, millis: u64) -> u64 {
    nodes * 1000 / millis.max(1)
}

fn perft(args: &PerftArgs, out: &mut dyn Write) -> Result<()> {
    let report = perft_report(args, false)?;
    if args.json {
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "perft({}) = {} in {} ms ({} nps)",
            report.depth,
            format_count(report.nodes),
            report.millis,
            format_count(nodes_per_second(report.nodes, report.millis))
        )?;
    }
    Ok(())
}

fn divide(args: &PerftArgs, out: &mut dyn Write) -> Result<()> {
    let report = perft_report(args, true)?;
    if args.json {
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }
    for line in &report.divide {
        writeln!(out, "{}: {}", line.mv, line.nodes)?;
    }
    writeln!(out)?;
    writeln!(out, "moves: {}", report.divide.len())?;
    writeln!(out, "nodes: {}", report.nodes)?;
    Ok(())
}

fn build_engine(position: &PositionArgs, args: &EngineArgs) -> Result<Engine> {
    let evaluation: Arc<dyn Evaluation> = match args.eval {
        EvalKind::Pst => Arc::new(PieceSquareEvaluation),
        EvalKind::Material => Arc::new(MaterialEvaluation),
    };
    let mut engine = Engine::new(EngineOptions {
        hash_mib: args.hash,
        flags: args.flags(),
    })
    .with_context(|| format!("cannot create an engine with a {} MiB table", args.hash))?
    .with_evaluation(evaluation);
    // parse separately first so errors carry the offending move
    load_board(position)?;
    engine.set_position(position.fen.as_deref(), &position.moves)?;
    Ok(engine)
}

fn write_event(out: &mut dyn Write, event: &SearchEvent, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, event)?;
        writeln!(out)?;
        return Ok(());
    }
    match event {
        SearchEvent::Stats(stats) => writeln!(out, "info {stats}")?,
        SearchEvent::BestMove(Some(mv)) => writeln!(out, "bestmove {mv}")?,
        SearchEvent::BestMove(None) => writeln!(out, "bestmove (none)")?,
        SearchEvent::Info(text) => writeln!(out, "info string {text}")?,
    }
    Ok(())
}

fn search(args: &SearchArgs, out: &mut dyn Write) -> Result<()> {
    let mut engine = build_engine(&args.position, &args.engine)?;
    let (sender, receiver) = crossbeam_channel::unbounded();
    engine.go(args.engine.params(), ChannelReporter::new(sender))?;
    // the channel closes when the worker drops its reporter
    for event in receiver.iter() {
        write_event(out, &event, args.json)?;
        out.flush()?;
    }
    engine.wait()?;
    Ok(())
}

/// PGN style result for a finished game.
fn result_tag(status: GameStatus, white_to_move: bool) -> &'static str {
    match status {
        GameStatus::Checkmate if white_to_move => "0-1",
        GameStatus::Checkmate => "1-0",
        GameStatus::Ongoing => "*",
        _ => "1/2-1/2",
    }
}

fn selfplay(args: &SelfplayArgs, out: &mut dyn Write) -> Result<()> {
    let mut engine = build_engine(&args.position, &args.engine)?;
    let params = args.engine.params();
    info!(fen = %engine.fen(), max_plies = args.max_plies, "self-play started");

    let mut plies = 0;
    let status = loop {
        let status = engine.status();
        if status.is_over() || plies >= args.max_plies {
            break status;
        }
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut reporter = ChannelReporter::new(sender);
        let is_white = engine.board().is_white();
        let Some(mv) = engine.search_blocking(&params, &mut reporter)? else {
            break engine.status();
        };
        let last: Option<SearchStats> = receiver
            .try_iter()
            .filter_map(|event| match event {
                SearchEvent::Stats(stats) => Some(stats),
                _ => None,
            })
            .last();
        let lan = to_lan(mv, is_white);
        engine.apply_move(&lan)?;
        plies += 1;
        match last {
            Some(stats) => writeln!(
                out,
                "{plies:>4} {lan:<6} {} depth {} nodes {}",
                stats.score,
                stats.depth,
                format_count(stats.nodes)
            )?,
            None => writeln!(out, "{plies:>4} {lan}")?,
        }
    };

    writeln!(out)?;
    writeln!(
        out,
        "{} {:?} after {plies} plies",
        result_tag(status, engine.board().is_white()),
        status
    )?;
    writeln!(out, "fen {}", engine.fen())?;
    writeln!(out, "{}", engine.table_stats()?)?;
    Ok(())
}

fn bench(args: &BenchArgs, out: &mut dyn Write) -> Result<()> {
    ensure!(
        args.perft_depth <= MAX_PERFT_DEPTH,
        "perft depth {} exceeds {MAX_PERFT_DEPTH}",
        args.perft_depth
    );
    let mut perft_nodes = 0;
    let mut search_nodes = 0;
    let start = Instant::now();

    for fen in BENCH_POSITIONS {
        let board = parse_fen(fen).with_context(|| format!("invalid bench FEN {fen:?}"))?;
        let table = AlwaysReplaceTable::with_size_mib(DEFAULT_HASH_MIB)?;
        let nodes = Perft::new(table).perft(&board, args.perft_depth);
        perft_nodes += nodes;

        let mut engine = Engine::new(EngineOptions::default())?;
        engine.set_position(Some(fen), &[] as &[&str])?;
        let (sender, receiver) = crossbeam_channel::unbounded();
        let best = engine.search_blocking(
            &SearchParams::depth(args.search_depth),
            &mut ChannelReporter::new(sender),
        )?;
        let searched = receiver
            .try_iter()
            .filter_map(|event| match event {
                SearchEvent::Stats(stats) => Some(stats.nodes),
                _ => None,
            })
            .last()
            .unwrap_or(0);
        search_nodes += searched;
        writeln!(
            out,
            "{fen}\n    perft {} searched {} best {}",
            format_count(nodes),
            format_count(searched),
            best.map_or_else(|| "(none)".to_string(), |mv| to_lan(mv, board.is_white()))
        )?;
    }

    let millis = millis(start.elapsed());
    writeln!(out)?;
    writeln!(out, "perft nodes  {}", format_count(perft_nodes))?;
    writeln!(out, "search nodes {}", format_count(search_nodes))?;
    writeln!(
        out,
        "{} ms, {} nps",
        millis,
        format_count(nodes_per_second(perft_nodes + search_nodes, millis))
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: Option<&str>, moves: &[&str]) -> PositionArgs {
        PositionArgs {
            fen: fen.map(str::to_string),
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_load_board_plays_moves() {
        let board = load_board(&position(None, &["e2e4", "c7c5"])).unwrap();
        assert_eq!(
            to_fen(&board),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2"
        );
    }

    #[test]
    fn test_load_board_reports_the_bad_move() {
        let err = load_board(&position(None, &["e2e4", "e2e4"])).unwrap_err();
        assert!(format!("{err:#}").contains("\"e2e4\""), "{err:#}");
    }

    #[test]
    fn test_load_board_rejects_bad_fen() {
        let err = load_board(&position(Some("not a fen"), &[])).unwrap_err();
        assert!(err.to_string().contains("invalid FEN"), "{err}");
    }

    #[test]
    fn test_result_tags() {
        assert_eq!(result_tag(GameStatus::Checkmate, true), "0-1");
        assert_eq!(result_tag(GameStatus::Checkmate, false), "1-0");
        assert_eq!(result_tag(GameStatus::Repetition, true), "1/2-1/2");
        assert_eq!(result_tag(GameStatus::Ongoing, false), "*");
    }

    #[test]
    fn test_nodes_per_second_survives_zero_time() {
        assert_eq!(nodes_per_second(500, 0), 500_000);
        assert_eq!(nodes_per_second(3000, 1500), 2000);
    }

    #[test]
    fn test_bench_positions_parse() {
        for fen in BENCH_POSITIONS {
            assert!(parse_fen(fen).is_ok(), "{fen}");
        }
    }
}
