//! Command line runs captured in memory

use clap::Parser;
use etherchess::{run, Cli};

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("etherchess").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    run(cli.command, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_perft_prints_grouped_count() {
    let out = run_args(&["perft", "--depth", "3"]).unwrap();
    assert!(out.starts_with("perft(3) = 8,902 in "), "{out}");
}

#[test]
fn test_perft_without_table() {
    let out = run_args(&["perft", "--depth", "2", "--hash", "0", "--json"]).unwrap();
    let report: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(report["nodes"], 400);
    assert_eq!(report["depth"], 2);
    assert!(report.get("divide").is_none(), "Plain perft has no split: {report}");
}

#[test]
fn test_divide_after_moves() {
    let out = run_args(&["divide", "--moves", "e2e4 e7e5", "--depth", "1"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.contains(&"moves: 29"), "{out}");
    assert!(lines.contains(&"nodes: 29"), "{out}");
    assert!(lines.contains(&"e1e2: 1"), "{out}");
}

#[test]
fn test_divide_json_lists_every_move() {
    let out = run_args(&["divide", "--depth", "2", "--json"]).unwrap();
    let report: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    let divide = report["divide"].as_array().unwrap();
    assert_eq!(divide.len(), 20);
    assert!(divide.iter().all(|line| line["nodes"] == 20), "{report}");
    assert_eq!(report["nodes"], 400);
}

#[test]
fn test_search_finds_mate() {
    let out = run_args(&["search", "--fen", "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "--depth", "3"]).unwrap();
    assert!(out.contains("score mate 1"), "{out}");
    assert_eq!(out.lines().last(), Some("bestmove a1a8"), "{out}");
}

#[test]
fn test_search_json_events() {
    let out = run_args(&[
        "search",
        "--fen",
        "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
        "--depth",
        "2",
        "--json",
    ])
    .unwrap();
    let events: Vec<serde_json::Value> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 3, "{out}");
    assert_eq!(events[0]["event"], "stats");
    assert_eq!(events[2]["event"], "best_move");
    assert_eq!(events[2]["data"], "a1a8");
}

#[test]
fn test_search_checkmated_position() {
    let out = run_args(&["search", "--fen", "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1"]).unwrap();
    assert_eq!(out.trim(), "bestmove (none)");
}

#[test]
fn test_selfplay_ends_in_mate() {
    let out = run_args(&[
        "selfplay",
        "--fen",
        "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
        "--depth",
        "3",
        "--hash",
        "1",
    ])
    .unwrap();
    assert!(out.contains("a1a8"), "{out}");
    assert!(out.contains("1-0 Checkmate after 1 plies"), "{out}");
    assert!(out.contains("hit rate"), "Table stats printed: {out}");
}

#[test]
fn test_selfplay_stops_at_ply_limit() {
    let out = run_args(&["selfplay", "--depth", "1", "--max-plies", "2", "--hash", "1"]).unwrap();
    assert!(out.contains("* Ongoing after 2 plies"), "{out}");
}

#[test]
fn test_bench_runs() {
    let out = run_args(&["bench", "--perft-depth", "1", "--search-depth", "1"]).unwrap();
    assert!(out.contains("perft nodes  "), "{out}");
    assert!(out.contains("nps"), "{out}");
}

#[test]
fn test_illegal_move_is_an_error() {
    let err = run_args(&["perft", "--moves", "e2e5", "--depth", "1"]).unwrap_err();
    assert!(format!("{err:#}").contains("e2e5"), "{err:#}");
}

#[test]
fn test_invalid_fen_is_an_error() {
    let err = run_args(&["search", "--fen", "8/8/8 w - - 0 1", "--depth", "1"]).unwrap_err();
    assert!(err.to_string().contains("invalid FEN"), "{err}");
}
