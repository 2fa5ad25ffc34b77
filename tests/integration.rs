//! Integration tests for the hexsum engine binary.
//!
//! Tests full protocol sessions by spawning the engine process, sending
//! commands via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_hexsum");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start hexsum");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Plays THE Line left to right, leaving the last cell empty.
const LINE_GAME: [&str; 9] = [
    "newgame 3",
    "play 0 0",
    "play 1 0",
    "play 2 0",
    "play 3 0",
    "play 4 0",
    "play 5 0",
    "play 6 0",
    "play 7 0",
];

#[test]
fn isready_response() {
    let lines = run_engine(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_engine(&["foobar", "nonsense", "play x y", "quit"]);
    assert!(lines.is_empty());
}

#[test]
fn empty_lines_are_ignored() {
    let lines = run_engine(&["", "  ", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn commands_after_quit_are_not_run() {
    let lines = run_engine(&["quit", "isready"]);
    assert!(lines.is_empty());
}

#[test]
fn layouts_lists_presets() {
    let lines = run_engine(&["layouts", "quit"]);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "layout 0 7 THE Triangle");
    assert_eq!(lines[1], "layout 1 3 Small Hexagon");
    assert_eq!(lines[3], "layout 3 4 THE Line");
    assert_eq!(lines[5], "layout 5 10 Triangle 21");
}

#[test]
fn full_line_game() {
    let mut commands = LINE_GAME.to_vec();
    commands.extend(["winner", "show", "play 8 0", "quit"]);
    let lines = run_engine(&commands);

    // newgame, then the running sum after each move.
    let sums: Vec<&str> = lines[..9].iter().map(|l| l.as_str()).collect();
    assert_eq!(
        sums,
        vec!["ok 0", "ok 1", "ok -1", "ok 2", "ok -2", "ok 3", "ok -3", "ok 4", "ok -4"]
    );
    // The hole at x = 8 borders only the -4.
    assert_eq!(lines[9], "winner p1");
    assert_eq!(lines[10], "board 1 -1 2 -2 3 -3 4 -4 _");
    assert!(lines[11].starts_with("illegal "), "{}", lines[11]);
}

#[test]
fn illegal_moves_leave_the_game_unchanged() {
    let lines = run_engine(&[
        "play 0 0",
        "newgame 1",
        "play 1 0",
        "play 1 0",
        "play 9 9",
        "play 0 0",
        "play 0 -2147483648",
        "show",
        "quit",
    ]);
    assert_eq!(lines[0], "illegal no game in progress");
    assert_eq!(lines[1], "ok 0");
    assert_eq!(lines[2], "ok 1");
    assert!(lines[3].starts_with("illegal "));
    assert!(lines[4].starts_with("illegal "));
    // (0, 0) is blocked on Small Hexagon.
    assert!(lines[5].starts_with("illegal "));
    assert!(lines[6].starts_with("illegal "));
    assert_eq!(&lines[7..], &["board . _ _ .", "board _ _ _ .", "board . 1 _ ."]);
}

#[test]
fn unknown_layout_is_illegal() {
    let lines = run_engine(&["newgame 17", "quit"]);
    assert_eq!(lines, vec!["illegal unknown layout 17"]);
}

#[test]
fn hint_on_small_hexagon() {
    let lines = run_engine(&["newgame 1", "hint", "quit"]);
    assert_eq!(lines[0], "ok 0");
    assert_eq!(lines.len(), 5);
    for row in &lines[1..4] {
        assert!(row.starts_with("hint "), "{row}");
        // Exact results only: markers or outcome labels.
        for token in row["hint ".len()..].split(' ') {
            assert!(matches!(token, "." | "P1" | "P2" | "D"), "{row}");
        }
    }
    assert_eq!(lines[4], "hintok");
}

#[test]
fn accelerated_hint_matches_plain_hint() {
    let plain = run_engine(&["newgame 3", "play 4 0", "hint", "quit"]);
    let fast = run_engine(&[
        "setoption name Accelerated value true",
        "newgame 3",
        "play 4 0",
        "hint",
        "quit",
    ]);
    assert_eq!(plain, fast);
    assert_eq!(plain.last().map(String::as_str), Some("hintok"));
}

#[test]
fn decided_hint_shows_known_winner() {
    let mut commands = LINE_GAME[..8].to_vec();
    commands.extend(["hint", "quit"]);
    let lines = run_engine(&commands);
    // Two empty cells remain; the last move decides between them.
    let hint = &lines[8];
    let tokens: Vec<&str> = hint["hint ".len()..].split(' ').collect();
    assert_eq!(tokens.len(), 9);
    assert!(tokens[..7].iter().all(|&t| t == "."));
    assert!(tokens[7..].iter().all(|t| matches!(*t, "P1" | "P2" | "D")));
    assert_eq!(lines[9], "hintok");
}

#[test]
fn setoption_then_isready() {
    let lines = run_engine(&[
        "setoption name SearchTime value 500",
        "setoption name Seed value 7",
        "setoption name Unknown value 1",
        "isready",
        "quit",
    ]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn load_appends_layouts() {
    let dir = std::env::temp_dir().join(format!("hexsum-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("layouts.json");
    std::fs::write(
        &path,
        r#"[{"name": "Tiny Line", "board": [[0, 0, 0, 0, 0]], "moves": 2}]"#,
    )
    .unwrap();

    let load = format!("load {}", path.display());
    let lines = run_engine(&[&load, "newgame 6", "play 0 0", "quit"]);
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(lines.len(), 9);
    assert_eq!(lines[6], "layout 6 2 Tiny Line");
    assert_eq!(lines[7], "ok 0");
    assert_eq!(lines[8], "ok 1");
}

#[test]
fn random_game_starts() {
    let lines = run_engine(&["setoption name Seed value 3", "newgame random", "show", "quit"]);
    assert_eq!(lines[0], "ok 0");
    assert!(lines.len() >= 5);
    assert!(lines[1..].iter().all(|l| l.starts_with("board ")));
    // Square board: as many cells per row as there are rows.
    let rows = lines.len() - 1;
    assert!(lines[1..].iter().all(|l| l.split(' ').count() == rows + 1));
}
