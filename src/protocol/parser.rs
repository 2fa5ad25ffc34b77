//! Command parser.
//!
//! Parses incoming protocol lines into structured `Command` variants that
//! the engine main loop can dispatch on.

use tracing::warn;

/// Which layout a `newgame` starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSource {
    /// Index into the layout catalogue, as listed by `layouts`.
    Layout(usize),
    Random,
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the layout catalogue.
    Layouts,

    /// Start a game: `newgame <index>|random`.
    NewGame(GameSource),

    /// Append layouts from a JSON file: `load <path>`.
    Load { path: String },

    /// Place the next number: `play <x> <y>`, `y` counted from the bottom.
    Play { x: i32, y: i32 },

    /// Report the winner of the current game.
    Winner,

    /// Print the board.
    Show,

    /// Evaluate every empty cell.
    Hint,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, _) = tokens.split_first()?;

    match head {
        "layouts" => Some(Command::Layouts),
        "winner" => Some(Command::Winner),
        "show" => Some(Command::Show),
        "hint" => Some(Command::Hint),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),

        "newgame" => parse_newgame(&tokens),
        "load" => parse_load(&tokens, line),
        "play" => parse_play(&tokens),
        "setoption" => parse_setoption(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `newgame <index>|random`.
fn parse_newgame(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        Some(&"random") => Some(Command::NewGame(GameSource::Random)),
        Some(arg) => match arg.parse::<usize>() {
            Ok(index) => Some(Command::NewGame(GameSource::Layout(index))),
            Err(_) => {
                warn!(arg, "invalid layout index");
                None
            }
        },
        None => {
            warn!("malformed newgame: expected 'newgame <index>|random'");
            None
        }
    }
}

/// Parses `load <path>`. The path is the rest of the line, spaces kept.
fn parse_load(tokens: &[&str], line: &str) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed load: expected 'load <path>'");
        return None;
    }
    let path = line.trim().strip_prefix("load")?.trim().to_string();
    Some(Command::Load { path })
}

/// Parses `play <x> <y>`.
fn parse_play(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 3 {
        warn!("malformed play: expected 'play <x> <y>'");
        return None;
    }
    match (tokens[1].parse::<i32>(), tokens[2].parse::<i32>()) {
        (Ok(x), Ok(y)) => Some(Command::Play { x, y }),
        _ => {
            warn!(x = tokens[1], y = tokens[2], "invalid play coordinates");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name_parts, value_parts) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => (&tokens[2..vi], Some(&tokens[vi + 1..])),
        None => (&tokens[2..], None),
    };
    if name_parts.is_empty() {
        warn!("malformed setoption: empty name");
        return None;
    }
    let value = value_parts
        .filter(|parts| !parts.is_empty())
        .map(|parts| parts.join(" "));

    Some(Command::SetOption {
        name: name_parts.join(" "),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("layouts"), Some(Command::Layouts));
        assert_eq!(parse_command("winner"), Some(Command::Winner));
        assert_eq!(parse_command("show"), Some(Command::Show));
        assert_eq!(parse_command("hint"), Some(Command::Hint));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_and_unknown() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("fly away"), None);
    }

    #[test]
    fn parse_newgame_variants() {
        assert_eq!(
            parse_command("newgame 3"),
            Some(Command::NewGame(GameSource::Layout(3)))
        );
        assert_eq!(
            parse_command("newgame random"),
            Some(Command::NewGame(GameSource::Random))
        );
        assert_eq!(parse_command("newgame"), None);
        assert_eq!(parse_command("newgame -1"), None);
    }

    #[test]
    fn parse_play_coordinates() {
        assert_eq!(parse_command("play 2 0"), Some(Command::Play { x: 2, y: 0 }));
        assert_eq!(parse_command("play -1 4"), Some(Command::Play { x: -1, y: 4 }));
        assert_eq!(parse_command("play 2"), None);
        assert_eq!(parse_command("play a b"), None);
        assert_eq!(parse_command("play 1 2 3"), None);
    }

    #[test]
    fn parse_load_keeps_spaces() {
        assert_eq!(
            parse_command("load my boards/extra.json"),
            Some(Command::Load {
                path: "my boards/extra.json".to_string()
            })
        );
        assert_eq!(parse_command("load"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        assert_eq!(
            parse_command("setoption name SearchTime value 500"),
            Some(Command::SetOption {
                name: "SearchTime".to_string(),
                value: Some("500".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        assert_eq!(
            parse_command("setoption name Accelerated"),
            Some(Command::SetOption {
                name: "Accelerated".to_string(),
                value: None,
            })
        );
        assert_eq!(
            parse_command("setoption name Seed value"),
            Some(Command::SetOption {
                name: "Seed".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
        assert_eq!(parse_command("\tplay 0 0 "), Some(Command::Play { x: 0, y: 0 }));
    }
}
