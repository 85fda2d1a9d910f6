/// Shell command parser
use ample_core::SongId;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const HELP: &str = "\
Commands (slots are 0-based, see `queue`):
  play <id>         play a song from the library
  jump <slot>       play the song at a queue slot
  next | prev       skip forward / back
  toggle            pause or resume
  stop              stop playback, keep the selection
  add <id>...       append songs to the queue
  rm <slot>         remove a queue slot
  mv <from> <to>    move a song within the queue
  shuffle           shuffle the queue
  shuffle-all       shuffle the whole library and play it
  clear             empty the queue and stop
  repeat            toggle repeat
  ff [secs]         seek forward
  rw [secs]         seek backward
  queue             show the queue
  status            show what is playing
  library           list the library
  help              show this message
  quit              leave the shell";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(SongId),
    Jump(usize),
    Next,
    Prev,
    Toggle,
    Stop,
    Add(Vec<SongId>),
    Remove(usize),
    Move { from: usize, to: usize },
    Shuffle,
    ShuffleAll,
    Clear,
    Repeat,
    Forward(Option<Duration>),
    Rewind(Option<Duration>),
    Queue,
    Status,
    Library,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a number: {0}")]
    Number(String),
}

/// Parse one input line
///
/// Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name {
        "play" | "p" => match args.as_slice() {
            [id] => Command::Play(SongId(number(id)?)),
            _ => return Err(ParseError::Usage("play <id>")),
        },
        "jump" | "j" => match args.as_slice() {
            [slot] => Command::Jump(number(slot)?),
            _ => return Err(ParseError::Usage("jump <slot>")),
        },
        "add" | "a" => {
            if args.is_empty() {
                return Err(ParseError::Usage("add <id>..."));
            }
            let ids = args
                .iter()
                .map(|id| number(id).map(SongId))
                .collect::<Result<_, _>>()?;
            Command::Add(ids)
        }
        "rm" => match args.as_slice() {
            [slot] => Command::Remove(number(slot)?),
            _ => return Err(ParseError::Usage("rm <slot>")),
        },
        "mv" => match args.as_slice() {
            [from, to] => Command::Move {
                from: number(from)?,
                to: number(to)?,
            },
            _ => return Err(ParseError::Usage("mv <from> <to>")),
        },
        "ff" => Command::Forward(seconds(&args, "ff [secs]")?),
        "rw" => Command::Rewind(seconds(&args, "rw [secs]")?),
        _ => {
            let command = match name {
                "next" | "n" => Command::Next,
                "prev" | "b" => Command::Prev,
                "toggle" | "t" => Command::Toggle,
                "stop" => Command::Stop,
                "shuffle" => Command::Shuffle,
                "shuffle-all" => Command::ShuffleAll,
                "clear" => Command::Clear,
                "repeat" | "r" => Command::Repeat,
                "queue" | "q" => Command::Queue,
                "status" | "s" => Command::Status,
                "library" | "ls" => Command::Library,
                "help" | "?" => Command::Help,
                "quit" | "exit" => Command::Quit,
                other => return Err(ParseError::Unknown(other.to_string())),
            };
            if !args.is_empty() {
                return Err(ParseError::Usage(usage_of(&command)));
            }
            command
        }
    };

    Ok(Some(command))
}

fn number<T: FromStr>(word: &str) -> Result<T, ParseError> {
    word.parse().map_err(|_| ParseError::Number(word.to_string()))
}

fn seconds(args: &[&str], usage: &'static str) -> Result<Option<Duration>, ParseError> {
    match args {
        [] => Ok(None),
        [secs] => Ok(Some(Duration::from_secs(number(secs)?))),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn usage_of(command: &Command) -> &'static str {
    match command {
        Command::Next => "next",
        Command::Prev => "prev",
        Command::Toggle => "toggle",
        Command::Stop => "stop",
        Command::Shuffle => "shuffle",
        Command::ShuffleAll => "shuffle-all",
        Command::Clear => "clear",
        Command::Repeat => "repeat",
        Command::Queue => "queue",
        Command::Status => "status",
        Command::Library => "library",
        Command::Quit => "quit",
        _ => "help",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   \t"), Ok(None));
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse("play 3"), Ok(Some(Command::Play(SongId(3)))));
        assert_eq!(parse("  jump   2 "), Ok(Some(Command::Jump(2))));
        assert_eq!(
            parse("add 1 2 3"),
            Ok(Some(Command::Add(vec![SongId(1), SongId(2), SongId(3)])))
        );
        assert_eq!(parse("rm 0"), Ok(Some(Command::Remove(0))));
        assert_eq!(
            parse("mv 2 5"),
            Ok(Some(Command::Move { from: 2, to: 5 }))
        );
    }

    #[test]
    fn seek_amount_is_optional() {
        assert_eq!(parse("ff"), Ok(Some(Command::Forward(None))));
        assert_eq!(
            parse("rw 30"),
            Ok(Some(Command::Rewind(Some(Duration::from_secs(30)))))
        );
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(parse("n"), Ok(Some(Command::Next)));
        assert_eq!(parse("b"), Ok(Some(Command::Prev)));
        assert_eq!(parse("t"), Ok(Some(Command::Toggle)));
        assert_eq!(parse("exit"), Ok(Some(Command::Quit)));
        assert_eq!(parse("stop"), Ok(Some(Command::Stop)));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse("dance"), Err(ParseError::Unknown("dance".into())));
        assert_eq!(parse("play"), Err(ParseError::Usage("play <id>")));
        assert_eq!(parse("play x"), Err(ParseError::Number("x".into())));
        assert_eq!(parse("add 1 two"), Err(ParseError::Number("two".into())));
        assert_eq!(parse("rm -1"), Err(ParseError::Number("-1".into())));
        assert_eq!(parse("mv 1"), Err(ParseError::Usage("mv <from> <to>")));
        assert_eq!(parse("next 2"), Err(ParseError::Usage("next")));
        assert_eq!(parse("stop now"), Err(ParseError::Usage("stop")));
        assert_eq!(parse("ff 1 2"), Err(ParseError::Usage("ff [secs]")));
    }
}
