//! Parsing of REPL input lines into commands.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid page number: '{0}'")]
    InvalidPage(String),

    #[error("unknown command: '{0}'. Type 'help' for the list")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Articles { page: u32 },
    Article { slug: String },
    Videos,
    Dictionary { term: String },
    Saved,
    ToggleSaved { slug: String },
    Refresh,
    Logout,
    Help,
    Exit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "" => Ok(Command::Empty),
            "articles" => {
                if rest.is_empty() {
                    return Ok(Command::Articles { page: 1 });
                }
                match rest.parse::<u32>() {
                    Ok(page) if page > 0 => Ok(Command::Articles { page }),
                    _ => Err(CommandError::InvalidPage(rest.to_string())),
                }
            }
            "article" => required(rest, "article").map(|slug| Command::Article { slug }),
            "videos" => Ok(Command::Videos),
            "dict" => required(rest, "dict").map(|term| Command::Dictionary { term }),
            "saved" => Ok(Command::Saved),
            "save" => required(rest, "save").map(|slug| Command::ToggleSaved { slug }),
            "refresh" => Ok(Command::Refresh),
            "logout" => Ok(Command::Logout),
            "help" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn required(rest: &str, command: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest.to_string())
    }
}

pub const HELP: &str = "\
Commands:
  articles [page] - List articles
  article <slug>  - Show one article
  videos          - List videos
  dict <term>     - Search the dictionary
  saved           - List saved articles
  save <slug>     - Toggle the saved flag on an article
  refresh         - Drop all cached responses
  logout          - Clear the cache and end the session
  exit            - Exit the program";
