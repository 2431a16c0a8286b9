use gallery_core::{HitId, Msg, Query};

pub const HELP: &str = "\
commands:
  <enter> | more | m     load the next page
  refresh | r            reload from the first page
  delete <id> | d <id>   delete a hit
  query <term> [k=v..]   start a new search with optional filters
  show | s               redraw the grid
  help | ?               this text
  quit | q               exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" | "more" | "m" => Ok(Command::Dispatch(Msg::EndReached)),
        "refresh" | "r" => Ok(Command::Dispatch(Msg::RefreshRequested)),
        "delete" | "d" if rest.is_empty() => Err("usage: delete <id>".to_string()),
        "delete" | "d" => Ok(Command::Dispatch(Msg::HitTapped {
            id: HitId::new(rest),
        })),
        "query" => Ok(Command::Dispatch(Msg::QueryChanged(parse_query(rest)))),
        "show" | "s" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command {other:?}; type `help`")),
    }
}

/// Tokens shaped like `key=value` become filters; the rest form the term.
fn parse_query(text: &str) -> Query {
    let mut terms = Vec::new();
    let mut query = Query::default();
    for token in text.split_whitespace() {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                query.filters.insert(key.to_string(), value.to_string());
            }
            _ => terms.push(token),
        }
    }
    query.term = terms.join(" ");
    query
}
