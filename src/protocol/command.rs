//! Command definitions
//!
//! Tokenizes raw request text, classifies it, and turns valid requests into
//! typed commands.

/// How a request line is split into tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// Runs of any whitespace, tabs included
    #[default]
    Whitespace,

    /// Runs of tabs only; keys and values may contain spaces
    Tab,
}

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Put,
    Delete,
    Stop,
}

impl CommandType {
    /// Look up a command by its upper-case name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GET" => Some(CommandType::Get),
            "PUT" => Some(CommandType::Put),
            "DELETE" => Some(CommandType::Delete),
            "STOP" => Some(CommandType::Stop),
            _ => None,
        }
    }

    /// Number of tokens required after the command name
    pub fn arity(self) -> usize {
        match self {
            CommandType::Stop => 0,
            CommandType::Get | CommandType::Delete => 1,
            CommandType::Put => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandType::Get => "GET",
            CommandType::Put => "PUT",
            CommandType::Delete => "DELETE",
            CommandType::Stop => "STOP",
        }
    }
}

/// Result of checking a request's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    WrongArity,
    UnknownCommand,
}

/// A validated command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Put a key-value pair
    Put { key: String, value: String },

    /// Delete a key
    Delete { key: String },

    /// Persist and shut down
    Stop,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Put { .. } => CommandType::Put,
            Command::Delete { .. } => CommandType::Delete,
            Command::Stop => CommandType::Stop,
        }
    }
}

/// A tokenized request line
///
/// Token 0 is the upper-cased command name; every token is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    tokens: Vec<String>,
}

impl Request {
    /// Split and normalize raw request text
    pub fn parse(raw: &str, separator: Separator) -> Self {
        let pieces: Vec<&str> = match separator {
            Separator::Whitespace => raw.split_whitespace().collect(),
            Separator::Tab => raw.split('\t').filter(|piece| !piece.is_empty()).collect(),
        };

        let tokens = pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                let piece = piece.trim();
                if i == 0 {
                    piece.to_uppercase()
                } else {
                    piece.to_string()
                }
            })
            .collect();

        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Classify the request against the arity table
    pub fn validate(&self) -> Validation {
        let Some((name, args)) = self.tokens.split_first() else {
            return Validation::UnknownCommand;
        };

        match CommandType::from_name(name) {
            Some(kind) if kind.arity() == args.len() => Validation::Valid,
            Some(_) => Validation::WrongArity,
            None => Validation::UnknownCommand,
        }
    }

    /// Convert into a typed command, or report why it is not valid
    pub fn into_command(self) -> Result<Command, Validation> {
        let validation = self.validate();
        if validation != Validation::Valid {
            return Err(validation);
        }

        let mut tokens = self.tokens.into_iter();
        let name = tokens.next().unwrap_or_default();
        let mut next = || tokens.next().unwrap_or_default();

        match CommandType::from_name(&name) {
            Some(CommandType::Get) => Ok(Command::Get { key: next() }),
            Some(CommandType::Put) => {
                let key = next();
                let value = next();
                Ok(Command::Put { key, value })
            }
            Some(CommandType::Delete) => Ok(Command::Delete { key: next() }),
            Some(CommandType::Stop) => Ok(Command::Stop),
            None => Err(Validation::UnknownCommand),
        }
    }
}

/// Tokenize and classify raw request text in one step
pub fn validate(raw: &str, separator: Separator) -> (Vec<String>, Validation) {
    let request = Request::parse(raw, separator);
    let validation = request.validate();
    (request.tokens, validation)
}
