//! Chat command parsing

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// First-match scan over the primary timeframes
    Signal,
    /// First-match scan over the higher timeframes
    SignalHtf,
    /// Full-matrix scan grouped by agreement
    Summary,
    AutoOn,
    AutoOff,
    Status,
    /// Order placement, always refused
    Market,
    /// Order placement, always refused
    Limit,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Signal,
        Command::SignalHtf,
        Command::Summary,
        Command::AutoOn,
        Command::AutoOff,
        Command::Status,
        Command::Market,
        Command::Limit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Signal => "signal",
            Command::SignalHtf => "signal_htf",
            Command::Summary => "summary",
            Command::AutoOn => "auto_on",
            Command::AutoOff => "auto_off",
            Command::Status => "status",
            Command::Market => "market",
            Command::Limit => "limit",
        }
    }

    /// Parse the leading `/command[@bot]` of a message; anything else is `None`
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _bot)| name);
        Command::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}
