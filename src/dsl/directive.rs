//! Directive keywords of the description language.

use std::fmt;

/// A directive keyword.
///
/// Keywords are case-insensitive in source text. The lower-case form is the
/// event name the grammar table dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directive {
    State,
    Enter,
    Exit,
    Event,
    Action,
    Context,
    Handler,
    Default,
    Exception,
}

impl Directive {
    pub const ALL: [Directive; 9] = [
        Self::State,
        Self::Enter,
        Self::Exit,
        Self::Event,
        Self::Action,
        Self::Context,
        Self::Handler,
        Self::Default,
        Self::Exception,
    ];

    /// Lower-case keyword, used as the grammar event name.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::Event => "event",
            Self::Action => "action",
            Self::Context => "context",
            Self::Handler => "handler",
            Self::Default => "default",
            Self::Exception => "exception",
        }
    }

    /// Upper-case keyword, as written in descriptions and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::State => "STATE",
            Self::Enter => "ENTER",
            Self::Exit => "EXIT",
            Self::Event => "EVENT",
            Self::Action => "ACTION",
            Self::Context => "CONTEXT",
            Self::Handler => "HANDLER",
            Self::Default => "DEFAULT",
            Self::Exception => "EXCEPTION",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.keyword().eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
