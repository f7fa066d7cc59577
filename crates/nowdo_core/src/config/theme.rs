use super::canonical_key;

const RESET: &str = "\x1b[0m";

/// Colour schemes for terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Ember,
    Meadow,
}

/// What a piece of output is, so each theme can colour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// The task the user was told to do now.
    Pick,
    /// The tally line once at least one task is done.
    Done,
    /// Secondary text such as the empty-list line and follow-up hints.
    Hint,
}

impl Theme {
    /// Accepts the canonical names plus a few older spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match canonical_key(raw).as_str() {
            "" | "plain" | "default" | "vanilla" | "light" => Some(Self::Plain),
            "ember" | "noir" | "dark" | "dark_mode" | "darkmode" => Some(Self::Ember),
            "meadow" | "solarized" => Some(Self::Meadow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Ember => "ember",
            Self::Meadow => "meadow",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Plain => Palette::default(),
            Self::Ember => Palette {
                pick: "\x1b[1;38;5;208m",
                done: "\x1b[38;5;214m",
                hint: "\x1b[38;5;245m",
            },
            Self::Meadow => Palette {
                pick: "\x1b[1;38;5;108m",
                done: "\x1b[38;5;71m",
                hint: "\x1b[38;5;250m",
            },
        }
    }
}

/// ANSI prefixes per [`Tint`]. Empty prefixes leave text untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    pick: &'static str,
    done: &'static str,
    hint: &'static str,
}

impl Palette {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn paint(&self, tint: Tint, text: &str) -> String {
        let prefix = match tint {
            Tint::Pick => self.pick,
            Tint::Done => self.done,
            Tint::Hint => self.hint,
        };
        if prefix.is_empty() {
            text.to_string()
        } else {
            format!("{prefix}{text}{RESET}")
        }
    }
}
