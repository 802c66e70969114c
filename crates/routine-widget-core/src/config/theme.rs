use serde::{Deserialize, Serialize};

/// Colors of one widget theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

/// Widget color theme. Unknown names fall back to `Pink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Theme {
    #[default]
    Pink,
    Purple,
    Blue,
    Mono,
}

impl Theme {
    /// Order used by the title-bar toggle.
    const CYCLE: [Theme; 4] = [Theme::Pink, Theme::Blue, Theme::Purple, Theme::Mono];

    pub fn next(self) -> Self {
        let pos = Self::CYCLE.iter().position(|t| *t == self).unwrap_or(0);
        Self::CYCLE[(pos + 1) % Self::CYCLE.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Pink => "pink",
            Theme::Purple => "purple",
            Theme::Blue => "blue",
            Theme::Mono => "mono",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Pink => Palette {
                primary: "#FFB9D9",
                background: "#FFE5F0",
                text: "#2C2C2C",
            },
            Theme::Purple => Palette {
                primary: "#D4B5FF",
                background: "#F0E5FF",
                text: "#2C2C2C",
            },
            Theme::Blue => Palette {
                primary: "#B5D4FF",
                background: "#E5F0FF",
                text: "#2C2C2C",
            },
            Theme::Mono => Palette {
                primary: "#808080",
                background: "#F0F0F0",
                text: "#000000",
            },
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pink" => Ok(Theme::Pink),
            "purple" => Ok(Theme::Purple),
            "blue" => Ok(Theme::Blue),
            "mono" => Ok(Theme::Mono),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
