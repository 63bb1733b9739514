//! Top-level workflow modes.
//!
//! Switching is purely presentational: every mode is always reachable,
//! and re-selecting the active mode is a no-op.

/// The four top-level user workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Standard,
    Checklist,
    UniDoc,
    Cutter,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Standard, Mode::Checklist, Mode::UniDoc, Mode::Cutter];

    /// Identifier used by the mode selector.
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Checklist => "checklist",
            Mode::UniDoc => "unidoc",
            Mode::Cutter => "cutter",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Mode::Standard),
            "checklist" => Ok(Mode::Checklist),
            "unidoc" => Ok(Mode::UniDoc),
            "cutter" => Ok(Mode::Cutter),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// Sub-modes of the page cutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutterMode {
    #[default]
    Single,
    Mix,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.key().parse::<Mode>().unwrap(), mode);
        }
    }
}
