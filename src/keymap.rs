//! Key chords and the bindings that turn them into [`Command`]s.
//!
//! Two modifier tiers drive the direction keys: **Hyper** tiles (resizes to
//! a screen half) and **HyperShift** shifts (moves toward an edge).  Both
//! tiers are configurable through [`KeyConfig`].
//!
//! | Key                | Hyper              | HyperShift    |
//! |--------------------|--------------------|---------------|
//! | `left` / `j`       | tile left          | shift left    |
//! | `right` / `l`      | tile right         | shift right   |
//! | `up` / `i`         | tile up            | shift up      |
//! | `down` / `k`       | tile down          | shift down    |
//! | `return`           | toggle maximize    | center        |
//! | `tab`              | move to next screen|               |
//! | `p`                | window info        |               |
//! | `m`                | locate pointer     |               |
//! | `delete`           | minimize           |               |
//! | `space`            | open search        |               |
//!
//! Plain `tab` and `shift+tab` rotate an open search session.

use crate::command::{Command, Direction, Rotation};
use crate::config::KeyConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A `(key, modifiers)` pair as delivered by the host's hotkey layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl Chord {
    pub fn new<I, S>(key: &str, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.to_string(),
            modifiers: modifiers.into_iter().map(Into::into).collect(),
        }
    }
}

/// The modifier tier a chord was pressed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Hyper,
    HyperShift,
}

/// Resolves chords into commands.
#[derive(Debug, Clone)]
pub struct Keymap {
    hyper: BTreeSet<String>,
    hyper_shift: BTreeSet<String>,
}

fn normalise<'a>(modifiers: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    modifiers
        .into_iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

fn direction_key(key: &str) -> Option<Direction> {
    match key {
        "left" | "j" => Some(Direction::Left),
        "right" | "l" => Some(Direction::Right),
        "up" | "i" => Some(Direction::Up),
        "down" | "k" => Some(Direction::Down),
        _ => None,
    }
}

impl Keymap {
    pub fn new(config: &KeyConfig) -> Self {
        Self {
            hyper: normalise(&config.hyper),
            hyper_shift: normalise(&config.hyper_shift),
        }
    }

    /// Which tier a modifier set belongs to, if any.
    pub fn tier(&self, modifiers: &[String]) -> Option<Tier> {
        let set = normalise(modifiers);
        if set == self.hyper {
            Some(Tier::Hyper)
        } else if set == self.hyper_shift {
            Some(Tier::HyperShift)
        } else {
            None
        }
    }

    /// Look up the command bound to `chord`.  Unbound chords yield `None`.
    pub fn resolve(&self, chord: &Chord) -> Option<Command> {
        let key = chord.key.trim().to_lowercase();
        let key = key.as_str();

        match self.tier(&chord.modifiers) {
            Some(Tier::Hyper) => {
                if let Some(dir) = direction_key(key) {
                    return Some(Command::Tile(dir));
                }
                match key {
                    "return" | "enter" => Some(Command::ToggleMaximize),
                    "tab" => Some(Command::MoveToNextScreen),
                    "p" => Some(Command::ShowWindowInfo),
                    "m" => Some(Command::LocatePointer),
                    "delete" => Some(Command::Minimize),
                    "space" => Some(Command::OpenSearch),
                    _ => None,
                }
            }
            Some(Tier::HyperShift) => {
                if let Some(dir) = direction_key(key) {
                    return Some(Command::Shift(dir));
                }
                match key {
                    "return" | "enter" => Some(Command::Center),
                    _ => None,
                }
            }
            None if key == "tab" => {
                let set = normalise(&chord.modifiers);
                if set.is_empty() {
                    Some(Command::SearchRotate(Rotation::Backward))
                } else if set.len() == 1 && set.contains("shift") {
                    Some(Command::SearchRotate(Rotation::Forward))
                } else {
                    None
                }
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keymap() -> Keymap {
        Keymap::new(&KeyConfig::default())
    }

    fn hyper(key: &str) -> Chord {
        Chord::new(key, KeyConfig::default().hyper)
    }

    fn hyper_shift(key: &str) -> Chord {
        Chord::new(key, KeyConfig::default().hyper_shift)
    }

    #[test]
    fn hyper_directions_tile() {
        let km = keymap();
        assert_eq!(km.resolve(&hyper("left")), Some(Command::Tile(Direction::Left)));
        assert_eq!(km.resolve(&hyper("l")), Some(Command::Tile(Direction::Right)));
        assert_eq!(km.resolve(&hyper("i")), Some(Command::Tile(Direction::Up)));
        assert_eq!(km.resolve(&hyper("Down")), Some(Command::Tile(Direction::Down)));
    }

    #[test]
    fn hyper_shift_directions_shift() {
        let km = keymap();
        assert_eq!(km.resolve(&hyper_shift("j")), Some(Command::Shift(Direction::Left)));
        assert_eq!(km.resolve(&hyper_shift("k")), Some(Command::Shift(Direction::Down)));
        assert_eq!(km.resolve(&hyper_shift("return")), Some(Command::Center));
    }

    #[test]
    fn modifier_order_and_case_do_not_matter() {
        let km = keymap();
        let mut mods: Vec<String> = KeyConfig::default().hyper;
        mods.reverse();
        let mods: Vec<String> = mods.into_iter().map(|m| m.to_uppercase()).collect();
        let chord = Chord::new("return", mods);
        assert_eq!(km.resolve(&chord), Some(Command::ToggleMaximize));
    }

    #[test]
    fn hyper_actions() {
        let km = keymap();
        assert_eq!(km.resolve(&hyper("tab")), Some(Command::MoveToNextScreen));
        assert_eq!(km.resolve(&hyper("p")), Some(Command::ShowWindowInfo));
        assert_eq!(km.resolve(&hyper("m")), Some(Command::LocatePointer));
        assert_eq!(km.resolve(&hyper("delete")), Some(Command::Minimize));
        assert_eq!(km.resolve(&hyper("space")), Some(Command::OpenSearch));
    }

    #[test]
    fn plain_tab_rotates_search() {
        let km = keymap();
        let tab = Chord::new("tab", Vec::<String>::new());
        let shift_tab = Chord::new("tab", ["shift"]);
        assert_eq!(km.resolve(&tab), Some(Command::SearchRotate(Rotation::Backward)));
        assert_eq!(km.resolve(&shift_tab), Some(Command::SearchRotate(Rotation::Forward)));
    }

    #[test]
    fn unbound_chords_resolve_to_none() {
        let km = keymap();
        assert_eq!(km.resolve(&hyper("z")), None);
        assert_eq!(km.resolve(&hyper_shift("p")), None);
        assert_eq!(km.resolve(&Chord::new("left", ["cmd"])), None);
        assert_eq!(km.resolve(&Chord::new("tab", ["cmd"])), None);
    }

    #[test]
    fn custom_tiers() {
        let km = Keymap::new(&KeyConfig {
            hyper: vec!["ctrl".into(), "alt".into()],
            hyper_shift: vec!["ctrl".into(), "alt".into(), "shift".into()],
        });
        assert_eq!(km.tier(&["alt".to_string(), "ctrl".to_string()]), Some(Tier::Hyper));
        assert_eq!(
            km.resolve(&Chord::new("left", ["ctrl", "alt", "shift"])),
            Some(Command::Shift(Direction::Left))
        );
    }
}
