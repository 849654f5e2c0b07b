use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::search::ordering::ChildOrder;

/// What a node keeps once its value is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Keep the whole tree.
    #[default]
    KeepAll,
    /// Drop every node's children as soon as its value is final.
    DeleteAlways,
    /// Keep children of nodes within the top `levels` levels (the root is
    /// level 1), drop the rest.
    KeepLevels(u32),
}

impl Retention {
    /// Whether a node `ply` half-moves below the root drops its children.
    pub fn deletes_at(self, ply: u32) -> bool {
        match self {
            Retention::KeepAll => false,
            Retention::DeleteAlways => true,
            Retention::KeepLevels(levels) => ply + 1 > levels,
        }
    }
}

/// Named engine configurations: a retention policy plus a child order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Plain,
    SelfDestructing,
    Storing(u32),
    OrderedSelfDestructing,
}

impl Variant {
    pub fn retention(self) -> Retention {
        match self {
            Variant::Plain => Retention::KeepAll,
            Variant::SelfDestructing | Variant::OrderedSelfDestructing => Retention::DeleteAlways,
            Variant::Storing(levels) => Retention::KeepLevels(levels),
        }
    }

    pub fn ordering(self) -> ChildOrder {
        match self {
            Variant::OrderedSelfDestructing => ChildOrder::Estimated,
            _ => ChildOrder::Generated,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Plain => write!(f, "plain"),
            Variant::SelfDestructing => write!(f, "self-destructing"),
            Variant::Storing(n) => write!(f, "storing:{}", n),
            Variant::OrderedSelfDestructing => write!(f, "ordered-self-destructing"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Variant::Plain),
            "self-destructing" | "sd" => Ok(Variant::SelfDestructing),
            "ordered-self-destructing" | "osd" => Ok(Variant::OrderedSelfDestructing),
            other => match other.strip_prefix("storing:") {
                Some(n) => n.parse::<u32>().map(Variant::Storing).map_err(|e| format!("bad storing level '{}': {}", n, e)),
                None => Err(format!("unknown variant '{}'", s)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_levels_counts_root_as_level_one() {
        let r = Retention::KeepLevels(2);
        assert!(!r.deletes_at(0));
        assert!(!r.deletes_at(1));
        assert!(r.deletes_at(2));
        assert!(Retention::KeepLevels(0).deletes_at(0));
    }

    #[test]
    fn variants_parse_and_print() {
        for v in [Variant::Plain, Variant::SelfDestructing, Variant::Storing(3), Variant::OrderedSelfDestructing] {
            assert_eq!(v.to_string().parse::<Variant>(), Ok(v));
        }
        assert!("storing:x".parse::<Variant>().is_err());
        assert!("bogus".parse::<Variant>().is_err());
    }
}
