//! # Component Identifier Model
//!
//! Structural names for cluster hardware, e.g. `x1000c0s1b0n1`.
//!
//! An xname is a chain of single-letter levels, each followed by an index:
//! * `x`: cabinet
//! * `c`: chassis (inside a cabinet)
//! * `s`: slot (a swappable blade position inside a chassis)
//! * `b`: board controller (directly under a chassis, or under a slot)
//! * `n`: node (under a board controller)
//!
//! The level chain determines the component type: `x1000c0` is a chassis,
//! `x1000c0b0` is the chassis controller, `x1000c0s1` is a slot, and
//! `x1000c0s1b0n1` is a node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XNameError {
    #[error("empty xname")]
    Empty,
    #[error("invalid xname '{xname}': {reason}")]
    Invalid { xname: String, reason: String },
}

/// The kind of component an xname designates, derived from its level chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    Cabinet,
    Chassis,
    #[serde(rename = "ChassisBMC")]
    ChassisBmc,
    Slot,
    #[serde(rename = "NodeBMC")]
    NodeBmc,
    Node,
}

impl ComponentType {
    /// The name used by the inventory service in payloads and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Cabinet => "Cabinet",
            ComponentType::Chassis => "Chassis",
            ComponentType::ChassisBmc => "ChassisBMC",
            ComponentType::Slot => "Slot",
            ComponentType::NodeBmc => "NodeBMC",
            ComponentType::Node => "Node",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Segment {
    level: char,
    index: u32,
}

/// A parsed, validated component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct XName {
    segments: Vec<Segment>,
}

impl XName {
    pub fn component_type(&self) -> ComponentType {
        let levels: Vec<char> = self.segments.iter().map(|s| s.level).collect();
        match levels.as_slice() {
            ['x'] => ComponentType::Cabinet,
            ['x', 'c'] => ComponentType::Chassis,
            ['x', 'c', 'b'] => ComponentType::ChassisBmc,
            ['x', 'c', 's'] => ComponentType::Slot,
            ['x', 'c', 's', 'b'] => ComponentType::NodeBmc,
            ['x', 'c', 's', 'b', 'n'] => ComponentType::Node,
            // parse() admits nothing else
            _ => unreachable!("unparseable level chain"),
        }
    }

    pub fn is_slot(&self) -> bool {
        self.component_type() == ComponentType::Slot
    }

    /// The chassis this component sits in, if it is at or below chassis level.
    pub fn chassis(&self) -> Option<XName> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(XName {
            segments: self.segments[..2].to_vec(),
        })
    }

    /// Whether `other` sits at or below this component in the hierarchy.
    pub fn contains(&self, other: &XName) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// The board/node position below the slot, e.g. `b1n0` for
    /// `x1000c0s1b1n0`.
    ///
    /// This is the part of a node's identity that survives a physical
    /// relocation: the cabinet/chassis/slot prefix changes, the position of
    /// the board and node on the blade does not.
    pub fn blade_suffix(&self) -> Option<String> {
        let slot_pos = self.segments.iter().position(|s| s.level == 's')?;
        let suffix = &self.segments[slot_pos + 1..];
        if suffix.is_empty() {
            return None;
        }
        Some(
            suffix
                .iter()
                .map(|s| format!("{}{}", s.level, s.index))
                .collect(),
        )
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}{}", segment.level, segment.index)?;
        }
        Ok(())
    }
}

impl FromStr for XName {
    type Err = XNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(XNameError::Empty);
        }

        let invalid = |reason: &str| XNameError::Invalid {
            xname: s.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut chars = s.chars().peekable();

        while let Some(level) = chars.next() {
            if !level.is_ascii_lowercase() {
                return Err(invalid(&format!("unexpected character '{level}'")));
            }

            let mut digits = String::new();
            while let Some(c) = chars.peek().copied().filter(|c| c.is_ascii_digit()) {
                digits.push(c);
                chars.next();
            }
            if digits.is_empty() {
                return Err(invalid(&format!("level '{level}' has no index")));
            }
            let index: u32 = digits
                .parse()
                .map_err(|_| invalid(&format!("index '{digits}' out of range")))?;

            let allowed = match segments.last().map(|s: &Segment| s.level) {
                None => matches!(level, 'x'),
                Some('x') => matches!(level, 'c'),
                Some('c') => matches!(level, 's' | 'b'),
                Some('s') => matches!(level, 'b'),
                Some('b') => matches!(level, 'n'),
                Some(_) => false,
            };
            if !allowed {
                return Err(invalid(&format!("level '{level}' out of place")));
            }
            if level == 'n' && !segments.iter().any(|s| s.level == 's') {
                // Nodes hang off board controllers in slots, never off a
                // chassis controller.
                return Err(invalid("node under a chassis controller"));
            }

            segments.push(Segment { level, index });
        }

        Ok(XName { segments })
    }
}

impl TryFrom<String> for XName {
    type Error = XNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<XName> for String {
    fn from(value: XName) -> Self {
        value.to_string()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
