//! Robot primitive catalog
//!
//! The fixed vocabulary the robot executes, plus the literal call syntax the
//! downstream model is trained to emit.

use crate::error::{Result, SynthError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive bound of every coordinate axis.
pub const COORD_LIMIT: i32 = 20;

/// Body parts the detector knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    #[serde(rename = "lower back")]
    LowerBack,
    #[serde(rename = "shoulders")]
    Shoulders,
    #[serde(rename = "neck")]
    Neck,
    #[serde(rename = "arms")]
    Arms,
    #[serde(rename = "legs")]
    Legs,
    #[serde(rename = "head")]
    Head,
    #[serde(rename = "chest")]
    Chest,
    #[serde(rename = "stomach")]
    Stomach,
    #[serde(rename = "hips")]
    Hips,
    #[serde(rename = "knees")]
    Knees,
    #[serde(rename = "elbows")]
    Elbows,
    #[serde(rename = "wrists")]
    Wrists,
    #[serde(rename = "feet")]
    Feet,
    #[serde(rename = "calves")]
    Calves,
    #[serde(rename = "forearms")]
    Forearms,
}

impl BodyPart {
    /// Full capability vocabulary
    pub const ALL: [BodyPart; 15] = [
        BodyPart::LowerBack,
        BodyPart::Shoulders,
        BodyPart::Neck,
        BodyPart::Arms,
        BodyPart::Legs,
        BodyPart::Head,
        BodyPart::Chest,
        BodyPart::Stomach,
        BodyPart::Hips,
        BodyPart::Knees,
        BodyPart::Elbows,
        BodyPart::Wrists,
        BodyPart::Feet,
        BodyPart::Calves,
        BodyPart::Forearms,
    ];

    /// Subset used by the elliptical (context-dependent) phrasings
    pub const ELLIPTICAL: [BodyPart; 9] = [
        BodyPart::Shoulders,
        BodyPart::Arms,
        BodyPart::Neck,
        BodyPart::Chest,
        BodyPart::Stomach,
        BodyPart::Hips,
        BodyPart::Knees,
        BodyPart::Elbows,
        BodyPart::Wrists,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::LowerBack => "lower back",
            BodyPart::Shoulders => "shoulders",
            BodyPart::Neck => "neck",
            BodyPart::Arms => "arms",
            BodyPart::Legs => "legs",
            BodyPart::Head => "head",
            BodyPart::Chest => "chest",
            BodyPart::Stomach => "stomach",
            BodyPart::Hips => "hips",
            BodyPart::Knees => "knees",
            BodyPart::Elbows => "elbows",
            BodyPart::Wrists => "wrists",
            BodyPart::Feet => "feet",
            BodyPart::Calves => "calves",
            BodyPart::Forearms => "forearms",
        }
    }

    /// Draw from the full vocabulary
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Draw from the elliptical subset
    pub fn random_elliptical<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ELLIPTICAL[rng.gen_range(0..Self::ELLIPTICAL.len())]
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPart {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.as_str() == wanted)
            .ok_or_else(|| SynthError::OutOfRange(format!("unknown body part: {s}")))
    }
}

/// Literal target coordinates, each axis in [-COORD_LIMIT, COORD_LIMIT]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i32; 3]")]
pub struct Coords([i32; 3]);

impl TryFrom<[i32; 3]> for Coords {
    type Error = SynthError;

    fn try_from([x, y, z]: [i32; 3]) -> Result<Self> {
        Self::new(x, y, z)
    }
}

impl Coords {
    pub fn new(x: i32, y: i32, z: i32) -> Result<Self> {
        let axes = [x, y, z];
        if axes.iter().any(|v| !(-COORD_LIMIT..=COORD_LIMIT).contains(v)) {
            return Err(SynthError::OutOfRange(format!(
                "coordinates {axes:?} outside [-{COORD_LIMIT}, {COORD_LIMIT}]"
            )));
        }
        Ok(Self(axes))
    }

    /// Independent per-axis draw; repeats, zeros and negatives are all fine.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self([
            rng.gen_range(-COORD_LIMIT..=COORD_LIMIT),
            rng.gen_range(-COORD_LIMIT..=COORD_LIMIT),
            rng.gen_range(-COORD_LIMIT..=COORD_LIMIT),
        ])
    }

    pub fn axes(&self) -> [i32; 3] {
        self.0
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "[{x}, {y}, {z}]")
    }
}

impl FromStr for Coords {
    type Err = SynthError;

    /// Accepts `x,y,z` with optional brackets and spaces.
    fn from_str(s: &str) -> Result<Self> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        let parsed: Vec<i32> = inner
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<core::result::Result<_, _>>()
            .map_err(|e| SynthError::OutOfRange(format!("bad coordinates {s:?}: {e}")))?;
        match parsed.as_slice() {
            [x, y, z] => Self::new(*x, *y, *z),
            _ => Err(SynthError::OutOfRange(format!(
                "expected three coordinates, got {s:?}"
            ))),
        }
    }
}

/// Where `move_to` points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    /// The `[x, y, z]` bound by a preceding `detect_body_part`
    Detected,
    Literal(Coords),
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveTarget::Detected => f.write_str("[x, y, z]"),
            MoveTarget::Literal(coords) => write!(f, "{coords}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceDirection {
    Increase,
    Decrease,
}

/// Multiplicative force update: `F_new = (1 + value) * F`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRelativeForce")]
pub struct RelativeForce {
    percent: u8,
    direction: ForceDirection,
}

#[derive(Deserialize)]
struct RawRelativeForce {
    percent: u8,
    direction: ForceDirection,
}

impl TryFrom<RawRelativeForce> for RelativeForce {
    type Error = SynthError;

    fn try_from(raw: RawRelativeForce) -> Result<Self> {
        Self::new(raw.percent, raw.direction)
    }
}

impl RelativeForce {
    /// `percent` may not exceed 100 so the value stays inside [-1, 1].
    pub fn new(percent: u8, direction: ForceDirection) -> Result<Self> {
        if percent > 100 {
            return Err(SynthError::OutOfRange(format!(
                "relative force of {percent}% exceeds 100%"
            )));
        }
        Ok(Self { percent, direction })
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn direction(&self) -> ForceDirection {
        self.direction
    }

    pub fn value(&self) -> f64 {
        let magnitude = f64::from(self.percent) / 100.0;
        match self.direction {
            ForceDirection::Increase => magnitude,
            ForceDirection::Decrease => -magnitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ForceChange {
    Relative(RelativeForce),
    /// New force set directly
    Absolute(f64),
}

impl ForceChange {
    pub fn mode(&self) -> &'static str {
        match self {
            ForceChange::Relative(_) => "relative",
            ForceChange::Absolute(_) => "absolute",
        }
    }
}

/// One call in a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Start,
    Stop,
    Home,
    DetectBodyPart(BodyPart),
    MoveTo(MoveTarget),
    ChangeForce(ForceChange),
    AutomaticMassage(BodyPart),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Start => f.write_str("start()"),
            Primitive::Stop => f.write_str("stop()"),
            Primitive::Home => f.write_str("home()"),
            Primitive::DetectBodyPart(part) => {
                write!(f, "[x, y, z] = detect_body_part('{part}')")
            }
            Primitive::MoveTo(target) => write!(f, "move_to({target})"),
            Primitive::ChangeForce(ForceChange::Relative(rel)) => {
                write!(f, "change_force('relative', {})", rel.value())
            }
            Primitive::ChangeForce(ForceChange::Absolute(value)) => {
                write!(f, "change_force('absolute', {value:.2})")
            }
            Primitive::AutomaticMassage(part) => write!(f, "automatic_massage('{part}')"),
        }
    }
}

/// Ordered primitive calls realizing one or more commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline(Vec<Primitive>);

impl Pipeline {
    pub fn new(steps: Vec<Primitive>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Primitive] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends another pipeline without reordering or merging.
    pub fn extend(&mut self, other: &Pipeline) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}
