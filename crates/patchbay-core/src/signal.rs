//! Signal kinds and port directions.
//!
//! Every port carries exactly one [`SignalKind`]. Whether a source may drive a
//! sink is decided by [`SignalKind::can_drive`], an asymmetric table: a `cv`
//! source may drive a `gate` sink, but a `gate` source may not drive `cv`.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Category of signal carried by a port or connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Audio-rate signal.
    Audio,
    /// Control voltage: continuous modulation.
    Cv,
    /// Gate or trigger.
    Gate,
}

impl SignalKind {
    /// All signal kinds, in declaration order.
    pub const ALL: [SignalKind; 3] = [SignalKind::Audio, SignalKind::Cv, SignalKind::Gate];

    /// Lowercase name as used in patch files and logs.
    pub const fn name(self) -> &'static str {
        match self {
            SignalKind::Audio => "audio",
            SignalKind::Cv => "cv",
            SignalKind::Gate => "gate",
        }
    }

    /// Returns `true` if a source of this kind may feed a sink of kind `sink`.
    ///
    /// | source | accepted sinks |
    /// |--------|----------------|
    /// | audio  | audio          |
    /// | cv     | cv, gate       |
    /// | gate   | gate           |
    #[inline]
    pub const fn can_drive(self, sink: SignalKind) -> bool {
        matches!(
            (self, sink),
            (SignalKind::Audio, SignalKind::Audio)
                | (SignalKind::Cv, SignalKind::Cv | SignalKind::Gate)
                | (SignalKind::Gate, SignalKind::Gate)
        )
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which way signal flows through a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Emits signal (an output).
    Source,
    /// Receives signal (an input).
    Sink,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Source => f.write_str("source"),
            Direction::Sink => f.write_str("sink"),
        }
    }
}
