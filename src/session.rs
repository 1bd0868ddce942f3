//! Session-scoped configuration.
//!
//! A [`Session`] holds the mutable state shared by every engine call: the
//! reference root, the active strategy and its edge parameters, the
//! confidence and the high-density display flag. It is passed by reference
//! into the locator; callers that share a session across threads must
//! serialize access themselves.

use crate::edges::EdgeParams;
use crate::trace::{trace_info, trace_warn};
use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default confidence of the exact strategy (pixel-perfect).
pub const EXACT_DEFAULT_CONFIDENCE: f32 = 1.0;
/// Default confidence of the edge strategy.
pub const EDGE_DEFAULT_CONFIDENCE: f32 = 0.99;

/// Matching strategy selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyKind {
    /// Direct pixel comparison.
    #[default]
    Exact,
    /// Edge maps compared by normalized cross-correlation.
    Edge,
}

impl StrategyKind {
    /// Confidence used when the session has none set.
    pub fn default_confidence(self) -> f32 {
        match self {
            StrategyKind::Exact => EXACT_DEFAULT_CONFIDENCE,
            StrategyKind::Edge => EDGE_DEFAULT_CONFIDENCE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Exact => "exact",
            StrategyKind::Edge => "edge",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ScreenMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(StrategyKind::Exact),
            "edge" => Ok(StrategyKind::Edge),
            _ => Err(ScreenMatchError::InvalidStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Strategy selection plus the edge pipeline parameters.
///
/// The edge fields are ignored by the exact strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub edge: EdgeParams,
}

/// Initial values for a [`Session`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// Base directory for resolving reference names.
    pub reference_root: Option<PathBuf>,
    pub strategy: StrategyConfig,
    /// Confidence in `[0, 1]`; `None` means the strategy default.
    pub confidence: Option<f32>,
    /// Halve reported coordinates (capture in physical pixels at 2x).
    pub high_density_display: bool,
}

/// Mutable matching state for one caller.
#[derive(Clone, Debug, Default)]
pub struct Session {
    settings: Settings,
}

impl Session {
    /// Creates a session, validating the edge parameters whatever the
    /// active strategy, so a later [`Session::set_strategy_kind`] never
    /// activates unchecked values.
    ///
    /// An out-of-range confidence is dropped with a warning, as with
    /// [`Session::set_confidence`].
    pub fn new(settings: Settings) -> ScreenMatchResult<Self> {
        settings.strategy.edge.validate()?;
        let confidence = settings.confidence;
        let mut session = Self {
            settings: Settings {
                confidence: None,
                ..settings
            },
        };
        session.set_confidence(confidence);
        Ok(session)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn reference_root(&self) -> Option<&Path> {
        self.settings.reference_root.as_deref()
    }

    pub fn set_reference_root(&mut self, root: impl Into<PathBuf>) {
        self.settings.reference_root = Some(root.into());
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.settings.strategy
    }

    /// Switches strategy, keeping the current edge parameters.
    pub fn set_strategy_kind(&mut self, kind: StrategyKind) {
        self.settings.strategy.kind = kind;
    }

    /// Switches strategy and replaces the edge parameters.
    ///
    /// Invalid parameters leave the session unchanged.
    pub fn set_strategy(&mut self, kind: StrategyKind, edge: EdgeParams) -> ScreenMatchResult<()> {
        edge.validate()?;
        self.settings.strategy = StrategyConfig { kind, edge };
        trace_info!(
            "strategy set to {} (sigma={}, low={}, high={})",
            kind,
            edge.sigma,
            edge.low_threshold,
            edge.high_threshold
        );
        Ok(())
    }

    /// Confidence as configured, `None` when unset.
    pub fn confidence(&self) -> Option<f32> {
        self.settings.confidence
    }

    /// Sets or clears the confidence.
    ///
    /// Values outside `[0, 1]` (or NaN) are rejected with a warning and the
    /// previous value is kept.
    pub fn set_confidence(&mut self, confidence: Option<f32>) {
        match confidence {
            None => self.settings.confidence = None,
            Some(value) if (0.0..=1.0).contains(&value) => {
                self.settings.confidence = Some(value);
            }
            Some(value) => {
                trace_warn!(
                    "unable to set confidence to {}: value must be between 0 and 1",
                    value
                );
            }
        }
    }

    /// Confidence in effect for the active strategy.
    pub fn effective_confidence(&self) -> f32 {
        self.settings
            .confidence
            .unwrap_or_else(|| self.settings.strategy.kind.default_confidence())
    }

    pub fn high_density_display(&self) -> bool {
        self.settings.high_density_display
    }

    pub fn set_high_density_display(&mut self, enabled: bool) {
        self.settings.high_density_display = enabled;
    }
}
