//! Binned categorization of continuous values (patient age).

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Which side of each interval is inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalClosed {
    /// `(lower, upper]`
    #[default]
    Right,
    /// `[lower, upper)`
    Left,
}

/// Ordered, contiguous labelled intervals.
///
/// `edges` are strictly increasing and there is exactly one label per
/// adjacent pair of edges, so every value inside the outer edges lands in
/// one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBins {
    edges: Vec<f64>,
    labels: Vec<String>,
    closed: IntervalClosed,
}

impl AgeBins {
    pub fn new(edges: Vec<f64>, labels: Vec<String>, closed: IntervalClosed) -> Result<Self> {
        if edges.len() < 2 {
            return Err(invalid("at least two edges are required"));
        }
        if labels.len() != edges.len() - 1 {
            return Err(invalid(format!(
                "{} edges need {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        if edges.iter().any(|edge| edge.is_nan()) {
            return Err(invalid("edges must not be NaN"));
        }
        if let Some(pair) = edges.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(invalid(format!(
                "edges must be strictly increasing ({} >= {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self {
            edges,
            labels,
            closed,
        })
    }

    /// Build from `(lower, upper, label)` rows that must tile the range
    /// without gaps.
    pub fn from_intervals<I>(rows: I, closed: IntervalClosed) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64, String)>,
    {
        let mut edges = Vec::new();
        let mut labels = Vec::new();
        for (lower, upper, label) in rows {
            match edges.last() {
                None => edges.push(lower),
                Some(previous) if *previous == lower => {}
                Some(previous) => {
                    return Err(invalid(format!(
                        "interval '{label}' starts at {lower} but the previous one ends at {previous}"
                    )));
                }
            }
            edges.push(upper);
            labels.push(label);
        }
        Self::new(edges, labels, closed)
    }

    /// Label of the interval containing `value`, or `None` when the value is
    /// NaN or outside every interval.
    pub fn categorize(&self, value: f64) -> Option<&str> {
        if value.is_nan() {
            return None;
        }
        let idx = match self.closed {
            IntervalClosed::Right => self.edges.partition_point(|edge| *edge < value),
            IntervalClosed::Left => self.edges.partition_point(|edge| *edge <= value),
        };
        if idx == 0 || idx == self.edges.len() {
            return None;
        }
        self.labels.get(idx - 1).map(String::as_str)
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn closed(&self) -> IntervalClosed {
        self.closed
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidBins {
        message: message.into(),
    }
}
