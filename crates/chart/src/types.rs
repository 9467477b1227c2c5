// In crates/chart/src/types.rs

use serde::{Deserialize, Serialize};

/// Which marker traces a figure carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default = "default_include")]
    pub include_buy: bool,
    #[serde(default = "default_include")]
    pub include_sell: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self { include_buy: true, include_sell: true }
    }
}

fn default_include() -> bool { true }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lines,
    Markers,
}

/// A single trace of a figure.
/// `tag` is used by serde so each trace carries its `type` like a plotly trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick {
        name: String,
        x: Vec<String>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Scatter {
        name: String,
        mode: Mode,
        x: Vec<String>,
        // Unset averages serialise as `null`, leaving a gap in the line.
        y: Vec<Option<f64>>,
        color: String,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick { name, .. } | Trace::Scatter { name, .. } => name,
        }
    }
}

/// A complete chart description, ready to be handed to a plotting front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub traces: Vec<Trace>,
}

impl Figure {
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name() == name)
    }
}
