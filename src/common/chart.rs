//! Chart basic types and helpers.

/// Chart kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    /// Horizontal bars, one per row of the slice. Single value column only.
    HorizontalBar,
    /// Vertical bars, grouped by value column when there are several.
    VerticalBar,
    /// Line chart over a numeric key level.
    Line,
}
impl ChartKind {
    /// Describes the legal values of the kind, should match the body of
    /// `Self::of_str`.
    #[inline]
    pub fn values() -> &'static str {
        "horizontal-bar|vertical-bar|line"
    }
    /// Chart kind of a string. Update `Self::values` if you change this.
    pub fn of_str(s: &str) -> Option<Self> {
        match s {
            "horizontal-bar" => Some(ChartKind::HorizontalBar),
            "vertical-bar" => Some(ChartKind::VerticalBar),
            "line" => Some(ChartKind::Line),
            _ => None,
        }
    }
}

/// Row ordering applied right before rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortPolicy {
    /// Keep the slice's order (which a list selector may have fixed).
    None,
    /// Sort rows by decreasing value. Single value column only; takes
    /// precedence over any upstream list-selector ordering.
    Descending,
}

/// Scale of the value axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Linear scale from zero.
    Linear,
    /// Log scale, floored at `consts::chart::log_floor`.
    Log,
}

/// Everything the renderer needs to draw one chart.
#[derive(Clone, Debug)]
pub struct ChartSpec {
    /// Chart kind.
    pub kind: ChartKind,
    /// Sort policy.
    pub sort: SortPolicy,
    /// Value axis scale.
    pub scale: Scale,
    /// Legend labels. Value column names (or series keys) if absent.
    pub legend: Option<Vec<String>>,
    /// Output file.
    pub file: String,
}
impl ChartSpec {
    /// Creates a chart spec.
    #[inline]
    pub fn mk(
        kind: ChartKind,
        sort: SortPolicy,
        scale: Scale,
        legend: Option<Vec<String>>,
        file: String,
    ) -> Self {
        ChartSpec {
            kind,
            sort,
            scale,
            legend,
            file,
        }
    }
}
