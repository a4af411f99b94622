use gtex_plot::GroupCounts;
use gtex_plot::color::ColorMap;
use gtex_plot::data::filter::filter_by_threshold;
use gtex_plot::data::stats::{BoxSummary, mean};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Every group returned by the query, in first-seen order.
    pub grouped: Vec<GroupCounts>,

    /// Gene the counts belong to.
    pub gene: String,

    /// Column the samples were grouped by (x-axis title).
    pub group_column: String,

    /// Groups with a mean below this are hidden.
    pub threshold: f64,

    /// Groups passing the current threshold (cached).
    pub visible: Vec<GroupCounts>,

    /// Box summaries of `visible`, same order.
    pub summaries: Vec<Option<BoxSummary>>,

    /// Colours keyed by group label, stable across threshold changes.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(grouped: Vec<GroupCounts>, gene: &str, group_column: &str, threshold: f64) -> Self {
        let color_map = ColorMap::new(grouped.iter().map(|g| g.label.as_str()));
        let mut state = Self {
            grouped,
            gene: gene.to_string(),
            group_column: group_column.to_string(),
            threshold,
            visible: Vec::new(),
            summaries: Vec::new(),
            color_map,
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Largest group mean, the upper end of the threshold slider.
    pub fn max_mean(&self) -> f64 {
        self.grouped
            .iter()
            .filter_map(|g| mean(&g.counts).ok())
            .fold(0.0, f64::max)
    }

    /// Set a new threshold and recompute the visible groups.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
        self.refilter();
    }

    /// Recompute `visible` and `summaries` after a threshold change.
    pub fn refilter(&mut self) {
        if self.grouped.is_empty() {
            self.visible.clear();
            self.summaries.clear();
            return;
        }

        match filter_by_threshold(&self.grouped, &self.threshold) {
            Ok(kept) => {
                self.summaries = kept.iter().map(|g| BoxSummary::from_counts(&g.counts)).collect();
                self.visible = kept;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to filter groups: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
