use serde::{Deserialize, Serialize};

use super::columns::{BoardColumn, TAXONOMY};
use super::domain::Application;

/// Ordering applied to the filtered set before column splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Date,
    Alpha,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Date => Self::Alpha,
            Self::Alpha => Self::Date,
        }
    }
}

/// Map the canonical list into per-column ordered views.
///
/// Deterministic: identical inputs always produce identical output. Filter
/// and sort run over the whole set before the split, so ties inside a
/// column inherit the global order.
pub fn distribute(
    applications: &[Application],
    search_query: &str,
    sort_mode: SortMode,
) -> Vec<BoardColumn> {
    let query = search_query.trim().to_lowercase();

    let mut selected: Vec<&Application> = applications
        .iter()
        .filter(|application| query.is_empty() || matches_query(application, &query))
        .collect();

    match sort_mode {
        SortMode::Date => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Alpha => selected.sort_by(|a, b| {
            let left = a.job_posting.company_name.to_lowercase();
            let right = b.job_posting.company_name.to_lowercase();
            left.cmp(&right)
        }),
    }

    TAXONOMY
        .iter()
        .map(|spec| BoardColumn {
            spec,
            applications: selected
                .iter()
                .filter(|application| spec.owns(&application.status))
                .map(|application| (*application).clone())
                .collect(),
        })
        .collect()
}

fn matches_query(application: &Application, query: &str) -> bool {
    let posting = &application.job_posting;
    posting.company_name.to_lowercase().contains(query)
        || posting.title.to_lowercase().contains(query)
}
