//! # Aggregation
//!
//! Derived figures shown next to the expense list: real spending, the
//! per-category chart and the savings goal progress. Everything here is a
//! pure function of the two record snapshots; [`AggregationCache`] keeps the
//! last result so an unchanged pair of snapshots is never summarized twice.
//!
//! The two snapshots are replaced independently, so a summary may combine a
//! fresh expense list with a slightly older savings list. Nothing here
//! assumes the two are consistent with each other.

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::models::{Category, Expense, Saving, FALLBACK_COLOR};

/// Number of categories shown in the spending chart
pub const CHART_MAX_BARS: usize = 5;

/// Goal title reported when no goal has been set
pub const NO_GOAL_LABEL: &str = "No Goal Set";

/// Identifies one pair of snapshots. Each counter is bumped whenever the
/// corresponding snapshot is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SnapshotRevision {
    pub expenses: u64,
    pub savings: u64,
}

/// One bar of the spending chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEntry {
    pub category: Category,
    pub label: String,
    pub amount: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDistribution {
    /// Largest categories first, at most [`CHART_MAX_BARS`]
    pub entries: Vec<ChartEntry>,
    /// Sum over every category, including the ones cut from `entries`
    pub grand_total: f64,
}

impl CategoryDistribution {
    /// The chart is suppressed entirely when there is nothing to draw
    pub fn should_render(&self) -> bool {
        self.grand_total > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsStats {
    pub active_goal_title: String,
    pub target: f64,
    pub total_saved: f64,
    pub remaining: f64,
    /// Percentage in `[0, 100]`
    pub progress: f64,
    pub has_goal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub real_spending_total: f64,
    pub distribution: CategoryDistribution,
    pub savings: SavingsStats,
}

/// Total spent, leaving out money moved into savings
pub fn real_spending_total(expenses: &[Expense]) -> f64 {
    expenses
        .iter()
        .filter(|expense| expense.is_real_spending())
        .map(|expense| expense.amount)
        .fold(0.0, |total, amount| total + amount)
}

/// Short chart label: the first four characters of the name and a period
pub fn chart_label(category: Category) -> String {
    let short: String = category.as_str().chars().take(4).collect();
    format!("{}.", short)
}

/// Group expenses by category and keep the largest groups
pub fn category_distribution(expenses: &[Expense]) -> CategoryDistribution {
    let mut totals: Vec<(Category, f64)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(category, _)| *category == expense.category) {
            Some((_, total)) => *total += expense.amount,
            None => totals.push((expense.category, expense.amount)),
        }
    }

    let grand_total = totals.iter().fold(0.0, |sum, (_, total)| sum + total);

    // Stable sort keeps first-appearance order between equal totals
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    let entries = totals
        .into_iter()
        .take(CHART_MAX_BARS)
        .map(|(category, amount)| ChartEntry {
            category,
            label: chart_label(category),
            amount,
            color: category.chart_color().unwrap_or(FALLBACK_COLOR),
        })
        .collect();

    CategoryDistribution {
        entries,
        grand_total,
    }
}

/// The goal currently tracked: the most recent GOAL record, ties broken by
/// the greatest id
pub fn find_active_goal(savings: &[Saving]) -> Option<&Saving> {
    savings
        .iter()
        .filter(|saving| saving.is_goal())
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)))
}

pub fn savings_stats(savings: &[Saving], expenses: &[Expense]) -> SavingsStats {
    let active_goal = find_active_goal(savings);

    let contributed: f64 = savings
        .iter()
        .filter(|saving| !saving.is_goal())
        .map(|saving| saving.amount)
        .fold(0.0, |total, amount| total + amount);
    let moved_from_spending: f64 = expenses
        .iter()
        .filter(|expense| expense.category.is_savings())
        .map(|expense| expense.amount)
        .fold(0.0, |total, amount| total + amount);
    let total_saved = contributed + moved_from_spending;

    let target = active_goal.map(|goal| goal.amount).unwrap_or(0.0);
    let remaining = (target - total_saved).max(0.0);
    let progress = if target > 0.0 {
        (total_saved / target * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    SavingsStats {
        active_goal_title: active_goal
            .map(|goal| goal.title.clone())
            .unwrap_or_else(|| NO_GOAL_LABEL.to_string()),
        target,
        total_saved,
        remaining,
        progress,
        has_goal: active_goal.is_some(),
    }
}

pub fn summarize(expenses: &[Expense], savings: &[Saving]) -> Summary {
    Summary {
        real_spending_total: real_spending_total(expenses),
        distribution: category_distribution(expenses),
        savings: savings_stats(savings, expenses),
    }
}

/// Remembers the summary of the last snapshot pair
#[derive(Debug, Default)]
pub struct AggregationCache {
    last: Mutex<Option<(SnapshotRevision, Arc<Summary>)>>,
}

impl AggregationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached summary for `revision`, or compute and keep a new one
    pub fn get_or_compute<F>(&self, revision: SnapshotRevision, compute: F) -> Arc<Summary>
    where
        F: FnOnce() -> Summary,
    {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_revision, summary)) = last.as_ref() {
            if *cached_revision == revision {
                return Arc::clone(summary);
            }
        }

        let summary = Arc::new(compute());
        *last = Some((revision, Arc::clone(&summary)));
        summary
    }

    pub fn clear(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
