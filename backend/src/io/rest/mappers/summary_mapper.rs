use shared::{ChartBar, SavingsStats, SpendingSummary};

use crate::domain::aggregation::{CategoryDistribution, SavingsStats as DomainSavingsStats, Summary};
use crate::domain::ExpenseTableService;

pub struct SummaryMapper;

impl SummaryMapper {
    pub fn to_dto(summary: &Summary, formatter: &ExpenseTableService) -> SpendingSummary {
        SpendingSummary {
            real_spending_total: summary.real_spending_total,
            formatted_real_spending: formatter.format_currency(summary.real_spending_total),
            chart: Self::chart_to_dto(&summary.distribution),
            savings: Self::savings_to_dto(&summary.savings),
        }
    }

    /// `None` when the chart should not be drawn at all
    pub fn chart_to_dto(distribution: &CategoryDistribution) -> Option<Vec<ChartBar>> {
        if !distribution.should_render() {
            return None;
        }

        let bars = distribution
            .entries
            .iter()
            .map(|entry| ChartBar {
                category: entry.category.as_str().to_string(),
                label: entry.label.clone(),
                amount: entry.amount,
                color: entry.color.to_string(),
            })
            .collect();
        Some(bars)
    }

    pub fn savings_to_dto(stats: &DomainSavingsStats) -> SavingsStats {
        SavingsStats {
            active_goal: stats.active_goal_title.clone(),
            total_saved: stats.total_saved,
            remaining: stats.remaining,
            progress: stats.progress,
            has_goal: stats.has_goal,
            progress_label: format!("{:.0}% Complete", stats.progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregation::summarize;
    use crate::domain::models::{Category, Expense, Saving, SavingType};
    use chrono::Utc;

    fn expense(amount: f64, category: Category) -> Expense {
        Expense {
            id: format!("{}-{}", category, amount),
            title: "x".to_string(),
            amount,
            category,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_summary_dto() {
        let expenses = vec![expense(20.0, Category::Food), expense(10.0, Category::Savings)];
        let savings = vec![Saving {
            id: "g".to_string(),
            title: "Phone".to_string(),
            amount: 30.0,
            saving_type: SavingType::Goal,
            date: Utc::now(),
        }];

        let summary = summarize(&expenses, &savings);
        let dto = SummaryMapper::to_dto(&summary, &ExpenseTableService::new());

        assert_eq!(dto.formatted_real_spending, "$20.00");
        let chart = dto.chart.unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].label, "Food.");
        assert_eq!(dto.savings.active_goal, "Phone");
        assert_eq!(dto.savings.progress_label, "33% Complete");
    }

    #[test]
    fn test_empty_summary_hides_chart() {
        let dto = SummaryMapper::to_dto(&summarize(&[], &[]), &ExpenseTableService::new());

        assert!(dto.chart.is_none());
        assert_eq!(dto.formatted_real_spending, "$0.00");
        assert_eq!(dto.savings.active_goal, "No Goal Set");
        assert_eq!(dto.savings.progress_label, "0% Complete");
    }
}
