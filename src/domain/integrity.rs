use serde::Serialize;

/// Raw counts gathered by the store for an integrity check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityStats {
    pub inventory_count: i64,
    pub sales_count: i64,
    pub negative_quantities: Vec<String>,
    pub negative_sales: Vec<String>,
    pub unknown_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub inventory_count: i64,
    pub sales_count: i64,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Turn store counts into a list of human-readable problems.
pub fn build_integrity_report(stats: IntegrityStats) -> IntegrityReport {
    let mut issues = Vec::new();

    for category in &stats.negative_quantities {
        issues.push(format!("Inventory for {} is negative", category));
    }
    for category in &stats.negative_sales {
        issues.push(format!("Sales total for {} is negative", category));
    }
    for category in &stats.unknown_categories {
        issues.push(format!("Unknown coffee type stored: {}", category));
    }

    IntegrityReport {
        inventory_count: stats.inventory_count,
        sales_count: stats.sales_count,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_stats_are_healthy() {
        let report = build_integrity_report(IntegrityStats {
            inventory_count: 3,
            sales_count: 2,
            ..Default::default()
        });
        assert!(report.is_healthy());
        assert_eq!(report.inventory_count, 3);
        assert_eq!(report.sales_count, 2);
    }

    #[test]
    fn test_every_problem_is_reported() {
        let report = build_integrity_report(IntegrityStats {
            inventory_count: 2,
            sales_count: 1,
            negative_quantities: vec!["arabica".into()],
            negative_sales: vec!["robusta".into()],
            unknown_categories: vec!["mocha".into()],
        });
        assert!(!report.is_healthy());
        assert_eq!(
            report.issues,
            vec![
                "Inventory for arabica is negative".to_string(),
                "Sales total for robusta is negative".to_string(),
                "Unknown coffee type stored: mocha".to_string(),
            ]
        );
    }
}
