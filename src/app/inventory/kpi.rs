//! 仪表盘指标聚合

use std::collections::HashSet;

use super::model::{Kpi, Product};

/// 计算仪表盘指标
pub fn compute_kpi(products: &[Product], low_stock_threshold: u32) -> Kpi {
    let companies: HashSet<&str> = products
        .iter()
        .map(|p| p.company.trim())
        .filter(|c| !c.is_empty())
        .collect();

    Kpi {
        total_products: products.len(),
        total_units: products.iter().map(|p| u64::from(p.quantity)).sum(),
        low_stock_alerts: products
            .iter()
            .filter(|p| p.quantity < low_stock_threshold)
            .count(),
        active_companies: companies.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(company: &str, name: &str, quantity: u32) -> Product {
        Product {
            id: 0,
            company: company.to_string(),
            name: name.to_string(),
            alias: String::new(),
            quantity,
            location: String::new(),
            notes: String::new(),
            photo_url: String::new(),
            date_added: String::new(),
            added_by: String::new(),
        }
    }

    #[test]
    fn test_kpi_example() {
        let products = vec![product("CMES", "Bolt", 5), product("SRT", "Nut", 3)];
        assert_eq!(
            compute_kpi(&products, 10),
            Kpi {
                total_products: 2,
                total_units: 8,
                low_stock_alerts: 2,
                active_companies: 2,
            }
        );
    }

    #[test]
    fn test_kpi_empty_is_zeroed() {
        assert_eq!(compute_kpi(&[], 10), Kpi::default());
    }

    #[test]
    fn test_threshold_is_exclusive_and_companies_distinct() {
        let products = vec![
            product("CMES", "Bolt", 10),
            product("CMES", "Screw", 9),
            product("SRT", "Nut", 0),
            product("SRT", "Pin", 400),
        ];
        let kpi = compute_kpi(&products, 10);
        assert_eq!(kpi.low_stock_alerts, 2);
        assert_eq!(kpi.active_companies, 2);
        assert_eq!(kpi.total_units, 419);
    }
}
