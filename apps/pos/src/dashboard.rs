//! # Dashboard Statistics
//!
//! Revenue and profit per period, the weekly sales chart and the critical
//! stock list, computed from the sales history and the catalog snapshot.
//!
//! ## Periods (relative to `today`)
//! ```text
//!   day    today only
//!   week   today and the 6 days before it
//!   month  same calendar month as today
//!   year   same calendar year as today
//!
//!   profit = total_final - Σ (unit_cost × quantity)
//! ```
//!
//! Sales dated after `today` are ignored by every period.

use activa_core::{critical_products, Money, Product, Sale, StockReport};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

use crate::history::local_date;

/// Days shown in the sales chart.
pub const CHART_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub revenue: Money,
    pub profit: Money,
    pub sale_count: usize,
}

impl PeriodStats {
    fn add(&mut self, sale: &Sale) {
        self.revenue += sale.total_final();
        self.profit += sale.total_final() - sale.cost_total();
        self.sale_count += 1;
    }
}

/// One bar of the weekly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    /// Short Spanish weekday name ("Lun", "Mar", ...).
    pub label: &'static str,
    pub total: Money,
}

/// A product in the critical stock panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalStock {
    pub id: String,
    pub name: String,
    pub total_stock: u64,
    pub stock_critico: u32,
    /// (size label, units on hand) for every size, in catalog order.
    pub sizes: Vec<(String, u32)>,
}

impl From<&Product> for CriticalStock {
    fn from(product: &Product) -> Self {
        let report = StockReport::of(product);
        CriticalStock {
            id: product.id().to_string(),
            name: product.name().to_string(),
            total_stock: report.total,
            stock_critico: report.threshold,
            sizes: product
                .sizes()
                .iter()
                .map(|s| (s.size().to_string(), s.quantity()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today: NaiveDate,
    pub day: PeriodStats,
    pub week: PeriodStats,
    pub month: PeriodStats,
    pub year: PeriodStats,
    /// Oldest day first, ending with `today`.
    pub last_seven_days: Vec<DailyTotal>,
    pub critical_stock: Vec<CriticalStock>,
}

impl DashboardStats {
    pub fn compute<'a>(
        today: NaiveDate,
        sales: impl IntoIterator<Item = &'a Sale>,
        products: &[Product],
    ) -> Self {
        let week_start = today
            .checked_sub_days(Days::new(CHART_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);

        let mut last_seven_days: Vec<DailyTotal> = (0..CHART_DAYS)
            .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
            .map(|date| DailyTotal {
                date,
                label: weekday_label(date.weekday()),
                total: Money::zero(),
            })
            .collect();

        let mut stats = DashboardStats {
            today,
            day: PeriodStats::default(),
            week: PeriodStats::default(),
            month: PeriodStats::default(),
            year: PeriodStats::default(),
            last_seven_days: Vec::new(),
            critical_stock: critical_products(products)
                .into_iter()
                .map(CriticalStock::from)
                .collect(),
        };

        for sale in sales {
            let date = local_date(sale);
            if date > today {
                continue;
            }

            if date == today {
                stats.day.add(sale);
            }
            if date >= week_start {
                stats.week.add(sale);
                if let Some(bar) = last_seven_days.iter_mut().find(|d| d.date == date) {
                    bar.total += sale.total_final();
                }
            }
            if date.year() == today.year() {
                stats.year.add(sale);
                if date.month() == today.month() {
                    stats.month.add(sale);
                }
            }
        }

        stats.last_seven_days = last_seven_days;
        stats
    }
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lun",
        Weekday::Tue => "Mar",
        Weekday::Wed => "Mie",
        Weekday::Thu => "Jue",
        Weekday::Fri => "Vie",
        Weekday::Sat => "Sab",
        Weekday::Sun => "Dom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use activa_core::{AdjustmentKind, AdjustmentMethod, Cart, ProductDraft};
    use chrono::Months;

    fn remera() -> Product {
        Product::try_from(
            ProductDraft::new("1", "Remera Pro Run", 25000)
                .cost(12000)
                .stock_critico(5)
                .size("S", 10)
                .size("L", 3),
        )
        .unwrap()
    }

    fn zapatillas() -> Product {
        Product::try_from(
            ProductDraft::new("2", "Zapatillas Ultra Boost", 85000)
                .cost(45000)
                .stock_critico(2)
                .size("42", 0)
                .size("43", 1),
        )
        .unwrap()
    }

    /// Two remeras with a 10% discount: total 45 000, cost 24 000.
    fn sale() -> Sale {
        let mut cart = Cart::new();
        let product = remera();
        cart.add_item(&product, "S");
        cart.add_item(&product, "S");
        cart.set_adjustment(AdjustmentKind::Discount, AdjustmentMethod::Percentage, 1000)
            .unwrap();
        cart.complete_sale().unwrap()
    }

    #[test]
    fn test_sale_counts_in_every_period_on_its_day() {
        let sale = sale();
        let today = local_date(&sale);

        let stats = DashboardStats::compute(today, [&sale], &[]);

        for period in [stats.day, stats.week, stats.month, stats.year] {
            assert_eq!(period.revenue.units(), 45000);
            assert_eq!(period.profit.units(), 21000);
            assert_eq!(period.sale_count, 1);
        }
        assert_eq!(stats.last_seven_days.len(), 7);
        assert_eq!(stats.last_seven_days[6].date, today);
        assert_eq!(stats.last_seven_days[6].total.units(), 45000);
        assert_eq!(stats.last_seven_days[0].total, Money::zero());
    }

    #[test]
    fn test_periods_relative_to_today() {
        let sale = sale();
        let sold_on = local_date(&sale);

        let later = sold_on.checked_add_days(Days::new(3)).unwrap();
        let stats = DashboardStats::compute(later, [&sale], &[]);
        assert_eq!(stats.day.sale_count, 0);
        assert_eq!(stats.week.sale_count, 1);
        assert_eq!(stats.last_seven_days[3].total.units(), 45000);

        let next_month = sold_on.checked_add_months(Months::new(1)).unwrap();
        let stats = DashboardStats::compute(next_month, [&sale], &[]);
        assert_eq!(stats.week.sale_count, 0);
        assert_eq!(stats.month.sale_count, 0);

        let next_year = sold_on.checked_add_months(Months::new(12)).unwrap();
        let stats = DashboardStats::compute(next_year, [&sale], &[]);
        assert_eq!(stats.year.sale_count, 0);
    }

    #[test]
    fn test_future_sales_ignored() {
        let sale = sale();
        let before = local_date(&sale).pred_opt().unwrap();
        let stats = DashboardStats::compute(before, [&sale], &[]);
        assert_eq!(stats.year.sale_count, 0);
        assert!(stats.last_seven_days.iter().all(|d| d.total.is_zero()));
    }

    #[test]
    fn test_critical_stock_panel() {
        let products = vec![remera(), zapatillas()];
        let today = NaiveDate::from_ymd_opt(2023, 11, 15).unwrap();

        let stats = DashboardStats::compute(today, std::iter::empty::<&Sale>(), &products);

        assert_eq!(stats.critical_stock.len(), 1);
        let panel = &stats.critical_stock[0];
        assert_eq!(panel.name, "Zapatillas Ultra Boost");
        assert_eq!(
            panel.sizes,
            vec![("42".to_string(), 0), ("43".to_string(), 1)]
        );
        assert_eq!(stats.last_seven_days[6].label, "Mie");
    }
}
