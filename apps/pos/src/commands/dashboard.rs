//! # Dashboard Commands

use chrono::NaiveDate;
use tracing::debug;

use crate::dashboard::DashboardStats;
use crate::history::SalesHistory;
use crate::state::SessionState;

/// Panel de Control figures as of `today` (the station's local date).
pub fn get_dashboard(
    session: &SessionState,
    history: &dyn SalesHistory,
    today: NaiveDate,
) -> DashboardStats {
    debug!(%today, "get_dashboard command");
    session.with_session(|s| DashboardStats::compute(today, history.list(), s.products()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::complete_sale;
    use crate::history::{local_date, InMemorySalesHistory};
    use crate::receipt::ThermalReceipt;
    use crate::state::{ConfigState, Session};
    use activa_core::{Product, ProductDraft};

    #[test]
    fn test_dashboard_after_checkout() {
        let products = vec![Product::try_from(
            ProductDraft::new("2", "Zapatillas Ultra Boost", 85000)
                .cost(45000)
                .stock_critico(2)
                .size("42", 5)
                .size("43", 1),
        )
        .unwrap()];
        let state = SessionState::new(Session::new(products, Vec::new()));
        let mut history = InMemorySalesHistory::new();
        let printer = ThermalReceipt::new(&ConfigState::default());

        state.with_session_mut(|s| {
            let product = s.product("2").cloned().unwrap();
            s.cart_mut().add_item(&product, "42");
        });
        let done = complete_sale(&state, &printer, &mut history).unwrap();

        let stats = get_dashboard(&state, &history, local_date(&done.sale));
        assert_eq!(stats.day.revenue.units(), 85000);
        assert_eq!(stats.day.profit.units(), 40000);
        assert_eq!(stats.critical_stock.len(), 0);
    }
}
