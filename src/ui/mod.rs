pub mod chart_utils;
pub mod movers_view;
pub mod treasury_view;
pub mod vix_view;
