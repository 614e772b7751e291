pub mod category_handlers;
pub mod dashboard_handlers;
pub mod goal_handlers;
pub mod income_handlers;
pub mod settings_handlers;

pub use category_handlers::{create_category_handler, delete_category_handler, list_categories};
pub use dashboard_handlers::{dashboard_handler, index_handler};
pub use goal_handlers::{
    create_deposit_handler, create_goal_handler, delete_deposit_handler, delete_goal_handler,
    list_goals, view_goal_handler,
};
pub use income_handlers::{create_income_handler, delete_income_handler, list_incomes};
pub use settings_handlers::{show_settings_page, update_settings_handler};

/// Form amounts arrive as free text; monetary values must be non-negative.
pub(crate) fn parse_amount(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err("Amount must be a non-negative number".to_string()),
    }
}

/// Empty dates default to today; anything else must be ISO `YYYY-MM-DD`.
pub(crate) fn parse_date(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string());
    }

    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| "Date must be in YYYY-MM-DD format".to_string())
}
