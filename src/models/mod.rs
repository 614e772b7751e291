pub mod category;
pub mod income;
pub mod saving_goal;
pub mod user;

pub use category::{Category, CreateCategoryForm};
pub use income::{CreateIncomeForm, Income};
pub use saving_goal::{
    CreateDepositForm, CreateGoalForm, GoalWithTotal, SavingDeposit, SavingGoal,
};
pub use user::{ConfirmForm, LoginForm, RegisterForm, SettingsForm, User};
