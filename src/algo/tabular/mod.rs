pub mod q_table;
pub mod table;
pub mod update_rule;

pub use q_table::{QTableAgent, QTableAgentConfig};
pub use table::{QTable, Row};
pub use update_rule::UpdateRule;
