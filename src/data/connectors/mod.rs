mod csv;
mod json;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use json::JsonConnector;
pub use types::{
    ColumnSpec,
    EquityColumn,
    TradeColumn,
};
pub use validator::DataValidator;
