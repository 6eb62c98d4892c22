//! Command implementations.

pub mod convert;
pub mod delete;
pub mod list;
pub mod parse;
pub mod portfolio;
pub mod quote;
pub mod rates;
pub mod send;

pub use self::convert::execute_convert;
pub use self::delete::execute_delete;
pub use self::list::execute_list;
pub use self::parse::execute_parse;
pub use self::portfolio::execute_portfolio;
pub use self::quote::execute_quote;
pub use self::rates::execute_rates;
pub use self::send::{execute_send, execute_send_file};
