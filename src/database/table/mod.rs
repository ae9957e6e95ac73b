pub mod base_table;
pub mod device_token_table;
pub mod subscription_table;
pub mod table;

pub use base_table::BaseTable;
pub use device_token_table::DeviceTokenTable;
pub use subscription_table::SubscriptionTable;
pub use table::Table;
