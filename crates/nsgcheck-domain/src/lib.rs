mod types;
pub mod error;
mod tests;

pub use error::DomainError;
pub use types::{
    extract_subnet_name, Pairing, ResourceGroupName, SecurityGroupName, SecurityGroupRecord,
    SubnetName, SubnetRecord, SubscriptionId, VnetName,
};
