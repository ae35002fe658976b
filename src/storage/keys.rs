use crate::types::Identity;

const BALANCE_PREFIX: &str = "credits_";
const TRANSACTIONS_PREFIX: &str = "transactions_";

/// Key holding the decimal balance for an identity
pub fn balance_key(identity: &Identity) -> String {
    format!("{}{}", BALANCE_PREFIX, identity)
}

/// Key holding the JSON transaction history for an identity
pub fn transactions_key(identity: &Identity) -> String {
    format!("{}{}", TRANSACTIONS_PREFIX, identity)
}
