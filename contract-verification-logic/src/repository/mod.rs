pub mod accounts;
pub mod contracts;
pub mod token_holders;
pub mod verification_requests;
pub mod verified_contracts;
