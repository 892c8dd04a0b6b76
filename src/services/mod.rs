pub mod credential_issuer;
pub mod verifier;
