pub mod rpc_token_issuer;

pub use rpc_token_issuer::SearpcTokenIssuer;
