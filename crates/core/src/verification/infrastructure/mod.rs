pub mod http_verification_client;
