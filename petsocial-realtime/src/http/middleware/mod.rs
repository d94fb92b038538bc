pub mod internal_authentication;
