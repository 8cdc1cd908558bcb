//! Credential primitives library
//!
//! Provides the two capabilities an authentication service consumes but does
//! not implement itself:
//! - Password hashing (Argon2id, PHC string digests)
//! - Opaque token generation (UUIDv4)
//!
//! Services define their own capability traits and adapt these
//! implementations. This keeps the hashing and randomness primitives out of
//! domain code while avoiding duplication across services.
//!
//! # Examples
//!
//! ## Password hashing
//! ```
//! use credential::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("hunter2").unwrap();
//! assert!(hasher.verify(&digest, "hunter2").unwrap());
//! assert!(!hasher.verify(&digest, "hunter3").unwrap());
//! ```
//!
//! ## Token generation
//! ```
//! use credential::TokenGenerator;
//!
//! let tokens = TokenGenerator::new();
//! let token = tokens.new_token();
//! assert_ne!(token, tokens.new_token());
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenGenerator;
