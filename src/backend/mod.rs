//! Backend support for the Sable toolchain.
//!
//! Only the addressing-mode algebra lives here for now; instruction
//! selection and emission sit behind it and are out of scope for the
//! frontend crate.

pub mod addressing;

pub use addressing::AddressingMode;
