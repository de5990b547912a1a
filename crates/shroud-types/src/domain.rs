//! Hash domain tags.
//!
//! Each call site of the protocol hash absorbs its own tag first. Tags are
//! fixed at protocol-design time and must never be reused for a second purpose.

pub const COMMITMENT: u64 = 1;
pub const SPEND_NULLIFIER: u64 = 2;
pub const ACTION_NULLIFIER: u64 = 3;
pub const NULLIFIER_KEY: u64 = 4;
pub const INCOMING_VIEWING_KEY: u64 = 5;
pub const STEALTH: u64 = 6;
pub const MERKLE_NODE: u64 = 7;
pub const ORDER: u64 = 8;
pub const ACCOUNT: u64 = 9;

pub const ALL: [u64; 9] = [
    COMMITMENT,
    SPEND_NULLIFIER,
    ACTION_NULLIFIER,
    NULLIFIER_KEY,
    INCOMING_VIEWING_KEY,
    STEALTH,
    MERKLE_NODE,
    ORDER,
    ACCOUNT,
];
