//! Domain-level constants.
//!
//! These constants define business rules and the persisted representation
//! of enumerated values.

// =============================================================================
// Book Types
// =============================================================================

pub const BOOK_TYPE_COMPUTER: &str = "COMPUTER";
pub const BOOK_TYPE_ECONOMY: &str = "ECONOMY";
pub const BOOK_TYPE_SOCIETY: &str = "SOCIETY";
pub const BOOK_TYPE_LANGUAGE: &str = "LANGUAGE";
pub const BOOK_TYPE_SCIENCE: &str = "SCIENCE";

/// All valid book type values
pub const VALID_BOOK_TYPES: &[&str] = &[
    BOOK_TYPE_COMPUTER,
    BOOK_TYPE_ECONOMY,
    BOOK_TYPE_SOCIETY,
    BOOK_TYPE_LANGUAGE,
    BOOK_TYPE_SCIENCE,
];

// =============================================================================
// Loan Status
// =============================================================================

/// Book is currently lent out
pub const LOAN_STATUS_LOANED: &str = "LOANED";

/// Book has been handed back
pub const LOAN_STATUS_RETURNED: &str = "RETURNED";

// =============================================================================
// Validation
// =============================================================================

/// Maximum name length (the width of name columns)
pub const MAX_NAME_LENGTH: u32 = 255;
