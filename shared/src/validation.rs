//! Validation utilities for LabDesk
//!
//! Includes Philippines-specific validations for front-office compliance
//! (PhilHealth identifiers, statutory discount bounds, receipt formats).

use rust_decimal::Decimal;

// ============================================================================
// Billing Validations
// ============================================================================

/// Validate a discount percentage is within 0-100
pub fn validate_discount_percent(percent: Decimal) -> Result<(), &'static str> {
    if percent < Decimal::ZERO || percent > Decimal::from(100) {
        return Err("Discount percent must be between 0 and 100");
    }
    Ok(())
}

/// Validate a PhilHealth coverage percentage is within 0-100
pub fn validate_coverage_percent(percent: Decimal) -> Result<(), &'static str> {
    if percent < Decimal::ZERO || percent > Decimal::from(100) {
        return Err("Coverage percent must be between 0 and 100");
    }
    Ok(())
}

/// Validate a monetary amount is non-negative
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a test price is positive
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be positive");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a lab test code (2-10 uppercase alphanumeric)
pub fn validate_test_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Test code must be at least 2 characters");
    }
    if code.len() > 10 {
        return Err("Test code must be at most 10 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Test code must be uppercase alphanumeric only");
    }
    Ok(())
}

// ============================================================================
// Philippines-Specific Validations
// ============================================================================

/// Validate Philippine mobile number format
/// Accepts: 09171234567, 0917-123-4567, +639171234567
pub fn validate_ph_mobile(number: &str) -> Result<(), &'static str> {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic mobile: 11 digits starting with 09 (e.g., 09171234567)
    if digits.len() == 11 && digits.starts_with("09") {
        return Ok(());
    }
    // International format with country code: 12 digits starting with 639
    if digits.len() == 12 && digits.starts_with("639") {
        return Ok(());
    }

    Err("Invalid Philippine mobile number format")
}

/// Validate a PhilHealth Identification Number (PIN)
/// 12-digit number, optionally written as XX-XXXXXXXXX-X
pub fn validate_philhealth_number(pin: &str) -> Result<(), &'static str> {
    let digits: String = pin.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 12 {
        return Err("PhilHealth number must be 12 digits");
    }

    // Non-digit separators other than dashes are not accepted
    if !pin.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err("Invalid PhilHealth number format");
    }

    Ok(())
}

/// Validate an official receipt number
/// Format: OR-YYYYMMDD-NNNN (e.g., OR-20250114-0042)
pub fn validate_receipt_number(receipt: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = receipt.split('-').collect();

    if parts.len() != 3 {
        return Err("Receipt number must be in format OR-YYYYMMDD-NNNN");
    }
    if parts[0] != "OR" {
        return Err("Receipt number must start with 'OR'");
    }
    if parts[1].len() != 8 || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid date segment in receipt number");
    }
    if parts[2].len() != 4 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence segment in receipt number");
    }

    Ok(())
}

/// Validate a patient code
/// Format: PT-YYYY-NNNNN (e.g., PT-2025-00123)
pub fn validate_patient_code(code: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = code.split('-').collect();

    if parts.len() != 3 {
        return Err("Patient code must be in format PT-YYYY-NNNNN");
    }
    if parts[0] != "PT" {
        return Err("Patient code must start with 'PT'");
    }
    if parts[1].len() != 4 || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid year in patient code");
    }
    if parts[2].len() != 5 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence number in patient code");
    }

    Ok(())
}
