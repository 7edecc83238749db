//! Pure parsing helpers for user input. Nothing in here touches the
//! console, so every rule is unit-testable: trimming, numeric parsing with
//! half-up normalization, and the one-line batch form for materials.

use core_types::{CoreError, NewMaterial, round_two_places};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Trims the raw line; a blank line means "no input".
pub fn non_blank(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a decimal and normalizes it to two places, rounding half-up.
/// `"12.345"` becomes `12.35`; anything non-numeric is rejected before it
/// can reach the store.
pub fn parse_decimal(input: &str) -> Result<Decimal, CoreError> {
    let trimmed = input.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| {
        CoreError::InvalidInput(
            "decimal".into(),
            format!("'{trimmed}' is not a valid decimal number"),
        )
    })?;
    Ok(round_two_places(value))
}

/// Parses an integer menu selection, id, or quantity.
pub fn parse_int(input: &str) -> Result<i32, CoreError> {
    let trimmed = input.trim();
    trimmed.parse::<i32>().map_err(|_| {
        CoreError::InvalidInput("integer".into(), format!("'{trimmed}' is not a valid number"))
    })
}

/// Parses the one-line batch form for materials: entries separated by `;`,
/// each entry `name,quantity,cost`.
///
/// Returns every entry that parsed cleanly plus a description of each entry
/// that did not, so the caller can report bad entries without losing the
/// good ones.
pub fn parse_material_batch(input: &str) -> (Vec<NewMaterial>, Vec<String>) {
    let mut materials = Vec::new();
    let mut errors = Vec::new();

    for (index, raw_entry) in input.split(';').enumerate() {
        let entry = raw_entry.trim();
        if entry.is_empty() {
            continue;
        }

        match parse_material_entry(entry) {
            Ok(material) => materials.push(material),
            Err(reason) => errors.push(format!("entry {} ('{}'): {}", index + 1, entry, reason)),
        }
    }

    (materials, errors)
}

fn parse_material_entry(entry: &str) -> Result<NewMaterial, String> {
    let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(format!(
            "expected 'name,quantity,cost', got {} field(s)",
            fields.len()
        ));
    }

    let name = fields[0];
    if name.is_empty() {
        return Err("material name must not be blank".into());
    }

    let num_required = fields[1]
        .parse::<i32>()
        .map_err(|_| format!("'{}' is not a valid quantity", fields[1]))?;
    if num_required < 0 {
        return Err(format!("quantity must not be negative, got {num_required}"));
    }

    let cost = Decimal::from_str(fields[2])
        .map_err(|_| format!("'{}' is not a valid cost", fields[2]))?;
    if cost.is_sign_negative() {
        return Err(format!("cost must not be negative, got {cost}"));
    }

    Ok(NewMaterial::new(name, num_required, cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn non_blank_trims_and_drops_empty_lines() {
        assert_eq!(non_blank("  hello  "), Some("hello".to_string()));
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(""), None);
    }

    #[test]
    fn parse_decimal_normalizes_half_up() {
        assert_eq!(parse_decimal("12.345").unwrap(), dec!(12.35));
        assert_eq!(parse_decimal(" 3.5 ").unwrap(), dec!(3.50));
        assert_eq!(parse_decimal("7").unwrap(), dec!(7.00));
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("1.2.3").is_err());
    }

    #[test]
    fn parse_int_handles_whitespace_and_garbage() {
        assert_eq!(parse_int(" 42 ").unwrap(), 42);
        assert!(parse_int("four").is_err());
        assert!(parse_int("").is_err());
    }

    #[test]
    fn batch_parses_valid_entries() {
        let (materials, errors) = parse_material_batch("Wood,4,5.00; Nails, 20, 0.05");
        assert!(errors.is_empty());
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].material_name(), "Wood");
        assert_eq!(materials[0].num_required(), 4);
        assert_eq!(materials[0].cost(), dec!(5.00));
        assert_eq!(materials[1].material_name(), "Nails");
        assert_eq!(materials[1].cost(), dec!(0.05));
    }

    #[test]
    fn batch_collects_errors_without_losing_good_entries() {
        let (materials, errors) =
            parse_material_batch("Wood,4,5.00; Glue,abc,2.00; ,1,1.00; Screws,10,0.10");
        assert_eq!(materials.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("Glue"));
        assert!(errors[1].contains("blank"));
    }

    #[test]
    fn batch_normalizes_cost_to_two_places() {
        let (materials, errors) = parse_material_batch("Paint,1,9.999");
        assert!(errors.is_empty());
        assert_eq!(materials[0].cost(), dec!(10.00));
    }

    #[test]
    fn batch_ignores_blank_entries_and_rejects_negatives() {
        let (materials, errors) = parse_material_batch(" ; Rope,-1,2.00 ; Tape,1,-0.50 ;");
        assert!(materials.is_empty());
        assert_eq!(errors.len(), 2);
    }
}
