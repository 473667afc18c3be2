// shopfront/src/cart/quantity.rs

/// Coerces free-text quantity input. Anything that is not a whole number of
/// at least one becomes `1`; invalid input is never rejected.
pub fn parse_quantity(input: &str) -> u32 {
  match input.trim().parse::<i64>() {
    Ok(value) if value >= 1 => u32::try_from(value).unwrap_or(u32::MAX),
    _ => 1,
  }
}
