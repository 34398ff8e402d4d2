/// Stock and sales are counted in whole kilograms.
pub type Kilograms = i64;

/// Format a quantity for display.
/// Example: 15 -> "15 kg"
pub fn format_kg(quantity: Kilograms) -> String {
    format!("{} kg", quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kg() {
        assert_eq!(format_kg(15), "15 kg");
        assert_eq!(format_kg(0), "0 kg");
        assert_eq!(format_kg(-3), "-3 kg");
    }
}
