use std::fmt;

/// Display wrapper for an amount in pesos.
///
/// Amounts are plain `f64` everywhere in the engine; this type only exists to
/// render them the way the back office shows money: `₱` symbol, thousands
/// separators, at most two fraction digits, trailing zeros dropped.
///
/// # Examples
///
/// ```rust
/// use engine::Peso;
///
/// assert_eq!(Peso(1234567.5).to_string(), "₱1,234,567.5");
/// assert_eq!(Peso(150.0).to_string(), "₱150");
/// assert_eq!(Peso(-0.456).to_string(), "-₱0.46");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Peso(pub f64);

impl Peso {
    pub const SYMBOL: &'static str = "₱";
}

impl fmt::Display for Peso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = (self.0 * 100.0).round();
        if !cents.is_finite() {
            return write!(f, "{}0", Self::SYMBOL);
        }
        let sign = if cents < 0.0 { "-" } else { "" };
        let cents = cents.abs() as u128;
        let whole = group_thousands(cents / 100);
        let fraction = cents % 100;

        write!(f, "{sign}{}{whole}", Self::SYMBOL)?;
        match fraction {
            0 => Ok(()),
            tens if tens % 10 == 0 => write!(f, ".{}", tens / 10),
            hundredths => write!(f, ".{hundredths:02}"),
        }
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
